//! Input validation for values entered by students and catalog editors

use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::models::{CGPA_MAX, CGPA_MIN};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("CGPA is required")]
    MissingCgpa,

    #[error("CGPA must be a number, got '{0}'")]
    NotANumber(String),

    #[error("CGPA must be between {min:.2} and {max:.2}, got {value}")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

/// Parses and range-checks a CGPA typed as text.
pub fn validate_cgpa(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingCgpa);
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;
    check_cgpa_range(value)
}

/// Validates a CGPA submitted as JSON: a number or a numeric string.
pub fn validate_cgpa_value(value: &Value) -> Result<f64, ValidationError> {
    match value {
        Value::Null => Err(ValidationError::MissingCgpa),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ValidationError::NotANumber(n.to_string()))
            .and_then(check_cgpa_range),
        Value::String(s) => validate_cgpa(s),
        other => Err(ValidationError::NotANumber(other.to_string())),
    }
}

/// Rejects non-finite values and anything outside [0.0, 4.0].
pub fn check_cgpa_range(value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber(value.to_string()));
    }
    if !(CGPA_MIN..=CGPA_MAX).contains(&value) {
        return Err(ValidationError::OutOfRange {
            value,
            min: CGPA_MIN,
            max: CGPA_MAX,
        });
    }
    Ok(value)
}

/// Splits a comma-separated code list, trimming whitespace and dropping
/// empty entries. Order and duplicates are preserved.
pub fn split_code_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Returns the codes in `raw` that are not in `existing_codes`.
///
/// Only commas separate codes. Matching is case-sensitive, so `cse101`
/// is unknown even when `CSE101` exists. Each unknown code is reported
/// once, in first-seen order.
pub fn validate_prerequisite_list<S: AsRef<str>>(
    raw: Option<&str>,
    existing_codes: &[S],
) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let existing: HashSet<&str> = existing_codes.iter().map(AsRef::as_ref).collect();
    let mut seen = HashSet::new();

    split_code_list(raw)
        .into_iter()
        .filter(|code| seen.insert(code.clone()))
        .filter(|code| !existing.contains(code.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    const EXISTING: [&str; 3] = ["CSE101", "MAT101", "PHY101"];

    #[rstest]
    #[case("0.0", 0.0)]
    #[case("2.5", 2.5)]
    #[case("4.0", 4.0)]
    #[case(" 3.75 ", 3.75)]
    #[case("0.01", 0.01)]
    #[case("3.99", 3.99)]
    fn test_validate_cgpa_valid(#[case] raw: &str, #[case] expected: f64) {
        assert_eq!(validate_cgpa(raw), Ok(expected));
    }

    #[rstest]
    #[case("-1.0")]
    #[case("4.1")]
    #[case("5.0")]
    #[case("-0.01")]
    #[case("4.01")]
    #[case("abc")]
    #[case("")]
    #[case(" ")]
    #[case("3.5.5")]
    #[case("3,5")]
    #[case("NaN")]
    #[case("inf")]
    fn test_validate_cgpa_invalid(#[case] raw: &str) {
        let err = validate_cgpa(raw).unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_validate_cgpa_messages() {
        assert_eq!(validate_cgpa(" "), Err(ValidationError::MissingCgpa));
        assert_eq!(
            validate_cgpa("abc").unwrap_err().to_string(),
            "CGPA must be a number, got 'abc'"
        );
        assert_eq!(
            validate_cgpa("4.1").unwrap_err().to_string(),
            "CGPA must be between 0.00 and 4.00, got 4.1"
        );
    }

    #[rstest]
    #[case(json!(3.5), Ok(3.5))]
    #[case(json!(4), Ok(4.0))]
    #[case(json!("2.75"), Ok(2.75))]
    #[case(json!(null), Err(ValidationError::MissingCgpa))]
    #[case(json!(true), Err(ValidationError::NotANumber("true".to_string())))]
    fn test_validate_cgpa_value(
        #[case] value: Value,
        #[case] expected: Result<f64, ValidationError>,
    ) {
        assert_eq!(validate_cgpa_value(&value), expected);
    }

    #[test]
    fn test_validate_cgpa_value_out_of_range() {
        assert!(matches!(
            validate_cgpa_value(&json!(-0.5)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[rstest]
    #[case(Some("CSE101,MAT101"), vec![])]
    #[case(Some("CSE101, MAT101"), vec![])]
    #[case(Some(" CSE101 , MAT101 "), vec![])]
    #[case(Some(""), vec![])]
    #[case(None, vec![])]
    #[case(Some("CSE101,CSE101"), vec![])]
    #[case(Some("CSE102,MAT102"), vec!["CSE102", "MAT102"])]
    #[case(Some("CSE101;MAT101"), vec!["CSE101;MAT101"])]
    #[case(Some("cse101,mat101"), vec!["cse101", "mat101"])]
    #[case(Some("CSE101,INVALID101"), vec!["INVALID101"])]
    #[case(Some("XYZ1,XYZ1, XYZ1"), vec!["XYZ1"])]
    fn test_validate_prerequisite_list(#[case] raw: Option<&str>, #[case] expected: Vec<&str>) {
        assert_eq!(validate_prerequisite_list(raw, &EXISTING), expected);
    }

    #[test]
    fn test_validate_prerequisite_list_empty_catalog() {
        let existing: [&str; 0] = [];
        assert_eq!(
            validate_prerequisite_list(Some("CSE101,MAT101"), &existing),
            vec!["CSE101", "MAT101"]
        );
    }

    #[test]
    fn test_split_code_list() {
        assert_eq!(split_code_list(" A, ,B,A "), vec!["A", "B", "A"]);
        assert!(split_code_list("").is_empty());
    }
}
