//! CSV catalog source
//!
//! Reads `courses.csv` and `policies.csv` as exported from the registrar's
//! spreadsheets. Files may be UTF-8 or latin-1.

use advisor_core::{split_code_list, CourseRecord, Offering, PolicyCondition, PolicyRule};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::{CatalogSource, StorageError};

const COURSE_CODE: &str = "Course Code";
const COURSE_NAME: &str = "Course Name";
const DESCRIPTION: &str = "Description";
const PREREQUISITES: &str = "Prerequisites";
const COREQUISITES: &str = "Co-requisites";
const CREDIT_HOURS: &str = "Credit Hours";
const SEMESTER_OFFERED: &str = "Semester Offered";

const CATEGORY: &str = "Category";
const CONDITION: &str = "Condition";
const MAX_CREDITS: &str = "max";
const POLICY_DESCRIPTION: &str = "Policy Description";

/// Catalog source backed by two CSV files
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    courses_path: PathBuf,
    policies_path: PathBuf,
}

impl CsvCatalogSource {
    pub fn new(courses_path: impl Into<PathBuf>, policies_path: impl Into<PathBuf>) -> Self {
        Self {
            courses_path: courses_path.into(),
            policies_path: policies_path.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for CsvCatalogSource {
    async fn load_courses(&self) -> Result<Vec<CourseRecord>, StorageError> {
        let text = read_text(&self.courses_path).await?;
        parse_courses(&text)
    }

    async fn load_policies(&self) -> Result<Vec<PolicyRule>, StorageError> {
        let text = read_text(&self.policies_path).await?;
        parse_policies(&text)
    }

    fn describe(&self) -> String {
        format!(
            "csv ({}, {})",
            self.courses_path.display(),
            self.policies_path.display()
        )
    }
}

async fn read_text(path: &Path) -> Result<String, StorageError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| StorageError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(decode(bytes))
}

/// UTF-8 when valid, otherwise every byte is read as a latin-1 code point.
fn decode(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    };
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Header name → column index
struct Columns {
    headers: csv::StringRecord,
}

impl Columns {
    fn index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    fn require(&self, names: &[&str]) -> Result<(), StorageError> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| self.index(name).is_none())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(StorageError::Schema(format!(
                "missing column(s): {}",
                missing.join(", ")
            )))
        }
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, name: &str) -> &'r str {
        self.index(name)
            .and_then(|i| record.get(i))
            .map(str::trim)
            .unwrap_or("")
    }
}

fn reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

/// Parses a whole-number cell. Spreadsheet exports sometimes write `3.0`.
fn parse_whole(cell: &str) -> Option<u32> {
    cell.parse::<u32>().ok().or_else(|| {
        cell.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    })
}

/// Parses the course table. Rows without a code or with a non-positive
/// credit count are skipped with a warning.
pub fn parse_courses(text: &str) -> Result<Vec<CourseRecord>, StorageError> {
    let mut reader = reader(text);
    let columns = Columns {
        headers: reader.headers()?.clone(),
    };
    columns.require(&[COURSE_CODE, COURSE_NAME, CREDIT_HOURS, SEMESTER_OFFERED])?;

    let mut courses = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let code = columns.get(&record, COURSE_CODE);
        if code.is_empty() {
            tracing::warn!("Skipping course row {}: empty course code", row + 1);
            continue;
        }
        let credits = columns.get(&record, CREDIT_HOURS);
        let Some(credit_hours) = parse_whole(credits).filter(|c| *c > 0) else {
            tracing::warn!(
                "Skipping course {}: invalid credit hours '{}'",
                code,
                credits
            );
            continue;
        };

        courses.push(CourseRecord {
            code: code.to_string(),
            name: columns.get(&record, COURSE_NAME).to_string(),
            description: columns.get(&record, DESCRIPTION).to_string(),
            prerequisites: split_code_list(columns.get(&record, PREREQUISITES)),
            corequisites: split_code_list(columns.get(&record, COREQUISITES)),
            credit_hours,
            semester_offered: Offering::parse(columns.get(&record, SEMESTER_OFFERED)),
        });
    }

    Ok(courses)
}

/// Parses the policy table. Rows with an unparseable `max` are skipped;
/// malformed conditions are kept so they can be audited.
pub fn parse_policies(text: &str) -> Result<Vec<PolicyRule>, StorageError> {
    let mut reader = reader(text);
    let columns = Columns {
        headers: reader.headers()?.clone(),
    };
    columns.require(&[CATEGORY, CONDITION, MAX_CREDITS])?;

    let mut policies = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let max = columns.get(&record, MAX_CREDITS);
        let Some(max_credits) = parse_whole(max) else {
            tracing::warn!("Skipping policy row {}: invalid max '{}'", row + 1, max);
            continue;
        };

        let condition = PolicyCondition::parse(columns.get(&record, CONDITION));
        if condition.is_malformed() {
            tracing::warn!("Policy row {} has malformed condition '{}'", row + 1, condition);
        }

        policies.push(PolicyRule {
            category: columns.get(&record, CATEGORY).to_string(),
            condition,
            max_credits,
            description: columns.get(&record, POLICY_DESCRIPTION).to_string(),
        });
    }

    Ok(policies)
}
