//! Core domain models

use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::CoreError;

/// Lowest CGPA on the grading scale
pub const CGPA_MIN: f64 = 0.0;
/// Highest CGPA on the grading scale
pub const CGPA_MAX: f64 = 4.0;

/// Policy category consumed by the credit-limit resolver
pub const CREDIT_LIMIT_CATEGORY: &str = "Credit Limit";

/// Academic term a student is requesting advice for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Semester {
    Fall,
    Spring,
}

impl Semester {
    pub fn as_str(&self) -> &'static str {
        match self {
            Semester::Fall => "FALL",
            Semester::Spring => "SPRING",
        }
    }

    /// Enrollment terms offered from the given academic year onwards,
    /// Fall before Spring within each year.
    pub fn options_from(year: i32) -> Vec<String> {
        (year..=year + 1)
            .flat_map(|y| [format!("Fall {}", y), format!("Spring {}", y)])
            .collect()
    }

    /// [`Semester::options_from`] for the current local year
    pub fn current_options() -> Vec<String> {
        Self::options_from(Local::now().year())
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Semester {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FALL" => Ok(Semester::Fall),
            "SPRING" => Ok(Semester::Spring),
            _ => Err(CoreError::InvalidSemester(s.to_string())),
        }
    }
}

impl TryFrom<String> for Semester {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Semester-offered designator of a course.
///
/// Designators outside FALL / SPRING / BOTH are kept verbatim so the
/// catalog audit can report them; such courses are never offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Offering {
    Fall,
    Spring,
    Both,
    Unrecognized(String),
}

impl Offering {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "FALL" => Offering::Fall,
            "SPRING" => Offering::Spring,
            "BOTH" => Offering::Both,
            _ => Offering::Unrecognized(raw.trim().to_string()),
        }
    }

    /// Whether a course with this designator runs in `semester`
    pub fn includes(&self, semester: Semester) -> bool {
        matches!(
            (self, semester),
            (Offering::Both, _)
                | (Offering::Fall, Semester::Fall)
                | (Offering::Spring, Semester::Spring)
        )
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Offering::Unrecognized(_))
    }
}

impl fmt::Display for Offering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offering::Fall => f.write_str("FALL"),
            Offering::Spring => f.write_str("SPRING"),
            Offering::Both => f.write_str("BOTH"),
            Offering::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl From<String> for Offering {
    fn from(value: String) -> Self {
        Offering::parse(&value)
    }
}

impl From<Offering> for String {
    fn from(value: Offering) -> Self {
        value.to_string()
    }
}

/// A single course in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Unique course code, e.g. `CSE014`
    pub code: String,
    /// Human-readable title
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Codes that must be passed before enrolling, in catalog order
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub corequisites: Vec<String>,
    pub credit_hours: u32,
    pub semester_offered: Offering,
}

impl CourseRecord {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        credit_hours: u32,
        semester_offered: Offering,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: String::new(),
            prerequisites: Vec::new(),
            corequisites: Vec::new(),
            credit_hours,
            semester_offered,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_corequisites<I, S>(mut self, corequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.corequisites = corequisites.into_iter().map(Into::into).collect();
        self
    }
}

/// Ordered, read-only snapshot of every course that may be recommended
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    courses: Vec<CourseRecord>,
}

impl Catalog {
    pub fn new(courses: Vec<CourseRecord>) -> Self {
        Self { courses }
    }

    pub fn courses(&self) -> &[CourseRecord] {
        &self.courses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CourseRecord> {
        self.courses.iter()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// First course with the given code (exact match)
    pub fn get(&self, code: &str) -> Option<&CourseRecord> {
        self.courses.iter().find(|c| c.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Prerequisite codes of a course; empty when the course is unknown
    pub fn prerequisites_of(&self, code: &str) -> Vec<String> {
        self.get(code)
            .map(|c| c.prerequisites.clone())
            .unwrap_or_default()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.courses.iter().map(|c| c.code.as_str()).collect()
    }
}

impl FromIterator<CourseRecord> for Catalog {
    fn from_iter<T: IntoIterator<Item = CourseRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CourseRecord;
    type IntoIter = std::slice::Iter<'a, CourseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.courses.iter()
    }
}

/// Condition attached to a credit-limit policy row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PolicyCondition {
    /// `CGPA ≥ threshold`
    AtLeast(f64),
    /// `CGPA < threshold`
    Below(f64),
    /// `lower ≤ CGPA < upper`
    Between { lower: f64, upper: f64 },
    /// Any text that is not one of the shapes above; never matches
    Malformed(String),
}

impl PolicyCondition {
    /// Parses a condition as written in the policy table.
    ///
    /// `>=` and `<=` are accepted in place of `≥` and `≤`.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().replace(">=", "≥").replace("<=", "≤");
        Self::parse_normalized(&normalized)
            .unwrap_or_else(|| PolicyCondition::Malformed(raw.trim().to_string()))
    }

    // Text before the operator names the subject and is not checked, so
    // `≥ 3.00` and `GPA < 2.00` read the same as their `CGPA` spellings.
    fn parse_normalized(s: &str) -> Option<Self> {
        if let Some((lower, rest)) = s.split_once('≤') {
            let (_, upper) = rest.split_once('<')?;
            let lower = parse_threshold(lower)?;
            let upper = parse_threshold(upper)?;
            return (lower < upper).then_some(PolicyCondition::Between { lower, upper });
        }
        if let Some((_, threshold)) = s.split_once('≥') {
            return parse_threshold(threshold).map(PolicyCondition::AtLeast);
        }
        if let Some((_, threshold)) = s.split_once('<') {
            return parse_threshold(threshold).map(PolicyCondition::Below);
        }
        None
    }

    pub fn matches(&self, cgpa: f64) -> bool {
        match *self {
            PolicyCondition::AtLeast(threshold) => cgpa >= threshold,
            PolicyCondition::Below(threshold) => cgpa < threshold,
            PolicyCondition::Between { lower, upper } => lower <= cgpa && cgpa < upper,
            PolicyCondition::Malformed(_) => false,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, PolicyCondition::Malformed(_))
    }
}

fn parse_threshold(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl fmt::Display for PolicyCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyCondition::AtLeast(t) => write!(f, "CGPA ≥ {:.2}", t),
            PolicyCondition::Below(t) => write!(f, "CGPA < {:.2}", t),
            PolicyCondition::Between { lower, upper } => {
                write!(f, "{:.2} ≤ CGPA < {:.2}", lower, upper)
            }
            PolicyCondition::Malformed(raw) => f.write_str(raw),
        }
    }
}

impl From<String> for PolicyCondition {
    fn from(value: String) -> Self {
        PolicyCondition::parse(&value)
    }
}

impl From<PolicyCondition> for String {
    fn from(value: PolicyCondition) -> Self {
        value.to_string()
    }
}

/// A row of the institutional policy table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub category: String,
    pub condition: PolicyCondition,
    /// Maximum credit hours granted when the condition holds
    pub max_credits: u32,
    #[serde(default)]
    pub description: String,
}

impl PolicyRule {
    /// Credit Limit row with a condition written as in the policy table
    pub fn credit_limit(condition: &str, max_credits: u32) -> Self {
        Self {
            category: CREDIT_LIMIT_CATEGORY.to_string(),
            condition: PolicyCondition::parse(condition),
            max_credits,
            description: String::new(),
        }
    }

    pub fn is_credit_limit(&self) -> bool {
        self.category.trim().eq_ignore_ascii_case(CREDIT_LIMIT_CATEGORY)
    }
}

/// Read-only snapshot of the policy table, in authored order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyTable {
    rules: Vec<PolicyRule>,
}

impl PolicyTable {
    pub fn new(rules: Vec<PolicyRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Credit Limit rows in table order
    pub fn credit_limits(&self) -> impl Iterator<Item = &PolicyRule> {
        self.rules.iter().filter(|r| r.is_credit_limit())
    }

    /// The reference three-tier table: below 2.00 → 12, 2.00–3.00 → 20,
    /// 3.00 and above → 22.
    pub fn reference() -> Self {
        Self::new(vec![
            PolicyRule::credit_limit("CGPA < 2.00", 12),
            PolicyRule::credit_limit("2.00 ≤ CGPA < 3.00", 20),
            PolicyRule::credit_limit("CGPA ≥ 3.00", 22),
        ])
    }
}

impl FromIterator<PolicyRule> for PolicyTable {
    fn from_iter<T: IntoIterator<Item = PolicyRule>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The requesting student's academic state, declared once per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentFact {
    pub cgpa: f64,
    pub semester: Semester,
    #[serde(default)]
    pub passed_courses: BTreeSet<String>,
    #[serde(default)]
    pub failed_courses: BTreeSet<String>,
}

impl StudentFact {
    pub fn new(cgpa: f64, semester: Semester) -> Self {
        Self {
            cgpa,
            semester,
            passed_courses: BTreeSet::new(),
            failed_courses: BTreeSet::new(),
        }
    }

    pub fn with_passed<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.passed_courses.extend(codes.into_iter().map(Into::into));
        self
    }

    pub fn with_failed<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failed_courses.extend(codes.into_iter().map(Into::into));
        self
    }
}

/// Outcome of checking a single course against a student's record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    NotFound,
    NotOffered {
        offered: Offering,
        semester: Semester,
    },
    MissingPrerequisites {
        missing: Vec<String>,
    },
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn reason(&self, code: &str) -> String {
        match self {
            Eligibility::Eligible => "Course can be taken".to_string(),
            Eligibility::NotFound => format!("Course {} not found", code),
            Eligibility::NotOffered { semester, .. } => {
                format!("Course {} is not offered in {} semester", code, semester)
            }
            Eligibility::MissingPrerequisites { missing } => {
                format!("Missing prerequisites: {}", missing.join(", "))
            }
        }
    }
}

/// Result of one engine run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub semester: Semester,
    pub cgpa: f64,
    /// Credit ceiling resolved from the policy table
    pub credit_limit: u32,
    /// True when no Credit Limit row matched and the fallback was used
    pub credit_limit_defaulted: bool,
    pub total_credits: u32,
    pub courses: Vec<CourseRecord>,
    pub generated_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn new(
        fact: &StudentFact,
        credit_limit: u32,
        credit_limit_defaulted: bool,
        courses: Vec<CourseRecord>,
    ) -> Self {
        let total_credits = courses.iter().map(|c| c.credit_hours).sum();
        Self {
            id: Uuid::new_v4(),
            semester: fact.semester,
            cgpa: fact.cgpa,
            credit_limit,
            credit_limit_defaulted,
            total_credits,
            courses,
            generated_at: Utc::now(),
        }
    }

    pub fn codes(&self) -> Vec<&str> {
        self.courses.iter().map(|c| c.code.as_str()).collect()
    }
}

/// Request to recommend courses for a student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Raw CGPA as submitted; validated before a fact is built
    #[serde(default)]
    pub cgpa: serde_json::Value,
    pub semester: Semester,
    #[serde(default)]
    pub passed_courses: Vec<String>,
    #[serde(default)]
    pub failed_courses: Vec<String>,
}

/// Request to check one course against a student's record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityRequest {
    pub semester: Semester,
    #[serde(default)]
    pub passed_courses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityResponse {
    pub course_code: String,
    pub valid: bool,
    pub reason: String,
    pub eligibility: Eligibility,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CgpaValidationRequest {
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CgpaValidationResponse {
    pub valid: bool,
    pub cgpa: Option<f64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrerequisiteValidationRequest {
    pub prerequisites: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrerequisiteValidationResponse {
    /// Codes not present in the catalog, in first-seen order
    pub unknown: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditLimitResponse {
    pub cgpa: f64,
    pub max_credits: u32,
    pub defaulted: bool,
}
