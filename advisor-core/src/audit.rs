//! Catalog and policy data-quality audit
//!
//! The engine never fails on bad data: dangling references, unknown
//! designators and malformed conditions simply exclude a course or skip a
//! policy row. This module reports those problems so they can be fixed
//! at the source.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::models::{Catalog, PolicyTable};

/// Which list of a course a dangling code was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Prerequisite,
    Corequisite,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Prerequisite => f.write_str("prerequisite"),
            Relation::Corequisite => f.write_str("co-requisite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityIssue {
    DuplicateCourse {
        code: String,
    },
    DanglingReference {
        course: String,
        relation: Relation,
        code: String,
        /// Catalog code that differs from `code` only by letter case
        case_variant_of: Option<String>,
    },
    UnrecognizedOffering {
        course: String,
        designator: String,
    },
    MalformedPolicyCondition {
        row: usize,
        condition: String,
    },
    MissingCreditLimits,
}

impl fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityIssue::DuplicateCourse { code } => {
                write!(f, "course code {} appears more than once", code)
            }
            DataQualityIssue::DanglingReference {
                course,
                relation,
                code,
                case_variant_of,
            } => {
                write!(f, "{} lists unknown {} {}", course, relation, code)?;
                if let Some(variant) = case_variant_of {
                    write!(f, " (did you mean {}?)", variant)?;
                }
                Ok(())
            }
            DataQualityIssue::UnrecognizedOffering { course, designator } => {
                write!(f, "{} has unrecognized semester designator '{}'", course, designator)
            }
            DataQualityIssue::MalformedPolicyCondition { row, condition } => {
                write!(f, "policy row {} has malformed condition '{}'", row, condition)
            }
            DataQualityIssue::MissingCreditLimits => {
                f.write_str("policy table has no Credit Limit rows")
            }
        }
    }
}

/// Lists every data-quality problem in the catalog and policy table.
///
/// Codes are compared exactly; a reference that only differs in case from
/// a catalog code is still reported as dangling, with the likely match.
pub fn audit_catalog(catalog: &Catalog, policies: &PolicyTable) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();
    let codes: HashSet<&str> = catalog.iter().map(|c| c.code.as_str()).collect();

    let mut seen = HashSet::new();
    for course in catalog {
        if !seen.insert(course.code.as_str()) {
            issues.push(DataQualityIssue::DuplicateCourse {
                code: course.code.clone(),
            });
        }
    }

    for course in catalog {
        let references = course
            .prerequisites
            .iter()
            .map(|code| (Relation::Prerequisite, code))
            .chain(course.corequisites.iter().map(|code| (Relation::Corequisite, code)));

        for (relation, code) in references {
            if codes.contains(code.as_str()) {
                continue;
            }
            let case_variant_of = catalog
                .iter()
                .find(|existing| existing.code.eq_ignore_ascii_case(code))
                .map(|existing| existing.code.clone());
            issues.push(DataQualityIssue::DanglingReference {
                course: course.code.clone(),
                relation,
                code: code.clone(),
                case_variant_of,
            });
        }

        if !course.semester_offered.is_recognized() {
            issues.push(DataQualityIssue::UnrecognizedOffering {
                course: course.code.clone(),
                designator: course.semester_offered.to_string(),
            });
        }
    }

    let mut credit_limit_rows = 0;
    for (row, rule) in policies.rules().iter().enumerate() {
        if !rule.is_credit_limit() {
            continue;
        }
        credit_limit_rows += 1;
        if rule.condition.is_malformed() {
            issues.push(DataQualityIssue::MalformedPolicyCondition {
                row,
                condition: rule.condition.to_string(),
            });
        }
    }
    if credit_limit_rows == 0 {
        issues.push(DataQualityIssue::MissingCreditLimits);
    }

    issues
}
