//! Eligibility rules
//!
//! Each rule is a pure predicate over one course and the declared fact.
//! [`evaluate`] applies them as a fixed pipeline: the semester and
//! prerequisite filters (independent of each other), then credit
//! accumulation in catalog order.

use advisor_core::{Catalog, CourseRecord, Eligibility, Semester, StudentFact};
use std::collections::BTreeSet;

/// Semester-offered rule. Unrecognized designators never match.
pub fn offered_in(course: &CourseRecord, semester: Semester) -> bool {
    course.semester_offered.includes(semester)
}

/// Prerequisite rule: every prerequisite code has been passed.
pub fn prerequisites_met(course: &CourseRecord, passed: &BTreeSet<String>) -> bool {
    course.prerequisites.iter().all(|code| passed.contains(code))
}

fn missing_prerequisites(course: &CourseRecord, passed: &BTreeSet<String>) -> Vec<String> {
    course
        .prerequisites
        .iter()
        .filter(|code| !passed.contains(*code))
        .cloned()
        .collect()
}

/// Credit-accumulation rule.
///
/// Walks candidates in the given order and keeps each one whose credits
/// still fit under `max_credits`. A course that would overflow is skipped,
/// but later, smaller courses are still considered.
pub fn accumulate_credits<'a, I>(candidates: I, max_credits: u32) -> Vec<CourseRecord>
where
    I: IntoIterator<Item = &'a CourseRecord>,
{
    let mut total = 0u32;
    let mut accepted = Vec::new();
    for course in candidates {
        match total.checked_add(course.credit_hours) {
            Some(next) if next <= max_credits => {
                total = next;
                accepted.push(course.clone());
            }
            _ => {
                tracing::trace!(
                    course = %course.code,
                    credits = course.credit_hours,
                    total,
                    max_credits,
                    "Course does not fit under credit limit"
                );
            }
        }
    }
    accepted
}

/// Courses passing the semester and prerequisite rules, in catalog order.
pub fn available_courses<'a>(
    catalog: &'a Catalog,
    passed: &'a BTreeSet<String>,
    semester: Semester,
) -> impl Iterator<Item = &'a CourseRecord> + 'a {
    catalog
        .iter()
        .filter(move |course| offered_in(course, semester))
        .filter(move |course| prerequisites_met(course, passed))
}

/// Runs the full rule pipeline for a declared fact.
pub fn evaluate(fact: &StudentFact, catalog: &Catalog, max_credits: u32) -> Vec<CourseRecord> {
    accumulate_credits(
        available_courses(catalog, &fact.passed_courses, fact.semester),
        max_credits,
    )
}

/// Checks one course by code, reporting why it cannot be taken.
/// The semester rule is checked before prerequisites.
pub fn check_course(
    catalog: &Catalog,
    code: &str,
    passed: &BTreeSet<String>,
    semester: Semester,
) -> Eligibility {
    let Some(course) = catalog.get(code) else {
        return Eligibility::NotFound;
    };
    if !offered_in(course, semester) {
        return Eligibility::NotOffered {
            offered: course.semester_offered.clone(),
            semester,
        };
    }
    let missing = missing_prerequisites(course, passed);
    if !missing.is_empty() {
        return Eligibility::MissingPrerequisites { missing };
    }
    Eligibility::Eligible
}
