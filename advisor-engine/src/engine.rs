//! Advising engine lifecycle
//!
//! An engine is bound to one catalog and policy snapshot for its lifetime
//! and moves through `Uninitialized → Reset → FactsDeclared → RunComplete`.
//! A fresh `reset()` is required before each request's fact is declared.

use advisor_core::{
    check_cgpa_range, Catalog, CourseRecord, PolicyTable, Recommendation, StudentFact,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::credit::{resolve_credit_limit, CreditLimit};
use crate::rules;
use crate::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Uninitialized,
    Reset,
    FactsDeclared,
    RunComplete,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Reset => "reset",
            EngineState::FactsDeclared => "facts-declared",
            EngineState::RunComplete => "run-complete",
        };
        f.write_str(name)
    }
}

/// Forward-chaining course advisor over a shared catalog and policy table
pub struct AdvisingEngine {
    catalog: Arc<Catalog>,
    policies: Arc<PolicyTable>,
    state: EngineState,
    fact: Option<StudentFact>,
    result: Option<Recommendation>,
}

impl AdvisingEngine {
    pub fn new(catalog: Arc<Catalog>, policies: Arc<PolicyTable>) -> Self {
        Self {
            catalog,
            policies,
            state: EngineState::Uninitialized,
            fact: None,
            result: None,
        }
    }

    /// Builds an engine and declares `fact` on a fresh reset, ready to run.
    pub fn for_student(
        catalog: Arc<Catalog>,
        policies: Arc<PolicyTable>,
        fact: StudentFact,
    ) -> Result<Self, EngineError> {
        let mut engine = Self::new(catalog, policies);
        engine.reset();
        engine.declare(fact)?;
        Ok(engine)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn fact(&self) -> Option<&StudentFact> {
        self.fact.as_ref()
    }

    /// Clears the declared fact and any previous result.
    pub fn reset(&mut self) {
        self.fact = None;
        self.result = None;
        self.state = EngineState::Reset;
    }

    /// Declares the student fact for this request.
    ///
    /// Only one fact may be declared per reset. The CGPA must be a finite
    /// value in [0.0, 4.0].
    pub fn declare(&mut self, fact: StudentFact) -> Result<(), EngineError> {
        match self.state {
            EngineState::Reset => {}
            EngineState::FactsDeclared => return Err(EngineError::FactAlreadyDeclared),
            state => return Err(EngineError::NotReset(state)),
        }
        check_cgpa_range(fact.cgpa)?;

        tracing::debug!(
            cgpa = fact.cgpa,
            semester = %fact.semester,
            passed = fact.passed_courses.len(),
            "Declared student fact"
        );
        self.fact = Some(fact);
        self.state = EngineState::FactsDeclared;
        Ok(())
    }

    /// Resolves the credit ceiling and evaluates every rule over the
    /// catalog. Running again before the next reset yields the same
    /// courses.
    pub fn run(&mut self) -> Result<&Recommendation, EngineError> {
        let fact = match (self.state, self.fact.as_ref()) {
            (EngineState::FactsDeclared | EngineState::RunComplete, Some(fact)) => fact,
            _ => return Err(EngineError::NoFactDeclared),
        };

        let limit = resolve_credit_limit(fact.cgpa, &self.policies);
        if limit.is_default() {
            tracing::warn!(
                cgpa = fact.cgpa,
                default = limit.max_credits,
                "No credit limit policy matched; using default"
            );
        }

        let courses = rules::evaluate(fact, &self.catalog, limit.max_credits);
        let recommendation =
            Recommendation::new(fact, limit.max_credits, limit.is_default(), courses);

        tracing::debug!(
            recommended = recommendation.courses.len(),
            total_credits = recommendation.total_credits,
            credit_limit = recommendation.credit_limit,
            catalog_size = self.catalog.len(),
            "Engine run complete"
        );

        self.state = EngineState::RunComplete;
        Ok(&*self.result.insert(recommendation))
    }

    /// Courses chosen by the last run, in catalog order
    pub fn recommended_courses(&self) -> Result<&[CourseRecord], EngineError> {
        self.recommendation().map(|r| r.courses.as_slice())
    }

    pub fn recommendation(&self) -> Result<&Recommendation, EngineError> {
        match (self.state, self.result.as_ref()) {
            (EngineState::RunComplete, Some(result)) => Ok(result),
            (state, _) => Err(EngineError::NotRun(state)),
        }
    }

    /// Credit ceiling for the declared fact
    pub fn credit_limit(&self) -> Result<CreditLimit, EngineError> {
        let fact = self.fact.as_ref().ok_or(EngineError::NoFactDeclared)?;
        Ok(resolve_credit_limit(fact.cgpa, &self.policies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Offering, Semester};

    fn reference_catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(vec![
            CourseRecord::new("MAT111", "Mathematics I", 3, Offering::Fall)
                .with_description("The calculus part covers functions"),
            CourseRecord::new("CSE014", "Structured Programming", 3, Offering::Fall)
                .with_description("Introduction to programming"),
            CourseRecord::new("CSE015", "Object Oriented Programming", 3, Offering::Spring)
                .with_description("OOP concepts")
                .with_prerequisites(["CSE014"]),
        ]))
    }

    fn engine() -> AdvisingEngine {
        AdvisingEngine::new(reference_catalog(), Arc::new(PolicyTable::reference()))
    }

    fn codes(engine: &AdvisingEngine) -> Vec<String> {
        engine
            .recommended_courses()
            .unwrap()
            .iter()
            .map(|c| c.code.clone())
            .collect()
    }

    #[test]
    fn test_fall_student_without_history() {
        let mut engine = engine();
        engine.reset();
        engine.declare(StudentFact::new(3.5, Semester::Fall)).unwrap();
        engine.run().unwrap();

        assert_eq!(codes(&engine), vec!["MAT111", "CSE014"]);
        assert_eq!(engine.state(), EngineState::RunComplete);
    }

    #[test]
    fn test_spring_student_with_prerequisite() {
        let mut engine = engine();
        engine.reset();
        engine
            .declare(StudentFact::new(3.0, Semester::Spring).with_passed(["CSE014"]))
            .unwrap();
        let result = engine.run().unwrap();

        assert_eq!(result.codes(), vec!["CSE015"]);
        assert_eq!(result.credit_limit, 22);
        assert_eq!(result.total_credits, 3);
        assert!(!result.credit_limit_defaulted);
    }

    #[test]
    fn test_low_cgpa_stops_at_ceiling() {
        let catalog = Arc::new(
            (1..=5)
                .map(|i| CourseRecord::new(format!("FAL10{}", i), "Fall course", 4, Offering::Fall))
                .collect::<Catalog>(),
        );
        let mut engine = AdvisingEngine::for_student(
            catalog,
            Arc::new(PolicyTable::reference()),
            StudentFact::new(1.8, Semester::Fall),
        )
        .unwrap();
        let result = engine.run().unwrap();

        assert_eq!(result.credit_limit, 12);
        assert_eq!(result.codes(), vec!["FAL101", "FAL102", "FAL103"]);
        assert_eq!(result.total_credits, 12);
    }

    #[test]
    fn test_run_is_idempotent() {
        let mut engine = engine();
        engine.reset();
        engine.declare(StudentFact::new(2.5, Semester::Fall)).unwrap();
        engine.run().unwrap();
        let first = codes(&engine);
        engine.run().unwrap();
        assert_eq!(codes(&engine), first);
    }

    #[test]
    fn test_declare_requires_reset() {
        let mut engine = engine();
        let err = engine.declare(StudentFact::new(3.0, Semester::Fall)).unwrap_err();
        assert!(matches!(err, EngineError::NotReset(EngineState::Uninitialized)));

        engine.reset();
        engine.declare(StudentFact::new(3.0, Semester::Fall)).unwrap();
        engine.run().unwrap();
        let err = engine.declare(StudentFact::new(2.0, Semester::Fall)).unwrap_err();
        assert!(matches!(err, EngineError::NotReset(EngineState::RunComplete)));
    }

    #[test]
    fn test_second_declare_is_rejected() {
        let mut engine = engine();
        engine.reset();
        engine.declare(StudentFact::new(3.0, Semester::Fall)).unwrap();
        let err = engine.declare(StudentFact::new(1.0, Semester::Spring)).unwrap_err();
        assert!(matches!(err, EngineError::FactAlreadyDeclared));
        assert_eq!(engine.fact().unwrap().cgpa, 3.0);
    }

    #[test]
    fn test_run_without_fact() {
        let mut engine = engine();
        assert!(matches!(engine.run(), Err(EngineError::NoFactDeclared)));
        engine.reset();
        assert!(matches!(engine.run(), Err(EngineError::NoFactDeclared)));
    }

    #[test]
    fn test_results_unavailable_before_run() {
        let mut engine = engine();
        engine.reset();
        engine.declare(StudentFact::new(3.0, Semester::Fall)).unwrap();
        assert!(matches!(
            engine.recommended_courses(),
            Err(EngineError::NotRun(EngineState::FactsDeclared))
        ));
    }

    #[test]
    fn test_reset_clears_previous_run() {
        let mut engine = engine();
        engine.reset();
        engine.declare(StudentFact::new(3.0, Semester::Fall)).unwrap();
        engine.run().unwrap();

        engine.reset();
        engine.reset();
        assert_eq!(engine.state(), EngineState::Reset);
        assert!(engine.fact().is_none());
        assert!(engine.recommended_courses().is_err());

        engine
            .declare(StudentFact::new(3.0, Semester::Spring).with_passed(["CSE014"]))
            .unwrap();
        engine.run().unwrap();
        assert_eq!(codes(&engine), vec!["CSE015"]);
    }

    #[test]
    fn test_rejects_out_of_range_cgpa() {
        let mut engine = engine();
        engine.reset();
        let err = engine.declare(StudentFact::new(4.5, Semester::Fall)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFact(_)));
        assert_eq!(engine.state(), EngineState::Reset);

        let err = engine.declare(StudentFact::new(f64::NAN, Semester::Fall)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFact(_)));
    }

    #[test]
    fn test_empty_catalog_yields_empty_recommendation() {
        let mut engine = AdvisingEngine::for_student(
            Arc::new(Catalog::default()),
            Arc::new(PolicyTable::reference()),
            StudentFact::new(3.0, Semester::Fall),
        )
        .unwrap();
        let result = engine.run().unwrap();
        assert!(result.courses.is_empty());
        assert_eq!(result.total_credits, 0);
    }

    #[test]
    fn test_default_credit_limit_is_flagged() {
        let mut engine = AdvisingEngine::for_student(
            reference_catalog(),
            Arc::new(PolicyTable::default()),
            StudentFact::new(3.9, Semester::Fall),
        )
        .unwrap();
        assert!(engine.credit_limit().unwrap().is_default());
        let result = engine.run().unwrap();
        assert_eq!(result.credit_limit, 12);
        assert!(result.credit_limit_defaulted);
    }

    #[test]
    fn test_engines_share_snapshots() {
        let catalog = reference_catalog();
        let policies = Arc::new(PolicyTable::reference());

        let mut fall = AdvisingEngine::for_student(
            catalog.clone(),
            policies.clone(),
            StudentFact::new(3.5, Semester::Fall),
        )
        .unwrap();
        let mut spring = AdvisingEngine::for_student(
            catalog.clone(),
            policies,
            StudentFact::new(3.5, Semester::Spring).with_passed(["CSE014"]),
        )
        .unwrap();

        assert_eq!(fall.run().unwrap().codes(), vec!["MAT111", "CSE014"]);
        assert_eq!(spring.run().unwrap().codes(), vec!["CSE015"]);
        assert_eq!(Arc::strong_count(&catalog), 3);
    }
}
