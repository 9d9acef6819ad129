//! BDD harness for the advising engine
//!
//! Run with: cargo test --test bdd -p advisor-engine

use advisor_core::{
    split_code_list, Catalog, CourseRecord, Offering, PolicyTable, Recommendation, Semester,
    StudentFact,
};
use advisor_engine::{AdvisingEngine, DEFAULT_CREDIT_LIMIT};
use cucumber::{given, then, when, World};
use std::sync::Arc;

/// World state shared across steps
#[derive(Debug, Default, World)]
pub struct AdvisorWorld {
    /// Catalog built up by the scenario, in declaration order
    courses: Vec<CourseRecord>,

    policies: PolicyTable,

    /// Result of the last engine run
    result: Option<Recommendation>,
}

impl AdvisorWorld {
    fn offered_count(&self, offering: &Offering) -> usize {
        self.courses
            .iter()
            .filter(|c| &c.semester_offered == offering)
            .count()
    }

    fn advise(&mut self, fact: StudentFact) {
        let catalog = Arc::new(Catalog::new(self.courses.clone()));
        let policies = Arc::new(self.policies.clone());
        let mut engine =
            AdvisingEngine::for_student(catalog, policies, fact).expect("Failed to declare fact");
        self.result = Some(engine.run().expect("Engine run failed").clone());
    }

    fn result(&self) -> &Recommendation {
        self.result.as_ref().expect("No recommendation has been made")
    }
}

// ==================== GIVEN Steps ====================

#[given("the reference credit policy")]
fn reference_policy(world: &mut AdvisorWorld) {
    world.policies = PolicyTable::reference();
}

#[given("a policy table without credit limits")]
fn no_credit_limits(world: &mut AdvisorWorld) {
    world.policies = PolicyTable::default();
}

#[given(expr = "the course {word} offered in {word} worth {int} credits")]
fn course_exists(world: &mut AdvisorWorld, code: String, offered: String, credits: u32) {
    world
        .courses
        .push(CourseRecord::new(code.clone(), code, credits, Offering::parse(&offered)));
}

#[given(expr = "the course {word} offered in {word} worth {int} credits requiring {word}")]
fn course_with_prerequisites(
    world: &mut AdvisorWorld,
    code: String,
    offered: String,
    credits: u32,
    prerequisites: String,
) {
    world.courses.push(
        CourseRecord::new(code.clone(), code, credits, Offering::parse(&offered))
            .with_prerequisites(split_code_list(&prerequisites)),
    );
}

#[given(expr = "{int} courses offered in {word} worth {int} credits each")]
fn many_courses(world: &mut AdvisorWorld, count: usize, offered: String, credits: u32) {
    let offering = Offering::parse(&offered);
    let start = world.offered_count(&offering);
    for i in start + 1..=start + count {
        let code = format!("{}{}", offering, 100 + i);
        world
            .courses
            .push(CourseRecord::new(code.clone(), code, credits, offering.clone()));
    }
}

// ==================== WHEN Steps ====================

#[when(expr = "a student with CGPA {float} asks for {word} courses")]
fn student_asks(world: &mut AdvisorWorld, cgpa: f64, semester: String) {
    let semester: Semester = semester.parse().expect("Unknown semester");
    world.advise(StudentFact::new(cgpa, semester));
}

#[when(expr = "a student with CGPA {float} who passed {word} asks for {word} courses")]
fn student_with_history_asks(
    world: &mut AdvisorWorld,
    cgpa: f64,
    passed: String,
    semester: String,
) {
    let semester: Semester = semester.parse().expect("Unknown semester");
    world.advise(StudentFact::new(cgpa, semester).with_passed(split_code_list(&passed)));
}

// ==================== THEN Steps ====================

#[then(expr = "the recommended courses are {string}")]
fn recommended_are(world: &mut AdvisorWorld, expected: String) {
    assert_eq!(world.result().codes(), split_code_list(&expected));
}

#[then(expr = "{int} courses are recommended")]
fn recommended_count(world: &mut AdvisorWorld, count: usize) {
    assert_eq!(world.result().courses.len(), count);
}

#[then(expr = "the credit limit is {int}")]
fn credit_limit_is(world: &mut AdvisorWorld, limit: u32) {
    assert_eq!(world.result().credit_limit, limit);
}

#[then("the credit limit is the default")]
fn credit_limit_is_default(world: &mut AdvisorWorld) {
    let result = world.result();
    assert!(result.credit_limit_defaulted);
    assert_eq!(result.credit_limit, DEFAULT_CREDIT_LIMIT);
}

#[then("the total credits do not exceed the credit limit")]
fn within_credit_limit(world: &mut AdvisorWorld) {
    let result = world.result();
    let total: u32 = result.courses.iter().map(|c| c.credit_hours).sum();
    assert_eq!(total, result.total_credits);
    assert!(total <= result.credit_limit);
}

#[tokio::main]
async fn main() {
    AdvisorWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("tests/features")
        .await;
}
