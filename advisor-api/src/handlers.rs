//! API request handlers

use advisor_core::{
    audit_catalog, validate_cgpa as parse_cgpa, validate_cgpa_value, validate_prerequisite_list,
    CgpaValidationRequest, CgpaValidationResponse, CreditLimitResponse, DataQualityIssue,
    Eligibility, EligibilityRequest, EligibilityResponse, PrerequisiteValidationRequest,
    PrerequisiteValidationResponse, RecommendationRequest, Semester, StudentFact,
};
use advisor_engine::{check_course, resolve_credit_limit, AdvisingEngine};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreditLimitQuery {
    pub cgpa: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IssueReport {
    pub message: String,
    #[serde(flatten)]
    pub issue: DataQualityIssue,
}

// ==================== Catalog Handlers ====================

/// List all courses in catalog order
pub async fn list_courses(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot().await;
    Json(snapshot.catalog.courses().to_vec())
}

/// Get a course by code
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.snapshot().await;

    match snapshot.catalog.get(&code) {
        Some(course) => Ok(Json(course.clone())),
        None => Err(ApiError::NotFound(format!("Course {} not found", code))),
    }
}

/// Get the prerequisite codes of a course
pub async fn get_prerequisites(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.snapshot().await;

    if !snapshot.catalog.contains(&code) {
        return Err(ApiError::NotFound(format!("Course {} not found", code)));
    }

    Ok(Json(serde_json::json!({
        "course_code": code,
        "prerequisites": snapshot.catalog.prerequisites_of(&code),
    })))
}

/// Check whether a student can take one course this semester
pub async fn check_eligibility(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    payload: Result<Json<EligibilityRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let snapshot = state.snapshot().await;
    let passed: BTreeSet<String> = req.passed_courses.into_iter().collect();

    let eligibility = check_course(&snapshot.catalog, &code, &passed, req.semester);
    if eligibility == Eligibility::NotFound {
        return Err(ApiError::NotFound(eligibility.reason(&code)));
    }

    Ok(Json(EligibilityResponse {
        valid: eligibility.is_eligible(),
        reason: eligibility.reason(&code),
        course_code: code,
        eligibility,
    }))
}

/// Data-quality problems in the current catalog and policy table
pub async fn catalog_issues(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot().await;
    let issues: Vec<IssueReport> = audit_catalog(&snapshot.catalog, &snapshot.policies)
        .into_iter()
        .map(|issue| IssueReport {
            message: issue.to_string(),
            issue,
        })
        .collect();
    Json(issues)
}

/// Re-read the catalog source
pub async fn reload_catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.reload().await;

    tracing::info!(
        "Reloaded catalog from {}: {} courses, {} policies",
        state.source.describe(),
        snapshot.catalog.len(),
        snapshot.policies.len()
    );

    Json(serde_json::json!({
        "courses": snapshot.catalog.len(),
        "policies": snapshot.policies.len(),
    }))
}

// ==================== Policy Handlers ====================

/// List all policy rows in table order
pub async fn list_policies(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot().await;
    Json(snapshot.policies.rules().to_vec())
}

/// Resolve the credit ceiling for a CGPA
pub async fn credit_limit(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CreditLimitQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let raw = query
        .cgpa
        .ok_or_else(|| ApiError::BadRequest("missing query parameter 'cgpa'".to_string()))?;
    let cgpa = parse_cgpa(&raw)?;

    let snapshot = state.snapshot().await;
    let limit = resolve_credit_limit(cgpa, &snapshot.policies);
    if limit.is_default() {
        tracing::warn!("No credit limit policy matched CGPA {}; using default", cgpa);
    }

    Ok(Json(CreditLimitResponse {
        cgpa,
        max_credits: limit.max_credits,
        defaulted: limit.is_default(),
    }))
}

// ==================== Recommendation Handlers ====================

/// Recommend courses for a student
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let cgpa = validate_cgpa_value(&req.cgpa)?;
    let fact = StudentFact::new(cgpa, req.semester)
        .with_passed(req.passed_courses)
        .with_failed(req.failed_courses);

    // One engine per request over the shared snapshot
    let snapshot = state.snapshot().await;
    let mut engine = AdvisingEngine::for_student(snapshot.catalog, snapshot.policies, fact)?;
    let recommendation = engine.run()?.clone();

    tracing::info!(
        "Recommended {} courses ({} of {} credits) for CGPA {} in {}",
        recommendation.courses.len(),
        recommendation.total_credits,
        recommendation.credit_limit,
        recommendation.cgpa,
        recommendation.semester
    );

    Ok(Json(recommendation))
}

/// Upcoming enrollment terms
pub async fn semester_options() -> impl IntoResponse {
    Json(Semester::current_options())
}

// ==================== Validation Handlers ====================

/// Validate a CGPA as entered by a student
pub async fn validate_cgpa(
    payload: Result<Json<CgpaValidationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let response = match validate_cgpa_value(&req.value) {
        Ok(cgpa) => CgpaValidationResponse {
            valid: true,
            cgpa: Some(cgpa),
            error: None,
        },
        Err(e) => CgpaValidationResponse {
            valid: false,
            cgpa: None,
            error: Some(e.to_string()),
        },
    };
    Ok(Json(response))
}

/// Report prerequisite codes that are not in the catalog
pub async fn validate_prerequisites(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PrerequisiteValidationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let snapshot = state.snapshot().await;
    let unknown =
        validate_prerequisite_list(req.prerequisites.as_deref(), &snapshot.catalog.codes());
    Ok(Json(PrerequisiteValidationResponse { unknown }))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "course-advisor"
    }))
}
