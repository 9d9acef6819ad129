//! Course Advisor API Server
//!
//! REST API for browsing the catalog, validating input, and requesting
//! course recommendations.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::{Config, StorageType};
pub use error::ApiError;
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/api/courses", get(handlers::list_courses))
        .route("/api/courses/:code", get(handlers::get_course))
        .route("/api/courses/:code/prerequisites", get(handlers::get_prerequisites))
        .route("/api/courses/:code/eligibility", post(handlers::check_eligibility))
        .route("/api/catalog/issues", get(handlers::catalog_issues))
        .route("/api/catalog/reload", post(handlers::reload_catalog))
        // Policies
        .route("/api/policies", get(handlers::list_policies))
        .route("/api/credit-limit", get(handlers::credit_limit))
        // Recommendation
        .route("/api/recommendations", post(handlers::recommend))
        .route("/api/semesters", get(handlers::semester_options))
        // Validation
        .route("/api/validate/cgpa", post(handlers::validate_cgpa))
        .route("/api/validate/prerequisites", post(handlers::validate_prerequisites))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
