use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::AttendanceSubmission;
use super::repository::AttendanceRepository;
use super::service::{AttendanceService, RegistrationOutcome};
use crate::geofence::EmployeeConfigProvider;

/// Router exposing the registration flow to channel adapters.
pub fn attendance_router<S>(service: Arc<AttendanceService<S>>) -> Router
where
    S: AttendanceRepository + EmployeeConfigProvider + 'static,
{
    Router::new()
        .route("/api/v1/attendance", post(register_handler::<S>))
        .with_state(service)
}

pub(crate) async fn register_handler<S>(
    State(service): State<Arc<AttendanceService<S>>>,
    axum::Json(submission): axum::Json<AttendanceSubmission>,
) -> Response
where
    S: AttendanceRepository + EmployeeConfigProvider + 'static,
{
    match service.register(submission, Utc::now()) {
        Ok(outcome) => {
            let status = match &outcome {
                RegistrationOutcome::Registered { .. } => StatusCode::CREATED,
                RegistrationOutcome::Rejected { .. } => StatusCode::FORBIDDEN,
                RegistrationOutcome::CoolingDown { .. } => StatusCode::TOO_MANY_REQUESTS,
            };
            (status, axum::Json(outcome)).into_response()
        }
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
