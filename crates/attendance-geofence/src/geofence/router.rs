use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Coordinates, EmployeeGeoConfig, EmployeeId, GeofenceVerdict};
use super::evaluator::GeofenceEvaluator;
use super::messages::render_verdict;
use super::provider::EmployeeConfigProvider;

/// Location report submitted by a channel adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub employee_id: EmployeeId,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub verdict: GeofenceVerdict,
    pub message: String,
}

/// Sanitized view of an employee's geofence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceConfigView {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub zone: Option<String>,
    pub geofencing_enabled: bool,
    pub work_anchor: Option<Coordinates>,
    pub allowed_radius_meters: u32,
    pub work_address_label: Option<String>,
    pub location_notes: Option<String>,
}

impl GeofenceConfigView {
    pub fn from_config(config: EmployeeGeoConfig, default_radius: u32) -> Self {
        let allowed_radius_meters = config.resolved_radius(default_radius);
        Self {
            employee_id: config.employee_id,
            full_name: config.full_name,
            zone: config.zone,
            geofencing_enabled: config.geofencing_enabled,
            work_anchor: config.work_anchor,
            allowed_radius_meters,
            work_address_label: config.work_address_label,
            location_notes: config.location_notes,
        }
    }
}

/// Router exposing verdicts and configuration lookups over HTTP.
pub fn geofence_router<P>(evaluator: Arc<GeofenceEvaluator<P>>) -> Router
where
    P: EmployeeConfigProvider + 'static,
{
    Router::new()
        .route("/api/v1/geofence/evaluate", post(evaluate_handler::<P>))
        .route(
            "/api/v1/employees/:employee_id/geofence",
            get(config_handler::<P>),
        )
        .with_state(evaluator)
}

pub(crate) async fn evaluate_handler<P>(
    State(evaluator): State<Arc<GeofenceEvaluator<P>>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    P: EmployeeConfigProvider + 'static,
{
    let verdict = evaluator.evaluate(&request.employee_id, request.latitude, request.longitude);
    let display_name = request
        .display_name
        .or_else(|| verdict.employee_name.clone())
        .unwrap_or_else(|| request.employee_id.to_string());
    let message = render_verdict(&verdict, &display_name);

    (StatusCode::OK, axum::Json(EvaluateResponse { verdict, message })).into_response()
}

pub(crate) async fn config_handler<P>(
    State(evaluator): State<Arc<GeofenceEvaluator<P>>>,
    Path(employee_id): Path<String>,
) -> Response
where
    P: EmployeeConfigProvider + 'static,
{
    let id = EmployeeId(employee_id);
    match evaluator.employee_config(&id) {
        Ok(Some(config)) => {
            let view =
                GeofenceConfigView::from_config(config, evaluator.policy().default_radius_meters);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Ok(None) => {
            let payload = json!({
                "error": "employee not found",
                "employee_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
