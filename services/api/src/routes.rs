use crate::infra::AppState;
use attendance_geofence::attendance::{attendance_router, AttendanceRepository, AttendanceService};
use attendance_geofence::geofence::{geofence_router, EmployeeConfigProvider, GeofenceEvaluator};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) fn with_service_routes<S>(
    evaluator: Arc<GeofenceEvaluator<S>>,
    attendance: Arc<AttendanceService<S>>,
) -> axum::Router
where
    S: AttendanceRepository + EmployeeConfigProvider + 'static,
{
    geofence_router(evaluator)
        .merge(attendance_router(attendance))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryAttendanceStore;
    use attendance_geofence::geofence::{register_verdict_metrics, EmployeeId, GeofencePolicy};
    use axum::body::to_bytes;
    use axum::response::Response;
    use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusRecorder};
    use std::sync::atomic::AtomicBool;

    fn state(ready: bool, recorder: &PrometheusRecorder) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let recorder = PrometheusBuilder::new().build_recorder();

        let response = readiness_endpoint(Extension(state(false, &recorder)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(body_text(response).await.contains("initializing"));

        let response = readiness_endpoint(Extension(state(true, &recorder)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_export_verdicts_recorded_by_the_evaluator() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let evaluator = GeofenceEvaluator::new(
            Arc::new(InMemoryAttendanceStore::default()),
            GeofencePolicy::default(),
        );
        metrics::with_local_recorder(&recorder, || {
            register_verdict_metrics();
            evaluator.evaluate(&EmployeeId::new("5215550001"), f64::NAN, -99.1332);
            evaluator.evaluate(&EmployeeId::new("5215550001"), f64::NAN, -99.1332);
            evaluator.evaluate(&EmployeeId::new("5215550002"), 19.4326, -99.1332);
        });

        let response = metrics_endpoint(Extension(state(true, &recorder)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert!(body.contains("# TYPE geofence_verdicts_total counter"));
        assert!(body.contains("geofence_verdicts_total{reason_code=\"VALIDATION_ERROR\"} 2"));
        assert!(body.contains("geofence_verdicts_total{reason_code=\"NO_CONFIG\"} 1"));
        assert!(body.contains("geofence_verdicts_total{reason_code=\"OUTSIDE_AREA\"} 0"));
    }
}
