use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAttendanceStore};
use crate::routes::with_service_routes;
use attendance_geofence::attendance::AttendanceService;
use attendance_geofence::config::AppConfig;
use attendance_geofence::error::AppError;
use attendance_geofence::geocoding::GeocoderChain;
use attendance_geofence::geofence::{register_verdict_metrics, GeofenceEvaluator};
use attendance_geofence::roster::EmployeeRosterImporter;
use attendance_geofence::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(roster) = args.roster.take() {
        config.employee_roster = Some(roster);
    }

    telemetry::init(&config.telemetry)?;

    let employees = match &config.employee_roster {
        Some(path) => EmployeeRosterImporter::from_path(path)?,
        None => {
            warn!("APP_EMPLOYEE_ROSTER not set; every employee will resolve to NO_CONFIG");
            Vec::new()
        }
    };
    let store = Arc::new(InMemoryAttendanceStore::seeded(employees));
    info!(employees = store.employee_count(), "employee roster loaded");

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    register_verdict_metrics();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let evaluator = Arc::new(GeofenceEvaluator::new(
        Arc::clone(&store),
        config.geofence.clone(),
    ));
    let attendance = Arc::new(AttendanceService::new(
        store,
        Arc::clone(&evaluator),
        GeocoderChain::default(),
        config.attendance.clone(),
    ));
    spawn_retention_purge(Arc::clone(&attendance));

    let app = with_service_routes(evaluator, attendance)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "attendance geofence service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn spawn_retention_purge(service: Arc<AttendanceService<InMemoryAttendanceStore>>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            if let Err(err) = service.purge_expired(Utc::now()) {
                warn!(error = %err, "retention purge failed");
            }
        }
    });
}
