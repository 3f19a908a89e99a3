use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;

use crate::geofence::distance::spherical_cosine_meters;
use crate::geofence::domain::{Coordinates, EmployeeGeoConfig, EmployeeId, ReasonCode};
use crate::geofence::evaluator::GeofenceEvaluator;
use crate::geofence::policy::GeofencePolicy;
use crate::geofence::provider::EmployeeConfigProvider;
use crate::store::StoreError;

pub(super) const ANCHOR: Coordinates = Coordinates {
    latitude: 19.4326,
    longitude: -99.1332,
};

/// Degrees of latitude spanning one kilometer on the 6,371 km sphere.
pub(super) const ONE_KM_LATITUDE: f64 = 0.008_993_216;

pub(super) fn employee(id: &str) -> EmployeeId {
    EmployeeId::new(id)
}

pub(super) fn anchored_config(id: &str, radius: Option<i64>) -> EmployeeGeoConfig {
    EmployeeGeoConfig {
        employee_id: employee(id),
        full_name: "Ana Torres".to_string(),
        zone: Some("Centro".to_string()),
        geofencing_enabled: true,
        work_anchor: Some(ANCHOR),
        allowed_radius_meters: radius,
        work_address_label: Some("Zócalo valet stand".to_string()),
        location_notes: None,
    }
}

pub(super) fn one_km_north() -> Coordinates {
    Coordinates::new(ANCHOR.latitude + ONE_KM_LATITUDE, ANCHOR.longitude)
}

#[derive(Debug, Clone, Copy)]
pub(super) enum StoreDistance {
    Unsupported,
    LawOfCosines,
    Failing,
    Fixed(f64),
}

#[derive(Clone)]
pub(super) struct MemoryProvider {
    configs: Arc<Mutex<HashMap<EmployeeId, EmployeeGeoConfig>>>,
    distance: StoreDistance,
    distance_calls: Arc<Mutex<usize>>,
}

impl MemoryProvider {
    pub(super) fn new(distance: StoreDistance) -> Self {
        Self {
            configs: Arc::new(Mutex::new(HashMap::new())),
            distance,
            distance_calls: Arc::new(Mutex::new(0)),
        }
    }

    pub(super) fn with(self, config: EmployeeGeoConfig) -> Self {
        self.configs
            .lock()
            .expect("provider mutex poisoned")
            .insert(config.employee_id.clone(), config);
        self
    }

    pub(super) fn distance_calls(&self) -> usize {
        *self.distance_calls.lock().expect("counter mutex poisoned")
    }
}

impl EmployeeConfigProvider for MemoryProvider {
    fn employee_config(&self, id: &EmployeeId) -> Result<Option<EmployeeGeoConfig>, StoreError> {
        let guard = self.configs.lock().expect("provider mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn store_distance(&self, from: Coordinates, to: Coordinates) -> Result<f64, StoreError> {
        *self.distance_calls.lock().expect("counter mutex poisoned") += 1;
        match self.distance {
            StoreDistance::Unsupported => Err(StoreError::Unsupported("store-side distance")),
            StoreDistance::LawOfCosines => Ok(spherical_cosine_meters(from, to)),
            StoreDistance::Failing => Err(StoreError::Query(
                "FUNCTION calcular_distancia_metros does not exist".to_string(),
            )),
            StoreDistance::Fixed(value) => Ok(value),
        }
    }
}

pub(super) struct UnavailableProvider;

impl EmployeeConfigProvider for UnavailableProvider {
    fn employee_config(&self, _id: &EmployeeId) -> Result<Option<EmployeeGeoConfig>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn evaluator(provider: MemoryProvider) -> GeofenceEvaluator<MemoryProvider> {
    GeofenceEvaluator::new(Arc::new(provider), GeofencePolicy::default())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Run `f` against a private Prometheus recorder and return its rendered exposition.
pub(super) fn with_recorded_metrics<T>(f: impl FnOnce() -> T) -> (T, String) {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let value = metrics::with_local_recorder(&recorder, f);
    (value, handle.render())
}

pub(super) fn verdict_total(rendered: &str, code: ReasonCode) -> Option<u64> {
    let prefix = format!("geofence_verdicts_total{{reason_code=\"{code}\"}} ");
    rendered
        .lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .and_then(|value| value.trim().parse().ok())
}
