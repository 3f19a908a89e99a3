use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::attendance::domain::{AttendanceId, BotActivity, NewAttendance, PurgeSummary};
use crate::attendance::domain::{AttendanceKind, AttendanceSubmission};
use crate::attendance::repository::AttendanceRepository;
use crate::attendance::service::AttendanceService;
use crate::attendance::settings::AttendanceSettings;
use crate::geocoding::GeocoderChain;
use crate::geofence::{
    Coordinates, EmployeeConfigProvider, EmployeeGeoConfig, EmployeeId, GeofenceEvaluator,
    GeofencePolicy,
};
use crate::store::StoreError;

pub(super) const SITE: Coordinates = Coordinates {
    latitude: 19.4326,
    longitude: -99.1332,
};

pub(super) fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn anchored_employee(id: &str) -> EmployeeGeoConfig {
    EmployeeGeoConfig {
        employee_id: EmployeeId::new(id),
        full_name: "Ana Torres".to_string(),
        zone: Some("Centro".to_string()),
        geofencing_enabled: true,
        work_anchor: Some(SITE),
        allowed_radius_meters: Some(300),
        work_address_label: Some("Zócalo valet stand".to_string()),
        location_notes: None,
    }
}

pub(super) fn submission(
    id: &str,
    kind: AttendanceKind,
    location: Option<Coordinates>,
) -> AttendanceSubmission {
    AttendanceSubmission {
        employee_id: EmployeeId::new(id),
        name: "Ana Torres".to_string(),
        zone: Some("Centro".to_string()),
        service: None,
        kind,
        location,
    }
}

#[derive(Default)]
pub(super) struct MemoryState {
    pub(super) employees: HashMap<EmployeeId, EmployeeGeoConfig>,
    pub(super) records: Vec<(AttendanceId, NewAttendance)>,
    pub(super) control: HashMap<EmployeeId, DateTime<Utc>>,
    pub(super) activity: Vec<BotActivity>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) state: Arc<Mutex<MemoryState>>,
    pub(super) control_offline: bool,
    pub(super) writes_offline: bool,
}

impl MemoryStore {
    pub(super) fn with_employee(self, config: EmployeeGeoConfig) -> Self {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .employees
            .insert(config.employee_id.clone(), config);
        self
    }

    pub(super) fn records(&self) -> Vec<(AttendanceId, NewAttendance)> {
        self.state.lock().expect("store mutex poisoned").records.clone()
    }

    pub(super) fn activity(&self) -> Vec<BotActivity> {
        self.state.lock().expect("store mutex poisoned").activity.clone()
    }

    pub(super) fn control(&self, id: &str) -> Option<DateTime<Utc>> {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .control
            .get(&EmployeeId::new(id))
            .copied()
    }
}

impl EmployeeConfigProvider for MemoryStore {
    fn employee_config(&self, id: &EmployeeId) -> Result<Option<EmployeeGeoConfig>, StoreError> {
        Ok(self
            .state
            .lock()
            .expect("store mutex poisoned")
            .employees
            .get(id)
            .cloned())
    }
}

impl AttendanceRepository for MemoryStore {
    fn save_attendance(&self, record: NewAttendance) -> Result<AttendanceId, StoreError> {
        if self.writes_offline {
            return Err(StoreError::Unavailable("database offline".to_string()));
        }
        let mut guard = self.state.lock().expect("store mutex poisoned");
        let id = AttendanceId(guard.records.len() as u64 + 1);
        guard.records.push((id, record));
        Ok(id)
    }

    fn last_registration(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        if self.control_offline {
            return Err(StoreError::Unavailable("control table locked".to_string()));
        }
        let guard = self.state.lock().expect("store mutex poisoned");
        Ok(guard.control.get(employee_id).copied())
    }

    fn touch_registration(
        &self,
        employee_id: &EmployeeId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if self.control_offline {
            return Err(StoreError::Unavailable("control table locked".to_string()));
        }
        let mut guard = self.state.lock().expect("store mutex poisoned");
        guard.control.insert(employee_id.clone(), at);
        Ok(())
    }

    fn log_activity(&self, activity: BotActivity) -> Result<(), StoreError> {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .activity
            .push(activity);
        Ok(())
    }

    fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<PurgeSummary, StoreError> {
        let mut guard = self.state.lock().expect("store mutex poisoned");
        let records_before = guard.records.len();
        guard.records.retain(|(_, record)| record.recorded_at >= cutoff);
        let activity_before = guard.activity.len();
        guard.activity.retain(|entry| entry.recorded_at >= cutoff);
        Ok(PurgeSummary {
            attendance_records: (records_before - guard.records.len()) as u64,
            activity_entries: (activity_before - guard.activity.len()) as u64,
        })
    }
}

pub(super) fn build_service(
    store: MemoryStore,
) -> (AttendanceService<MemoryStore>, Arc<MemoryStore>) {
    build_service_with(store, AttendanceSettings::default())
}

pub(super) fn build_service_with(
    store: MemoryStore,
    settings: AttendanceSettings,
) -> (AttendanceService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(store);
    let evaluator = Arc::new(GeofenceEvaluator::new(
        Arc::clone(&store),
        GeofencePolicy::default(),
    ));
    let service = AttendanceService::new(
        Arc::clone(&store),
        evaluator,
        GeocoderChain::default(),
        settings,
    );
    (service, store)
}
