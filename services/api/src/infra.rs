use attendance_geofence::attendance::{
    AttendanceId, AttendanceRepository, BotActivity, NewAttendance, PurgeSummary,
};
use attendance_geofence::geofence::{
    spherical_cosine_meters, Coordinates, EmployeeConfigProvider, EmployeeGeoConfig, EmployeeId,
};
use attendance_geofence::store::StoreError;
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct StoreTables {
    employees: HashMap<EmployeeId, EmployeeGeoConfig>,
    attendance: Vec<(AttendanceId, NewAttendance)>,
    registration_control: HashMap<EmployeeId, DateTime<Utc>>,
    activity: Vec<BotActivity>,
    next_id: u64,
}

/// Process-local store standing in for the attendance database.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAttendanceStore {
    tables: Arc<Mutex<StoreTables>>,
}

impl InMemoryAttendanceStore {
    pub(crate) fn seeded(employees: Vec<EmployeeGeoConfig>) -> Self {
        let store = Self::default();
        if let Ok(mut tables) = store.tables.lock() {
            tables.employees = employees
                .into_iter()
                .map(|config| (config.employee_id.clone(), config))
                .collect();
        }
        store
    }

    pub(crate) fn employee_count(&self) -> usize {
        self.tables
            .lock()
            .map(|tables| tables.employees.len())
            .unwrap_or_default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, StoreTables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl EmployeeConfigProvider for InMemoryAttendanceStore {
    fn employee_config(&self, id: &EmployeeId) -> Result<Option<EmployeeGeoConfig>, StoreError> {
        Ok(self.tables()?.employees.get(id).cloned())
    }

    fn store_distance(&self, from: Coordinates, to: Coordinates) -> Result<f64, StoreError> {
        Ok(spherical_cosine_meters(from, to))
    }
}

impl AttendanceRepository for InMemoryAttendanceStore {
    fn save_attendance(&self, record: NewAttendance) -> Result<AttendanceId, StoreError> {
        let mut tables = self.tables()?;
        tables.next_id += 1;
        let id = AttendanceId(tables.next_id);
        tables.attendance.push((id, record));
        Ok(id)
    }

    fn last_registration(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self
            .tables()?
            .registration_control
            .get(employee_id)
            .copied())
    }

    fn touch_registration(
        &self,
        employee_id: &EmployeeId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.tables()?
            .registration_control
            .insert(employee_id.clone(), at);
        Ok(())
    }

    fn log_activity(&self, activity: BotActivity) -> Result<(), StoreError> {
        self.tables()?.activity.push(activity);
        Ok(())
    }

    fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<PurgeSummary, StoreError> {
        let mut tables = self.tables()?;
        let attendance_before = tables.attendance.len();
        tables
            .attendance
            .retain(|(_, record)| record.recorded_at >= cutoff);
        let activity_before = tables.activity.len();
        tables.activity.retain(|entry| entry.recorded_at >= cutoff);

        Ok(PurgeSummary {
            attendance_records: (attendance_before - tables.attendance.len()) as u64,
            activity_entries: (activity_before - tables.activity.len()) as u64,
        })
    }
}
