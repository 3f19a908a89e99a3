use chrono::{DateTime, Utc};

use super::domain::{AttendanceId, BotActivity, NewAttendance, PurgeSummary};
use crate::geofence::EmployeeId;
use crate::store::StoreError;

/// Typed write/read operations the registration flow needs from the store.
pub trait AttendanceRepository: Send + Sync {
    fn save_attendance(&self, record: NewAttendance) -> Result<AttendanceId, StoreError>;
    fn last_registration(&self, employee_id: &EmployeeId)
        -> Result<Option<DateTime<Utc>>, StoreError>;
    fn touch_registration(&self, employee_id: &EmployeeId, at: DateTime<Utc>)
        -> Result<(), StoreError>;
    fn log_activity(&self, activity: BotActivity) -> Result<(), StoreError>;
    /// Delete attendance records and activity entries older than `cutoff`.
    fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<PurgeSummary, StoreError>;
}
