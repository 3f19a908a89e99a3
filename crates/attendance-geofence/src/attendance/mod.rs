//! Attendance registration: cooldown pacing, the geofence gate, address lookup,
//! persistence and retention.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
mod settings;

#[cfg(test)]
mod tests;

pub use domain::{
    AttendanceId, AttendanceKind, AttendanceLocation, AttendanceSubmission, BotActivity,
    NewAttendance, PurgeSummary, RegistrationWindow,
};
pub use repository::AttendanceRepository;
pub use router::attendance_router;
pub use service::{AttendanceService, AttendanceServiceError, RegistrationOutcome};
pub use settings::{AttendanceSettings, MAX_RETENTION_DAYS};
