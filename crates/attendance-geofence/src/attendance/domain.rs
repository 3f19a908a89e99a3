use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geofence::{Coordinates, EmployeeId};

/// Longest user message kept in the activity log.
pub const ACTIVITY_MESSAGE_LIMIT: usize = 1000;
/// Longest bot reply kept in the activity log.
pub const ACTIVITY_REPLY_LIMIT: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceKind {
    Present,
    Absent,
    Support,
}

impl AttendanceKind {
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceKind::Present => "presence",
            AttendanceKind::Absent => "absence",
            AttendanceKind::Support => "support request",
        }
    }

    /// Kinds that claim the employee is on site and therefore go through the geofence.
    pub fn requires_location_check(&self) -> bool {
        matches!(self, AttendanceKind::Present | AttendanceKind::Support)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceId(pub u64);

/// Attendance request as collected by the conversation flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSubmission {
    pub employee_id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    pub kind: AttendanceKind,
    #[serde(default)]
    pub location: Option<Coordinates>,
}

/// Location attached to a stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceLocation {
    pub coordinates: Coordinates,
    pub address: Option<String>,
    pub captured_at: DateTime<Utc>,
}

/// Row handed to the store for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttendance {
    pub employee_id: EmployeeId,
    pub name: String,
    pub zone: String,
    pub service: String,
    pub kind: AttendanceKind,
    pub location: Option<AttendanceLocation>,
    pub recorded_at: DateTime<Utc>,
}

impl NewAttendance {
    pub(crate) fn from_submission(
        submission: AttendanceSubmission,
        address: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let location = submission.location.map(|coordinates| AttendanceLocation {
            coordinates,
            address,
            captured_at: now,
        });

        Self {
            employee_id: submission.employee_id,
            name: submission.name,
            zone: non_blank(submission.zone).unwrap_or_else(|| "N/A".to_string()),
            service: non_blank(submission.service).unwrap_or_else(|| "Unspecified".to_string()),
            kind: submission.kind,
            location,
            recorded_at: now,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Audit trail entry for a bot interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotActivity {
    pub employee_id: EmployeeId,
    pub action: String,
    pub message: Option<String>,
    pub reply: Option<String>,
    pub previous_state: Option<String>,
    pub next_state: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl BotActivity {
    pub fn new(employee_id: EmployeeId, action: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            employee_id,
            action: action.into(),
            message: None,
            reply: None,
            previous_state: None,
            next_state: None,
            recorded_at: at,
        }
    }

    pub fn with_exchange(mut self, message: Option<&str>, reply: Option<&str>) -> Self {
        self.message = message.map(|text| truncate_chars(text, ACTIVITY_MESSAGE_LIMIT));
        self.reply = reply.map(|text| truncate_chars(text, ACTIVITY_REPLY_LIMIT));
        self
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Whether an employee may register again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationWindow {
    pub allowed: bool,
    pub first_registration: bool,
    pub hours_elapsed: Option<i64>,
    pub last_registered_at: Option<DateTime<Utc>>,
}

/// Rows removed by a retention purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeSummary {
    pub attendance_records: u64,
    pub activity_entries: u64,
}

impl PurgeSummary {
    pub fn total(&self) -> u64 {
        self.attendance_records + self.activity_entries
    }
}
