use serde::{Deserialize, Serialize};

/// Longest retention window accepted from configuration.
pub const MAX_RETENTION_DAYS: u32 = 3650;

/// Registration pacing and retention knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSettings {
    pub cooldown_hours: u32,
    pub retention_days: u32,
}

impl Default for AttendanceSettings {
    fn default() -> Self {
        Self {
            cooldown_hours: 6,
            retention_days: 90,
        }
    }
}
