use serde::{Deserialize, Serialize};
use std::fmt;

/// Radius applied when an employee has no positive radius configured.
pub const DEFAULT_ALLOWED_RADIUS_METERS: u32 = 1000;

/// Stable employee identifier as issued by the chat channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Per-employee geofencing settings owned by the attendance store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeGeoConfig {
    pub employee_id: EmployeeId,
    pub full_name: String,
    #[serde(default)]
    pub zone: Option<String>,
    pub geofencing_enabled: bool,
    #[serde(default)]
    pub work_anchor: Option<Coordinates>,
    #[serde(default)]
    pub allowed_radius_meters: Option<i64>,
    #[serde(default)]
    pub work_address_label: Option<String>,
    #[serde(default)]
    pub location_notes: Option<String>,
}

impl EmployeeGeoConfig {
    /// Configured radius when positive, otherwise `default_radius`.
    pub fn resolved_radius(&self, default_radius: u32) -> u32 {
        match self.allowed_radius_meters {
            Some(radius) if radius > 0 => u32::try_from(radius).unwrap_or(u32::MAX),
            _ => default_radius,
        }
    }

    /// Anchor to measure against, or `None` when the geofence is not enforced.
    pub fn active_anchor(&self) -> Option<Coordinates> {
        if self.geofencing_enabled {
            self.work_anchor
        } else {
            None
        }
    }
}

/// Machine-readable reason attached to every verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    NoConfig,
    GeofencingDisabled,
    WithinArea,
    OutsideArea,
    ValidationError,
}

impl ReasonCode {
    pub const ALL: [ReasonCode; 5] = [
        ReasonCode::NoConfig,
        ReasonCode::GeofencingDisabled,
        ReasonCode::WithinArea,
        ReasonCode::OutsideArea,
        ReasonCode::ValidationError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::NoConfig => "NO_CONFIG",
            ReasonCode::GeofencingDisabled => "GEOFENCING_DISABLED",
            ReasonCode::WithinArea => "WITHIN_AREA",
            ReasonCode::OutsideArea => "OUTSIDE_AREA",
            ReasonCode::ValidationError => "VALIDATION_ERROR",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which computation produced a measured distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    Store,
    Haversine,
}

/// Admit/reject decision for a single location report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceVerdict {
    pub is_within_area: bool,
    pub distance_meters: u32,
    pub allowed_radius_meters: u32,
    pub reason_code: ReasonCode,
    pub reason_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_address_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_source: Option<DistanceSource>,
    #[serde(default)]
    pub outside_advisory_region: bool,
}

impl GeofenceVerdict {
    pub(crate) fn no_config(employee_id: &EmployeeId) -> Self {
        Self {
            is_within_area: false,
            distance_meters: 0,
            allowed_radius_meters: 0,
            reason_code: ReasonCode::NoConfig,
            reason_text: format!("Employee {employee_id} is not registered in the system"),
            employee_name: None,
            work_address_label: None,
            distance_source: None,
            outside_advisory_region: false,
        }
    }

    pub(crate) fn unrestricted(config: &EmployeeGeoConfig, radius: u32) -> Self {
        Self {
            is_within_area: true,
            distance_meters: 0,
            allowed_radius_meters: radius,
            reason_code: ReasonCode::GeofencingDisabled,
            reason_text: "Employee has no geographic restriction configured".to_string(),
            employee_name: Some(config.full_name.clone()),
            work_address_label: config.work_address_label.clone(),
            distance_source: None,
            outside_advisory_region: false,
        }
    }

    pub(crate) fn measured(
        config: &EmployeeGeoConfig,
        distance_meters: u32,
        source: DistanceSource,
        radius: u32,
    ) -> Self {
        let is_within_area = distance_meters <= radius;
        let (reason_code, reason_text) = if is_within_area {
            (
                ReasonCode::WithinArea,
                "Location is within the assigned work area".to_string(),
            )
        } else {
            (
                ReasonCode::OutsideArea,
                format!(
                    "Outside the assigned work area: distance {distance_meters} m, maximum allowed {radius} m"
                ),
            )
        };

        Self {
            is_within_area,
            distance_meters,
            allowed_radius_meters: radius,
            reason_code,
            reason_text,
            employee_name: Some(config.full_name.clone()),
            work_address_label: config.work_address_label.clone(),
            distance_source: Some(source),
            outside_advisory_region: false,
        }
    }

    pub(crate) fn validation_error(detail: &str) -> Self {
        Self {
            is_within_area: true,
            distance_meters: 0,
            allowed_radius_meters: 0,
            reason_code: ReasonCode::ValidationError,
            reason_text: format!("Validation error, registration allowed: {detail}"),
            employee_name: None,
            work_address_label: None,
            distance_source: None,
            outside_advisory_region: false,
        }
    }

    /// Meters beyond the allowed radius; zero when inside.
    pub fn exceeded_by_meters(&self) -> u32 {
        self.distance_meters
            .saturating_sub(self.allowed_radius_meters)
    }
}
