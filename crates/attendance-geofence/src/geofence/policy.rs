use serde::{Deserialize, Serialize};

use super::domain::{Coordinates, DEFAULT_ALLOWED_RADIUS_METERS};

/// Rectangular latitude/longitude box used for advisory plausibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl RegionBounds {
    /// Approximate bounding box of Mexico, where the deployed workforce operates.
    pub const MEXICO: RegionBounds = RegionBounds {
        min_latitude: 14.0,
        max_latitude: 33.0,
        min_longitude: -118.0,
        max_longitude: -86.0,
    };

    pub fn contains(&self, point: Coordinates) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&point.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&point.longitude)
    }
}

/// Tunables for the geofence evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofencePolicy {
    pub default_radius_meters: u32,
    /// Reports outside this box are logged, never rejected.
    pub advisory_region: Option<RegionBounds>,
}

impl Default for GeofencePolicy {
    fn default() -> Self {
        Self {
            default_radius_meters: DEFAULT_ALLOWED_RADIUS_METERS,
            advisory_region: Some(RegionBounds::MEXICO),
        }
    }
}

impl GeofencePolicy {
    pub(crate) fn is_outside_advisory_region(&self, point: Coordinates) -> bool {
        match self.advisory_region {
            Some(region) => point.is_finite() && !region.contains(point),
            None => false,
        }
    }
}
