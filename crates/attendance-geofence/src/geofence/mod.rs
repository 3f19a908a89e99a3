//! Work-site geofence validation: configuration, distance strategy, verdicts and the
//! chat messages rendered from them.

pub mod distance;
pub mod domain;
mod error;
mod evaluator;
pub mod messages;
mod policy;
pub mod provider;
pub mod router;

#[cfg(test)]
mod tests;

pub use distance::{haversine_meters, spherical_cosine_meters, MeasuredDistance};
pub use domain::{
    Coordinates, DistanceSource, EmployeeGeoConfig, EmployeeId, GeofenceVerdict, ReasonCode,
    DEFAULT_ALLOWED_RADIUS_METERS,
};
pub use error::GeofenceError;
pub use evaluator::{register_verdict_metrics, GeofenceEvaluator, VERDICTS_METRIC};
pub use messages::{render_acceptance, render_rejection, render_unrestricted, render_verdict};
pub use policy::{GeofencePolicy, RegionBounds};
pub use provider::EmployeeConfigProvider;
pub use router::geofence_router;
