use super::domain::{Coordinates, EmployeeId};
use crate::store::StoreError;

/// Faults raised inside the evaluator before they are folded into a verdict.
#[derive(Debug, thiserror::Error)]
pub enum GeofenceError {
    #[error("no geofence configuration for employee {0}")]
    ConfigNotFound(EmployeeId),
    #[error("distance computation failed: {0}")]
    DistanceComputationFailed(String),
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
    #[error("coordinates are not finite numbers: {0}")]
    InvalidCoordinates(Coordinates),
}
