use super::domain::{Coordinates, EmployeeGeoConfig, EmployeeId};
use crate::store::StoreError;

/// Source of employee geofencing configuration.
///
/// Implementations backed by a database may also compute distances natively; the
/// evaluator tries [`EmployeeConfigProvider::store_distance`] first and falls back to
/// the haversine formula on any error, so the default implementation simply reports
/// the capability as missing.
pub trait EmployeeConfigProvider: Send + Sync {
    fn employee_config(&self, id: &EmployeeId) -> Result<Option<EmployeeGeoConfig>, StoreError>;

    /// Distance in meters as computed by the store.
    fn store_distance(&self, _from: Coordinates, _to: Coordinates) -> Result<f64, StoreError> {
        Err(StoreError::Unsupported("store-side distance"))
    }
}
