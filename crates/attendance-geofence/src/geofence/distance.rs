use tracing::{debug, warn};

use super::domain::{Coordinates, DistanceSource};
use super::error::GeofenceError;
use super::provider::EmployeeConfigProvider;

/// Mean Earth radius used by both distance formulas.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Distance together with the computation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasuredDistance {
    pub meters: u32,
    pub source: DistanceSource,
}

/// Great-circle distance via the haversine formula, rounded to whole meters.
pub fn haversine_meters(from: Coordinates, to: Coordinates) -> u32 {
    round_meters(haversine_raw(from, to))
}

/// Spherical law of cosines, the formula database-side distance functions usually use.
///
/// Unrounded so callers can treat it the same way as any store-reported value.
pub fn spherical_cosine_meters(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lon.cos();
    EARTH_RADIUS_METERS * cosine.clamp(-1.0, 1.0).acos()
}

fn haversine_raw(from: Coordinates, to: Coordinates) -> f64 {
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

pub(crate) fn round_meters(value: f64) -> u32 {
    value.round().clamp(0.0, u32::MAX as f64) as u32
}

/// Measure `from -> to`, preferring the store and falling back to haversine.
///
/// Store failures never escape this function; only non-finite input is an error.
pub fn measure<P>(
    provider: &P,
    from: Coordinates,
    to: Coordinates,
) -> Result<MeasuredDistance, GeofenceError>
where
    P: EmployeeConfigProvider + ?Sized,
{
    for point in [from, to] {
        if !point.is_finite() {
            return Err(GeofenceError::InvalidCoordinates(point));
        }
    }

    match store_side(provider, from, to) {
        Ok(meters) => {
            debug!(meters, "distance computed by store");
            Ok(MeasuredDistance {
                meters,
                source: DistanceSource::Store,
            })
        }
        Err(failure) => {
            let meters = haversine_meters(from, to);
            debug!(meters, reason = %failure, "distance computed with haversine fallback");
            Ok(MeasuredDistance {
                meters,
                source: DistanceSource::Haversine,
            })
        }
    }
}

fn store_side<P>(provider: &P, from: Coordinates, to: Coordinates) -> Result<u32, GeofenceError>
where
    P: EmployeeConfigProvider + ?Sized,
{
    match provider.store_distance(from, to) {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(round_meters(value)),
        Ok(value) => {
            let failure =
                GeofenceError::DistanceComputationFailed(format!("store returned {value}"));
            warn!(error = %failure, "discarding store-side distance");
            Err(failure)
        }
        Err(err) if err.is_unsupported() => {
            Err(GeofenceError::DistanceComputationFailed(err.to_string()))
        }
        Err(err) => {
            warn!(error = %err, "store-side distance failed");
            Err(GeofenceError::DistanceComputationFailed(err.to_string()))
        }
    }
}
