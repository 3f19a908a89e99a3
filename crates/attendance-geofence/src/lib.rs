pub mod attendance;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod geofence;
pub mod roster;
pub mod store;
pub mod telemetry;
