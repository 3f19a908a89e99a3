use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::attendance::{AttendanceSettings, MAX_RETENTION_DAYS};
use crate::geofence::{GeofencePolicy, RegionBounds};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub geofence: GeofencePolicy,
    pub attendance: AttendanceSettings,
    /// CSV roster used to seed the in-memory employee store.
    pub employee_roster: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mut geofence = GeofencePolicy::default();
        if let Ok(raw) = env::var("APP_GEOFENCE_DEFAULT_RADIUS_METERS") {
            geofence.default_radius_meters = parse_positive(&raw)
                .ok_or(ConfigError::InvalidNumber("APP_GEOFENCE_DEFAULT_RADIUS_METERS"))?;
        }
        if let Ok(raw) = env::var("APP_GEOFENCE_REGION") {
            geofence.advisory_region = parse_region(&raw)?;
        }

        let mut attendance = AttendanceSettings::default();
        if let Ok(raw) = env::var("APP_ATTENDANCE_COOLDOWN_HOURS") {
            attendance.cooldown_hours = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidNumber("APP_ATTENDANCE_COOLDOWN_HOURS"))?;
        }
        if let Ok(raw) = env::var("APP_ATTENDANCE_RETENTION_DAYS") {
            let days = parse_positive(&raw)
                .ok_or(ConfigError::InvalidNumber("APP_ATTENDANCE_RETENTION_DAYS"))?;
            if days > MAX_RETENTION_DAYS {
                return Err(ConfigError::OutOfRange {
                    name: "APP_ATTENDANCE_RETENTION_DAYS",
                    max: MAX_RETENTION_DAYS,
                });
            }
            attendance.retention_days = days;
        }

        let employee_roster = env::var("APP_EMPLOYEE_ROSTER")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            geofence,
            attendance,
            employee_roster,
        })
    }
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|value| *value > 0)
}

/// `min_lat,max_lat,min_lon,max_lon`, or `off` to disable the advisory check.
fn parse_region(raw: &str) -> Result<Option<RegionBounds>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("off") || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    let invalid = || ConfigError::InvalidRegion {
        value: raw.to_string(),
    };
    let bounds = trimmed
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;

    match bounds.as_slice() {
        [min_latitude, max_latitude, min_longitude, max_longitude]
            if min_latitude < max_latitude && min_longitude < max_longitude =>
        {
            Ok(Some(RegionBounds {
                min_latitude: *min_latitude,
                max_latitude: *max_latitude,
                min_longitude: *min_longitude,
                max_longitude: *max_longitude,
            }))
        }
        _ => Err(invalid()),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter and formatting controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber(&'static str),
    OutOfRange { name: &'static str, max: u32 },
    InvalidRegion { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber(name) => {
                write!(f, "{name} must be a positive whole number")
            }
            ConfigError::OutOfRange { name, max } => write!(f, "{name} must not exceed {max}"),
            ConfigError::InvalidRegion { value } => write!(
                f,
                "APP_GEOFENCE_REGION must be 'min_lat,max_lat,min_lon,max_lon' or 'off', got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber(_)
            | ConfigError::OutOfRange { .. }
            | ConfigError::InvalidRegion { .. } => None,
        }
    }
}
