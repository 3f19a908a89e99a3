use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::geofence::{Coordinates, EmployeeGeoConfig, EmployeeId};

#[derive(Debug, Deserialize)]
struct RosterRow {
    user_id: String,
    full_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    zone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    geofencing_active: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    work_latitude: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    work_longitude: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    allowed_radius_meters: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    work_address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location_notes: Option<String>,
}

/// Row-level problem found while reading the roster.
#[derive(Debug)]
pub(crate) struct RowProblem {
    pub(crate) line: u64,
    pub(crate) reason: String,
}

pub(crate) enum ParseFailure {
    Csv(csv::Error),
    Row(RowProblem),
}

pub(crate) fn parse_roster<R: Read>(reader: R) -> Result<Vec<EmployeeGeoConfig>, ParseFailure> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut configs = Vec::new();

    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = record.map_err(ParseFailure::Csv)?;
        // header occupies line 1
        let line = index as u64 + 2;
        let config = row
            .into_config()
            .map_err(|reason| ParseFailure::Row(RowProblem { line, reason }))?;
        configs.push(config);
    }

    Ok(configs)
}

impl RosterRow {
    fn into_config(self) -> Result<EmployeeGeoConfig, String> {
        if self.user_id.is_empty() {
            return Err("user_id is required".to_string());
        }

        let geofencing_enabled = match self.geofencing_active.as_deref() {
            None => false,
            Some(flag) => parse_flag(flag)?,
        };
        let latitude = parse_number("work_latitude", self.work_latitude.as_deref())?;
        let longitude = parse_number("work_longitude", self.work_longitude.as_deref())?;
        let work_anchor = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        };
        let allowed_radius_meters = parse_number(
            "allowed_radius_meters",
            self.allowed_radius_meters.as_deref(),
        )?
        .map(|radius| radius.round() as i64);

        Ok(EmployeeGeoConfig {
            employee_id: EmployeeId(self.user_id),
            full_name: self.full_name,
            zone: self.zone,
            geofencing_enabled,
            work_anchor,
            allowed_radius_meters,
            work_address_label: self.work_address,
            location_notes: self.location_notes,
        })
    }
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_uppercase().as_str() {
        "SI" | "SÍ" | "YES" | "TRUE" | "1" => Ok(true),
        "NO" | "FALSE" | "0" => Ok(false),
        other => Err(format!("geofencing_active must be SI/NO, got '{other}'")),
    }
}

fn parse_number(field: &str, value: Option<&str>) -> Result<Option<f64>, String> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Some(number)),
            _ => Err(format!("{field} must be a number, got '{raw}'")),
        },
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
