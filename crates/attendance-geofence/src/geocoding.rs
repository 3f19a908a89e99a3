//! Reverse geocoding over an ordered list of providers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geofence::Coordinates;

/// Human-readable address resolved for a coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub formatted: String,
    #[serde(default)]
    pub place_id: Option<String>,
    /// Provider that produced the address, or `coordinates` for the fallback label.
    pub source: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoder {0} is missing credentials")]
    MissingCredentials(&'static str),
    #[error("geocoder transport failed: {0}")]
    Transport(String),
}

/// A single reverse-geocoding backend (Google, MapBox, Nominatim, ...).
pub trait Geocoder: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the provider answered but had no match.
    fn resolve_address(&self, point: Coordinates)
        -> Result<Option<ResolvedAddress>, GeocodeError>;
}

/// Tries each provider in order and labels the raw coordinates when all of them miss.
#[derive(Clone, Default)]
pub struct GeocoderChain {
    providers: Vec<Arc<dyn Geocoder>>,
}

impl GeocoderChain {
    pub fn new(providers: Vec<Arc<dyn Geocoder>>) -> Self {
        Self { providers }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Resolve and clean an address; `None` only for non-finite coordinates.
    pub fn resolve(&self, point: Coordinates) -> Option<ResolvedAddress> {
        if !point.is_finite() {
            warn!(%point, "refusing to geocode invalid coordinates");
            return None;
        }

        for provider in &self.providers {
            match provider.resolve_address(point) {
                Ok(Some(mut address)) => {
                    address.formatted = clean_address(&address.formatted);
                    debug!(
                        provider = provider.name(),
                        address = %address.formatted,
                        "address resolved"
                    );
                    return Some(address);
                }
                Ok(None) => debug!(provider = provider.name(), "geocoder returned no results"),
                Err(err) => warn!(provider = provider.name(), error = %err, "geocoder failed"),
            }
        }

        if !self.providers.is_empty() {
            warn!(%point, "all geocoders failed; using coordinate label");
        }
        Some(ResolvedAddress {
            formatted: format!("Coordinates: {point}"),
            place_id: None,
            source: "coordinates".to_string(),
        })
    }
}

/// Strip a leading house number, a trailing country name, and repeated whitespace.
pub fn clean_address(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let without_number = match collapsed.find(|c: char| !c.is_ascii_digit()) {
        Some(0) | None => collapsed.as_str(),
        Some(index) => collapsed[index..].trim_start_matches([' ', ',']).trim_start(),
    };

    let mut cleaned = without_number.trim();
    for suffix in [", México", ", Mexico", ",México", ",Mexico"] {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.trim_end();
            break;
        }
    }

    cleaned.to_string()
}
