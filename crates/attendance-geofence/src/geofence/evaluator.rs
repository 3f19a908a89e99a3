use std::sync::Arc;

use metrics::counter;
use tracing::{info, warn};

use super::distance;
use super::domain::{Coordinates, EmployeeGeoConfig, EmployeeId, GeofenceVerdict, ReasonCode};
use super::error::GeofenceError;
use super::policy::GeofencePolicy;
use super::provider::EmployeeConfigProvider;
use crate::store::StoreError;

/// Counter of evaluated reports, labelled by `reason_code`.
pub const VERDICTS_METRIC: &str = "geofence_verdicts_total";

/// Decides whether a reported location counts as "at work" for an employee.
///
/// Every call resolves to a [`GeofenceVerdict`]. Faults from the store or the
/// distance computation admit the report with [`ReasonCode::ValidationError`]; those
/// admissions are logged at `warn` and counted in `geofence_verdicts_total` so operators
/// can see when enforcement is effectively off.
pub struct GeofenceEvaluator<P> {
    provider: Arc<P>,
    policy: GeofencePolicy,
}

impl<P> GeofenceEvaluator<P>
where
    P: EmployeeConfigProvider + 'static,
{
    pub fn new(provider: Arc<P>, policy: GeofencePolicy) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> &GeofencePolicy {
        &self.policy
    }

    /// Read-through lookup of the employee's configuration.
    pub fn employee_config(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Option<EmployeeGeoConfig>, StoreError> {
        self.provider.employee_config(employee_id)
    }

    pub fn evaluate(
        &self,
        employee_id: &EmployeeId,
        reported_latitude: f64,
        reported_longitude: f64,
    ) -> GeofenceVerdict {
        let reported = Coordinates::new(reported_latitude, reported_longitude);
        let outside_region = self.policy.is_outside_advisory_region(reported);
        if outside_region {
            warn!(%employee_id, %reported, "reported coordinates fall outside the advisory region");
        }

        let mut verdict = match self.try_evaluate(employee_id, reported) {
            Ok(verdict) => verdict,
            Err(GeofenceError::ConfigNotFound(id)) => {
                info!(employee_id = %id, "employee not found; rejecting report");
                GeofenceVerdict::no_config(&id)
            }
            Err(err) => {
                warn!(
                    %employee_id,
                    error = %err,
                    reason_code = %ReasonCode::ValidationError,
                    "geofence validation failed; admitting report without enforcement"
                );
                GeofenceVerdict::validation_error(&err.to_string())
            }
        };
        verdict.outside_advisory_region = outside_region;

        counter!(VERDICTS_METRIC, "reason_code" => verdict.reason_code.as_str()).increment(1);
        info!(
            %employee_id,
            reason_code = %verdict.reason_code,
            distance_meters = verdict.distance_meters,
            allowed_radius_meters = verdict.allowed_radius_meters,
            within = verdict.is_within_area,
            "geofence evaluated"
        );
        verdict
    }

    fn try_evaluate(
        &self,
        employee_id: &EmployeeId,
        reported: Coordinates,
    ) -> Result<GeofenceVerdict, GeofenceError> {
        if !reported.is_finite() {
            return Err(GeofenceError::InvalidCoordinates(reported));
        }

        let config = self
            .provider
            .employee_config(employee_id)?
            .ok_or_else(|| GeofenceError::ConfigNotFound(employee_id.clone()))?;
        let radius = config.resolved_radius(self.policy.default_radius_meters);

        let Some(anchor) = config.active_anchor() else {
            return Ok(GeofenceVerdict::unrestricted(&config, radius));
        };

        let measured = distance::measure(self.provider.as_ref(), anchor, reported)?;
        Ok(GeofenceVerdict::measured(
            &config,
            measured.meters,
            measured.source,
            radius,
        ))
    }
}

/// Describe the verdict counter and register every reason code at zero so each series
/// is exported before its first report.
pub fn register_verdict_metrics() {
    metrics::describe_counter!(VERDICTS_METRIC, "Geofence verdicts by reason code");
    for code in ReasonCode::ALL {
        counter!(VERDICTS_METRIC, "reason_code" => code.as_str()).absolute(0);
    }
}
