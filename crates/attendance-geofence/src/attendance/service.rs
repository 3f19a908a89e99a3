use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    AttendanceId, AttendanceSubmission, BotActivity, NewAttendance, PurgeSummary,
    RegistrationWindow,
};
use super::repository::AttendanceRepository;
use super::settings::AttendanceSettings;
use crate::geocoding::GeocoderChain;
use crate::geofence::{
    render_verdict, EmployeeConfigProvider, EmployeeId, GeofenceEvaluator, GeofenceVerdict,
};
use crate::store::StoreError;

/// Result of a registration attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    Registered {
        attendance_id: AttendanceId,
        #[serde(skip_serializing_if = "Option::is_none")]
        verdict: Option<GeofenceVerdict>,
        #[serde(skip_serializing_if = "Option::is_none")]
        address: Option<String>,
        message: String,
    },
    Rejected {
        verdict: GeofenceVerdict,
        message: String,
    },
    CoolingDown {
        hours_elapsed: i64,
        hours_required: u32,
        message: String,
    },
}

/// Service composing the cooldown check, geofence gate, geocoder and store.
pub struct AttendanceService<S> {
    store: Arc<S>,
    evaluator: Arc<GeofenceEvaluator<S>>,
    geocoder: GeocoderChain,
    settings: AttendanceSettings,
}

impl<S> AttendanceService<S>
where
    S: AttendanceRepository + EmployeeConfigProvider + 'static,
{
    pub fn new(
        store: Arc<S>,
        evaluator: Arc<GeofenceEvaluator<S>>,
        geocoder: GeocoderChain,
        settings: AttendanceSettings,
    ) -> Self {
        Self {
            store,
            evaluator,
            geocoder,
            settings,
        }
    }

    /// Cooldown check. Store faults allow the registration.
    pub fn can_register(
        &self,
        employee_id: &EmployeeId,
        now: DateTime<Utc>,
    ) -> RegistrationWindow {
        match self.store.last_registration(employee_id) {
            Ok(None) => RegistrationWindow {
                allowed: true,
                first_registration: true,
                hours_elapsed: None,
                last_registered_at: None,
            },
            Ok(Some(last)) => {
                let hours_elapsed = (now - last).num_hours().max(0);
                RegistrationWindow {
                    allowed: hours_elapsed >= i64::from(self.settings.cooldown_hours),
                    first_registration: false,
                    hours_elapsed: Some(hours_elapsed),
                    last_registered_at: Some(last),
                }
            }
            Err(err) => {
                warn!(%employee_id, error = %err, "cooldown check failed; allowing registration");
                RegistrationWindow {
                    allowed: true,
                    first_registration: true,
                    hours_elapsed: None,
                    last_registered_at: None,
                }
            }
        }
    }

    /// Run the full registration flow for a submission.
    pub fn register(
        &self,
        submission: AttendanceSubmission,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome, AttendanceServiceError> {
        let employee_id = submission.employee_id.clone();

        let window = self.can_register(&employee_id, now);
        if !window.allowed {
            let hours_elapsed = window.hours_elapsed.unwrap_or_default();
            let hours_required = self.settings.cooldown_hours;
            let message = format!(
                "⏰ {}, you already registered {hours_elapsed} hour(s) ago. You can register again after {hours_required} hours.",
                submission.name
            );
            self.record_activity(
                BotActivity::new(employee_id, "registration_cooldown", now)
                    .with_exchange(None, Some(&message)),
            );
            return Ok(RegistrationOutcome::CoolingDown {
                hours_elapsed,
                hours_required,
                message,
            });
        }

        let verdict = match submission.location {
            Some(point) if submission.kind.requires_location_check() => Some(
                self.evaluator
                    .evaluate(&employee_id, point.latitude, point.longitude),
            ),
            _ => None,
        };

        if let Some(verdict) = verdict.as_ref().filter(|verdict| !verdict.is_within_area) {
            let message = render_verdict(verdict, &submission.name);
            info!(
                %employee_id,
                reason_code = %verdict.reason_code,
                distance_meters = verdict.distance_meters,
                "attendance rejected by geofence"
            );
            self.record_activity(
                BotActivity::new(employee_id, "registration_rejected", now)
                    .with_exchange(None, Some(&message)),
            );
            return Ok(RegistrationOutcome::Rejected {
                verdict: verdict.clone(),
                message,
            });
        }

        let address = submission
            .location
            .and_then(|point| self.geocoder.resolve(point))
            .map(|resolved| resolved.formatted);

        let message = match &verdict {
            Some(verdict) => render_verdict(verdict, &submission.name),
            None => format!(
                "✅ {}, your {} registration was saved.",
                submission.name,
                submission.kind.label()
            ),
        };
        let kind = submission.kind;
        let record = NewAttendance::from_submission(submission, address.clone(), now);
        let attendance_id = self.store.save_attendance(record)?;
        info!(
            %employee_id,
            attendance_id = attendance_id.0,
            kind = kind.label(),
            "attendance saved"
        );

        if let Err(err) = self.store.touch_registration(&employee_id, now) {
            warn!(%employee_id, error = %err, "failed to update registration control");
        }
        self.record_activity(
            BotActivity::new(employee_id, "registration_saved", now)
                .with_exchange(None, Some(&message)),
        );

        Ok(RegistrationOutcome::Registered {
            attendance_id,
            verdict,
            address,
            message,
        })
    }

    /// Delete records older than the retention window.
    pub fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<PurgeSummary, AttendanceServiceError> {
        let retention_days = self.settings.retention_days;
        let cutoff = now
            .checked_sub_signed(Duration::days(i64::from(retention_days)))
            .ok_or(AttendanceServiceError::RetentionOutOfRange(retention_days))?;
        let summary = self.store.purge_before(cutoff)?;
        info!(
            %cutoff,
            attendance_records = summary.attendance_records,
            activity_entries = summary.activity_entries,
            total = summary.total(),
            "retention purge completed"
        );
        Ok(summary)
    }

    fn record_activity(&self, activity: BotActivity) {
        if let Err(err) = self.store.log_activity(activity) {
            warn!(error = %err, "failed to write bot activity");
        }
    }
}

/// Error raised by the attendance service.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("retention of {0} days reaches before the earliest representable timestamp")]
    RetentionOutOfRange(u32),
}
