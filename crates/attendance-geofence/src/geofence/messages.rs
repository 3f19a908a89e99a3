//! Chat-ready text for geofence verdicts. Uses WhatsApp-style `*bold*` markup.

use super::domain::{GeofenceVerdict, ReasonCode};

fn kilometers(meters: u32) -> String {
    format!("{:.2}", f64::from(meters) / 1000.0)
}

/// Message sent when a report falls outside the employee's work area.
pub fn render_rejection(verdict: &GeofenceVerdict, display_name: &str) -> String {
    let address = verdict
        .work_address_label
        .as_deref()
        .unwrap_or("Configured");
    let exceeded_km = kilometers(verdict.exceeded_by_meters());

    format!(
        "❌ *LOCATION OUTSIDE YOUR WORK AREA*\n\n\
🚫 {display_name}, you cannot register attendance from this location.\n\n\
📍 *Location details:*\n\
• Assigned workplace: *{address}*\n\
• You need to move closer by: *{exceeded_km} km*\n\n\
🎯 *What can you do?*\n\
1. Go to your assigned workplace\n\
2. Check that you are at the right location\n\
3. If your assigned location is wrong, contact your supervisor\n\n\
📋 *To cancel this registration, type* *start*"
    )
}

/// Confirmation sent when a report is inside the work area.
pub fn render_acceptance(verdict: &GeofenceVerdict, display_name: &str) -> String {
    let address = verdict
        .work_address_label
        .as_deref()
        .unwrap_or("your assigned area");

    format!(
        "✅ *LOCATION VALIDATED*\n\n\
👤 *{display_name}*\n\
📍 *Location confirmation:*\n\
• Workplace: *{address}*\n\
• Your distance: *{distance} km from the center*\n\
• Allowed radius: *{radius} km*\n\
• Status: *Inside your work area* ✅\n\n\
🔍 Processing your attendance registration...",
        distance = kilometers(verdict.distance_meters),
        radius = kilometers(verdict.allowed_radius_meters),
    )
}

/// Notice for reports admitted without a geofence being enforced.
pub fn render_unrestricted(display_name: &str) -> String {
    format!("ℹ️ *NO GEOGRAPHIC RESTRICTION*\n\n👤 *{display_name}*, your location was recorded without an assigned work area.")
}

/// Pick the message matching the verdict's reason code.
pub fn render_verdict(verdict: &GeofenceVerdict, display_name: &str) -> String {
    match verdict.reason_code {
        ReasonCode::WithinArea => render_acceptance(verdict, display_name),
        ReasonCode::OutsideArea => render_rejection(verdict, display_name),
        ReasonCode::GeofencingDisabled | ReasonCode::ValidationError => {
            render_unrestricted(display_name)
        }
        ReasonCode::NoConfig => format!(
            "❌ *EMPLOYEE NOT REGISTERED*\n\n{display_name}, your number is not registered in the attendance system. Contact Human Resources."
        ),
    }
}
