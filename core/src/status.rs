//! Display lookups for lifecycle statuses.
//!
//! Pure tables: no transition validation happens here. Lookups are total;
//! an unrecognised status shows its raw text with the neutral colour.

use serde::{Deserialize, Serialize};

use crate::types::{BookingStatus, PaymentStatus, RideAction};

/// Colour used for statuses the tables do not know.
pub const FALLBACK_COLOR: &str = "#64748b";

const AMBER: &str = "#f59e0b";
const BLUE: &str = "#3b82f6";
const PURPLE: &str = "#8b5cf6";
const CYAN: &str = "#0891b2";
const TEAL: &str = "#0d9488";
const GREEN: &str = "#22c55e";
const RED: &str = "#ef4444";

pub fn booking_status_label(status: &BookingStatus) -> &str {
    match status {
        BookingStatus::Pending => "Pending",
        BookingStatus::Confirmed => "Confirmed",
        BookingStatus::DriverAssigned => "Driver Assigned",
        BookingStatus::OnTheWay => "Driver On The Way",
        BookingStatus::Arrived => "Driver Arrived",
        BookingStatus::InProgress => "In Progress",
        BookingStatus::Completed => "Completed",
        BookingStatus::Cancelled => "Cancelled",
        BookingStatus::Other(raw) => raw,
    }
}

pub fn booking_status_color(status: &BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => AMBER,
        BookingStatus::Confirmed => BLUE,
        BookingStatus::DriverAssigned => PURPLE,
        BookingStatus::OnTheWay => CYAN,
        BookingStatus::Arrived | BookingStatus::InProgress => TEAL,
        BookingStatus::Completed => GREEN,
        BookingStatus::Cancelled => RED,
        BookingStatus::Other(_) => FALLBACK_COLOR,
    }
}

pub fn payment_status_label(status: &PaymentStatus) -> &str {
    match status {
        PaymentStatus::Pending => "Pending",
        PaymentStatus::Paid => "Paid",
        PaymentStatus::Refunded => "Refunded",
        PaymentStatus::Failed => "Failed",
        PaymentStatus::Other(raw) => raw,
    }
}

pub fn payment_status_color(status: &PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => AMBER,
        PaymentStatus::Paid => GREEN,
        PaymentStatus::Refunded => BLUE,
        PaymentStatus::Failed => RED,
        PaymentStatus::Other(_) => FALLBACK_COLOR,
    }
}

/// The single action button a driver sees for a ride in `status`.
pub fn next_ride_action(status: &BookingStatus) -> Option<RideAction> {
    match status {
        BookingStatus::Confirmed => Some(RideAction::Accept),
        BookingStatus::DriverAssigned => Some(RideAction::OnTheWay),
        BookingStatus::OnTheWay => Some(RideAction::Arrived),
        BookingStatus::Arrived => Some(RideAction::StartRide),
        BookingStatus::InProgress => Some(RideAction::Complete),
        _ => None,
    }
}

pub fn ride_action_label(action: RideAction) -> &'static str {
    match action {
        RideAction::Accept => "Accept Ride",
        RideAction::Reject => "Reject Ride",
        RideAction::OnTheWay => "Start Trip to Pickup",
        RideAction::Arrived => "I've Arrived",
        RideAction::StartRide => "Start Ride",
        RideAction::Complete => "Complete Ride",
    }
}

/// Badge style on partner booking lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Success,
    Error,
    Info,
    Warning,
}

pub fn status_badge(status: &BookingStatus) -> Badge {
    match status {
        BookingStatus::Completed => Badge::Success,
        BookingStatus::Cancelled => Badge::Error,
        BookingStatus::Confirmed | BookingStatus::DriverAssigned => Badge::Info,
        _ => Badge::Warning,
    }
}
