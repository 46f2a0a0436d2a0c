//! Domain DTOs for the mobile transfer API.
//!
//! # Design
//! These types mirror the backend's camelCase JSON schema but are defined
//! independently of the mock server; the integration tests catch drift
//! between the two. Lifecycle statuses keep unknown wire strings in an
//! `Other` variant instead of rejecting the whole payload, because the
//! server owns the state machine and may add states before the client does.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// Lifecycle status of a booking, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    DriverAssigned,
    OnTheWay,
    Arrived,
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 8] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::DriverAssigned,
        BookingStatus::OnTheWay,
        BookingStatus::Arrived,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::DriverAssigned => "DRIVER_ASSIGNED",
            BookingStatus::OnTheWay => "ON_THE_WAY",
            BookingStatus::Arrived => "ARRIVED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Other(raw) => raw,
        }
    }

    /// Position in the forward lifecycle. `Cancelled` sits outside the
    /// sequence and unknown statuses have no position.
    pub fn ordinal(&self) -> Option<u8> {
        match self {
            BookingStatus::Pending => Some(0),
            BookingStatus::Confirmed => Some(1),
            BookingStatus::DriverAssigned => Some(2),
            BookingStatus::OnTheWay => Some(3),
            BookingStatus::Arrived => Some(4),
            BookingStatus::InProgress => Some(5),
            BookingStatus::Completed => Some(6),
            BookingStatus::Cancelled | BookingStatus::Other(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Whether the server's lifecycle permits moving from `self` to `next`:
    /// forward along the sequence, or `Cancelled` from any non-terminal
    /// state. Informational only; the client never blocks on it.
    pub fn can_transition_to(&self, next: &BookingStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if *next == BookingStatus::Cancelled {
            return true;
        }
        match (self.ordinal(), next.ordinal()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }
}

impl From<String> for BookingStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => BookingStatus::Pending,
            "CONFIRMED" => BookingStatus::Confirmed,
            "DRIVER_ASSIGNED" => BookingStatus::DriverAssigned,
            "ON_THE_WAY" => BookingStatus::OnTheWay,
            "ARRIVED" => BookingStatus::Arrived,
            "IN_PROGRESS" => BookingStatus::InProgress,
            "COMPLETED" => BookingStatus::Completed,
            "CANCELLED" => BookingStatus::Cancelled,
            _ => BookingStatus::Other(raw),
        }
    }
}

impl From<&str> for BookingStatus {
    fn from(raw: &str) -> Self {
        BookingStatus::from(raw.to_string())
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
    Other(String),
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Refunded,
        PaymentStatus::Failed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Refunded => "REFUNDED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => PaymentStatus::Pending,
            "PAID" => PaymentStatus::Paid,
            "REFUNDED" => PaymentStatus::Refunded,
            "FAILED" => PaymentStatus::Failed,
            _ => PaymentStatus::Other(raw),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Transition a driver can request for a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideAction {
    Accept,
    Reject,
    OnTheWay,
    Arrived,
    StartRide,
    Complete,
}

impl RideAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RideAction::Accept => "ACCEPT",
            RideAction::Reject => "REJECT",
            RideAction::OnTheWay => "ON_THE_WAY",
            RideAction::Arrived => "ARRIVED",
            RideAction::StartRide => "START_RIDE",
            RideAction::Complete => "COMPLETE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ACCEPT" => Some(RideAction::Accept),
            "REJECT" => Some(RideAction::Reject),
            "ON_THE_WAY" => Some(RideAction::OnTheWay),
            "ARRIVED" => Some(RideAction::Arrived),
            "START_RIDE" => Some(RideAction::StartRide),
            "COMPLETE" => Some(RideAction::Complete),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Query selectors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    #[default]
    Upcoming,
    Past,
}

impl BookingType {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingType::Upcoming => "upcoming",
            BookingType::Past => "past",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideFilter {
    Today,
    Upcoming,
    Past,
}

impl RideFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            RideFilter::Today => "today",
            RideFilter::Upcoming => "upcoming",
            RideFilter::Past => "past",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EarningsPeriod {
    Today,
    Week,
    Month,
    Year,
}

impl EarningsPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            EarningsPeriod::Today => "today",
            EarningsPeriod::Week => "week",
            EarningsPeriod::Month => "month",
            EarningsPeriod::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerKind {
    Affiliate,
    Supplier,
}

/// Mobile OS, used for push registration and deep-link selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedDriver {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_plate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub public_code: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    pub pickup_date: String,
    pub pickup_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    pub vehicle_type: String,
    pub passengers: u32,
    #[serde(default)]
    pub luggage: u32,
    pub price: f64,
    pub currency: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<AssignedDriver>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_location: Option<DriverLocation>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPage {
    pub bookings: Vec<Booking>,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSnapshot {
    pub booking: Booking,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_location: Option<DriverLocation>,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Whether a trip endpoint is an airport (by code) or a free-form address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    Airport,
    Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub pickup_type: PlaceKind,
    pub dropoff_type: PlaceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_airport_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_airport_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_longitude: Option<f64>,
    pub pickup_date: String,
    pub pickup_time: String,
    pub passengers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_time: Option<String>,
}

/// A priced candidate returned by a search. Not persisted; it travels with
/// the customer into booking creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub supplier_id: i64,
    pub supplier_name: String,
    pub supplier_rating: f64,
    pub supplier_reviews: u32,
    pub vehicle_type: String,
    pub vehicle_name: String,
    pub vehicle_description: String,
    pub max_passengers: u32,
    pub max_luggage: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_image: Option<String>,
    pub price: f64,
    pub currency: String,
    /// Minutes.
    pub duration: u32,
    /// Kilometres.
    pub distance: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airport_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Users & auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUser {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub loyalty_points: u32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverUser {
    pub id: i64,
    pub supplier_id: i64,
    pub supplier_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<i64>,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_rides: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateUser {
    pub id: i64,
    pub affiliate_code: String,
    pub company_name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub commission_rate: f64,
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierUser {
    pub id: i64,
    pub company_name: String,
    pub contact_name: String,
    pub contact_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_verified: bool,
    #[serde(default)]
    pub rating: f64,
}

/// A partner account is either an affiliate or a supplier, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum PartnerUser {
    Affiliate(AffiliateUser),
    Supplier(SupplierUser),
}

impl PartnerUser {
    pub fn kind(&self) -> PartnerKind {
        match self {
            PartnerUser::Affiliate(_) => PartnerKind::Affiliate,
            PartnerUser::Supplier(_) => PartnerKind::Supplier,
        }
    }

    pub fn company_name(&self) -> &str {
        match self {
            PartnerUser::Affiliate(a) => &a.company_name,
            PartnerUser::Supplier(s) => &s.company_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerAuth {
    pub user: CustomerUser,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverAuth {
    pub driver: DriverUser,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerAuth {
    pub user: PartnerUser,
    pub token: String,
    #[serde(default)]
    pub success: bool,
}

/// Partial customer profile update; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// A driver-scoped view of a booking, with the driver's share of the price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRide {
    pub id: i64,
    pub booking_code: String,
    pub status: BookingStatus,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    pub pickup_date: String,
    pub pickup_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub passengers: u32,
    #[serde(default)]
    pub luggage: u32,
    pub price: f64,
    pub driver_earnings: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideList {
    pub rides: Vec<DriverRide>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideStatusAck {
    pub success: bool,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStatus {
    pub is_active: bool,
    pub is_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityAck {
    pub success: bool,
    pub is_available: bool,
}

/// One reading from the device position watch, reported to the server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl PositionFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            heading: None,
            speed: None,
            accuracy: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub heading: Option<f64>,
    pub speed: Option<f64>,
    pub updated_at: String,
}

// ---------------------------------------------------------------------------
// Earnings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSummary {
    pub today: f64,
    pub this_week: f64,
    pub this_month: f64,
    pub total: f64,
    pub currency: String,
    pub pending_payout: f64,
    pub completed_rides: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Ride,
    Payout,
    Bonus,
    Deduction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsTransaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_code: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub transactions: Vec<EarningsTransaction>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerTransactionKind {
    Earning,
    Payout,
    Deduction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerTransaction {
    pub id: i64,
    pub booking_code: String,
    pub date: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: PartnerTransactionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerEarnings {
    pub summary: EarningsSummary,
    pub transactions: Vec<PartnerTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutReceipt {
    pub message: String,
    pub payout_id: i64,
}

// ---------------------------------------------------------------------------
// Partner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_bookings: u32,
    pub pending_bookings: u32,
    pub completed_bookings: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: EarningsSummary,
    pub recent_bookings: Vec<Booking>,
    pub stats: DashboardStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDriver {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub license_number: String,
    pub is_active: bool,
    pub is_available: bool,
    pub rating: f64,
    pub total_rides: u32,
    pub vehicle_id: Option<i64>,
    pub vehicle_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerVehicle {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub make: String,
    pub model: String,
    pub year: u16,
    pub color: String,
    pub plate_number: String,
    pub capacity: u32,
    pub luggage_capacity: u32,
    pub is_active: bool,
    pub photo_url: Option<String>,
    pub driver_id: Option<i64>,
    pub driver_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Common
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// `{ "success": ... }` acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_status_round_trips_known_and_unknown() {
        let known: BookingStatus = serde_json::from_str(r#""DRIVER_ASSIGNED""#).unwrap();
        assert_eq!(known, BookingStatus::DriverAssigned);
        assert_eq!(serde_json::to_string(&known).unwrap(), r#""DRIVER_ASSIGNED""#);

        let odd: BookingStatus = serde_json::from_str(r#""ON_HOLD""#).unwrap();
        assert_eq!(odd, BookingStatus::Other("ON_HOLD".to_string()));
        assert_eq!(serde_json::to_string(&odd).unwrap(), r#""ON_HOLD""#);
    }

    #[test]
    fn lifecycle_is_forward_only_with_cancel_escape() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(&Confirmed));
        assert!(Confirmed.can_transition_to(&InProgress));
        assert!(!Arrived.can_transition_to(&OnTheWay));
        assert!(InProgress.can_transition_to(&Cancelled));
        assert!(!Completed.can_transition_to(&Cancelled));
        assert!(!Cancelled.can_transition_to(&Pending));
    }

    #[test]
    fn partner_user_is_tagged() {
        let raw = r#"{"type":"supplier","data":{"id":3,"companyName":"Fleet Co","contactName":"Ana","contactEmail":"ana@fleet.co","isVerified":true,"rating":4.8}}"#;
        let user: PartnerUser = serde_json::from_str(raw).unwrap();
        assert_eq!(user.kind(), PartnerKind::Supplier);
        assert_eq!(user.company_name(), "Fleet Co");
    }

    #[test]
    fn ride_action_uses_screaming_case() {
        assert_eq!(serde_json::to_string(&RideAction::StartRide).unwrap(), r#""START_RIDE""#);
        assert_eq!(RideAction::parse("COMPLETE"), Some(RideAction::Complete));
        assert_eq!(RideAction::parse("complete"), None);
    }

    #[test]
    fn position_fix_omits_missing_readings() {
        let json = serde_json::to_value(PositionFix::new(1.0, 2.0)).unwrap();
        assert_eq!(json, serde_json::json!({"latitude": 1.0, "longitude": 2.0}));
    }
}
