//! Records held by the mock backend and the JSON views it serves.
//!
//! Views are built from records on every request so status changes made by
//! one audience are immediately visible to the others.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub loyalty_points: u32,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: i64,
    pub supplier_id: i64,
    pub supplier_name: String,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub phone: String,
    pub profile_image: Option<String>,
    pub vehicle_id: Option<i64>,
    pub is_online: bool,
    #[serde(skip)]
    pub is_active: bool,
    pub rating: f64,
    pub total_rides: u32,
    #[serde(skip)]
    pub license_number: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    pub supplier_id: i64,
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
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Affiliate {
    pub id: i64,
    pub affiliate_code: String,
    pub company_name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub commission_rate: f64,
    pub is_verified: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: i64,
    pub company_name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub phone: Option<String>,
    pub is_verified: bool,
    pub rating: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Partner {
    Affiliate(Affiliate),
    Supplier(Supplier),
}

impl Partner {
    pub fn contact_email(&self) -> &str {
        match self {
            Partner::Affiliate(a) => &a.contact_email,
            Partner::Supplier(s) => &s.contact_email,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Partner::Affiliate(_) => "affiliate",
            Partner::Supplier(_) => "supplier",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PartnerAccount {
    pub partner: Partner,
    pub password: String,
}

/// A booking as stored. Statuses are plain strings; the backend owns the
/// lifecycle and clients must tolerate values they do not know.
#[derive(Clone, Debug)]
pub struct BookingRecord {
    pub id: i64,
    pub public_code: String,
    pub status: String,
    pub payment_status: String,
    pub pickup: Place,
    pub dropoff: Place,
    pub pickup_date: String,
    pub pickup_time: String,
    pub flight_number: Option<String>,
    pub notes: Option<String>,
    pub vehicle_type: String,
    pub passengers: u32,
    pub luggage: u32,
    pub price: f64,
    pub driver_earnings: f64,
    pub currency: String,
    pub customer_id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub supplier_id: i64,
    pub affiliate_id: Option<i64>,
    pub driver_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl BookingRecord {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "COMPLETED" | "CANCELLED")
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationReport {
    #[serde(skip)]
    pub driver_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub heading: Option<f64>,
    pub speed: Option<f64>,
    #[serde(skip_serializing)]
    pub accuracy: Option<f64>,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverTransaction {
    pub id: i64,
    #[serde(skip)]
    pub driver_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub booking_code: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedDriverView {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub photo: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_plate: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLocationView {
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: String,
}

impl From<&LocationReport> for DriverLocationView {
    fn from(report: &LocationReport) -> Self {
        Self {
            latitude: report.latitude,
            longitude: report.longitude,
            updated_at: report.updated_at.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: i64,
    pub public_code: String,
    pub status: String,
    pub payment_status: String,
    pub pickup_location: Place,
    pub dropoff_location: Place,
    pub pickup_date: String,
    pub pickup_time: String,
    pub flight_number: Option<String>,
    pub vehicle_type: String,
    pub passengers: u32,
    pub luggage: u32,
    pub price: f64,
    pub currency: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub driver: Option<AssignedDriverView>,
    pub driver_location: Option<DriverLocationView>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideView {
    pub id: i64,
    pub booking_code: String,
    pub status: String,
    pub pickup_location: Place,
    pub dropoff_location: Place,
    pub pickup_date: String,
    pub pickup_time: String,
    pub flight_number: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub passengers: u32,
    pub luggage: u32,
    pub price: f64,
    pub driver_earnings: f64,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<&BookingRecord> for RideView {
    fn from(b: &BookingRecord) -> Self {
        Self {
            id: b.id,
            booking_code: b.public_code.clone(),
            status: b.status.clone(),
            pickup_location: b.pickup.clone(),
            dropoff_location: b.dropoff.clone(),
            pickup_date: b.pickup_date.clone(),
            pickup_time: b.pickup_time.clone(),
            flight_number: b.flight_number.clone(),
            customer_name: b.customer_name.clone(),
            customer_phone: b.customer_phone.clone(),
            passengers: b.passengers,
            luggage: b.luggage,
            price: b.price,
            driver_earnings: b.driver_earnings,
            currency: b.currency.clone(),
            notes: b.notes.clone(),
            created_at: b.created_at.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
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

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDriverView {
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

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerVehicleView {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub photo_url: Option<String>,
    pub driver_id: Option<i64>,
    pub driver_name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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
    pub vehicle_image: Option<String>,
    pub price: f64,
    pub currency: String,
    pub duration: u32,
    pub distance: f64,
    pub features: Vec<String>,
    pub airport_id: Option<i64>,
    pub zone_id: Option<i64>,
    pub route_id: Option<i64>,
}
