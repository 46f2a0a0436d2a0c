use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::model::{BookingRecord, BookingView, Customer, Place, SearchResult};
use crate::state::{now_rfc3339, Bearer, Db, Principal};

/// Accepted by `otp/verify` for every phone number.
pub const DEMO_OTP: &str = "123456";

pub fn router() -> Router<Db> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/otp/send", post(send_otp))
        .route("/otp/verify", post(verify_otp))
        .route("/profile", get(profile).patch(update_profile))
        .route("/search", post(search))
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/{code}", get(get_booking))
        .route("/bookings/{code}/cancel", post(cancel_booking))
        .route("/bookings/{code}/payment", post(payment_intent))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Register {
    email: String,
    password: String,
    full_name: String,
    phone: Option<String>,
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct OtpSend {
    phone: String,
}

#[derive(Deserialize)]
struct OtpVerify {
    phone: String,
    code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdate {
    full_name: Option<String>,
    phone: Option<String>,
    profile_image: Option<String>,
}

#[derive(Deserialize)]
struct BookingListQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    pickup_type: String,
    dropoff_type: String,
    pickup_airport_code: Option<String>,
    dropoff_airport_code: Option<String>,
    pickup_address: Option<String>,
    dropoff_address: Option<String>,
    pickup_latitude: Option<f64>,
    pickup_longitude: Option<f64>,
    dropoff_latitude: Option<f64>,
    dropoff_longitude: Option<f64>,
    pickup_date: String,
    pickup_time: String,
    passengers: u32,
}

#[derive(Deserialize)]
struct PassengerDetails {
    name: String,
    email: String,
    phone: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBooking {
    search_result: SearchResult,
    search_request: SearchRequest,
    passenger_details: PassengerDetails,
    flight_number: Option<String>,
    notes: Option<String>,
    promo_code: Option<String>,
}

#[derive(Deserialize)]
struct Cancel {
    reason: Option<String>,
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Register>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let mut db = db.write().await;
    if db.customers.iter().any(|c| c.email.eq_ignore_ascii_case(&input.email)) {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    let id = db.customers.iter().map(|c| c.id).max().unwrap_or(0) + 1;
    let customer = Customer {
        id,
        email: input.email,
        password: input.password,
        full_name: input.full_name,
        phone: input.phone,
        profile_image: None,
        loyalty_points: 0,
        created_at: now_rfc3339(),
    };
    db.customers.push(customer.clone());
    let token = db.issue_token(Principal::Customer(id));
    tracing::info!(customer_id = id, "customer registered");
    Ok((StatusCode::CREATED, Json(json!({ "user": customer, "token": token }))))
}

async fn login(State(db): State<Db>, Json(input): Json<Credentials>) -> Result<Json<Value>, AppError> {
    let mut db = db.write().await;
    let customer = db
        .customers
        .iter()
        .find(|c| c.email.eq_ignore_ascii_case(&input.email) && c.password == input.password)
        .cloned()
        .ok_or(AppError::InvalidCredentials)?;
    let token = db.issue_token(Principal::Customer(customer.id));
    Ok(Json(json!({ "user": customer, "token": token })))
}

async fn send_otp(Json(input): Json<OtpSend>) -> Result<Json<Value>, AppError> {
    if input.phone.trim().is_empty() {
        return Err(AppError::BadRequest("Phone number is required".to_string()));
    }
    tracing::debug!(phone = %input.phone, "otp requested");
    Ok(Json(json!({ "message": "OTP sent" })))
}

async fn verify_otp(State(db): State<Db>, Json(input): Json<OtpVerify>) -> Result<Json<Value>, AppError> {
    if input.code != DEMO_OTP {
        return Err(AppError::BadRequest("Invalid code".to_string()));
    }
    let mut db = db.write().await;
    let customer = db
        .customers
        .iter()
        .find(|c| c.phone.as_deref() == Some(input.phone.as_str()))
        .cloned()
        .ok_or_else(|| AppError::NotFound("No account for this phone number".to_string()))?;
    let token = db.issue_token(Principal::Customer(customer.id));
    Ok(Json(json!({ "user": customer, "token": token })))
}

async fn profile(State(db): State<Db>, Bearer(token): Bearer) -> Result<Json<Customer>, AppError> {
    let db = db.read().await;
    let id = db.customer_id(&token)?;
    Ok(Json(db.customer(id)?.clone()))
}

async fn update_profile(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Json(input): Json<ProfileUpdate>,
) -> Result<Json<Customer>, AppError> {
    let mut db = db.write().await;
    let id = db.customer_id(&token)?;
    let customer = db
        .customers
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;
    if let Some(name) = input.full_name {
        customer.full_name = name;
    }
    if input.phone.is_some() {
        customer.phone = input.phone;
    }
    if input.profile_image.is_some() {
        customer.profile_image = input.profile_image;
    }
    Ok(Json(customer.clone()))
}

/// Two fixed offers, priced by passenger count, filtered by capacity.
async fn search(Bearer(_token): Bearer, Json(input): Json<SearchRequest>) -> Result<Json<Vec<SearchResult>>, AppError> {
    let has_pickup = input.pickup_airport_code.is_some() || input.pickup_address.is_some();
    let has_dropoff = input.dropoff_airport_code.is_some() || input.dropoff_address.is_some();
    if !has_pickup || !has_dropoff {
        return Err(AppError::BadRequest("Pickup and dropoff are required".to_string()));
    }
    if input.passengers == 0 {
        return Err(AppError::BadRequest("At least one passenger is required".to_string()));
    }
    let offers = [
        ("SEDAN", "Standard Sedan", "Up to 3 passengers", 3, 35.0),
        ("VAN", "Minivan", "Up to 7 passengers", 7, 55.0),
    ];
    let results = offers
        .into_iter()
        .filter(|(_, _, _, max, _)| *max >= input.passengers)
        .map(|(kind, name, description, max, price)| SearchResult {
            supplier_id: 2,
            supplier_name: "Atlantic Transfers".to_string(),
            supplier_rating: 4.8,
            supplier_reviews: 212,
            vehicle_type: kind.to_string(),
            vehicle_name: name.to_string(),
            vehicle_description: description.to_string(),
            max_passengers: max,
            max_luggage: max,
            vehicle_image: None,
            price,
            currency: "EUR".to_string(),
            duration: 25,
            distance: 14.2,
            features: vec!["Meet & Greet".to_string(), "Free waiting".to_string()],
            airport_id: Some(1),
            zone_id: None,
            route_id: None,
        })
        .collect();
    Ok(Json(results))
}

fn place(airport_code: Option<&str>, address: Option<&str>, lat: Option<f64>, lng: Option<f64>) -> Place {
    let name = airport_code
        .map(|c| format!("{c} Airport"))
        .or_else(|| address.map(str::to_string))
        .unwrap_or_default();
    Place {
        address: address.map(str::to_string).unwrap_or_else(|| name.clone()),
        name,
        latitude: lat.unwrap_or_default(),
        longitude: lng.unwrap_or_default(),
    }
}

fn in_upcoming(b: &BookingRecord) -> bool {
    !b.is_terminal()
}

async fn list_bookings(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Value>, AppError> {
    let db = db.read().await;
    let id = db.customer_id(&token)?;
    let past = query.kind.as_deref() == Some("past");
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).max(1);
    let bookings: Vec<BookingView> = db
        .bookings
        .iter()
        .filter(|b| b.customer_id == id && in_upcoming(b) != past)
        .skip(((page - 1) * limit) as usize)
        .take(limit as usize)
        .map(|b| db.booking_view(b))
        .collect();
    Ok(Json(json!({ "bookings": bookings, "page": page, "limit": limit })))
}

async fn create_booking(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Json(input): Json<CreateBooking>,
) -> Result<(StatusCode, Json<BookingView>), AppError> {
    let mut db = db.write().await;
    let customer_id = db.customer_id(&token)?;
    let req = &input.search_request;
    let id = db.bookings.iter().map(|b| b.id).max().unwrap_or(0) + 1;
    let discount = match input.promo_code.as_deref() {
        Some("WELCOME10") => 0.9,
        _ => 1.0,
    };
    let price = input.search_result.price * discount;
    let now = now_rfc3339();
    let record = BookingRecord {
        id,
        public_code: format!("ATP-{}", 1000 + id),
        status: "PENDING".to_string(),
        payment_status: "PENDING".to_string(),
        pickup: place(
            req.pickup_airport_code.as_deref(),
            req.pickup_address.as_deref(),
            req.pickup_latitude,
            req.pickup_longitude,
        ),
        dropoff: place(
            req.dropoff_airport_code.as_deref(),
            req.dropoff_address.as_deref(),
            req.dropoff_latitude,
            req.dropoff_longitude,
        ),
        pickup_date: req.pickup_date.clone(),
        pickup_time: req.pickup_time.clone(),
        flight_number: input.flight_number,
        notes: input.notes,
        vehicle_type: input.search_result.vehicle_type.clone(),
        passengers: req.passengers,
        luggage: 0,
        price,
        driver_earnings: (price * 0.8 * 100.0).round() / 100.0,
        currency: input.search_result.currency.clone(),
        customer_id,
        customer_name: input.passenger_details.name,
        customer_email: input.passenger_details.email,
        customer_phone: input.passenger_details.phone,
        supplier_id: input.search_result.supplier_id,
        affiliate_id: None,
        driver_id: None,
        created_at: now.clone(),
        updated_at: now,
    };
    tracing::info!(code = %record.public_code, pickup = %req.pickup_type, dropoff = %req.dropoff_type, "booking created");
    let view = db.booking_view(&record);
    db.bookings.push(record);
    Ok((StatusCode::CREATED, Json(view)))
}

fn owned<'a>(b: &'a BookingRecord, customer_id: i64) -> Result<&'a BookingRecord, AppError> {
    if b.customer_id == customer_id {
        Ok(b)
    } else {
        Err(AppError::NotFound("Booking not found".to_string()))
    }
}

async fn get_booking(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Path(code): Path<String>,
) -> Result<Json<BookingView>, AppError> {
    let db = db.read().await;
    let id = db.customer_id(&token)?;
    let booking = owned(db.booking_by_code(&code)?, id)?;
    Ok(Json(db.booking_view(booking)))
}

async fn cancel_booking(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Path(code): Path<String>,
    Json(input): Json<Cancel>,
) -> Result<Json<Value>, AppError> {
    let mut db = db.write().await;
    let id = db.customer_id(&token)?;
    owned(db.booking_by_code(&code)?, id)?;
    let booking = db
        .bookings
        .iter_mut()
        .find(|b| b.public_code == code)
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    if booking.is_terminal() || booking.status == "IN_PROGRESS" {
        return Err(AppError::BadRequest("Booking cannot be cancelled".to_string()));
    }
    booking.status = "CANCELLED".to_string();
    booking.updated_at = now_rfc3339();
    if let Some(reason) = input.reason {
        booking.notes = Some(reason);
    }
    Ok(Json(json!({ "message": "Booking cancelled" })))
}

async fn payment_intent(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Path(code): Path<String>,
) -> Result<Json<Value>, AppError> {
    let db = db.read().await;
    let id = db.customer_id(&token)?;
    let booking = owned(db.booking_by_code(&code)?, id)?;
    if booking.payment_status == "PAID" {
        return Err(AppError::BadRequest("Booking is already paid".to_string()));
    }
    Ok(Json(json!({ "clientSecret": format!("pi_{}_secret", booking.public_code) })))
}

/// Public: knowing the booking code is enough.
pub async fn track(State(db): State<Db>, Path(code): Path<String>) -> Result<Json<Value>, AppError> {
    let db = db.read().await;
    let view = db.booking_view(db.booking_by_code(&code)?);
    let driver_location = view.driver_location.clone();
    Ok(Json(json!({ "booking": view, "driverLocation": driver_location })))
}
