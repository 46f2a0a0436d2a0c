use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::model::{BookingRecord, Driver, DriverTransaction, EarningsSummary, LocationReport, RideView};
use crate::state::{now_rfc3339, today, Bearer, Db, Principal};

const TRANSACTIONS_PER_PAGE: usize = 20;

pub fn router() -> Router<Db> {
    Router::new()
        .route("/login", post(login))
        .route("/profile", get(profile).patch(update_profile))
        .route("/status", get(status).patch(set_availability))
        .route("/rides", get(list_rides))
        .route("/rides/{id}", get(get_ride).patch(update_ride_status))
        .route("/location", get(last_location).post(report_location))
        .route("/earnings", get(earnings))
        .route("/earnings/transactions", get(transactions))
}

/// Status a ride moves to for each driver action. `REJECT` hands the ride
/// back to dispatch.
pub fn apply_action(action: &str) -> Option<&'static str> {
    match action {
        "ACCEPT" => Some("DRIVER_ASSIGNED"),
        "REJECT" => Some("CONFIRMED"),
        "ON_THE_WAY" => Some("ON_THE_WAY"),
        "ARRIVED" => Some("ARRIVED"),
        "START_RIDE" => Some("IN_PROGRESS"),
        "COMPLETE" => Some("COMPLETED"),
        _ => None,
    }
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdate {
    name: Option<String>,
    phone: Option<String>,
    profile_image: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Availability {
    is_available: bool,
}

#[derive(Deserialize)]
struct RideQuery {
    filter: Option<String>,
}

#[derive(Deserialize)]
struct StatusChange {
    status: String,
}

#[derive(Deserialize)]
struct Fix {
    latitude: f64,
    longitude: f64,
    heading: Option<f64>,
    speed: Option<f64>,
    accuracy: Option<f64>,
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<usize>,
}

async fn login(State(db): State<Db>, Json(input): Json<Credentials>) -> Result<Json<Value>, AppError> {
    let mut db = db.write().await;
    let driver = db
        .drivers
        .iter()
        .find(|d| d.email.eq_ignore_ascii_case(&input.email) && d.password == input.password)
        .cloned()
        .ok_or(AppError::InvalidCredentials)?;
    if !driver.is_active {
        return Err(AppError::BadRequest("Driver account is inactive".to_string()));
    }
    let token = db.issue_token(Principal::Driver(driver.id));
    tracing::info!(driver_id = driver.id, "driver signed in");
    Ok(Json(json!({ "driver": driver, "token": token })))
}

async fn profile(State(db): State<Db>, Bearer(token): Bearer) -> Result<Json<Driver>, AppError> {
    let db = db.read().await;
    let id = db.driver_id(&token)?;
    Ok(Json(db.driver(id)?.clone()))
}

async fn update_profile(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Json(input): Json<ProfileUpdate>,
) -> Result<Json<Driver>, AppError> {
    let mut db = db.write().await;
    let id = db.driver_id(&token)?;
    let driver = db.driver_mut(id)?;
    if let Some(name) = input.name {
        driver.name = name;
    }
    if let Some(phone) = input.phone {
        driver.phone = phone;
    }
    if input.profile_image.is_some() {
        driver.profile_image = input.profile_image;
    }
    Ok(Json(driver.clone()))
}

async fn status(State(db): State<Db>, Bearer(token): Bearer) -> Result<Json<Value>, AppError> {
    let db = db.read().await;
    let driver = db.driver(db.driver_id(&token)?)?;
    Ok(Json(json!({ "isActive": driver.is_active, "isAvailable": driver.is_online })))
}

async fn set_availability(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Json(input): Json<Availability>,
) -> Result<Json<Value>, AppError> {
    let mut db = db.write().await;
    let id = db.driver_id(&token)?;
    let driver = db.driver_mut(id)?;
    driver.is_online = input.is_available;
    tracing::info!(driver_id = id, available = input.is_available, "availability changed");
    Ok(Json(json!({ "success": true, "isAvailable": input.is_available })))
}

fn matches_filter(ride: &BookingRecord, filter: Option<&str>, today: NaiveDate) -> bool {
    let date = NaiveDate::parse_from_str(&ride.pickup_date, "%Y-%m-%d").ok();
    match filter {
        Some("today") => date == Some(today),
        Some("upcoming") => !ride.is_terminal() && date.is_some_and(|d| d > today),
        Some("past") => ride.is_terminal(),
        _ => true,
    }
}

async fn list_rides(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Query(query): Query<RideQuery>,
) -> Result<Json<Value>, AppError> {
    let db = db.read().await;
    let id = db.driver_id(&token)?;
    let today = today();
    let rides: Vec<RideView> = db
        .bookings
        .iter()
        .filter(|b| b.driver_id == Some(id))
        .filter(|b| matches_filter(b, query.filter.as_deref(), today))
        .map(RideView::from)
        .collect();
    Ok(Json(json!({ "rides": rides })))
}

fn assigned(db: &crate::state::Backend, ride_id: i64, driver_id: i64) -> Result<usize, AppError> {
    db.bookings
        .iter()
        .position(|b| b.id == ride_id && b.driver_id == Some(driver_id))
        .ok_or_else(|| AppError::NotFound("Ride not found".to_string()))
}

async fn get_ride(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Path(ride_id): Path<i64>,
) -> Result<Json<RideView>, AppError> {
    let db = db.read().await;
    let idx = assigned(&db, ride_id, db.driver_id(&token)?)?;
    Ok(Json(RideView::from(&db.bookings[idx])))
}

async fn update_ride_status(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Path(ride_id): Path<i64>,
    Json(input): Json<StatusChange>,
) -> Result<Json<Value>, AppError> {
    let mut db = db.write().await;
    let driver_id = db.driver_id(&token)?;
    let idx = assigned(&db, ride_id, driver_id)?;
    let next = apply_action(&input.status)
        .ok_or_else(|| AppError::BadRequest("Invalid status".to_string()))?;
    let ride = &mut db.bookings[idx];
    if ride.is_terminal() {
        return Err(AppError::BadRequest("Ride is no longer active".to_string()));
    }
    ride.status = next.to_string();
    ride.updated_at = now_rfc3339();
    if input.status == "REJECT" {
        ride.driver_id = None;
    }
    let code = ride.public_code.clone();
    if next == "COMPLETED" {
        let earned = ride.driver_earnings;
        let currency = ride.currency.clone();
        let id = db.transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        db.transactions.push(DriverTransaction {
            id,
            driver_id,
            kind: "RIDE".to_string(),
            amount: earned,
            currency,
            description: "Airport transfer".to_string(),
            booking_code: Some(code.clone()),
            created_at: now_rfc3339(),
        });
    }
    tracing::info!(ride_id, action = %input.status, status = next, code = %code, "ride status changed");
    Ok(Json(json!({ "success": true, "status": next })))
}

async fn report_location(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Json(fix): Json<Fix>,
) -> Result<Json<Value>, AppError> {
    if !(-90.0..=90.0).contains(&fix.latitude) || !(-180.0..=180.0).contains(&fix.longitude) {
        return Err(AppError::BadRequest("Invalid coordinates".to_string()));
    }
    let mut db = db.write().await;
    let driver_id = db.driver_id(&token)?;
    db.locations.push(LocationReport {
        driver_id,
        latitude: fix.latitude,
        longitude: fix.longitude,
        heading: fix.heading,
        speed: fix.speed,
        accuracy: fix.accuracy,
        updated_at: now_rfc3339(),
    });
    tracing::debug!(driver_id, lat = fix.latitude, lng = fix.longitude, "location recorded");
    Ok(Json(json!({ "success": true })))
}

async fn last_location(State(db): State<Db>, Bearer(token): Bearer) -> Result<Json<LocationReport>, AppError> {
    let db = db.read().await;
    let driver_id = db.driver_id(&token)?;
    db.last_location(driver_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No location reported".to_string()))
}

/// Summary over completed rides, bucketed by pickup date.
pub fn summarize(rides: &[&BookingRecord], today: NaiveDate, pending_payout: f64) -> EarningsSummary {
    let mut summary = EarningsSummary {
        today: 0.0,
        this_week: 0.0,
        this_month: 0.0,
        total: 0.0,
        currency: "EUR".to_string(),
        pending_payout,
        completed_rides: 0,
    };
    let week_start = today - chrono::Duration::days(today.weekday().num_days_from_monday() as i64);
    for ride in rides.iter().filter(|r| r.status == "COMPLETED") {
        let Ok(date) = NaiveDate::parse_from_str(&ride.pickup_date, "%Y-%m-%d") else {
            continue;
        };
        let amount = ride.driver_earnings;
        summary.total += amount;
        summary.completed_rides += 1;
        if date == today {
            summary.today += amount;
        }
        if date >= week_start && date <= today {
            summary.this_week += amount;
        }
        if date.year() == today.year() && date.month() == today.month() {
            summary.this_month += amount;
        }
    }
    summary
}

async fn earnings(State(db): State<Db>, Bearer(token): Bearer) -> Result<Json<EarningsSummary>, AppError> {
    let db = db.read().await;
    let driver_id = db.driver_id(&token)?;
    let rides: Vec<&BookingRecord> = db
        .bookings
        .iter()
        .filter(|b| b.driver_id == Some(driver_id))
        .collect();
    let pending: f64 = db
        .transactions
        .iter()
        .filter(|t| t.driver_id == driver_id)
        .map(|t| t.amount)
        .sum();
    Ok(Json(summarize(&rides, today(), pending.max(0.0))))
}

async fn transactions(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, AppError> {
    let db = db.read().await;
    let driver_id = db.driver_id(&token)?;
    let page = query.page.unwrap_or(1).max(1);
    let mine: Vec<&DriverTransaction> = db
        .transactions
        .iter()
        .rev()
        .filter(|t| t.driver_id == driver_id)
        .collect();
    let start = (page - 1) * TRANSACTIONS_PER_PAGE;
    let items: Vec<&DriverTransaction> = mine.iter().skip(start).take(TRANSACTIONS_PER_PAGE).copied().collect();
    let has_more = mine.len() > start + items.len();
    Ok(Json(json!({ "transactions": items, "hasMore": has_more })))
}
