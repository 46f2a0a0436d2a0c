use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::model::{BookingRecord, BookingView, Partner, PartnerDriverView, PartnerVehicleView};
use crate::routes::driver::summarize;
use crate::state::{now_rfc3339, today, Backend, Bearer, Db, Principal};

pub fn router() -> Router<Db> {
    Router::new()
        .route("/login", post(login))
        .route("/profile", get(profile))
        .route("/dashboard", get(dashboard))
        .route("/bookings", get(list_bookings))
        .route("/bookings/{id}", get(get_booking).patch(update_booking))
        .route("/earnings", get(earnings))
        .route("/payouts", post(payout))
        .route("/drivers", get(list_drivers))
        .route("/drivers/{id}", get(get_driver).patch(update_driver))
        .route("/vehicles", get(list_vehicles))
        .route("/vehicles/{id}", get(get_vehicle).patch(update_vehicle))
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct BookingQuery {
    status: Option<String>,
    page: Option<usize>,
    limit: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingUpdate {
    status: Option<String>,
    driver_id: Option<i64>,
}

#[derive(Deserialize)]
struct EarningsQuery {
    period: Option<String>,
}

#[derive(Deserialize)]
struct Payout {
    amount: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Flags {
    is_active: Option<bool>,
    is_available: Option<bool>,
}

fn partner(db: &Backend, token: &str) -> Result<Principal, AppError> {
    match db.principal(token)? {
        p @ (Principal::Affiliate(_) | Principal::Supplier(_)) => Ok(p),
        _ => Err(AppError::Unauthorized),
    }
}

/// Fleet management is for suppliers only.
fn supplier_id(db: &Backend, token: &str) -> Result<i64, AppError> {
    match partner(db, token)? {
        Principal::Supplier(id) => Ok(id),
        _ => Err(AppError::Unauthorized),
    }
}

fn visible(b: &BookingRecord, principal: Principal) -> bool {
    match principal {
        Principal::Supplier(id) => b.supplier_id == id,
        Principal::Affiliate(id) => b.affiliate_id == Some(id),
        _ => false,
    }
}

fn find_account(db: &Backend, principal: Principal) -> Result<&Partner, AppError> {
    db.partners
        .iter()
        .map(|a| &a.partner)
        .find(|p| match (p, principal) {
            (Partner::Supplier(s), Principal::Supplier(id)) => s.id == id,
            (Partner::Affiliate(a), Principal::Affiliate(id)) => a.id == id,
            _ => false,
        })
        .ok_or(AppError::Unauthorized)
}

async fn login(State(db): State<Db>, Json(input): Json<Credentials>) -> Result<Json<Value>, AppError> {
    let mut db = db.write().await;
    let account = db
        .partners
        .iter()
        .find(|a| {
            a.partner.kind() == input.kind
                && a.partner.contact_email().eq_ignore_ascii_case(&input.email)
                && a.password == input.password
        })
        .map(|a| a.partner.clone())
        .ok_or(AppError::InvalidCredentials)?;
    let principal = match &account {
        Partner::Affiliate(a) => Principal::Affiliate(a.id),
        Partner::Supplier(s) => Principal::Supplier(s.id),
    };
    let token = db.issue_token(principal);
    tracing::info!(kind = account.kind(), "partner signed in");
    Ok(Json(json!({ "success": true, "user": account, "token": token })))
}

async fn profile(State(db): State<Db>, Bearer(token): Bearer) -> Result<Json<Partner>, AppError> {
    let db = db.read().await;
    let principal = partner(&db, &token)?;
    Ok(Json(find_account(&db, principal)?.clone()))
}

fn visible_views(db: &Backend, principal: Principal) -> Vec<BookingView> {
    db.bookings
        .iter()
        .filter(|b| visible(b, principal))
        .map(|b| db.booking_view(b))
        .collect()
}

fn earnings_for(db: &Backend, principal: Principal) -> crate::model::EarningsSummary {
    let rides: Vec<&BookingRecord> = db.bookings.iter().filter(|b| visible(b, principal)).collect();
    summarize(&rides, today(), 0.0)
}

async fn dashboard(State(db): State<Db>, Bearer(token): Bearer) -> Result<Json<Value>, AppError> {
    let db = db.read().await;
    let principal = partner(&db, &token)?;
    let bookings = visible_views(&db, principal);
    let stats = json!({
        "totalBookings": bookings.len(),
        "pendingBookings": bookings.iter().filter(|b| b.status == "PENDING").count(),
        "completedBookings": bookings.iter().filter(|b| b.status == "COMPLETED").count(),
    });
    let recent: Vec<&BookingView> = bookings.iter().rev().take(5).collect();
    Ok(Json(json!({
        "summary": earnings_for(&db, principal),
        "recentBookings": recent,
        "stats": stats,
    })))
}

async fn list_bookings(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Query(query): Query<BookingQuery>,
) -> Result<Json<Value>, AppError> {
    let db = db.read().await;
    let principal = partner(&db, &token)?;
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).max(1);
    let bookings: Vec<BookingView> = visible_views(&db, principal)
        .into_iter()
        .filter(|b| query.status.as_deref().map_or(true, |s| b.status == s))
        .skip((page - 1) * limit)
        .take(limit)
        .collect();
    Ok(Json(json!({ "bookings": bookings, "page": page, "limit": limit })))
}

fn visible_index(db: &Backend, id: i64, principal: Principal) -> Result<usize, AppError> {
    db.bookings
        .iter()
        .position(|b| b.id == id && visible(b, principal))
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

async fn get_booking(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Path(id): Path<i64>,
) -> Result<Json<BookingView>, AppError> {
    let db = db.read().await;
    let idx = visible_index(&db, id, partner(&db, &token)?)?;
    Ok(Json(db.booking_view(&db.bookings[idx])))
}

async fn update_booking(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Path(id): Path<i64>,
    Json(input): Json<BookingUpdate>,
) -> Result<Json<Value>, AppError> {
    let mut db = db.write().await;
    let supplier = supplier_id(&db, &token)?;
    let idx = visible_index(&db, id, Principal::Supplier(supplier))?;
    if let Some(driver_id) = input.driver_id {
        let driver = db.driver(driver_id)?;
        if driver.supplier_id != supplier {
            return Err(AppError::NotFound("Driver not found".to_string()));
        }
    }
    let booking = &mut db.bookings[idx];
    if let Some(driver_id) = input.driver_id {
        booking.driver_id = Some(driver_id);
        if matches!(booking.status.as_str(), "PENDING" | "CONFIRMED") {
            booking.status = "DRIVER_ASSIGNED".to_string();
        }
    }
    if let Some(status) = input.status {
        booking.status = status;
    }
    booking.updated_at = now_rfc3339();
    Ok(Json(json!({ "success": true })))
}

async fn earnings(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Query(query): Query<EarningsQuery>,
) -> Result<Json<Value>, AppError> {
    let db = db.read().await;
    let principal = partner(&db, &token)?;
    tracing::debug!(period = ?query.period, "partner earnings requested");
    let transactions: Vec<Value> = db
        .bookings
        .iter()
        .filter(|b| visible(b, principal) && b.status == "COMPLETED")
        .map(|b| {
            json!({
                "id": b.id,
                "bookingCode": b.public_code,
                "date": b.pickup_date,
                "amount": b.price,
                "currency": b.currency,
                "description": format!("{} to {}", b.pickup.name, b.dropoff.name),
                "type": "earning",
            })
        })
        .collect();
    Ok(Json(json!({ "summary": earnings_for(&db, principal), "transactions": transactions })))
}

async fn payout(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Json(input): Json<Payout>,
) -> Result<Json<Value>, AppError> {
    if input.amount <= 0.0 {
        return Err(AppError::BadRequest("Amount must be positive".to_string()));
    }
    let mut db = db.write().await;
    partner(&db, &token)?;
    let payout_id = db.next_payout_id;
    db.next_payout_id += 1;
    Ok(Json(json!({ "message": "Payout requested", "payoutId": payout_id })))
}

fn driver_view(db: &Backend, id: i64) -> Result<PartnerDriverView, AppError> {
    let d = db.driver(id)?;
    let vehicle = d.vehicle_id.and_then(|v| db.vehicles.iter().find(|x| x.id == v));
    Ok(PartnerDriverView {
        id: d.id,
        name: d.name.clone(),
        phone: d.phone.clone(),
        email: d.email.clone(),
        photo_url: d.profile_image.clone(),
        license_number: d.license_number.clone(),
        is_active: d.is_active,
        is_available: d.is_online,
        rating: d.rating,
        total_rides: d.total_rides,
        vehicle_id: d.vehicle_id,
        vehicle_info: vehicle.map(|v| format!("{} {} ({})", v.make, v.model, v.plate_number)),
    })
}

async fn list_drivers(State(db): State<Db>, Bearer(token): Bearer) -> Result<Json<Vec<PartnerDriverView>>, AppError> {
    let db = db.read().await;
    let supplier = supplier_id(&db, &token)?;
    let ids: Vec<i64> = db.drivers.iter().filter(|d| d.supplier_id == supplier).map(|d| d.id).collect();
    let views = ids
        .into_iter()
        .map(|id| driver_view(&db, id))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(views))
}

fn fleet_driver(db: &Backend, supplier: i64, id: i64) -> Result<(), AppError> {
    match db.driver(id) {
        Ok(d) if d.supplier_id == supplier => Ok(()),
        _ => Err(AppError::NotFound("Driver not found".to_string())),
    }
}

async fn get_driver(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Path(id): Path<i64>,
) -> Result<Json<PartnerDriverView>, AppError> {
    let db = db.read().await;
    fleet_driver(&db, supplier_id(&db, &token)?, id)?;
    Ok(Json(driver_view(&db, id)?))
}

async fn update_driver(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Path(id): Path<i64>,
    Json(input): Json<Flags>,
) -> Result<Json<Value>, AppError> {
    let mut db = db.write().await;
    let supplier = supplier_id(&db, &token)?;
    fleet_driver(&db, supplier, id)?;
    let driver = db.driver_mut(id)?;
    if let Some(active) = input.is_active {
        driver.is_active = active;
        if !active {
            driver.is_online = false;
        }
    }
    if let Some(available) = input.is_available {
        driver.is_online = available && driver.is_active;
    }
    Ok(Json(json!({ "success": true })))
}

fn vehicle_view(db: &Backend, idx: usize) -> PartnerVehicleView {
    let vehicle = db.vehicles[idx].clone();
    let driver = db.drivers.iter().find(|d| d.vehicle_id == Some(vehicle.id));
    PartnerVehicleView {
        photo_url: None,
        driver_id: driver.map(|d| d.id),
        driver_name: driver.map(|d| d.name.clone()),
        vehicle,
    }
}

fn fleet_vehicle(db: &Backend, supplier: i64, id: i64) -> Result<usize, AppError> {
    db.vehicles
        .iter()
        .position(|v| v.id == id && v.supplier_id == supplier)
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
}

async fn list_vehicles(State(db): State<Db>, Bearer(token): Bearer) -> Result<Json<Vec<PartnerVehicleView>>, AppError> {
    let db = db.read().await;
    let supplier = supplier_id(&db, &token)?;
    let views = (0..db.vehicles.len())
        .filter(|&i| db.vehicles[i].supplier_id == supplier)
        .map(|i| vehicle_view(&db, i))
        .collect();
    Ok(Json(views))
}

async fn get_vehicle(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Path(id): Path<i64>,
) -> Result<Json<PartnerVehicleView>, AppError> {
    let db = db.read().await;
    let idx = fleet_vehicle(&db, supplier_id(&db, &token)?, id)?;
    Ok(Json(vehicle_view(&db, idx)))
}

async fn update_vehicle(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Path(id): Path<i64>,
    Json(input): Json<Flags>,
) -> Result<Json<Value>, AppError> {
    let mut db = db.write().await;
    let idx = fleet_vehicle(&db, supplier_id(&db, &token)?, id)?;
    if let Some(active) = input.is_active {
        db.vehicles[idx].is_active = active;
    }
    Ok(Json(json!({ "success": true })))
}
