use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, NaiveDate, SecondsFormat, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::{
    Affiliate, Airport, AssignedDriverView, BookingRecord, BookingView, Customer, Driver,
    DriverLocationView, DriverTransaction, LocationReport, Partner, PartnerAccount, Place,
    Supplier, Vehicle,
};

/// Who a bearer token was issued to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Principal {
    Customer(i64),
    Driver(i64),
    Affiliate(i64),
    Supplier(i64),
}

/// Everything the mock backend knows. One lock guards the whole store.
#[derive(Debug, Default)]
pub struct Backend {
    pub customers: Vec<Customer>,
    pub drivers: Vec<Driver>,
    pub partners: Vec<PartnerAccount>,
    pub vehicles: Vec<Vehicle>,
    pub bookings: Vec<BookingRecord>,
    pub transactions: Vec<DriverTransaction>,
    pub airports: Vec<Airport>,
    pub locations: Vec<LocationReport>,
    pub push_tokens: HashMap<String, String>,
    pub sessions: HashMap<String, Principal>,
    pub next_payout_id: i64,
}

pub type Db = Arc<RwLock<Backend>>;

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl Backend {
    pub fn issue_token(&mut self, principal: Principal) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.clone(), principal);
        token
    }

    pub fn principal(&self, token: &str) -> Result<Principal, AppError> {
        self.sessions.get(token).copied().ok_or(AppError::Unauthorized)
    }

    pub fn customer_id(&self, token: &str) -> Result<i64, AppError> {
        match self.principal(token)? {
            Principal::Customer(id) => Ok(id),
            _ => Err(AppError::Unauthorized),
        }
    }

    pub fn driver_id(&self, token: &str) -> Result<i64, AppError> {
        match self.principal(token)? {
            Principal::Driver(id) => Ok(id),
            _ => Err(AppError::Unauthorized),
        }
    }

    pub fn driver(&self, id: i64) -> Result<&Driver, AppError> {
        self.drivers
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))
    }

    pub fn driver_mut(&mut self, id: i64) -> Result<&mut Driver, AppError> {
        self.drivers
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))
    }

    pub fn customer(&self, id: i64) -> Result<&Customer, AppError> {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
    }

    pub fn booking_by_code(&self, code: &str) -> Result<&BookingRecord, AppError> {
        self.bookings
            .iter()
            .find(|b| b.public_code == code)
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }

    pub fn last_location(&self, driver_id: i64) -> Option<&LocationReport> {
        self.locations.iter().rev().find(|l| l.driver_id == driver_id)
    }

    pub fn booking_view(&self, b: &BookingRecord) -> BookingView {
        let driver = b
            .driver_id
            .and_then(|id| self.drivers.iter().find(|d| d.id == id));
        let vehicle = driver
            .and_then(|d| d.vehicle_id)
            .and_then(|id| self.vehicles.iter().find(|v| v.id == id));
        let driver_location = match (driver, b.status.as_str()) {
            (Some(d), "DRIVER_ASSIGNED" | "ON_THE_WAY" | "ARRIVED" | "IN_PROGRESS") => {
                self.last_location(d.id).map(DriverLocationView::from)
            }
            _ => None,
        };
        BookingView {
            id: b.id,
            public_code: b.public_code.clone(),
            status: b.status.clone(),
            payment_status: b.payment_status.clone(),
            pickup_location: b.pickup.clone(),
            dropoff_location: b.dropoff.clone(),
            pickup_date: b.pickup_date.clone(),
            pickup_time: b.pickup_time.clone(),
            flight_number: b.flight_number.clone(),
            vehicle_type: b.vehicle_type.clone(),
            passengers: b.passengers,
            luggage: b.luggage,
            price: b.price,
            currency: b.currency.clone(),
            customer_name: b.customer_name.clone(),
            customer_email: b.customer_email.clone(),
            customer_phone: b.customer_phone.clone(),
            driver: driver.map(|d| AssignedDriverView {
                id: d.id,
                name: d.name.clone(),
                phone: d.phone.clone(),
                photo: d.profile_image.clone(),
                vehicle_make: vehicle.map(|v| v.make.clone()),
                vehicle_model: vehicle.map(|v| v.model.clone()),
                vehicle_plate: vehicle.map(|v| v.plate_number.clone()),
            }),
            driver_location,
            created_at: b.created_at.clone(),
            updated_at: b.updated_at.clone(),
        }
    }

    /// Demo accounts and bookings. Dates are relative to today so the
    /// driver's "today" and "upcoming" filters always have something to show.
    pub fn seeded() -> Self {
        let today = today();
        let day = |offset: i64| (today + Duration::days(offset)).format("%Y-%m-%d").to_string();
        let created = now_rfc3339();

        let airport = Place {
            name: "Lisbon Airport".to_string(),
            address: "Alameda das Comunidades Portuguesas, Lisboa".to_string(),
            latitude: 38.7742,
            longitude: -9.1342,
        };
        let rossio = Place {
            name: "Rossio".to_string(),
            address: "Praca Dom Pedro IV, Lisboa".to_string(),
            latitude: 38.7139,
            longitude: -9.1394,
        };
        let cascais = Place {
            name: "Cascais Marina".to_string(),
            address: "Marina de Cascais".to_string(),
            latitude: 38.6925,
            longitude: -9.4186,
        };

        let customers = vec![Customer {
            id: 1,
            email: "ana@example.pt".to_string(),
            password: "password123".to_string(),
            full_name: "Ana Lima".to_string(),
            phone: Some("+351912345678".to_string()),
            profile_image: None,
            loyalty_points: 120,
            created_at: created.clone(),
        }];

        let drivers = vec![
            Driver {
                id: 4,
                supplier_id: 2,
                supplier_name: "Atlantic Transfers".to_string(),
                name: "Rui Costa".to_string(),
                email: "rui@atlantic.pt".to_string(),
                password: "password123".to_string(),
                phone: "+351911111111".to_string(),
                profile_image: None,
                vehicle_id: Some(9),
                is_online: false,
                is_active: true,
                rating: 4.9,
                total_rides: 310,
                license_number: "L-482913".to_string(),
            },
            Driver {
                id: 5,
                supplier_id: 2,
                supplier_name: "Atlantic Transfers".to_string(),
                name: "Marta Sousa".to_string(),
                email: "marta@atlantic.pt".to_string(),
                password: "password123".to_string(),
                phone: "+351922222222".to_string(),
                profile_image: None,
                vehicle_id: Some(10),
                is_online: true,
                is_active: true,
                rating: 4.7,
                total_rides: 122,
                license_number: "L-559102".to_string(),
            },
        ];

        let partners = vec![
            PartnerAccount {
                partner: Partner::Supplier(Supplier {
                    id: 2,
                    company_name: "Atlantic Transfers".to_string(),
                    contact_name: "Joana Reis".to_string(),
                    contact_email: "ops@atlantic.pt".to_string(),
                    phone: Some("+351213000000".to_string()),
                    is_verified: true,
                    rating: 4.8,
                }),
                password: "password123".to_string(),
            },
            PartnerAccount {
                partner: Partner::Affiliate(Affiliate {
                    id: 1,
                    affiliate_code: "LXHOTELS".to_string(),
                    company_name: "Lisbon Hotels Group".to_string(),
                    contact_name: "Pedro Alves".to_string(),
                    contact_email: "partners@lisbonhotels.pt".to_string(),
                    commission_rate: 0.1,
                    is_verified: true,
                }),
                password: "password123".to_string(),
            },
        ];

        let vehicles = vec![
            Vehicle {
                id: 9,
                supplier_id: 2,
                kind: "SEDAN".to_string(),
                make: "Toyota".to_string(),
                model: "Corolla".to_string(),
                year: 2022,
                color: "Silver".to_string(),
                plate_number: "AA-00-BB".to_string(),
                capacity: 3,
                luggage_capacity: 3,
                is_active: true,
            },
            Vehicle {
                id: 10,
                supplier_id: 2,
                kind: "VAN".to_string(),
                make: "Mercedes".to_string(),
                model: "Vito".to_string(),
                year: 2021,
                color: "Black".to_string(),
                plate_number: "CC-11-DD".to_string(),
                capacity: 7,
                luggage_capacity: 7,
                is_active: true,
            },
        ];

        let booking = |id: i64, status: &str, date: String, time: &str, driver: Option<i64>| {
            BookingRecord {
                id,
                public_code: format!("ATP-{}", 1000 + id),
                status: status.to_string(),
                payment_status: if status == "PENDING" { "PENDING" } else { "PAID" }.to_string(),
                pickup: airport.clone(),
                dropoff: if id % 2 == 0 { cascais.clone() } else { rossio.clone() },
                pickup_date: date,
                pickup_time: time.to_string(),
                flight_number: Some(format!("TP{}", 1200 + id)),
                notes: None,
                vehicle_type: "SEDAN".to_string(),
                passengers: 2,
                luggage: 2,
                price: 35.0,
                driver_earnings: 28.0,
                currency: "EUR".to_string(),
                customer_id: 1,
                customer_name: "Ana Lima".to_string(),
                customer_email: "ana@example.pt".to_string(),
                customer_phone: "+351912345678".to_string(),
                supplier_id: 2,
                affiliate_id: Some(1),
                driver_id: driver,
                created_at: created.clone(),
                updated_at: created.clone(),
            }
        };
        let bookings = vec![
            booking(1, "DRIVER_ASSIGNED", day(0), "14:30", Some(4)),
            booking(2, "CONFIRMED", day(1), "09:00", Some(4)),
            booking(3, "COMPLETED", day(-1), "18:15", Some(4)),
            booking(4, "PENDING", day(3), "07:45", None),
        ];

        let transactions = (1..=25)
            .map(|id| DriverTransaction {
                id,
                driver_id: 4,
                kind: if id % 10 == 0 { "PAYOUT" } else { "RIDE" }.to_string(),
                amount: if id % 10 == 0 { -200.0 } else { 28.0 },
                currency: "EUR".to_string(),
                description: if id % 10 == 0 {
                    "Weekly payout".to_string()
                } else {
                    "Airport transfer".to_string()
                },
                booking_code: (id % 10 != 0).then(|| format!("ATP-{}", 900 + id)),
                created_at: created.clone(),
            })
            .collect();

        let airports = vec![
            Airport {
                id: 1,
                code: "LIS".to_string(),
                name: "Lisbon Humberto Delgado".to_string(),
                city: "Lisbon".to_string(),
                country: "Portugal".to_string(),
                latitude: 38.7742,
                longitude: -9.1342,
            },
            Airport {
                id: 2,
                code: "OPO".to_string(),
                name: "Porto Francisco Sa Carneiro".to_string(),
                city: "Porto".to_string(),
                country: "Portugal".to_string(),
                latitude: 41.2481,
                longitude: -8.6814,
            },
            Airport {
                id: 3,
                code: "FAO".to_string(),
                name: "Faro".to_string(),
                city: "Faro".to_string(),
                country: "Portugal".to_string(),
                latitude: 37.0144,
                longitude: -7.9659,
            },
        ];

        Self {
            customers,
            drivers,
            partners,
            vehicles,
            bookings,
            transactions,
            airports,
            next_payout_id: 1,
            ..Self::default()
        }
    }
}

/// The bearer token of the request, not yet checked against the sessions.
pub struct Bearer(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Bearer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| Bearer(t.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}
