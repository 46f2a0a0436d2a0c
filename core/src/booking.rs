//! Customer search-to-booking flow: the search form, the passenger form and
//! the payload that merges them into a booking request.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;
use crate::types::{PlaceKind, SearchRequest, SearchResult};
use crate::validate::{is_valid_email, is_valid_phone};

const DEFAULT_TIME: &str = "12:00";
const DEFAULT_PASSENGERS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportChoice {
    pub code: String,
    pub name: String,
}

/// State behind the customer search screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchForm {
    pub pickup_type: PlaceKind,
    pub dropoff_type: PlaceKind,
    pub pickup_airport: Option<AirportChoice>,
    pub dropoff_airport: Option<AirportChoice>,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub pickup_coords: Option<Coordinates>,
    pub dropoff_coords: Option<Coordinates>,
    pub pickup_date: NaiveDate,
    pub pickup_time: String,
    pub passengers: u32,
    pub is_return: bool,
    pub return_date: Option<NaiveDate>,
    pub return_time: String,
}

impl SearchForm {
    /// Fresh form: airport pickup, address dropoff, two passengers at noon
    /// on `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            pickup_type: PlaceKind::Airport,
            dropoff_type: PlaceKind::Address,
            pickup_airport: None,
            dropoff_airport: None,
            pickup_address: String::new(),
            dropoff_address: String::new(),
            pickup_coords: None,
            dropoff_coords: None,
            pickup_date: today,
            pickup_time: DEFAULT_TIME.to_string(),
            passengers: DEFAULT_PASSENGERS,
            is_return: false,
            return_date: None,
            return_time: DEFAULT_TIME.to_string(),
        }
    }

    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    pub fn set_pickup_address(&mut self, address: impl Into<String>, coords: Option<Coordinates>) {
        self.pickup_address = address.into();
        self.pickup_coords = coords;
    }

    pub fn set_dropoff_address(&mut self, address: impl Into<String>, coords: Option<Coordinates>) {
        self.dropoff_address = address.into();
        self.dropoff_coords = coords;
    }

    /// Exchange pickup and dropoff, including kinds, airports, addresses and
    /// coordinates. Dates and passengers stay put.
    pub fn swap_locations(&mut self) {
        std::mem::swap(&mut self.pickup_type, &mut self.dropoff_type);
        std::mem::swap(&mut self.pickup_airport, &mut self.dropoff_airport);
        std::mem::swap(&mut self.pickup_address, &mut self.dropoff_address);
        std::mem::swap(&mut self.pickup_coords, &mut self.dropoff_coords);
    }

    pub fn to_request(&self) -> SearchRequest {
        let non_empty = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        let (return_date, return_time) = if self.is_return {
            (
                self.return_date.map(|d| d.format("%Y-%m-%d").to_string()),
                self.return_date.map(|_| self.return_time.clone()),
            )
        } else {
            (None, None)
        };
        SearchRequest {
            pickup_type: self.pickup_type,
            dropoff_type: self.dropoff_type,
            pickup_airport_code: self.pickup_airport.as_ref().map(|a| a.code.clone()),
            dropoff_airport_code: self.dropoff_airport.as_ref().map(|a| a.code.clone()),
            pickup_address: non_empty(&self.pickup_address),
            dropoff_address: non_empty(&self.dropoff_address),
            pickup_latitude: self.pickup_coords.map(|c| c.latitude),
            pickup_longitude: self.pickup_coords.map(|c| c.longitude),
            dropoff_latitude: self.dropoff_coords.map(|c| c.latitude),
            dropoff_longitude: self.dropoff_coords.map(|c| c.longitude),
            pickup_date: self.pickup_date.format("%Y-%m-%d").to_string(),
            pickup_time: self.pickup_time.clone(),
            passengers: self.passengers,
            return_date,
            return_time,
        }
    }
}

/// Field-keyed validation messages; empty when the form is valid.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

/// Passenger details collected before payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub notes: String,
}

impl PassengerForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "Full name is required");
        }
        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.insert("email", "Invalid email format");
        }
        if self.phone.trim().is_empty() {
            errors.insert("phone", "Phone number is required");
        } else if !is_valid_phone(&self.phone) {
            errors.insert("phone", "Invalid phone number");
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Body of `POST /api/mobile/customer/bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub search_result: SearchResult,
    pub search_request: SearchRequest,
    pub passenger_details: PassengerDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
}

fn present(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl CreateBookingRequest {
    /// Merge the chosen result, the search that produced it and the
    /// passenger form. Optional fields are only carried when non-blank.
    pub fn compose(
        result: &SearchResult,
        request: &SearchRequest,
        passenger: &PassengerForm,
        promo_code: &str,
    ) -> Self {
        Self {
            search_result: result.clone(),
            search_request: request.clone(),
            passenger_details: PassengerDetails {
                name: passenger.name.trim().to_string(),
                email: passenger.email.trim().to_string(),
                phone: passenger.phone.trim().to_string(),
            },
            flight_number: present(&passenger.flight_number),
            notes: present(&passenger.notes),
            promo_code: present(promo_code),
        }
    }
}
