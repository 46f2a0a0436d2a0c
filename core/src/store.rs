//! Screen state containers. Each one is mutated only from confirmed server
//! responses, last write wins.

use crate::geo::Coordinates;
use crate::types::{
    Booking, BookingStatus, DriverLocation, DriverRide, EarningsSummary, EarningsTransaction,
    PaymentStatus,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingPatch {
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub driver_location: Option<DriverLocation>,
}

impl BookingPatch {
    fn apply_to(&self, booking: &mut Booking) {
        if let Some(status) = &self.status {
            booking.status = status.clone();
        }
        if let Some(payment) = &self.payment_status {
            booking.payment_status = payment.clone();
        }
        if let Some(loc) = &self.driver_location {
            booking.driver_location = Some(loc.clone());
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingsStore {
    pub bookings: Vec<Booking>,
    pub current: Option<Booking>,
    pub loading: bool,
    pub error: Option<String>,
}

impl BookingsStore {
    pub fn set_bookings(&mut self, bookings: Vec<Booking>) {
        self.bookings = bookings;
        self.error = None;
    }

    pub fn set_current(&mut self, booking: Option<Booking>) {
        self.current = booking;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Patch the list entry and `current` that share `public_code`.
    pub fn apply(&mut self, public_code: &str, patch: &BookingPatch) {
        for booking in self.bookings.iter_mut().filter(|b| b.public_code == public_code) {
            patch.apply_to(booking);
        }
        if let Some(current) = self.current.as_mut().filter(|b| b.public_code == public_code) {
            patch.apply_to(current);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RidePatch {
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RidesStore {
    pub rides: Vec<DriverRide>,
    pub active_ride: Option<DriverRide>,
    pub online: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl RidesStore {
    pub fn set_rides(&mut self, rides: Vec<DriverRide>) {
        self.rides = rides;
        self.error = None;
    }

    pub fn set_active_ride(&mut self, ride: Option<DriverRide>) {
        self.active_ride = ride;
    }

    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Patch ride `id` in the list. The active ride follows: it is replaced
    /// when it is the patched ride, and dropped once that ride leaves
    /// `IN_PROGRESS`.
    pub fn update_ride(&mut self, id: i64, patch: &RidePatch) {
        for ride in self.rides.iter_mut().filter(|r| r.id == id) {
            if let Some(status) = &patch.status {
                ride.status = status.clone();
            }
            if let Some(notes) = &patch.notes {
                ride.notes = Some(notes.clone());
            }
        }
        let updated = self.rides.iter().find(|r| r.id == id).cloned();
        match updated {
            Some(ride) if ride.status == BookingStatus::InProgress => {
                self.active_ride = Some(ride);
            }
            Some(_) if self.active_ride.as_ref().is_some_and(|r| r.id == id) => {
                self.active_ride = None;
            }
            _ => {}
        }
    }

    pub fn active_from_rides(&self) -> Option<DriverRide> {
        active_from_rides(&self.rides)
    }
}

/// First ride currently `IN_PROGRESS`.
pub fn active_from_rides(rides: &[DriverRide]) -> Option<DriverRide> {
    rides
        .iter()
        .find(|r| r.status == BookingStatus::InProgress)
        .cloned()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EarningsStore {
    pub summary: Option<EarningsSummary>,
    pub transactions: Vec<EarningsTransaction>,
    pub has_more: bool,
    pub page: u32,
    pub loading: bool,
    pub error: Option<String>,
}

impl EarningsStore {
    pub fn set_summary(&mut self, summary: EarningsSummary) {
        self.summary = Some(summary);
    }

    /// Page 1 replaces the list; later pages extend it.
    pub fn append_transactions(&mut self, page: u32, items: Vec<EarningsTransaction>, has_more: bool) {
        if page <= 1 {
            self.transactions = items;
        } else {
            self.transactions.extend(items);
        }
        self.page = page;
        self.has_more = has_more;
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_more.then_some(self.page + 1)
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocationState {
    pub current: Option<Coordinates>,
    pub heading: Option<f64>,
    pub tracking: bool,
}
