use tracing::debug;
use transfer_core::store::{BookingPatch, BookingsStore};
use transfer_core::types::{Booking, BookingType, Message};
use transfer_core::{ApiResponse, CreateBookingRequest};

use crate::client::MobileClient;
use crate::{shared, Shared};

/// Customer bookings: the list screen, the detail screen and the checkout
/// flow all read from the same store.
#[derive(Debug, Clone)]
pub struct BookingsController {
    client: MobileClient,
    store: Shared<BookingsStore>,
}

impl BookingsController {
    pub fn new(client: MobileClient) -> Self {
        Self::with_store(client, shared(BookingsStore::default()))
    }

    pub fn with_store(client: MobileClient, store: Shared<BookingsStore>) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> Shared<BookingsStore> {
        self.store.clone()
    }

    pub async fn snapshot(&self) -> BookingsStore {
        self.store.read().await.clone()
    }

    /// Reload the list for `kind`. Returns whether the list was replaced.
    pub async fn refresh(&self, kind: BookingType) -> bool {
        self.store.write().await.set_loading(true);
        let env = self.client.call(|api| api.customer().get_bookings(Some(kind), None, None)).await;

        let mut store = self.store.write().await;
        store.set_loading(false);
        match env.into_result() {
            Ok(page) => {
                debug!(kind = kind.as_str(), count = page.bookings.len(), "bookings refreshed");
                store.set_bookings(page.bookings);
                true
            }
            Err(message) => {
                store.set_error(Some(message));
                false
            }
        }
    }

    /// Fetch one booking into `current`.
    pub async fn load(&self, public_code: &str) -> bool {
        self.store.write().await.set_loading(true);
        let env = self.client.call(|api| api.customer().get_booking(public_code)).await;

        let mut store = self.store.write().await;
        store.set_loading(false);
        match env.into_result() {
            Ok(booking) => {
                store.apply(&booking.public_code, &patch_from(&booking));
                store.set_current(Some(booking));
                store.set_error(None);
                true
            }
            Err(message) => {
                store.set_error(Some(message));
                false
            }
        }
    }

    /// Cancel, then reload the booking so the store shows the server's
    /// view of it.
    pub async fn cancel(&self, public_code: &str, reason: Option<&str>) -> ApiResponse<Message> {
        let env = self
            .client
            .call(|api| api.customer().cancel_booking(public_code, reason))
            .await;
        match env.error_message() {
            None => {
                self.load(public_code).await;
            }
            Some(message) => self.store.write().await.set_error(Some(message.to_string())),
        }
        env
    }

    /// Place a booking; the new booking becomes `current`.
    pub async fn create(&self, request: &CreateBookingRequest) -> ApiResponse<Booking> {
        let env = self.client.call(|api| api.customer().create_booking(request)).await;
        let mut store = self.store.write().await;
        match (&env.data, env.error_message()) {
            (Some(booking), None) => {
                store.set_current(Some(booking.clone()));
                store.set_error(None);
            }
            (_, message) => store.set_error(message.map(str::to_string)),
        }
        env
    }
}

fn patch_from(booking: &Booking) -> BookingPatch {
    BookingPatch {
        status: Some(booking.status.clone()),
        payment_status: Some(booking.payment_status.clone()),
        driver_location: booking.driver_location.clone(),
    }
}
