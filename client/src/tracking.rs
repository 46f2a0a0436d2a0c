//! Periodic refresh of a booking's live status for the tracking screen.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};
use transfer_core::store::{BookingPatch, BookingsStore};
use transfer_core::types::TrackingSnapshot;

use crate::client::MobileClient;
use crate::subscription::Subscription;
use crate::Shared;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

pub struct TrackingPoller;

impl TrackingPoller {
    /// Poll `code` now and then every `interval` until the returned
    /// subscription is cancelled or dropped. A zero interval falls back to
    /// [`DEFAULT_POLL_INTERVAL`].
    ///
    /// Polls never overlap: the next tick waits for the previous request.
    pub fn spawn(
        client: MobileClient,
        code: impl Into<String>,
        interval: Duration,
        store: Shared<BookingsStore>,
    ) -> Subscription {
        let code = code.into();
        let interval = if interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            interval
        };

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let env = client.call(|api| api.customer().track_booking(&code)).await;
                let mut store = store.write().await;
                match env.into_result() {
                    Ok(snapshot) => {
                        debug!(%code, status = snapshot.booking.status.as_str(), "tracking snapshot");
                        apply_snapshot(&mut store, snapshot);
                    }
                    Err(message) => {
                        warn!(%code, error = %message, "tracking poll failed");
                        store.set_error(Some(message));
                    }
                }
            }
        });
        Subscription::new(handle)
    }
}

/// The snapshot replaces `current`; list entries for the same code pick up
/// its status and driver position.
fn apply_snapshot(store: &mut BookingsStore, snapshot: TrackingSnapshot) {
    let mut booking = snapshot.booking;
    if snapshot.driver_location.is_some() {
        booking.driver_location = snapshot.driver_location;
    }
    let patch = BookingPatch {
        status: Some(booking.status.clone()),
        payment_status: Some(booking.payment_status.clone()),
        driver_location: booking.driver_location.clone(),
    };
    store.apply(&booking.public_code, &patch);
    store.set_current(Some(booking));
    store.set_error(None);
}
