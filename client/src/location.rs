//! Driver position reporting while a ride is in progress.
//!
//! # Design
//! The device position watch is modelled as an `mpsc` channel of
//! `PositionFix` values. Every fix updates the shared `LocationState`; only
//! fixes that pass the [`Throttle`] are sent to the server. A failed send is
//! logged and dropped, and the throttle keeps measuring from the last fix
//! the server accepted. `tracking` is cleared however the task ends.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use transfer_core::geo::{haversine_m, Coordinates};
use transfer_core::store::LocationState;
use transfer_core::types::{BookingStatus, DriverRide, PositionFix};

use crate::client::MobileClient;
use crate::subscription::Subscription;
use crate::Shared;

pub const MIN_SEND_INTERVAL: Duration = Duration::from_secs(10);
pub const MIN_SEND_DISTANCE_M: f64 = 50.0;

/// Decides whether a fix is worth sending: enough time has passed, or the
/// driver moved far enough, since the last sent fix. The first fix always
/// passes.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    distance_m: f64,
    last: Option<(Coordinates, Instant)>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(MIN_SEND_INTERVAL, MIN_SEND_DISTANCE_M)
    }
}

impl Throttle {
    pub fn new(interval: Duration, distance_m: f64) -> Self {
        Self {
            interval,
            distance_m,
            last: None,
        }
    }

    pub fn should_send(&self, at: Coordinates, now: Instant) -> bool {
        match self.last {
            None => true,
            Some((prev, sent_at)) => {
                now.saturating_duration_since(sent_at) >= self.interval || haversine_m(prev, at) >= self.distance_m
            }
        }
    }

    pub fn record(&mut self, at: Coordinates, now: Instant) {
        self.last = Some((at, now));
    }
}

#[derive(Debug, Clone)]
pub struct LocationReporter {
    client: MobileClient,
    state: Shared<LocationState>,
    throttle: Throttle,
}

impl LocationReporter {
    pub fn new(client: MobileClient, state: Shared<LocationState>) -> Self {
        Self {
            client,
            state,
            throttle: Throttle::default(),
        }
    }

    #[must_use]
    pub fn with_thresholds(mut self, interval: Duration, distance_m: f64) -> Self {
        self.throttle = Throttle::new(interval, distance_m);
        self
    }

    /// Start reporting fixes from `fixes` for `ride`. Returns `None` unless
    /// the ride is in progress. Reporting ends when the subscription goes
    /// away or the feed closes.
    pub fn start(self, ride: &DriverRide, mut fixes: mpsc::Receiver<PositionFix>) -> Option<Subscription> {
        if ride.status != BookingStatus::InProgress {
            debug!(ride_id = ride.id, status = ride.status.as_str(), "ride not in progress, location not reported");
            return None;
        }
        let ride_id = ride.id;
        let Self {
            client,
            state,
            mut throttle,
        } = self;

        let handle = tokio::spawn(async move {
            let _tracking = TrackingGuard { state: state.clone() };
            info!(ride_id, "location reporting started");
            state.write().await.tracking = true;

            while let Some(fix) = fixes.recv().await {
                let at = Coordinates::new(fix.latitude, fix.longitude);
                {
                    let mut state = state.write().await;
                    state.current = Some(at);
                    if fix.heading.is_some() {
                        state.heading = fix.heading;
                    }
                }

                let now = Instant::now();
                if !throttle.should_send(at, now) {
                    continue;
                }
                let env = client.call(|api| api.driver().update_location(&fix)).await;
                match env.error_message() {
                    None => throttle.record(at, now),
                    Some(error) => warn!(ride_id, error, "location report dropped"),
                }
            }

            info!(ride_id, "location feed closed");
        });
        Some(Subscription::new(handle))
    }
}

/// Clears `tracking` when the reporting task ends, whether the feed closed
/// or the subscription aborted it.
struct TrackingGuard {
    state: Shared<LocationState>,
}

impl Drop for TrackingGuard {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_write() {
            state.tracking = false;
            return;
        }
        if let Ok(runtime) = Handle::try_current() {
            let state = self.state.clone();
            runtime.spawn(async move {
                state.write().await.tracking = false;
            });
        }
    }
}
