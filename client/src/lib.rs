//! Async runtime for the airport-transfer mobile API.
//!
//! `transfer-core` builds requests and parses responses without doing any
//! I/O. This crate executes them over `reqwest`, keeps the signed-in session
//! in durable storage, and drives the screen state containers: bookings,
//! rides, earnings, live tracking and driver location reporting.
//!
//! ```rust,no_run
//! use transfer_client::{MobileClient, RidesController};
//! use transfer_core::types::RideFilter;
//!
//! # async fn demo() -> Result<(), transfer_client::ClientError> {
//! let client = MobileClient::from_env()?;
//! client.set_auth_token(Some("abc".to_string()));
//!
//! let rides = RidesController::new(client);
//! if !rides.refresh(Some(RideFilter::Today)).await {
//!     eprintln!("{:?}", rides.snapshot().await.error);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::RwLock;

pub mod bookings;
pub mod client;
pub mod config;
pub mod earnings;
pub mod error;
pub mod location;
pub mod rides;
pub mod session;
pub mod storage;
pub mod subscription;
pub mod tracking;

pub use bookings::BookingsController;
pub use client::{IntoCall, MobileClient};
pub use config::ClientConfig;
pub use earnings::EarningsController;
pub use error::{ClientError, ClientResult};
pub use location::LocationReporter;
pub use rides::RidesController;
pub use session::Session;
pub use storage::FileCredentialStore;
pub use subscription::Subscription;
pub use tracking::TrackingPoller;

/// A state container shared between a controller and background tasks.
pub type Shared<T> = Arc<RwLock<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}
