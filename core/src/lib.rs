//! Synchronous API client core for the airport-transfer mobile apps.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//! The customer, driver and partner apps share this crate; each reaches its
//! endpoints through [`TransferClient::customer`], [`TransferClient::driver`]
//! or [`TransferClient::partner`].
//!
//! # Design
//! - `TransferClient` holds `base_url` and the current bearer token.
//! - Every endpoint returns an [`ApiCall<T>`]: the request to execute and
//!   the parser for its response. Screens see an [`ApiResponse<T>`]
//!   envelope and never a raw error.
//! - Session, screen state, the booking flow and display helpers live here
//!   too, so every host shares one rendition of them.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod booking;
pub mod client;
pub mod envelope;
pub mod error;
pub mod format;
pub mod geo;
pub mod http;
pub mod links;
pub mod session;
pub mod status;
pub mod store;
pub mod types;
pub mod validate;

pub use booking::{CreateBookingRequest, PassengerForm, SearchForm};
pub use client::{parse_response, ApiCall, TransferClient};
pub use envelope::ApiResponse;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{CredentialStore, Identity, MemoryCredentialStore, SessionStore, StorageError, UserType};
pub use types::{BookingStatus, PaymentStatus, RideAction};
