//! In-memory backend for the mobile transfer API, used by the client tests
//! and for local development of the apps.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

pub mod error;
pub mod model;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::{Backend, Db, Principal};

/// Router over freshly seeded demo data.
pub fn app() -> Router {
    app_with_state(Arc::new(RwLock::new(Backend::seeded())))
}

/// Router over `db`, so tests can inspect what the handlers recorded.
pub fn app_with_state(db: Db) -> Router {
    let api = Router::new()
        .nest("/customer", routes::customer::router())
        .nest("/driver", routes::driver::router())
        .nest("/partner", routes::partner::router())
        .route("/tracking/{code}", get(routes::customer::track))
        .merge(routes::common::router());
    Router::new().nest("/api/mobile", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(db)).await
}
