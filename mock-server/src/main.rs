use std::env;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use mock_server::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let _ = dotenvy::dotenv();

    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with_target(false)
        .compact()
        .init();

    let port: u16 = match env::var("PORT") {
        Ok(raw) => raw
            .parse()
            .map_err(|err| AppError::Internal(format!("invalid PORT: {err}")))?,
        Err(_) => 3000,
    };
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {addr}: {err}")))?;
    tracing::info!(%addr, "mock transfer API listening");
    mock_server::run(listener)
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))
}
