#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use mock_server::{Backend, Db};
use tokio::sync::RwLock;
use transfer_client::{ClientConfig, MobileClient};

/// Serve freshly seeded data on a random port. The returned `Db` is the
/// server's live state.
pub async fn start_server() -> (String, Db) {
    let db: Db = Arc::new(RwLock::new(Backend::seeded()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run_with_state(listener, db.clone()));
    (format!("http://{addr}"), db)
}

pub fn client(base_url: &str) -> MobileClient {
    let config = ClientConfig::default()
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5));
    MobileClient::with_config(config).unwrap()
}

/// Log in as the seeded driver and return a client carrying the token.
pub async fn driver_client(base_url: &str) -> MobileClient {
    let client = client(base_url);
    let auth = client
        .call(|api| api.driver().login("rui@atlantic.pt", "password123"))
        .await
        .into_result()
        .unwrap();
    client.set_auth_token(Some(auth.token));
    client
}

pub async fn customer_client(base_url: &str) -> MobileClient {
    let client = client(base_url);
    let auth = client
        .call(|api| api.customer().login("ana@example.pt", "password123"))
        .await
        .into_result()
        .unwrap();
    client.set_auth_token(Some(auth.token));
    client
}

/// Re-check `shared` every 20 ms until `check` holds or two seconds pass.
pub async fn wait_for<T>(shared: &Arc<RwLock<T>>, check: impl Fn(&T) -> bool) -> bool {
    for _ in 0..100 {
        if check(&*shared.read().await) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
