use tracing::{debug, info};
use transfer_core::store::{RidePatch, RidesStore};
use transfer_core::types::{AvailabilityAck, RideAction, RideFilter, RideStatusAck};
use transfer_core::ApiResponse;

use crate::client::MobileClient;
use crate::{shared, Shared};

/// Driver ride list, the active ride and the online switch.
#[derive(Debug, Clone)]
pub struct RidesController {
    client: MobileClient,
    store: Shared<RidesStore>,
}

impl RidesController {
    pub fn new(client: MobileClient) -> Self {
        Self::with_store(client, shared(RidesStore::default()))
    }

    pub fn with_store(client: MobileClient, store: Shared<RidesStore>) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> Shared<RidesStore> {
        self.store.clone()
    }

    pub async fn snapshot(&self) -> RidesStore {
        self.store.read().await.clone()
    }

    /// Reload the ride list and re-derive the active ride from it.
    pub async fn refresh(&self, filter: Option<RideFilter>) -> bool {
        self.store.write().await.set_loading(true);
        let env = self.client.call(|api| api.driver().get_rides(filter)).await;

        let mut store = self.store.write().await;
        store.set_loading(false);
        match env.into_result() {
            Ok(list) => {
                debug!(count = list.rides.len(), "rides refreshed");
                store.set_rides(list.rides);
                let active = store.active_from_rides();
                store.set_active_ride(active);
                true
            }
            Err(message) => {
                store.set_error(Some(message));
                false
            }
        }
    }

    /// Request `action` on ride `id`. On success the ride takes the status
    /// the server reports, which may differ from what the action implies.
    pub async fn advance(&self, id: i64, action: RideAction) -> ApiResponse<RideStatusAck> {
        let env = self
            .client
            .call(|api| api.driver().update_ride_status(id, action))
            .await;

        let mut store = self.store.write().await;
        match (&env.data, env.error_message()) {
            (Some(ack), None) => {
                info!(ride_id = id, action = action.as_str(), status = ack.status.as_str(), "ride advanced");
                store.update_ride(
                    id,
                    &RidePatch {
                        status: Some(ack.status.clone()),
                        notes: None,
                    },
                );
                store.set_error(None);
            }
            (_, message) => store.set_error(message.map(str::to_string)),
        }
        env
    }

    pub async fn set_availability(&self, available: bool) -> ApiResponse<AvailabilityAck> {
        let env = self.client.call(|api| api.driver().set_availability(available)).await;

        let mut store = self.store.write().await;
        match (&env.data, env.error_message()) {
            (Some(ack), None) => {
                store.set_online(ack.is_available);
                store.set_error(None);
            }
            (_, message) => store.set_error(message.map(str::to_string)),
        }
        env
    }

    /// Sync the online switch with the server after a restart.
    pub async fn load_status(&self) -> bool {
        let env = self.client.call(|api| api.driver().get_status()).await;
        let mut store = self.store.write().await;
        match env.into_result() {
            Ok(status) => {
                store.set_online(status.is_available);
                true
            }
            Err(message) => {
                store.set_error(Some(message));
                false
            }
        }
    }
}
