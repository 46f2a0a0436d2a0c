use transfer_core::store::EarningsStore;
use transfer_core::types::{EarningsSummary, TransactionPage};
use transfer_core::ApiResponse;

use crate::client::MobileClient;
use crate::{shared, Shared};

/// Driver earnings summary plus the paged transaction history.
#[derive(Debug, Clone)]
pub struct EarningsController {
    client: MobileClient,
    store: Shared<EarningsStore>,
}

impl EarningsController {
    pub fn new(client: MobileClient) -> Self {
        Self::with_store(client, shared(EarningsStore::default()))
    }

    pub fn with_store(client: MobileClient, store: Shared<EarningsStore>) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> Shared<EarningsStore> {
        self.store.clone()
    }

    pub async fn snapshot(&self) -> EarningsStore {
        self.store.read().await.clone()
    }

    /// Fetch the summary and the first transaction page together.
    pub async fn refresh(&self) -> bool {
        self.store.write().await.set_loading(true);
        let (summary, page) = tokio::join!(
            self.client.call(|api| api.driver().get_earnings()),
            self.client.call(|api| api.driver().get_transactions(Some(1))),
        );

        let mut store = self.store.write().await;
        store.set_loading(false);
        let ok = apply_summary(&mut store, summary) & apply_page(&mut store, 1, page);
        if ok {
            store.set_error(None);
        }
        ok
    }

    /// Fetch the next transaction page. A no-op returning `false` once the
    /// server reported there is nothing more.
    pub async fn load_more(&self) -> bool {
        let next = {
            let mut store = self.store.write().await;
            if store.loading {
                return false;
            }
            let Some(next) = store.next_page() else {
                return false;
            };
            store.set_loading(true);
            next
        };
        let page = self.client.call(|api| api.driver().get_transactions(Some(next))).await;

        let mut store = self.store.write().await;
        store.set_loading(false);
        apply_page(&mut store, next, page)
    }
}

fn apply_summary(store: &mut EarningsStore, env: ApiResponse<EarningsSummary>) -> bool {
    match env.into_result() {
        Ok(summary) => {
            store.set_summary(summary);
            true
        }
        Err(message) => {
            store.set_error(Some(message));
            false
        }
    }
}

fn apply_page(store: &mut EarningsStore, page: u32, env: ApiResponse<TransactionPage>) -> bool {
    match env.into_result() {
        Ok(result) => {
            store.append_transactions(page, result.transactions, result.has_more);
            true
        }
        Err(message) => {
            store.set_error(Some(message));
            false
        }
    }
}
