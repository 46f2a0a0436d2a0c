//! Sign-in state wired to the executor.
//!
//! Every change to the stored session is mirrored into the client's bearer
//! token: after a login or a restore calls carry `Authorization`, after a
//! logout they do not.

use tracing::{info, warn};
use transfer_core::types::PartnerKind;
use transfer_core::{ApiResponse, CredentialStore, Identity, SessionStore};

use crate::client::MobileClient;
use crate::error::{ClientError, ClientResult};

#[derive(Debug)]
pub struct Session<S> {
    client: MobileClient,
    store: SessionStore<S>,
}

impl<S: CredentialStore> Session<S> {
    pub fn new(client: MobileClient, storage: S) -> Self {
        Self {
            client,
            store: SessionStore::new(storage),
        }
    }

    pub fn client(&self) -> &MobileClient {
        &self.client
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.store.identity()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Pick up a session saved by an earlier run. Returns whether one was
    /// found.
    pub fn restore(&mut self) -> ClientResult<bool> {
        let restored = self.store.restore()?;
        self.client.set_auth_token(self.store.token().map(str::to_string));
        if restored {
            info!("session restored");
        }
        Ok(restored)
    }

    /// Persist `identity` and `token`, then authenticate the client.
    pub fn save_auth(&mut self, identity: Identity, token: &str) -> ClientResult<()> {
        self.store.save_auth(identity, token)?;
        self.client.set_auth_token(Some(token.to_string()));
        Ok(())
    }

    /// Forget the session. The client stops sending the token even when
    /// clearing storage fails.
    pub fn logout(&mut self) -> ClientResult<()> {
        let result = self.store.logout();
        self.client.set_auth_token(None);
        info!("signed out");
        result.map_err(ClientError::from)
    }

    pub async fn login_customer(&mut self, email: &str, password: &str) -> ApiResponse<Identity> {
        let env = self.client.call(|api| api.customer().login(email, password)).await;
        self.accept(env.map(|auth| (Identity::Customer(auth.user), auth.token)))
    }

    pub async fn verify_customer_otp(&mut self, phone: &str, code: &str) -> ApiResponse<Identity> {
        let env = self.client.call(|api| api.customer().verify_otp(phone, code)).await;
        self.accept(env.map(|auth| (Identity::Customer(auth.user), auth.token)))
    }

    pub async fn login_driver(&mut self, email: &str, password: &str) -> ApiResponse<Identity> {
        let env = self.client.call(|api| api.driver().login(email, password)).await;
        self.accept(env.map(|auth| (Identity::Driver(auth.driver), auth.token)))
    }

    pub async fn login_partner(&mut self, email: &str, password: &str, kind: PartnerKind) -> ApiResponse<Identity> {
        let env = self.client.call(|api| api.partner().login(email, password, kind)).await;
        self.accept(env.map(|auth| (Identity::Partner(auth.user), auth.token)))
    }

    fn accept(&mut self, env: ApiResponse<(Identity, String)>) -> ApiResponse<Identity> {
        let (identity, token) = match env.into_result() {
            Ok(pair) => pair,
            Err(message) => return ApiResponse::err(message),
        };
        match self.save_auth(identity.clone(), &token) {
            Ok(()) => {
                info!(user_type = identity.user_type().as_str(), "signed in");
                ApiResponse::ok(identity)
            }
            Err(e) => {
                warn!(error = %e, "sign-in could not be persisted");
                ApiResponse::err(e.to_string())
            }
        }
    }
}
