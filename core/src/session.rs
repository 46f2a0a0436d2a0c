//! Who is signed in, and the durable copy of that across restarts.
//!
//! Exactly one identity at a time: customer, driver or partner. The token is
//! kept next to the identity so callers can hand it to
//! [`TransferClient::set_auth_token`](crate::TransferClient::set_auth_token).

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CustomerUser, DriverUser, PartnerUser};

pub const TOKEN_KEY: &str = "authToken";
pub const USER_TYPE_KEY: &str = "userType";
pub const USER_DATA_KEY: &str = "userData";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Io(String),
    #[error("corrupt stored session: {0}")]
    Corrupt(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Corrupt(e.to_string())
    }
}

/// Key/value secure storage provided by the host platform.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Io("credential map poisoned".to_string()))
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Customer,
    Driver,
    Partner,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Customer => "customer",
            UserType::Driver => "driver",
            UserType::Partner => "partner",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "customer" => Some(UserType::Customer),
            "driver" => Some(UserType::Driver),
            "partner" => Some(UserType::Partner),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Customer(CustomerUser),
    Driver(DriverUser),
    Partner(PartnerUser),
}

impl Identity {
    pub fn user_type(&self) -> UserType {
        match self {
            Identity::Customer(_) => UserType::Customer,
            Identity::Driver(_) => UserType::Driver,
            Identity::Partner(_) => UserType::Partner,
        }
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Identity::Customer(u) => serde_json::to_string(u),
            Identity::Driver(u) => serde_json::to_string(u),
            Identity::Partner(u) => serde_json::to_string(u),
        }
    }

    fn from_json(user_type: UserType, raw: &str) -> Result<Self, serde_json::Error> {
        Ok(match user_type {
            UserType::Customer => Identity::Customer(serde_json::from_str(raw)?),
            UserType::Driver => Identity::Driver(serde_json::from_str(raw)?),
            UserType::Partner => Identity::Partner(serde_json::from_str(raw)?),
        })
    }
}

#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    token: Option<String>,
    identity: Option<Identity>,
}

impl<S: CredentialStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            token: None,
            identity: None,
        }
    }

    /// Load a previously saved session. Missing or undecodable entries leave
    /// the session signed out; only storage failures are reported.
    pub fn restore(&mut self) -> Result<bool, StorageError> {
        let token = self.storage.get(TOKEN_KEY)?;
        let user_type = self.storage.get(USER_TYPE_KEY)?;
        let user_data = self.storage.get(USER_DATA_KEY)?;

        let (Some(token), Some(user_type), Some(user_data)) = (token, user_type, user_data) else {
            return Ok(false);
        };
        let Some(user_type) = UserType::parse(&user_type) else {
            return Ok(false);
        };
        match Identity::from_json(user_type, &user_data) {
            Ok(identity) if !token.is_empty() => {
                self.token = Some(token);
                self.identity = Some(identity);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Persist first; memory only changes once storage accepted the write.
    ///
    /// The token is dropped before the user is rewritten and stored last, so
    /// a failed write never leaves a token paired with another account.
    pub fn save_auth(&mut self, identity: Identity, token: &str) -> Result<(), StorageError> {
        let user_data = identity.to_json()?;
        self.storage.delete(TOKEN_KEY)?;
        self.storage.set(USER_DATA_KEY, &user_data)?;
        self.storage.set(USER_TYPE_KEY, identity.user_type().as_str())?;
        self.storage.set(TOKEN_KEY, token)?;
        self.token = Some(token.to_string());
        self.identity = Some(identity);
        Ok(())
    }

    /// Memory is cleared even when a delete fails; the first failure is
    /// returned.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.token = None;
        self.identity = None;
        let mut first_err = None;
        for key in [TOKEN_KEY, USER_TYPE_KEY, USER_DATA_KEY] {
            if let Err(e) = self.storage.delete(key) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.identity.is_some()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> DriverUser {
        DriverUser {
            id: 4,
            supplier_id: 2,
            supplier_name: "Atlantic Transfers".to_string(),
            name: "Rui Costa".to_string(),
            email: "rui@atlantic.pt".to_string(),
            phone: "+351911111111".to_string(),
            profile_image: None,
            vehicle_id: Some(9),
            is_online: false,
            rating: 4.9,
            total_rides: 310,
        }
    }

    #[test]
    fn save_then_restore_in_a_new_session() {
        let mut session = SessionStore::new(MemoryCredentialStore::new());
        session.save_auth(Identity::Driver(driver()), "abc").unwrap();
        assert!(session.is_authenticated());

        let storage = session.storage;
        assert_eq!(storage.get(USER_TYPE_KEY).unwrap().as_deref(), Some("driver"));

        let mut fresh = SessionStore::new(storage);
        assert!(fresh.restore().unwrap());
        assert_eq!(fresh.token(), Some("abc"));
        assert_eq!(fresh.identity(), Some(&Identity::Driver(driver())));
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let mut session = SessionStore::new(MemoryCredentialStore::new());
        session.save_auth(Identity::Driver(driver()), "abc").unwrap();
        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        for key in [TOKEN_KEY, USER_TYPE_KEY, USER_DATA_KEY] {
            assert!(session.storage().get(key).unwrap().is_none());
        }
    }

    /// Fails writes of `userData` once `broken` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryCredentialStore,
        broken: std::sync::atomic::AtomicBool,
    }

    impl CredentialStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == USER_DATA_KEY && self.broken.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(StorageError::Io("disk full".to_string()));
            }
            self.inner.set(key, value)
        }

        fn delete(&self, key: &str) -> Result<(), StorageError> {
            self.inner.delete(key)
        }
    }

    #[test]
    fn failed_relogin_never_pairs_new_token_with_old_user() {
        let mut session = SessionStore::new(FlakyStore::default());
        session.save_auth(Identity::Driver(driver()), "abc").unwrap();

        session.storage().broken.store(true, std::sync::atomic::Ordering::SeqCst);
        let other = DriverUser {
            id: 5,
            name: "Marta Sousa".to_string(),
            ..driver()
        };
        assert!(session.save_auth(Identity::Driver(other), "def").is_err());
        assert_eq!(session.token(), Some("abc"));

        let mut fresh = SessionStore::new(session.storage);
        assert!(!fresh.restore().unwrap());
        assert!(fresh.storage().get(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn partial_storage_restores_nothing() {
        let storage = MemoryCredentialStore::new();
        storage.set(TOKEN_KEY, "abc").unwrap();
        storage.set(USER_TYPE_KEY, "driver").unwrap();
        let mut session = SessionStore::new(storage);
        assert!(!session.restore().unwrap());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn undecodable_user_restores_nothing() {
        let storage = MemoryCredentialStore::new();
        storage.set(TOKEN_KEY, "abc").unwrap();
        storage.set(USER_TYPE_KEY, "customer").unwrap();
        storage.set(USER_DATA_KEY, "{not json").unwrap();
        let mut session = SessionStore::new(storage);
        assert!(!session.restore().unwrap());
        assert!(session.identity().is_none());
    }

    #[test]
    fn unknown_user_type_restores_nothing() {
        let storage = MemoryCredentialStore::new();
        storage.set(TOKEN_KEY, "abc").unwrap();
        storage.set(USER_TYPE_KEY, "admin").unwrap();
        storage.set(USER_DATA_KEY, "{}").unwrap();
        let mut session = SessionStore::new(storage);
        assert!(!session.restore().unwrap());
    }
}
