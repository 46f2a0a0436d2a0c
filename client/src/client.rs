//! Async executor for the core's request builders.
//!
//! # Design
//! `MobileClient` owns a `reqwest::Client` and the core `TransferClient`
//! holding the session token. `call` hands the builder closure the current
//! `TransferClient`, executes the built request, and parses the answer into
//! the envelope. Transport errors are folded into the envelope as well, so
//! callers only ever inspect `success`.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{HeaderValue, USER_AGENT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use transfer_core::{ApiCall, ApiError, ApiResponse, HttpMethod, HttpRequest, HttpResponse, TransferClient};

use crate::config::ClientConfig;
use crate::error::ClientResult;

const CLIENT_USER_AGENT: &str = concat!("transfer-client/", env!("CARGO_PKG_VERSION"));

/// Anything a builder closure may return: a plain call, or the `Result` of a
/// builder that serializes a JSON body.
pub trait IntoCall<T> {
    fn into_call(self) -> Result<ApiCall<T>, ApiError>;
}

impl<T> IntoCall<T> for ApiCall<T> {
    fn into_call(self) -> Result<ApiCall<T>, ApiError> {
        Ok(self)
    }
}

impl<T> IntoCall<T> for Result<ApiCall<T>, ApiError> {
    fn into_call(self) -> Result<ApiCall<T>, ApiError> {
        self
    }
}

/// Cheap to clone; clones share the HTTP pool and the session token.
#[derive(Clone)]
pub struct MobileClient {
    http: reqwest::Client,
    api: Arc<RwLock<TransferClient>>,
    config: Arc<ClientConfig>,
}

impl std::fmt::Debug for MobileClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MobileClient")
            .field("base_url", &self.config.base_url)
            .field("authenticated", &self.auth_token().is_some())
            .finish()
    }
}

impl MobileClient {
    /// Create a client configured from the environment
    pub fn from_env() -> ClientResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn with_config(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api: Arc::new(RwLock::new(TransferClient::new(&config.base_url))),
            config: Arc::new(config),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replace the bearer token used by every subsequent call, on this
    /// client and all of its clones.
    pub fn set_auth_token(&self, token: Option<String>) {
        self.api
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_auth_token(token);
    }

    pub fn auth_token(&self) -> Option<String> {
        self.api
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .auth_token()
            .map(str::to_string)
    }

    /// Build a request with the current token, execute it and parse the
    /// envelope.
    ///
    /// ```ignore
    /// let rides = client.call(|api| api.driver().get_rides(Some(RideFilter::Today))).await;
    /// ```
    pub async fn call<T, C, F>(&self, build: F) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        C: IntoCall<T>,
        F: FnOnce(&TransferClient) -> C,
    {
        let built = {
            let api = self.api.read().unwrap_or_else(PoisonError::into_inner);
            build(&api).into_call()
        };
        let call = match built {
            Ok(call) => call,
            Err(e) => {
                warn!(error = %e, "request could not be built");
                return ApiResponse::err(e.to_string());
            }
        };

        let method = call.request.method;
        let url = call.request.path.clone();
        let response = match self.execute(call.request.clone()).await {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::transport(e.to_string());
                warn!(method = method.as_str(), %url, error = %err, "transport failure");
                return ApiResponse::err(err.to_string());
            }
        };

        let status = response.status;
        let envelope = call.parse(response);
        match envelope.error_message() {
            None => debug!(method = method.as_str(), %url, status, "request succeeded"),
            Some(error) => warn!(method = method.as_str(), %url, status, error, "request failed"),
        }
        envelope
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = self.http.request(method, &request.path);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse::new(status, body))
    }
}
