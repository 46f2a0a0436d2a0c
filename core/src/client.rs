//! Request builder and response parser for the mobile transfer API.
//!
//! # Design
//! `TransferClient` holds the `base_url` and the bearer token of the current
//! session; there is no process-wide token. Every endpoint builds an
//! `ApiCall<T>`: the `HttpRequest` to execute plus the parser that turns the
//! host's `HttpResponse` into an `ApiResponse<T>`. The caller executes the
//! round-trip in between, keeping the core deterministic and free of I/O.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{CommonApi, CustomerApi, DriverApi, PartnerApi};
use crate::envelope::{ApiResponse, GENERIC_FAILURE};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE};

/// Synchronous client for the mobile transfer API.
#[derive(Clone)]
pub struct TransferClient {
    base_url: String,
    auth_token: Option<String>,
}

impl fmt::Debug for TransferClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.auth_token.is_some())
            .finish()
    }
}

impl TransferClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.set_auth_token(Some(token.into()));
        self
    }

    /// Replace the bearer token. `None` (or an empty string) clears it.
    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.auth_token = token.filter(|t| !t.is_empty());
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn customer(&self) -> CustomerApi<'_> {
        CustomerApi::new(self)
    }

    pub fn driver(&self) -> DriverApi<'_> {
        DriverApi::new(self)
    }

    pub fn partner(&self) -> PartnerApi<'_> {
        PartnerApi::new(self)
    }

    pub fn common(&self) -> CommonApi<'_> {
        CommonApi::new(self)
    }

    /// Build a body-less request for `path` (relative to the base URL).
    pub(crate) fn call<T>(&self, method: HttpMethod, path: &str) -> ApiCall<T> {
        ApiCall::new(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: self.headers(),
            body: None,
        })
    }

    /// Build a request carrying `body` serialized as JSON.
    pub(crate) fn json_call<T, B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<ApiCall<T>, ApiError> {
        let body = serde_json::to_string(body)?;
        let mut call = self.call(method, path);
        call.request.body = Some(body);
        Ok(call)
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
        if let Some(token) = &self.auth_token {
            headers.push((AUTHORIZATION.to_string(), format!("Bearer {token}")));
        }
        headers
    }
}

/// A built request paired with the type its response decodes into.
pub struct ApiCall<T> {
    pub request: HttpRequest,
    output: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for ApiCall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCall").field("request", &self.request).finish()
    }
}

impl<T> ApiCall<T> {
    fn new(request: HttpRequest) -> Self {
        Self {
            request,
            output: PhantomData,
        }
    }

    pub fn into_request(self) -> HttpRequest {
        self.request
    }
}

impl<T: DeserializeOwned> ApiCall<T> {
    pub fn parse(&self, response: HttpResponse) -> ApiResponse<T> {
        parse_response(response).into()
    }
}

/// Decode `response` into `T`, mapping non-2xx statuses to the server's
/// `error` field.
pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        message: server_error_message(&response.body),
    })
}

/// The `error` field of a JSON error body, or the generic failure text.
fn server_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .filter(|msg| !msg.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, RideFilter};

    fn client() -> TransferClient {
        TransferClient::new("http://localhost:3000")
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TransferClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn anonymous_requests_have_no_authorization() {
        let req = client().driver().get_rides(Some(RideFilter::Today)).into_request();
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert!(req.header("authorization").is_none());
    }

    #[test]
    fn token_adds_bearer_header() {
        let req = client()
            .with_token("abc")
            .driver()
            .get_rides(Some(RideFilter::Today))
            .into_request();
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
    }

    #[test]
    fn clearing_token_removes_header() {
        let mut client = client().with_token("abc");
        client.set_auth_token(None);
        let req = client.customer().get_profile().into_request();
        assert!(req.header("authorization").is_none());
    }

    #[test]
    fn empty_token_is_treated_as_absent() {
        let client = client().with_token("");
        assert!(client.auth_token().is_none());
    }

    #[test]
    fn debug_output_hides_token() {
        let rendered = format!("{:?}", client().with_token("secret"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn non_2xx_uses_server_error_field() {
        let env = parse_response::<Message>(HttpResponse::new(401, r#"{"error":"Unauthorized"}"#));
        let err = env.unwrap_err();
        assert_eq!(err.to_string(), "Unauthorized");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn non_2xx_without_json_uses_generic_message() {
        let err = parse_response::<Message>(HttpResponse::new(502, "<html>bad gateway</html>")).unwrap_err();
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn malformed_success_body_is_a_failure() {
        let call: ApiCall<Message> = client().call(HttpMethod::Get, "/x");
        let env = call.parse(HttpResponse::new(200, "not json"));
        assert!(!env.success);
        assert!(env.error.unwrap().starts_with("invalid response"));
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let call: ApiCall<Option<Message>> = client().call(HttpMethod::Delete, "/x");
        let env = call.parse(HttpResponse::new(204, ""));
        assert_eq!(env.into_result(), Ok(None));
    }
}
