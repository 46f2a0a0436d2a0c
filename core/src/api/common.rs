use serde::Serialize;

use super::with_query;
use crate::client::{ApiCall, TransferClient};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{Ack, Airport, Platform};

#[derive(Serialize)]
struct PushRegistration<'a> {
    token: &'a str,
    platform: Platform,
}

#[derive(Serialize)]
struct PushToken<'a> {
    token: &'a str,
}

/// Endpoints shared by all three apps.
#[derive(Debug, Clone, Copy)]
pub struct CommonApi<'a> {
    client: &'a TransferClient,
}

impl<'a> CommonApi<'a> {
    pub(crate) fn new(client: &'a TransferClient) -> Self {
        Self { client }
    }

    pub fn get_airports(&self, search: Option<&str>) -> ApiCall<Vec<Airport>> {
        let path = with_query(
            "/api/mobile/airports",
            &[("search", search.filter(|s| !s.is_empty()).map(str::to_string))],
        );
        self.client.call(HttpMethod::Get, &path)
    }

    pub fn register_push_token(&self, token: &str, platform: Platform) -> Result<ApiCall<Ack>, ApiError> {
        self.client.json_call(
            HttpMethod::Post,
            "/api/mobile/notifications/register",
            &PushRegistration { token, platform },
        )
    }

    pub fn unregister_push_token(&self, token: &str) -> Result<ApiCall<Ack>, ApiError> {
        self.client.json_call(
            HttpMethod::Delete,
            "/api/mobile/notifications/unregister",
            &PushToken { token },
        )
    }
}
