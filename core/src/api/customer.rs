use serde::Serialize;

use super::{segment, with_query};
use crate::booking::CreateBookingRequest;
use crate::client::{ApiCall, TransferClient};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{
    Booking, BookingPage, BookingType, CustomerAuth, CustomerProfileUpdate, CustomerUser, Message,
    PaymentIntent, SearchRequest, SearchResult, TrackingSnapshot,
};

const BASE: &str = "/api/mobile/customer";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Register<'a> {
    email: &'a str,
    password: &'a str,
    full_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct OtpSend<'a> {
    phone: &'a str,
}

#[derive(Serialize)]
struct OtpVerify<'a> {
    phone: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct Cancel<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// Endpoints used by the customer app.
#[derive(Debug, Clone, Copy)]
pub struct CustomerApi<'a> {
    client: &'a TransferClient,
}

impl<'a> CustomerApi<'a> {
    pub(crate) fn new(client: &'a TransferClient) -> Self {
        Self { client }
    }

    pub fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        phone: Option<&str>,
    ) -> Result<ApiCall<CustomerAuth>, ApiError> {
        let body = Register {
            email,
            password,
            full_name,
            phone,
        };
        self.client
            .json_call(HttpMethod::Post, &format!("{BASE}/register"), &body)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<ApiCall<CustomerAuth>, ApiError> {
        self.client.json_call(
            HttpMethod::Post,
            &format!("{BASE}/login"),
            &Credentials { email, password },
        )
    }

    /// Ask the server to text a one-time code to `phone`.
    pub fn send_otp(&self, phone: &str) -> Result<ApiCall<Message>, ApiError> {
        self.client
            .json_call(HttpMethod::Post, &format!("{BASE}/otp/send"), &OtpSend { phone })
    }

    pub fn verify_otp(&self, phone: &str, code: &str) -> Result<ApiCall<CustomerAuth>, ApiError> {
        self.client.json_call(
            HttpMethod::Post,
            &format!("{BASE}/otp/verify"),
            &OtpVerify { phone, code },
        )
    }

    pub fn get_profile(&self) -> ApiCall<CustomerUser> {
        self.client.call(HttpMethod::Get, &format!("{BASE}/profile"))
    }

    pub fn update_profile(
        &self,
        update: &CustomerProfileUpdate,
    ) -> Result<ApiCall<CustomerUser>, ApiError> {
        self.client
            .json_call(HttpMethod::Patch, &format!("{BASE}/profile"), update)
    }

    pub fn search_transfers(
        &self,
        request: &SearchRequest,
    ) -> Result<ApiCall<Vec<SearchResult>>, ApiError> {
        self.client
            .json_call(HttpMethod::Post, &format!("{BASE}/search"), request)
    }

    pub fn create_booking(&self, request: &CreateBookingRequest) -> Result<ApiCall<Booking>, ApiError> {
        self.client
            .json_call(HttpMethod::Post, &format!("{BASE}/bookings"), request)
    }

    /// List bookings. `kind` defaults to upcoming; page and limit are only
    /// sent when given.
    pub fn get_bookings(
        &self,
        kind: Option<BookingType>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> ApiCall<BookingPage> {
        let path = with_query(
            &format!("{BASE}/bookings"),
            &[
                ("type", Some(kind.unwrap_or_default().as_str().to_string())),
                ("page", page.map(|p| p.to_string())),
                ("limit", limit.map(|l| l.to_string())),
            ],
        );
        self.client.call(HttpMethod::Get, &path)
    }

    pub fn get_booking(&self, public_code: &str) -> ApiCall<Booking> {
        self.client.call(
            HttpMethod::Get,
            &format!("{BASE}/bookings/{}", segment(public_code)),
        )
    }

    pub fn cancel_booking(
        &self,
        public_code: &str,
        reason: Option<&str>,
    ) -> Result<ApiCall<Message>, ApiError> {
        self.client.json_call(
            HttpMethod::Post,
            &format!("{BASE}/bookings/{}/cancel", segment(public_code)),
            &Cancel { reason },
        )
    }

    /// Live status and driver position for a booking. Public: the code acts
    /// as the capability.
    pub fn track_booking(&self, public_code: &str) -> ApiCall<TrackingSnapshot> {
        self.client.call(
            HttpMethod::Get,
            &format!("/api/mobile/tracking/{}", segment(public_code)),
        )
    }

    pub fn create_payment_intent(&self, public_code: &str) -> ApiCall<PaymentIntent> {
        self.client.call(
            HttpMethod::Post,
            &format!("{BASE}/bookings/{}/payment", segment(public_code)),
        )
    }
}
