use serde::Serialize;

use super::with_query;
use crate::client::{ApiCall, TransferClient};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{
    Ack, Booking, BookingPage, Dashboard, EarningsPeriod, PartnerAuth, PartnerDriver, PartnerEarnings,
    PartnerKind, PartnerUser, PartnerVehicle, PayoutReceipt,
};

const BASE: &str = "/api/mobile/partner";

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "type")]
    kind: PartnerKind,
}

#[derive(Serialize)]
struct StatusChange<'a> {
    status: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DriverAssignment {
    driver_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Active {
    is_active: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Available {
    is_available: bool,
}

#[derive(Serialize)]
struct Payout {
    amount: f64,
}

/// Booking list filter for partners. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Endpoints used by the partner app (affiliates and suppliers).
#[derive(Debug, Clone, Copy)]
pub struct PartnerApi<'a> {
    client: &'a TransferClient,
}

impl<'a> PartnerApi<'a> {
    pub(crate) fn new(client: &'a TransferClient) -> Self {
        Self { client }
    }

    pub fn login(
        &self,
        email: &str,
        password: &str,
        kind: PartnerKind,
    ) -> Result<ApiCall<PartnerAuth>, ApiError> {
        self.client.json_call(
            HttpMethod::Post,
            &format!("{BASE}/login"),
            &Credentials {
                email,
                password,
                kind,
            },
        )
    }

    pub fn get_profile(&self) -> ApiCall<PartnerUser> {
        self.client.call(HttpMethod::Get, &format!("{BASE}/profile"))
    }

    pub fn get_dashboard(&self) -> ApiCall<Dashboard> {
        self.client.call(HttpMethod::Get, &format!("{BASE}/dashboard"))
    }

    pub fn get_bookings(&self, query: &BookingQuery) -> ApiCall<BookingPage> {
        let path = with_query(
            &format!("{BASE}/bookings"),
            &[
                ("status", query.status.clone().filter(|s| !s.is_empty())),
                ("page", query.page.filter(|p| *p > 0).map(|p| p.to_string())),
                ("limit", query.limit.filter(|l| *l > 0).map(|l| l.to_string())),
            ],
        );
        self.client.call(HttpMethod::Get, &path)
    }

    pub fn get_booking_details(&self, id: i64) -> ApiCall<Booking> {
        self.client.call(HttpMethod::Get, &format!("{BASE}/bookings/{id}"))
    }

    pub fn update_booking_status(&self, id: i64, status: &str) -> Result<ApiCall<Ack>, ApiError> {
        self.client.json_call(
            HttpMethod::Patch,
            &format!("{BASE}/bookings/{id}"),
            &StatusChange { status },
        )
    }

    pub fn assign_driver(&self, booking_id: i64, driver_id: i64) -> Result<ApiCall<Ack>, ApiError> {
        self.client.json_call(
            HttpMethod::Patch,
            &format!("{BASE}/bookings/{booking_id}"),
            &DriverAssignment { driver_id },
        )
    }

    pub fn get_earnings(&self, period: Option<EarningsPeriod>) -> ApiCall<PartnerEarnings> {
        let path = with_query(
            &format!("{BASE}/earnings"),
            &[("period", period.map(|p| p.as_str().to_string()))],
        );
        self.client.call(HttpMethod::Get, &path)
    }

    pub fn request_payout(&self, amount: f64) -> Result<ApiCall<PayoutReceipt>, ApiError> {
        self.client
            .json_call(HttpMethod::Post, &format!("{BASE}/payouts"), &Payout { amount })
    }

    pub fn get_drivers(&self) -> ApiCall<Vec<PartnerDriver>> {
        self.client.call(HttpMethod::Get, &format!("{BASE}/drivers"))
    }

    pub fn get_driver(&self, id: i64) -> ApiCall<PartnerDriver> {
        self.client.call(HttpMethod::Get, &format!("{BASE}/drivers/{id}"))
    }

    pub fn update_driver_status(&self, id: i64, is_active: bool) -> Result<ApiCall<Ack>, ApiError> {
        self.client.json_call(
            HttpMethod::Patch,
            &format!("{BASE}/drivers/{id}"),
            &Active { is_active },
        )
    }

    pub fn update_driver_availability(
        &self,
        id: i64,
        is_available: bool,
    ) -> Result<ApiCall<Ack>, ApiError> {
        self.client.json_call(
            HttpMethod::Patch,
            &format!("{BASE}/drivers/{id}"),
            &Available { is_available },
        )
    }

    pub fn get_vehicles(&self) -> ApiCall<Vec<PartnerVehicle>> {
        self.client.call(HttpMethod::Get, &format!("{BASE}/vehicles"))
    }

    pub fn get_vehicle(&self, id: i64) -> ApiCall<PartnerVehicle> {
        self.client.call(HttpMethod::Get, &format!("{BASE}/vehicles/{id}"))
    }

    pub fn update_vehicle_status(&self, id: i64, is_active: bool) -> Result<ApiCall<Ack>, ApiError> {
        self.client.json_call(
            HttpMethod::Patch,
            &format!("{BASE}/vehicles/{id}"),
            &Active { is_active },
        )
    }
}
