use serde::Serialize;

use super::with_query;
use crate::client::{ApiCall, TransferClient};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{
    Ack, AvailabilityAck, DriverAuth, DriverPosition, DriverProfileUpdate, DriverRide, DriverStatus,
    DriverUser, EarningsSummary, PositionFix, RideAction, RideFilter, RideList, RideStatusAck,
    TransactionPage,
};

const BASE: &str = "/api/mobile/driver";

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Availability {
    is_available: bool,
}

#[derive(Serialize)]
struct StatusChange {
    status: RideAction,
}

/// Endpoints used by the driver app.
#[derive(Debug, Clone, Copy)]
pub struct DriverApi<'a> {
    client: &'a TransferClient,
}

impl<'a> DriverApi<'a> {
    pub(crate) fn new(client: &'a TransferClient) -> Self {
        Self { client }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<ApiCall<DriverAuth>, ApiError> {
        self.client.json_call(
            HttpMethod::Post,
            &format!("{BASE}/login"),
            &Credentials { email, password },
        )
    }

    pub fn get_profile(&self) -> ApiCall<DriverUser> {
        self.client.call(HttpMethod::Get, &format!("{BASE}/profile"))
    }

    pub fn update_profile(&self, update: &DriverProfileUpdate) -> Result<ApiCall<DriverUser>, ApiError> {
        self.client
            .json_call(HttpMethod::Patch, &format!("{BASE}/profile"), update)
    }

    pub fn get_status(&self) -> ApiCall<DriverStatus> {
        self.client.call(HttpMethod::Get, &format!("{BASE}/status"))
    }

    pub fn set_availability(&self, is_available: bool) -> Result<ApiCall<AvailabilityAck>, ApiError> {
        self.client.json_call(
            HttpMethod::Patch,
            &format!("{BASE}/status"),
            &Availability { is_available },
        )
    }

    pub fn get_rides(&self, filter: Option<RideFilter>) -> ApiCall<RideList> {
        let path = with_query(
            &format!("{BASE}/rides"),
            &[("filter", filter.map(|f| f.as_str().to_string()))],
        );
        self.client.call(HttpMethod::Get, &path)
    }

    pub fn get_ride(&self, ride_id: i64) -> ApiCall<DriverRide> {
        self.client
            .call(HttpMethod::Get, &format!("{BASE}/rides/{ride_id}"))
    }

    /// Request the next lifecycle transition. The server answers with the
    /// status it actually applied.
    pub fn update_ride_status(
        &self,
        ride_id: i64,
        action: RideAction,
    ) -> Result<ApiCall<RideStatusAck>, ApiError> {
        self.client.json_call(
            HttpMethod::Patch,
            &format!("{BASE}/rides/{ride_id}"),
            &StatusChange { status: action },
        )
    }

    /// One-way position report; readings the device did not supply are
    /// omitted from the body.
    pub fn update_location(&self, fix: &PositionFix) -> Result<ApiCall<Ack>, ApiError> {
        self.client
            .json_call(HttpMethod::Post, &format!("{BASE}/location"), fix)
    }

    pub fn get_location(&self) -> ApiCall<DriverPosition> {
        self.client.call(HttpMethod::Get, &format!("{BASE}/location"))
    }

    pub fn get_earnings(&self) -> ApiCall<EarningsSummary> {
        self.client.call(HttpMethod::Get, &format!("{BASE}/earnings"))
    }

    pub fn get_transactions(&self, page: Option<u32>) -> ApiCall<TransactionPage> {
        let path = with_query(
            &format!("{BASE}/earnings/transactions"),
            &[("page", page.map(|p| p.to_string()))],
        );
        self.client.call(HttpMethod::Get, &path)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::TransferClient;
    use crate::http::HttpMethod;
    use crate::types::{PositionFix, RideAction, RideFilter};

    fn client() -> TransferClient {
        TransferClient::new("https://api.test")
    }

    #[test]
    fn rides_filter_is_optional() {
        let all = client().driver().get_rides(None).into_request();
        assert_eq!(all.path, "https://api.test/api/mobile/driver/rides");
        let today = client().driver().get_rides(Some(RideFilter::Today)).into_request();
        assert_eq!(today.path, "https://api.test/api/mobile/driver/rides?filter=today");
    }

    #[test]
    fn update_ride_status_patches_action() {
        let req = client()
            .driver()
            .update_ride_status(42, RideAction::StartRide)
            .unwrap()
            .into_request();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "https://api.test/api/mobile/driver/rides/42");
        assert_eq!(req.body.as_deref(), Some(r#"{"status":"START_RIDE"}"#));
    }

    #[test]
    fn availability_uses_camel_case() {
        let req = client().driver().set_availability(true).unwrap().into_request();
        assert_eq!(req.body.as_deref(), Some(r#"{"isAvailable":true}"#));
    }

    #[test]
    fn location_report_includes_supplied_readings() {
        let fix = PositionFix {
            heading: Some(90.0),
            ..PositionFix::new(38.7, -9.1)
        };
        let req = client().driver().update_location(&fix).unwrap().into_request();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["heading"], 90.0);
        assert!(body.get("speed").is_none());
    }

    #[test]
    fn transactions_page_query() {
        let req = client().driver().get_transactions(Some(3)).into_request();
        assert_eq!(
            req.path,
            "https://api.test/api/mobile/driver/earnings/transactions?page=3"
        );
    }
}
