//! C-ABI wrapper around `transfer-core`.
//!
//! # Overview
//! Exposes the request builders a native shell needs most (sign-in, public
//! tracking, the driver's ride list, ride transitions and position reports)
//! plus a generic envelope parser and the status display tables. Any
//! language with a C FFI can build requests and read responses without
//! linking to an async runtime or serde.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Builders return an owned `FfiHttpRequest`, or null on bad arguments.
//! - `transfer_parse_envelope` is endpoint-agnostic: the payload comes back
//!   as JSON text in `FfiEnvelope::data_json`.
//! - The C caller owns all returned pointers and must call the matching
//!   `transfer_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use transfer_core::http::HttpResponse;
use transfer_core::status::{booking_status_color, booking_status_label};
use transfer_core::types::{BookingStatus, PartnerKind, PositionFix, RideAction, RideFilter};
use transfer_core::{parse_response, ApiCall, ApiError};

use types::*;

/// `audience` values for `transfer_build_login`.
pub const TRANSFER_AUDIENCE_CUSTOMER: i32 = 0;
pub const TRANSFER_AUDIENCE_DRIVER: i32 = 1;
pub const TRANSFER_AUDIENCE_PARTNER: i32 = 2;

/// `partner_kind` values for `transfer_build_login`; ignored for other
/// audiences.
pub const TRANSFER_PARTNER_AFFILIATE: i32 = 0;
pub const TRANSFER_PARTNER_SUPPLIER: i32 = 1;

/// `filter` values for `transfer_build_get_rides`. Any other value sends no
/// filter.
pub const TRANSFER_RIDES_TODAY: i32 = 0;
pub const TRANSFER_RIDES_UPCOMING: i32 = 1;
pub const TRANSFER_RIDES_PAST: i32 = 2;

/// Borrow a C string as `&str`. Null and non-UTF-8 input yield `None`.
unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn request_of<T>(call: Result<ApiCall<T>, ApiError>) -> *mut FfiHttpRequest {
    match call {
        Ok(call) => FfiHttpRequest::from_core(call.into_request()),
        Err(_) => std::ptr::null_mut(),
    }
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `TransferClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or not UTF-8.
/// The caller must free the returned pointer with `transfer_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_client_new(base_url: *const c_char) -> *mut FfiTransferClient {
    catch_unwind(|| {
        let Some(url) = (unsafe { str_arg(base_url) }) else {
            return std::ptr::null_mut();
        };
        let client = transfer_core::TransferClient::new(url);
        Box::into_raw(Box::new(FfiTransferClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `transfer_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_client_free(client: *mut FfiTransferClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

/// Set the bearer token sent by every request built afterwards. A null or
/// empty `token` clears it.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_client_set_token(client: *mut FfiTransferClient, token: *const c_char) {
    if client.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let client = unsafe { &mut *client };
        let token = unsafe { str_arg(token) }.map(str::to_string);
        client.inner.set_auth_token(token);
    }));
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build a sign-in request for `audience` (`TRANSFER_AUDIENCE_*`).
///
/// Returns null if a pointer argument is null or `audience` is unknown.
/// The caller must free the returned pointer with `transfer_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_build_login(
    client: *const FfiTransferClient,
    audience: i32,
    email: *const c_char,
    password: *const c_char,
    partner_kind: i32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &(*client).inner };
        let (Some(email), Some(password)) = (unsafe { str_arg(email) }, unsafe { str_arg(password) }) else {
            return std::ptr::null_mut();
        };
        match audience {
            TRANSFER_AUDIENCE_CUSTOMER => request_of(client.customer().login(email, password)),
            TRANSFER_AUDIENCE_DRIVER => request_of(client.driver().login(email, password)),
            TRANSFER_AUDIENCE_PARTNER => {
                let kind = match partner_kind {
                    TRANSFER_PARTNER_SUPPLIER => PartnerKind::Supplier,
                    _ => PartnerKind::Affiliate,
                };
                request_of(client.partner().login(email, password, kind))
            }
            _ => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the public tracking request for booking `code`.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_build_track_booking(
    client: *const FfiTransferClient,
    code: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let Some(code) = (unsafe { str_arg(code) }) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &(*client).inner };
        FfiHttpRequest::from_core(client.customer().track_booking(code).into_request())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the driver ride list request. `filter` is one of
/// `TRANSFER_RIDES_*`; anything else lists every ride.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_build_get_rides(client: *const FfiTransferClient, filter: i32) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let filter = match filter {
            TRANSFER_RIDES_TODAY => Some(RideFilter::Today),
            TRANSFER_RIDES_UPCOMING => Some(RideFilter::Upcoming),
            TRANSFER_RIDES_PAST => Some(RideFilter::Past),
            _ => None,
        };
        let client = unsafe { &(*client).inner };
        FfiHttpRequest::from_core(client.driver().get_rides(filter).into_request())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a ride transition request. `action` is the wire name, for example
/// `"START_RIDE"`.
///
/// Returns null if `action` is null or not a known action.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_build_update_ride_status(
    client: *const FfiTransferClient,
    ride_id: i64,
    action: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let Some(action) = (unsafe { str_arg(action) }).and_then(RideAction::parse) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &(*client).inner };
        request_of(client.driver().update_ride_status(ride_id, action))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a driver position report. Pass NaN for any of `heading`, `speed`
/// or `accuracy` the device did not supply.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_build_update_location(
    client: *const FfiTransferClient,
    latitude: f64,
    longitude: f64,
    heading: f64,
    speed: f64,
    accuracy: f64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || !latitude.is_finite() || !longitude.is_finite() {
            return std::ptr::null_mut();
        }
        let reading = |v: f64| v.is_finite().then_some(v);
        let fix = PositionFix {
            latitude,
            longitude,
            heading: reading(heading),
            speed: reading(speed),
            accuracy: reading(accuracy),
        };
        let client = unsafe { &(*client).inner };
        request_of(client.driver().update_location(&fix))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response function
// ---------------------------------------------------------------------------

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }.to_string_lossy().into_owned()
    };
    HttpResponse::new(resp.status, body)
}

/// Parse any API response into an envelope.
///
/// Never returns null. The caller must free the result with
/// `transfer_free_envelope`.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_parse_envelope(response: *const FfiHttpResponse) -> *mut FfiEnvelope {
    catch_unwind(|| {
        if response.is_null() {
            return FfiEnvelope::null_arg("response");
        }
        let resp = ffi_response_to_core(unsafe { &*response });
        let status = resp.status;
        match parse_response::<serde_json::Value>(resp) {
            Ok(value) => FfiEnvelope::ok(value.to_string(), status),
            Err(e) => FfiEnvelope::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiEnvelope::panic("panic in transfer_parse_envelope"))
}

// ---------------------------------------------------------------------------
// Status display
// ---------------------------------------------------------------------------

/// Human label for a booking status. Unknown statuses come back verbatim.
///
/// Returns null only if `status` is null. Free with `transfer_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_status_label(status: *const c_char) -> *mut c_char {
    catch_unwind(|| match unsafe { str_arg(status) } {
        Some(raw) => c_string(booking_status_label(&BookingStatus::from(raw))),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Hex colour for a booking status, with the neutral fallback for unknown
/// statuses. Free with `transfer_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_status_color(status: *const c_char) -> *mut c_char {
    catch_unwind(|| match unsafe { str_arg(status) } {
        Some(raw) => c_string(booking_status_color(&BookingStatus::from(raw))),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `transfer_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.path.is_null() {
            drop(unsafe { CString::from_raw(req.path) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize);
            let headers = unsafe { Box::from_raw(slice) };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiEnvelope` returned by `transfer_parse_envelope`. Safe to call
/// with null.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_free_envelope(envelope: *mut FfiEnvelope) {
    if envelope.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let envelope = unsafe { Box::from_raw(envelope) };
        if !envelope.error_message.is_null() {
            drop(unsafe { CString::from_raw(envelope.error_message) });
        }
        if !envelope.data_json.is_null() {
            drop(unsafe { CString::from_raw(envelope.data_json) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn new_client() -> *mut FfiTransferClient {
        let url = CString::new("http://localhost:3000").unwrap();
        transfer_client_new(url.as_ptr())
    }

    fn c_str<'a>(ptr: *const c_char) -> &'a str {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
    }

    fn header<'a>(req: &'a FfiHttpRequest, name: &str) -> Option<&'a str> {
        if req.headers.is_null() {
            return None;
        }
        let headers = unsafe { std::slice::from_raw_parts(req.headers, req.headers_len as usize) };
        headers
            .iter()
            .find(|h| c_str(h.key).eq_ignore_ascii_case(name))
            .map(|h| c_str(h.value))
    }

    fn parse(status: u16, body: &str) -> *mut FfiEnvelope {
        let body = CString::new(body).unwrap();
        let resp = FfiHttpResponse {
            status,
            body: body.as_ptr(),
        };
        transfer_parse_envelope(&resp)
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        assert!(!client.is_null());
        transfer_client_free(client);
    }

    #[test]
    fn client_new_null_returns_null() {
        assert!(transfer_client_new(std::ptr::null()).is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        transfer_client_free(std::ptr::null_mut());
    }

    #[test]
    fn driver_login_posts_credentials() {
        let client = new_client();
        let email = CString::new("rui@atlantic.pt").unwrap();
        let password = CString::new("pw").unwrap();
        let req = transfer_build_login(client, TRANSFER_AUDIENCE_DRIVER, email.as_ptr(), password.as_ptr(), 0);
        assert!(!req.is_null());

        let r = unsafe { &*req };
        assert_eq!(r.method, FfiHttpMethod::Post);
        assert_eq!(c_str(r.path), "http://localhost:3000/api/mobile/driver/login");
        assert_eq!(header(r, "content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(c_str(r.body)).unwrap();
        assert_eq!(body, serde_json::json!({"email": "rui@atlantic.pt", "password": "pw"}));

        transfer_free_request(req);
        transfer_client_free(client);
    }

    #[test]
    fn partner_login_sends_kind() {
        let client = new_client();
        let email = CString::new("ops@atlantic.pt").unwrap();
        let password = CString::new("pw").unwrap();
        let req = transfer_build_login(
            client,
            TRANSFER_AUDIENCE_PARTNER,
            email.as_ptr(),
            password.as_ptr(),
            TRANSFER_PARTNER_SUPPLIER,
        );
        let r = unsafe { &*req };
        let body: serde_json::Value = serde_json::from_str(c_str(r.body)).unwrap();
        assert_eq!(body["type"], "supplier");

        transfer_free_request(req);
        transfer_client_free(client);
    }

    #[test]
    fn login_unknown_audience_returns_null() {
        let client = new_client();
        let email = CString::new("a@b.com").unwrap();
        let req = transfer_build_login(client, 7, email.as_ptr(), email.as_ptr(), 0);
        assert!(req.is_null());
        transfer_client_free(client);
    }

    #[test]
    fn token_controls_authorization_header() {
        let client = new_client();
        let token = CString::new("abc").unwrap();
        transfer_client_set_token(client, token.as_ptr());

        let req = transfer_build_get_rides(client, TRANSFER_RIDES_TODAY);
        let r = unsafe { &*req };
        assert_eq!(c_str(r.path), "http://localhost:3000/api/mobile/driver/rides?filter=today");
        assert_eq!(header(r, "authorization"), Some("Bearer abc"));
        transfer_free_request(req);

        transfer_client_set_token(client, std::ptr::null());
        let req = transfer_build_get_rides(client, -1);
        let r = unsafe { &*req };
        assert_eq!(c_str(r.path), "http://localhost:3000/api/mobile/driver/rides");
        assert!(header(r, "authorization").is_none());
        transfer_free_request(req);

        transfer_client_free(client);
    }

    #[test]
    fn track_booking_is_public_path() {
        let client = new_client();
        let code = CString::new("ATP-1001").unwrap();
        let req = transfer_build_track_booking(client, code.as_ptr());
        let r = unsafe { &*req };
        assert_eq!(r.method, FfiHttpMethod::Get);
        assert_eq!(c_str(r.path), "http://localhost:3000/api/mobile/tracking/ATP-1001");
        assert!(r.body.is_null());

        transfer_free_request(req);
        transfer_client_free(client);
    }

    #[test]
    fn update_ride_status_patches_action() {
        let client = new_client();
        let action = CString::new("START_RIDE").unwrap();
        let req = transfer_build_update_ride_status(client, 42, action.as_ptr());
        let r = unsafe { &*req };
        assert_eq!(r.method, FfiHttpMethod::Patch);
        assert_eq!(c_str(r.path), "http://localhost:3000/api/mobile/driver/rides/42");
        let body: serde_json::Value = serde_json::from_str(c_str(r.body)).unwrap();
        assert_eq!(body, serde_json::json!({"status": "START_RIDE"}));

        transfer_free_request(req);
        transfer_client_free(client);
    }

    #[test]
    fn update_ride_status_unknown_action_returns_null() {
        let client = new_client();
        let action = CString::new("start_ride").unwrap();
        assert!(transfer_build_update_ride_status(client, 1, action.as_ptr()).is_null());
        assert!(transfer_build_update_ride_status(client, 1, std::ptr::null()).is_null());
        transfer_client_free(client);
    }

    #[test]
    fn update_location_omits_nan_readings() {
        let client = new_client();
        let req = transfer_build_update_location(client, 38.77, -9.13, 180.0, f64::NAN, f64::NAN);
        let r = unsafe { &*req };
        assert_eq!(r.method, FfiHttpMethod::Post);
        let body: serde_json::Value = serde_json::from_str(c_str(r.body)).unwrap();
        assert_eq!(body, serde_json::json!({"latitude": 38.77, "longitude": -9.13, "heading": 180.0}));

        transfer_free_request(req);
        transfer_client_free(client);
    }

    #[test]
    fn update_location_rejects_nan_position() {
        let client = new_client();
        assert!(transfer_build_update_location(client, f64::NAN, 0.0, 0.0, 0.0, 0.0).is_null());
        transfer_client_free(client);
    }

    #[test]
    fn builders_with_null_client_return_null() {
        assert!(transfer_build_get_rides(std::ptr::null(), 0).is_null());
        assert!(transfer_build_track_booking(std::ptr::null(), std::ptr::null()).is_null());
    }

    #[test]
    fn parse_success_reencodes_payload() {
        let env = parse(200, r#"{"user":{"id":1},"token":"abc"}"#);
        let e = unsafe { &*env };
        assert!(e.success);
        assert_eq!(e.error_code, FfiErrorCode::Ok);
        assert!(e.error_message.is_null());
        let data: serde_json::Value = serde_json::from_str(c_str(e.data_json)).unwrap();
        assert_eq!(data["token"], "abc");
        transfer_free_envelope(env);
    }

    #[test]
    fn parse_http_error_uses_server_message() {
        let env = parse(401, r#"{"error":"Unauthorized"}"#);
        let e = unsafe { &*env };
        assert!(!e.success);
        assert_eq!(e.error_code, FfiErrorCode::Http);
        assert_eq!(e.http_status, 401);
        assert_eq!(c_str(e.error_message), "Unauthorized");
        assert!(e.data_json.is_null());
        transfer_free_envelope(env);
    }

    #[test]
    fn parse_error_without_message_is_generic() {
        let env = parse(500, "");
        let e = unsafe { &*env };
        assert_eq!(c_str(e.error_message), "Request failed");
        transfer_free_envelope(env);
    }

    #[test]
    fn parse_malformed_success_body_fails() {
        let env = parse(200, "<html>");
        let e = unsafe { &*env };
        assert!(!e.success);
        assert_eq!(e.error_code, FfiErrorCode::Deserialization);
        transfer_free_envelope(env);
    }

    #[test]
    fn parse_null_response_returns_null_arg() {
        let env = transfer_parse_envelope(std::ptr::null());
        let e = unsafe { &*env };
        assert_eq!(e.error_code, FfiErrorCode::NullArg);
        transfer_free_envelope(env);
    }

    #[test]
    fn status_label_and_color() {
        let known = CString::new("IN_PROGRESS").unwrap();
        let label = transfer_status_label(known.as_ptr());
        let color = transfer_status_color(known.as_ptr());
        assert_eq!(c_str(label), "In Progress");
        assert!(c_str(color).starts_with('#'));
        transfer_free_string(label);
        transfer_free_string(color);

        let unknown = CString::new("AWAITING_REVIEW").unwrap();
        let label = transfer_status_label(unknown.as_ptr());
        let color = transfer_status_color(unknown.as_ptr());
        assert_eq!(c_str(label), "AWAITING_REVIEW");
        assert_eq!(c_str(color), transfer_core::status::FALLBACK_COLOR);
        transfer_free_string(label);
        transfer_free_string(color);
    }

    #[test]
    fn free_functions_accept_null() {
        transfer_free_request(std::ptr::null_mut());
        transfer_free_envelope(std::ptr::null_mut());
        transfer_free_string(std::ptr::null_mut());
        transfer_client_set_token(std::ptr::null_mut(), std::ptr::null());
    }
}
