//! Drives the C surface against the live mock server, executing requests
//! with ureq the way a native shell would with its own HTTP stack.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use transfer_ffi::types::{FfiEnvelope, FfiHttpMethod, FfiHttpRequest, FfiHttpResponse};
use transfer_ffi::*;

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn text(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// Execute `req` over HTTP, parse the reply and release both sides.
fn round_trip(req: *mut FfiHttpRequest) -> (bool, Option<String>, Option<serde_json::Value>) {
    assert!(!req.is_null());
    let r = unsafe { &*req };

    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let path = text(r.path);
    let headers: Vec<(String, String)> = if r.headers.is_null() {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(r.headers, r.headers_len as usize) }
            .iter()
            .map(|h| (text(h.key), text(h.value)))
            .collect()
    };
    let body = (!r.body.is_null()).then(|| text(r.body));

    let mut response = match r.method {
        FfiHttpMethod::Get => {
            let mut b = agent.get(&path);
            for (k, v) in &headers {
                b = b.header(k.as_str(), v.as_str());
            }
            b.call()
        }
        FfiHttpMethod::Post => {
            let mut b = agent.post(&path);
            for (k, v) in &headers {
                b = b.header(k.as_str(), v.as_str());
            }
            b.send(body.unwrap_or_default().as_bytes())
        }
        FfiHttpMethod::Patch => {
            let mut b = agent.patch(&path);
            for (k, v) in &headers {
                b = b.header(k.as_str(), v.as_str());
            }
            b.send(body.unwrap_or_default().as_bytes())
        }
        FfiHttpMethod::Delete => {
            let mut b = agent.delete(&path);
            for (k, v) in &headers {
                b = b.header(k.as_str(), v.as_str());
            }
            b.call()
        }
    }
    .expect("HTTP transport error");
    transfer_free_request(req);

    let status = response.status().as_u16();
    let reply = CString::new(response.body_mut().read_to_string().unwrap_or_default()).unwrap();
    let resp = FfiHttpResponse {
        status,
        body: reply.as_ptr(),
    };
    let env: *mut FfiEnvelope = transfer_parse_envelope(&resp);
    let e = unsafe { &*env };
    let out = (
        e.success,
        (!e.error_message.is_null()).then(|| text(e.error_message)),
        (!e.data_json.is_null()).then(|| serde_json::from_str(&text(e.data_json)).unwrap()),
    );
    transfer_free_envelope(env);
    out
}

#[test]
fn driver_signs_in_and_starts_a_ride() {
    let base = CString::new(start_server()).unwrap();
    let client = transfer_client_new(base.as_ptr());

    // Anonymous ride list is refused.
    let (ok, err, _) = round_trip(transfer_build_get_rides(client, TRANSFER_RIDES_TODAY));
    assert!(!ok);
    assert_eq!(err.as_deref(), Some("Unauthorized"));

    let email = CString::new("rui@atlantic.pt").unwrap();
    let password = CString::new("password123").unwrap();
    let (ok, _, data) = round_trip(transfer_build_login(
        client,
        TRANSFER_AUDIENCE_DRIVER,
        email.as_ptr(),
        password.as_ptr(),
        0,
    ));
    assert!(ok);
    let token = CString::new(data.unwrap()["token"].as_str().unwrap()).unwrap();
    transfer_client_set_token(client, token.as_ptr());

    let (ok, _, data) = round_trip(transfer_build_get_rides(client, TRANSFER_RIDES_TODAY));
    assert!(ok);
    let rides = data.unwrap();
    let ride = &rides["rides"][0];
    let id = ride["id"].as_i64().unwrap();

    let status = CString::new(ride["status"].as_str().unwrap()).unwrap();
    let label = transfer_status_label(status.as_ptr());
    assert_eq!(text(label), "Driver Assigned");
    transfer_free_string(label);

    for action in ["ON_THE_WAY", "ARRIVED", "START_RIDE"] {
        let action = CString::new(action).unwrap();
        let (ok, err, _) = round_trip(transfer_build_update_ride_status(client, id, action.as_ptr()));
        assert!(ok, "{err:?}");
    }

    let (ok, err, _) = round_trip(transfer_build_update_location(client, 38.77, -9.13, 90.0, f64::NAN, 5.0));
    assert!(ok, "{err:?}");

    transfer_client_free(client);
}

#[test]
fn public_tracking_needs_no_token() {
    let base = CString::new(start_server()).unwrap();
    let client = transfer_client_new(base.as_ptr());

    let code = CString::new("ATP-1001").unwrap();
    let (ok, _, data) = round_trip(transfer_build_track_booking(client, code.as_ptr()));
    assert!(ok);
    assert_eq!(data.unwrap()["booking"]["publicCode"], "ATP-1001");

    let missing = CString::new("ATP-0000").unwrap();
    let (ok, err, data) = round_trip(transfer_build_track_booking(client, missing.as_ptr()));
    assert!(!ok);
    assert_eq!(err.as_deref(), Some("Booking not found"));
    assert!(data.is_none());

    transfer_client_free(client);
}
