//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, a pointer and length instead of `Vec`,
//! and enums with explicit discriminants. Payloads cross as JSON text so one
//! envelope type serves every endpoint. Conversion helpers live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use transfer_core::http::HttpMethod;
use transfer_core::{ApiError, HttpRequest};

/// Opaque handle to a `TransferClient`. C callers receive a pointer to this
/// and pass it back into every builder.
pub struct FfiTransferClient {
    pub(crate) inner: transfer_core::TransferClient,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Patch = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Patch => FfiHttpMethod::Patch,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `transfer_build_*` functions. The C caller executes the request
/// and passes the response back through `transfer_parse_envelope`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Move a core `HttpRequest` onto the heap as an `FfiHttpRequest`.
    /// Returns null when any string holds an interior NUL byte.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let Ok(path) = CString::new(req.path) else {
            return std::ptr::null_mut();
        };
        let body = match req.body.map(CString::new) {
            None => None,
            Some(Ok(b)) => Some(b),
            Some(Err(_)) => return std::ptr::null_mut(),
        };
        let mut headers = Vec::with_capacity(req.headers.len());
        for (k, v) in req.headers {
            match (CString::new(k), CString::new(v)) {
                (Ok(k), Ok(v)) => headers.push((k, v)),
                _ => return std::ptr::null_mut(),
            }
        }

        let headers_len = headers.len() as u32;
        let headers = if headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: k.into_raw(),
                    value: v.into_raw(),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: path.into_raw(),
            headers,
            headers_len,
            body: body.map_or(std::ptr::null_mut(), CString::into_raw),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller fills this in after executing a request and passes a
/// pointer to `transfer_parse_envelope`. The FFI layer reads but does not
/// free these fields. A null `body` is treated as empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Failure category carried next to the envelope's message.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Http = 1,
    Transport = 2,
    Deserialization = 3,
    Serialization = 4,
    Panic = 5,
    NullArg = 6,
}

/// The `{ success, data, error }` envelope as C data.
///
/// On success `error_message` is null and `data_json` holds the payload
/// re-encoded as JSON. On failure `data_json` is null and `error_message` is
/// never empty.
#[repr(C)]
pub struct FfiEnvelope {
    pub success: bool,
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_json: *mut c_char,
}

impl FfiEnvelope {
    pub(crate) fn ok(data_json: String, http_status: u16) -> *mut Self {
        match CString::new(data_json) {
            Ok(data) => Box::into_raw(Box::new(FfiEnvelope {
                success: true,
                error_code: FfiErrorCode::Ok,
                error_message: std::ptr::null_mut(),
                http_status,
                data_json: data.into_raw(),
            })),
            Err(_) => Self::failure(FfiErrorCode::Serialization, http_status, "invalid response: NUL in payload"),
        }
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (code, status) = match &err {
            ApiError::Http { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::Serialization(_) => (FfiErrorCode::Serialization, 0),
        };
        Self::failure(code, status, &err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, 0, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, 0, msg)
    }

    fn failure(error_code: FfiErrorCode, http_status: u16, msg: &str) -> *mut Self {
        let msg = if msg.trim().is_empty() {
            transfer_core::envelope::GENERIC_FAILURE
        } else {
            msg
        };
        Box::into_raw(Box::new(FfiEnvelope {
            success: false,
            error_code,
            error_message: c_string(msg),
            http_status,
            data_json: std::ptr::null_mut(),
        }))
    }
}

/// Copy `s` into a freshly allocated C string, dropping interior NULs.
pub(crate) fn c_string(s: &str) -> *mut c_char {
    let cleaned: String = s.chars().filter(|&c| c != '\0').collect();
    CString::new(cleaned).unwrap_or_default().into_raw()
}
