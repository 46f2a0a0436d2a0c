//! Per-audience endpoint sets.
//!
//! Each method maps one UI action to one verb, path and JSON body. Nothing
//! here validates input; screens validate before calling.

mod common;
mod customer;
mod driver;
mod partner;

pub use common::CommonApi;
pub use customer::CustomerApi;
pub use driver::DriverApi;
pub use partner::{BookingQuery, PartnerApi};

/// Append `?k=v&...` for the pairs that carry a value.
fn with_query(path: &str, pairs: &[(&str, Option<String>)]) -> String {
    let query: Vec<String> = pairs
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| format!("{key}={}", urlencoding::encode(v)))
        })
        .collect();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", query.join("&"))
    }
}

fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
