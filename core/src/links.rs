//! URIs handed to the dialer, messaging and map apps.

use crate::types::Platform;

/// Navigation app a driver or customer prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavApp {
    #[default]
    Google,
    Waze,
    Apple,
}

pub fn tel_uri(phone: &str) -> String {
    format!("tel:{}", phone.trim())
}

pub fn sms_uri(phone: &str) -> String {
    format!("sms:{}", phone.trim())
}

/// Turn-by-turn deep link into the chosen navigation app.
pub fn navigation_uri(latitude: f64, longitude: f64, app: NavApp, platform: Platform) -> String {
    match app {
        NavApp::Waze => format!("https://waze.com/ul?ll={latitude},{longitude}&navigate=yes"),
        NavApp::Apple => format!("http://maps.apple.com/?daddr={latitude},{longitude}"),
        NavApp::Google => match platform {
            Platform::Ios => {
                format!("comgooglemaps://?daddr={latitude},{longitude}&directionsmode=driving")
            }
            Platform::Android => format!("google.navigation:q={latitude},{longitude}"),
        },
    }
}

/// Browser fallback when no navigation app handles the deep link.
pub fn web_directions_uri(latitude: f64, longitude: f64) -> String {
    format!("https://www.google.com/maps/dir/?api=1&destination={latitude},{longitude}")
}

/// The platform's default maps app, with an optional pin label on Android.
pub fn platform_maps_uri(latitude: f64, longitude: f64, label: Option<&str>, platform: Platform) -> String {
    match platform {
        Platform::Ios => format!("maps:?daddr={latitude},{longitude}"),
        Platform::Android => match label {
            Some(label) => format!(
                "geo:0,0?q={latitude},{longitude}({})",
                urlencoding::encode(label)
            ),
            None => format!("geo:0,0?q={latitude},{longitude}"),
        },
    }
}
