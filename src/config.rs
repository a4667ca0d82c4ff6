//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

use crate::utils::lock;

/// The name that is displayed for chat messages that were sent without a name.
/// Feel free to override it when initing this library.
pub static ANONYMOUS_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("anonymous".to_string())));

/// The language weather descriptions are requested in (the `lang` parameter of the weather API).
/// Feel free to override it when initing this library.
pub static WEATHER_LANGUAGE: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("kr".to_string())));

/// Environment variable that holds the weather API key
pub const ENV_WEATHER_API_KEY: &str = "PINBOARD_WEATHER_API_KEY";
/// Environment variable that holds the API key of the remote chat store
pub const ENV_FIREBASE_API_KEY: &str = "PINBOARD_FIREBASE_API_KEY";
/// Environment variable that holds the project ID of the remote chat store
pub const ENV_FIREBASE_PROJECT_ID: &str = "PINBOARD_FIREBASE_PROJECT_ID";

/// Values that were shipped as placeholders in sample configurations. They mean "not configured".
const PLACEHOLDER_PREFIX: &str = "YOUR_";


/// Returns the current display name for anonymous chat messages
pub fn anonymous_name() -> String {
    lock(&ANONYMOUS_NAME).clone()
}

/// Returns the current language for weather descriptions
pub fn weather_language() -> String {
    lock(&WEATHER_LANGUAGE).clone()
}


/// A latitude/longitude pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Haeundae-gu, Busan (South Korea)
    pub const HAEUNDAE: Coordinates = Coordinates { latitude: 35.16665, longitude: 129.16792 };
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::HAEUNDAE
    }
}

/// Credentials for the weather API
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherSettings {
    pub api_key: String,
}

/// Connection parameters of the remote document store that backs the chat
#[derive(Clone, Debug, PartialEq)]
pub struct ChatSettings {
    pub api_key: String,
    pub project_id: String,
}

/// Everything the dashboard needs to know about its environment.
///
/// A feature whose settings are `None` is disabled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    pub weather: Option<WeatherSettings>,
    pub chat: Option<ChatSettings>,
    pub location: Coordinates,
}

impl Settings {
    /// Build settings from the `PINBOARD_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable lookup function.
    ///
    /// Empty and placeholder values are considered absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let configured = |name: &str| lookup(name).and_then(configured_value);

        let weather = configured(ENV_WEATHER_API_KEY)
            .map(|api_key| WeatherSettings { api_key });

        let chat = match (configured(ENV_FIREBASE_API_KEY), configured(ENV_FIREBASE_PROJECT_ID)) {
            (Some(api_key), Some(project_id)) => Some(ChatSettings { api_key, project_id }),
            _ => None,
        };

        Self { weather, chat, location: Coordinates::default() }
    }
}

fn configured_value(raw: String) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value.starts_with(PLACEHOLDER_PREFIX) {
        return None;
    }
    Some(value.to_string())
}
