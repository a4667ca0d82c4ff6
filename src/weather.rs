//! The weather panel
//!
//! The current conditions are fetched once, from the OpenWeatherMap "current weather" API.
//! Without an API key, the panel is left blank.

use std::error::Error;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::config::{self, Coordinates, Settings};
use crate::mock_behaviour::MockBehaviour;
use crate::page::{ids, Page};
use crate::utils::{escape_html, lock};

/// Endpoint of the current weather API
pub const WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
/// Where weather icons are served from
pub const WEATHER_ICON_URL: &str = "https://openweathermap.org/img/wn";


/// The current conditions at a given place
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherReport {
    /// Icon code, e.g. `01d`
    pub icon: String,
    pub description: String,
    /// Name of the place
    pub location: String,
    /// Temperature, in °C
    pub temperature: f64,
}

#[derive(Deserialize)]
struct CurrentWeather {
    weather: Vec<Condition>,
    name: String,
    main: Readings,
}

#[derive(Deserialize)]
struct Condition {
    icon: String,
    description: String,
}

#[derive(Deserialize)]
struct Readings {
    temp: f64,
}

impl WeatherReport {
    /// Parse the body of a current weather API response
    pub fn from_json(body: &str) -> Result<Self, Box<dyn Error>> {
        let current: CurrentWeather = serde_json::from_str(body)?;
        let condition = match current.weather.into_iter().next() {
            None => return Err("No weather condition in this response".into()),
            Some(c) => c,
        };

        Ok(Self {
            icon: condition.icon,
            description: condition.description,
            location: current.name,
            temperature: current.main.temp,
        })
    }

    /// The temperature, to one decimal. Ties are rounded away from zero (`23.25` gives `23.3`)
    pub fn rounded_temperature(&self) -> f64 {
        (self.temperature * 10.0).round() / 10.0
    }

    pub fn icon_url(&self) -> String {
        format!("{}/{}@2x.png", WEATHER_ICON_URL, self.icon)
    }

    /// Markup of the weather panel
    pub fn render(&self) -> String {
        let description = escape_html(&self.description);
        format!(
r#"<img src="{icon}" alt="{description}" />
<div>
<p><strong>{location}</strong></p>
<p>{temperature:.1}°C – {description}</p>
</div>"#,
            icon = escape_html(&self.icon_url()),
            description = description,
            location = escape_html(&self.location),
            temperature = self.rounded_temperature(),
        )
    }
}


/// Something that knows the current weather
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current_weather(&self, location: Coordinates) -> Result<WeatherReport, Box<dyn Error>>;
}


/// A client of the OpenWeatherMap API
pub struct WeatherClient {
    api_key: String,
    base_url: Url,
}

impl WeatherClient {
    /// Create a client. This does not start a connection
    pub fn new<S: ToString>(api_key: S) -> Result<Self, Box<dyn Error>> {
        Self::with_base_url(api_key, WEATHER_API_URL)
    }

    /// Create a client that targets another endpoint
    pub fn with_base_url<S: ToString, U: AsRef<str>>(api_key: S, base_url: U) -> Result<Self, Box<dyn Error>> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self { api_key: api_key.to_string(), base_url })
    }

    /// The URL of the request for the current weather at `location`
    pub fn request_url(&self, location: Coordinates) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &location.latitude.to_string())
            .append_pair("lon", &location.longitude.to_string())
            .append_pair("appid", &self.api_key)
            .append_pair("units", "metric")
            .append_pair("lang", &config::weather_language());
        url
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn current_weather(&self, location: Coordinates) -> Result<WeatherReport, Box<dyn Error>> {
        let url = self.request_url(location);
        log::debug!("Fetching the weather at {:?}", location);

        let response = reqwest::Client::new()
            .get(url.as_str())
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", response.status()).into());
        }

        let text = response.text().await?;
        WeatherReport::from_json(&text)
    }
}


/// A weather source that replies a fixed API response, for tests and demos
pub struct MockWeatherSource {
    body: String,
    behaviour: Mutex<MockBehaviour>,
}

impl MockWeatherSource {
    /// `body` is what the API would reply
    pub fn new<S: ToString>(body: S) -> Self {
        Self::with_behaviour(body, MockBehaviour::new())
    }

    pub fn with_behaviour<S: ToString>(body: S, behaviour: MockBehaviour) -> Self {
        Self {
            body: body.to_string(),
            behaviour: Mutex::new(behaviour),
        }
    }
}

#[async_trait]
impl WeatherSource for MockWeatherSource {
    async fn current_weather(&self, _location: Coordinates) -> Result<WeatherReport, Box<dyn Error>> {
        lock(&self.behaviour).can_fetch_weather()?;
        WeatherReport::from_json(&self.body)
    }
}


/// The weather section of the page
pub struct WeatherPanel {
    source: Option<Box<dyn WeatherSource>>,
    location: Coordinates,
}

impl WeatherPanel {
    pub fn new(source: Option<Box<dyn WeatherSource>>, location: Coordinates) -> Self {
        Self { source, location }
    }

    /// A panel backed by the OpenWeatherMap API, if it is configured
    pub fn from_settings(settings: &Settings) -> Self {
        let source = match &settings.weather {
            None => None,
            Some(weather) => match WeatherClient::new(&weather.api_key) {
                Ok(client) => Some(Box::new(client) as Box<dyn WeatherSource>),
                Err(err) => {
                    log::error!("Unable to create a weather client: {}", err);
                    None
                }
            },
        };
        Self::new(source, settings.location)
    }

    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    /// Fetch the current weather and display it.
    ///
    /// Nothing is retried: in case of errors, they are logged and the panel keeps its current content.
    pub async fn fetch_weather(&self, page: &Mutex<Page>) {
        let source = match &self.source {
            None => {
                log::warn!("Please provide a valid OpenWeatherMap API key.");
                return;
            },
            Some(s) => s,
        };

        match source.current_weather(self.location).await {
            Err(err) => log::error!("Error fetching weather: {}", err),
            Ok(report) => {
                log::info!("Weather in {}: {:.1}°C, {}", report.location, report.rounded_temperature(), report.description);
                lock(page).set_html(ids::WEATHER_INFO, report.render());
            },
        }
    }
}
