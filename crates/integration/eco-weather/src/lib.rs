//! Weather by city
//!
//! Fetches the wttr.in `format=j1` document for a city and pulls out the
//! current conditions plus a per-day temperature and humidity trend.
//! Parsing is split from transport so it can be checked against fixtures.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://wttr.in/";

/// Index into `hourly` used as the midday reading
const MIDDAY_SLOT: usize = 4;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Invalid weather URL: {0}")]
    InvalidUrl(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Weather service returned HTTP {0}")]
    Status(u16),

    #[error("Malformed weather response: {0}")]
    Parse(String),

    #[error("Missing field in weather response: {0}")]
    MissingField(String),

    #[error("Field {field} is not a number: {value:?}")]
    InvalidNumber { field: String, value: String },
}

pub type Result<T> = std::result::Result<T, WeatherError>;

/// Current conditions, values kept as reported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temp_c: String,
    pub description: String,
    pub humidity: String,
}

/// One day of the trend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub temperature: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub current: CurrentConditions,
    pub trend: Vec<TrendPoint>,
}

impl WeatherReport {
    /// Banner line shown above the charts
    pub fn summary(&self) -> String {
        format!(
            "{}: {}°C | {} | Humidity: {}%",
            self.city, self.current.temp_c, self.current.description, self.current.humidity
        )
    }
}

/// wttr.in client
pub struct WeatherClient {
    endpoint: String,
    client: reqwest::Client,
}

impl WeatherClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Set base URL; the city name is appended to it
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request URL for a city
    pub fn city_url(&self, city: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.endpoint, city))
            .map_err(|e| WeatherError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair("format", "j1");
        Ok(url)
    }

    pub async fn fetch(&self, city: &str) -> Result<WeatherReport> {
        let url = self.city_url(city)?;
        tracing::debug!(%url, "fetching weather");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status().as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let report = parse_report(city, &body)?;
        tracing::info!(city, days = report.trend.len(), "weather fetched");
        Ok(report)
    }
}

/// Extract a report from a `format=j1` document
pub fn parse_report(city: &str, body: &Value) -> Result<WeatherReport> {
    Ok(WeatherReport {
        city: city.to_string(),
        current: parse_current(body)?,
        trend: parse_trend(body)?,
    })
}

pub fn parse_current(body: &Value) -> Result<CurrentConditions> {
    let current = at(body, "/current_condition/0")?;
    Ok(CurrentConditions {
        temp_c: text(current, "/temp_C", "current_condition[0].temp_C")?,
        description: text(
            current,
            "/weatherDesc/0/value",
            "current_condition[0].weatherDesc[0].value",
        )?,
        humidity: text(current, "/humidity", "current_condition[0].humidity")?,
    })
}

pub fn parse_trend(body: &Value) -> Result<Vec<TrendPoint>> {
    let days = at(body, "/weather")?
        .as_array()
        .ok_or_else(|| WeatherError::Parse("weather is not a list".into()))?;

    days.iter()
        .enumerate()
        .map(|(i, day)| {
            let humidity_ptr = format!("/hourly/{}/humidity", MIDDAY_SLOT);
            Ok(TrendPoint {
                date: text(day, "/date", &format!("weather[{}].date", i))?,
                temperature: number(day, "/avgtempC", &format!("weather[{}].avgtempC", i))?,
                humidity: number(
                    day,
                    &humidity_ptr,
                    &format!("weather[{}].hourly[{}].humidity", i, MIDDAY_SLOT),
                )?,
            })
        })
        .collect()
}

fn at<'a>(value: &'a Value, pointer: &str) -> Result<&'a Value> {
    value
        .pointer(pointer)
        .ok_or_else(|| WeatherError::MissingField(pointer.trim_start_matches('/').replace('/', ".")))
}

fn text(value: &Value, pointer: &str, field: &str) -> Result<String> {
    match value.pointer(pointer) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(WeatherError::MissingField(field.to_string())),
    }
}

fn number(value: &Value, pointer: &str, field: &str) -> Result<f64> {
    let raw = text(value, pointer, field)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| WeatherError::InvalidNumber {
            field: field.to_string(),
            value: raw,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hourly(humidity: &str) -> Value {
        let slots: Vec<Value> = (0..8)
            .map(|i| {
                if i == MIDDAY_SLOT {
                    json!({ "humidity": humidity })
                } else {
                    json!({ "humidity": "0" })
                }
            })
            .collect();
        Value::Array(slots)
    }

    fn fixture() -> Value {
        json!({
            "current_condition": [{
                "temp_C": "31",
                "humidity": "74",
                "weatherDesc": [{ "value": "Partly cloudy" }]
            }],
            "weather": [
                { "date": "2025-06-01", "avgtempC": "30", "hourly": hourly("70") },
                { "date": "2025-06-02", "avgtempC": "29.5", "hourly": hourly("82") },
                { "date": "2025-06-03", "avgtempC": "28", "hourly": hourly("88") }
            ]
        })
    }

    #[test]
    fn test_parse_full_report() {
        let report = parse_report("Dhaka", &fixture()).unwrap();
        assert_eq!(report.current.temp_c, "31");
        assert_eq!(report.current.description, "Partly cloudy");
        assert_eq!(report.current.humidity, "74");
        assert_eq!(report.trend.len(), 3);
        assert_eq!(report.trend[1].date, "2025-06-02");
        assert_eq!(report.trend[1].temperature, 29.5);
        assert_eq!(report.trend[1].humidity, 82.0);
        assert_eq!(
            report.summary(),
            "Dhaka: 31°C | Partly cloudy | Humidity: 74%"
        );
    }

    #[test]
    fn test_missing_current_condition() {
        let err = parse_report("Dhaka", &json!({ "weather": [] })).unwrap_err();
        assert!(matches!(err, WeatherError::MissingField(f) if f == "current_condition.0"));
    }

    #[test]
    fn test_short_hourly_list() {
        let mut body = fixture();
        body["weather"][0]["hourly"] = json!([{ "humidity": "50" }]);
        let err = parse_trend(&body).unwrap_err();
        assert!(matches!(err, WeatherError::MissingField(f) if f.contains("hourly[4]")));
    }

    #[test]
    fn test_unparsable_temperature() {
        let mut body = fixture();
        body["weather"][2]["avgtempC"] = json!("warm");
        let err = parse_trend(&body).unwrap_err();
        assert!(matches!(
            err,
            WeatherError::InvalidNumber { ref field, ref value }
                if field == "weather[2].avgtempC" && value == "warm"
        ));
    }

    #[test]
    fn test_city_url() {
        let client = WeatherClient::new(Duration::from_secs(5));
        let url = client.city_url("Dhaka").unwrap();
        assert_eq!(url.as_str(), "https://wttr.in/Dhaka?format=j1");

        let url = client.city_url("Cox's Bazar").unwrap();
        assert!(url.path().starts_with("/Cox"));
        assert_eq!(url.query(), Some("format=j1"));
    }

    #[test]
    fn test_invalid_endpoint() {
        let client = WeatherClient::new(Duration::from_secs(5)).with_endpoint("not a url/");
        assert!(matches!(
            client.city_url("Dhaka"),
            Err(WeatherError::InvalidUrl(_))
        ));
    }
}
