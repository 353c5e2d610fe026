use reqwest::RequestBuilder;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    ClientError, ClientResult, Payload, Settings,
    response::handle_response,
};

use super::HttpProvider;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl HttpProvider {
    pub(crate) async fn weather(&self, settings: &Settings) -> ClientResult<Payload> {
        info!(city = settings.city(), "Fetching weather");

        let coords = self.resolve_city(settings.city()).await?;
        let res = self.forecast_request(coords).send().await?;

        handle_response(res).await
    }

    /// Look the city up in the Open-Meteo geocoder and take the best match.
    async fn resolve_city(&self, city: &str) -> ClientResult<Coordinates> {
        let res = self.geocoding_request(city).send().await?;
        let payload = handle_response(res).await?;
        let coords = coordinates_from_geocoding(city, payload)?;

        debug!(city, latitude = coords.latitude, longitude = coords.longitude, "Resolved city");
        Ok(coords)
    }

    fn geocoding_request(&self, city: &str) -> RequestBuilder {
        self.http
            .get(GEOCODING_URL)
            .query(&[("name", city), ("count", "1"), ("language", "en"), ("format", "json")])
    }

    fn forecast_request(&self, coords: Coordinates) -> RequestBuilder {
        self.http.get(FORECAST_URL).query(&[
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("current_weather", "true".to_string()),
        ])
    }
}

#[derive(Debug, Deserialize)]
struct GeoPlace {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoPlace>,
}

fn coordinates_from_geocoding(city: &str, payload: Payload) -> ClientResult<Coordinates> {
    let parsed: GeoResponse = serde_json::from_value(Value::Object(payload)).map_err(|err| {
        ClientError::with_source(format!("Malformed geocoding response: {err}"), err)
    })?;

    parsed
        .results
        .first()
        .map(|place| Coordinates { latitude: place.latitude, longitude: place.longitude })
        .ok_or_else(|| ClientError::new(format!("No coordinates found for city '{city}'")))
}
