use serde::Deserialize;

use super::ContextError;

pub const PRIMARY_URL: &str = "http://ip-api.com/json/";
pub const FALLBACK_URL: &str = "https://ipapi.co/json/";

/// Coarse location from IP geolocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub city: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region_name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
    #[serde(default)]
    timezone: String,
}

#[derive(Debug, Deserialize)]
struct IpapiCoResponse {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country_name: String,
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
    #[serde(default)]
    timezone: String,
}

/// Ask the primary service, then the fallback.
pub async fn fetch(
    http: &reqwest::Client,
    primary: &str,
    fallback: &str,
) -> Result<Location, ContextError> {
    match fetch_primary(http, primary).await {
        Ok(location) => return Ok(location),
        Err(e) => tracing::warn!("ip-api lookup failed: {e}"),
    }
    fetch_fallback(http, fallback).await
}

async fn fetch_primary(http: &reqwest::Client, url: &str) -> Result<Location, ContextError> {
    let data: IpApiResponse = http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if data.status != "success" {
        return Err(ContextError::Unavailable(
            data.message.unwrap_or_else(|| format!("status {:?}", data.status)),
        ));
    }

    Ok(Location {
        city: data.city.unwrap_or_else(|| "Unknown".into()),
        region: data.region_name,
        country: data.country,
        lat: data.lat,
        lon: data.lon,
        timezone: data.timezone,
    })
}

async fn fetch_fallback(http: &reqwest::Client, url: &str) -> Result<Location, ContextError> {
    let data: IpapiCoResponse = http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(Location {
        city: data.city.unwrap_or_else(|| "Unknown".into()),
        region: data.region,
        country: data.country_name,
        lat: data.latitude,
        lon: data.longitude,
        timezone: data.timezone,
    })
}
