use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use super::ContextError;

pub const WTTR_URL: &str = "https://wttr.in";

/// Condition and temperature, e.g. `Partly cloudy +12°C`.
const FORMAT_QUERY: &str = "format=%C+%t";

/// `GET {base}/{city}?format=%C+%t`; without a city wttr.in geolocates the caller.
pub fn weather_url(base: &str, city: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    match city.map(str::trim).filter(|c| !c.is_empty()) {
        Some(city) => format!(
            "{base}/{}?{FORMAT_QUERY}",
            utf8_percent_encode(city, NON_ALPHANUMERIC)
        ),
        None => format!("{base}/?{FORMAT_QUERY}"),
    }
}

/// Fetch a one-line weather description.
pub async fn fetch(
    http: &reqwest::Client,
    base: &str,
    city: Option<&str>,
) -> Result<String, ContextError> {
    let url = weather_url(base, city);
    tracing::debug!(%url, "fetching weather");

    let text = http
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ContextError::Unavailable("empty weather response".into()));
    }
    Ok(text.to_string())
}
