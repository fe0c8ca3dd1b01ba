//! Client for the forecast endpoint: given the user's message, the service
//! predicts energy usage and solar generation for a time window.

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
struct ForecastRequest<'a> {
    message: &'a str,
}

/// Predicted figures returned by the forecast service. There is no error
/// schema; anything that is not a 2xx with this shape is a generic failure.
#[derive(Debug, Clone, Deserialize)]
pub struct Forecast {
    pub usage_wh: f64,
    pub generation_wh: f64,
    pub timeframe: String,
}

pub async fn fetch_forecast(client: &Client, url: &str, message: &str) -> Result<Forecast> {
    tracing::info!("Requesting forecast for message: {}", message);

    let response = client
        .post(url)
        .json(&ForecastRequest { message })
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!("Forecast API error ({}): {}", status, error_text);
        anyhow::bail!("forecast API returned {}", status);
    }

    let forecast: Forecast = response.json().await?;
    tracing::debug!(
        "Forecast: usage {} Wh, generation {} Wh, timeframe {}",
        forecast.usage_wh,
        forecast.generation_wh,
        forecast.timeframe
    );
    Ok(forecast)
}

/// Build the generation prompt from a forecast.
pub fn build_prompt(forecast: &Forecast) -> String {
    format!(
        "Given that the expected energy usage is {} Wh \
         and expected solar generation is {} Wh \
         for the next {}, how can the user optimize energy consumption?",
        forecast.usage_wh, forecast.generation_wh, forecast.timeframe
    )
}
