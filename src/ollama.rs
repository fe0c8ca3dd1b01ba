//! Client for the locally hosted generation endpoint (Ollama's
//! `/api/generate` contract).

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Ask the model for a completion. The request carries the stream flag the
/// endpoint expects, but the body is consumed as a single JSON document.
pub async fn generate(client: &Client, url: &str, model: &str, prompt: &str) -> Result<String> {
    tracing::info!("Requesting generation from model {}", model);

    let request_body = OllamaRequest {
        model,
        prompt,
        stream: true,
    };

    let response = client.post(url).json(&request_body).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!("Ollama API error ({}): {}", status, error_text);
        anyhow::bail!("generation API returned {}", status);
    }

    let ollama_response: OllamaResponse = response.json().await?;
    Ok(ollama_response.response.trim().to_string())
}
