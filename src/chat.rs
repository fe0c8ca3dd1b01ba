//! Chat turn orchestration: one submitted message triggers a forecast
//! request, then a generation request built from the forecast. Both calls
//! run in a spawned task; outcomes come back to the UI loop as
//! [`ChatEvent`]s.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::forecast;
use crate::ollama;

/// Bot reply used when either stage of a turn fails. The user is not told
/// which stage failed.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single chat message. Immutable once created; the list is append-only
/// within a session and replaced wholesale on load from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Utc::now().timestamp_millis().to_string(),
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        // Offset keeps the id distinct from the user message of the same turn.
        Self {
            id: (Utc::now().timestamp_millis() + 1).to_string(),
            text: text.into(),
            sender: Sender::Bot,
        }
    }
}

/// Progress notifications from an in-flight turn task.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// The forecast arrived; the generation request is now outstanding.
    GenerationStarted,
    BotReply { text: String },
    TurnFailed { error: String },
}

/// Everything a spawned turn task needs. Cloned per turn; there is no
/// cancellation, so a second submit simply starts a second context.
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub client: reqwest::Client,
    pub forecast_url: String,
    pub generate_url: String,
    pub model: String,
}

/// Run one full turn and report the outcome over the channel. Transport
/// failures and malformed bodies at either stage collapse into a single
/// `TurnFailed` event.
pub async fn run_turn(ctx: TurnContext, text: String, tx: mpsc::Sender<ChatEvent>) {
    match turn_inner(&ctx, &text, &tx).await {
        Ok(reply) => {
            let _ = tx.send(ChatEvent::BotReply { text: reply }).await;
        }
        Err(error) => {
            tracing::error!("Chat turn failed: {:#}", error);
            let _ = tx
                .send(ChatEvent::TurnFailed {
                    error: error.to_string(),
                })
                .await;
        }
    }
}

async fn turn_inner(
    ctx: &TurnContext,
    text: &str,
    tx: &mpsc::Sender<ChatEvent>,
) -> Result<String> {
    let forecast = forecast::fetch_forecast(&ctx.client, &ctx.forecast_url, text).await?;
    let _ = tx.send(ChatEvent::GenerationStarted).await;

    let prompt = forecast::build_prompt(&forecast);
    ollama::generate(&ctx.client, &ctx.generate_url, &ctx.model, &prompt).await
}
