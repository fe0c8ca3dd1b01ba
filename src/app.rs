//! Application state: the two screens, the message list with its storage
//! handle, and the channels background tasks report back on.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use crate::chat::{self, ChatEvent, Message, TurnContext};
use crate::config::Config;
use crate::energy_data::{self, BucketedDataset, Period};
use crate::storage::{self, KvStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Chat,
    Graphs,
}

/// User-visible phase of the most recently submitted turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    AwaitingForecast,
    AwaitingGeneration,
}

#[derive(Debug, Clone)]
pub enum ChartEvent {
    Loaded(BucketedDataset),
    Failed { error: String },
}

/// The Graphs screen never retries on its own: once `Failed`, it stays
/// failed until the next app start.
#[derive(Debug, Clone)]
pub enum ChartStatus {
    Loading,
    Ready(BucketedDataset),
    Failed,
}

pub struct ChartState {
    pub status: ChartStatus,
    pub selected: Period,
}

pub struct App {
    pub screen: Screen,
    pub messages: Vec<Message>,
    pub textarea: TextArea<'static>,
    pub phase: TurnPhase,
    pub chart: ChartState,
    pub scroll_offset: u16,
    store: Box<dyn KvStore>,
    turn_ctx: TurnContext,
    data_file: PathBuf,
    chat_tx: mpsc::Sender<ChatEvent>,
    chat_rx: mpsc::Receiver<ChatEvent>,
    chart_tx: mpsc::Sender<ChartEvent>,
    chart_rx: mpsc::Receiver<ChartEvent>,
}

impl App {
    pub fn new(config: Config, store: Box<dyn KvStore>) -> Self {
        let messages = storage::load_messages(store.as_ref()).unwrap_or_else(|error| {
            tracing::warn!("Could not load chat history, starting empty: {:#}", error);
            Vec::new()
        });

        let mut textarea = TextArea::default();
        textarea.set_placeholder_text("Type your message...");

        let (chat_tx, chat_rx) = mpsc::channel(100);
        let (chart_tx, chart_rx) = mpsc::channel(4);

        Self {
            screen: Screen::Chat,
            messages,
            textarea,
            phase: TurnPhase::Idle,
            chart: ChartState {
                status: ChartStatus::Loading,
                selected: Period::Hour,
            },
            scroll_offset: 0,
            store,
            turn_ctx: TurnContext {
                client: reqwest::Client::new(),
                forecast_url: config.forecast_url,
                generate_url: config.generate_url,
                model: config.model,
            },
            data_file: config.data_file,
            chat_tx,
            chat_rx,
            chart_tx,
            chart_rx,
        }
    }

    /// Append a message and persist the whole list. Persistence failures
    /// are logged, not surfaced; the in-memory list is the source of truth
    /// for the session.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        if let Err(error) = storage::save_messages(self.store.as_ref(), &self.messages) {
            tracing::error!("Failed to persist chat history: {:#}", error);
        }
    }

    /// Submit whatever is in the input box. Empty (after trimming) input is
    /// a no-op. The turn runs in a spawned task; submitting again while a
    /// turn is outstanding starts an independent second chain, and replies
    /// land in completion order.
    pub fn submit_message(&mut self) {
        let input = self.textarea.lines().join("\n").trim().to_string();
        if input.is_empty() {
            return;
        }

        self.textarea.select_all();
        self.textarea.cut();

        self.push_message(Message::user(input.clone()));
        self.phase = TurnPhase::AwaitingForecast;

        let ctx = self.turn_ctx.clone();
        let tx = self.chat_tx.clone();
        tokio::spawn(async move {
            chat::run_turn(ctx, input, tx).await;
        });
    }

    /// Read and parse the energy data file in the background. Called once
    /// at startup; a reload would require restarting the app.
    pub fn start_chart_load(&self) {
        let path = self.data_file.clone();
        let tx = self.chart_tx.clone();
        tokio::spawn(async move {
            let event = match load_chart_data(&path).await {
                Ok(dataset) => ChartEvent::Loaded(dataset),
                Err(error) => {
                    tracing::error!("Error loading energy data: {:#}", error);
                    ChartEvent::Failed {
                        error: error.to_string(),
                    }
                }
            };
            let _ = tx.send(event).await;
        });
    }

    /// Drain pending events from background tasks. Called every tick of the
    /// UI loop.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.chat_rx.try_recv() {
            self.apply_chat_event(event);
        }
        while let Ok(event) = self.chart_rx.try_recv() {
            self.apply_chart_event(event);
        }
    }

    pub fn apply_chat_event(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::GenerationStarted => {
                self.phase = TurnPhase::AwaitingGeneration;
            }
            ChatEvent::BotReply { text } => {
                self.push_message(Message::bot(text));
                self.phase = TurnPhase::Idle;
            }
            ChatEvent::TurnFailed { error } => {
                tracing::warn!("Turn ended in fallback reply: {}", error);
                self.push_message(Message::bot(chat::FALLBACK_REPLY));
                self.phase = TurnPhase::Idle;
            }
        }
    }

    pub fn apply_chart_event(&mut self, event: ChartEvent) {
        match event {
            ChartEvent::Loaded(dataset) => {
                self.chart.status = ChartStatus::Ready(dataset);
            }
            ChartEvent::Failed { error } => {
                tracing::error!("Graphs screen disabled: {}", error);
                self.chart.status = ChartStatus::Failed;
            }
        }
    }

    pub fn next_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Chat => Screen::Graphs,
            Screen::Graphs => Screen::Chat,
        };
    }

    pub fn select_period(&mut self, period: Period) {
        self.chart.selected = period;
    }

    /// Cycle the period selector left or right, wrapping around.
    pub fn cycle_period(&mut self, forward: bool) {
        let current = Period::ALL
            .iter()
            .position(|p| *p == self.chart.selected)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % Period::ALL.len()
        } else {
            (current + Period::ALL.len() - 1) % Period::ALL.len()
        };
        self.chart.selected = Period::ALL[next];
    }
}

async fn load_chart_data(path: &Path) -> Result<BucketedDataset> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(energy_data::process_data(&raw)?)
}
