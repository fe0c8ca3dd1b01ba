//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

/// Terminal client for the Sunergy home energy assistant.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Forecast endpoint URL.
    #[arg(
        long,
        env = "SUNERGY_FORECAST_URL",
        default_value = "http://jetson.local:7000/predict"
    )]
    pub forecast_url: String,

    /// Generation endpoint URL (Ollama-compatible `/api/generate`).
    #[arg(
        long,
        env = "SUNERGY_GENERATE_URL",
        default_value = "http://jetson.local:11434/api/generate"
    )]
    pub generate_url: String,

    /// Model name passed to the generation endpoint.
    #[arg(long, env = "SUNERGY_MODEL", default_value = "llama3.2:1b")]
    pub model: String,

    /// Energy readings file rendered on the Graphs screen.
    #[arg(long, env = "SUNERGY_DATA_FILE", default_value = "energy_data.txt")]
    pub data_file: PathBuf,

    /// Directory holding persisted state (chat history).
    #[arg(long, env = "SUNERGY_STATE_DIR", default_value = ".sunergy")]
    pub state_dir: PathBuf,
}
