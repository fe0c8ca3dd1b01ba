//! Library surface of the Sunergy terminal client. The binary wires these
//! modules to a terminal; tests drive them directly.

pub mod app;
pub mod chat;
pub mod config;
pub mod energy_data;
pub mod events;
pub mod forecast;
pub mod ollama;
pub mod storage;
pub mod ui;
