//! AlienVault OTX pulse retrieval and indicator export.

pub mod client;
pub mod export;
pub mod indicator;

pub use client::{OtxClient, OtxConfig, API_KEY_ENV, API_KEY_HEADER, DEFAULT_BASE_URL};
pub use export::{export_to_csv, write_indicators_csv, DEFAULT_CSV_PATH, INDICATOR_COLUMNS};
pub use indicator::{Indicator, Pulse};
