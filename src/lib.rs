pub mod app;
pub mod calendar;
pub mod config;
pub mod date_key;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod log;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod transfer;
pub mod ui;

pub use app::router;
pub use calendar::{DayStatus, classify_day};
pub use config::Config;
pub use date_key::DateKey;
pub use log::CompletionLog;
pub use state::AppState;
pub use stats::{aggregate, compute_stats};
pub use storage::Store;
