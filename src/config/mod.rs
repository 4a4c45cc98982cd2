/// Database connection and schema creation
pub mod database;

/// Application configuration loading from config.toml
pub mod settings;

pub use settings::{AppConfig, PollerConfig, SessionConfig};
