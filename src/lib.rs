//! SkyCast: weather lookup with a primary HTTP provider and a
//! search-grounded completion fallback.

pub mod config;
pub mod render;
pub mod server;
pub mod weather;

pub use config::{Config, ConfigError};
pub use weather::{LookupError, Pathway, WeatherOrchestrator, WeatherOutcome, WeatherSnapshot};
