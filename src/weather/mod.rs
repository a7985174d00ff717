//! Weather lookup subsystem for SkyCast.
//!
//! Queries the primary weather endpoint, reshapes or replaces its answer
//! through a completion service, and normalizes everything into a
//! [`WeatherOutcome`].

pub mod completion;
pub mod extract;
pub mod orchestrator;
pub mod primary;
pub mod prompt;
pub mod types;

pub use completion::{Completion, CompletionClient, CompletionRequest, GeminiClient};
pub use orchestrator::{ApiKeySource, WeatherOrchestrator};
pub use primary::{HttpWeatherSource, PrimaryFailure, WeatherSource};
pub use types::{
    Citation, CurrentConditions, ForecastDay, LookupError, OutcomeBody, Pathway, WeatherOutcome,
    WeatherSnapshot,
};
