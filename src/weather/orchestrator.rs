//! Weather orchestrator: primary endpoint first, search-grounded completion
//! when it fails, completion-based reshaping when it succeeds.
//!
//! Flow: guard input → credential → primary GET (timed) → one completion call
//!       → decode (or degrade to raw text) → citations + pathway tag

use super::completion::{CompletionClient, CompletionRequest, DEFAULT_MODEL};
use super::extract::decode_snapshot;
use super::primary::{WeatherSource, PRIMARY_SOURCE_TITLE};
use super::prompt;
use super::types::{Citation, LookupError, OutcomeBody, Pathway, WeatherOutcome};

pub const DEFAULT_API_KEY_VAR: &str = "API_KEY";

/// Where the completion service API key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Read from this environment variable on every lookup.
    Env(String),
    /// Fixed key from the config file or command line.
    Static(String),
}

impl ApiKeySource {
    pub fn resolve(&self) -> Result<String, LookupError> {
        let (key, var) = match self {
            Self::Env(var) => (std::env::var(var).ok(), var.as_str()),
            Self::Static(key) => (Some(key.clone()), "api_key"),
        };
        key.filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LookupError::MissingCredential { var: var.to_string() })
    }
}

/// Stateless lookup pipeline. Each `fetch` is independent; callers may share
/// one orchestrator across threads.
pub struct WeatherOrchestrator {
    source: Box<dyn WeatherSource>,
    completion: Box<dyn CompletionClient>,
    api_key: ApiKeySource,
    model: String,
}

impl WeatherOrchestrator {
    pub fn new(
        source: impl WeatherSource + 'static,
        completion: impl CompletionClient + 'static,
        api_key: ApiKeySource,
    ) -> Self {
        Self {
            source: Box::new(source),
            completion: Box::new(completion),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Look up the weather for a place name or a "lat,lon" pair.
    pub fn fetch(&self, location: &str) -> Result<WeatherOutcome, LookupError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(LookupError::EmptyLocation);
        }
        let api_key = self.api_key.resolve()?;

        let primary_url = self.source.url_for(location);
        let (raw_payload, fallback_reason) = match self.source.fetch_raw(location) {
            Ok(raw) => (Some(raw), None),
            Err(failure) => {
                tracing::warn!(location, "Custom weather API failed: {}", failure);
                (None, Some(failure.to_string()))
            }
        };

        let request = match &raw_payload {
            Some(raw) => CompletionRequest {
                model: self.model.clone(),
                prompt: prompt::transform_prompt(location, raw),
                web_search: false,
            },
            None => CompletionRequest {
                model: self.model.clone(),
                prompt: prompt::search_prompt(location),
                web_search: true,
            },
        };
        let pathway = if request.web_search {
            Pathway::SearchFallback
        } else {
            Pathway::Primary
        };

        let completion = self.completion.generate(&api_key, &request).map_err(|e| {
            tracing::error!(location, "Completion call failed: {}", e);
            e
        })?;
        if completion.text.trim().is_empty() {
            tracing::error!(location, "Completion returned no text");
            return Err(LookupError::Completion("Empty response".into()));
        }

        let body = match decode_snapshot(&completion.text) {
            Ok(snapshot) => OutcomeBody::Snapshot(snapshot),
            Err(e) => {
                tracing::warn!(location, "Failed to parse weather JSON: {}", e);
                match pathway {
                    Pathway::SearchFallback => OutcomeBody::RawText(completion.text),
                    Pathway::Primary => OutcomeBody::RawText(format!(
                        "API Data processed but JSON parsing failed. Interpretation: {}",
                        completion.text
                    )),
                }
            }
        };

        let sources = match pathway {
            Pathway::SearchFallback => completion.citations,
            Pathway::Primary => vec![Citation {
                url: primary_url,
                title: PRIMARY_SOURCE_TITLE.to_string(),
            }],
        };

        Ok(WeatherOutcome {
            body,
            sources,
            pathway,
            fallback_reason,
        })
    }
}
