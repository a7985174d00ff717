//! Completion service client (Gemini `generateContent`).

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::types::{Citation, LookupError};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One prompt sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    /// Ground the answer with live web search.
    pub web_search: bool,
}

/// Generated text plus any web citations the service reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub citations: Vec<Citation>,
}

pub trait CompletionClient: Send + Sync {
    fn generate(&self, api_key: &str, request: &CompletionRequest) -> Result<Completion, LookupError>;
}

/// Gemini REST client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    timeout: Option<Duration>,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    /// Bound the completion call. Unbounded unless set.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

impl CompletionClient for GeminiClient {
    fn generate(&self, api_key: &str, request: &CompletionRequest) -> Result<Completion, LookupError> {
        let mut body = json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }],
        });
        if request.web_search {
            body["tools"] = json!([{ "google_search": {} }]);
        }

        let mut call = ureq::post(&self.endpoint(&request.model))
            .set("x-goog-api-key", api_key)
            .set("Content-Type", "application/json");
        if let Some(timeout) = self.timeout {
            call = call.timeout(timeout);
        }

        let response = call.send_json(body).map_err(|e| match e {
            ureq::Error::Status(code, resp) => {
                let detail = resp
                    .into_json::<ErrorEnvelope>()
                    .ok()
                    .and_then(|env| env.error)
                    .and_then(|err| err.message)
                    .unwrap_or_default();
                if detail.is_empty() {
                    LookupError::Completion(format!("HTTP {}", code))
                } else {
                    LookupError::Completion(format!("HTTP {}: {}", code, detail))
                }
            }
            ureq::Error::Transport(t) => LookupError::Completion(t.to_string()),
        })?;

        let parsed: GenerateContentResponse = response
            .into_json()
            .map_err(|e| LookupError::Completion(format!("Invalid response: {}", e)))?;

        parsed.into_completion()
    }
}

// ─── Wire format ─────────────────────────────────────────────────

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize, Debug)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize, Debug)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Deserialize, Debug)]
struct WebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize, Debug)]
struct ErrorDetail {
    message: Option<String>,
}

impl GenerateContentResponse {
    /// A reply without any text (blocked by safety filters, no candidates)
    /// is an error, not an empty completion.
    fn into_completion(self) -> Result<Completion, LookupError> {
        let Some(first) = self.candidates.into_iter().next() else {
            return Err(LookupError::Completion("Empty response (no candidates)".into()));
        };

        let text = first
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default();
        if text.trim().is_empty() {
            let reason = first.finish_reason.as_deref().unwrap_or("unknown");
            return Err(LookupError::Completion(format!(
                "Empty response (finishReason {})",
                reason
            )));
        }

        let citations = first
            .grounding_metadata
            .map(|m| {
                m.grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web)
                    .filter_map(|web| {
                        let url = web.uri?;
                        let title = web.title.unwrap_or_else(|| url.clone());
                        Some(Citation { url, title })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Completion { text, citations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new("https://gl.example/v1beta/");
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "https://gl.example/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_parse_text_and_grounding() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "{\"location\":" }, { "text": "\"Oslo\"}" }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://yr.example/oslo", "title": "yr.no" } },
                        { "retrievedContext": {} },
                        { "web": { "uri": "https://met.example" } }
                    ]
                }
            }]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let completion = resp.into_completion().unwrap();
        assert_eq!(completion.text, "{\"location\":\"Oslo\"}");
        assert_eq!(completion.citations.len(), 2);
        assert_eq!(completion.citations[0].title, "yr.no");
        assert_eq!(completion.citations[1].title, "https://met.example");
    }

    #[test]
    fn test_parse_no_candidates_is_error() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        match resp.into_completion() {
            Err(LookupError::Completion(msg)) => assert!(msg.contains("no candidates")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_blocked_reply_is_error() {
        let raw = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        match resp.into_completion() {
            Err(LookupError::Completion(msg)) => assert!(msg.contains("SAFETY"), "{}", msg),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_empty_parts_is_error() {
        let raw = r#"{"candidates":[{"content":{"parts":[]},"finishReason":"STOP"}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(resp.into_completion(), Err(LookupError::Completion(_))));
    }
}
