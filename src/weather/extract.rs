//! Pull a snapshot out of completion text.
//!
//! Models wrap JSON in code fences or conversational filler often enough that
//! decoding works on the span between the first `{` and the last `}`.

use super::types::WeatherSnapshot;

/// Strip code fences and surrounding filler, leaving the candidate JSON text.
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    match (start, end) {
        (Some(s), Some(e)) if s < e => &trimmed[s..=e],
        _ => trimmed,
    }
}

/// Remove ```json / ``` fence markers.
pub fn strip_fences(text: &str) -> String {
    if text.contains("```") {
        text.replace("```json", "").replace("```", "")
    } else {
        text.to_string()
    }
}

/// Best-effort decode of completion text into a snapshot.
pub fn decode_snapshot(text: &str) -> Result<WeatherSnapshot, serde_json::Error> {
    let cleaned = strip_fences(text);
    serde_json::from_str(extract_json(&cleaned))
}
