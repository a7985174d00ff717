//! Prompts for the two pathways.

/// Target shape both prompts ask the completion service to produce.
pub const SNAPSHOT_STRUCTURE: &str = r#"
    {
      "location": "City, Country",
      "current": {
        "temp": "temperature (e.g. 24°C)",
        "condition": "short description (e.g. Sunny, Rain)",
        "humidity": "percentage (e.g. 45%)",
        "wind": "speed (e.g. 15 km/h)",
        "feelsLike": "temperature (e.g. 26°C)",
        "description": "A short, friendly sentence about the current weather."
      },
      "forecast": [
        {
          "day": "Day name (e.g. Tomorrow, Monday)",
          "temp": "High/Low (e.g. 25°/18°)",
          "condition": "short description"
        },
        ... (2 more days)
      ]
    }
"#;

/// Prompt for the fallback pathway: find everything with web search.
pub fn search_prompt(location: &str) -> String {
    format!(
        r#"
Find the current weather and a 3-day forecast for {location}.

IMPORTANT: Provide the response as a valid JSON object string. Do not use Markdown formatting (no ```json blocks).
The JSON object must have this exact structure:
{SNAPSHOT_STRUCTURE}
If specific data is not found, make a reasonable estimate based on the search results.
"#
    )
}

/// Prompt for the primary pathway: reshape the provider payload and fill in
/// what it lacks.
pub fn transform_prompt(location: &str, raw_payload: &str) -> String {
    format!(
        r#"
I have received raw weather data from an external API for the location: "{location}".

Raw Data:
{raw_payload}

The Raw Data JSON contains:
- "temperature": Value in Celsius.
- "humidity": Percentage value.
- "description": Weather condition.
- "city": Location name.

IMPORTANT: Parse this raw data and transform it into a valid JSON object matching the structure below.
Do not use Markdown formatting (no ```json blocks).

Target JSON Structure:
{SNAPSHOT_STRUCTURE}
Guidance:
- Map "temperature" from raw data to "current.temp" (add °C).
- Map "humidity" from raw data to "current.humidity" (add %).
- Map "description" from raw data to "current.condition".
- Generate a friendly "current.description" based on the condition.
- Since the API does not provide wind, feelsLike, or forecast, generate reasonable realistic estimates for these fields based on the current temperature and condition provided.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_prompt_mentions_location_and_shape() {
        let p = search_prompt("Paris");
        assert!(p.contains("3-day forecast for Paris"));
        assert!(p.contains("\"feelsLike\""));
        assert!(p.contains("reasonable estimate"));
    }

    #[test]
    fn test_transform_prompt_embeds_payload() {
        let raw = r#"{"temperature":20,"humidity":50}"#;
        let p = transform_prompt("40.7,-74.0", raw);
        assert!(p.contains(raw));
        assert!(p.contains("\"40.7,-74.0\""));
        assert!(p.contains("add °C"));
        assert!(p.contains("wind, feelsLike, or forecast"));
    }
}
