//! Plain-text rendering of a lookup outcome for the terminal.

use crate::weather::{OutcomeBody, WeatherOutcome, WeatherSnapshot};

/// Keep only digits, '.' and '-' of a temperature string and append a degree
/// sign: "24°C" → "24°", "-3.5 °F" → "-3.5°".
pub fn headline_temperature(temp: &str) -> String {
    let digits: String = temp
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    format!("{}\u{00B0}", digits)
}

/// Render the full outcome: source badge, fallback notice, card or raw text,
/// and citations.
pub fn render_outcome(outcome: &WeatherOutcome) -> String {
    let mut out = String::new();

    out.push_str(&format!("  Source: {}\n", outcome.pathway));
    if let Some(reason) = &outcome.fallback_reason {
        out.push_str(&format!("  \u{26A0}\u{FE0F}  API Connection Failed: {}\n", reason));
    }
    out.push('\n');

    match &outcome.body {
        OutcomeBody::Snapshot(snapshot) => out.push_str(&render_snapshot(snapshot)),
        OutcomeBody::RawText(text) => {
            for line in text.lines() {
                out.push_str(&format!("  {}\n", line));
            }
        }
    }

    let links: Vec<_> = outcome.sources.iter().filter(|c| !c.url.is_empty()).collect();
    if !links.is_empty() {
        out.push_str("\n  Sources:\n");
        for c in links {
            out.push_str(&format!("    - {} <{}>\n", c.title, c.url));
        }
    }

    out
}

pub fn render_snapshot(s: &WeatherSnapshot) -> String {
    let mut out = String::new();
    let cur = &s.current;

    out.push_str(&format!("  \u{1F4CD} {}\n", s.location));
    out.push_str(&format!("  {}  {}\n", headline_temperature(&cur.temp), cur.condition));
    if let Some(feels) = &cur.feels_like {
        out.push_str(&format!("  Feels like {}\n", feels));
    }
    if !cur.description.is_empty() {
        out.push_str(&format!("  {}\n", cur.description));
    }
    if cur.wind.is_empty() {
        out.push_str(&format!("  Humidity: {}\n", cur.humidity));
    } else {
        out.push_str(&format!("  Humidity: {}   Wind: {}\n", cur.humidity, cur.wind));
    }

    if !s.forecast.is_empty() {
        out.push_str("\n  Forecast:\n");
        let width = s.forecast.iter().map(|d| d.day.chars().count()).max().unwrap_or(0);
        for day in &s.forecast {
            out.push_str(&format!(
                "    {:<width$}  {:<10}  {}\n",
                day.day,
                day.temp,
                day.condition,
                width = width
            ));
        }
    }

    out
}
