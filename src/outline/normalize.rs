//! Normalization of outline entries into the canonical slide model
//!
//! Two entry shapes are accepted, because the generator's calling
//! convention varies by revision:
//!
//! - `{"type": ..., "title": ..., "content": [...]}` (current shape)
//! - `{"type": ..., "main_points": [title, bullet, ...]}` (legacy shape)
//!
//! Both fold into the same `Slide`. Malformed input never errors: the
//! worst case is a deterministic two-slide fallback deck. The only fatal
//! condition is an empty fallback title, which is a configuration error
//! on the caller's side.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{RawOutline, repair::repair_and_parse};
use crate::deck::{Slide, SlideKind};

/// Normalization failures
///
/// Deliberately tiny: bad generator output is repaired or replaced, never
/// surfaced. Only caller misconfiguration is fatal.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("fallback title must not be empty")]
    EmptyFallbackTitle,
}

/// Policy knobs for normalization
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Keep Agenda-kind slides in the deck (drop them when false)
    pub keep_agenda: bool,
    /// Pad or truncate the result to the requested slide count
    pub enforce_count: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            keep_agenda: true,
            enforce_count: false,
        }
    }
}

/// Normalize raw generator output into an ordered slide sequence
///
/// Guarantees on success: at least one slide; slide 0 has `kind = Title`
/// and `title = fallback_title` verbatim; every slide has a non-empty
/// title.
pub fn normalize(
    raw: &RawOutline,
    requested_count: usize,
    fallback_title: &str,
    options: &NormalizeOptions,
) -> Result<Vec<Slide>, NormalizeError> {
    if fallback_title.trim().is_empty() {
        return Err(NormalizeError::EmptyFallbackTitle);
    }

    let entries = match raw {
        RawOutline::Structured(entries) if !entries.is_empty() => Some(entries.clone()),
        RawOutline::Structured(_) => None,
        RawOutline::Text(text) => repair_and_parse(text),
    };

    let Some(entries) = entries else {
        warn!("normalize: outline unusable, emitting fallback deck");
        return Ok(fallback_deck(fallback_title));
    };

    let mut slides: Vec<Slide> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| coerce_entry(entry, index))
        .collect();

    // The caller's requested title always wins over whatever the generator
    // produced for the opening slide.
    slides[0].kind = SlideKind::Title;
    slides[0].title = fallback_title.to_string();
    slides[0].bullets.clear();

    if !options.keep_agenda {
        let before = slides.len();
        slides.retain(|s| s.kind != SlideKind::Agenda);
        if slides.len() != before {
            debug!(dropped = before - slides.len(), "normalize: dropped agenda slides");
        }
    }

    if options.enforce_count && requested_count > 0 {
        enforce_count(&mut slides, requested_count);
    }

    debug!(slide_count = slides.len(), "normalize: complete");
    Ok(slides)
}

/// Truncate or pad the sequence to exactly `count` slides
fn enforce_count(slides: &mut Vec<Slide>, count: usize) {
    if slides.len() > count {
        slides.truncate(count.max(1));
    }
    while slides.len() < count {
        let title = Slide::placeholder_title(slides.len());
        slides.push(Slide::content(title, Vec::new()));
    }
}

/// The deterministic deck emitted when the outline is beyond repair
fn fallback_deck(fallback_title: &str) -> Vec<Slide> {
    vec![
        Slide::title(fallback_title),
        Slide::content(
            "Content unavailable",
            vec![
                "The outline generator did not return a usable outline.".to_string(),
                "Please try generating this presentation again.".to_string(),
            ],
        ),
    ]
}

/// Coerce one parsed entry into a Slide
fn coerce_entry(entry: &Value, index: usize) -> Slide {
    let kind = entry
        .get("type")
        .or_else(|| entry.get("kind"))
        .and_then(Value::as_str)
        .map(SlideKind::from_label)
        .unwrap_or(SlideKind::Content);

    let (title, bullets) = if let Some(points) = entry.get("main_points").and_then(Value::as_array) {
        coerce_main_points(points)
    } else {
        (title_of(entry), bullets_of(entry))
    };

    let title = match title {
        Some(t) if !t.trim().is_empty() => t,
        _ => Slide::placeholder_title(index),
    };

    Slide {
        kind,
        title,
        subtitle: string_field(entry, &["subtitle"]),
        bullets,
        footer_note: string_field(entry, &["footer_note", "footer"]),
    }
}

/// Legacy shape: first element is the title, the rest are bullets
fn coerce_main_points(points: &[Value]) -> (Option<String>, Vec<String>) {
    let mut strings = points.iter().filter_map(Value::as_str);
    let title = strings.next().map(str::to_string);
    let bullets = strings.map(str::to_string).collect();
    (title, bullets)
}

fn title_of(entry: &Value) -> Option<String> {
    string_field(entry, &["title", "heading"])
}

fn bullets_of(entry: &Value) -> Vec<String> {
    let content = entry.get("content").or_else(|| entry.get("bullets"));
    match content {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        // A single string is accepted as one bullet
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn string_field(entry: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| entry.get(k).and_then(Value::as_str))
        .map(str::to_string)
        .find(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn opts() -> NormalizeOptions {
        NormalizeOptions::default()
    }

    #[test]
    fn test_well_formed_outline_preserves_length_and_forces_title() {
        let raw = RawOutline::Structured(vec![
            json!({"type": "TITLE", "title": "Generated title"}),
            json!({"type": "CONTENT", "title": "Point one", "content": ["a", "b"]}),
            json!({"type": "SUMMARY", "title": "Wrap up", "content": ["done"]}),
        ]);

        let slides = normalize(&raw, 3, "Q3 Review", &opts()).unwrap();
        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0].kind, SlideKind::Title);
        assert_eq!(slides[0].title, "Q3 Review");
        assert_eq!(slides[1].bullets, vec!["a", "b"]);
        assert_eq!(slides[2].kind, SlideKind::Summary);
    }

    #[test]
    fn test_legacy_main_points_shape() {
        let raw = RawOutline::Structured(vec![
            json!({"type": "TITLE", "main_points": ["Q3 Update"]}),
            json!({"type": "BODY", "main_points": ["Sales", "Up 12%", "New markets"]}),
        ]);

        let slides = normalize(&raw, 2, "Q3 Review", &opts()).unwrap();
        assert_eq!(slides[0].kind, SlideKind::Title);
        assert_eq!(slides[0].title, "Q3 Review");
        assert_eq!(slides[1].kind, SlideKind::Content);
        assert_eq!(slides[1].title, "Sales");
        assert_eq!(slides[1].bullets, vec!["Up 12%", "New markets"]);
    }

    #[test]
    fn test_unparseable_text_yields_two_slide_fallback() {
        let raw = RawOutline::Text("not json at all".to_string());
        let slides = normalize(&raw, 5, "My Deck", &opts()).unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].kind, SlideKind::Title);
        assert_eq!(slides[0].title, "My Deck");
        assert_eq!(slides[1].kind, SlideKind::Content);
        assert!(!slides[1].bullets.is_empty());
    }

    #[test]
    fn test_empty_structured_outline_yields_fallback() {
        let raw = RawOutline::Structured(vec![]);
        let slides = normalize(&raw, 5, "My Deck", &opts()).unwrap();
        assert_eq!(slides.len(), 2);
    }

    #[test]
    fn test_missing_titles_get_positional_placeholders() {
        let raw = RawOutline::Structured(vec![
            json!({"title": "ignored by title override"}),
            json!({"content": ["no title here"]}),
            json!(42),
        ]);

        let slides = normalize(&raw, 3, "Deck", &opts()).unwrap();
        assert_eq!(slides[1].title, "Slide 2");
        assert_eq!(slides[2].title, "Slide 3");
    }

    #[test]
    fn test_empty_fallback_title_is_fatal() {
        let raw = RawOutline::Structured(vec![json!({"title": "A"})]);
        assert!(matches!(
            normalize(&raw, 1, "", &opts()),
            Err(NormalizeError::EmptyFallbackTitle)
        ));
        assert!(matches!(
            normalize(&raw, 1, "   ", &opts()),
            Err(NormalizeError::EmptyFallbackTitle)
        ));
    }

    #[test]
    fn test_agenda_slides_dropped_when_configured() {
        let raw = RawOutline::Structured(vec![
            json!({"type": "TITLE", "title": "T"}),
            json!({"type": "AGENDA", "title": "Agenda", "content": ["a"]}),
            json!({"type": "CONTENT", "title": "C"}),
        ]);

        let kept = normalize(&raw, 3, "Deck", &opts()).unwrap();
        assert_eq!(kept.len(), 3);

        let options = NormalizeOptions { keep_agenda: false, ..opts() };
        let dropped = normalize(&raw, 3, "Deck", &options).unwrap();
        assert_eq!(dropped.len(), 2);
        assert!(dropped.iter().all(|s| s.kind != SlideKind::Agenda));
    }

    #[test]
    fn test_enforce_count_pads_and_truncates() {
        let raw = RawOutline::Structured(vec![
            json!({"title": "A"}),
            json!({"title": "B"}),
        ]);
        let options = NormalizeOptions { enforce_count: true, ..opts() };

        let padded = normalize(&raw, 4, "Deck", &options).unwrap();
        assert_eq!(padded.len(), 4);
        assert_eq!(padded[3].title, "Slide 4");

        let truncated = normalize(&raw, 1, "Deck", &options).unwrap();
        assert_eq!(truncated.len(), 1);
        assert_eq!(truncated[0].kind, SlideKind::Title);
    }

    #[test]
    fn test_subtitle_and_footer_fields() {
        let raw = RawOutline::Structured(vec![
            json!({"type": "TITLE", "title": "T"}),
            json!({"type": "CLOSING", "title": "Thanks", "subtitle": "Questions?", "footer": "contact@example.com"}),
        ]);

        let slides = normalize(&raw, 2, "Deck", &opts()).unwrap();
        assert_eq!(slides[1].subtitle.as_deref(), Some("Questions?"));
        assert_eq!(slides[1].footer_note.as_deref(), Some("contact@example.com"));
    }

    #[test]
    fn test_raw_text_outline_end_to_end() {
        let raw = RawOutline::Text(
            "```json\n[{\"type\": \"TITLE\", \"main_points\": [\"X\"]}, {\"title\": \"Plan\", \"content\": [\"step 1\"]},]\n```"
                .to_string(),
        );
        let slides = normalize(&raw, 2, "Roadmap", &opts()).unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title, "Roadmap");
        assert_eq!(slides[1].bullets, vec!["step 1"]);
    }

    proptest! {
        #[test]
        fn prop_structured_outline_length_preserved(titles in proptest::collection::vec("[a-zA-Z0-9 ]{1,20}", 1..12)) {
            let entries: Vec<_> = titles
                .iter()
                .map(|t| json!({"type": "CONTENT", "title": t, "content": ["x"]}))
                .collect();
            let raw = RawOutline::Structured(entries);

            let slides = normalize(&raw, titles.len(), "Fallback", &opts()).unwrap();
            prop_assert_eq!(slides.len(), titles.len());
            prop_assert_eq!(slides[0].kind, SlideKind::Title);
            prop_assert_eq!(slides[0].title.as_str(), "Fallback");
            prop_assert!(slides.iter().all(|s| !s.title.trim().is_empty()));
        }
    }
}
