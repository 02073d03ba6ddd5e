//! Core deck domain types
//!
//! A `Slide` is the normalized unit everything downstream of the
//! normalizer operates on. Nothing after normalization is shape-polymorphic:
//! whatever the generator produced has been folded into these types.

use serde::{Deserialize, Serialize};

/// Semantic kind of a slide, driving layout selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlideKind {
    Title,
    Agenda,
    Content,
    Summary,
    Closing,
}

impl SlideKind {
    /// Parse a generator-supplied kind label
    ///
    /// Unrecognized labels map to `Content` rather than failing; the
    /// generator's vocabulary drifts between revisions.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "TITLE" => SlideKind::Title,
            "AGENDA" => SlideKind::Agenda,
            "SUMMARY" => SlideKind::Summary,
            "CLOSING" | "OUTRO" | "THANKS" => SlideKind::Closing,
            _ => SlideKind::Content,
        }
    }
}

/// One normalized page of a deck
///
/// Invariant: `title` is non-empty after normalization (a missing title is
/// replaced by a positional placeholder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub kind: SlideKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub bullets: Vec<String>,
    pub footer_note: Option<String>,
}

impl Slide {
    /// Create a content slide with a title and bullets
    pub fn content(title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            kind: SlideKind::Content,
            title: title.into(),
            subtitle: None,
            bullets,
            footer_note: None,
        }
    }

    /// Create a title slide
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            kind: SlideKind::Title,
            title: title.into(),
            subtitle: None,
            bullets: Vec::new(),
            footer_note: None,
        }
    }

    /// Deterministic placeholder title for the slide at `index` (0-based)
    pub fn placeholder_title(index: usize) -> String {
        format!("Slide {}", index + 1)
    }
}

/// Outcome status of one compilation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckStatus {
    /// Both phases applied; the deck is fully populated
    Success,
    /// The deck exists but population failed; text may be missing
    Partial,
    /// No usable deck was created
    Failure,
}

/// Result of `compile_and_execute`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckOutcome {
    /// Service-assigned presentation identifier, present for Success and Partial
    pub deck_id: Option<String>,
    pub status: DeckStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_label_known() {
        assert_eq!(SlideKind::from_label("TITLE"), SlideKind::Title);
        assert_eq!(SlideKind::from_label("agenda"), SlideKind::Agenda);
        assert_eq!(SlideKind::from_label(" Summary "), SlideKind::Summary);
        assert_eq!(SlideKind::from_label("closing"), SlideKind::Closing);
    }

    #[test]
    fn test_kind_from_label_unknown_is_content() {
        assert_eq!(SlideKind::from_label("BODY"), SlideKind::Content);
        assert_eq!(SlideKind::from_label("banana"), SlideKind::Content);
        assert_eq!(SlideKind::from_label(""), SlideKind::Content);
    }

    #[test]
    fn test_placeholder_title_is_one_based() {
        assert_eq!(Slide::placeholder_title(0), "Slide 1");
        assert_eq!(Slide::placeholder_title(4), "Slide 5");
    }
}
