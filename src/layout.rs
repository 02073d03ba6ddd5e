//! Layout selection
//!
//! Maps each slide kind to a layout tag the authoring service recognizes
//! and the set of named regions that layout is guaranteed to expose.
//! Which object ids those regions actually get is service-assigned and
//! only discoverable after slide creation; this table only declares what
//! the template promises.

use crate::deck::SlideKind;

/// A named placeholder area within a slide's layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Title,
    Subtitle,
    Body,
    Footer,
}

impl Region {
    /// Map a service-declared placeholder type to a region
    ///
    /// Returns `None` for placeholder types the pipeline never populates
    /// (slide numbers, pictures, and so on).
    pub fn from_placeholder_type(placeholder_type: &str) -> Option<Self> {
        match placeholder_type {
            "TITLE" | "CENTERED_TITLE" => Some(Region::Title),
            "SUBTITLE" => Some(Region::Subtitle),
            "BODY" => Some(Region::Body),
            "FOOTER" => Some(Region::Footer),
            _ => None,
        }
    }
}

/// Layout tag plus the regions that layout exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSpec {
    pub tag: &'static str,
    pub regions: &'static [Region],
}

impl LayoutSpec {
    pub fn has_region(&self, region: Region) -> bool {
        self.regions.contains(&region)
    }
}

const TITLE_LAYOUT: LayoutSpec = LayoutSpec {
    tag: "TITLE",
    regions: &[Region::Title, Region::Subtitle],
};

const BODY_LAYOUT: LayoutSpec = LayoutSpec {
    tag: "TITLE_AND_BODY",
    regions: &[Region::Title, Region::Body],
};

const CLOSING_LAYOUT: LayoutSpec = LayoutSpec {
    tag: "SECTION_HEADER",
    regions: &[Region::Title, Region::Subtitle, Region::Footer],
};

/// Select the layout for a slide kind
///
/// Total over `SlideKind`; every layout exposes at least a Title region.
pub fn select_layout(kind: SlideKind) -> LayoutSpec {
    match kind {
        SlideKind::Title => TITLE_LAYOUT,
        SlideKind::Agenda | SlideKind::Content | SlideKind::Summary => BODY_LAYOUT,
        SlideKind::Closing => CLOSING_LAYOUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [SlideKind; 5] = [
        SlideKind::Title,
        SlideKind::Agenda,
        SlideKind::Content,
        SlideKind::Summary,
        SlideKind::Closing,
    ];

    #[test]
    fn test_select_layout_is_total_with_title_region() {
        for kind in ALL_KINDS {
            let spec = select_layout(kind);
            assert!(
                spec.has_region(Region::Title),
                "{kind:?} layout must expose a Title region"
            );
            assert!(!spec.tag.is_empty());
        }
    }

    #[test]
    fn test_layout_table() {
        assert_eq!(select_layout(SlideKind::Title).tag, "TITLE");
        assert!(select_layout(SlideKind::Title).has_region(Region::Subtitle));

        assert_eq!(select_layout(SlideKind::Content).tag, "TITLE_AND_BODY");
        assert!(select_layout(SlideKind::Agenda).has_region(Region::Body));
        assert!(select_layout(SlideKind::Summary).has_region(Region::Body));

        let closing = select_layout(SlideKind::Closing);
        assert_eq!(closing.tag, "SECTION_HEADER");
        assert!(closing.has_region(Region::Footer));
    }

    #[test]
    fn test_placeholder_type_mapping() {
        assert_eq!(Region::from_placeholder_type("TITLE"), Some(Region::Title));
        assert_eq!(Region::from_placeholder_type("CENTERED_TITLE"), Some(Region::Title));
        assert_eq!(Region::from_placeholder_type("SUBTITLE"), Some(Region::Subtitle));
        assert_eq!(Region::from_placeholder_type("BODY"), Some(Region::Body));
        assert_eq!(Region::from_placeholder_type("FOOTER"), Some(Region::Footer));
        assert_eq!(Region::from_placeholder_type("SLIDE_NUMBER"), None);
        assert_eq!(Region::from_placeholder_type("PICTURE"), None);
    }
}
