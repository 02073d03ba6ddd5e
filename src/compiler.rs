//! Request compilation
//!
//! Turns a normalized slide sequence into two ordered batches of wire
//! operations. Phase 1 only creates slides, carrying pipeline-local
//! symbolic object ids; no text can be inserted yet because the region
//! object ids a layout produces are assigned by the service per page.
//! Phase 2 is compiled after those ids are discovered and populates and
//! styles each region. Guessing region ids instead of discovering them is
//! how decks end up silently empty, hence the strict
//! create → discover → populate split.
//!
//! Ordering invariant: within a batch, a region's text insertion always
//! precedes any style operation against that region. The service errors
//! or no-ops when styling an unpopulated region.

use std::collections::HashMap;

use serde_json::{Value, json};
use tracing::debug;

use crate::deck::Slide;
use crate::layout::{LayoutSpec, Region};
use crate::theme::{Rgb, Theme};

/// Font sizes per region, in the service's point unit
const TITLE_FONT_PT: f64 = 28.0;
const SUBTITLE_FONT_PT: f64 = 16.0;
const BODY_FONT_PT: f64 = 14.0;
const FOOTER_FONT_PT: f64 = 10.0;

/// Single font unit used across every style operation in a batch
const FONT_UNIT: &str = "PT";

/// Line spacing percentage for body text
const BODY_LINE_SPACING: f64 = 115.0;

/// Glyph prefixed to each bullet line in a body region
const BULLET_GLYPH: &str = "\u{2022} ";

/// Reference to the object an operation targets
///
/// Phase-1 operations carry symbolic ids minted by the pipeline; the
/// service echoes them back as the created objects' ids. Phase-2
/// operations only ever target service-assigned ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    /// Pipeline-local id awaiting creation
    Symbolic(String),
    /// Id confirmed by the service
    Assigned(String),
}

impl TargetRef {
    pub fn as_str(&self) -> &str {
        match self {
            TargetRef::Symbolic(id) | TargetRef::Assigned(id) => id,
        }
    }
}

/// Symbolic object id for the slide at `index`
pub fn symbolic_slide_id(index: usize) -> String {
    format!("slide-{index}")
}

/// One wire-protocol instruction
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledOperation {
    CreateSlide {
        target: TargetRef,
        insertion_index: usize,
        layout_tag: &'static str,
    },
    InsertText {
        target: TargetRef,
        text: String,
    },
    UpdateTextStyle {
        target: TargetRef,
        bold: bool,
        font_size_pt: f64,
        color: Rgb,
    },
    UpdateParagraphStyle {
        target: TargetRef,
        line_spacing: f64,
    },
    UpdatePageProperties {
        target: TargetRef,
        background: Rgb,
    },
}

impl CompiledOperation {
    /// Encode this operation in the service's request format
    pub fn to_request(&self) -> Value {
        match self {
            CompiledOperation::CreateSlide {
                target,
                insertion_index,
                layout_tag,
            } => json!({
                "createSlide": {
                    "objectId": target.as_str(),
                    "insertionIndex": insertion_index,
                    "slideLayoutReference": { "predefinedLayout": layout_tag },
                }
            }),
            CompiledOperation::InsertText { target, text } => json!({
                "insertText": {
                    "objectId": target.as_str(),
                    "insertionIndex": 0,
                    "text": text,
                }
            }),
            CompiledOperation::UpdateTextStyle {
                target,
                bold,
                font_size_pt,
                color,
            } => json!({
                "updateTextStyle": {
                    "objectId": target.as_str(),
                    "style": {
                        "bold": bold,
                        "fontSize": { "magnitude": font_size_pt, "unit": FONT_UNIT },
                        "foregroundColor": { "opaqueColor": { "rgbColor": color.to_wire() } },
                    },
                    "textRange": { "type": "ALL" },
                    "fields": "bold,fontSize,foregroundColor",
                }
            }),
            CompiledOperation::UpdateParagraphStyle { target, line_spacing } => json!({
                "updateParagraphStyle": {
                    "objectId": target.as_str(),
                    "style": { "lineSpacing": line_spacing },
                    "textRange": { "type": "ALL" },
                    "fields": "lineSpacing",
                }
            }),
            CompiledOperation::UpdatePageProperties { target, background } => json!({
                "updatePageProperties": {
                    "objectId": target.as_str(),
                    "pageProperties": {
                        "pageBackgroundFill": {
                            "solidFill": { "color": { "rgbColor": background.to_wire() } },
                        },
                    },
                    "fields": "pageBackgroundFill.solidFill.color",
                }
            }),
        }
    }
}

/// Ordered operations submitted to the service together
///
/// Owned by one compilation request; a deck produces exactly one creation
/// batch and one population batch.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    ops: Vec<CompiledOperation>,
}

impl Batch {
    pub fn push(&mut self, op: CompiledOperation) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[CompiledOperation] {
        &self.ops
    }

    /// Wire encoding of the whole batch, preserving order
    pub fn to_requests(&self) -> Vec<Value> {
        self.ops.iter().map(CompiledOperation::to_request).collect()
    }
}

/// Per-slide mapping from region to its service-assigned object id
///
/// Built once from a page read after phase 1, consumed by phase-2
/// compilation, then discarded.
#[derive(Debug, Clone, Default)]
pub struct RegionMap {
    /// Service-assigned id of the page itself
    pub page_id: String,
    regions: HashMap<Region, String>,
}

impl RegionMap {
    pub fn new(page_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            regions: HashMap::new(),
        }
    }

    pub fn insert(&mut self, region: Region, object_id: impl Into<String>) {
        self.regions.insert(region, object_id.into());
    }

    pub fn get(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }
}

/// Compile the creation batch: one create-slide per slide, in order
///
/// The batch carries no text. Insertion indices preserve generator order.
pub fn compile_phase1(slides: &[Slide], layouts: &[LayoutSpec]) -> Batch {
    debug_assert_eq!(slides.len(), layouts.len());
    let mut batch = Batch::default();

    for (index, layout) in layouts.iter().enumerate().take(slides.len()) {
        batch.push(CompiledOperation::CreateSlide {
            target: TargetRef::Symbolic(symbolic_slide_id(index)),
            insertion_index: index,
            layout_tag: layout.tag,
        });
    }

    debug!(ops = batch.len(), "compile_phase1: complete");
    batch
}

/// Compile the population batch against discovered region ids
///
/// Per slide, text insertions come first (title, subtitle, body, footer),
/// then style operations for the populated regions, then the page
/// background fill.
pub fn compile_phase2(
    slides: &[Slide],
    layouts: &[LayoutSpec],
    region_maps: &[RegionMap],
    theme: &Theme,
) -> Batch {
    debug_assert_eq!(slides.len(), region_maps.len());
    let mut batch = Batch::default();

    for ((slide, layout), map) in slides.iter().zip(layouts).zip(region_maps) {
        compile_slide_population(&mut batch, slide, layout, map, theme);
    }

    debug!(ops = batch.len(), "compile_phase2: complete");
    batch
}

fn compile_slide_population(
    batch: &mut Batch,
    slide: &Slide,
    layout: &LayoutSpec,
    map: &RegionMap,
    theme: &Theme,
) {
    // Text content per region, in the fixed population order. A region is
    // only populated if the service actually produced it, regardless of
    // what the layout table promised.
    let mut populated: Vec<(Region, &str)> = Vec::new();

    let mut insert = |batch: &mut Batch, region: Region, text: String| {
        if let Some(object_id) = map.get(region) {
            batch.push(CompiledOperation::InsertText {
                target: TargetRef::Assigned(object_id.to_string()),
                text,
            });
            populated.push((region, object_id));
        } else if layout.has_region(region) {
            debug!(?region, page_id = %map.page_id, "populate: promised region missing from page");
        }
    };

    insert(batch, Region::Title, slide.title.clone());

    if let Some(subtitle) = &slide.subtitle {
        insert(batch, Region::Subtitle, subtitle.clone());
    }

    if !slide.bullets.is_empty() {
        let body = slide
            .bullets
            .iter()
            .map(|b| format!("{BULLET_GLYPH}{b}"))
            .collect::<Vec<_>>()
            .join("\n");
        insert(batch, Region::Body, body);
    }

    if let Some(footer) = &slide.footer_note {
        insert(batch, Region::Footer, footer.clone());
    }

    // Style each populated region; never style before inserting.
    for (region, object_id) in &populated {
        let (bold, font_size_pt, color) = match region {
            Region::Title => (true, TITLE_FONT_PT, theme.title_text),
            Region::Subtitle => (false, SUBTITLE_FONT_PT, theme.body_text),
            Region::Body => (false, BODY_FONT_PT, theme.body_text),
            Region::Footer => (false, FOOTER_FONT_PT, theme.body_text),
        };
        batch.push(CompiledOperation::UpdateTextStyle {
            target: TargetRef::Assigned((*object_id).to_string()),
            bold,
            font_size_pt,
            color,
        });
        if *region == Region::Body {
            batch.push(CompiledOperation::UpdateParagraphStyle {
                target: TargetRef::Assigned((*object_id).to_string()),
                line_spacing: BODY_LINE_SPACING,
            });
        }
    }

    batch.push(CompiledOperation::UpdatePageProperties {
        target: TargetRef::Assigned(map.page_id.clone()),
        background: theme.background,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Slide, SlideKind};
    use crate::layout::select_layout;
    use crate::theme;

    fn sample_slides() -> Vec<Slide> {
        vec![
            Slide {
                kind: SlideKind::Title,
                title: "Q3 Review".to_string(),
                subtitle: Some("Finance".to_string()),
                bullets: vec![],
                footer_note: None,
            },
            Slide::content("Sales", vec!["Up 12%".to_string(), "New markets".to_string()]),
            Slide::content("Costs", vec!["Flat".to_string()]),
        ]
    }

    fn layouts_for(slides: &[Slide]) -> Vec<LayoutSpec> {
        slides.iter().map(|s| select_layout(s.kind)).collect()
    }

    fn region_maps_for(slides: &[Slide], layouts: &[LayoutSpec]) -> Vec<RegionMap> {
        slides
            .iter()
            .zip(layouts)
            .enumerate()
            .map(|(i, (_, layout))| {
                let mut map = RegionMap::new(format!("page-{i}"));
                for region in layout.regions {
                    map.insert(*region, format!("el-{i}-{region:?}"));
                }
                map
            })
            .collect()
    }

    #[test]
    fn test_phase1_creates_one_op_per_slide_with_no_text() {
        let slides = sample_slides();
        let layouts = layouts_for(&slides);
        let batch = compile_phase1(&slides, &layouts);

        assert_eq!(batch.len(), 3);
        for (i, op) in batch.ops().iter().enumerate() {
            match op {
                CompiledOperation::CreateSlide {
                    target,
                    insertion_index,
                    ..
                } => {
                    assert_eq!(*insertion_index, i);
                    assert_eq!(target.as_str(), symbolic_slide_id(i));
                }
                other => panic!("phase 1 must only create slides, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_phase1_wire_shape() {
        let slides = sample_slides();
        let layouts = layouts_for(&slides);
        let requests = compile_phase1(&slides, &layouts).to_requests();

        assert_eq!(requests[0]["createSlide"]["objectId"], "slide-0");
        assert_eq!(requests[0]["createSlide"]["insertionIndex"], 0);
        assert_eq!(
            requests[0]["createSlide"]["slideLayoutReference"]["predefinedLayout"],
            "TITLE"
        );
        assert_eq!(
            requests[1]["createSlide"]["slideLayoutReference"]["predefinedLayout"],
            "TITLE_AND_BODY"
        );
    }

    #[test]
    fn test_phase2_text_precedes_style_per_region() {
        let slides = sample_slides();
        let layouts = layouts_for(&slides);
        let maps = region_maps_for(&slides, &layouts);
        let theme = theme::resolve("corporate");

        let batch = compile_phase2(&slides, &layouts, &maps, theme);

        let mut insert_index: HashMap<String, usize> = HashMap::new();
        for (i, op) in batch.ops().iter().enumerate() {
            match op {
                CompiledOperation::InsertText { target, .. } => {
                    insert_index.insert(target.as_str().to_string(), i);
                }
                CompiledOperation::UpdateTextStyle { target, .. }
                | CompiledOperation::UpdateParagraphStyle { target, .. } => {
                    let inserted_at = insert_index
                        .get(target.as_str())
                        .unwrap_or_else(|| panic!("styled region {} was never populated", target.as_str()));
                    assert!(*inserted_at < i, "style at {i} precedes insert at {inserted_at}");
                }
                CompiledOperation::UpdatePageProperties { .. } => {}
                CompiledOperation::CreateSlide { .. } => panic!("phase 2 must not create slides"),
            }
        }
    }

    #[test]
    fn test_phase2_body_text_joins_bullets_with_glyph() {
        let slides = sample_slides();
        let layouts = layouts_for(&slides);
        let maps = region_maps_for(&slides, &layouts);
        let theme = theme::resolve("minimal");

        let batch = compile_phase2(&slides, &layouts, &maps, theme);
        let body = batch
            .ops()
            .iter()
            .find_map(|op| match op {
                CompiledOperation::InsertText { target, text } if target.as_str() == "el-1-Body" => Some(text),
                _ => None,
            })
            .expect("body text op for slide 1");

        assert_eq!(body, "\u{2022} Up 12%\n\u{2022} New markets");
    }

    #[test]
    fn test_phase2_sets_page_background_per_slide() {
        let slides = sample_slides();
        let layouts = layouts_for(&slides);
        let maps = region_maps_for(&slides, &layouts);
        let theme = theme::resolve("dark");

        let batch = compile_phase2(&slides, &layouts, &maps, theme);
        let backgrounds: Vec<_> = batch
            .ops()
            .iter()
            .filter_map(|op| match op {
                CompiledOperation::UpdatePageProperties { target, background } => Some((target, background)),
                _ => None,
            })
            .collect();

        assert_eq!(backgrounds.len(), 3);
        assert_eq!(backgrounds[0].0.as_str(), "page-0");
        assert_eq!(*backgrounds[0].1, theme.background);
    }

    #[test]
    fn test_phase2_skips_regions_the_service_did_not_produce() {
        let slides = sample_slides();
        let layouts = layouts_for(&slides);
        let theme = theme::resolve("corporate");

        // Slide 0's page came back with only a title placeholder.
        let mut maps = region_maps_for(&slides, &layouts);
        maps[0] = RegionMap::new("page-0");
        maps[0].insert(Region::Title, "el-0-only-title");

        let batch = compile_phase2(&slides, &layouts, &maps, theme);
        assert!(!batch.ops().iter().any(|op| matches!(
            op,
            CompiledOperation::InsertText { target, .. } if target.as_str().contains("Subtitle")
        )));
    }

    #[test]
    fn test_phase2_skips_subtitle_when_slide_has_none() {
        let slides = vec![Slide::title("No subtitle here")];
        let layouts = layouts_for(&slides);
        let maps = region_maps_for(&slides, &layouts);
        let theme = theme::resolve("corporate");

        let batch = compile_phase2(&slides, &layouts, &maps, theme);
        let inserts = batch
            .ops()
            .iter()
            .filter(|op| matches!(op, CompiledOperation::InsertText { .. }))
            .count();
        assert_eq!(inserts, 1);
    }

    #[test]
    fn test_style_wire_shape_uses_point_unit() {
        let op = CompiledOperation::UpdateTextStyle {
            target: TargetRef::Assigned("el-1".to_string()),
            bold: true,
            font_size_pt: TITLE_FONT_PT,
            color: theme::resolve("corporate").title_text,
        };
        let wire = op.to_request();
        assert_eq!(wire["updateTextStyle"]["style"]["fontSize"]["unit"], "PT");
        assert_eq!(wire["updateTextStyle"]["style"]["bold"], true);
        assert_eq!(wire["updateTextStyle"]["textRange"]["type"], "ALL");
    }
}
