//! Deck pipeline
//!
//! Ties the stages together: generate an outline, normalize it into
//! typed slides, compile the two batch phases, and execute them. Stage
//! failures degrade rather than abort wherever the service state allows
//! it; only an unusable fallback title is fatal.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::compiler::{compile_phase1, compile_phase2};
use crate::deck::{DeckOutcome, DeckStatus};
use crate::executor::BatchExecutor;
use crate::generator::OutlineGenerator;
use crate::layout::select_layout;
use crate::outline::{NormalizeOptions, RawOutline, normalize};
use crate::service::SlidesService;
use crate::theme;

/// One request to build a deck
#[derive(Debug, Clone)]
pub struct DeckRequest {
    pub title: String,
    pub topic: String,
    pub slide_count: usize,
    pub theme_id: String,
}

/// The full compilation pipeline
pub struct DeckPipeline {
    generator: Arc<dyn OutlineGenerator>,
    executor: BatchExecutor,
    options: NormalizeOptions,
}

impl DeckPipeline {
    pub fn new(
        generator: Arc<dyn OutlineGenerator>,
        service: Arc<dyn SlidesService>,
        options: NormalizeOptions,
    ) -> Self {
        Self {
            generator,
            executor: BatchExecutor::new(service),
            options,
        }
    }

    /// Compile and execute one deck request
    ///
    /// Returns `Err` only when the request itself is unusable (an empty
    /// title). Every downstream failure is reported through the outcome
    /// status instead, with the deck id attached once the presentation
    /// exists.
    pub async fn compile_and_execute(&self, request: &DeckRequest) -> eyre::Result<DeckOutcome> {
        debug!(title = %request.title, slide_count = request.slide_count, "compile_and_execute: called");

        let raw = match self
            .generator
            .generate(&request.title, &request.topic, request.slide_count)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "compile_and_execute: generator failed, using fallback outline");
                RawOutline::Text(String::new())
            }
        };

        let slides = normalize(&raw, request.slide_count, &request.title, &self.options)?;
        let layouts: Vec<_> = slides.iter().map(|s| select_layout(s.kind)).collect();
        let theme = theme::resolve(&request.theme_id);
        info!(slide_count = slides.len(), theme = theme.id, "compile_and_execute: outline normalized");

        let presentation_id = match self.executor.create_presentation(&request.title).await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "compile_and_execute: presentation creation failed");
                return Ok(DeckOutcome {
                    deck_id: None,
                    status: DeckStatus::Failure,
                });
            }
        };

        let creation = compile_phase1(&slides, &layouts);
        let slide_ids = match self.executor.run_creation(&presentation_id, &creation).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "compile_and_execute: creation batch failed");
                return Ok(DeckOutcome {
                    deck_id: None,
                    status: DeckStatus::Failure,
                });
            }
        };

        let region_maps = match self.executor.resolve_regions(&presentation_id, &slide_ids).await {
            Ok(maps) => maps,
            Err(e) => {
                warn!(error = %e, "compile_and_execute: region discovery failed");
                return Ok(DeckOutcome {
                    deck_id: Some(presentation_id),
                    status: DeckStatus::Partial,
                });
            }
        };

        let population = compile_phase2(&slides, &layouts, &region_maps, theme);
        if let Err(e) = self.executor.run_population(&presentation_id, &population).await {
            warn!(error = %e, "compile_and_execute: population batch failed");
            return Ok(DeckOutcome {
                deck_id: Some(presentation_id),
                status: DeckStatus::Partial,
            });
        }

        info!(deck_id = %presentation_id, "compile_and_execute: deck complete");
        Ok(DeckOutcome {
            deck_id: Some(presentation_id),
            status: DeckStatus::Success,
        })
    }
}
