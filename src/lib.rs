//! Slidesmith - Deck Compilation Pipeline
//!
//! Slidesmith turns untrusted LLM-generated slide outlines into presentation
//! decks through a fixed sequence of stages. Malformed input never aborts a
//! run; every stage degrades to something presentable and the outcome status
//! reports how far execution got.
//!
//! # Pipeline
//!
//! - **Generate**: ask an outline generator for a raw outline
//! - **Repair + normalize**: salvage the raw text into typed [`deck::Slide`]s
//! - **Compile**: produce two batches of wire operations (create, populate)
//! - **Execute**: run the batches with a region-discovery read in between
//!
//! # Modules
//!
//! - [`outline`] - JSON repair and outline normalization
//! - [`deck`] - Slide and outcome types
//! - [`theme`] - Color presets and resolution
//! - [`layout`] - Layout selection and placeholder regions
//! - [`compiler`] - Two-phase batch compilation
//! - [`service`] - Authoring-service trait and HTTP client
//! - [`executor`] - Batch execution against the service
//! - [`pipeline`] - End-to-end orchestration
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod compiler;
pub mod config;
pub mod deck;
pub mod executor;
pub mod generator;
pub mod layout;
pub mod outline;
pub mod pipeline;
pub mod service;
pub mod theme;

// Re-export commonly used types
pub use compiler::{Batch, CompiledOperation, RegionMap, TargetRef};
pub use config::{Config, GeneratorConfig, PipelineConfig, SlidesConfig};
pub use deck::{DeckOutcome, DeckStatus, Slide, SlideKind};
pub use executor::BatchExecutor;
pub use generator::{ChatOutlineGenerator, GeneratorError, OutlineGenerator};
pub use layout::{LayoutSpec, Region, select_layout};
pub use outline::{NormalizeError, NormalizeOptions, RawOutline, normalize};
pub use pipeline::{DeckPipeline, DeckRequest};
pub use service::{BatchReply, HttpSlidesService, Page, ServiceError, SlidesService};
pub use theme::{Rgb, Theme, ThemeChoice};
