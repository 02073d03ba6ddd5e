//! Presentation-authoring service interface
//!
//! The remote service speaks a request/reply batch-update protocol keyed
//! by presentation id. Replies echo service-assigned object ids in the
//! same order as the corresponding requests; a separate page read returns
//! the elements (and their placeholder region types) belonging to one
//! slide. The trait keeps the pipeline testable against in-memory fakes.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

mod error;
mod http;

pub use error::ServiceError;
pub use http::HttpSlidesService;

/// Ordered per-operation replies from one batch update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchReply {
    #[serde(default)]
    pub replies: Vec<Value>,
}

impl BatchReply {
    /// Extract the created object id from the reply at `index`
    ///
    /// Only create-slide replies carry an object id; other operations
    /// reply with an empty object.
    pub fn created_object_id(&self, index: usize) -> Option<&str> {
        self.replies
            .get(index)?
            .get("createSlide")?
            .get("objectId")?
            .as_str()
    }
}

/// One element on a page, as returned by a page read
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageElement {
    pub object_id: String,
    #[serde(default)]
    pub shape: Option<Shape>,
}

impl PageElement {
    /// The placeholder region type this element declares, if any
    pub fn placeholder_type(&self) -> Option<&str> {
        self.shape
            .as_ref()?
            .placeholder
            .as_ref()
            .map(|p| p.placeholder_type.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Shape {
    #[serde(default)]
    pub placeholder: Option<Placeholder>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Placeholder {
    #[serde(rename = "type")]
    pub placeholder_type: String,
}

/// One slide page, as returned by a page read
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub page_elements: Vec<PageElement>,
}

/// The authoring-service surface the pipeline consumes
#[async_trait]
pub trait SlidesService: Send + Sync {
    /// Create an empty presentation, returning its service-assigned id
    async fn create_presentation(&self, title: &str) -> Result<String, ServiceError>;

    /// Submit an ordered batch of operations against a presentation
    ///
    /// Not idempotent: resubmitting a creation batch creates additional
    /// slides. Callers must not retry this on their own.
    async fn batch_update(&self, presentation_id: &str, requests: &[Value]) -> Result<BatchReply, ServiceError>;

    /// Read one page of a presentation, including its placeholder elements
    async fn get_page(&self, presentation_id: &str, page_id: &str) -> Result<Page, ServiceError>;
}
