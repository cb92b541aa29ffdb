//! Rendering/DOM collaborator
//!
//! The collection engine only talks to the page through [`DomDriver`]. Every
//! read is immediate; waiting is layered on top in [`polling`], which turns
//! "not there yet" into a definite negative value after a bounded timeout.
//!
//! Handles are re-resolved by the driver on every call. A handle obtained
//! before a reload may stop resolving, which surfaces as
//! [`DomError::StaleHandle`] rather than a stale read.

pub mod chromium;
pub mod js_scripts;
pub mod page_helpers;
pub mod page_timeout;
pub mod polling;

pub use chromium::{ChromiumDriver, ElementPath};
pub use page_timeout::with_page_timeout;
pub use polling::PollSettings;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

/// Failures of the rendering collaborator
///
/// Only [`DomError::Disconnected`] is fatal for a collection session. The rest
/// are local to the step that hit them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomError {
    /// The browser or its DevTools connection is gone
    #[error("Browser connection lost: {0}")]
    Disconnected(String),

    /// A handle no longer resolves to a live element
    #[error("Element handle no longer resolves: {0}")]
    StaleHandle(String),

    /// Script evaluation raised or returned an unexpected shape
    #[error("Script evaluation failed: {0}")]
    Script(String),

    /// Any other DevTools protocol failure
    #[error("DevTools protocol error: {0}")]
    Protocol(String),

    /// A bounded browser operation did not finish in time
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },
}

impl DomError {
    /// Whether the error means the collaborator is unreachable
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Disconnected(_))
    }
}

pub type DomResult<T> = Result<T, DomError>;

/// Minimum capability set the collection engine needs from a page
#[async_trait]
pub trait DomDriver: Send + Sync {
    /// Opaque, cheap-to-clone reference to an element
    type Handle: Clone + Send + Sync + Debug;

    /// Navigate to `url` and wait for the load to finish
    async fn open(&self, url: &str) -> DomResult<()>;

    /// All elements matching `selector`, in document order. Never waits.
    async fn query_all(&self, selector: &str) -> DomResult<Vec<Self::Handle>>;

    /// Elements matching `selector` inside `parent`, in document order
    async fn query_within(
        &self,
        parent: &Self::Handle,
        selector: &str,
    ) -> DomResult<Vec<Self::Handle>>;

    /// Rendered text of the element; `None` when it has none
    async fn text(&self, handle: &Self::Handle) -> DomResult<Option<String>>;

    async fn attribute(&self, handle: &Self::Handle, name: &str) -> DomResult<Option<String>>;

    async fn is_visible(&self, handle: &Self::Handle) -> DomResult<bool>;

    async fn click(&self, handle: &Self::Handle) -> DomResult<()>;

    /// Script-driven click for targets whose native click is intercepted
    async fn js_click(&self, handle: &Self::Handle) -> DomResult<()>;

    async fn scroll_into_view(&self, handle: &Self::Handle) -> DomResult<()>;

    async fn scroll_to_bottom(&self) -> DomResult<()>;

    async fn scroll_to_top(&self) -> DomResult<()>;

    async fn document_height(&self) -> DomResult<i64>;

    async fn current_location(&self) -> DomResult<String>;

    /// Escape hatch: evaluate `source` as a function body receiving `args`
    async fn run_script(&self, source: &str, args: Vec<Value>) -> DomResult<Value>;
}
