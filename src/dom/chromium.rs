//! Chrome DevTools implementation of [`DomDriver`]
//!
//! Handles are [`ElementPath`]s: the chain of `(selector, index)` steps that
//! located the element. Every operation re-resolves the path inside the page,
//! so nothing holds a remote object reference across waits or reloads.

use async_trait::async_trait;
use chromiumoxide_cdp::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::layout::Point;
use chromiumoxide::page::Page;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::js_scripts::{
    COUNT_WITHIN, DOCUMENT_HEIGHT, ELEMENT_ATTRIBUTE, ELEMENT_CLICK_POINT, ELEMENT_JS_CLICK,
    ELEMENT_SCROLL_INTO_VIEW, ELEMENT_TEXT, ELEMENT_VISIBLE, READY_STATE, SCROLL_TO_BOTTOM,
    SCROLL_TO_TOP, count_in_document, element_operation, user_script,
};
use super::page_helpers::{classify_cdp_error, get_page_url_with_fallback};
use super::page_timeout::with_page_timeout;
use super::polling::{PollSettings, wait_until};
use super::{DomDriver, DomError, DomResult};

/// Timeout for a single script evaluation or input event
const OPERATION_TIMEOUT: Duration = Duration::from_secs(15);

/// One step of an element path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathStep {
    pub selector: String,
    pub index: usize,
}

/// Re-resolvable reference to an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ElementPath {
    steps: Vec<PathStep>,
}

impl ElementPath {
    #[must_use]
    pub fn root(selector: &str, index: usize) -> Self {
        Self {
            steps: vec![PathStep {
                selector: selector.to_string(),
                index,
            }],
        }
    }

    #[must_use]
    pub fn child(&self, selector: &str, index: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(PathStep {
            selector: selector.to_string(),
            index,
        });
        Self { steps }
    }

    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    fn to_json(&self) -> String {
        serde_json::to_string(&self.steps).unwrap_or_else(|_| "[]".to_string())
    }

    fn describe(&self) -> String {
        self.steps
            .iter()
            .map(|step| format!("{}[{}]", step.selector, step.index))
            .collect::<Vec<_>>()
            .join(" >> ")
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    stale: bool,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct ClickPoint {
    x: f64,
    y: f64,
}

/// [`DomDriver`] over one chromiumoxide [`Page`]
pub struct ChromiumDriver {
    page: Page,
    load_timeout: Duration,
}

impl ChromiumDriver {
    #[must_use]
    pub fn new(page: Page, load_timeout: Duration) -> Self {
        Self { page, load_timeout }
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Fix the viewport to 1920x1080 so listing layouts render their desktop
    /// variant
    pub async fn set_desktop_viewport(&self) -> DomResult<()> {
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(1920)
            .height(1080)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(DomError::Protocol)?;
        self.page
            .execute(params)
            .await
            .map_err(|e| classify_cdp_error(&e))?;
        Ok(())
    }

    async fn evaluate(&self, script: String, operation: &str) -> DomResult<Envelope> {
        let result = with_page_timeout(
            async {
                self.page
                    .evaluate(script.as_str())
                    .await
                    .map_err(|e| classify_cdp_error(&e))
            },
            OPERATION_TIMEOUT,
            operation,
        )
        .await?;

        result
            .into_value::<Envelope>()
            .map_err(|e| DomError::Script(format!("{operation}: {e}")))
    }

    async fn evaluate_value<T: DeserializeOwned>(
        &self,
        script: String,
        operation: &str,
    ) -> DomResult<T> {
        let envelope = self.evaluate(script, operation).await?;
        serde_json::from_value(envelope.value)
            .map_err(|e| DomError::Script(format!("{operation}: {e}")))
    }

    async fn element_op<T: DeserializeOwned>(
        &self,
        handle: &ElementPath,
        operation_js: &str,
        arg: Value,
        operation: &str,
    ) -> DomResult<T> {
        let script = element_operation(&handle.to_json(), operation_js, &arg.to_string());
        let envelope = self.evaluate(script, operation).await?;
        if envelope.stale {
            trace!("{operation}: {} no longer resolves", handle.describe());
            return Err(DomError::StaleHandle(handle.describe()));
        }
        serde_json::from_value(envelope.value)
            .map_err(|e| DomError::Script(format!("{operation}: {e}")))
    }

    async fn ready_state(&self) -> DomResult<String> {
        self.evaluate_value(READY_STATE.to_string(), "readyState").await
    }
}

#[async_trait]
impl DomDriver for ChromiumDriver {
    type Handle = ElementPath;

    async fn open(&self, url: &str) -> DomResult<()> {
        debug!("Navigating to {url}");
        with_page_timeout(
            async {
                self.page
                    .goto(url)
                    .await
                    .map_err(|e| classify_cdp_error(&e))?;
                self.page
                    .wait_for_navigation()
                    .await
                    .map_err(|e| classify_cdp_error(&e))?;
                Ok(())
            },
            self.load_timeout,
            "page load",
        )
        .await?;

        // Scripts may still be rendering after the load event
        let settings = PollSettings::new(Duration::from_millis(100), self.load_timeout);
        let complete = wait_until(settings, || async {
            Ok(self.ready_state().await? == "complete")
        })
        .await?;
        if !complete {
            warn!("Document at {url} never reached readyState=complete");
        }
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> DomResult<Vec<ElementPath>> {
        let selector_json = Value::String(selector.to_string()).to_string();
        let count: usize = self
            .evaluate_value(count_in_document(&selector_json), "query")
            .await?;
        Ok((0..count).map(|i| ElementPath::root(selector, i)).collect())
    }

    async fn query_within(
        &self,
        parent: &ElementPath,
        selector: &str,
    ) -> DomResult<Vec<ElementPath>> {
        let count: usize = self
            .element_op(
                parent,
                COUNT_WITHIN,
                Value::String(selector.to_string()),
                "query within",
            )
            .await?;
        Ok((0..count).map(|i| parent.child(selector, i)).collect())
    }

    async fn text(&self, handle: &ElementPath) -> DomResult<Option<String>> {
        self.element_op(handle, ELEMENT_TEXT, Value::Null, "text").await
    }

    async fn attribute(&self, handle: &ElementPath, name: &str) -> DomResult<Option<String>> {
        self.element_op(
            handle,
            ELEMENT_ATTRIBUTE,
            Value::String(name.to_string()),
            "attribute",
        )
        .await
    }

    async fn is_visible(&self, handle: &ElementPath) -> DomResult<bool> {
        self.element_op(handle, ELEMENT_VISIBLE, Value::Null, "visibility")
            .await
    }

    async fn click(&self, handle: &ElementPath) -> DomResult<()> {
        let point: ClickPoint = self
            .element_op(handle, ELEMENT_CLICK_POINT, Value::Null, "click point")
            .await?;
        trace!("Clicking {} at ({}, {})", handle.describe(), point.x, point.y);
        with_page_timeout(
            async {
                self.page
                    .click(Point {
                        x: point.x,
                        y: point.y,
                    })
                    .await
                    .map_err(|e| classify_cdp_error(&e))?;
                Ok(())
            },
            OPERATION_TIMEOUT,
            "click",
        )
        .await
    }

    async fn js_click(&self, handle: &ElementPath) -> DomResult<()> {
        let _: bool = self
            .element_op(handle, ELEMENT_JS_CLICK, Value::Null, "script click")
            .await?;
        Ok(())
    }

    async fn scroll_into_view(&self, handle: &ElementPath) -> DomResult<()> {
        let _: bool = self
            .element_op(handle, ELEMENT_SCROLL_INTO_VIEW, Value::Null, "scroll into view")
            .await?;
        Ok(())
    }

    async fn scroll_to_bottom(&self) -> DomResult<()> {
        let _: bool = self
            .evaluate_value(SCROLL_TO_BOTTOM.to_string(), "scroll to bottom")
            .await?;
        Ok(())
    }

    async fn scroll_to_top(&self) -> DomResult<()> {
        let _: bool = self
            .evaluate_value(SCROLL_TO_TOP.to_string(), "scroll to top")
            .await?;
        Ok(())
    }

    async fn document_height(&self) -> DomResult<i64> {
        self.evaluate_value(DOCUMENT_HEIGHT.to_string(), "document height")
            .await
    }

    async fn current_location(&self) -> DomResult<String> {
        Ok(get_page_url_with_fallback(&self.page).await)
    }

    async fn run_script(&self, source: &str, args: Vec<Value>) -> DomResult<Value> {
        let args_json = Value::Array(args).to_string();
        let envelope = self.evaluate(user_script(source, &args_json), "script").await?;
        Ok(envelope.value)
    }
}
