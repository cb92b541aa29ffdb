//! Helpers for consistent chromiumoxide Page error handling
//!
//! Maps DevTools failures onto [`DomError`] and wraps the Page reads that may
//! legitimately be empty.

use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use tracing::trace;

use super::DomError;

/// Get page URL with diagnostic fallback
///
/// Handles two failure modes:
/// 1. `Err(e)` - Browser communication failure (logs at trace level)
/// 2. `Ok(None)` - Page has no URL yet
///
/// Returns `"about:blank"` on either, which is never equal to a listing URL
/// and so never confirms a navigation by accident.
pub async fn get_page_url_with_fallback(page: &Page) -> String {
    match page.url().await {
        Ok(Some(url)) => url,
        Ok(None) => {
            trace!("Page URL is None (page not yet navigated)");
            "about:blank".to_string()
        }
        Err(e) => {
            trace!("Failed to get page URL (browser communication error): {}", e);
            "about:blank".to_string()
        }
    }
}

/// Classify a DevTools error by its message
///
/// Connection-level failures mean the browser is unreachable; anything else is
/// local to the call that produced it.
#[must_use]
pub fn classify_cdp_error(error: &CdpError) -> DomError {
    let message = error.to_string();
    let lower = message.to_lowercase();

    if lower.contains("browser closed")
        || lower.contains("browser disconnected")
        || lower.contains("target closed")
        || lower.contains("session closed")
        || lower.contains("session not found")
        || lower.contains("no response from the chromium instance")
        || lower.contains("channel")
        || lower.contains("websocket")
    {
        return DomError::Disconnected(message);
    }

    if lower.contains("javascript") || lower.contains("exception") {
        return DomError::Script(message);
    }

    DomError::Protocol(message)
}

/// Whether a failed root load is worth another attempt
#[must_use]
pub fn is_retryable(error: &DomError) -> bool {
    match error {
        DomError::Disconnected(_) | DomError::Script(_) | DomError::StaleHandle(_) => false,
        DomError::Timeout { .. } => true,
        DomError::Protocol(message) => {
            let lower = message.to_lowercase();
            lower.contains("timeout")
                || lower.contains("timed out")
                || lower.contains("network")
                || lower.contains("connection refused")
                || lower.contains("connection reset")
                || lower.contains("429")
        }
    }
}
