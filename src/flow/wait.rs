//! Bounded waits built on cooperative polling.
//!
//! eoka's native waits fold their timeout into an opaque error, which
//! would make a dead browser indistinguishable from a slow page. The
//! flows use these pollers instead: only a spent deadline raises
//! [`Error::Timeout`], and every probe error propagates untouched (and
//! classifies as unknown).

use std::future::Future;
use std::time::{Duration, Instant};

use eoka::Page;
use tracing::debug;

use crate::config::CHALLENGE_POLL_INTERVAL_MS;
use crate::flow::dom;
use crate::{Error, Result};

/// Poll `probe` until it reports true. Raises [`Error::Timeout`] naming
/// `what` once the deadline is spent.
pub async fn poll_until<F, Fut>(
    what: &str,
    timeout_ms: u64,
    interval_ms: u64,
    probe: F,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if probe().await? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(Error::Timeout(format!("{what} within {timeout_ms}ms")));
        }
        tokio::time::sleep(Duration::from_millis(interval_ms)).await;
    }
}

/// Wait for a selector to match a laid-out (visible) element.
pub async fn visible(page: &Page, selector: &str, timeout_ms: u64) -> Result<()> {
    debug!("waiting for '{}' to become visible", selector);
    poll_until(
        &format!("'{selector}' not visible"),
        timeout_ms,
        CHALLENGE_POLL_INTERVAL_MS,
        || dom::element_visible(page, selector),
    )
    .await
}

/// Wait for the page URL to contain a marker.
pub async fn url_contains(page: &Page, marker: &str, timeout_ms: u64) -> Result<()> {
    debug!("waiting for url to contain '{}'", marker);
    poll_until(
        &format!("no navigation to '{marker}'"),
        timeout_ms,
        CHALLENGE_POLL_INTERVAL_MS,
        || async { Ok(page.url().await?.contains(marker)) },
    )
    .await
}

/// Wait for the page text to contain a string.
pub async fn text_present(page: &Page, text: &str, timeout_ms: u64) -> Result<()> {
    debug!("waiting for text '{}'", text);
    poll_until(
        &format!("'{text}' did not appear"),
        timeout_ms,
        CHALLENGE_POLL_INTERVAL_MS,
        || async { Ok(page.text().await?.contains(text)) },
    )
    .await
}
