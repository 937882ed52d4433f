//! Cloudflare Turnstile handling.
//!
//! The widget lives in a cross-origin iframe, so its checkbox cannot be
//! reached with a page-level selector. Instead: wait for the iframe to
//! become visible, click it with the stealth mouse profile, then poll the
//! hidden `cf-turnstile-response` input the widget writes its token into.

use std::time::{Duration, Instant};

use eoka::Page;
use tracing::debug;

use crate::config::CHALLENGE_POLL_INTERVAL_MS;
use crate::flow::{dom, wait};
use crate::{Error, Result};

/// The Turnstile widget iframe.
pub const FRAME_SELECTOR: &str = r#"iframe[src*="challenges.cloudflare.com"]"#;

/// Hidden input the widget populates once the challenge is solved.
pub const RESPONSE_SELECTOR: &str = r#"[name="cf-turnstile-response"]"#;

/// Wait for the interactive widget to show up and trigger it.
pub async fn trigger(page: &Page, timeout_ms: u64) -> Result<()> {
    wait::visible(page, FRAME_SELECTOR, timeout_ms).await?;
    debug!("turnstile frame visible, clicking");
    page.human_click(FRAME_SELECTOR).await?;
    Ok(())
}

/// Poll until the widget has written a token, else time out.
pub async fn wait_for_clearance(page: &Page, timeout_ms: u64) -> Result<String> {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    let mut polls: u32 = 0;
    loop {
        if let Some(token) = dom::field_value(page, RESPONSE_SELECTOR).await? {
            debug!("turnstile cleared after {} polls", polls);
            return Ok(token);
        }
        if Instant::now() >= deadline {
            return Err(Error::Timeout(format!(
                "turnstile response not populated within {timeout_ms}ms"
            )));
        }
        polls += 1;
        if polls % 20 == 0 {
            debug!(
                "still waiting for turnstile clearance ({}s)",
                polls * CHALLENGE_POLL_INTERVAL_MS as u32 / 1000
            );
        }
        tokio::time::sleep(Duration::from_millis(CHALLENGE_POLL_INTERVAL_MS)).await;
    }
}

/// Tolerant variant for pages where the widget may be invisible or absent:
/// click the iframe if one shows up within the probe window; a page that
/// carries neither the iframe nor the response field counts as cleared.
pub async fn clear_if_present(page: &Page, probe_ms: u64, timeout_ms: u64) -> Result<()> {
    if wait::visible(page, FRAME_SELECTOR, probe_ms).await.is_ok() {
        debug!("turnstile frame present, clicking");
        page.human_click(FRAME_SELECTOR).await?;
    } else if !dom::element_exists(page, RESPONSE_SELECTOR).await? {
        debug!("no turnstile widget on page");
        return Ok(());
    }
    wait_for_clearance(page, timeout_ms).await?;
    Ok(())
}
