//! Renewer: click through the renewal flow on the service page.
//!
//! Requires an authenticated session; the driver runs [`auth::login`]
//! first and never calls this on a failed login.
//!
//! [`auth::login`]: crate::flow::auth::login

use eoka::Page;
use tracing::info;

use crate::config::{
    Settings, CHALLENGE_PROBE_MS, CHALLENGE_RESPONSE_TIMEOUT_MS, NAV_TIMEOUT_MS, SETTLE_IDLE_MS,
    STEP_TIMEOUT_MS,
};
use crate::flow::{challenge, dom, report_failure, wait, RenewOutcome};
use crate::{Error, Result};

const RENEW_LABEL: &str = "Renew";
const CREATE_INVOICE_LABEL: &str = "Create Invoice";
const PAY_LABEL: &str = "Pay";

/// Run the renewal click sequence. Same never-errors contract as the
/// Authenticator.
pub async fn renew(page: &Page, settings: &Settings) -> RenewOutcome {
    info!("starting renewal flow");
    match renew_steps(page, settings).await {
        Ok(()) => {
            info!("renewal flow completed");
            RenewOutcome::Renewed
        }
        Err(e) => RenewOutcome::Failed(report_failure(page, "renew", &e).await),
    }
}

async fn renew_steps(page: &Page, settings: &Settings) -> Result<()> {
    let service_url = settings.service_url();
    if page.url().await? != service_url {
        info!("not on the service page, navigating to {}", service_url);
        page.goto(&service_url).await?;
    }

    click_step(page, RENEW_LABEL).await?;
    click_step(page, CREATE_INVOICE_LABEL).await?;

    info!("waiting for challenge clearance on the invoice page");
    challenge::clear_if_present(page, CHALLENGE_PROBE_MS, CHALLENGE_RESPONSE_TIMEOUT_MS).await?;

    click_step(page, PAY_LABEL).await?;

    // Give the payment request time to leave the browser. What the
    // dashboard shows past this point is not verified.
    page.wait_for_network_idle(SETTLE_IDLE_MS, NAV_TIMEOUT_MS)
        .await
        .ok();
    Ok(())
}

/// Wait for a step's button to appear, then click it by label.
async fn click_step(page: &Page, label: &str) -> Result<()> {
    info!("clicking '{}'", label);
    wait::text_present(page, label, STEP_TIMEOUT_MS).await?;
    let selector = dom::find_by_text(page, label)
        .await?
        .ok_or_else(|| Error::Action(format!("no clickable element labelled '{label}'")))?;
    page.human_click(&selector).await?;
    Ok(())
}
