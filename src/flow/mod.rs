//! Flow procedures and their outcome types.
//!
//! The two entry points — [`auth::login`] and [`renew::renew`] — share a
//! contract: they never return an error. Internal steps propagate the
//! crate [`Error`](crate::Error) with `?`; the entry point classifies it
//! into a [`FailureKind`], logs it, captures a diagnostic screenshot where
//! one makes sense, and hands the caller an outcome enum.

pub mod auth;
pub mod challenge;
pub mod renew;

mod dom;
mod wait;

use std::fmt;

use eoka::Page;
use tracing::{info, warn};

use crate::Error;

/// Why a flow failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Neither a cookie nor a full credential pair was available.
    Config,
    /// The cached session token was rejected by the dashboard.
    ExpiredSession,
    /// A bounded wait ran out (challenge, navigation, element).
    Timeout,
    /// Submitted credentials were rejected.
    Credentials,
    /// Anything else the browser layer threw at us.
    Unknown,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Config => "config",
            FailureKind::ExpiredSession => "expired session",
            FailureKind::Timeout => "timeout",
            FailureKind::Credentials => "credentials",
            FailureKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&Error> for FailureKind {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(_) => FailureKind::Config,
            Error::Timeout(_) => FailureKind::Timeout,
            Error::Credentials(_) => FailureKind::Credentials,
            Error::SessionExpired => FailureKind::ExpiredSession,
            Error::Browser(_) | Error::Io(_) | Error::Action(_) => FailureKind::Unknown,
        }
    }
}

/// How the session was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    CachedSession,
    Credentials,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::CachedSession => f.write_str("cached session"),
            AuthMethod::Credentials => f.write_str("credentials"),
        }
    }
}

/// Terminal state of the Authenticator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(AuthMethod),
    Failed(FailureKind),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated(_))
    }
}

/// Terminal state of the Renewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewOutcome {
    Renewed,
    Failed(FailureKind),
}

impl RenewOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RenewOutcome::Renewed)
    }
}

/// Screenshot file for a failure in the given phase. Config failures happen
/// before any navigation, so there is nothing worth capturing.
fn screenshot_name(phase: &str, kind: FailureKind) -> Option<String> {
    match kind {
        FailureKind::Config | FailureKind::ExpiredSession => None,
        FailureKind::Timeout => Some(format!("{phase}_timeout_error.png")),
        FailureKind::Credentials => Some(format!("{phase}_failure.png")),
        FailureKind::Unknown => Some(format!("{phase}_general_error.png")),
    }
}

/// Classify an error, log it, and capture the matching screenshot.
async fn report_failure(page: &Page, phase: &str, err: &Error) -> FailureKind {
    let kind = FailureKind::from(err);
    warn!("{} failed ({}): {}", phase, kind, err);
    if let Some(path) = screenshot_name(phase, kind) {
        capture(page, &path).await;
    }
    kind
}

/// Best-effort diagnostic screenshot. A capture failure is logged, never
/// propagated.
async fn capture(page: &Page, path: &str) {
    match page.screenshot().await {
        Ok(data) => {
            if let Err(e) = std::fs::write(path, data) {
                warn!("failed to save screenshot {}: {}", path, e);
            } else {
                info!("saved failure screenshot: {}", path);
            }
        }
        Err(e) => warn!("failed to capture screenshot: {}", e),
    }
}
