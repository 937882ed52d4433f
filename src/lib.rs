//! # hiden-renew
//!
//! Unattended renewal for HidenCloud services. Logs into the dashboard with
//! a cached session cookie, falling back to email/password plus the
//! Cloudflare Turnstile widget, then clicks through the renewal flow:
//! Renew → Create Invoice → challenge clearance → Pay.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hiden_renew::{flow, Settings};
//!
//! # #[tokio::main]
//! # async fn main() -> hiden_renew::Result<()> {
//! let settings = Settings::from_env();
//! let browser = eoka::Browser::launch().await?;
//! let page = browser.new_page("about:blank").await?;
//!
//! let outcome = flow::auth::login(&page, &settings).await;
//! println!("authenticated: {}", outcome.is_success());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod flow;

pub use config::Settings;
pub use flow::{AuthMethod, FailureKind, LoginOutcome, RenewOutcome};

/// Result type for hiden-renew operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the dashboard.
///
/// Flow entry points ([`flow::auth::login`], [`flow::renew::renew`]) never
/// surface these; they classify them into a [`FailureKind`] and return an
/// outcome instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("login rejected: {0}")]
    Credentials(String),

    #[error("session cookie expired")]
    SessionExpired,

    #[error("action failed: {0}")]
    Action(String),
}
