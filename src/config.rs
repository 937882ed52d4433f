//! Runtime settings and dashboard constants.
//!
//! Everything the flows need is read from the process environment once,
//! into an explicit [`Settings`] value that gets passed by reference into
//! both procedures. No module-global state.

use std::env;

use url::Url;

/// Name of the long-lived session cookie the dashboard issues.
pub const SESSION_COOKIE_NAME: &str =
    "remember_web_59ba36addc2b2f9401580f014c7f58ea4e30989d";

/// URL fragment that marks the login page. A URL containing this after
/// navigation means the session is not authenticated.
pub const LOGIN_PATH_MARKER: &str = "auth/login";

/// Path the dashboard lands on after a successful credential login.
pub const POST_LOGIN_PATH: &str = "/dashboard";

/// Label on the login form's submit button.
pub const SIGN_IN_LABEL: &str = "Sign in to your account";

pub const DEFAULT_BASE_URL: &str = "https://dash.hidencloud.com";
pub const DEFAULT_SERVICE_ID: &str = "62037";

// Wait bounds. Navigation and the Turnstile token can be slow; element
// appearance within an already-loaded page is not.
pub const NAV_TIMEOUT_MS: u64 = 60_000;
pub const STEP_TIMEOUT_MS: u64 = 30_000;
pub const CHALLENGE_VISIBLE_TIMEOUT_MS: u64 = 30_000;
pub const CHALLENGE_RESPONSE_TIMEOUT_MS: u64 = 60_000;
pub const CHALLENGE_POLL_INTERVAL_MS: u64 = 500;
pub const CHALLENGE_PROBE_MS: u64 = 5_000;
pub const SETTLE_IDLE_MS: u64 = 1_000;

/// Run configuration, sourced from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Cached session token (`HIDENCLOUD_COOKIE`).
    pub cookie: Option<String>,
    /// Account email (`HIDENCLOUD_EMAIL`).
    pub email: Option<String>,
    /// Account password (`HIDENCLOUD_PASSWORD`).
    pub password: Option<String>,
    /// Dashboard origin (`HIDENCLOUD_BASE_URL`).
    pub base_url: String,
    /// Service to renew (`HIDENCLOUD_SERVICE_ID`).
    pub service_id: String,
    /// Launch the browser headless.
    pub headless: bool,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            cookie: get("HIDENCLOUD_COOKIE"),
            email: get("HIDENCLOUD_EMAIL"),
            password: get("HIDENCLOUD_PASSWORD"),
            base_url: get("HIDENCLOUD_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            service_id: get("HIDENCLOUD_SERVICE_ID")
                .unwrap_or_else(|| DEFAULT_SERVICE_ID.to_string()),
            headless: true,
        }
    }

    /// At least one authentication path is satisfiable.
    pub fn has_auth_path(&self) -> bool {
        self.cookie.is_some() || self.credentials().is_some()
    }

    /// Email/password pair, if both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        }
    }

    /// Login page URL.
    pub fn login_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), LOGIN_PATH_MARKER)
    }

    /// Service management page URL, the target of the renewal flow.
    pub fn service_url(&self) -> String {
        format!(
            "{}/service/{}/manage",
            self.base_url.trim_end_matches('/'),
            self.service_id
        )
    }

    /// Host the session cookie is scoped to. `None` when the base URL has
    /// no host (synthetic pages in tests), letting the browser decide.
    pub fn cookie_domain(&self) -> Option<String> {
        Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.service_id, DEFAULT_SERVICE_ID);
        assert!(s.headless);
        assert!(s.cookie.is_none());
        assert!(s.email.is_none());
        assert!(s.password.is_none());
    }

    #[test]
    fn test_empty_values_are_unset() {
        let s = settings(&[("HIDENCLOUD_COOKIE", ""), ("HIDENCLOUD_EMAIL", "")]);
        assert!(s.cookie.is_none());
        assert!(s.email.is_none());
    }

    #[test]
    fn test_auth_path_cookie_only() {
        let s = settings(&[("HIDENCLOUD_COOKIE", "abc")]);
        assert!(s.has_auth_path());
        assert!(s.credentials().is_none());
    }

    #[test]
    fn test_auth_path_credentials_only() {
        let s = settings(&[
            ("HIDENCLOUD_EMAIL", "a@b.com"),
            ("HIDENCLOUD_PASSWORD", "x"),
        ]);
        assert!(s.has_auth_path());
        assert_eq!(s.credentials(), Some(("a@b.com", "x")));
    }

    #[test]
    fn test_auth_path_partial_credentials() {
        let s = settings(&[("HIDENCLOUD_EMAIL", "a@b.com")]);
        assert!(!s.has_auth_path());
        assert!(s.credentials().is_none());
    }

    #[test]
    fn test_auth_path_none() {
        let s = settings(&[]);
        assert!(!s.has_auth_path());
    }

    #[test]
    fn test_derived_urls() {
        let s = settings(&[]);
        assert_eq!(s.login_url(), "https://dash.hidencloud.com/auth/login");
        assert_eq!(
            s.service_url(),
            "https://dash.hidencloud.com/service/62037/manage"
        );
    }

    #[test]
    fn test_derived_urls_with_overrides() {
        let s = settings(&[
            ("HIDENCLOUD_BASE_URL", "https://staging.example.com/"),
            ("HIDENCLOUD_SERVICE_ID", "999"),
        ]);
        assert_eq!(s.login_url(), "https://staging.example.com/auth/login");
        assert_eq!(
            s.service_url(),
            "https://staging.example.com/service/999/manage"
        );
    }

    #[test]
    fn test_cookie_domain() {
        let s = settings(&[]);
        assert_eq!(s.cookie_domain().as_deref(), Some("dash.hidencloud.com"));
    }

    #[test]
    fn test_cookie_domain_hostless_base() {
        let s = settings(&[("HIDENCLOUD_BASE_URL", "data:text/html,hello")]);
        assert!(s.cookie_domain().is_none());
    }
}
