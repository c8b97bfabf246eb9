use std::path::PathBuf;

use crate::error::{HarnessError, Result};

/// Harness-wide settings. CLI flags override environment variables, which
/// override these defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL that relative scenario URLs resolve against.
    pub base_url: Option<String>,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Disable the Chrome sandbox for containerized execution.
    pub no_sandbox: bool,
    /// Default timeout for click/fill steps.
    pub action_timeout_ms: u64,
    pub navigation_timeout_ms: u64,
    /// Default timeout for visible-text assertions.
    pub assert_timeout_ms: u64,
    /// Wall-clock budget per scenario; the session is released on abort.
    pub budget_secs: u64,
    /// When set, failed scenarios drop a full-page PNG here.
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            headless: true,
            window_width: 1280,
            window_height: 720,
            no_sandbox: false,
            action_timeout_ms: 5_000,
            navigation_timeout_ms: 10_000,
            assert_timeout_ms: 10_000,
            budget_secs: 300,
            screenshot_dir: None,
        }
    }
}

impl Config {
    /// Layer `PAGEPROOF_*` environment variables over the current values.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("PAGEPROOF_BASE_URL") {
            if !url.is_empty() {
                self.base_url = Some(url);
            }
        }
        if let Ok(v) = std::env::var("PAGEPROOF_HEADED") {
            if env_flag(&v) {
                self.headless = false;
            }
        }
        if let Ok(v) = std::env::var("PAGEPROOF_NO_SANDBOX") {
            if env_flag(&v) {
                self.no_sandbox = true;
            }
        }
        if let Ok(v) = std::env::var("PAGEPROOF_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                self.action_timeout_ms = ms;
            }
        }
    }

    /// Resolve a scenario URL against the configured base URL. Absolute
    /// URLs pass through untouched.
    pub fn resolve_url(&self, url: &str) -> Result<String> {
        if url.starts_with("http://")
            || url.starts_with("https://")
            || url.starts_with("file://")
            || url.starts_with("about:")
        {
            return Ok(url.to_string());
        }

        match &self.base_url {
            Some(base) => Ok(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                url.trim_start_matches('/')
            )),
            None => Err(HarnessError::Scenario(format!(
                "relative URL '{}' requires --base-url or PAGEPROOF_BASE_URL",
                url
            ))),
        }
    }
}

fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
