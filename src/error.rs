use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Everything that can go wrong while driving a scenario. A step failure
/// fails its scenario, never the runner process.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to '{url}' timed out after {timeout_ms}ms")]
    Navigation { url: String, timeout_ms: u64 },

    #[error("No element matched {locator} within {timeout_ms}ms")]
    ElementNotFound { locator: String, timeout_ms: u64 },

    #[error("Element {locator} cannot accept input: {reason}")]
    ElementNotInteractable { locator: String, reason: String },

    #[error("Expected text \"{expected}\" did not become visible (scenario '{scenario}')")]
    Assertion { expected: String, scenario: String },

    #[error("Invalid scenario: {0}")]
    Scenario(String),

    #[error("Scenario exceeded its {0}s budget")]
    Budget(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Browser error: {0}")]
    Cdp(String),
}

impl From<chromiumoxide::error::CdpError> for HarnessError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        Self::Cdp(e.to_string())
    }
}
