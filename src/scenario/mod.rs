//! Scenario model: one end-to-end test case as a named, ordered list of
//! steps plus an optional final expectation, loaded from a YAML file.

pub mod runner;

use std::path::Path;

use serde::Deserialize;

use crate::error::{HarnessError, Result};
use crate::selectors::Locator;

/// A complete scenario loaded from a YAML file. Immutable during execution;
/// no state is shared between scenarios.
#[derive(Deserialize, Debug)]
pub struct Scenario {
    pub name: String,
    /// What the scenario verifies, in prose.
    pub description: Option<String>,
    pub steps: Vec<Step>,
    /// Trailing visible-text expectation. Exploratory scenarios omit it and
    /// pass when every step succeeds.
    pub expect: Option<Expectation>,
}

#[derive(Deserialize, Debug)]
pub struct Expectation {
    /// Text that must become visible for the scenario to pass.
    pub text: String,
    pub timeout_ms: Option<u64>,
}

/// A single step. Retries are never injected by the runner; a flaky flow
/// that needs a second attempt spells it out as repeated steps.
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Load a URL (relative URLs resolve against the configured base URL).
    Navigate {
        url: String,
        wait_until: Option<WaitUntil>,
    },
    /// Click the first element the locator resolves to.
    Click {
        locator: Locator,
        timeout_ms: Option<u64>,
    },
    /// Clear a field and type a value into it.
    Fill {
        locator: Locator,
        value: String,
        timeout_ms: Option<u64>,
    },
    /// Cooperative fixed pause.
    Wait { ms: u64 },
    /// Poll until the text is visible; fail the scenario if it never is.
    AssertVisible {
        text: String,
        timeout_ms: Option<u64>,
    },
}

/// Readiness signal a navigation waits for after the network commit.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    Load,
    Domcontentloaded,
    Networkidle,
}

/// Pass/fail result of running a scenario. `step` is 1-based; the trailing
/// expectation reports as steps.len() + 1, setup failures as step 0.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed { step: usize, reason: String },
}

impl Outcome {
    pub fn passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

impl Scenario {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| HarnessError::Scenario(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Scenario(format!("failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
            .map_err(|e| HarnessError::Scenario(format!("{}: {}", path.display(), e)))
    }
}

impl Step {
    /// Short human-readable form for runner output.
    pub fn describe(&self) -> String {
        match self {
            Step::Navigate { url, .. } => format!("navigate {}", url),
            Step::Click { locator, .. } => format!("click {}", locator),
            Step::Fill { locator, .. } => format!("fill {}", locator),
            Step::Wait { ms } => format!("wait {}ms", ms),
            Step::AssertVisible { text, .. } => format!("assert visible \"{}\"", text),
        }
    }
}
