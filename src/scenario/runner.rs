//! Scenario runner: executes steps strictly in order on the single page
//! owned by the session, and reports pass/fail per scenario. Step failures
//! fail the scenario, never the process; session teardown always runs.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;

use super::{Expectation, Outcome, Scenario, Step, WaitUntil};
use crate::browser::Session;
use crate::config::Config;
use crate::error::{HarnessError, Result};
use crate::interaction::{click, fill, wait};

const SCREENSHOT_TIMEOUT: Duration = Duration::from_secs(10);
const TEARDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a scenario file and run it in a fresh session. Parse failures
/// report as a failed outcome rather than crashing the run.
pub async fn run_file(path: &Path, config: &Config) -> Outcome {
    let scenario = match Scenario::load(path) {
        Ok(s) => s,
        Err(e) => {
            return Outcome::Failed {
                step: 0,
                reason: e.to_string(),
            }
        }
    };
    run_scenario(&scenario, config).await
}

/// Acquire a session, run the scenario under its wall-clock budget, and
/// release the session on every exit path.
pub async fn run_scenario(scenario: &Scenario, config: &Config) -> Outcome {
    let session = match Session::launch(config).await {
        Ok(s) => s,
        Err(e) => {
            return Outcome::Failed {
                step: 0,
                reason: e.to_string(),
            }
        }
    };

    let budget = Duration::from_secs(config.budget_secs);
    let outcome = match tokio::time::timeout(budget, run(&session, scenario, config)).await {
        Ok(outcome) => outcome,
        Err(_) => Outcome::Failed {
            step: 0,
            reason: HarnessError::Budget(config.budget_secs).to_string(),
        },
    };

    if !outcome.passed() {
        if let Some(dir) = &config.screenshot_dir {
            // Bounded: a wedged renderer (the usual cause of a budget
            // abort) must not stall the rest of the run.
            match tokio::time::timeout(
                SCREENSHOT_TIMEOUT,
                capture_failure(&session, dir, &scenario.name),
            )
            .await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("Failed to capture failure screenshot: {}", e),
                Err(_) => tracing::warn!("Failure screenshot timed out"),
            }
        }
    }

    if tokio::time::timeout(TEARDOWN_TIMEOUT, session.close())
        .await
        .is_err()
    {
        // Dropping the session mid-close still kills the browser process.
        tracing::warn!("Session teardown timed out");
    }
    outcome
}

/// Execute the step list against the session's page.
pub async fn run(session: &Session, scenario: &Scenario, config: &Config) -> Outcome {
    println!(
        "\n{} {}",
        "Running:".blue().bold(),
        scenario.name.white().bold()
    );
    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }

    let page = session.page();

    for (i, step) in scenario.steps.iter().enumerate() {
        let step_num = i + 1;
        match execute_step(page, step, config, &scenario.name).await {
            Ok(()) => {
                println!(
                    "  {} Step {}: {}",
                    "✓".green(),
                    step_num,
                    step.describe().dimmed()
                );
            }
            Err(e) => {
                println!(
                    "  {} Step {}: {} — {}",
                    "✗".red(),
                    step_num,
                    step.describe().dimmed(),
                    e
                );
                return Outcome::Failed {
                    step: step_num,
                    reason: e.to_string(),
                };
            }
        }
    }

    if let Some(Expectation { text, timeout_ms }) = &scenario.expect {
        let timeout = Duration::from_millis(timeout_ms.unwrap_or(config.assert_timeout_ms));
        if wait::wait_for_text(page, text, timeout).await {
            println!("  {} Expect: \"{}\" visible", "✓".green(), text.dimmed());
        } else {
            let reason = HarnessError::Assertion {
                expected: text.clone(),
                scenario: scenario.name.clone(),
            }
            .to_string();
            println!("  {} Expect: {}", "✗".red(), reason);
            return Outcome::Failed {
                step: scenario.steps.len() + 1,
                reason,
            };
        }
    }

    Outcome::Passed
}

async fn execute_step(
    page: &chromiumoxide::page::Page,
    step: &Step,
    config: &Config,
    scenario_name: &str,
) -> Result<()> {
    match step {
        Step::Navigate { url, wait_until } => navigate(page, config, url, *wait_until).await,
        Step::Click {
            locator,
            timeout_ms,
        } => {
            let timeout = Duration::from_millis(timeout_ms.unwrap_or(config.action_timeout_ms));
            click::click(page, locator, timeout).await
        }
        Step::Fill {
            locator,
            value,
            timeout_ms,
        } => {
            let timeout = Duration::from_millis(timeout_ms.unwrap_or(config.action_timeout_ms));
            fill::fill(page, locator, value, timeout).await
        }
        Step::Wait { ms } => {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
            Ok(())
        }
        Step::AssertVisible { text, timeout_ms } => {
            let timeout = Duration::from_millis(timeout_ms.unwrap_or(config.assert_timeout_ms));
            if wait::wait_for_text(page, text, timeout).await {
                Ok(())
            } else {
                Err(HarnessError::Assertion {
                    expected: text.clone(),
                    scenario: scenario_name.to_string(),
                })
            }
        }
    }
}

/// Navigate, bounded by the navigation timeout, then wait best-effort for
/// the requested readiness state. A timeout on the secondary wait never
/// fails the step — recorded app flows keep loading assets long after the
/// page is usable.
async fn navigate(
    page: &chromiumoxide::page::Page,
    config: &Config,
    url: &str,
    wait_until: Option<WaitUntil>,
) -> Result<()> {
    let target = config.resolve_url(url)?;
    tracing::info!(url = %target, "navigating");

    let timeout = Duration::from_millis(config.navigation_timeout_ms);
    match tokio::time::timeout(timeout, page.goto(target.clone())).await {
        Err(_) => {
            return Err(HarnessError::Navigation {
                url: target,
                timeout_ms: config.navigation_timeout_ms,
            })
        }
        Ok(Err(e)) => return Err(HarnessError::Cdp(format!("navigation to '{}': {}", target, e))),
        Ok(Ok(_)) => {}
    }

    let wanted = match wait_until.unwrap_or(WaitUntil::Load) {
        WaitUntil::Domcontentloaded => "interactive",
        _ => "complete",
    };
    let ready_js = format!(
        "document.readyState === 'complete' || document.readyState === '{}'",
        wanted
    );
    let settle_deadline = std::time::Instant::now() + Duration::from_millis(3_000);
    loop {
        let ready: bool = match page.evaluate(ready_js.as_str()).await {
            Ok(result) => result.into_value().unwrap_or(false),
            Err(_) => false,
        };
        if ready || std::time::Instant::now() >= settle_deadline {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    if wait_until == Some(WaitUntil::Networkidle) {
        // Extra settle time for post-load fetches.
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    Ok(())
}

/// Drop a full-page PNG named after the scenario into `dir`.
async fn capture_failure(session: &Session, dir: &Path, scenario_name: &str) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let file_name: String = scenario_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let path = dir.join(format!("{}.png", file_name));
    let bytes = session.screenshot_png().await?;
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), "wrote failure screenshot");
    Ok(())
}
