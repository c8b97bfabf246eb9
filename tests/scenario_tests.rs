//! End-to-end runner tests against local HTML fixtures. These launch a real
//! Chrome, so they are ignored by default; run them with
//! `cargo test -- --ignored` on a machine with Chrome installed.

use std::path::PathBuf;

use pageproof::browser::Session;
use pageproof::config::Config;
use pageproof::scenario::runner;
use pageproof::scenario::{Outcome, Scenario};

fn fixture_base_url() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = PathBuf::from(manifest_dir).join("fixtures");
    format!("file://{}", path.display())
}

fn test_config() -> Config {
    Config {
        base_url: Some(fixture_base_url()),
        no_sandbox: true,
        action_timeout_ms: 5_000,
        assert_timeout_ms: 5_000,
        budget_secs: 60,
        ..Default::default()
    }
}

const SIGN_IN_STEPS: &str = r#"
  - action: navigate
    url: /login.html
  - action: click
    locator: { role: { role: button, name: Sign In } }
  - action: fill
    locator: { label: Email }
    value: user@example.com
  - action: fill
    locator: { label: Password }
    value: secret
  - action: click
    locator: { test_id: signin-submit }
"#;

fn sign_in_scenario(password_line_replacement: Option<&str>) -> Scenario {
    let mut steps = SIGN_IN_STEPS.to_string();
    if let Some(replacement) = password_line_replacement {
        steps = steps.replace("value: secret", replacement);
    }
    let yaml = format!(
        "name: sign-in\nsteps:{}expect:\n  text: Dashboard\n  timeout_ms: 3000\n",
        steps
    );
    Scenario::from_yaml(&yaml).expect("fixture scenario should parse")
}

// ── Happy path ──────────────────────────────────────────────────────────

#[tokio::test]
#[ignore = "requires a local Chrome binary"]
async fn test_sign_in_happy_path_passes() {
    let outcome = runner::run_scenario(&sign_in_scenario(None), &test_config()).await;
    assert_eq!(outcome, Outcome::Passed);
}

#[tokio::test]
#[ignore = "requires a local Chrome binary"]
async fn test_exploratory_scenario_without_expect_passes() {
    let yaml = r#"
name: browse-landing
steps:
  - action: navigate
    url: /login.html
  - action: assert_visible
    text: Welcome to Draftwise
  - action: wait
    ms: 200
"#;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let outcome = runner::run_scenario(&scenario, &test_config()).await;
    assert_eq!(outcome, Outcome::Passed);
}

#[tokio::test]
#[ignore = "requires a local Chrome binary"]
async fn test_delayed_text_is_awaited() {
    // The fixture sets the status text after 800ms; the assertion polls.
    let yaml = r#"
name: knowledge-update
steps:
  - action: navigate
    url: /dynamic.html
expect:
  text: Knowledge item updated successfully
  timeout_ms: 5000
"#;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let outcome = runner::run_scenario(&scenario, &test_config()).await;
    assert_eq!(outcome, Outcome::Passed);
}

#[tokio::test]
#[ignore = "requires a local Chrome binary"]
async fn test_protected_route_redirects_to_sign_in() {
    let yaml = r#"
name: protected-route
steps:
  - action: navigate
    url: /protected.html
expect:
  text: Sign In
  timeout_ms: 5000
"#;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let outcome = runner::run_scenario(&scenario, &test_config()).await;
    assert_eq!(outcome, Outcome::Passed);
}

// ── Failure reporting ───────────────────────────────────────────────────

#[tokio::test]
#[ignore = "requires a local Chrome binary"]
async fn test_invalid_credentials_fail_at_expectation() {
    let scenario = sign_in_scenario(Some("value: wrong-password"));
    let outcome = runner::run_scenario(&scenario, &test_config()).await;
    match outcome {
        Outcome::Failed { step, reason } => {
            // The trailing expectation reports as steps.len() + 1.
            assert_eq!(step, scenario.steps.len() + 1);
            assert!(reason.contains("Dashboard"), "reason was: {}", reason);
            assert!(reason.contains("sign-in"), "reason was: {}", reason);
        }
        Outcome::Passed => panic!("wrong password must not reach the dashboard"),
    }
}

#[tokio::test]
#[ignore = "requires a local Chrome binary"]
async fn test_missing_element_fails_step_with_locator() {
    let yaml = r##"
name: missing-element
steps:
  - action: navigate
    url: /login.html
  - action: click
    locator: { css: "#does-not-exist" }
    timeout_ms: 1000
"##;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let outcome = runner::run_scenario(&scenario, &test_config()).await;
    match outcome {
        Outcome::Failed { step, reason } => {
            assert_eq!(step, 2);
            assert!(reason.contains("#does-not-exist"), "reason was: {}", reason);
        }
        Outcome::Passed => panic!("clicking a missing element must fail"),
    }
}

#[tokio::test]
#[ignore = "requires a local Chrome binary"]
async fn test_fill_readonly_field_is_not_interactable() {
    let yaml = r##"
name: readonly-fill
steps:
  - action: navigate
    url: /dynamic.html
  - action: fill
    locator: { css: "#readonly-field" }
    value: new text
    timeout_ms: 1000
"##;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let outcome = runner::run_scenario(&scenario, &test_config()).await;
    match outcome {
        Outcome::Failed { step, reason } => {
            assert_eq!(step, 2);
            assert!(reason.contains("readonly"), "reason was: {}", reason);
        }
        Outcome::Passed => panic!("filling a readonly field must fail"),
    }
}

#[tokio::test]
#[ignore = "requires a local Chrome binary"]
async fn test_inline_assertion_failure_names_scenario() {
    let yaml = r#"
name: inline-assert
steps:
  - action: navigate
    url: /login.html
  - action: assert_visible
    text: No Such Banner
    timeout_ms: 500
"#;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let outcome = runner::run_scenario(&scenario, &test_config()).await;
    match outcome {
        Outcome::Failed { step, reason } => {
            assert_eq!(step, 2);
            assert!(reason.contains("No Such Banner"), "reason was: {}", reason);
            assert!(reason.contains("inline-assert"), "reason was: {}", reason);
        }
        Outcome::Passed => panic!("absent text must fail the assertion step"),
    }
}

#[tokio::test]
#[ignore = "requires a local Chrome binary"]
async fn test_navigation_timeout_is_reported() {
    // Blackhole address: the connect attempt outlives the navigation timeout.
    let yaml = r#"
name: unreachable
steps:
  - action: navigate
    url: http://10.255.255.1:81/
"#;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let config = Config {
        navigation_timeout_ms: 500,
        ..test_config()
    };
    let outcome = runner::run_scenario(&scenario, &config).await;
    match outcome {
        Outcome::Failed { step, reason } => {
            assert_eq!(step, 1);
            assert!(
                reason.contains("timed out") || reason.contains("10.255.255.1"),
                "reason was: {}",
                reason
            );
        }
        Outcome::Passed => panic!("an unroutable URL must not navigate"),
    }
}

#[tokio::test]
#[ignore = "requires a local Chrome binary"]
async fn test_budget_aborts_overlong_scenario() {
    let yaml = r#"
name: stuck-scenario
steps:
  - action: navigate
    url: /login.html
  - action: wait
    ms: 10000
"#;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let config = Config {
        budget_secs: 1,
        ..test_config()
    };
    let outcome = runner::run_scenario(&scenario, &config).await;
    match outcome {
        Outcome::Failed { reason, .. } => {
            assert!(reason.contains("budget"), "reason was: {}", reason);
        }
        Outcome::Passed => panic!("scenario must be aborted at its budget"),
    }
}

// ── Teardown ────────────────────────────────────────────────────────────

#[tokio::test]
#[ignore = "requires a local Chrome binary"]
async fn test_failed_scenario_still_releases_session() {
    let config = test_config();
    let session = Session::launch(&config).await.unwrap();
    let profile = session.profile_path().to_path_buf();
    assert!(profile.exists(), "session should own a live profile dir");

    let yaml = r##"
name: doomed
steps:
  - action: navigate
    url: /login.html
  - action: click
    locator: { css: "#missing" }
    timeout_ms: 500
"##;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let outcome = runner::run(&session, &scenario, &config).await;
    assert!(!outcome.passed());

    // `close` consumes the session, so a second teardown can't compile;
    // releasing after a failed run must still remove the profile.
    session.close().await;
    assert!(
        !profile.exists(),
        "temp profile should be gone after release"
    );
}

// ── Idempotence ─────────────────────────────────────────────────────────

#[tokio::test]
#[ignore = "requires a local Chrome binary"]
async fn test_same_scenario_fresh_session_same_outcome() {
    let scenario = sign_in_scenario(None);
    let config = test_config();
    let first = runner::run_scenario(&scenario, &config).await;
    let second = runner::run_scenario(&scenario, &config).await;
    assert_eq!(first, second);
    assert_eq!(first, Outcome::Passed);
}
