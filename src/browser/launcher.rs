use std::path::PathBuf;

use crate::config::Config;

/// Find the Chrome/Chromium binary on the current platform. Returns None if
/// nothing is found; chromiumoxide then falls back to its own detection.
pub fn find_chrome_binary() -> Option<PathBuf> {
    for candidate in chrome_candidates() {
        let path = PathBuf::from(&candidate);
        if path.exists() {
            tracing::debug!("Found Chrome at: {}", path.display());
            return Some(path);
        }
    }

    for name in &[
        "google-chrome",
        "google-chrome-stable",
        "chromium-browser",
        "chromium",
    ] {
        if let Ok(path) = which::which(name) {
            tracing::debug!("Found Chrome in PATH: {}", path.display());
            return Some(path);
        }
    }

    None
}

fn chrome_candidates() -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    #[cfg(target_os = "macos")]
    {
        candidates.extend([
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome".into(),
            "/Applications/Chromium.app/Contents/MacOS/Chromium".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            candidates.push(format!(
                "{}/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
                home
            ));
        }
    }

    #[cfg(target_os = "linux")]
    {
        candidates.extend([
            "/usr/bin/google-chrome".into(),
            "/usr/bin/google-chrome-stable".into(),
            "/usr/bin/chromium-browser".into(),
            "/usr/bin/chromium".into(),
            "/snap/bin/chromium".into(),
        ]);
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(pf) = std::env::var("PROGRAMFILES") {
            candidates.push(format!("{}\\Google\\Chrome\\Application\\chrome.exe", pf));
        }
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            candidates.push(format!("{}\\Google\\Chrome\\Application\\chrome.exe", local));
        }
    }

    candidates
}

/// Launch arguments beyond what chromiumoxide sets itself: noise
/// suppression, plus container-hardening flags when the sandbox is off.
pub fn launch_args(config: &Config) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "--no-first-run".into(),
        "--no-default-browser-check".into(),
        "--disable-background-networking".into(),
        "--disable-default-apps".into(),
        "--disable-extensions".into(),
        "--disable-hang-monitor".into(),
        "--disable-popup-blocking".into(),
        "--disable-prompt-on-repost".into(),
        "--disable-sync".into(),
        "--disable-translate".into(),
        "--metrics-recording-only".into(),
    ];

    if config.no_sandbox {
        args.push("--no-sandbox".into());
        args.push("--disable-dev-shm-usage".into());
        args.push("--disable-gpu".into());
    }

    args
}
