use std::time::{Duration, Instant};

use chromiumoxide::page::Page;

use crate::error::{HarnessError, Result};
use crate::selectors::Locator;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Wait until the locator resolves to a visible element. Errors with
/// ElementNotFound once the timeout elapses.
pub async fn wait_for_locator(page: &Page, locator: &Locator, timeout: Duration) -> Result<()> {
    let check_js = format!(
        r#"(() => {{
            const el = {};
            if (!el) return false;
            const style = getComputedStyle(el);
            const rect = el.getBoundingClientRect();
            return style.display !== 'none'
                && style.visibility !== 'hidden'
                && rect.width > 0
                && rect.height > 0;
        }})()"#,
        locator.to_js()
    );

    if poll(page, &check_js, timeout).await {
        Ok(())
    } else {
        Err(HarnessError::ElementNotFound {
            locator: locator.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }
}

/// Poll until an element containing `text` is visible. Returns whether it
/// appeared within the timeout; the caller decides what a miss means.
pub async fn wait_for_text(page: &Page, text: &str, timeout: Duration) -> bool {
    let target = serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string());
    let check_js = format!(
        r#"(() => {{
            const target = {target}.toLowerCase();
            if (!document.body) return false;
            const walker = document.createTreeWalker(document.body, NodeFilter.SHOW_TEXT, null);
            while (walker.nextNode()) {{
                const node = walker.currentNode;
                if (!node.textContent.toLowerCase().includes(target)) continue;
                const el = node.parentElement;
                if (!el) continue;
                const style = getComputedStyle(el);
                const rect = el.getBoundingClientRect();
                if (style.display !== 'none'
                    && style.visibility !== 'hidden'
                    && rect.width > 0
                    && rect.height > 0) return true;
            }}
            return false;
        }})()"#,
        target = target
    );

    poll(page, &check_js, timeout).await
}

/// Evaluate `check_js` every 100ms until it returns true or time runs out.
/// Evaluation errors count as "not yet" — the page may be mid-navigation.
async fn poll(page: &Page, check_js: &str, timeout: Duration) -> bool {
    let start = Instant::now();
    loop {
        let found: bool = match page.evaluate(check_js).await {
            Ok(result) => result.into_value().unwrap_or(false),
            Err(_) => false,
        };

        if found {
            return true;
        }
        if start.elapsed() >= timeout {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
