use std::time::Duration;

use chromiumoxide::page::Page;

use super::wait;
use crate::error::{HarnessError, Result};
use crate::selectors::Locator;

/// Hybrid click:
/// 1. Wait for the locator to resolve to a visible element
/// 2. Scroll it into view and measure it
/// 3. Dispatch real mouse events when unobscured, fall back to a JS click
pub async fn click(page: &Page, locator: &Locator, timeout: Duration) -> Result<()> {
    wait::wait_for_locator(page, locator, timeout).await?;

    let selector_js = locator.to_js();

    let check_js = format!(
        r#"(() => {{
            const el = {selector_js};
            if (!el) return {{ error: 'element disappeared' }};

            el.scrollIntoView({{ block: 'center', inline: 'center', behavior: 'instant' }});

            const rect = el.getBoundingClientRect();
            if (rect.width === 0 && rect.height === 0) {{
                return {{ error: 'element has zero size' }};
            }}

            const centerX = rect.left + rect.width / 2;
            const centerY = rect.top + rect.height / 2;

            const topEl = document.elementFromPoint(centerX, centerY);
            const unobscured = topEl && (el === topEl || el.contains(topEl) || topEl.contains(el));

            return {{ unobscured: !!unobscured }};
        }})()"#,
        selector_js = selector_js
    );

    let check_result: serde_json::Value = page
        .evaluate(check_js.as_str())
        .await?
        .into_value()
        .map_err(|e| HarnessError::Cdp(e.to_string()))?;

    if let Some(error) = check_result.get("error").and_then(|e| e.as_str()) {
        return Err(HarnessError::ElementNotFound {
            locator: format!("{} ({})", locator, error),
            timeout_ms: timeout.as_millis() as u64,
        });
    }

    let unobscured = check_result["unobscured"].as_bool().unwrap_or(false);

    // Let scroll and layout settle before dispatching events.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let click_js = if unobscured {
        format!(
            r#"(() => {{
                const el = {selector_js};
                if (!el) throw new Error('element disappeared');
                const rect = el.getBoundingClientRect();
                const opts = {{
                    bubbles: true,
                    cancelable: true,
                    clientX: rect.left + rect.width / 2,
                    clientY: rect.top + rect.height / 2,
                    button: 0
                }};
                el.dispatchEvent(new MouseEvent('mousemove', opts));
                el.dispatchEvent(new MouseEvent('mousedown', opts));
                el.dispatchEvent(new MouseEvent('mouseup', opts));
                el.dispatchEvent(new MouseEvent('click', opts));
                return true;
            }})()"#,
            selector_js = selector_js
        )
    } else {
        format!(
            r#"(() => {{
                const el = {selector_js};
                if (!el) throw new Error('element disappeared');
                el.click();
                return true;
            }})()"#,
            selector_js = selector_js
        )
    };

    page.evaluate(click_js.as_str()).await?;

    tracing::debug!(
        locator = %locator,
        method = if unobscured { "mouse_event" } else { "js_click" },
        "clicked"
    );

    Ok(())
}
