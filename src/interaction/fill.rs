use std::time::Duration;

use chromiumoxide::page::Page;

use super::wait;
use crate::error::{HarnessError, Result};
use crate::selectors::Locator;

/// Clear a field and type a value into it. The value is written through the
/// native value setter and followed by `input`/`change` events so
/// framework-controlled forms observe the edit. Errors with
/// ElementNotInteractable when the element cannot accept text.
pub async fn fill(page: &Page, locator: &Locator, value: &str, timeout: Duration) -> Result<()> {
    wait::wait_for_locator(page, locator, timeout).await?;

    let selector_js = locator.to_js();

    // Focus the element and report why it can't take input, if it can't.
    let focus_js = format!(
        r#"(() => {{
            const el = {selector_js};
            if (!el) return 'element disappeared';
            el.scrollIntoView({{ block: 'center', behavior: 'instant' }});
            const tag = el.tagName;
            if (tag !== 'INPUT' && tag !== 'TEXTAREA' && !el.isContentEditable) {{
                return 'not a text input (<' + tag.toLowerCase() + '>)';
            }}
            if (el.disabled) return 'disabled';
            if (el.readOnly) return 'readonly';
            el.focus();
            return null;
        }})()"#,
        selector_js = selector_js
    );

    let refusal: Option<String> = page
        .evaluate(focus_js.as_str())
        .await?
        .into_value()
        .map_err(|e| HarnessError::Cdp(e.to_string()))?;

    if let Some(reason) = refusal {
        return Err(HarnessError::ElementNotInteractable {
            locator: locator.to_string(),
            reason,
        });
    }

    let type_js = format!(
        r#"(() => {{
            const el = {selector_js};
            const text = {text};
            if (el.tagName === 'INPUT' || el.tagName === 'TEXTAREA') {{
                const proto = el.tagName === 'INPUT'
                    ? window.HTMLInputElement.prototype
                    : window.HTMLTextAreaElement.prototype;
                const setter = Object.getOwnPropertyDescriptor(proto, 'value')?.set;
                if (setter) {{
                    setter.call(el, text);
                }} else {{
                    el.value = text;
                }}
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            }} else {{
                el.textContent = text;
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            }}
            return true;
        }})()"#,
        selector_js = selector_js,
        text = serde_json::to_string(value)?
    );

    page.evaluate(type_js.as_str()).await?;

    tracing::debug!(locator = %locator, chars = value.len(), "filled");

    Ok(())
}
