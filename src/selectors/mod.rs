use std::fmt;

use serde::Deserialize;

/// A rule identifying the DOM element a step acts on. Recorded suites tend
/// to use absolute structural XPaths, which break on any layout change; the
/// semantic variants (test id, label, role) survive restyling, so scenarios
/// should prefer them. First match wins when several elements qualify.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locator {
    /// CSS selector, e.g. `#submit-btn`.
    Css(String),
    /// Case-insensitive substring of visible text content.
    Text(String),
    /// XPath expression; kept for imported recordings.
    Xpath(String),
    /// `data-testid` attribute value.
    TestId(String),
    /// Form control reached through its `<label>` text, falling back to
    /// `aria-label` and `placeholder`.
    Label(String),
    /// ARIA role (explicit or implicit), optionally narrowed by
    /// accessible-name substring.
    Role { role: String, name: Option<String> },
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css '{}'", s),
            Locator::Text(s) => write!(f, "text '{}'", s),
            Locator::Xpath(s) => write!(f, "xpath '{}'", s),
            Locator::TestId(s) => write!(f, "test id '{}'", s),
            Locator::Label(s) => write!(f, "label '{}'", s),
            Locator::Role { role, name: None } => write!(f, "role '{}'", role),
            Locator::Role {
                role,
                name: Some(name),
            } => write!(f, "role '{}' named '{}'", role, name),
        }
    }
}

impl Locator {
    /// Compile to a JS expression resolving to the first matching element,
    /// or null. Interaction code embeds this into larger page scripts.
    pub fn to_js(&self) -> String {
        match self {
            Locator::Css(selector) => {
                format!("document.querySelector({})", js_string(selector))
            }
            Locator::Text(text) => format!(
                r#"(() => {{
                    const target = {}.toLowerCase();
                    const walker = document.createTreeWalker(document.body, NodeFilter.SHOW_TEXT, null);
                    while (walker.nextNode()) {{
                        if (walker.currentNode.textContent.trim().toLowerCase().includes(target)) {{
                            return walker.currentNode.parentElement;
                        }}
                    }}
                    return null;
                }})()"#,
                js_string(text)
            ),
            Locator::Xpath(expr) => format!(
                "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                js_string(expr)
            ),
            Locator::TestId(id) => format!(
                "document.querySelector('[data-testid=' + {} + ']')",
                js_string(&js_quoted(id))
            ),
            Locator::Label(text) => format!(
                r#"(() => {{
                    const target = {target};
                    const lower = target.toLowerCase();
                    for (const label of document.querySelectorAll('label')) {{
                        if (!(label.textContent || '').trim().toLowerCase().includes(lower)) continue;
                        if (label.htmlFor) {{
                            const el = document.getElementById(label.htmlFor);
                            if (el) return el;
                        }}
                        const inner = label.querySelector('input, textarea, select');
                        if (inner) return inner;
                    }}
                    return document.querySelector('[aria-label*=' + {quoted} + ' i]')
                        || document.querySelector('[placeholder*=' + {quoted} + ' i]');
                }})()"#,
                target = js_string(text),
                quoted = js_string(&js_quoted(text))
            ),
            Locator::Role { role, name } => {
                let name_js = match name {
                    Some(n) => js_string(n),
                    None => "null".to_string(),
                };
                format!(
                    r#"(() => {{
                        const role = {role};
                        const name = {name};
                        const implicit = {{
                            button: 'button, input[type=button], input[type=submit]',
                            link: 'a[href]',
                            textbox: 'input:not([type]), input[type=text], input[type=email], input[type=password], input[type=search], textarea',
                            checkbox: 'input[type=checkbox]',
                            radio: 'input[type=radio]',
                            combobox: 'select',
                            heading: 'h1, h2, h3, h4, h5, h6'
                        }};
                        let sel = '[role=' + {role_quoted} + ']';
                        if (implicit[role]) sel += ', ' + implicit[role];
                        for (const el of document.querySelectorAll(sel)) {{
                            if (name === null) return el;
                            const accessible = (el.getAttribute('aria-label') || el.textContent || el.value || '')
                                .trim().toLowerCase();
                            if (accessible.includes(name.toLowerCase())) return el;
                        }}
                        return null;
                    }})()"#,
                    role = js_string(role),
                    name = name_js,
                    role_quoted = js_string(&js_quoted(role))
                )
            }
        }
    }
}

/// Serialize a Rust string as a JS string literal.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Wrap a value in double quotes for use inside a CSS attribute selector.
fn js_quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
