//! DOM probes shared by the flows.
//!
//! The dashboard's buttons carry no stable ids or classes, so actionable
//! elements are resolved by their visible label: a tree walk over the
//! document that returns a CSS path for the first match.

use eoka::Page;

use crate::Result;

/// Find an actionable element by label - returns a CSS selector.
const FIND_ACTIONABLE_JS: &str = r#"(() => {
    const needle = __LABEL__.toLowerCase();
    const walker = document.createTreeWalker(document.body, NodeFilter.SHOW_ELEMENT, null);
    while (walker.nextNode()) {
        const el = walker.currentNode;
        if (!el.matches('a, button, input, [role="button"], [onclick]')) continue;
        const label = (el.textContent || el.value || '').trim().toLowerCase();
        if (!label.includes(needle)) continue;
        if (el.id) return '#' + CSS.escape(el.id);
        const path = [];
        let node = el;
        while (node && node !== document.body) {
            let sel = node.tagName.toLowerCase();
            if (node.id) {
                path.unshift('#' + CSS.escape(node.id));
                break;
            }
            const siblings = Array.from(node.parentNode ? node.parentNode.children : []);
            if (siblings.length > 1) sel += ':nth-child(' + (siblings.indexOf(node) + 1) + ')';
            path.unshift(sel);
            node = node.parentNode;
        }
        return path.join(' > ');
    }
    return null;
})()"#;

/// Resolve a clickable element by its visible label.
pub async fn find_by_text(page: &Page, text: &str) -> Result<Option<String>> {
    let js = FIND_ACTIONABLE_JS.replace("__LABEL__", &quote(text));
    let selector: Option<String> = page.evaluate(&js).await?;
    Ok(selector)
}

/// Whether a selector matches anything on the page.
pub async fn element_exists(page: &Page, selector: &str) -> Result<bool> {
    let js = format!("!!document.querySelector({})", quote(selector));
    Ok(page.evaluate(&js).await?)
}

/// Whether a selector matches an element with a layout box.
pub async fn element_visible(page: &Page, selector: &str) -> Result<bool> {
    let js = format!(
        "(() => {{ const el = document.querySelector({}); if (!el) return false; const r = el.getBoundingClientRect(); return r.width > 0 && r.height > 0; }})()",
        quote(selector)
    );
    Ok(page.evaluate(&js).await?)
}

/// Current non-empty value of a form field, if the field exists and has one.
pub async fn field_value(page: &Page, selector: &str) -> Result<Option<String>> {
    let js = format!(
        "(() => {{ const el = document.querySelector({}); return el && el.value ? el.value : null; }})()",
        quote(selector)
    );
    Ok(page.evaluate(&js).await?)
}

/// Quote a string for safe embedding into injected JavaScript.
fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("Pay"), "\"Pay\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("line\nbreak"), "\"line\\nbreak\"");
    }

    #[test]
    fn test_label_substitution() {
        let js = FIND_ACTIONABLE_JS.replace("__LABEL__", &quote("Create Invoice"));
        assert!(js.contains("\"Create Invoice\".toLowerCase()"));
        assert!(!js.contains("__LABEL__"));
    }
}
