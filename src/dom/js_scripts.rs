//! JavaScript evaluated by the Chrome driver
//!
//! Element operations are sent as small function expressions that receive the
//! resolved element. Every evaluation returns an envelope
//! `{ stale: bool, value: any }` so "element gone" is distinguishable from a
//! legitimate `null` value.

/// Resolves an element path (`[{selector, index}, ...]`) from the document root
pub const RESOLVE_ELEMENT: &str = r"
    function resolveElementPath(path) {
        let scope = document;
        let el = null;
        for (const step of path) {
            const matches = scope.querySelectorAll(step.selector);
            el = matches[step.index] || null;
            if (!el) {
                return null;
            }
            scope = el;
        }
        return el;
    }
";

/// Rendered text, falling back to `textContent` for hidden nodes
pub const ELEMENT_TEXT: &str = r"(el) => {
    const text = el.innerText;
    return (text === undefined || text === null) ? el.textContent : text;
}";

pub const ELEMENT_ATTRIBUTE: &str = r"(el, name) => {
    if (name === 'href' && el.href) {
        return el.href;
    }
    return el.getAttribute(name);
}";

/// Visible when rendered with a non-empty box and not hidden by style
pub const ELEMENT_VISIBLE: &str = r"(el) => {
    const style = window.getComputedStyle(el);
    if (style.display === 'none' || style.visibility === 'hidden' || style.opacity === '0') {
        return false;
    }
    const rect = el.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
}";

/// Scrolls the element to the viewport centre and reports its click point
pub const ELEMENT_CLICK_POINT: &str = r"(el) => {
    el.scrollIntoView({ block: 'center', inline: 'center' });
    const rect = el.getBoundingClientRect();
    return { x: rect.left + rect.width / 2, y: rect.top + rect.height / 2 };
}";

pub const ELEMENT_SCROLL_INTO_VIEW: &str = r"(el) => {
    el.scrollIntoView({ block: 'center' });
    return true;
}";

pub const ELEMENT_JS_CLICK: &str = r"(el) => {
    el.scrollIntoView({ block: 'center' });
    el.click();
    return true;
}";

/// Number of matches for a selector inside a scope element
pub const COUNT_WITHIN: &str = r"(el, selector) => el.querySelectorAll(selector).length";

pub const SCROLL_TO_BOTTOM: &str = r"
    (() => {
        window.scrollTo(0, Math.max(document.body.scrollHeight, document.documentElement.scrollHeight));
        return { stale: false, value: true };
    })()
";

pub const SCROLL_TO_TOP: &str = r"
    (() => {
        window.scrollTo(0, 0);
        return { stale: false, value: true };
    })()
";

pub const DOCUMENT_HEIGHT: &str = r"
    (() => ({
        stale: false,
        value: Math.max(
            document.body ? document.body.scrollHeight : 0,
            document.documentElement ? document.documentElement.scrollHeight : 0
        )
    }))()
";

pub const READY_STATE: &str = r"
    (() => ({ stale: false, value: document.readyState }))()
";

/// Apply an element operation to the element at `path_json`
#[must_use]
pub fn element_operation(path_json: &str, operation: &str, arg_json: &str) -> String {
    format!(
        "(() => {{ {RESOLVE_ELEMENT} \
         const el = resolveElementPath({path_json}); \
         if (!el) {{ return {{ stale: true, value: null }}; }} \
         const value = ({operation})(el, {arg_json}); \
         return {{ stale: false, value: value === undefined ? null : value }}; }})()"
    )
}

/// Count matches of `selector_json` in the document
#[must_use]
pub fn count_in_document(selector_json: &str) -> String {
    format!(
        "(() => ({{ stale: false, value: document.querySelectorAll({selector_json}).length }}))()"
    )
}

/// Wrap caller-supplied script source as a function applied to `args_json`
#[must_use]
pub fn user_script(source: &str, args_json: &str) -> String {
    format!(
        "(() => {{ const value = (function() {{ {source} }}).apply(null, {args_json}); \
         return {{ stale: false, value: value === undefined ? null : value }}; }})()"
    )
}
