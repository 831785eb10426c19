use serde::Deserialize;

use crate::app::TrawlError;
use crate::domain::Item;
use crate::surface::{BatchEntry, SurfaceConfig};

/// State of the reveal control as seen by [`SurfaceScripts::reveal_probe`].
pub const REVEAL_MISSING: &str = "missing";
pub const REVEAL_HIDDEN: &str = "hidden";
pub const REVEAL_READY: &str = "ready";

/// JavaScript snippets evaluated in the page, built once from configuration.
///
/// Selectors are embedded as JSON string literals so quotes in them cannot
/// break out of the script.
#[derive(Debug, Clone)]
pub struct SurfaceScripts {
    extract_items: String,
    count_items: String,
    scroll: String,
    reveal_probe: String,
    reveal_click: String,
}

impl SurfaceScripts {
    pub fn new(config: &SurfaceConfig) -> Self {
        let item = js_string(&config.item_selector);
        let content = js_string(&config.content_selector);
        let id_attr = js_string(&config.id_attribute);
        let container = js_string(&config.scroll_container_selector);
        let reveal = js_string(&config.reveal_selector);
        let factor = config.scroll_factor;

        let extract_items = format!(
            r#"
            (() => {{
                const idAttr = {id_attr};
                return Array.from(document.querySelectorAll({item})).map((el, index) => {{
                    try {{
                        const id = el.getAttribute(idAttr);
                        const content = el.querySelector({content});
                        if (!content) {{
                            return {{ id, text: null, error: `item ${{index}} has no content element` }};
                        }}
                        return {{ id, text: content.innerText.trim(), error: null }};
                    }} catch (e) {{
                        return {{ id: null, text: null, error: String(e) }};
                    }}
                }});
            }})()
            "#
        );

        let count_items = format!("document.querySelectorAll({item}).length");

        let scroll = format!(
            r#"
            (() => {{
                const container = document.querySelector({container}) || document.documentElement;
                container.scrollTop += container.clientHeight * {factor};
                return container.scrollTop;
            }})()
            "#
        );

        let reveal_probe = format!(
            r#"
            (() => {{
                const el = document.querySelector({reveal});
                if (!el) return '{REVEAL_MISSING}';
                const rect = el.getBoundingClientRect();
                const style = window.getComputedStyle(el);
                const visible = rect.width > 0 && rect.height > 0
                    && style.visibility !== 'hidden' && style.display !== 'none';
                return visible && !el.disabled ? '{REVEAL_READY}' : '{REVEAL_HIDDEN}';
            }})()
            "#
        );

        let reveal_click = format!(
            r#"
            (() => {{
                const el = document.querySelector({reveal});
                if (!el) return false;
                el.click();
                return true;
            }})()
            "#
        );

        Self {
            extract_items,
            count_items,
            scroll,
            reveal_probe,
            reveal_click,
        }
    }

    /// Returns an array of `{ id, text, error }`, one per item element.
    pub fn extract_items(&self) -> &str {
        &self.extract_items
    }

    /// Returns the number of item elements.
    pub fn count_items(&self) -> &str {
        &self.count_items
    }

    /// Scrolls the item container and returns its new scroll offset.
    pub fn scroll(&self) -> &str {
        &self.scroll
    }

    /// Returns one of `missing`, `hidden` or `ready`.
    pub fn reveal_probe(&self) -> &str {
        &self.reveal_probe
    }

    /// Clicks the reveal control; returns whether it was found.
    pub fn reveal_click(&self) -> &str {
        &self.reveal_click
    }
}

/// Script returning whether a link with exactly this text is on the page.
pub fn link_text_probe(text: &str) -> String {
    let text = js_string(text);
    format!(
        "Array.from(document.querySelectorAll('a')).some(a => (a.textContent || '').trim() === {text})"
    )
}

/// One element as reported by the extraction script.
#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    pub id: Option<String>,
    pub text: Option<String>,
    pub error: Option<String>,
}

impl RawItem {
    pub fn into_entry(self, index: usize) -> BatchEntry {
        match (self.error, self.text) {
            (Some(error), _) => Err(TrawlError::AdapterTransient(error)),
            (None, Some(text)) => Ok(Item::from_parts(self.id, text)),
            (None, None) => Err(TrawlError::AdapterTransient(format!(
                "item {} returned no text",
                index
            ))),
        }
    }
}

fn js_string(value: &str) -> String {
    // Serializing a &str cannot fail.
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_embed_configured_selectors() {
        let config = SurfaceConfig::default();
        let scripts = SurfaceScripts::new(&config);

        assert!(scripts.extract_items().contains("\".Oo3vRXl7BS--Comment--_0b4e753\""));
        assert!(scripts.extract_items().contains("\"data-before-current-y\""));
        assert!(scripts.count_items().starts_with("document.querySelectorAll("));
        assert!(scripts.scroll().contains("* 8.5"));
        assert!(scripts.scroll().contains("document.documentElement"));
        assert!(scripts.reveal_probe().contains("'ready'"));
        assert!(scripts.reveal_click().contains("el.click()"));
    }

    #[test]
    fn test_selectors_with_quotes_are_escaped() {
        let config = SurfaceConfig {
            item_selector: r#"div[data-kind="review"]"#.into(),
            ..Default::default()
        };
        let scripts = SurfaceScripts::new(&config);
        assert!(scripts
            .count_items()
            .contains(r#""div[data-kind=\"review\"]""#));
    }

    #[test]
    fn test_link_text_probe() {
        let script = link_text_probe("我的淘宝");
        assert!(script.contains("\"我的淘宝\""));
    }

    #[test]
    fn test_raw_item_with_text_becomes_item() {
        let raw: RawItem =
            serde_json::from_str(r#"{"id": "120", "text": "nice", "error": null}"#).unwrap();
        let item = raw.into_entry(0).unwrap();
        assert_eq!(item, Item::new("120", "nice"));
    }

    #[test]
    fn test_raw_item_without_id_is_anonymous() {
        let raw: RawItem =
            serde_json::from_str(r#"{"id": null, "text": "nice", "error": null}"#).unwrap();
        assert_eq!(raw.into_entry(0).unwrap().id(), None);
    }

    #[test]
    fn test_raw_item_error_is_transient() {
        let raw: RawItem = serde_json::from_str(
            r#"{"id": "3", "text": null, "error": "item 3 has no content element"}"#,
        )
        .unwrap();
        let err = raw.into_entry(3).unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn test_raw_item_with_nothing_is_transient() {
        let raw: RawItem = serde_json::from_str(r#"{"id": null}"#).unwrap();
        assert!(raw.into_entry(5).unwrap_err().is_transient());
    }
}
