//! Scoped CSS injection manager.
//!
//! Keeps at most one `<style>` element per node id in a [`StyleHost`]. The
//! manager caches what it was asked to apply, so the whole set can be
//! removed ([`cleanup_all`](CssInjectionManager::cleanup_all)) and restored
//! ([`reapply_all_cached_css`](CssInjectionManager::reapply_all_cached_css))
//! when the editor canvas is torn down and rebuilt.
//!
//! Custom CSS is a declaration list (`color: red; padding: 4px`) and is
//! wrapped in three selectors scoped to the element anchor:
//!
//! ```text
//! #anchor,
//! #anchor.element-{id},
//! #anchor *:not(.element-toolbar):not(.floating-toolbar):not([data-editor-ui]) {
//!   <custom css>
//! }
//! ```
//!
//! CSS that already contains rule blocks passes through unwrapped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::config::BuilderConfig;
use crate::inject::host::{StyleElement, StyleHost, StyleKey};
use crate::style::emitter::CssEmitter;
use crate::tree::node::Element;

/// What was last applied for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Cached {
    anchor: String,
    /// Raw custom CSS, wrapped on insert.
    css: String,
    /// Pre-scoped responsive rules from the emitter.
    rules: String,
}

pub struct CssInjectionManager<H: StyleHost> {
    host: H,
    config: BuilderConfig,
    cache: HashMap<String, Cached>,
    injected: HashMap<String, StyleKey>,
}

impl<H: StyleHost> CssInjectionManager<H> {
    /// Take ownership of a host and start managing its style elements.
    pub fn init(host: H, config: &BuilderConfig) -> Self {
        Self {
            host,
            config: config.clone(),
            cache: HashMap::new(),
            injected: HashMap::new(),
        }
    }

    /// Remove every injected element and hand the host back.
    pub fn teardown(mut self) -> H {
        self.cleanup_all();
        self.host
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Apply a node's custom CSS. Responsive rules previously applied for
    /// the node are kept.
    pub fn apply_css(&mut self, id: &str, anchor: &str, css: &str) {
        let entry = self.cache.entry(id.to_owned()).or_default();
        entry.anchor = anchor.to_owned();
        entry.css = css.to_owned();
        self.sync(id);
    }

    /// Apply a node's responsive rules. Custom CSS previously applied for the
    /// node is kept.
    pub fn apply_rules(&mut self, id: &str, anchor: &str, rules: &str) {
        let entry = self.cache.entry(id.to_owned()).or_default();
        entry.anchor = anchor.to_owned();
        entry.rules = rules.to_owned();
        self.sync(id);
    }

    /// Apply both the custom CSS and the emitted responsive rules of an
    /// element.
    pub fn apply_element(&mut self, element: &Element, emitter: &CssEmitter) {
        let css = element
            .style
            .get("customCss")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_owned();
        let rules = emitter.emit(element);
        self.cache.insert(
            element.id.clone(),
            Cached {
                anchor: element.anchor().to_owned(),
                css,
                rules,
            },
        );
        self.sync(&element.id);
    }

    /// Remove a node's style element and forget its cached CSS.
    pub fn remove_css(&mut self, id: &str) {
        self.cache.remove(id);
        self.remove_injected(id);
    }

    /// Remove every style element this manager injected. The cache is kept,
    /// so [`reapply_all_cached_css`](Self::reapply_all_cached_css) can
    /// restore them. Safe to call repeatedly.
    pub fn cleanup_all(&mut self) {
        let ids: Vec<String> = self.injected.keys().cloned().collect();
        for id in ids {
            self.remove_injected(&id);
        }
    }

    /// Re-inject every cached entry, in id order.
    pub fn reapply_all_cached_css(&mut self) {
        let mut ids: Vec<String> = self.cache.keys().cloned().collect();
        ids.sort_unstable();
        for id in ids {
            self.sync(&id);
        }
    }

    /// Number of nodes with cached CSS.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_injected(&self, id: &str) -> bool {
        self.injected.contains_key(id)
    }

    /// Bring the host in line with the cache entry for `id`.
    fn sync(&mut self, id: &str) {
        let Some(cached) = self.cache.get(id) else {
            return;
        };
        let anchor = cached.anchor.trim();
        let text = self.style_text(id, cached);
        if anchor.is_empty() || text.is_empty() {
            debug!(id, "no anchor or no CSS; style skipped");
            self.remove_injected(id);
            return;
        }

        if let Some(current) = self.injected.get(id).and_then(|key| self.host.get(*key)) {
            if current.anchor == anchor && current.css == text {
                trace!(id, "style already in sync");
                return;
            }
        }
        let style = StyleElement::new(id, anchor, text);
        self.remove_injected(id);
        let key = self.host.insert_style(style);
        self.injected.insert(id.to_owned(), key);
    }

    fn remove_injected(&mut self, id: &str) {
        if let Some(key) = self.injected.remove(id) {
            self.host.remove_style(key);
        }
        // Elements left behind by an earlier manager for the same host.
        for key in self.host.find_by_element_id(id) {
            self.host.remove_style(key);
        }
    }

    fn style_text(&self, id: &str, cached: &Cached) -> String {
        let mut parts = Vec::new();
        let css = cached.css.trim();
        if !css.is_empty() {
            parts.push(self.wrap(id, cached.anchor.trim(), css));
        }
        let rules = cached.rules.trim();
        if !rules.is_empty() {
            parts.push(rules.to_owned());
        }
        parts.join("\n")
    }

    fn wrap(&self, id: &str, anchor: &str, css: &str) -> String {
        if css.contains('{') {
            return css.to_owned();
        }
        let anchor = anchor_selector(anchor);
        let chrome: String = self
            .config
            .editor_chrome
            .iter()
            .map(|selector| format!(":not({selector})"))
            .collect();
        let declarations: String = split_declarations(css)
            .into_iter()
            .map(|d| format!("  {d};\n"))
            .collect();
        format!(
            "{anchor},\n{anchor}.{class},\n{anchor} *{chrome} {{\n{declarations}}}",
            class = self.config.element_class(id),
        )
    }
}

/// Split a declaration list on the `;` that end declarations. Semicolons
/// inside quotes or parentheses (`url("data:image/svg+xml;utf8,…")`,
/// `content: "a;b"`) belong to the value and are kept.
fn split_declarations(css: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, ch) in css.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                out.push(&css[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&css[start..]);
    out.into_iter().map(str::trim).filter(|d| !d.is_empty()).collect()
}

/// Selector for an anchor. Anchors that already are selectors pass through;
/// identifiers become `#anchor`; anything else is matched by attribute.
pub fn anchor_selector(anchor: &str) -> String {
    let anchor = anchor.trim();
    if anchor.starts_with(['#', '.', '[']) {
        return anchor.to_owned();
    }
    let starts_ok = anchor
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '-');
    let rest_ok = anchor
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if starts_ok && rest_ok {
        format!("#{anchor}")
    } else {
        format!("[id=\"{}\"]", anchor.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

// ---------------------------------------------------------------------------
// Shared manager and scope guard
// ---------------------------------------------------------------------------

/// A manager shared between the components of one editor canvas.
pub type SharedInjectionManager<H> = Rc<RefCell<CssInjectionManager<H>>>;

/// Wrap a manager for sharing.
pub fn shared<H: StyleHost>(manager: CssInjectionManager<H>) -> SharedInjectionManager<H> {
    Rc::new(RefCell::new(manager))
}

/// Applies a node's CSS on creation and removes it on drop.
///
/// Holds only a weak reference: a guard that outlives its manager does
/// nothing on drop.
pub struct CssScope<H: StyleHost> {
    manager: Weak<RefCell<CssInjectionManager<H>>>,
    id: String,
}

impl<H: StyleHost> CssScope<H> {
    pub fn apply(manager: &SharedInjectionManager<H>, id: &str, anchor: &str, css: &str) -> Self {
        manager.borrow_mut().apply_css(id, anchor, css);
        Self {
            manager: Rc::downgrade(manager),
            id: id.to_owned(),
        }
    }

    /// Apply an element's custom CSS and responsive rules.
    pub fn apply_element(
        manager: &SharedInjectionManager<H>,
        element: &Element,
        emitter: &CssEmitter,
    ) -> Self {
        manager.borrow_mut().apply_element(element, emitter);
        Self {
            manager: Rc::downgrade(manager),
            id: element.id.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl<H: StyleHost> Drop for CssScope<H> {
    fn drop(&mut self) {
        let Some(manager) = self.manager.upgrade() else {
            return;
        };
        match manager.try_borrow_mut() {
            Ok(mut manager) => manager.remove_css(&self.id),
            Err(_) => debug!(id = %self.id, "manager busy; style left for cleanup_all"),
        };
    }
}
