//! Scoped CSS injection: style hosts and the injection manager.

pub mod host;
pub mod manager;

pub use host::{HeadDocument, StyleElement, StyleHost, StyleKey};
pub use manager::{anchor_selector, shared, CssInjectionManager, CssScope, SharedInjectionManager};
