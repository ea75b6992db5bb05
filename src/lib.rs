//! # pagecraft
//!
//! The core of a visual page builder: an editable layout tree and the style
//! pipeline that turns its style bags into inline styles and scoped CSS.
//!
//! A page is a [`tree::Document`] of sections → rows → columns → elements.
//! Structural edits are pure functions in [`tree::ops`] that return a new
//! document. Each node carries a [`style::StyleBag`]: base properties plus
//! per-device override buckets. Rendering a node for a device resolves the
//! bag into a flat property map; the responsive remainder is emitted as CSS
//! and injected into the document head, scoped to the element.
//!
//! ## Core Systems
//!
//! - **[`tree`]**: Document model, layout keys, structural CRUD, deep clone
//! - **[`style`]**: Shorthands, colors, background layers, responsive merge,
//!   per-kind rendering, CSS emission
//! - **[`inject`]**: Scoped `<style>` injection with lifecycle cleanup
//! - **[`registry`]**: Element types: eager editor registry, lazy storefront
//!   registry, aliases, built-ins
//! - **[`config`]**: Breakpoints, class names, timeouts
//! - **[`id`]**: Node id generation

// Foundation
pub mod config;
pub mod id;

// Core systems
pub mod style;
pub mod tree;

// Output and registries
pub mod inject;
pub mod registry;

pub use config::BuilderConfig;
pub use id::{IdGenerator, RandomIds, SequentialIds};
pub use style::{Device, StyleBag};
pub use tree::{Document, TreeError};
