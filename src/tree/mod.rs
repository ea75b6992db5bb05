//! The layout tree: document model, layout keys, deep clone and structural
//! operations.

pub mod clone;
pub mod content;
pub mod layout;
pub mod node;
pub mod ops;

pub use content::Content;
pub use layout::{column_weights, layout_keys};
pub use node::{Column, Document, Element, NodeKind, Row, Section, SectionWidth, TreeError};
pub use ops::ElementUpdate;
