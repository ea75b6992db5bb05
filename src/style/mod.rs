//! Style pipeline: values, shorthand expansion, color alpha, background
//! compositing, responsive merge, per-kind rendering and CSS emission.

pub mod background;
pub mod color;
pub mod device;
pub mod emitter;
pub mod merge;
pub mod properties;
pub mod render;
pub mod shorthand;
pub mod tokenizer;
pub mod value;

pub use background::{BackgroundInput, ImageMode};
pub use device::Device;
pub use emitter::CssEmitter;
pub use merge::resolve_responsive;
pub use render::{ResolveStyle, ResolvedStyle, StyleMemo};
pub use shorthand::Sides;
pub use value::{PropertyMap, Responsive, StyleBag, StyleValue};
