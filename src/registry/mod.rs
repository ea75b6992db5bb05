//! Element registries: type definitions, the eager editor registry and the
//! lazy storefront registry.

pub mod alias;
pub mod builtin;
pub mod definition;
pub mod editor;
pub mod kind;
pub mod storefront;

pub use alias::AliasTable;
pub use builtin::builtin_types;
pub use definition::{
    escape_html, Category, ElementRenderer, ElementType, MarkupRenderer, RenderContext,
    RenderProps,
};
pub use editor::{EditorRegistry, ElementTypes};
pub use kind::ElementKind;
pub use storefront::{
    Availability, LoadError, LoadFuture, Lookup, ModuleLoader, RegistryEvent, StorefrontRegistry,
};
