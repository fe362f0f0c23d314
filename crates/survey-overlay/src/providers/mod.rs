//! Built-in overlay providers.

mod field;
mod resource;

pub use field::FieldOverlayProvider;
pub use resource::ResourceOverlayProvider;
