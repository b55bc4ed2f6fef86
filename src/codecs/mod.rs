//! Codec implementations

pub mod json;
pub mod text;

pub use json::JsonCodec;
pub use text::TextCodec;

// Re-export the trait for codec authors
pub use crate::core::Codec;
