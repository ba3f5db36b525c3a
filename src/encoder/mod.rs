//! Context-specific output encoders
//!
//! - Html: escapes for HTML text and quoted attribute values
//! - Cache: encoders built from block-name lists, shared through an LRU

pub mod cache;
pub mod html;

pub use cache::{CacheError, EncoderCache};
pub use html::HtmlEncoder;
