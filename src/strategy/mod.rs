//! Encoding Strategy Module
//!
//! - Single: `HtmlEncoder::encode_str` / `encode_utf16` on the calling thread
//! - Parallel: many independent inputs spread across the rayon pool

pub mod parallel;
