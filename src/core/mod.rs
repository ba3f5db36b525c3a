//! Core encoding primitives
//!
//! - Unicode: defined-character table and UTF-16 scalar decoding
//! - Entities: named and numeric HTML character references
//! - Encoding: UTF-16 byte order detection and byte/unit conversion

pub mod encoding;
pub mod entities;
pub mod unicode;
