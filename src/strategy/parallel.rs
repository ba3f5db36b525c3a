//! Parallel Batch Encoding
//!
//! Uses Rayon to encode many independent inputs with one shared encoder.
//! The encoder is read-only, so no synchronization is needed.

use std::borrow::Cow;

use rayon::prelude::*;

use crate::encoder::HtmlEncoder;

/// Encode each UTF-8 input in parallel, preserving order.
/// Absent inputs stay absent; invalid UTF-8 is repaired with U+FFFD.
pub fn encode_parallel(encoder: &HtmlEncoder, inputs: &[Option<&[u8]>]) -> Vec<Option<String>> {
    inputs
        .par_iter()
        .map(|&input| encoder.encode_lossy(input).map(Cow::into_owned))
        .collect()
}
