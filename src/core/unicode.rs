//! Unicode Code Point Helpers
//!
//! - Defined-character table: one bit per BMP code point, set when the code
//!   point is assigned in Unicode 14.0.0 and not in one of the categories
//!   Cc, Cs, Co, Cn, Zl, Zp
//! - Scalar decoding: reads one scalar value from UTF-16, substituting
//!   U+FFFD for unpaired surrogates

use std::sync::OnceLock;

/// Substituted for every ill-formed UTF-16 sequence.
pub const REPLACEMENT_CHAR: u32 = 0xFFFD;

const TABLE_BYTES: usize = 8 * 1024;
const TABLE_WORDS: usize = TABLE_BYTES / 4;

// The array type pins the length: a resource of any other size fails the build.
static DEFINED_CHARS_DATA: &[u8; TABLE_BYTES] =
    include_bytes!("../../data/unicode-14.0.0-defined-characters.bin");

/// Bitmap of all BMP code points which are "defined" for encoding purposes.
pub struct DefinedCharacterTable {
    bitmap: [u32; TABLE_WORDS],
}

impl DefinedCharacterTable {
    /// Build a table from 2048 little-endian 32-bit words.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is not exactly 8192 bytes long.
    pub fn from_le_bytes(data: &[u8]) -> Result<Self, &'static str> {
        if data.len() != TABLE_BYTES {
            return Err("Corrupt defined-character table: expected 8192 bytes");
        }

        let mut bitmap = [0u32; TABLE_WORDS];
        for (word, chunk) in bitmap.iter_mut().zip(data.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(DefinedCharacterTable { bitmap })
    }

    /// The process-wide table, built from the embedded resource on first use.
    #[inline]
    pub fn get() -> &'static DefinedCharacterTable {
        static TABLE: OnceLock<DefinedCharacterTable> = OnceLock::new();
        TABLE.get_or_init(load_embedded)
    }

    /// Check whether a BMP code point is defined
    #[inline]
    pub fn is_defined(&self, code_point: u16) -> bool {
        let code_point = code_point as usize;
        let index = code_point >> 5;
        let offset = code_point & 0x1F;
        (self.bitmap[index] >> offset) & 1 != 0
    }

    /// Number of defined code points in the table
    pub fn defined_count(&self) -> u32 {
        self.bitmap.iter().map(|word| word.count_ones()).sum()
    }
}

#[cold]
fn load_embedded() -> DefinedCharacterTable {
    match DefinedCharacterTable::from_le_bytes(DEFINED_CHARS_DATA) {
        Ok(table) => {
            tracing::debug!(defined = table.defined_count(), "loaded defined-character table");
            table
        }
        Err(reason) => {
            // Encoding against a corrupt table would let undefined characters through.
            tracing::error!(reason, "embedded Unicode data is corrupt, aborting");
            std::process::abort()
        }
    }
}

/// Shorthand for `DefinedCharacterTable::get().is_defined(c)`
#[inline]
pub fn is_character_defined(code_point: u16) -> bool {
    DefinedCharacterTable::get().is_defined(code_point)
}

#[inline]
pub fn is_surrogate(unit: u16) -> bool {
    (0xD800..=0xDFFF).contains(&unit)
}

#[inline]
pub fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

#[inline]
pub fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// True if the scalar needs a surrogate pair in UTF-16
#[inline]
pub fn is_supplementary(scalar: u32) -> bool {
    scalar & !0xFFFF != 0
}

/// Read the scalar value starting at `units[pos]`.
///
/// Returns the scalar and the number of code units it occupied. Unpaired
/// surrogates decode to U+FFFD and consume one unit. `pos` must be in bounds.
#[inline]
pub fn decode_scalar(units: &[u16], pos: usize) -> (u32, usize) {
    let unit = units[pos];
    if !is_surrogate(unit) {
        return (unit as u32, 1);
    }
    decode_surrogate(units, pos)
}

#[cold]
fn decode_surrogate(units: &[u16], pos: usize) -> (u32, usize) {
    let high = units[pos];
    if is_high_surrogate(high) {
        if let Some(&low) = units.get(pos + 1) {
            if is_low_surrogate(low) {
                return (combine_surrogates(high, low), 2);
            }
        }
    }
    (REPLACEMENT_CHAR, 1)
}

#[inline]
fn combine_surrogates(high: u16, low: u16) -> u32 {
    0x10000 + (((high as u32) - 0xD800) << 10) + ((low as u32) - 0xDC00)
}

/// Iterator over `(unit_offset, scalar)` pairs of a UTF-16 slice
pub struct ScalarIndices<'a> {
    units: &'a [u16],
    pos: usize,
}

impl Iterator for ScalarIndices<'_> {
    type Item = (usize, u32);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.units.len() {
            return None;
        }
        let start = self.pos;
        let (scalar, consumed) = decode_scalar(self.units, start);
        self.pos += consumed;
        Some((start, scalar))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.units.len() - self.pos;
        (remaining.div_ceil(2), Some(remaining))
    }
}

/// Walk a UTF-16 slice one scalar value at a time
#[inline]
pub fn scalar_indices(units: &[u16]) -> ScalarIndices<'_> {
    ScalarIndices { units, pos: 0 }
}
