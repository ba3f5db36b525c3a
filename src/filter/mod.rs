//! Code Point Filters
//!
//! A `CodePointFilter` records which BMP code points an encoder may pass
//! through unescaped. Filters are built with chained allow/forbid calls where
//! the last write to a code point wins, then handed to an encoder.
//!
//! Filters merge through the `CodePointSource` capability rather than by
//! reading each other's bitmaps, so any source can feed any filter.

pub mod blocks;

pub use blocks::UnicodeBlock;

use crate::core::unicode::is_character_defined;

/// Anything that can enumerate a set of allowed code points.
pub trait CodePointSource {
    /// Allowed code points in strictly ascending order.
    ///
    /// The sequence is finite and every call starts it over.
    fn allowed_code_points(&self) -> Box<dyn Iterator<Item = u32> + '_>;
}

const BMP_SIZE: usize = 0x10000;
const BITMAP_WORDS: usize = BMP_SIZE / 32;

/// One bit per BMP code point
#[derive(Clone, PartialEq, Eq)]
pub struct AllowedCharsBitmap {
    words: [u32; BITMAP_WORDS],
}

impl AllowedCharsBitmap {
    /// Bitmap with nothing allowed
    pub const fn new() -> Self {
        AllowedCharsBitmap {
            words: [0; BITMAP_WORDS],
        }
    }

    #[inline]
    pub fn allow(&mut self, code_point: u16) {
        let code_point = code_point as usize;
        self.words[code_point >> 5] |= 1 << (code_point & 0x1F);
    }

    #[inline]
    pub fn forbid(&mut self, code_point: u16) {
        let code_point = code_point as usize;
        self.words[code_point >> 5] &= !(1 << (code_point & 0x1F));
    }

    #[inline]
    pub fn is_allowed(&self, code_point: u16) -> bool {
        let code_point = code_point as usize;
        (self.words[code_point >> 5] >> (code_point & 0x1F)) & 1 != 0
    }

    /// Clear every code point the defined-character table rejects
    pub fn forbid_undefined(&mut self) {
        for code_point in 0..=u16::MAX {
            if !is_character_defined(code_point) {
                self.forbid(code_point);
            }
        }
    }

    pub fn count(&self) -> u32 {
        self.words.iter().map(|word| word.count_ones()).sum()
    }

    /// Allowed code points, ascending
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..=u16::MAX)
            .filter(move |&code_point| self.is_allowed(code_point))
            .map(u32::from)
    }
}

impl Default for AllowedCharsBitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AllowedCharsBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllowedCharsBitmap")
            .field("allowed", &self.count())
            .finish()
    }
}

/// Mutable allowance set over the BMP.
///
/// Code points above U+FFFF cannot be represented; allowing or forbidding
/// them has no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePointFilter {
    bitmap: AllowedCharsBitmap,
}

impl CodePointFilter {
    /// Filter allowing `BasicLatin`
    pub fn new() -> Self {
        let mut filter = Self::empty();
        filter.allow_block(blocks::BASIC_LATIN);
        filter
    }

    /// Filter allowing nothing
    pub const fn empty() -> Self {
        CodePointFilter {
            bitmap: AllowedCharsBitmap::new(),
        }
    }

    /// Filter allowing every code point of the given blocks
    pub fn with_blocks(blocks: &[UnicodeBlock]) -> Self {
        let mut filter = Self::empty();
        filter.allow_blocks(blocks);
        filter
    }

    pub fn allow_char(&mut self, c: char) -> &mut Self {
        if let Ok(code_point) = u16::try_from(c as u32) {
            self.bitmap.allow(code_point);
        }
        self
    }

    pub fn allow_chars(&mut self, chars: impl IntoIterator<Item = char>) -> &mut Self {
        for c in chars {
            self.allow_char(c);
        }
        self
    }

    pub fn allow_block(&mut self, block: UnicodeBlock) -> &mut Self {
        for code_point in block.code_points() {
            self.bitmap.allow(code_point as u16);
        }
        self
    }

    pub fn allow_blocks(&mut self, blocks: &[UnicodeBlock]) -> &mut Self {
        for &block in blocks {
            self.allow_block(block);
        }
        self
    }

    /// Union in the code points of another source.
    ///
    /// Never removes anything already allowed. Supplementary code points
    /// offered by `source` are dropped.
    pub fn allow_filter<S: CodePointSource + ?Sized>(&mut self, source: &S) -> &mut Self {
        for code_point in source.allowed_code_points() {
            if let Ok(code_point) = u16::try_from(code_point) {
                self.bitmap.allow(code_point);
            }
        }
        self
    }

    pub fn forbid_char(&mut self, c: char) -> &mut Self {
        if let Ok(code_point) = u16::try_from(c as u32) {
            self.bitmap.forbid(code_point);
        }
        self
    }

    pub fn forbid_chars(&mut self, chars: impl IntoIterator<Item = char>) -> &mut Self {
        for c in chars {
            self.forbid_char(c);
        }
        self
    }

    pub fn forbid_block(&mut self, block: UnicodeBlock) -> &mut Self {
        for code_point in block.code_points() {
            self.bitmap.forbid(code_point as u16);
        }
        self
    }

    pub fn forbid_blocks(&mut self, blocks: &[UnicodeBlock]) -> &mut Self {
        for &block in blocks {
            self.forbid_block(block);
        }
        self
    }

    #[inline]
    pub fn is_code_point_allowed(&self, code_point: u32) -> bool {
        u16::try_from(code_point).is_ok_and(|code_point| self.bitmap.is_allowed(code_point))
    }

    /// Allowed code points, ascending
    pub fn allowed_code_points(&self) -> impl Iterator<Item = u32> + '_ {
        self.bitmap.iter()
    }

    pub(crate) fn into_bitmap(self) -> AllowedCharsBitmap {
        self.bitmap
    }
}

impl Default for CodePointFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodePointSource for CodePointFilter {
    fn allowed_code_points(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(self.bitmap.iter())
    }
}
