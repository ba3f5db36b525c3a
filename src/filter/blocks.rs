//! Unicode Block Catalog
//!
//! Named contiguous ranges from the Unicode 14.0.0 block list, restricted to
//! the Basic Multilingual Plane. Surrogate and private-use blocks are left out.

use std::ops::Range;

use super::CodePointSource;
use crate::core::unicode::is_character_defined;

/// A contiguous range of BMP code points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnicodeBlock {
    first_code_point: u32,
    size: u32,
}

impl UnicodeBlock {
    /// Block spanning `first..=last`; panics (at compile time for consts) if out of order
    pub const fn from_range(first: u32, last: u32) -> Self {
        assert!(first <= last && last <= 0xFFFF, "invalid block range");
        UnicodeBlock {
            first_code_point: first,
            size: last - first + 1,
        }
    }

    #[inline]
    pub const fn first_code_point(&self) -> u32 {
        self.first_code_point
    }

    #[inline]
    pub const fn block_size(&self) -> u32 {
        self.size
    }

    /// Every code point in the block, defined or not
    #[inline]
    pub fn code_points(&self) -> Range<u32> {
        self.first_code_point..self.first_code_point + self.size
    }
}

/// A block offers only the code points that are defined in its range.
impl CodePointSource for UnicodeBlock {
    fn allowed_code_points(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(
            self.code_points()
                .filter(|&code_point| is_character_defined(code_point as u16)),
        )
    }
}

/// The empty block
pub const NONE: UnicodeBlock = UnicodeBlock {
    first_code_point: 0,
    size: 0,
};

/// The whole BMP, U+0000..U+FFFF
pub const ALL: UnicodeBlock = UnicodeBlock::from_range(0x0000, 0xFFFF);

macro_rules! unicode_blocks {
    ($($konst:ident, $name:literal, $first:literal, $last:literal;)*) => {
        $(
            #[doc = concat!("The `", $name, "` block, `", stringify!($first), "..=", stringify!($last), "`.")]
            pub const $konst: UnicodeBlock = UnicodeBlock::from_range($first, $last);
        )*

        static CATALOG: &[(&str, UnicodeBlock)] = &[
            $(($name, $konst),)*
        ];
    };
}

unicode_blocks! {
    BASIC_LATIN, "BasicLatin", 0x0000, 0x007F;
    LATIN_1_SUPPLEMENT, "Latin1Supplement", 0x0080, 0x00FF;
    LATIN_EXTENDED_A, "LatinExtendedA", 0x0100, 0x017F;
    LATIN_EXTENDED_B, "LatinExtendedB", 0x0180, 0x024F;
    IPA_EXTENSIONS, "IPAExtensions", 0x0250, 0x02AF;
    SPACING_MODIFIER_LETTERS, "SpacingModifierLetters", 0x02B0, 0x02FF;
    COMBINING_DIACRITICAL_MARKS, "CombiningDiacriticalMarks", 0x0300, 0x036F;
    GREEK_AND_COPTIC, "GreekandCoptic", 0x0370, 0x03FF;
    CYRILLIC, "Cyrillic", 0x0400, 0x04FF;
    CYRILLIC_SUPPLEMENT, "CyrillicSupplement", 0x0500, 0x052F;
    ARMENIAN, "Armenian", 0x0530, 0x058F;
    HEBREW, "Hebrew", 0x0590, 0x05FF;
    ARABIC, "Arabic", 0x0600, 0x06FF;
    SYRIAC, "Syriac", 0x0700, 0x074F;
    ARABIC_SUPPLEMENT, "ArabicSupplement", 0x0750, 0x077F;
    THAANA, "Thaana", 0x0780, 0x07BF;
    N_KO, "NKo", 0x07C0, 0x07FF;
    SAMARITAN, "Samaritan", 0x0800, 0x083F;
    MANDAIC, "Mandaic", 0x0840, 0x085F;
    SYRIAC_SUPPLEMENT, "SyriacSupplement", 0x0860, 0x086F;
    ARABIC_EXTENDED_B, "ArabicExtendedB", 0x0870, 0x089F;
    ARABIC_EXTENDED_A, "ArabicExtendedA", 0x08A0, 0x08FF;
    DEVANAGARI, "Devanagari", 0x0900, 0x097F;
    BENGALI, "Bengali", 0x0980, 0x09FF;
    GURMUKHI, "Gurmukhi", 0x0A00, 0x0A7F;
    GUJARATI, "Gujarati", 0x0A80, 0x0AFF;
    ORIYA, "Oriya", 0x0B00, 0x0B7F;
    TAMIL, "Tamil", 0x0B80, 0x0BFF;
    TELUGU, "Telugu", 0x0C00, 0x0C7F;
    KANNADA, "Kannada", 0x0C80, 0x0CFF;
    MALAYALAM, "Malayalam", 0x0D00, 0x0D7F;
    SINHALA, "Sinhala", 0x0D80, 0x0DFF;
    THAI, "Thai", 0x0E00, 0x0E7F;
    LAO, "Lao", 0x0E80, 0x0EFF;
    TIBETAN, "Tibetan", 0x0F00, 0x0FFF;
    MYANMAR, "Myanmar", 0x1000, 0x109F;
    GEORGIAN, "Georgian", 0x10A0, 0x10FF;
    HANGUL_JAMO, "HangulJamo", 0x1100, 0x11FF;
    ETHIOPIC, "Ethiopic", 0x1200, 0x137F;
    ETHIOPIC_SUPPLEMENT, "EthiopicSupplement", 0x1380, 0x139F;
    CHEROKEE, "Cherokee", 0x13A0, 0x13FF;
    UNIFIED_CANADIAN_ABORIGINAL_SYLLABICS, "UnifiedCanadianAboriginalSyllabics", 0x1400, 0x167F;
    OGHAM, "Ogham", 0x1680, 0x169F;
    RUNIC, "Runic", 0x16A0, 0x16FF;
    TAGALOG, "Tagalog", 0x1700, 0x171F;
    HANUNOO, "Hanunoo", 0x1720, 0x173F;
    BUHID, "Buhid", 0x1740, 0x175F;
    TAGBANWA, "Tagbanwa", 0x1760, 0x177F;
    KHMER, "Khmer", 0x1780, 0x17FF;
    MONGOLIAN, "Mongolian", 0x1800, 0x18AF;
    UNIFIED_CANADIAN_ABORIGINAL_SYLLABICS_EXTENDED, "UnifiedCanadianAboriginalSyllabicsExtended", 0x18B0, 0x18FF;
    LIMBU, "Limbu", 0x1900, 0x194F;
    TAI_LE, "TaiLe", 0x1950, 0x197F;
    NEW_TAI_LUE, "NewTaiLue", 0x1980, 0x19DF;
    KHMER_SYMBOLS, "KhmerSymbols", 0x19E0, 0x19FF;
    BUGINESE, "Buginese", 0x1A00, 0x1A1F;
    TAI_THAM, "TaiTham", 0x1A20, 0x1AAF;
    COMBINING_DIACRITICAL_MARKS_EXTENDED, "CombiningDiacriticalMarksExtended", 0x1AB0, 0x1AFF;
    BALINESE, "Balinese", 0x1B00, 0x1B7F;
    SUNDANESE, "Sundanese", 0x1B80, 0x1BBF;
    BATAK, "Batak", 0x1BC0, 0x1BFF;
    LEPCHA, "Lepcha", 0x1C00, 0x1C4F;
    OL_CHIKI, "OlChiki", 0x1C50, 0x1C7F;
    CYRILLIC_EXTENDED_C, "CyrillicExtendedC", 0x1C80, 0x1C8F;
    GEORGIAN_EXTENDED, "GeorgianExtended", 0x1C90, 0x1CBF;
    SUNDANESE_SUPPLEMENT, "SundaneseSupplement", 0x1CC0, 0x1CCF;
    VEDIC_EXTENSIONS, "VedicExtensions", 0x1CD0, 0x1CFF;
    PHONETIC_EXTENSIONS, "PhoneticExtensions", 0x1D00, 0x1D7F;
    PHONETIC_EXTENSIONS_SUPPLEMENT, "PhoneticExtensionsSupplement", 0x1D80, 0x1DBF;
    COMBINING_DIACRITICAL_MARKS_SUPPLEMENT, "CombiningDiacriticalMarksSupplement", 0x1DC0, 0x1DFF;
    LATIN_EXTENDED_ADDITIONAL, "LatinExtendedAdditional", 0x1E00, 0x1EFF;
    GREEK_EXTENDED, "GreekExtended", 0x1F00, 0x1FFF;
    GENERAL_PUNCTUATION, "GeneralPunctuation", 0x2000, 0x206F;
    SUPERSCRIPTS_AND_SUBSCRIPTS, "SuperscriptsandSubscripts", 0x2070, 0x209F;
    CURRENCY_SYMBOLS, "CurrencySymbols", 0x20A0, 0x20CF;
    COMBINING_DIACRITICAL_MARKS_FOR_SYMBOLS, "CombiningDiacriticalMarksforSymbols", 0x20D0, 0x20FF;
    LETTERLIKE_SYMBOLS, "LetterlikeSymbols", 0x2100, 0x214F;
    NUMBER_FORMS, "NumberForms", 0x2150, 0x218F;
    ARROWS, "Arrows", 0x2190, 0x21FF;
    MATHEMATICAL_OPERATORS, "MathematicalOperators", 0x2200, 0x22FF;
    MISCELLANEOUS_TECHNICAL, "MiscellaneousTechnical", 0x2300, 0x23FF;
    CONTROL_PICTURES, "ControlPictures", 0x2400, 0x243F;
    OPTICAL_CHARACTER_RECOGNITION, "OpticalCharacterRecognition", 0x2440, 0x245F;
    ENCLOSED_ALPHANUMERICS, "EnclosedAlphanumerics", 0x2460, 0x24FF;
    BOX_DRAWING, "BoxDrawing", 0x2500, 0x257F;
    BLOCK_ELEMENTS, "BlockElements", 0x2580, 0x259F;
    GEOMETRIC_SHAPES, "GeometricShapes", 0x25A0, 0x25FF;
    MISCELLANEOUS_SYMBOLS, "MiscellaneousSymbols", 0x2600, 0x26FF;
    DINGBATS, "Dingbats", 0x2700, 0x27BF;
    MISCELLANEOUS_MATHEMATICAL_SYMBOLS_A, "MiscellaneousMathematicalSymbolsA", 0x27C0, 0x27EF;
    SUPPLEMENTAL_ARROWS_A, "SupplementalArrowsA", 0x27F0, 0x27FF;
    BRAILLE_PATTERNS, "BraillePatterns", 0x2800, 0x28FF;
    SUPPLEMENTAL_ARROWS_B, "SupplementalArrowsB", 0x2900, 0x297F;
    MISCELLANEOUS_MATHEMATICAL_SYMBOLS_B, "MiscellaneousMathematicalSymbolsB", 0x2980, 0x29FF;
    SUPPLEMENTAL_MATHEMATICAL_OPERATORS, "SupplementalMathematicalOperators", 0x2A00, 0x2AFF;
    MISCELLANEOUS_SYMBOLS_AND_ARROWS, "MiscellaneousSymbolsandArrows", 0x2B00, 0x2BFF;
    GLAGOLITIC, "Glagolitic", 0x2C00, 0x2C5F;
    LATIN_EXTENDED_C, "LatinExtendedC", 0x2C60, 0x2C7F;
    COPTIC, "Coptic", 0x2C80, 0x2CFF;
    GEORGIAN_SUPPLEMENT, "GeorgianSupplement", 0x2D00, 0x2D2F;
    TIFINAGH, "Tifinagh", 0x2D30, 0x2D7F;
    ETHIOPIC_EXTENDED, "EthiopicExtended", 0x2D80, 0x2DDF;
    CYRILLIC_EXTENDED_A, "CyrillicExtendedA", 0x2DE0, 0x2DFF;
    SUPPLEMENTAL_PUNCTUATION, "SupplementalPunctuation", 0x2E00, 0x2E7F;
    CJK_RADICALS_SUPPLEMENT, "CJKRadicalsSupplement", 0x2E80, 0x2EFF;
    KANGXI_RADICALS, "KangxiRadicals", 0x2F00, 0x2FDF;
    IDEOGRAPHIC_DESCRIPTION_CHARACTERS, "IdeographicDescriptionCharacters", 0x2FF0, 0x2FFF;
    CJK_SYMBOLS_AND_PUNCTUATION, "CJKSymbolsandPunctuation", 0x3000, 0x303F;
    HIRAGANA, "Hiragana", 0x3040, 0x309F;
    KATAKANA, "Katakana", 0x30A0, 0x30FF;
    BOPOMOFO, "Bopomofo", 0x3100, 0x312F;
    HANGUL_COMPATIBILITY_JAMO, "HangulCompatibilityJamo", 0x3130, 0x318F;
    KANBUN, "Kanbun", 0x3190, 0x319F;
    BOPOMOFO_EXTENDED, "BopomofoExtended", 0x31A0, 0x31BF;
    CJK_STROKES, "CJKStrokes", 0x31C0, 0x31EF;
    KATAKANA_PHONETIC_EXTENSIONS, "KatakanaPhoneticExtensions", 0x31F0, 0x31FF;
    ENCLOSED_CJK_LETTERS_AND_MONTHS, "EnclosedCJKLettersandMonths", 0x3200, 0x32FF;
    CJK_COMPATIBILITY, "CJKCompatibility", 0x3300, 0x33FF;
    CJK_UNIFIED_IDEOGRAPHS_EXTENSION_A, "CJKUnifiedIdeographsExtensionA", 0x3400, 0x4DBF;
    YIJING_HEXAGRAM_SYMBOLS, "YijingHexagramSymbols", 0x4DC0, 0x4DFF;
    CJK_UNIFIED_IDEOGRAPHS, "CJKUnifiedIdeographs", 0x4E00, 0x9FFF;
    YI_SYLLABLES, "YiSyllables", 0xA000, 0xA48F;
    YI_RADICALS, "YiRadicals", 0xA490, 0xA4CF;
    LISU, "Lisu", 0xA4D0, 0xA4FF;
    VAI, "Vai", 0xA500, 0xA63F;
    CYRILLIC_EXTENDED_B, "CyrillicExtendedB", 0xA640, 0xA69F;
    BAMUM, "Bamum", 0xA6A0, 0xA6FF;
    MODIFIER_TONE_LETTERS, "ModifierToneLetters", 0xA700, 0xA71F;
    LATIN_EXTENDED_D, "LatinExtendedD", 0xA720, 0xA7FF;
    SYLOTI_NAGRI, "SylotiNagri", 0xA800, 0xA82F;
    COMMON_INDIC_NUMBER_FORMS, "CommonIndicNumberForms", 0xA830, 0xA83F;
    PHAGSPA, "Phagspa", 0xA840, 0xA87F;
    SAURASHTRA, "Saurashtra", 0xA880, 0xA8DF;
    DEVANAGARI_EXTENDED, "DevanagariExtended", 0xA8E0, 0xA8FF;
    KAYAH_LI, "KayahLi", 0xA900, 0xA92F;
    REJANG, "Rejang", 0xA930, 0xA95F;
    HANGUL_JAMO_EXTENDED_A, "HangulJamoExtendedA", 0xA960, 0xA97F;
    JAVANESE, "Javanese", 0xA980, 0xA9DF;
    MYANMAR_EXTENDED_B, "MyanmarExtendedB", 0xA9E0, 0xA9FF;
    CHAM, "Cham", 0xAA00, 0xAA5F;
    MYANMAR_EXTENDED_A, "MyanmarExtendedA", 0xAA60, 0xAA7F;
    TAI_VIET, "TaiViet", 0xAA80, 0xAADF;
    MEETEI_MAYEK_EXTENSIONS, "MeeteiMayekExtensions", 0xAAE0, 0xAAFF;
    ETHIOPIC_EXTENDED_A, "EthiopicExtendedA", 0xAB00, 0xAB2F;
    LATIN_EXTENDED_E, "LatinExtendedE", 0xAB30, 0xAB6F;
    CHEROKEE_SUPPLEMENT, "CherokeeSupplement", 0xAB70, 0xABBF;
    MEETEI_MAYEK, "MeeteiMayek", 0xABC0, 0xABFF;
    HANGUL_SYLLABLES, "HangulSyllables", 0xAC00, 0xD7AF;
    HANGUL_JAMO_EXTENDED_B, "HangulJamoExtendedB", 0xD7B0, 0xD7FF;
    CJK_COMPATIBILITY_IDEOGRAPHS, "CJKCompatibilityIdeographs", 0xF900, 0xFAFF;
    ALPHABETIC_PRESENTATION_FORMS, "AlphabeticPresentationForms", 0xFB00, 0xFB4F;
    ARABIC_PRESENTATION_FORMS_A, "ArabicPresentationFormsA", 0xFB50, 0xFDFF;
    VARIATION_SELECTORS, "VariationSelectors", 0xFE00, 0xFE0F;
    VERTICAL_FORMS, "VerticalForms", 0xFE10, 0xFE1F;
    COMBINING_HALF_MARKS, "CombiningHalfMarks", 0xFE20, 0xFE2F;
    CJK_COMPATIBILITY_FORMS, "CJKCompatibilityForms", 0xFE30, 0xFE4F;
    SMALL_FORM_VARIANTS, "SmallFormVariants", 0xFE50, 0xFE6F;
    ARABIC_PRESENTATION_FORMS_B, "ArabicPresentationFormsB", 0xFE70, 0xFEFF;
    HALFWIDTH_AND_FULLWIDTH_FORMS, "HalfwidthandFullwidthForms", 0xFF00, 0xFFEF;
    SPECIALS, "Specials", 0xFFF0, 0xFFFF;
}

/// Case-insensitive name comparison that ignores everything but ASCII
/// letters and digits, so "basic_latin" and "Basic Latin" find "BasicLatin".
fn names_match(canonical: &str, query: &str) -> bool {
    let normalize = |s: &str| {
        s.chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect::<Vec<_>>()
    };
    normalize(canonical) == normalize(query)
}

/// Find a block and its canonical name
pub fn lookup(name: &str) -> Option<(&'static str, UnicodeBlock)> {
    if names_match("All", name) {
        return Some(("All", ALL));
    }
    if names_match("None", name) {
        return Some(("None", NONE));
    }
    CATALOG
        .iter()
        .find(|(canonical, _)| names_match(canonical, name))
        .copied()
}

/// Find a block by name
pub fn by_name(name: &str) -> Option<UnicodeBlock> {
    lookup(name).map(|(_, block)| block)
}

/// All named blocks in ascending code point order (excludes `All` and `None`)
pub fn all_blocks() -> impl Iterator<Item = (&'static str, UnicodeBlock)> {
    CATALOG.iter().copied()
}
