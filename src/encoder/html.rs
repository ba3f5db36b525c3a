//! HTML Encoder
//!
//! Escapes text for embedding in HTML. A scalar value passes through only if
//! it is in the BMP, allowed by the caller's filter, defined, and not one of
//! the characters that are always escaped:
//! - markup characters `<` `>` `&` `"` (named references)
//! - apostrophe and plus
//! - C0 and C1 controls
//!
//! Everything else becomes `&#xHHHH;`. Inputs that need no escaping are
//! returned borrowed.

use std::borrow::Cow;
use std::sync::OnceLock;

use crate::core::entities::write_reference;
use crate::core::unicode::{is_supplementary, scalar_indices};
use crate::filter::{AllowedCharsBitmap, CodePointFilter, CodePointSource};

/// Escaped no matter what the filter allows
const ALWAYS_ESCAPED: [char; 6] = ['<', '>', '&', '"', '\'', '+'];

/// Stateless HTML encoder bound to one allowance set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlEncoder {
    allowed: AllowedCharsBitmap,
}

impl HtmlEncoder {
    /// Encoder allowing `BasicLatin`
    pub fn new() -> Self {
        Self::with_filter(CodePointFilter::new())
    }

    /// Encoder allowing whatever `filter` allows, minus the always-escaped set
    pub fn with_filter(filter: CodePointFilter) -> Self {
        let mut allowed = filter.into_bitmap();

        allowed.forbid_undefined();
        for control in (0x0000..=0x001F).chain(0x007F..=0x009F) {
            allowed.forbid(control);
        }
        for c in ALWAYS_ESCAPED {
            allowed.forbid(c as u16);
        }

        tracing::debug!(allowed = allowed.count(), "built HTML encoder");
        HtmlEncoder { allowed }
    }

    /// Encoder allowing the union of `sources`; an empty slice allows nothing
    pub fn from_sources(sources: &[&dyn CodePointSource]) -> Self {
        let mut filter = CodePointFilter::empty();
        for source in sources {
            filter.allow_filter(*source);
        }
        Self::with_filter(filter)
    }

    /// Shared `BasicLatin` encoder
    pub fn default_instance() -> &'static HtmlEncoder {
        static DEFAULT: OnceLock<HtmlEncoder> = OnceLock::new();
        DEFAULT.get_or_init(HtmlEncoder::new)
    }

    /// True if the scalar can be copied to the output as-is
    #[inline]
    pub fn passes_through(&self, scalar: u32) -> bool {
        !is_supplementary(scalar) && self.allowed.is_allowed(scalar as u16)
    }

    /// Encode UTF-16 text. Unpaired surrogates become U+FFFD first.
    pub fn encode_utf16<'a>(&self, input: &'a [u16]) -> Cow<'a, [u16]> {
        // A replaced surrogate passes the filter check but differs from its unit
        let first_change = scalar_indices(input)
            .find(|&(pos, scalar)| !self.passes_through(scalar) || input[pos] as u32 != scalar);

        let Some((start, _)) = first_change else {
            return Cow::Borrowed(input);
        };

        let mut out = Vec::with_capacity(input.len() + 16);
        out.extend_from_slice(&input[..start]);
        for (_, scalar) in scalar_indices(&input[start..]) {
            if self.passes_through(scalar) {
                out.push(scalar as u16);
            } else {
                write_reference(scalar, &mut out);
            }
        }
        Cow::Owned(out)
    }

    /// Encode UTF-8 text
    pub fn encode_str<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let first_change = input
            .char_indices()
            .find(|&(_, c)| !self.passes_through(c as u32));

        let Some((start, _)) = first_change else {
            return Cow::Borrowed(input);
        };

        let mut out = String::with_capacity(input.len() + 16);
        out.push_str(&input[..start]);
        self.encode_chars(&input[start..], &mut out);
        Cow::Owned(out)
    }

    /// Encode text that may be absent; `None` passes through
    pub fn encode_option<'a>(&self, input: Option<&'a str>) -> Option<Cow<'a, str>> {
        input.map(|s| self.encode_str(s))
    }

    /// Encode UTF-8 bytes that may be absent.
    ///
    /// Invalid sequences become U+FFFD before encoding. The result borrows
    /// `input` only when it was valid UTF-8 and needed no escaping.
    pub fn encode_lossy<'a>(&self, input: Option<&'a [u8]>) -> Option<Cow<'a, str>> {
        match input.map(String::from_utf8_lossy) {
            Some(Cow::Owned(repaired)) => Some(Cow::Owned(self.encode_str(&repaired).into_owned())),
            Some(Cow::Borrowed(valid)) => self.encode_option(Some(valid)),
            None => self.encode_option(None),
        }
    }

    fn encode_chars(&self, input: &str, out: &mut String) {
        for c in input.chars() {
            if self.passes_through(c as u32) {
                out.push(c);
            } else {
                write_reference(c as u32, out);
            }
        }
    }
}

impl Default for HtmlEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::unicode::is_character_defined;
    use crate::filter::blocks::{ALL, BASIC_LATIN, LATIN_1_SUPPLEMENT, MISCELLANEOUS_SYMBOLS, NONE};
    use crate::filter::UnicodeBlock;
    use proptest::prelude::*;

    /// Allows exactly the listed code points
    struct CustomCodePointFilter(Vec<u32>);

    impl CodePointSource for CustomCodePointFilter {
        fn allowed_code_points(&self) -> Box<dyn Iterator<Item = u32> + '_> {
            Box::new(self.0.iter().copied())
        }
    }

    fn with_blocks(blocks: &[UnicodeBlock]) -> HtmlEncoder {
        HtmlEncoder::with_filter(CodePointFilter::with_blocks(blocks))
    }

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    fn is_surrogate_code_point(cp: u32) -> bool {
        (0xD800..=0xDFFF).contains(&cp)
    }

    #[test]
    fn test_custom_filters() {
        let filter1 = CustomCodePointFilter(vec!['a' as u32, 'b' as u32]);
        let filter2 = CustomCodePointFilter(vec![0, '&' as u32, 0xFFFF, 'd' as u32]);
        let encoder = HtmlEncoder::from_sources(&[&filter1, &filter2]);

        assert_eq!(encoder.encode_str("a"), "a");
        assert_eq!(encoder.encode_str("b"), "b");
        assert_eq!(encoder.encode_str("c"), "&#x63;");
        assert_eq!(encoder.encode_str("d"), "d");
        assert_eq!(encoder.encode_str("\0"), "&#x0;"); // controls always escaped
        assert_eq!(encoder.encode_str("&"), "&amp;"); // markup always escaped
        assert_eq!(encoder.encode_str("\u{FFFF}"), "&#xFFFF;"); // undefined always escaped
    }

    #[test]
    fn test_no_sources_allows_nothing() {
        let encoder = HtmlEncoder::from_sources(&[]);
        assert_eq!(encoder.encode_str("a"), "&#x61;");
        assert_eq!(encoder.encode_str("\u{00E9}"), "&#xE9;");
        assert_eq!(encoder.encode_str("\u{2601}"), "&#x2601;");
    }

    #[test]
    fn test_multiple_blocks_union() {
        let encoder = HtmlEncoder::from_sources(&[&LATIN_1_SUPPLEMENT, &MISCELLANEOUS_SYMBOLS]);
        assert_eq!(encoder.encode_str("a"), "&#x61;");
        assert_eq!(encoder.encode_str("\u{00E9}"), "\u{00E9}");
        assert_eq!(encoder.encode_str("\u{2601}"), "\u{2601}");
    }

    #[test]
    fn test_new_defaults_to_basic_latin() {
        let encoder = HtmlEncoder::new();
        assert_eq!(encoder.encode_str("a"), "a");
        assert_eq!(encoder.encode_str("\u{00E9}"), "&#xE9;");
        assert_eq!(encoder.encode_str("\u{2601}"), "&#x2601;");
    }

    #[test]
    fn test_default_equivalent_to_basic_latin() {
        let control = with_blocks(&[BASIC_LATIN]);
        let default = HtmlEncoder::default_instance();
        assert_eq!(&control, default);

        for cp in (0..=0xFFFFu32).filter(|&cp| !is_surrogate_code_point(cp)) {
            let input = char::from_u32(cp).unwrap().to_string();
            assert_eq!(control.encode_str(&input), default.encode_str(&input));
        }
    }

    #[test]
    fn test_default_instance_is_singleton() {
        let a = HtmlEncoder::default_instance() as *const _;
        let b = HtmlEncoder::default_instance() as *const _;
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_allowed_still_escapes_forbidden_simple() {
        let encoder = with_blocks(&[ALL]);
        assert_eq!(
            encoder.encode_str("Hello <>&'\"+ there!"),
            "Hello &lt;&gt;&amp;&#x27;&quot;&#x2B; there!"
        );
    }

    #[test]
    fn test_all_allowed_still_escapes_forbidden_bmp() {
        let encoder = with_blocks(&[ALL]);

        for cp in 0..=0xFFFFu32 {
            let input = [cp as u16];
            let expected = if is_surrogate_code_point(cp) {
                // lone surrogate -> replacement char, which is allowed
                "\u{FFFD}".to_string()
            } else {
                match char::from_u32(cp).unwrap() {
                    '<' => "&lt;".to_string(),
                    '>' => "&gt;".to_string(),
                    '&' => "&amp;".to_string(),
                    '"' => "&quot;".to_string(),
                    c => {
                        let must_encode = c == '\'' || c == '+'
                            || cp <= 0x001F
                            || (0x007F..=0x009F).contains(&cp)
                            || !is_character_defined(cp as u16);
                        if must_encode {
                            format!("&#x{:X};", cp)
                        } else {
                            c.to_string()
                        }
                    }
                }
            };
            assert_eq!(
                String::from_utf16(&encoder.encode_utf16(&input)).unwrap(),
                expected,
                "U+{:04X}",
                cp
            );
        }
    }

    #[test]
    fn test_all_allowed_supplementary_always_escaped() {
        let encoder = with_blocks(&[ALL]);
        for cp in (0x10000..=0x10FFFFu32).step_by(0x3F) {
            let input = char::from_u32(cp).unwrap().to_string();
            assert_eq!(encoder.encode_str(&input), format!("&#x{:X};", cp));
        }
    }

    #[test]
    fn test_bad_surrogates_become_replacement_char() {
        let encoder = with_blocks(&[ALL]);

        // a<lone high>b<lone low>c<low before high>d<lone low><valid pair>e<high at end>
        let input: Vec<u16> = vec![
            0x61, 0xD800, 0x62, 0xDFFF, 0x63, 0xDFFF, 0xD800, 0x64, 0xDFFF, 0xD800, 0xDFFF, 0x65,
            0xD800,
        ];
        let expected = utf16("a\u{FFFD}b\u{FFFD}c\u{FFFD}\u{FFFD}d\u{FFFD}&#x103FF;e\u{FFFD}");

        assert_eq!(encoder.encode_utf16(&input).as_ref(), expected.as_slice());
    }

    #[test]
    fn test_lone_surrogate_never_borrowed() {
        let encoder = with_blocks(&[ALL]);
        let input = [0x61, 0xD800, 0x62];
        let result = encoder.encode_utf16(&input);
        assert!(matches!(result, Cow::Owned(_)));
        assert_eq!(result.as_ref(), &[0x61u16, 0xFFFD, 0x62][..]);
    }

    #[test]
    fn test_lone_surrogate_escaped_when_replacement_not_allowed() {
        let encoder = HtmlEncoder::new();
        assert_eq!(encoder.encode_utf16(&[0xDC00]).as_ref(), utf16("&#xFFFD;").as_slice());
    }

    #[test]
    fn test_valid_pair_is_numeric_reference() {
        let encoder = with_blocks(&[ALL]);
        assert_eq!(encoder.encode_utf16(&[0xD800, 0xDFFF]).as_ref(), utf16("&#x103FF;").as_slice());
        assert_eq!(encoder.encode_str("\u{1F600}"), "&#x1F600;");
    }

    #[test]
    fn test_empty_input() {
        let encoder = HtmlEncoder::new();
        assert_eq!(encoder.encode_str(""), "");
        assert!(encoder.encode_utf16(&[]).is_empty());
    }

    #[test]
    fn test_clean_input_is_borrowed() {
        let encoder = HtmlEncoder::new();
        let input = "Hello, there!";
        match encoder.encode_str(input) {
            Cow::Borrowed(s) => assert!(std::ptr::eq(s, input)),
            Cow::Owned(_) => panic!("expected borrowed output"),
        }

        let units = utf16(input);
        assert!(matches!(encoder.encode_utf16(&units), Cow::Borrowed(_)));
    }

    #[test]
    fn test_none_passes_through() {
        let encoder = HtmlEncoder::new();
        assert_eq!(encoder.encode_option(None), None);
        assert_eq!(encoder.encode_option(Some("<")).as_deref(), Some("&lt;"));
    }

    #[test]
    fn test_nothing_allowed_produces_numeric_entities() {
        let encoder = with_blocks(&[NONE]);
        for cp in (0..=0x10FFFFu32).filter(|&cp| !is_surrogate_code_point(cp)).step_by(7) {
            let input = char::from_u32(cp).unwrap().to_string();
            let expected = match cp {
                0x3C => "&lt;".to_string(),
                0x3E => "&gt;".to_string(),
                0x26 => "&amp;".to_string(),
                0x22 => "&quot;".to_string(),
                _ => format!("&#x{:X};", cp),
            };
            assert_eq!(encoder.encode_str(&input), expected);
        }
    }

    #[test]
    fn test_escape_at_beginning() {
        assert_eq!(HtmlEncoder::new().encode_str("&Hello, there!"), "&amp;Hello, there!");
    }

    #[test]
    fn test_escape_at_end() {
        assert_eq!(HtmlEncoder::new().encode_str("Hello, there!&"), "Hello, there!&amp;");
    }

    #[test]
    fn test_escape_in_middle() {
        assert_eq!(HtmlEncoder::new().encode_str("Hello, &there!"), "Hello, &amp;there!");
    }

    #[test]
    fn test_escape_interspersed() {
        assert_eq!(HtmlEncoder::new().encode_str("Hello, <there>!"), "Hello, &lt;there&gt;!");
    }

    #[test]
    fn test_lossy_none_passes_through() {
        assert_eq!(HtmlEncoder::new().encode_lossy(None), None);
    }

    #[test]
    fn test_lossy_clean_bytes_are_borrowed() {
        let encoder = HtmlEncoder::new();
        let input = b"plain text";
        match encoder.encode_lossy(Some(&input[..])) {
            Some(Cow::Borrowed(s)) => assert_eq!(s.as_bytes().as_ptr(), input.as_ptr()),
            other => panic!("expected borrowed output, got {:?}", other),
        }
    }

    #[test]
    fn test_lossy_escapes_valid_utf8() {
        let encoder = HtmlEncoder::new();
        let input = "a<b \u{00E9}".as_bytes();
        assert_eq!(encoder.encode_lossy(Some(input)).as_deref(), Some("a&lt;b &#xE9;"));
    }

    #[test]
    fn test_lossy_replaces_invalid_utf8() {
        let with_replacement = with_blocks(&[BASIC_LATIN, crate::filter::blocks::SPECIALS]);
        let input: &[u8] = &[b'a', 0xFF, b'b', 0xC3];
        let encoded = with_replacement.encode_lossy(Some(input));
        assert!(matches!(encoded, Some(Cow::Owned(_))));
        assert_eq!(encoded.as_deref(), Some("a\u{FFFD}b\u{FFFD}"));

        let basic = HtmlEncoder::new();
        assert_eq!(basic.encode_lossy(Some(input)).as_deref(), Some("a&#xFFFD;b&#xFFFD;"));
    }

    #[test]
    fn test_filter_cannot_allow_forbidden() {
        let mut filter = CodePointFilter::empty();
        filter.allow_chars(['<', '\'', '+', '\u{0085}', '\u{E000}']);
        let encoder = HtmlEncoder::with_filter(filter);
        assert_eq!(
            encoder.encode_str("<'+\u{0085}\u{E000}"),
            "&lt;&#x27;&#x2B;&#x85;&#xE000;"
        );
    }

    /// Every '&' in the output must start a reference this encoder emits
    fn is_safe_output(output: &str) -> bool {
        if output.contains(['<', '>', '"']) {
            return false;
        }
        let mut rest = output;
        while let Some(pos) = rest.find('&') {
            rest = &rest[pos..];
            let named = ["&lt;", "&gt;", "&amp;", "&quot;"]
                .into_iter()
                .find(|named| rest.starts_with(*named));
            if let Some(named) = named {
                rest = &rest[named.len()..];
                continue;
            }
            let Some(hex) = rest.strip_prefix("&#x") else {
                return false;
            };
            let digits = hex.bytes().take_while(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F')).count();
            if digits == 0 || !hex[digits..].starts_with(';') {
                return false;
            }
            rest = &hex[digits + 1..];
        }
        true
    }

    proptest! {
        #[test]
        fn prop_output_is_safe(input in any::<String>()) {
            let encoder = with_blocks(&[ALL]);
            let encoded = encoder.encode_str(&input);
            prop_assert!(is_safe_output(&encoded));
            let twice = encoder.encode_str(&encoded);
            prop_assert!(is_safe_output(&twice));
        }

        #[test]
        fn prop_encoding_is_deterministic(input in any::<String>()) {
            let encoder = HtmlEncoder::new();
            prop_assert_eq!(encoder.encode_str(&input), encoder.encode_str(&input));
        }

        #[test]
        fn prop_utf16_matches_utf8(input in any::<String>()) {
            let encoder = with_blocks(&[LATIN_1_SUPPLEMENT, BASIC_LATIN]);
            let units = utf16(&input);
            let from_units = encoder.encode_utf16(&units);
            let from_str = utf16(&encoder.encode_str(&input));
            prop_assert_eq!(from_units.as_ref(), from_str.as_slice());
        }

        #[test]
        fn prop_arbitrary_units_never_fail(units in proptest::collection::vec(any::<u16>(), 0..64)) {
            let encoder = with_blocks(&[ALL]);
            let encoded = encoder.encode_utf16(&units);
            let text = String::from_utf16(&encoded);
            prop_assert!(text.is_ok());
            prop_assert!(is_safe_output(&text.unwrap()));
        }
    }
}
