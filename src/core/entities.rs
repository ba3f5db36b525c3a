//! HTML Character References
//!
//! Writes the escaped form of a scalar value:
//! - Named references for the markup characters: &lt; &gt; &amp; &quot;
//! - Hexadecimal numeric references for everything else: &#xE9; &#x103FF;
//!
//! Output goes to either a UTF-8 `String` or a UTF-16 `Vec<u16>`.

/// Output buffer that character references can be appended to
pub trait ReferenceSink {
    fn push_ascii(&mut self, byte: u8);

    fn push_ascii_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.push_ascii(b);
        }
    }
}

impl ReferenceSink for String {
    #[inline]
    fn push_ascii(&mut self, byte: u8) {
        self.push(byte as char);
    }

    #[inline]
    fn push_ascii_str(&mut self, s: &str) {
        self.push_str(s);
    }
}

impl ReferenceSink for Vec<u16> {
    #[inline]
    fn push_ascii(&mut self, byte: u8) {
        self.push(byte as u16);
    }
}

/// Named reference for the characters that are significant in HTML markup
#[inline]
pub fn named_reference(scalar: u32) -> Option<&'static str> {
    match scalar {
        0x3C => Some("&lt;"),
        0x3E => Some("&gt;"),
        0x26 => Some("&amp;"),
        0x22 => Some("&quot;"),
        _ => None,
    }
}

/// Convert 0-15 to '0'-'9' / 'A'-'F'
#[inline]
fn hex_digit(nibble: u32) -> u8 {
    debug_assert!(nibble < 16);
    if nibble < 10 {
        b'0' + nibble as u8
    } else {
        b'A' + (nibble - 10) as u8
    }
}

/// Append `&#xHHHH;` with uppercase digits and no leading zeros
pub fn write_numeric_reference<S: ReferenceSink + ?Sized>(scalar: u32, out: &mut S) {
    out.push_ascii_str("&#x");

    // At least one digit, even for U+0000
    let significant_bits = (32 - scalar.leading_zeros()).max(1);
    let mut shift = significant_bits.div_ceil(4) * 4;
    while shift > 0 {
        shift -= 4;
        out.push_ascii(hex_digit((scalar >> shift) & 0xF));
    }

    out.push_ascii(b';');
}

/// Append the escaped form of `scalar`, preferring a named reference
#[inline]
pub fn write_reference<S: ReferenceSink + ?Sized>(scalar: u32, out: &mut S) {
    match named_reference(scalar) {
        Some(named) => out.push_ascii_str(named),
        None => write_numeric_reference(scalar, out),
    }
}
