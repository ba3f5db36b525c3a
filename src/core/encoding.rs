//! UTF-16 Byte Buffers
//!
//! Raw UTF-16 arrives from the BEAM as a binary. Detects byte order from a
//! BOM (little endian when absent) and converts between bytes and code units.
//! Code units are never validated here: unpaired surrogates are the
//! encoder's concern.

/// Byte order of a UTF-16 buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf16ByteOrder {
    Le,
    Be,
}

impl Utf16ByteOrder {
    /// Detect byte order from a byte order mark.
    ///
    /// Returns the order and the length of the BOM to skip (0 or 2).
    pub fn detect(input: &[u8]) -> (Self, usize) {
        match input {
            // UTF-16 LE BOM: 0xFF 0xFE
            [0xFF, 0xFE, ..] => (Utf16ByteOrder::Le, 2),
            // UTF-16 BE BOM: 0xFE 0xFF
            [0xFE, 0xFF, ..] => (Utf16ByteOrder::Be, 2),
            _ => (Utf16ByteOrder::Le, 0),
        }
    }
}

/// Split a UTF-16 byte buffer into code units, skipping any BOM
///
/// # Errors
///
/// Returns an error if the buffer (after the BOM) has an odd number of bytes.
pub fn units_from_bytes(input: &[u8]) -> Result<(Vec<u16>, Utf16ByteOrder), String> {
    let (order, bom_len) = Utf16ByteOrder::detect(input);
    let bytes = &input[bom_len..];

    if bytes.len() % 2 != 0 {
        return Err(format!("Invalid UTF-16 {:?}: odd number of bytes", order));
    }

    let units = match order {
        Utf16ByteOrder::Le => bytes
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .collect(),
        Utf16ByteOrder::Be => bytes
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect(),
    };
    Ok((units, order))
}

/// Serialize code units without a BOM
pub fn units_to_bytes(units: &[u16], order: Utf16ByteOrder) -> Vec<u8> {
    let mut out = Vec::with_capacity(units.len() * 2);
    for &unit in units {
        let bytes = match order {
            Utf16ByteOrder::Le => unit.to_le_bytes(),
            Utf16ByteOrder::Be => unit.to_be_bytes(),
        };
        out.extend_from_slice(&bytes);
    }
    out
}
