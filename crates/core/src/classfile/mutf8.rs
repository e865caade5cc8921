//! Modified UTF-8, the string encoding used by `CONSTANT_Utf8` entries.
//!
//! Differs from standard UTF-8 in two ways: NUL is encoded as the two bytes
//! `C0 80`, and supplementary characters are encoded as a surrogate pair of
//! two 3-byte sequences rather than one 4-byte sequence.

/// Decode modified UTF-8 into a Rust string.
///
/// Returns `None` for structurally malformed input (raw NUL bytes, 4-byte
/// forms, bad continuation bytes, truncated sequences). Unpaired surrogates
/// are legal in class files and decode to U+FFFD.
pub fn decode(bytes: &[u8]) -> Option<String> {
    if bytes.iter().all(|b| (0x01..0x80).contains(b)) {
        return std::str::from_utf8(bytes).ok().map(str::to_owned);
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i];
        match b0 {
            0x01..=0x7F => {
                units.push(b0 as u16);
                i += 1;
            }
            0xC0..=0xDF => {
                let b1 = continuation(bytes.get(i + 1))?;
                units.push(((b0 as u16 & 0x1F) << 6) | b1);
                i += 2;
            }
            0xE0..=0xEF => {
                let b1 = continuation(bytes.get(i + 1))?;
                let b2 = continuation(bytes.get(i + 2))?;
                units.push(((b0 as u16 & 0x0F) << 12) | (b1 << 6) | b2);
                i += 3;
            }
            _ => return None,
        }
    }

    Some(String::from_utf16_lossy(&units))
}

fn continuation(byte: Option<&u8>) -> Option<u16> {
    match byte {
        Some(b) if b & 0xC0 == 0x80 => Some((b & 0x3F) as u16),
        _ => None,
    }
}
