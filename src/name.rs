//! 8.3 short-name codec.
//!
//! Names are stored on disk as an 8-byte base and a 3-byte extension. The
//! display form keeps only leading ASCII-alphabetic characters of each part,
//! so padding bytes never leak into a name; a slot whose first byte is not
//! alphabetic counts as unused.

/// Raw-to-display. Returns `None` for unused/deleted slots.
pub fn decode_83(raw: &[u8; 11]) -> Option<String> {
    if !raw[0].is_ascii_alphabetic() {
        return None;
    }
    let mut name = String::with_capacity(12);
    for &b in raw[..8].iter().take_while(|b| b.is_ascii_alphabetic()) {
        name.push(b as char);
    }
    if raw[8].is_ascii_alphabetic() {
        name.push('.');
        for &b in raw[8..11].iter().take_while(|b| b.is_ascii_alphabetic()) {
            name.push(b as char);
        }
    }
    Some(name)
}

/// Display-to-raw: split at the last `.`, space-pad both parts. Case is
/// preserved; lookup compares these fields byte-for-byte against the stored
/// ones.
pub fn encode_83(display: &str) -> ([u8; 8], [u8; 3]) {
    let mut base = [b' '; 8];
    let mut ext = [b' '; 3];
    let (b, e) = match display.rfind('.') {
        Some(i) => (&display[..i], &display[i + 1..]),
        None => (display, ""),
    };
    for (i, byte) in b.bytes().take(8).enumerate() {
        base[i] = byte;
    }
    for (i, byte) in e.bytes().take(3).enumerate() {
        ext[i] = byte;
    }
    (base, ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_with_extension() {
        assert_eq!(decode_83(b"ENOUGH  TXT").as_deref(), Some("ENOUGH.TXT"));
    }

    #[test]
    fn decode_without_extension() {
        assert_eq!(decode_83(b"README     ").as_deref(), Some("README"));
    }

    #[test]
    fn decode_stops_at_first_non_alphabetic() {
        // digits and padding are both cut, per the alphabetic-only filter
        assert_eq!(decode_83(b"LOG1    TXT").as_deref(), Some("LOG.TXT"));
    }

    #[test]
    fn decode_unused_slot() {
        assert_eq!(decode_83(&[0xE5; 11]), None);
        assert_eq!(decode_83(&[0x00; 11]), None);
        assert_eq!(decode_83(b"        TXT"), None);
    }

    #[test]
    fn encode_with_extension() {
        let (base, ext) = encode_83("ENOUGH.TXT");
        assert_eq!(&base, b"ENOUGH  ");
        assert_eq!(&ext, b"TXT");
    }

    #[test]
    fn encode_without_extension() {
        let (base, ext) = encode_83("MAKEFILE");
        assert_eq!(&base, b"MAKEFILE");
        assert_eq!(&ext, b"   ");
    }

    #[test]
    fn encode_splits_at_last_dot() {
        let (base, ext) = encode_83("A.B.TXT");
        assert_eq!(&base, b"A.B     ");
        assert_eq!(&ext, b"TXT");
    }

    #[test]
    fn encode_preserves_case() {
        let (base, ext) = encode_83("Mixed.Txt");
        assert_eq!(&base, b"Mixed   ");
        assert_eq!(&ext, b"Txt");
    }

    #[test]
    fn round_trip_alphabetic_names() {
        for name in ["ENOUGH.TXT", "A.B", "LONGNAME"] {
            let (base, ext) = encode_83(name);
            let mut raw = [0u8; 11];
            raw[..8].copy_from_slice(&base);
            raw[8..].copy_from_slice(&ext);
            assert_eq!(decode_83(&raw).as_deref(), Some(name));
        }
    }
}
