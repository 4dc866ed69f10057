use bytes::BufMut;

/// Display charset carried over from the original protocol's font table,
/// plus ASCII punctuation. `§` is handled separately as a color escape lead
/// byte, not as a member of this set.
pub const ALLOWED_CHARSET: &str = concat!(
    " #$%&\"()*+,-./:;<=>!?@[\\]^_'{|}~\u{2302}\u{00AA}\u{00BA}\u{00BF}\u{00AE}\u{00AC}",
    "\u{00BD}\u{00BC}\u{00A1}\u{00AB}\u{00BB}\u{00A3}\u{00D7}\u{0192}",
    "0123456789",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "abcdefghijklmnopqrstuvwxyz",
    "\u{00C7}\u{00FC}\u{00E9}\u{00E2}\u{00E4}\u{00E0}\u{00E5}\u{00E7}\u{00EA}\u{00EB}\u{00E8}",
    "\u{00EF}\u{00EE}\u{00EC}\u{00C4}\u{00C5}\u{00C9}\u{00E6}\u{00C6}\u{00F4}\u{00F6}\u{00F2}",
    "\u{00FB}\u{00F9}\u{00FF}\u{00D6}\u{00DC}\u{00F8}\u{00D8}\u{00E1}\u{00ED}\u{00F3}\u{00FA}",
    "\u{00F1}\u{00D1}",
);

/// Decode `raw` (a byte slice whose length is a multiple of 2) as UTF-16BE
/// code units. Unpaired surrogates and other invalid sequences are replaced
/// with `U+FFFD`, matching lossless-on-the-wire, lossy-on-display handling.
pub fn decode_utf16be(raw: &[u8]) -> String {
    let units = raw.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]]));
    char::decode_utf16(units).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)).collect()
}

/// Encode `s` as a length-prefixed UTF-16BE string: a `u16` code-unit count
/// followed by that many 16-bit code units.
pub fn encode_utf16be(s: &str, out: &mut bytes::BytesMut) {
    let units: Vec<u16> = s.encode_utf16().collect();
    out.put_u16(units.len() as u16);
    for unit in units {
        out.put_u16(unit);
    }
}

/// `sanitize(s)` restricts `s` to [`ALLOWED_CHARSET`] plus `§`+hex color
/// escapes, replacing anything else with `?`. Idempotent: running it twice
/// produces the same output as running it once.
pub fn sanitize(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\u{00A7}' {
            if let Some(&next) = chars.get(i + 1) {
                if next.is_ascii_hexdigit() {
                    out.push(c);
                    out.push(next);
                    i += 2;
                    continue;
                }
            }
            // trailing or malformed escape: drop the lead byte, matching
            // the original sanitizer's treatment of a truncated escape.
            i += 1;
            continue;
        }
        if ALLOWED_CHARSET.contains(c) {
            out.push(c);
        } else {
            out.push('?');
        }
        i += 1;
    }
    out
}
