use alloc::{boxed::Box, vec::Vec};

use quickcheck::{Arbitrary, Gen};

/// Byte fragments that sit on the edges of the well-formed ranges.
const FRAGMENTS: &[&[u8]] = &[
    b"\xC0\x80",         // overlong NUL
    b"\xC1\xBF",         // overlong two-byte
    b"\xE0\x80\x80",     // overlong three-byte
    b"\xE0\x9F\xBF",     // overlong three-byte, top
    b"\xE0\xA0\x80",     // U+0800
    b"\xED\x9F\xBF",     // U+D7FF
    b"\xED\xA0\x80",     // surrogate
    b"\xED\xBF\xBF",     // surrogate
    b"\xF0\x8F\xBF\xBF", // overlong four-byte
    b"\xF0\x90\x80\x80", // U+10000
    b"\xF4\x8F\xBF\xBF", // U+10FFFF
    b"\xF4\x90\x80\x80", // past U+10FFFF
    b"\xF5\x80\x80\x80",
    b"\xFF",
    b"\xFE",
    b"\x80",
    b"\xBF",
    b"\xC2",
    b"\xE2\x82",
    b"\xF0\x9F\x98",
    b"\xEF\xBB\xBF", // BOM
    b"\xEF\xBF\xBD", // literal U+FFFD
];

/// Input that mixes well-formed scalars, edge-case fragments and raw bytes.
///
/// Plain `Vec<u8>` is almost never well-formed past a few bytes, which leaves
/// the multi-byte paths under-exercised.
#[derive(Debug, Clone)]
pub(crate) struct MixedBytes(pub Vec<u8>);

impl Arbitrary for MixedBytes {
    fn arbitrary(g: &mut Gen) -> Self {
        let pieces = usize::arbitrary(g) % (g.size() + 1);
        let mut bytes = Vec::new();
        for _ in 0..pieces {
            match u8::arbitrary(g) % 4 {
                0 => {
                    let ch = char::arbitrary(g);
                    bytes.extend_from_slice(ch.encode_utf8(&mut [0; 4]).as_bytes());
                }
                1 => bytes.extend_from_slice(g.choose(FRAGMENTS).copied().unwrap_or_default()),
                2 => bytes.push(u8::arbitrary(g)),
                _ => bytes.push(u8::arbitrary(g) % 0x80),
            }
        }
        MixedBytes(bytes)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(MixedBytes))
    }
}
