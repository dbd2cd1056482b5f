#![expect(missing_docs)]

use utf8fuzz::{
    Check, ConversionOutcome, ConversionStatus, Engine, Oracle, OracleOptions, ScalarDecodeResult,
    StdEngine, convert_to_utf16, decode_next_scalar,
};

/// Treats `C0`/`C1` plus a continuation byte as one malformed unit.
struct GreedyOverlong;

impl Engine for GreedyOverlong {
    fn count_utf16_len(&self, src: &[u8]) -> usize {
        StdEngine.count_utf16_len(src)
    }

    fn decode_next_scalar(&self, src: &[u8]) -> Option<ScalarDecodeResult> {
        let mut step = decode_next_scalar(src)?;
        if let [0xC0 | 0xC1, 0x80..=0xBF, ..] = src {
            step.bytes_consumed = 2;
        }
        Some(step)
    }

    fn convert_to_utf16(&self, src: &[u8], dst: &mut [u16], replace: bool) -> ConversionOutcome {
        StdEngine.convert_to_utf16(src, dst, replace)
    }

    fn convert_with_replacement(&self, src: &[u8], placeholder: &[u16]) -> Vec<u16> {
        StdEngine.convert_with_replacement(src, placeholder)
    }
}

/// Skips a single byte after each error instead of the maximal subpart.
struct ByteWiseResync;

impl Engine for ByteWiseResync {
    fn count_utf16_len(&self, src: &[u8]) -> usize {
        StdEngine.count_utf16_len(src)
    }

    fn decode_next_scalar(&self, src: &[u8]) -> Option<ScalarDecodeResult> {
        StdEngine.decode_next_scalar(src)
    }

    fn convert_to_utf16(&self, src: &[u8], dst: &mut [u16], replace: bool) -> ConversionOutcome {
        StdEngine.convert_to_utf16(src, dst, replace)
    }

    fn convert_with_replacement(&self, src: &[u8], placeholder: &[u16]) -> Vec<u16> {
        let mut out = Vec::new();
        let mut scratch = vec![0u16; src.len()];
        let mut input = src;
        while !input.is_empty() {
            let outcome = convert_to_utf16(input, &mut scratch, false);
            out.extend_from_slice(&scratch[..outcome.units_written]);
            input = &input[outcome.bytes_read..];
            if outcome.status == ConversionStatus::InvalidData {
                input = &input[1..];
                out.extend_from_slice(placeholder);
            }
        }
        out
    }
}

#[test]
fn snapshot_reports() {
    let render = |input: &[u8]| {
        Oracle::new(input, OracleOptions::default())
            .run()
            .expect("no violation")
            .to_string()
    };

    insta::assert_snapshot!(render(b""), @"0 bytes decoded to 0 scalars (0 replaced) and 0 UTF-16 units");
    insta::assert_snapshot!(render(b"caf\xC3\xA9 \xED\xA0\x80"), @"9 bytes decoded to 8 scalars (3 replaced) and 8 UTF-16 units");
    insta::assert_snapshot!(render(b"\xF0\x9F\x98\x80"), @"4 bytes decoded to 1 scalars (0 replaced) and 2 UTF-16 units");
}

#[test]
fn snapshot_greedy_overlong_violation() {
    let violation = Oracle::with_engine(GreedyOverlong, b"ok\xC0\x80!", OracleOptions::default())
        .run()
        .unwrap_err();
    assert_eq!(violation.check, Check::ScalarCount);
    insta::assert_snapshot!(violation.to_string(), @"scalar-count check failed: expected 4 UTF-16 units, got 5");
}

#[test]
fn snapshot_byte_wise_resync_violation() {
    let violation = Oracle::with_engine(ByteWiseResync, b"a\xE2\x82b", OracleOptions::default())
        .run()
        .unwrap_err();
    assert_eq!(violation.check, Check::CustomPlaceholder);
    assert_eq!(violation.byte_offset(), Some(3));
    insta::assert_snapshot!(violation.to_string(), @r#"custom-placeholder check failed: unit 6 is 0x007B, expected 0x0062 (input at byte 3: "b")"#);
}
