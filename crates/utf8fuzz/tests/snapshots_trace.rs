#![expect(missing_docs)]

use core::fmt::Write;

use utf8fuzz::{DecodedScalar, scalars};

fn render_trace(input: &[u8]) -> String {
    let mut out = String::new();
    for (offset, step) in scalars(input) {
        let hex = input[offset..offset + step.bytes_consumed]
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        match step.value {
            DecodedScalar::Scalar(ch) => writeln!(out, "{offset}: [{hex}] U+{:04X}", u32::from(ch)),
            DecodedScalar::Replacement => writeln!(out, "{offset}: [{hex}] replacement"),
        }
        .unwrap();
    }
    out
}

#[test]
fn snapshot_unicode_table_3_8() {
    insta::assert_snapshot!(render_trace(b"a\xF1\x80\x80\xE1\x80\xC2b\x80c\x80\xBFd"), @r"
    0: [61] U+0061
    1: [F1 80 80] replacement
    4: [E1 80] replacement
    6: [C2] replacement
    7: [62] U+0062
    8: [80] replacement
    9: [63] U+0063
    10: [80] replacement
    11: [BF] replacement
    12: [64] U+0064
    ");
}

#[test]
fn snapshot_range_violations() {
    // Overlong, surrogate and out-of-range leads all fail on their second byte.
    insta::assert_snapshot!(render_trace(b"\xE0\x80\xAF\xED\xB0\x80\xF4\x90\x80\x80"), @r"
    0: [E0] replacement
    1: [80] replacement
    2: [AF] replacement
    3: [ED] replacement
    4: [B0] replacement
    5: [80] replacement
    6: [F4] replacement
    7: [90] replacement
    8: [80] replacement
    9: [80] replacement
    ");
}

#[test]
fn snapshot_well_formed_boundaries() {
    insta::assert_snapshot!(render_trace(b"\x7F\xC2\x80\xEF\xBF\xBF\xF0\x90\x80\x80\xF4\x8F\xBF\xBF"), @r"
    0: [7F] U+007F
    1: [C2 80] U+0080
    3: [EF BF BF] U+FFFF
    6: [F0 90 80 80] U+10000
    10: [F4 8F BF BF] U+10FFFF
    ");
}

#[test]
fn snapshot_truncated_tail() {
    insta::assert_snapshot!(render_trace(b"\xF0\x9F\x98\x80\xF0\x9F\x98"), @r"
    0: [F0 9F 98 80] U+1F600
    4: [F0 9F 98] replacement
    ");
}
