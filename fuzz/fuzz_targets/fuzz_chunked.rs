#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use utf8fuzz::{Utf8Decoder, count_utf16_len, decode_utf16_lossy};

#[derive(Debug, Arbitrary)]
struct ChunkedInput {
    data: Vec<u8>,
    /// Chunk lengths, each taken modulo what is left.
    splits: Vec<u16>,
}

fn chunked(input: &ChunkedInput) {
    let bulk = decode_utf16_lossy(&input.data);
    assert_eq!(count_utf16_len(&input.data), bulk.len());

    let std_lossy: Vec<u16> = String::from_utf8_lossy(&input.data)
        .encode_utf16()
        .collect();
    assert_eq!(bulk, std_lossy, "bulk decoding differs from std for {:?}", input.data);

    let mut decoder = Utf8Decoder::new();
    let mut out = Vec::with_capacity(bulk.len());
    let mut rest = &input.data[..];
    for &split in &input.splits {
        if rest.is_empty() {
            break;
        }
        let (chunk, tail) = rest.split_at(usize::from(split) % (rest.len() + 1));
        decoder.feed(chunk, &mut out);
        assert!(decoder.pending().len() < 4);
        rest = tail;
    }
    decoder.feed(rest, &mut out);
    decoder.finish(&mut out);

    assert_eq!(out, bulk, "chunked decoding differs for {input:?}");
}

fuzz_target!(|input: ChunkedInput| chunked(&input));
