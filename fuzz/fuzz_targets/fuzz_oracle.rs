#![no_main]
use std::cell::RefCell;

use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use utf8fuzz::{Oracle, OracleOptions};

const HEADER: usize = 1; // placeholder choice + slack

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static PLACEHOLDERS: [&str; 4] = ["{BAD}", "", "\u{FFFD}", "\u{1F4A5}"];

/// Byte sequences that sit on the edges of the decoder's state machine.
static FRAGMENTS: &[&[u8]] = &[
    // overlongs
    b"\xC0\x80",
    b"\xC1\xBF",
    b"\xE0\x80\xAF",
    b"\xE0\x9F\xBF",
    b"\xF0\x80\x80\xAF",
    b"\xF0\x8F\xBF\xBF",
    // surrogates
    b"\xED\xA0\x80",
    b"\xED\xBF\xBF",
    b"\xED\x9F\xBF",
    // out of range
    b"\xF4\x90\x80\x80",
    b"\xF5\x80\x80\x80",
    b"\xFF",
    b"\xFE",
    // truncated prefixes
    b"\xC2",
    b"\xE2\x82",
    b"\xF0\x9F\x98",
    // lone continuations
    b"\x80",
    b"\xBF",
    // well-formed edges
    b"\x7F",
    b"\xC2\x80",
    b"\xDF\xBF",
    b"\xE0\xA0\x80",
    b"\xEF\xBF\xBF",
    b"\xEF\xBF\xBD",
    b"\xF0\x90\x80\x80",
    b"\xF4\x8F\xBF\xBF",
    b"\xEF\xBB\xBF",
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if max_size <= HEADER || !(size < HEADER || seed.is_multiple_of(4)) {
        return fuzzer_mutate(data, size, max_size);
    }

    data[0] = with_rng(|rng| rng.random());
    let target = size.clamp(HEADER + 1, max_size);
    let mut len = HEADER;
    while len < target {
        len += append_fragment(&mut data[len..target]);
    }
    len
}

/// Writes one fragment, a random scalar or a random byte into `buf`, cut to
/// fit. Returns the number of bytes written, at least one.
fn append_fragment(buf: &mut [u8]) -> usize {
    with_rng(|rng| {
        let mut scalar = [0u8; 4];
        let bytes: &[u8] = match rng.random_range(0..8) {
            0..=4 => FRAGMENTS[rng.random_range(0..FRAGMENTS.len())],
            5 | 6 => rng.random::<char>().encode_utf8(&mut scalar).as_bytes(),
            _ => {
                scalar[0] = rng.random();
                &scalar[..1]
            }
        };
        let len = bytes.len().min(buf.len());
        buf[..len].copy_from_slice(&bytes[..len]);
        len
    })
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn oracle(data: &[u8]) {
    let Some((&flags, input)) = data.split_first() else {
        return;
    };

    let options = OracleOptions {
        placeholder: PLACEHOLDERS[usize::from(flags & 3)].into(),
        slack: usize::from(flags >> 2) * 4,
        panic_on_violation: true,
    };
    if let Err(violation) = Oracle::new(input, options).run() {
        panic!("{violation}");
    }
}

fuzz_target!(|data: &[u8]| oracle(data));
