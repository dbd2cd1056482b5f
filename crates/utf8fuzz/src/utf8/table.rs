//! Byte classes and transitions for the UTF-8 state machine.
//!
//! Every byte maps to one of twelve classes. The start state dispatches on the
//! lead byte's class; the intermediate states accept only the continuation
//! classes that keep the sequence inside the well-formed ranges of Unicode
//! Table 3-7. Overlongs (`E0 80..9F`, `F0 80..8F`), surrogates (`ED A0..BF`)
//! and code points past U+10FFFF (`F4 90..BF`, `F5..FF`) are never reachable,
//! so a rejection always happens on the first byte that cannot continue the
//! sequence. The bytes before it are the maximal subpart.

/// `00..=7F`
pub(crate) const ASCII: u8 = 0;
/// `80..=8F`
pub(crate) const CONT_LOW: u8 = 1;
/// `90..=9F`
pub(crate) const CONT_MID: u8 = 2;
/// `A0..=BF`
pub(crate) const CONT_HIGH: u8 = 3;
/// `C2..=DF`
pub(crate) const LEAD2: u8 = 4;
/// `E0`
pub(crate) const LEAD_E0: u8 = 5;
/// `E1..=EC`, `EE..=EF`
pub(crate) const LEAD3: u8 = 6;
/// `ED`
pub(crate) const LEAD_ED: u8 = 7;
/// `F0`
pub(crate) const LEAD_F0: u8 = 8;
/// `F1..=F3`
pub(crate) const LEAD4: u8 = 9;
/// `F4`
pub(crate) const LEAD_F4: u8 = 10;
/// `C0`, `C1`, `F5..=FF`
pub(crate) const INVALID: u8 = 11;

const CLASSES: usize = 12;

pub(crate) const START: u8 = 0;
const NEED1: u8 = 1;
const NEED2: u8 = 2;
const NEED3: u8 = 3;
const AFTER_E0: u8 = 4;
const AFTER_ED: u8 = 5;
const AFTER_F0: u8 = 6;
const AFTER_F4: u8 = 7;
pub(crate) const ACCEPT: u8 = 8;
pub(crate) const REJECT: u8 = 9;

const STATES: usize = 8;

pub(crate) static BYTE_CLASS: [u8; 256] = build_byte_classes();

/// Payload bits kept from a lead byte, indexed by class.
pub(crate) static LEAD_MASK: [u8; CLASSES] = [
    0x7F, // ASCII
    0, 0, 0, // continuations never lead
    0x1F, // LEAD2
    0x0F, 0x0F, 0x0F, // LEAD_E0, LEAD3, LEAD_ED
    0x07, 0x07, 0x07, // LEAD_F0, LEAD4, LEAD_F4
    0,    // INVALID
];

const R: u8 = REJECT;
const A: u8 = ACCEPT;

/// `TRANSITIONS[state][class]` is the next state.
#[rustfmt::skip]
pub(crate) static TRANSITIONS: [[u8; CLASSES]; STATES] = [
    //   ASCII  80-8F  90-9F  A0-BF  LEAD2  E0        LEAD3  ED        F0        LEAD4  F4        INVALID
    /* START    */ [A, R, R, R, NEED1, AFTER_E0, NEED2, AFTER_ED, AFTER_F0, NEED3, AFTER_F4, R],
    /* NEED1    */ [R, A, A, A, R, R, R, R, R, R, R, R],
    /* NEED2    */ [R, NEED1, NEED1, NEED1, R, R, R, R, R, R, R, R],
    /* NEED3    */ [R, NEED2, NEED2, NEED2, R, R, R, R, R, R, R, R],
    /* AFTER_E0 */ [R, R, R, NEED1, R, R, R, R, R, R, R, R],
    /* AFTER_ED */ [R, NEED1, NEED1, R, R, R, R, R, R, R, R, R],
    /* AFTER_F0 */ [R, R, NEED2, NEED2, R, R, R, R, R, R, R, R],
    /* AFTER_F4 */ [R, NEED2, R, R, R, R, R, R, R, R, R, R],
];

const fn build_byte_classes() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut b = 0usize;
    while b < 256 {
        table[b] = match b as u8 {
            0x00..=0x7F => ASCII,
            0x80..=0x8F => CONT_LOW,
            0x90..=0x9F => CONT_MID,
            0xA0..=0xBF => CONT_HIGH,
            0xC2..=0xDF => LEAD2,
            0xE0 => LEAD_E0,
            0xE1..=0xEC | 0xEE..=0xEF => LEAD3,
            0xED => LEAD_ED,
            0xF0 => LEAD_F0,
            0xF1..=0xF3 => LEAD4,
            0xF4 => LEAD_F4,
            0xC0 | 0xC1 | 0xF5..=0xFF => INVALID,
        };
        b += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_byte_has_a_class() {
        assert_eq!(BYTE_CLASS[0x41], ASCII);
        assert_eq!(BYTE_CLASS[0x80], CONT_LOW);
        assert_eq!(BYTE_CLASS[0x9F], CONT_MID);
        assert_eq!(BYTE_CLASS[0xBF], CONT_HIGH);
        assert_eq!(BYTE_CLASS[0xC0], INVALID);
        assert_eq!(BYTE_CLASS[0xC1], INVALID);
        assert_eq!(BYTE_CLASS[0xC2], LEAD2);
        assert_eq!(BYTE_CLASS[0xEE], LEAD3);
        assert_eq!(BYTE_CLASS[0xF5], INVALID);
        assert_eq!(BYTE_CLASS[0xFF], INVALID);
    }

    #[test]
    fn continuation_states_reject_leads() {
        for state in NEED1..=AFTER_F4 {
            for class in [ASCII, LEAD2, LEAD_E0, LEAD3, LEAD_ED, LEAD_F0, LEAD4, LEAD_F4, INVALID] {
                assert_eq!(TRANSITIONS[state as usize][class as usize], REJECT);
            }
        }
    }

    #[test]
    fn start_state_rejects_bare_continuations() {
        for class in [CONT_LOW, CONT_MID, CONT_HIGH, INVALID] {
            assert_eq!(TRANSITIONS[START as usize][class as usize], REJECT);
        }
    }
}
