// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Prebuilt static string tables.
//!
//! Small strings are served from process-wide immutable tables instead of
//! being allocated: the empty string, every single unit below 256, every
//! two-unit string over `[0-9a-zA-Z]`, and the decimal forms of the
//! integers 0–255 (the 100–255 range gets its own three-unit table; 0–99
//! reuse the unit and length-2 tables).

use crate::string::StringValue;

/// Units representable in the length-2 table, in table order.
const SMALL_CHARS: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const NUM_SMALL_CHARS: usize = SMALL_CHARS.len();
const UNIT_STRING_LIMIT: usize = 256;
const INT_STRING_LIMIT: usize = 256;

static UNIT_STRINGS: [[u16; 1]; UNIT_STRING_LIMIT] = build_unit_strings();
static LENGTH2_STRINGS: [[u16; 2]; NUM_SMALL_CHARS * NUM_SMALL_CHARS] = build_length2_strings();
static HUNDRED_STRINGS: [[u16; 3]; INT_STRING_LIMIT - 100] = build_hundred_strings();

const fn build_unit_strings() -> [[u16; 1]; UNIT_STRING_LIMIT] {
    let mut table = [[0u16; 1]; UNIT_STRING_LIMIT];
    let mut i = 0;
    while i < UNIT_STRING_LIMIT {
        table[i][0] = i as u16;
        i += 1;
    }
    table
}

const fn build_length2_strings() -> [[u16; 2]; NUM_SMALL_CHARS * NUM_SMALL_CHARS] {
    let mut table = [[0u16; 2]; NUM_SMALL_CHARS * NUM_SMALL_CHARS];
    let mut i = 0;
    while i < NUM_SMALL_CHARS {
        let mut j = 0;
        while j < NUM_SMALL_CHARS {
            table[i * NUM_SMALL_CHARS + j] = [SMALL_CHARS[i] as u16, SMALL_CHARS[j] as u16];
            j += 1;
        }
        i += 1;
    }
    table
}

const fn build_hundred_strings() -> [[u16; 3]; INT_STRING_LIMIT - 100] {
    let mut table = [[0u16; 3]; INT_STRING_LIMIT - 100];
    let mut i = 0;
    while i < table.len() {
        let value = i + 100;
        table[i] = [
            b'0' as u16 + (value / 100) as u16,
            b'0' as u16 + (value / 10 % 10) as u16,
            b'0' as u16 + (value % 10) as u16,
        ];
        i += 1;
    }
    table
}

const fn to_small_char(unit: u16) -> Option<u8> {
    if unit >= 128 {
        return None;
    }
    let c = unit as u8;
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'z' => Some(c - b'a' + 10),
        b'A'..=b'Z' => Some(c - b'A' + 36),
        _ => None,
    }
}

/// The interned single-unit string for `unit`, when `unit < 256`.
pub fn unit_string(unit: u16) -> Option<StringValue> {
    if (unit as usize) < UNIT_STRING_LIMIT {
        Some(StringValue::Static(&UNIT_STRINGS[unit as usize]))
    } else {
        None
    }
}

/// The interned two-unit string for a pair of `[0-9a-zA-Z]` units.
pub fn length2_string(first: u16, second: u16) -> Option<StringValue> {
    let (i, j) = (to_small_char(first)?, to_small_char(second)?);
    Some(StringValue::Static(
        &LENGTH2_STRINGS[i as usize * NUM_SMALL_CHARS + j as usize],
    ))
}

/// The interned decimal string for an integer in `0..256`.
pub fn int_string(value: u16) -> Option<StringValue> {
    match value {
        0..=9 => unit_string(b'0' as u16 + value),
        10..=99 => length2_string(b'0' as u16 + value / 10, b'0' as u16 + value % 10),
        100..=255 => Some(StringValue::Static(&HUNDRED_STRINGS[value as usize - 100])),
        _ => None,
    }
}

/// Look `units` up in the static tables. This is the intern-table fast path
/// consulted by constructors and `slice`.
pub fn lookup(units: &[u16]) -> Option<StringValue> {
    match *units {
        [] => Some(StringValue::EMPTY),
        [unit] => unit_string(unit),
        [first, second] => length2_string(first, second),
        [hundreds, tens, ones] => {
            let digit = |unit: u16| {
                (b'0' as u16..=b'9' as u16)
                    .contains(&unit)
                    .then_some(unit - b'0' as u16)
            };
            let value = digit(hundreds)? * 100 + digit(tens)? * 10 + digit(ones)?;
            // Only 100..=255 exist as three-unit table entries; anything with
            // a leading zero is not a canonical int string.
            if (100..256).contains(&value) {
                int_string(value)
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units_of(value: StringValue) -> &'static [u16] {
        match value {
            StringValue::Static(units) => units,
            StringValue::String(_) => panic!("expected a static string"),
        }
    }

    #[test]
    fn unit_table() {
        assert_eq!(units_of(unit_string(b'a' as u16).unwrap()), &[b'a' as u16]);
        assert_eq!(units_of(unit_string(0).unwrap()), &[0]);
        assert_eq!(units_of(unit_string(255).unwrap()), &[255]);
        assert!(unit_string(256).is_none());
    }

    #[test]
    fn length2_table() {
        let ab = length2_string(b'a' as u16, b'B' as u16).unwrap();
        assert_eq!(units_of(ab), &[b'a' as u16, b'B' as u16]);
        assert!(length2_string(b'a' as u16, b'!' as u16).is_none());
    }

    #[test]
    fn int_strings() {
        for (value, expected) in [(0u16, "0"), (7, "7"), (10, "10"), (42, "42"), (100, "100"), (255, "255")] {
            let interned = int_string(value).unwrap();
            let expected: Vec<u16> = expected.encode_utf16().collect();
            assert_eq!(units_of(interned), expected.as_slice());
        }
        assert!(int_string(256).is_none());
    }

    #[test]
    fn lookup_hits_and_misses() {
        assert_eq!(lookup(&[]), Some(StringValue::EMPTY));
        assert!(lookup(&[b'q' as u16]).is_some());
        assert!(lookup(&[b'4' as u16, b'2' as u16]).is_some());
        let one_twenty_three: Vec<u16> = "123".encode_utf16().collect();
        assert!(lookup(&one_twenty_three).is_some());
        // Leading zero is not a canonical int string.
        let oh_one_two: Vec<u16> = "012".encode_utf16().collect();
        assert!(lookup(&oh_one_two).is_none());
        let too_long: Vec<u16> = "abcd".encode_utf16().collect();
        assert!(lookup(&too_long).is_none());
        // Non-alphanumeric pairs are not interned.
        assert!(lookup(&[b'a' as u16, b' ' as u16]).is_none());
    }
}
