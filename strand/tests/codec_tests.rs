// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strand::{concat, decode_utf8, encode_utf8, StringError, StringHeap, StringValue};

#[test]
fn heap_round_trips_mixed_plane_text() {
    let text = "ascii, καλημέρα, ハロー, 💩🂡";
    let mut heap = StringHeap::new();
    let s = heap.decode_utf8(text.as_bytes()).unwrap();
    assert_eq!(s.len(&heap), text.encode_utf16().count());
    assert_eq!(heap.encode_utf8(s).unwrap(), text.as_bytes());
}

#[test]
fn decoding_short_input_hits_the_static_tables() {
    let mut heap = StringHeap::new();
    let s = heap.decode_utf8(b"ok").unwrap();
    assert!(matches!(s, StringValue::Static(_)));
    assert_eq!(heap.node_count(), 0);
}

#[test]
fn malformed_input_reports_the_byte_offset() {
    let mut heap = StringHeap::new();
    // An overlong encoding of NUL after two good bytes.
    assert_eq!(
        heap.decode_utf8(&[0x61, 0x62, 0xC0, 0x80]),
        Err(StringError::MalformedInput { offset: 2 })
    );
    // Truncated sequence at the very end.
    assert_eq!(
        heap.decode_utf8(&[0x61, 0xE2, 0x82]),
        Err(StringError::MalformedInput { offset: 1 })
    );
    assert_eq!(heap.node_count(), 0);
}

#[test]
fn encoding_a_rope_flattens_it_first() {
    let mut heap = StringHeap::new();
    let left = heap.from_str("surrogate-free ").unwrap();
    let right = heap.from_str("concatenation").unwrap();
    let rope = concat(&mut heap, left, right).unwrap();
    assert!(rope.is_rope(&heap));
    assert_eq!(
        heap.encode_utf8(rope).unwrap(),
        b"surrogate-free concatenation"
    );
    assert!(rope.is_flat(&heap));
}

#[test]
fn unpaired_surrogate_reports_the_unit_offset() {
    let mut heap = StringHeap::new();
    let s = heap.from_units(&[0x77, 0x78, 0xD83D]).unwrap();
    assert_eq!(
        heap.encode_utf8(s),
        Err(StringError::UnpairedSurrogate { offset: 2 })
    );
}

#[test]
fn random_scalar_round_trips() {
    let mut rng = StdRng::seed_from_u64(0xc0dec);
    for _ in 0..200 {
        let len = rng.random_range(0..64);
        let text: String = (0..len)
            .map(|_| {
                // Skip the surrogate gap; every other scalar is fair game.
                loop {
                    let v = rng.random_range(0..=0x10FFFFu32);
                    if let Some(c) = char::from_u32(v) {
                        return c;
                    }
                }
            })
            .collect();
        let units = decode_utf8(text.as_bytes()).unwrap();
        let expected: Vec<u16> = text.encode_utf16().collect();
        assert_eq!(units, expected);
        assert_eq!(encode_utf8(&units).unwrap(), text.as_bytes());
    }
}
