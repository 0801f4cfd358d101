// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UTF-16 ⇄ UTF-8 conversion primitives.
//!
//! The engine's internal representation is raw 16-bit code units; external
//! text arrives and leaves as UTF-8. Decoding rejects malformed sequences
//! (bare continuation bytes, overlong encodings, values past U+10FFFF) with
//! the byte offset of the offending sequence. Surrogate code points encoded
//! in the input are passed through as lone units rather than rejected, since
//! the 16-bit side is permitted to hold them. Encoding requires properly
//! paired surrogates and reports the unit offset of an unpaired half.

use crate::error::{StringError, StringResult};

const LEAD_SURROGATE_MIN: u16 = 0xD800;
const LEAD_SURROGATE_MAX: u16 = 0xDBFF;
const TRAIL_SURROGATE_MIN: u16 = 0xDC00;
const TRAIL_SURROGATE_MAX: u16 = 0xDFFF;

/// Minimum scalar value for each UTF-8 sequence length; anything below is an
/// overlong encoding.
const MIN_FOR_LENGTH: [u32; 5] = [0, 0, 0x80, 0x800, 0x10000];

fn decode_core(
    src: &[u8],
    mut emit: impl FnMut(u16) -> StringResult<()>,
) -> StringResult<()> {
    let mut offset = 0;
    while offset < src.len() {
        let byte = src[offset];
        if byte & 0x80 == 0 {
            emit(byte as u16)?;
            offset += 1;
            continue;
        }

        let n = byte.leading_ones() as usize;
        if n == 1 || n > 4 {
            return Err(StringError::MalformedInput { offset });
        }
        if offset + n > src.len() {
            return Err(StringError::MalformedInput { offset });
        }
        for j in 1..n {
            if src[offset + j] & 0xC0 != 0x80 {
                return Err(StringError::MalformedInput { offset });
            }
        }

        let mut v = (byte as u32) & (0x7F >> n);
        for j in 1..n {
            v = (v << 6) | (src[offset + j] as u32 & 0x3F);
        }
        if v < MIN_FOR_LENGTH[n] || v > 0x10FFFF {
            return Err(StringError::MalformedInput { offset });
        }

        if v >= 0x10000 {
            let v = v - 0x10000;
            emit((LEAD_SURROGATE_MIN as u32 + (v >> 10)) as u16)?;
            emit((TRAIL_SURROGATE_MIN as u32 + (v & 0x3FF)) as u16)?;
        } else {
            emit(v as u16)?;
        }
        offset += n;
    }
    Ok(())
}

/// Decode UTF-8 bytes into freshly allocated code units.
pub fn decode_utf8(src: &[u8]) -> StringResult<Vec<u16>> {
    let mut out = Vec::new();
    if out.try_reserve(src.len()).is_err() {
        return Err(StringError::AllocFailure);
    }
    decode_core(src, |unit| {
        out.push(unit);
        Ok(())
    })?;
    Ok(out)
}

/// Decode UTF-8 bytes into a caller-provided buffer, returning the number
/// of units written. Fails with [`StringError::BufferTooSmall`] when `dst`
/// runs out of room.
pub fn decode_utf8_into(src: &[u8], dst: &mut [u16]) -> StringResult<usize> {
    let mut written = 0;
    decode_core(src, |unit| {
        let slot = dst.get_mut(written).ok_or(StringError::BufferTooSmall)?;
        *slot = unit;
        written += 1;
        Ok(())
    })?;
    Ok(written)
}

/// Encode one Unicode scalar value as 1–4 UTF-8 bytes, returning the length.
fn one_scalar_to_utf8(buf: &mut [u8; 4], v: u32) -> usize {
    debug_assert!(v <= 0x10FFFF);
    if v < 0x80 {
        buf[0] = v as u8;
        1
    } else if v < 0x800 {
        buf[0] = 0xC0 | (v >> 6) as u8;
        buf[1] = 0x80 | (v & 0x3F) as u8;
        2
    } else if v < 0x10000 {
        buf[0] = 0xE0 | (v >> 12) as u8;
        buf[1] = 0x80 | ((v >> 6) & 0x3F) as u8;
        buf[2] = 0x80 | (v & 0x3F) as u8;
        3
    } else {
        buf[0] = 0xF0 | (v >> 18) as u8;
        buf[1] = 0x80 | ((v >> 12) & 0x3F) as u8;
        buf[2] = 0x80 | ((v >> 6) & 0x3F) as u8;
        buf[3] = 0x80 | (v & 0x3F) as u8;
        4
    }
}

fn encode_core(
    src: &[u16],
    mut emit: impl FnMut(&[u8]) -> StringResult<()>,
) -> StringResult<()> {
    let mut i = 0;
    while i < src.len() {
        let offset = i;
        let unit = src[i];
        let v = if (TRAIL_SURROGATE_MIN..=TRAIL_SURROGATE_MAX).contains(&unit) {
            return Err(StringError::UnpairedSurrogate { offset });
        } else if (LEAD_SURROGATE_MIN..=LEAD_SURROGATE_MAX).contains(&unit) {
            let Some(&trail) = src.get(i + 1) else {
                return Err(StringError::UnpairedSurrogate { offset });
            };
            if !(TRAIL_SURROGATE_MIN..=TRAIL_SURROGATE_MAX).contains(&trail) {
                return Err(StringError::UnpairedSurrogate { offset });
            }
            i += 1;
            0x10000
                + (((unit - LEAD_SURROGATE_MIN) as u32) << 10)
                + (trail - TRAIL_SURROGATE_MIN) as u32
        } else {
            unit as u32
        };

        let mut buf = [0u8; 4];
        let n = one_scalar_to_utf8(&mut buf, v);
        emit(&buf[..n])?;
        i += 1;
    }
    Ok(())
}

/// Number of bytes [`encode_utf8`] would produce for `src`.
pub fn utf8_length(src: &[u16]) -> StringResult<usize> {
    let mut total = 0;
    encode_core(src, |bytes| {
        total += bytes.len();
        Ok(())
    })?;
    Ok(total)
}

/// Encode code units as freshly allocated UTF-8 bytes.
pub fn encode_utf8(src: &[u16]) -> StringResult<Vec<u8>> {
    let mut out = Vec::new();
    if out.try_reserve(src.len()).is_err() {
        return Err(StringError::AllocFailure);
    }
    encode_core(src, |bytes| {
        if out.try_reserve(bytes.len()).is_err() {
            return Err(StringError::AllocFailure);
        }
        out.extend_from_slice(bytes);
        Ok(())
    })?;
    Ok(out)
}

/// Encode code units into a caller-provided buffer, returning the number of
/// bytes written. Fails with [`StringError::BufferTooSmall`] when `dst`
/// runs out of room.
pub fn encode_utf8_into(src: &[u16], dst: &mut [u8]) -> StringResult<usize> {
    let mut written = 0;
    encode_core(src, |bytes| {
        let end = written + bytes.len();
        if end > dst.len() {
            return Err(StringError::BufferTooSmall);
        }
        dst[written..end].copy_from_slice(bytes);
        written = end;
        Ok(())
    })?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passthrough() {
        assert_eq!(decode_utf8(b"abc").unwrap(), vec![0x61, 0x62, 0x63]);
        assert_eq!(encode_utf8(&[0x61, 0x62, 0x63]).unwrap(), b"abc");
    }

    #[test]
    fn overlong_nul_is_malformed_at_its_start() {
        assert_eq!(
            decode_utf8(&[0xC0, 0x80]),
            Err(StringError::MalformedInput { offset: 0 })
        );
        assert_eq!(
            decode_utf8(&[0x61, 0xC0, 0x80]),
            Err(StringError::MalformedInput { offset: 1 })
        );
    }

    #[test]
    fn bare_continuation_and_truncation() {
        assert_eq!(
            decode_utf8(&[0x80]),
            Err(StringError::MalformedInput { offset: 0 })
        );
        assert_eq!(
            decode_utf8(&[0xE2, 0x82]),
            Err(StringError::MalformedInput { offset: 0 })
        );
        assert_eq!(
            decode_utf8(&[0xF8, 0x88, 0x80, 0x80, 0x80]),
            Err(StringError::MalformedInput { offset: 0 })
        );
    }

    #[test]
    fn beyond_unicode_range_is_malformed() {
        // 0x110000 encoded in four bytes.
        assert_eq!(
            decode_utf8(&[0xF4, 0x90, 0x80, 0x80]),
            Err(StringError::MalformedInput { offset: 0 })
        );
    }

    #[test]
    fn supplementary_plane_decodes_to_a_surrogate_pair() {
        // U+1F4A9
        let units = decode_utf8("💩".as_bytes()).unwrap();
        assert_eq!(units, vec![0xD83D, 0xDCA9]);
        assert_eq!(encode_utf8(&units).unwrap(), "💩".as_bytes());
    }

    #[test]
    fn surrogate_code_points_in_utf8_input_pass_through() {
        // U+D800 as a raw three-byte sequence decodes to a lone unit.
        let units = decode_utf8(&[0xED, 0xA0, 0x80]).unwrap();
        assert_eq!(units, vec![0xD800]);
    }

    #[test]
    fn unpaired_surrogates_fail_encoding_with_offset() {
        assert_eq!(
            encode_utf8(&[0x61, 0xD800]),
            Err(StringError::UnpairedSurrogate { offset: 1 })
        );
        assert_eq!(
            encode_utf8(&[0xDC00]),
            Err(StringError::UnpairedSurrogate { offset: 0 })
        );
        assert_eq!(
            encode_utf8(&[0xD800, 0x61]),
            Err(StringError::UnpairedSurrogate { offset: 0 })
        );
    }

    #[test]
    fn fixed_capacity_modes() {
        let mut units = [0u16; 2];
        assert_eq!(decode_utf8_into(b"hi", &mut units), Ok(2));
        assert_eq!(&units, &[0x68, 0x69]);
        assert_eq!(
            decode_utf8_into(b"hip", &mut units),
            Err(StringError::BufferTooSmall)
        );

        let mut bytes = [0u8; 3];
        assert_eq!(encode_utf8_into(&[0x20AC], &mut bytes), Ok(3));
        assert_eq!(&bytes, "€".as_bytes());
        let mut small = [0u8; 2];
        assert_eq!(
            encode_utf8_into(&[0x20AC], &mut small),
            Err(StringError::BufferTooSmall)
        );
    }

    #[test]
    fn measured_length_matches_encoding() {
        let units: Vec<u16> = "ascii € 💩 mixed".encode_utf16().collect();
        assert_eq!(
            utf8_length(&units).unwrap(),
            encode_utf8(&units).unwrap().len()
        );
    }
}
