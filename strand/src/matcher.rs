// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Substring search over flat code-unit slices.
//!
//! The entry point is [`string_match`], a length-adaptive dispatcher:
//! single-unit patterns get a direct scan, large text/pattern combinations
//! get Boyer–Moore–Horspool, and everything else goes through an unrolled
//! first-unit scan with a pattern-length-adaptive tail comparison.

/// BMH skip tables cover code units below this; a pattern unit at or above
/// it disqualifies BMH entirely, while a text unit merely shifts by the
/// whole pattern length.
const BMH_CHAR_SET_SIZE: usize = 256;

/// Skip distances are stored as `u8`, bounding the BMH pattern length.
const BMH_PAT_LEN_MAX: usize = 255;

/// Find the first occurrence of `pat` in `text`, as a code unit index.
///
/// The empty pattern matches at index 0.
pub fn string_match(text: &[u16], pat: &[u16]) -> Option<usize> {
    if pat.is_empty() {
        return Some(0);
    }
    if text.len() < pat.len() {
        return None;
    }

    if pat.len() == 1 {
        let p0 = pat[0];
        return text.iter().position(|&unit| unit == p0);
    }

    // BMH pays off only once the text is long enough to amortize building
    // the skip table and the pattern long enough that skips beat a scan.
    if text.len() >= 512 && (11..=BMH_PAT_LEN_MAX).contains(&pat.len()) {
        match boyer_moore_horspool(text, pat) {
            BmhOutcome::Found(index) => return Some(index),
            BmhOutcome::NotFound => return None,
            BmhOutcome::BadPattern => {}
        }
    }

    // Long patterns with large potential overlap want the block (memcmp)
    // comparison; for short patterns a simple loop wins.
    if pat.len() > 128 {
        unrolled_match::<BlockCmp>(text, pat)
    } else {
        unrolled_match::<ManualCmp>(text, pat)
    }
}

enum BmhOutcome {
    Found(usize),
    NotFound,
    /// The pattern contains a unit the skip table cannot represent.
    BadPattern,
}

fn boyer_moore_horspool(text: &[u16], pat: &[u16]) -> BmhOutcome {
    debug_assert!(!pat.is_empty() && pat.len() <= BMH_PAT_LEN_MAX);
    let mut skip = [pat.len() as u8; BMH_CHAR_SET_SIZE];
    let m = pat.len() - 1;
    for (i, &unit) in pat[..m].iter().enumerate() {
        if unit as usize >= BMH_CHAR_SET_SIZE {
            return BmhOutcome::BadPattern;
        }
        skip[unit as usize] = (m - i) as u8;
    }

    let mut k = m;
    while k < text.len() {
        // Compare right to left inside the current window.
        let mut i = k;
        let mut j = m;
        loop {
            if text[i] != pat[j] {
                break;
            }
            if j == 0 {
                return BmhOutcome::Found(i);
            }
            i -= 1;
            j -= 1;
        }
        let unit = text[k];
        k += if unit as usize >= BMH_CHAR_SET_SIZE {
            pat.len()
        } else {
            skip[unit as usize] as usize
        };
    }
    BmhOutcome::NotFound
}

/// Comparison strategy for the pattern tail once the first unit has matched.
trait TailCompare {
    fn matches(candidate: &[u16], tail: &[u16]) -> bool;
}

/// Block comparison; slice equality lowers to a memcmp-style compare.
struct BlockCmp;

impl TailCompare for BlockCmp {
    #[inline]
    fn matches(candidate: &[u16], tail: &[u16]) -> bool {
        candidate == tail
    }
}

/// Unit-by-unit comparison, cheaper than a block compare for short tails.
struct ManualCmp;

impl TailCompare for ManualCmp {
    #[inline]
    fn matches(candidate: &[u16], tail: &[u16]) -> bool {
        candidate.iter().zip(tail).all(|(a, b)| a == b)
    }
}

/// Linear scan that checks the first pattern unit eight text positions at a
/// time, deferring the tail comparison until a candidate is found. The bulk
/// of the time is spent rejecting 8-unit chunks with no candidate at all.
fn unrolled_match<C: TailCompare>(text: &[u16], pat: &[u16]) -> Option<usize> {
    debug_assert!(pat.len() >= 2 && text.len() >= pat.len());
    let p0 = pat[0];
    let tail = &pat[1..];
    let end = text.len() - (pat.len() - 1);

    let mut base = 0;
    for chunk in text[..end].chunks(8) {
        if chunk.contains(&p0) {
            for (offset, &unit) in chunk.iter().enumerate() {
                if unit != p0 {
                    continue;
                }
                let at = base + offset;
                if C::matches(&text[at + 1..at + pat.len()], tail) {
                    return Some(at);
                }
            }
        }
        base += chunk.len();
    }
    None
}
