// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rope-aware substring search.
//!
//! Searching a rope should not force a flatten: concatenation loops stay
//! linear even when callers search the accumulated rope between appends.
//! The search walks the rope's leaves in order, first trying a flat match
//! inside each leaf, then testing for matches that straddle leaf boundaries
//! by comparing across leaves unit by unit.

use crate::error::StringResult;
use crate::heap::StringHeap;
use crate::matcher::string_match;
use crate::rope::LeafIter;
use crate::string::StringValue;

/// Ropes with more than `len >> RATIO_LOG2` leaves have a poor
/// node-to-character ratio and fall back to flatten-and-scan. Empirically
/// chosen; a tunable, not a correctness requirement.
const ROPE_MATCH_THRESHOLD_RATIO_LOG2: usize = 5;

/// Find the first occurrence of `pat` in `text` without forcing a full
/// flatten, unless the rope's leaf count makes segment-aware search not
/// worth it.
pub fn rope_match(
    heap: &mut StringHeap,
    text: StringValue,
    pat: &[u16],
) -> StringResult<Option<usize>> {
    if pat.is_empty() {
        return Ok(Some(0));
    }
    let text_len = text.len(heap);
    if text_len < pat.len() {
        return Ok(None);
    }
    if !text.is_rope(heap) {
        return Ok(string_match(heap.chars(text)?, pat));
    }

    // Collect the leaf list, bailing out if there are too many leaves for
    // the length.
    let mut leaves: Vec<StringValue> = Vec::new();
    let mut exceeded = false;
    {
        let mut budget = text_len >> ROPE_MATCH_THRESHOLD_RATIO_LOG2;
        for leaf in LeafIter::new(heap, text) {
            if budget == 0 {
                exceeded = true;
                break;
            }
            budget -= 1;
            leaves.push(leaf);
        }
    }
    if exceeded {
        let chars = heap.chars(text)?;
        return Ok(string_match(chars, pat));
    }

    // Absolute offset of the current leaf within the logical string.
    let mut pos = 0usize;

    for (outer, &leaf) in leaves.iter().enumerate() {
        let chars = heap.linear_chars(leaf);
        let len = chars.len();

        // First try to match without spanning two leaves.
        if let Some(found) = string_match(chars, pat) {
            return Ok(Some(pos + found));
        }

        // Test the overlap, starting at the first position the per-leaf
        // match could not have covered.
        let overlap_start = if pat.len() > len {
            0
        } else {
            len - pat.len() + 1
        };
        let p0 = pat[0];
        'candidates: for t in overlap_start..len {
            if chars[t] != p0 {
                continue;
            }
            let mut inner = outer;
            let mut inner_chars = chars;
            let mut tt = t + 1;
            for &pp in &pat[1..] {
                while tt == inner_chars.len() {
                    inner += 1;
                    if inner == leaves.len() {
                        return Ok(None);
                    }
                    inner_chars = heap.linear_chars(leaves[inner]);
                    tt = 0;
                }
                if inner_chars[tt] != pp {
                    continue 'candidates;
                }
                tt += 1;
            }
            return Ok(Some(pos + t));
        }

        pos += len;
    }

    Ok(None)
}
