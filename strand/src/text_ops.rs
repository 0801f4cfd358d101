// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text operations composed out of search, slicing and rope building.

use crate::error::StringResult;
use crate::heap::StringHeap;
use crate::matcher::string_match;
use crate::rope::RopeBuilder;
use crate::rope_matcher::rope_match;
use crate::string::StringValue;

/// Find the first occurrence of `pat` in `text`.
///
/// Rope texts are searched segment-aware so that searching an accumulated
/// concatenation does not force it flat. The pattern is always forced
/// linear.
pub fn find(
    heap: &mut StringHeap,
    text: StringValue,
    pat: StringValue,
) -> StringResult<Option<usize>> {
    heap.ensure_linear(pat)?;
    if text.is_rope(heap) {
        // The rope search may need to mutate the heap when it bails out to a
        // flatten, so it cannot share a borrow with the pattern's characters.
        let pat_units = heap.linear_chars(pat).to_vec();
        rope_match(heap, text, &pat_units)
    } else {
        let pat_units = heap.linear_chars(pat);
        let text_units = heap.linear_chars(text);
        Ok(string_match(text_units, pat_units))
    }
}

/// Replace the first occurrence of `pat` in `text` with `replacement`.
///
/// The result shares the unmatched head and tail of `text` through
/// dependent slices; no characters are copied beyond what short-string
/// merging requires. Without a match, `text` is returned unchanged.
pub fn replace_one(
    heap: &mut StringHeap,
    text: StringValue,
    pat: StringValue,
    replacement: StringValue,
) -> StringResult<StringValue> {
    let Some(start) = find(heap, text, pat)? else {
        return Ok(text);
    };
    let end = start + pat.len(heap);
    let text_len = text.len(heap);

    let head = heap.slice(text, 0, start)?;
    let tail = heap.slice(text, end, text_len - end)?;

    let mut builder = RopeBuilder::new();
    builder.append(heap, head)?;
    builder.append(heap, replacement)?;
    builder.append(heap, tail)?;
    Ok(builder.result())
}

/// Split `text` at each occurrence of `separator`, returning at most
/// `limit` fragments when a limit is supplied.
///
/// The empty separator splits into one-unit slices. An empty `text` with a
/// non-empty separator yields a single empty fragment.
pub fn split(
    heap: &mut StringHeap,
    text: StringValue,
    separator: StringValue,
    limit: Option<usize>,
) -> StringResult<Vec<StringValue>> {
    let limit = limit.unwrap_or(usize::MAX);
    let mut fragments = Vec::new();
    if limit == 0 {
        return Ok(fragments);
    }

    let text_len = text.len(heap);
    let sep_len = separator.len(heap);

    if sep_len == 0 {
        for i in 0..text_len.min(limit) {
            fragments.push(heap.slice(text, i, 1)?);
        }
        return Ok(fragments);
    }

    if text_len == 0 {
        fragments.push(StringValue::EMPTY);
        return Ok(fragments);
    }

    // Split walks the whole text, so there is nothing to gain from a
    // segment-aware search; force both sides linear once up front.
    heap.ensure_linear(separator)?;
    let sep_units = heap.linear_chars(separator).to_vec();
    heap.ensure_linear(text)?;

    let mut offset = 0usize;
    loop {
        if fragments.len() == limit {
            return Ok(fragments);
        }
        let found = {
            let text_units = heap.linear_chars(text);
            string_match(&text_units[offset..], &sep_units)
        };
        match found {
            Some(at) => {
                fragments.push(heap.slice(text, offset, at)?);
                offset += at + sep_units.len();
            }
            None => {
                fragments.push(heap.slice(text, offset, text_len - offset)?);
                return Ok(fragments);
            }
        }
    }
}
