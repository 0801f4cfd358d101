// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::{StringError, StringResult};
use crate::heap::StringHeap;
use crate::string::{FlatData, RopeData, StringRecord, StringValue};

/// Maximum representable string length in code units.
pub const MAX_LENGTH: usize = (1 << 28) - 1;

/// Concatenation results up to this many code units are copied into one
/// small flat buffer instead of building a rope node.
pub(crate) const MAX_SHORT_LENGTH: usize = 7;

/// Concatenate `left` and `right`.
///
/// Empty operands are elided without allocating. Short results are copied
/// eagerly (forcing each operand linear first, which may itself flatten).
/// Everything else gets an O(1) rope node referencing both operands, which
/// is what keeps `s = s + chunk` loops linear instead of quadratic.
pub fn concat(
    heap: &mut StringHeap,
    left: StringValue,
    right: StringValue,
) -> StringResult<StringValue> {
    let left_len = left.len(heap);
    if left_len == 0 {
        return Ok(right);
    }
    let right_len = right.len(heap);
    if right_len == 0 {
        return Ok(left);
    }

    let whole_len = left_len + right_len;

    if whole_len <= MAX_SHORT_LENGTH {
        let mut chars = Vec::new();
        if chars.try_reserve_exact(whole_len).is_err() {
            return Err(StringError::AllocFailure);
        }
        chars.extend_from_slice(heap.chars(left)?);
        chars.extend_from_slice(heap.chars(right)?);
        let idx = heap.alloc(StringRecord::Flat(FlatData {
            chars,
            extensible: false,
        }))?;
        return Ok(StringValue::String(idx));
    }

    if whole_len > MAX_LENGTH {
        return Err(StringError::LengthOverflow);
    }

    let idx = heap.alloc(StringRecord::Rope(RopeData {
        left,
        right,
        len: whole_len as u32,
    }))?;
    Ok(StringValue::String(idx))
}

/// Accumulator that folds a sequence of string values into one result by
/// repeated concatenation. Used by the text operations to assemble results
/// out of slices of the input plus replacement text.
#[derive(Debug)]
pub struct RopeBuilder {
    result: StringValue,
}

impl Default for RopeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RopeBuilder {
    pub fn new() -> Self {
        RopeBuilder {
            result: StringValue::EMPTY,
        }
    }

    pub fn append(&mut self, heap: &mut StringHeap, value: StringValue) -> StringResult<()> {
        self.result = concat(heap, self.result, value)?;
        Ok(())
    }

    pub fn result(self) -> StringValue {
        self.result
    }
}

/// Iterator over a string's leaves in left-to-right order. Yields the value
/// itself when it is not a rope.
pub(crate) struct LeafIter<'a> {
    heap: &'a StringHeap,
    stack: Vec<StringValue>,
    next: Option<StringValue>,
}

impl<'a> LeafIter<'a> {
    pub(crate) fn new(heap: &'a StringHeap, root: StringValue) -> Self {
        let mut iter = LeafIter {
            heap,
            stack: Vec::new(),
            next: None,
        };
        iter.settle(root);
        iter
    }

    /// Descend to the leftmost leaf under `value`, stashing right children.
    fn settle(&mut self, value: StringValue) {
        let mut v = value;
        loop {
            match v {
                StringValue::String(idx) => {
                    if let StringRecord::Rope(rope) = &self.heap[idx] {
                        self.stack.push(rope.right);
                        v = rope.left;
                        continue;
                    }
                }
                StringValue::Static(_) => {}
            }
            self.next = Some(v);
            return;
        }
    }
}

impl Iterator for LeafIter<'_> {
    type Item = StringValue;

    fn next(&mut self) -> Option<StringValue> {
        let leaf = self.next.take()?;
        if let Some(pending) = self.stack.pop() {
            self.settle(pending);
        }
        Some(leaf)
    }
}
