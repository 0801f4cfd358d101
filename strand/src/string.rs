// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod data;

use crate::heap::{StringHeap, StringIndex};

pub(crate) use data::{DependentData, FlatData, RopeData};
pub use data::StringRecord;

/// An immutable text value of 16-bit code units.
///
/// A `StringValue` is a cheap `Copy` handle. Heap-allocated strings are a
/// stable index into a [`StringHeap`]; what changes when a rope is flattened
/// is the *record* behind the index, never the handle itself, so every
/// holder observes the post-flatten representation automatically.
///
/// Small strings (the empty string, single units below 256, two-unit
/// alphanumeric strings and the decimal forms of 0–255) are served from
/// prebuilt static tables and never touch the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringValue {
    String(StringIndex),
    Static(&'static [u16]),
}

impl StringValue {
    /// The canonical empty string.
    pub const EMPTY: StringValue = StringValue::Static(&[]);

    /// Length in code units. Fixed at construction; survives flattening.
    pub fn len(self, heap: &StringHeap) -> usize {
        match self {
            StringValue::String(idx) => heap[idx].len(),
            StringValue::Static(units) => units.len(),
        }
    }

    pub fn is_empty(self, heap: &StringHeap) -> bool {
        self.len(heap) == 0
    }

    pub fn is_rope(self, heap: &StringHeap) -> bool {
        match self {
            StringValue::String(idx) => matches!(heap[idx], StringRecord::Rope(_)),
            StringValue::Static(_) => false,
        }
    }

    pub fn is_flat(self, heap: &StringHeap) -> bool {
        match self {
            StringValue::String(idx) => matches!(heap[idx], StringRecord::Flat(_)),
            StringValue::Static(_) => false,
        }
    }

    pub fn is_dependent(self, heap: &StringHeap) -> bool {
        match self {
            StringValue::String(idx) => matches!(heap[idx], StringRecord::Dependent(_)),
            StringValue::Static(_) => false,
        }
    }

    /// True for values whose characters are already contiguous, i.e.
    /// anything but a rope.
    pub fn is_linear(self, heap: &StringHeap) -> bool {
        !self.is_rope(heap)
    }
}

impl From<StringIndex> for StringValue {
    fn from(value: StringIndex) -> Self {
        StringValue::String(value)
    }
}
