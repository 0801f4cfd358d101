// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::string::StringValue;

/// The content of a string heap slot: one of the four physical
/// representations a string value can take.
///
/// The only representation transition a record ever undergoes is
/// `Rope` → `Flat` (for the flatten root) or `Rope` → `Dependent` (for the
/// root's descendants), performed in place by the flattener. It happens at
/// most once per record and is irreversible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringRecord {
    /// Contiguous code units, possibly with spare trailing capacity reserved
    /// for a later flatten to grow into.
    Flat(FlatData),
    /// Logical concatenation of `left` then `right`; stores no characters.
    Rope(RopeData),
    /// A zero-copy view into another string's buffer.
    Dependent(DependentData),
    /// Externally owned immutable buffer; never flattened or mutated.
    External(&'static [u16]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatData {
    pub(crate) chars: Vec<u16>,
    /// Set on buffers produced by flatten or fresh growable allocation. A
    /// later flatten may only reuse a left child's spare capacity while this
    /// is still set; [`StringHeap::make_immutable`] clears it before the
    /// storage is handed to an external party.
    ///
    /// [`StringHeap::make_immutable`]: crate::StringHeap::make_immutable
    pub(crate) extensible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RopeData {
    pub(crate) left: StringValue,
    pub(crate) right: StringValue,
    /// Cached total length; always `left.len + right.len`.
    pub(crate) len: u32,
}

/// View of `len` code units starting at `start` within `base`.
///
/// `slice` construction always resolves `base` to an ultimate `Flat` or
/// `External` string. The flatten buffer-reuse optimization is the one
/// producer of `Dependent`-over-`Dependent` chains, so read paths still walk
/// the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependentData {
    pub(crate) base: StringValue,
    pub(crate) start: u32,
    pub(crate) len: u32,
}

impl StringRecord {
    /// Length in code units, regardless of representation.
    pub fn len(&self) -> usize {
        match self {
            StringRecord::Flat(f) => f.chars.len(),
            StringRecord::Rope(r) => r.len as usize,
            StringRecord::Dependent(d) => d.len as usize,
            StringRecord::External(units) => units.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
