// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::fmt::Debug;
use core::num::NonZeroU32;
use core::ops::{Index, IndexMut};

use crate::codec;
use crate::error::{StringError, StringResult};
use crate::flatten::{self, rope_capacity_for, GrowthPolicy};
use crate::rope::MAX_LENGTH;
use crate::statics;
use crate::string::{DependentData, FlatData, StringRecord, StringValue};

/// A non-zero index into the string heap. The offset in the backing vector
/// is the contained value minus one, so `Option<StringIndex>` stays
/// pointer-free at four bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StringIndex(NonZeroU32);

const _INDEX_SIZE_IS_U32: () = assert!(size_of::<Option<StringIndex>>() == size_of::<u32>());

impl Debug for StringIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "StringIndex({})", self.0.get() - 1)
    }
}

impl StringIndex {
    pub(crate) fn from_index(value: usize) -> Self {
        assert!(value < u32::MAX as usize);
        StringIndex(NonZeroU32::new(value as u32 + 1).unwrap())
    }

    pub(crate) const fn into_index(self) -> usize {
        self.0.get() as usize - 1
    }
}

/// Arena that owns every heap-allocated string node.
///
/// All operations on string values go through a `&mut StringHeap`, which
/// makes the engine structurally single-threaded per heap: a flatten runs to
/// completion before any reader can observe a node, so representation
/// transitions appear atomic.
pub struct StringHeap {
    strings: Vec<StringRecord>,
    growth_policy: GrowthPolicy,
}

impl Debug for StringHeap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StringHeap")
            .field("strings", &self.strings)
            .finish_non_exhaustive()
    }
}

impl Index<StringIndex> for StringHeap {
    type Output = StringRecord;

    fn index(&self, index: StringIndex) -> &Self::Output {
        &self.strings[index.into_index()]
    }
}

impl IndexMut<StringIndex> for StringHeap {
    fn index_mut(&mut self, index: StringIndex) -> &mut Self::Output {
        &mut self.strings[index.into_index()]
    }
}

impl Default for StringHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl StringHeap {
    pub fn new() -> Self {
        Self::with_growth_policy(rope_capacity_for)
    }

    /// Build a heap with a custom flatten buffer growth policy. The policy
    /// receives the whole string length and returns the capacity to reserve;
    /// results below the length are clamped up by the flattener.
    pub fn with_growth_policy(growth_policy: GrowthPolicy) -> Self {
        StringHeap {
            strings: Vec::new(),
            growth_policy,
        }
    }

    pub(crate) fn growth_policy(&self) -> GrowthPolicy {
        self.growth_policy
    }

    /// Number of heap records currently allocated. Mostly useful for tests
    /// asserting that an operation did not allocate.
    pub fn node_count(&self) -> usize {
        self.strings.len()
    }

    pub(crate) fn alloc(&mut self, record: StringRecord) -> StringResult<StringIndex> {
        if self.strings.try_reserve(1).is_err() {
            return Err(StringError::AllocFailure);
        }
        let index = self.strings.len();
        self.strings.push(record);
        Ok(StringIndex::from_index(index))
    }

    /// Construct a string by copying `units`, consulting the static tables
    /// first so that small strings never allocate.
    pub fn from_units(&mut self, units: &[u16]) -> StringResult<StringValue> {
        if let Some(interned) = statics::lookup(units) {
            return Ok(interned);
        }
        if units.len() > MAX_LENGTH {
            return Err(StringError::LengthOverflow);
        }
        let mut chars = Vec::new();
        if chars.try_reserve_exact(units.len()).is_err() {
            return Err(StringError::AllocFailure);
        }
        chars.extend_from_slice(units);
        let idx = self.alloc(StringRecord::Flat(FlatData {
            chars,
            extensible: false,
        }))?;
        Ok(StringValue::String(idx))
    }

    pub fn from_str(&mut self, str: &str) -> StringResult<StringValue> {
        let units: Vec<u16> = str.encode_utf16().collect();
        self.from_units(&units)
    }

    /// Wrap an externally owned immutable buffer without copying it.
    pub fn from_static_units(&mut self, units: &'static [u16]) -> StringResult<StringValue> {
        if let Some(interned) = statics::lookup(units) {
            return Ok(interned);
        }
        if units.len() > MAX_LENGTH {
            return Err(StringError::LengthOverflow);
        }
        let idx = self.alloc(StringRecord::External(units))?;
        Ok(StringValue::String(idx))
    }

    /// Decode UTF-8 bytes into a new string value.
    pub fn decode_utf8(&mut self, bytes: &[u8]) -> StringResult<StringValue> {
        let units = codec::decode_utf8(bytes)?;
        if units.len() > MAX_LENGTH {
            return Err(StringError::LengthOverflow);
        }
        self.from_units(&units)
    }

    /// Encode a string value as UTF-8, forcing a flatten if needed.
    pub fn encode_utf8(&mut self, value: StringValue) -> StringResult<Vec<u8>> {
        let chars = self.chars(value)?;
        codec::encode_utf8(chars)
    }

    /// Force `value` into a linear (non-rope) representation.
    pub fn ensure_linear(&mut self, value: StringValue) -> StringResult<()> {
        if let StringValue::String(idx) = value {
            if matches!(self[idx], StringRecord::Rope(_)) {
                flatten::flatten(self, idx)?;
            }
        }
        Ok(())
    }

    /// Borrow the code units of `value`, flattening it first if it is a
    /// rope. A second call on the same value is a no-op returning the same
    /// buffer.
    pub fn chars(&mut self, value: StringValue) -> StringResult<&[u16]> {
        self.ensure_linear(value)?;
        Ok(self.linear_chars(value))
    }

    /// Code units of an already-linear value, resolving dependent chains.
    ///
    /// Panics if `value` is still a rope; callers must go through
    /// [`chars`](Self::chars) or [`ensure_linear`](Self::ensure_linear)
    /// first.
    pub(crate) fn linear_chars(&self, value: StringValue) -> &[u16] {
        let mut v = value;
        let mut start = 0usize;
        let mut len: Option<usize> = None;
        loop {
            match v {
                StringValue::Static(units) => {
                    let len = len.unwrap_or(units.len());
                    return &units[start..start + len];
                }
                StringValue::String(idx) => match &self[idx] {
                    StringRecord::Flat(f) => {
                        let len = len.unwrap_or(f.chars.len());
                        return &f.chars[start..start + len];
                    }
                    StringRecord::External(units) => {
                        let len = len.unwrap_or(units.len());
                        return &units[start..start + len];
                    }
                    StringRecord::Dependent(d) => {
                        start += d.start as usize;
                        if len.is_none() {
                            len = Some(d.len as usize);
                        }
                        v = d.base;
                    }
                    StringRecord::Rope(_) => unreachable!("rope passed to linear_chars"),
                },
            }
        }
    }

    /// Zero-copy view of `len` code units of `base` starting at `start`.
    ///
    /// Whole-range slices return `base` itself; empty slices return the
    /// canonical empty string; ranges matching a static table entry return
    /// the interned value. When the range lies entirely inside one child of
    /// a rope the slice descends into that child, so slicing a rope does not
    /// necessarily flatten it.
    pub fn slice(
        &mut self,
        base: StringValue,
        start: usize,
        len: usize,
    ) -> StringResult<StringValue> {
        if len == 0 {
            return Ok(StringValue::EMPTY);
        }
        let base_len = base.len(self);
        assert!(
            start <= base_len && len <= base_len - start,
            "slice range out of bounds"
        );

        // Narrow into rope children while the range stays within one child.
        let mut base = base;
        let mut start = start;
        loop {
            if start == 0 && len == base.len(self) {
                return Ok(base);
            }
            let StringValue::String(idx) = base else { break };
            let StringRecord::Rope(rope) = &self[idx] else {
                break;
            };
            let (left, right) = (rope.left, rope.right);
            let left_len = left.len(self);
            if start + len <= left_len {
                base = left;
            } else if start >= left_len {
                start -= left_len;
                base = right;
            } else {
                break;
            }
        }

        self.ensure_linear(base)?;
        let chars = self.linear_chars(base);
        if let Some(interned) = statics::lookup(&chars[start..start + len]) {
            return Ok(interned);
        }

        // Never build a chain of views-over-views: walk to the ultimate flat
        // or external base.
        let mut ultimate = base;
        let mut abs_start = start;
        loop {
            let StringValue::String(idx) = ultimate else {
                break;
            };
            let StringRecord::Dependent(dep) = &self[idx] else {
                break;
            };
            abs_start += dep.start as usize;
            ultimate = dep.base;
        }

        let idx = self.alloc(StringRecord::Dependent(DependentData {
            base: ultimate,
            start: abs_start as u32,
            len: len as u32,
        }))?;
        Ok(StringValue::String(idx))
    }

    /// Give a dependent string its own flat copy of its characters.
    pub fn undepend(&mut self, value: StringValue) -> StringResult<()> {
        let StringValue::String(idx) = value else {
            return Ok(());
        };
        self.ensure_linear(value)?;
        if !matches!(self[idx], StringRecord::Dependent(_)) {
            return Ok(());
        }
        let len = value.len(self);
        let mut chars = Vec::new();
        if chars.try_reserve_exact(len).is_err() {
            return Err(StringError::AllocFailure);
        }
        chars.extend_from_slice(self.linear_chars(value));
        self[idx] = StringRecord::Flat(FlatData {
            chars,
            extensible: false,
        });
        Ok(())
    }

    /// Prepare a string's storage for exposure to an external party:
    /// flatten, undepend, and clear the extensible bit so that no later
    /// flatten grows into the buffer behind the exposed storage.
    pub fn make_immutable(&mut self, value: StringValue) -> StringResult<()> {
        self.undepend(value)?;
        if let StringValue::String(idx) = value {
            if let StringRecord::Flat(f) = &mut self[idx] {
                f.extensible = false;
            }
        }
        Ok(())
    }

    /// Code-unit equality. Same-handle comparison never allocates; otherwise
    /// both values are forced linear.
    pub fn equals(&mut self, x: StringValue, y: StringValue) -> StringResult<bool> {
        if x == y {
            return Ok(true);
        }
        if x.len(self) != y.len(self) {
            return Ok(false);
        }
        self.ensure_linear(x)?;
        self.ensure_linear(y)?;
        Ok(self.linear_chars(x) == self.linear_chars(y))
    }
}
