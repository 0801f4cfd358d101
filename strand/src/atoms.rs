// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::RandomState;
use hashbrown::HashMap;

use crate::error::StringResult;
use crate::heap::StringHeap;
use crate::statics;
use crate::string::StringValue;

/// Interning table mapping string content to one canonical handle.
///
/// Small strings resolve through the static tables without touching the
/// map. Atomized heap strings are made immutable so their storage can no
/// longer be grown into by a later flatten.
#[derive(Debug, Default)]
pub struct AtomTable {
    map: HashMap<Box<[u16]>, StringValue, RandomState>,
}

impl AtomTable {
    pub fn new() -> Self {
        AtomTable {
            map: HashMap::with_hasher(RandomState::new()),
        }
    }

    /// Return the canonical handle for `value`'s content, registering
    /// `value` itself as the canonical handle on first sight.
    pub fn atomize(
        &mut self,
        heap: &mut StringHeap,
        value: StringValue,
    ) -> StringResult<StringValue> {
        let units: Box<[u16]> = heap.chars(value)?.into();
        if let Some(interned) = statics::lookup(&units) {
            return Ok(interned);
        }
        if let Some(&atom) = self.map.get(&units) {
            return Ok(atom);
        }
        heap.make_immutable(value)?;
        self.map.insert(units, value);
        Ok(value)
    }

    /// Look up the canonical handle for raw content without registering
    /// anything.
    pub fn lookup(&self, units: &[u16]) -> Option<StringValue> {
        statics::lookup(units).or_else(|| self.map.get(units).copied())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
