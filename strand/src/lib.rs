// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Strand is the string-value engine of a language runtime: immutable
//! 16-bit-code-unit text values backed by a persistent, shared DAG of
//! string fragments (a rope) that rewrites itself flat on first character
//! access, plus length-adaptive substring search, rope-aware search,
//! replace/split, and a UTF-16 ⇄ UTF-8 codec.
//!
//! All heap-allocated strings live in a [`StringHeap`] arena; the public
//! [`StringValue`] handle is `Copy` and stable across representation
//! changes, so flattening a rope is invisible to every holder of a handle
//! into the same DAG.

mod atoms;
mod codec;
mod error;
mod flatten;
mod heap;
mod matcher;
mod rope;
mod rope_matcher;
pub mod statics;
mod string;
mod text_ops;

pub use atoms::AtomTable;
pub use codec::{decode_utf8, decode_utf8_into, encode_utf8, encode_utf8_into, utf8_length};
pub use error::{StringError, StringResult};
pub use flatten::{rope_capacity_for, GrowthPolicy};
pub use heap::{StringHeap, StringIndex};
pub use matcher::string_match;
pub use rope::{concat, RopeBuilder, MAX_LENGTH};
pub use rope_matcher::rope_match;
pub use string::{StringRecord, StringValue};
pub use text_ops::{find, replace_one, split};
