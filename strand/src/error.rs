// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::fmt;

/// Error currency of the string engine. Every variant is recoverable and is
/// returned to the immediate caller; the engine never retries internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringError {
    /// A concatenation or decode would exceed [`MAX_LENGTH`].
    ///
    /// [`MAX_LENGTH`]: crate::MAX_LENGTH
    LengthOverflow,
    /// The allocator could not satisfy a buffer or node request.
    AllocFailure,
    /// UTF-8 input could not be decoded; `offset` is the byte offset of the
    /// offending sequence's first byte.
    MalformedInput { offset: usize },
    /// UTF-16 input contained a lone surrogate; `offset` is the code unit
    /// offset of the unpaired half.
    UnpairedSurrogate { offset: usize },
    /// A fixed-capacity codec output buffer ran out of room.
    BufferTooSmall,
}

pub type StringResult<T> = Result<T, StringError>;

impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringError::LengthOverflow => write!(f, "string length overflow"),
            StringError::AllocFailure => write!(f, "allocation failure"),
            StringError::MalformedInput { offset } => {
                write!(f, "malformed UTF-8 sequence at byte offset {offset}")
            }
            StringError::UnpairedSurrogate { offset } => {
                write!(f, "unpaired surrogate at code unit offset {offset}")
            }
            StringError::BufferTooSmall => write!(f, "output buffer too small"),
        }
    }
}

impl std::error::Error for StringError {}
