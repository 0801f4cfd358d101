// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-place rope flattening.
//!
//! Flatten performs a depth-first traversal of the rope DAG, splatting each
//! leaf's characters into one contiguous buffer. Every interior node is
//! visited in three phases: record the output cursor and descend left,
//! descend right, then convert the node in place into a dependent string
//! pointing at the shared buffer. The root itself becomes the flat string
//! owning the buffer. The traversal state lives in an explicit local frame
//! stack, never in the nodes themselves.
//!
//! Ropes are DAGs, not trees: a node may be reachable as a child of several
//! parents. Frames are processed strictly LIFO, so a shared node is fully
//! converted before any later visit reaches it again; the later visit then
//! sees a dependent string and copies it like any other leaf.

use core::mem;

use crate::error::{StringError, StringResult};
use crate::heap::{StringHeap, StringIndex};
use crate::string::{DependentData, FlatData, StringRecord, StringValue};

/// Capacity policy for flatten buffers, applied to the whole string length.
pub type GrowthPolicy = fn(usize) -> usize;

const ROPE_DOUBLING_MAX: usize = 1024 * 1024;

/// Default growth policy: round up to the next power of two, except for very
/// large results which grow by 12.5%. The spare capacity lets the next
/// flatten of a `concat(this, chunk)` rope append in place, which keeps
/// repeated build-then-read loops linear.
pub fn rope_capacity_for(length: usize) -> usize {
    if length > ROPE_DOUBLING_MAX {
        return length + length / 8;
    }
    length.next_power_of_two()
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    VisitLeft,
    VisitRight,
    Finish,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: StringIndex,
    /// Output cursor position where this node's characters begin.
    start: u32,
    phase: Phase,
}

/// Convert the rope at `root` into a flat string in place. No-op when the
/// record is already linear. On allocation failure no node has been mutated.
pub(crate) fn flatten(heap: &mut StringHeap, root: StringIndex) -> StringResult<()> {
    let root_value = StringValue::String(root);
    let (left, whole_len) = match &heap[root] {
        StringRecord::Rope(rope) => (rope.left, rope.len as usize),
        _ => return Ok(()),
    };

    // Buffer selection: reuse the left child's buffer when it is an
    // extensible flat with enough spare capacity, writing new characters
    // right after its existing content. Otherwise allocate fresh; the
    // allocation strictly precedes the first node conversion so that an
    // allocation failure leaves the whole DAG untouched.
    let mut buf: Vec<u16>;
    let first_phase;
    let reusable = match left {
        StringValue::String(left_idx) => match &heap[left_idx] {
            StringRecord::Flat(f) if f.extensible && f.chars.capacity() >= whole_len => {
                Some(left_idx)
            }
            _ => None,
        },
        StringValue::Static(_) => None,
    };
    if let Some(left_idx) = reusable {
        let StringRecord::Flat(f) = &mut heap[left_idx] else {
            unreachable!()
        };
        let chars = mem::take(&mut f.chars);
        heap[left_idx] = StringRecord::Dependent(DependentData {
            base: root_value,
            start: 0,
            len: chars.len() as u32,
        });
        buf = chars;
        first_phase = Phase::VisitRight;
    } else {
        let capacity = (heap.growth_policy())(whole_len).max(whole_len);
        buf = Vec::new();
        if buf.try_reserve_exact(capacity).is_err() {
            return Err(StringError::AllocFailure);
        }
        first_phase = Phase::VisitLeft;
    }

    let mut stack = vec![Frame {
        node: root,
        start: 0,
        phase: first_phase,
    }];
    while let Some(top) = stack.len().checked_sub(1) {
        let Frame { node, start, phase } = stack[top];
        match phase {
            Phase::VisitLeft => {
                stack[top].phase = Phase::VisitRight;
                let child = rope_children(heap, node).0;
                visit_child(heap, &mut stack, &mut buf, root_value, child);
            }
            Phase::VisitRight => {
                stack[top].phase = Phase::Finish;
                let child = rope_children(heap, node).1;
                visit_child(heap, &mut stack, &mut buf, root_value, child);
            }
            Phase::Finish => {
                stack.pop();
                let len = heap[node].len() as u32;
                if node == root {
                    debug_assert_eq!(buf.len(), whole_len);
                    heap[node] = StringRecord::Flat(FlatData {
                        chars: mem::take(&mut buf),
                        extensible: true,
                    });
                } else {
                    heap[node] = StringRecord::Dependent(DependentData {
                        base: root_value,
                        start,
                        len,
                    });
                }
            }
        }
    }
    Ok(())
}

fn rope_children(heap: &StringHeap, node: StringIndex) -> (StringValue, StringValue) {
    match &heap[node] {
        StringRecord::Rope(rope) => (rope.left, rope.right),
        _ => unreachable!("traversal frame for a non-rope node"),
    }
}

/// Either push a traversal frame for a rope child or copy a leaf child's
/// characters at the output cursor.
fn visit_child(
    heap: &StringHeap,
    stack: &mut Vec<Frame>,
    buf: &mut Vec<u16>,
    root_value: StringValue,
    child: StringValue,
) {
    if let StringValue::String(idx) = child {
        if matches!(heap[idx], StringRecord::Rope(_)) {
            stack.push(Frame {
                node: idx,
                start: buf.len() as u32,
                phase: Phase::VisitLeft,
            });
            return;
        }
    }
    copy_leaf(heap, buf, root_value, child);
}

/// Copy a leaf's characters into the output buffer, resolving dependent
/// chains. A descendant converted earlier in this same traversal points back
/// at the in-flight root, whose characters live in `buf` rather than in the
/// heap record, so that case copies from within the buffer itself.
fn copy_leaf(heap: &StringHeap, buf: &mut Vec<u16>, root_value: StringValue, child: StringValue) {
    let mut v = child;
    let mut start = 0usize;
    let mut len: Option<usize> = None;
    loop {
        if v == root_value {
            let len = len.unwrap_or(buf.len());
            buf.extend_from_within(start..start + len);
            return;
        }
        match v {
            StringValue::Static(units) => {
                let len = len.unwrap_or(units.len());
                buf.extend_from_slice(&units[start..start + len]);
                return;
            }
            StringValue::String(idx) => match &heap[idx] {
                StringRecord::Flat(f) => {
                    let len = len.unwrap_or(f.chars.len());
                    buf.extend_from_slice(&f.chars[start..start + len]);
                    return;
                }
                StringRecord::External(units) => {
                    let len = len.unwrap_or(units.len());
                    buf.extend_from_slice(&units[start..start + len]);
                    return;
                }
                StringRecord::Dependent(dep) => {
                    start += dep.start as usize;
                    if len.is_none() {
                        len = Some(dep.len as usize);
                    }
                    v = dep.base;
                }
                StringRecord::Rope(_) => unreachable!("unconverted rope reached as a leaf"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::rope_capacity_for;

    #[test]
    fn growth_policy_rounds_small_lengths_up() {
        assert_eq!(rope_capacity_for(12), 16);
        assert_eq!(rope_capacity_for(1024), 1024);
        assert_eq!(rope_capacity_for(1025), 2048);
    }

    #[test]
    fn growth_policy_grows_large_lengths_by_an_eighth() {
        let large = 4 * 1024 * 1024;
        assert_eq!(rope_capacity_for(large), large + large / 8);
    }
}
