//! A run-length cursor over a list of ops.
//!
//! Compose, diff and transform walk two deltas whose op boundaries rarely
//! line up. `OpIter` hides that: callers ask for "at most N units" and get
//! back a slice of whatever op is under the cursor, split on demand.
//!
//! Past the end the iterator yields an unbounded retain, so a lock-step
//! loop over two operands never has to special-case the shorter one.
//!
//! ```text
//! ops:    [insert "abc"] [retain 3] [delete 2]
//! cursor:        ^ index 0, offset 1
//! peek:   insert "bc"
//! next(1): insert "b", cursor moves to offset 2
//! ```

use crate::op::Insert;
use crate::op::Op;
use crate::op::OpKind;
use crate::op::UNBOUNDED;
use crate::op::byte_len;

/// A cursor over a borrowed op list. Never mutates the list.
///
/// The cursor remembers both the unit offset and, for text, the byte offset
/// into the current op, so each unit is scanned once however the op is cut.
#[derive(Clone, Debug)]
pub struct OpIter<'a> {
    ops: &'a [Op],
    index: usize,
    offset: usize,
    byte: usize,
    /// Length of `ops[index]`, or 0 past the end.
    current_len: usize,
}

impl<'a> OpIter<'a> {
    pub fn new(ops: &'a [Op]) -> OpIter<'a> {
        return OpIter {
            ops,
            index: 0,
            offset: 0,
            byte: 0,
            current_len: ops.first().map_or(0, Op::len),
        };
    }

    /// Rewind to the first op.
    pub fn reset(&mut self) {
        *self = OpIter::new(self.ops);
    }

    /// The rest of the current op, without advancing.
    pub fn peek(&self) -> Op {
        return match self.ops.get(self.index) {
            Some(op) => self.cut(op, UNBOUNDED).0,
            None => Op::unbounded(),
        };
    }

    /// Units left in the current op; `UNBOUNDED` past the end.
    #[inline]
    pub fn peek_len(&self) -> usize {
        if self.index >= self.ops.len() {
            return UNBOUNDED;
        }
        return self.current_len - self.offset;
    }

    /// Kind of the current op; `Retain` past the end.
    #[inline]
    pub fn peek_kind(&self) -> OpKind {
        return match self.ops.get(self.index) {
            Some(op) => op.kind(),
            None => OpKind::Retain,
        };
    }

    /// True while real ops remain.
    #[inline]
    pub fn has_next(&self) -> bool {
        return self.index < self.ops.len();
    }

    /// Consume up to `max_len` units of the current op.
    ///
    /// Pass [`UNBOUNDED`] to take the whole remainder. Once exhausted this
    /// keeps returning the unbounded retain.
    pub fn next(&mut self, max_len: usize) -> Op {
        let Some(op) = self.ops.get(self.index) else {
            return Op::unbounded();
        };

        let (piece, len, bytes) = self.cut(op, max_len);
        self.step(len, bytes);
        return piece;
    }

    /// Like [`OpIter::next`] but only moves the cursor; returns the units skipped.
    pub fn advance(&mut self, max_len: usize) -> usize {
        if !self.has_next() {
            return max_len;
        }
        let len = max_len.min(self.peek_len());
        let bytes = match self.rest_text() {
            Some(text) => byte_len(text, len),
            None => 0,
        };
        self.step(len, bytes);
        return len;
    }

    /// The unread part of the current op, if it is text.
    pub(crate) fn rest_text(&self) -> Option<&'a str> {
        return match self.ops.get(self.index) {
            Some(Op::Insert { value: Insert::Text(text), .. }) => Some(&text[self.byte..]),
            _ => None,
        };
    }

    /// Lazily split the remaining ops into pieces of at most `size` units.
    /// A `size` of 0 is treated as 1.
    pub fn each(self, size: usize) -> Slices<'a> {
        return Slices { iter: self, size: size.max(1) };
    }

    /// Up to `max_len` units of `op` from the cursor: the piece, its length
    /// in units and, for text, in bytes.
    fn cut(&self, op: &Op, max_len: usize) -> (Op, usize, usize) {
        let len = max_len.min(self.current_len - self.offset);
        return match op {
            Op::Insert { value: Insert::Text(text), attributes } => {
                let rest = &text[self.byte..];
                let bytes = byte_len(rest, len);
                let piece = Op::Insert {
                    value: Insert::Text(rest[..bytes].to_string()),
                    attributes: attributes.clone(),
                };
                (piece, len, bytes)
            }
            other => (other.split(self.offset, len), len, 0),
        };
    }

    /// Move past `len` units (`bytes` bytes of text), stepping to the next
    /// op when the current one is used up.
    fn step(&mut self, len: usize, bytes: usize) {
        if self.offset + len >= self.current_len {
            self.index += 1;
            self.offset = 0;
            self.byte = 0;
            self.current_len = self.ops.get(self.index).map_or(0, Op::len);
        } else {
            self.offset += len;
            self.byte += bytes;
        }
    }
}

/// Finite, single-pass sequence of sub-ops no longer than `size`.
///
/// Created by [`OpIter::each`] and [`crate::Delta::slices`].
#[derive(Clone, Debug)]
pub struct Slices<'a> {
    iter: OpIter<'a>,
    size: usize,
}

impl Iterator for Slices<'_> {
    type Item = Op;

    fn next(&mut self) -> Option<Op> {
        if !self.iter.has_next() {
            return None;
        }
        return Some(self.iter.next(self.size));
    }
}
