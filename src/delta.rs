//! Deltas: canonical op sequences and the algorithms over them.
//!
//! A delta is either a document (only inserts) or an edit against one. Two
//! types split the responsibilities:
//!
//! - [`DeltaBuilder`] is mutable. `insert`, `retain`, `delete` and `push`
//!   append ops while keeping the sequence canonical.
//! - [`Delta`] is the finished value. `compose`, `diff` and `transform`
//!   read their operands and return a new delta; nothing mutates in place.
//!
//! # Canonical Form
//!
//! Every delta satisfies:
//! 1. No two adjacent ops could be merged (same kind, same attributes, and
//!    for inserts both text).
//! 2. An insert never directly follows a delete; inserting before or after
//!    deleting at the same position has the same effect, so inserts go first.
//! 3. Algorithm results never end in an attribute-less retain.
//!
//! With these in place, semantically equal results are also structurally
//! equal, and `==` is enough to compare deltas.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::trace;

use crate::attributes;
use crate::attributes::Attributes;
use crate::diff;
use crate::diff::RunKind;
use crate::error::Error;
use crate::error::Result;
use crate::iter::OpIter;
use crate::iter::Slices;
use crate::op::Embed;
use crate::op::Insert;
use crate::op::LINE_BREAK;
use crate::op::MAX_LEN;
use crate::op::Op;
use crate::op::OpKind;
use crate::op::UNBOUNDED;

// =============================================================================
// Builder
// =============================================================================

/// Appends ops to a delta under construction, keeping it canonical.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeltaBuilder {
    ops: Vec<Op>,
}

impl DeltaBuilder {
    pub fn new() -> DeltaBuilder {
        return DeltaBuilder { ops: Vec::new() };
    }

    /// Insert text or an embed. Empty text is ignored.
    pub fn insert(&mut self, value: impl Into<Insert>) -> &mut Self {
        return self.insert_with(value, Attributes::new());
    }

    /// Insert with attributes.
    pub fn insert_with(&mut self, value: impl Into<Insert>, attributes: Attributes) -> &mut Self {
        let value = value.into();
        if value.is_empty() {
            return self;
        }
        return self.push(Op::insert(value, attributes));
    }

    /// Keep `len` units unchanged. Zero is ignored.
    pub fn retain(&mut self, len: usize) -> &mut Self {
        return self.retain_with(len, Attributes::new());
    }

    /// Keep `len` units, applying `attributes` to them.
    pub fn retain_with(&mut self, len: usize, attributes: Attributes) -> &mut Self {
        if len == 0 {
            return self;
        }
        return self.push(Op::retain(len, attributes));
    }

    /// Remove `len` units. Zero is ignored.
    pub fn delete(&mut self, len: usize) -> &mut Self {
        if len == 0 {
            return self;
        }
        return self.push(Op::delete(len));
    }

    /// Append an op, merging it into its neighbour where possible.
    ///
    /// - delete after delete: counts add up.
    /// - insert after delete: the insert moves in front of the delete, and
    ///   may then merge with whatever precedes it.
    /// - text after text, or retain after retain, with equal attributes:
    ///   merged into one op.
    ///
    /// Zero-length ops are dropped, and counts are clamped to [`MAX_LEN`].
    pub fn push(&mut self, op: Op) -> &mut Self {
        if op.is_empty() {
            return self;
        }
        let op = op.bounded();

        let mut index = self.ops.len();
        let after_delete = self.ops.last().is_some_and(Op::is_delete);
        if after_delete && op.is_insert() {
            index -= 1;
            if index == 0 {
                self.ops.insert(0, op);
                return self;
            }
        }

        if index > 0 && absorb(&mut self.ops[index - 1], &op) {
            return self;
        }

        self.ops.insert(index, op);
        return self;
    }

    /// Append every op of `other`, merging across the seam.
    pub fn concat(&mut self, other: &Delta) -> &mut Self {
        let mut ops = other.ops.iter();
        if let Some(first) = ops.next() {
            self.push(first.clone());
            self.ops.extend(ops.cloned());
        }
        return self;
    }

    /// Drop a trailing retain that carries no attributes. Idempotent.
    pub fn chop(&mut self) -> &mut Self {
        let trailing = self.ops.last().is_some_and(|op| op.is_retain() && !op.has_attributes());
        if trailing {
            self.ops.pop();
        }
        return self;
    }

    pub fn ops(&self) -> &[Op] {
        return &self.ops;
    }

    pub fn is_empty(&self) -> bool {
        return self.ops.is_empty();
    }

    /// Finish, leaving the builder empty.
    pub fn build(&mut self) -> Delta {
        return Delta {
            ops: std::mem::take(&mut self.ops),
        };
    }
}

/// Merge `op` into `last` if they are mergeable. Counts that would pass
/// [`MAX_LEN`] are left as two ops.
fn absorb(last: &mut Op, op: &Op) -> bool {
    if last.attributes() != op.attributes() {
        return false;
    }
    match (last, op) {
        (Op::Insert { value: Insert::Text(a), .. }, Op::Insert { value: Insert::Text(b), .. }) => {
            a.push_str(b);
            return true;
        }
        (Op::Retain { len: a, .. }, Op::Retain { len: b, .. })
        | (Op::Delete { len: a }, Op::Delete { len: b }) => {
            return match a.checked_add(*b).filter(|&sum| sum <= MAX_LEN) {
                Some(sum) => {
                    *a = sum;
                    true
                }
                None => false,
            };
        }
        _ => return false,
    }
}

// =============================================================================
// Delta
// =============================================================================

/// An immutable, canonical sequence of ops.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DeltaRecord")]
pub struct Delta {
    ops: Vec<Op>,
}

#[derive(Deserialize)]
struct DeltaRecord {
    ops: Vec<Op>,
}

impl From<DeltaRecord> for Delta {
    fn from(record: DeltaRecord) -> Delta {
        return Delta::from_ops(record.ops);
    }
}

impl Delta {
    /// The empty delta: an empty document, or the identity edit.
    pub fn new() -> Delta {
        return Delta { ops: Vec::new() };
    }

    pub fn builder() -> DeltaBuilder {
        return DeltaBuilder::new();
    }

    /// Build from already-validated ops, canonicalizing on the way in.
    pub fn from_ops(ops: impl IntoIterator<Item = Op>) -> Delta {
        let mut builder = DeltaBuilder::new();
        for op in ops {
            builder.push(op);
        }
        return builder.build();
    }

    /// Reopen this delta for appending.
    pub fn into_builder(self) -> DeltaBuilder {
        return DeltaBuilder { ops: self.ops };
    }

    pub fn ops(&self) -> &[Op] {
        return &self.ops;
    }

    pub fn is_empty(&self) -> bool {
        return self.ops.is_empty();
    }

    /// Sum of op lengths, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        return self.ops.iter().fold(0, |total: usize, op| total.saturating_add(op.len()));
    }

    /// True iff every op is an insert.
    pub fn is_document(&self) -> bool {
        return self.ops.iter().all(Op::is_insert);
    }

    /// True iff the last op is text ending in a line break.
    pub fn has_trailing_newline(&self) -> bool {
        return match self.ops.last() {
            Some(Op::Insert { value: Insert::Text(text), .. }) => text.ends_with(LINE_BREAK),
            _ => false,
        };
    }

    /// Units `[start, start + len)`, splitting ops at the edges.
    ///
    /// A negative `start` counts back from the end (clamped at 0). A start
    /// past the end gives an empty delta and `len` clamps to what is left.
    pub fn slice(&self, start: isize, len: usize) -> Delta {
        let start = if start < 0 {
            self.len().saturating_sub(start.unsigned_abs())
        } else {
            start.unsigned_abs()
        };
        let finish = start.saturating_add(len);

        let mut delta = DeltaBuilder::new();
        let mut iter = OpIter::new(&self.ops);
        let mut index = 0;
        while index < finish && iter.has_next() {
            if index < start {
                index += iter.advance(start - index);
            } else {
                let op = iter.next(finish - index);
                index += op.len();
                delta.push(op);
            }
        }
        return delta.build();
    }

    /// Everything from `start` (negative counts from the end) to the end.
    pub fn slice_from(&self, start: isize) -> Delta {
        return self.slice(start, UNBOUNDED);
    }

    /// This delta followed by `other`, merging the ops at the seam.
    ///
    /// Meant for documents; for edits the result is just the two op lists
    /// end to end.
    pub fn concat(&self, other: &Delta) -> Delta {
        let mut builder = self.clone().into_builder();
        builder.concat(other);
        return builder.build();
    }

    /// Ops cut into pieces of at most `size` units.
    pub fn slices(&self, size: usize) -> Slices<'_> {
        return OpIter::new(&self.ops).each(size);
    }

    /// One `(content, attributes)` pair per unit of a document.
    pub fn chars(&self) -> Result<Chars<'_>> {
        self.require_document("chars")?;
        return Ok(Chars { slices: self.slices(1) });
    }

    /// One delta per line of a document, each ending in its line break
    /// (except a final line with no trailing newline).
    ///
    /// Embeds stay in the line they appear in. The sequence is lazy and
    /// calling `lines` again starts over.
    pub fn lines(&self) -> Result<Lines<'_>> {
        self.require_document("lines")?;
        return Ok(Lines { iter: OpIter::new(&self.ops) });
    }

    /// The text of a document with embeds left out, trimmed.
    pub fn to_plaintext(&self) -> Result<String> {
        return self.to_plaintext_with(|_| None);
    }

    /// The text of a document, rendering each embed with `render`.
    /// Embeds for which `render` returns `None` are left out.
    pub fn to_plaintext_with<F>(&self, mut render: F) -> Result<String>
    where
        F: FnMut(&Embed) -> Option<String>,
    {
        self.require_document("to_plaintext")?;

        let mut text = String::new();
        for op in &self.ops {
            match op.value() {
                Some(Insert::Text(chunk)) => text.push_str(chunk),
                Some(Insert::Embed(embed)) => {
                    if let Some(rendered) = render(embed) {
                        text.push_str(&rendered);
                    }
                }
                None => {}
            }
        }
        return Ok(text.trim().to_string());
    }

    /// The single delta equivalent to applying `self`, then `other`.
    ///
    /// Composition is associative and the empty delta is its identity.
    pub fn compose(&self, other: &Delta) -> Delta {
        let mut this = OpIter::new(&self.ops);
        let mut that = OpIter::new(&other.ops);
        let mut delta = DeltaBuilder::new();

        while this.has_next() || that.has_next() {
            if that.peek_kind() == OpKind::Insert {
                delta.push(that.next(UNBOUNDED));
                continue;
            }
            if this.peek_kind() == OpKind::Delete {
                delta.push(this.next(UNBOUNDED));
                continue;
            }

            let len = this.peek_len().min(that.peek_len());
            let mine = this.next(len);
            let theirs = that.next(len);
            match (mine, theirs) {
                (Op::Retain { attributes: a, .. }, Op::Retain { attributes: b, .. }) => {
                    delta.retain_with(len, attributes::compose(&a, &b, true));
                }
                (Op::Insert { value, attributes: a }, Op::Retain { attributes: b, .. }) => {
                    delta.insert_with(value, attributes::compose(&a, &b, false));
                }
                (Op::Retain { .. }, theirs @ Op::Delete { .. }) => {
                    delta.push(theirs);
                }
                // An insert deleted before it landed leaves nothing behind.
                _ => {}
            }
        }

        delta.chop();
        let delta = delta.build();
        trace!(
            left = self.ops.len(),
            right = other.ops.len(),
            result = delta.ops.len(),
            "compose"
        );
        return delta;
    }

    /// The edit that turns document `self` into document `other`, so that
    /// `self.compose(&self.diff(other)?) == *other`.
    pub fn diff(&self, other: &Delta) -> Result<Delta> {
        self.require_document("diff")?;
        other.require_document("diff")?;
        if self == other {
            return Ok(Delta::new());
        }

        let left = diff::project(&self.ops);
        let right = diff::project(&other.ops);
        let runs = diff::runs(&left, &right);

        let mut this = OpIter::new(&self.ops);
        let mut that = OpIter::new(&other.ops);
        let mut delta = DeltaBuilder::new();

        for run in &runs {
            let mut remaining = run.len;
            while remaining > 0 {
                let len = match run.kind {
                    RunKind::Insert => {
                        let len = remaining.min(that.peek_len());
                        delta.push(that.next(len));
                        len
                    }
                    RunKind::Delete => {
                        let len = this.advance(remaining);
                        delta.delete(len);
                        len
                    }
                    RunKind::Retain => {
                        let len = remaining.min(this.peek_len()).min(that.peek_len());
                        let mine = this.next(len);
                        let theirs = that.next(len);
                        if mine.value() == theirs.value() {
                            let changes = attributes::diff(mine.attributes(), theirs.attributes());
                            delta.retain_with(len, changes);
                        } else {
                            // Same plaintext, different content: embeds that differ.
                            debug!(len, "diff replacing mismatched run");
                            delta.push(theirs);
                            delta.delete(len);
                        }
                        len
                    }
                };
                remaining -= len;
            }
        }

        delta.chop();
        let delta = delta.build();
        trace!(
            left = self.ops.len(),
            right = other.ops.len(),
            runs = runs.len(),
            result = delta.ops.len(),
            "diff"
        );
        return Ok(delta);
    }

    /// Rewrite `other`, made concurrently with `self` against the same
    /// base, so it applies after `self`:
    ///
    /// ```text
    /// a.compose(&a.transform(&b, p)) == b.compose(&b.transform(&a, !p))
    /// ```
    ///
    /// `priority` breaks ties. When both insert at the same position, the
    /// side with priority goes first; when both set the same attribute,
    /// the side with priority keeps its value.
    pub fn transform(&self, other: &Delta, priority: bool) -> Delta {
        let mut this = OpIter::new(&self.ops);
        let mut that = OpIter::new(&other.ops);
        let mut delta = DeltaBuilder::new();

        while this.has_next() || that.has_next() {
            let mine_inserts = this.peek_kind() == OpKind::Insert;
            let theirs_inserts = that.peek_kind() == OpKind::Insert;

            if mine_inserts && (priority || !theirs_inserts) {
                let len = this.advance(UNBOUNDED);
                delta.retain(len);
                continue;
            }
            if theirs_inserts {
                delta.push(that.next(UNBOUNDED));
                continue;
            }

            let len = this.peek_len().min(that.peek_len());
            let mine = this.next(len);
            let theirs = that.next(len);
            if mine.is_delete() {
                // Already gone; whatever `other` did here is moot.
                continue;
            }
            if theirs.is_delete() {
                delta.push(theirs);
                continue;
            }
            let attributes = attributes::transform(mine.attributes(), theirs.attributes(), priority);
            delta.retain_with(len, attributes);
        }

        delta.chop();
        let delta = delta.build();
        trace!(
            left = self.ops.len(),
            right = other.ops.len(),
            priority,
            result = delta.ops.len(),
            "transform"
        );
        return delta;
    }

    /// Shift a cursor offset across this edit.
    ///
    /// Deletes before the cursor pull it left, inserts before it push it
    /// right. An insert exactly at the cursor only moves it when
    /// `priority` is false.
    pub fn transform_position(&self, index: usize, priority: bool) -> usize {
        let mut iter = OpIter::new(&self.ops);
        let mut index = index;
        let mut offset = 0;

        while iter.has_next() && offset <= index {
            let kind = iter.peek_kind();
            let len = iter.advance(UNBOUNDED);
            match kind {
                OpKind::Delete => {
                    index -= len.min(index - offset);
                    continue;
                }
                OpKind::Insert if offset < index || !priority => {
                    index = index.saturating_add(len);
                }
                _ => {}
            }
            offset = offset.saturating_add(len);
        }

        return index;
    }

    fn require_document(&self, operation: &'static str) -> Result<()> {
        if self.is_document() {
            return Ok(());
        }
        return Err(Error::NotDocument { operation });
    }
}

impl FromIterator<Op> for Delta {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        return Delta::from_ops(iter);
    }
}

impl From<DeltaBuilder> for Delta {
    fn from(mut builder: DeltaBuilder) -> Delta {
        return builder.build();
    }
}

impl From<&str> for Delta {
    /// A one-line document.
    fn from(text: &str) -> Delta {
        return Delta::builder().insert(text).build();
    }
}

impl fmt::Display for Delta {
    /// `[insert="abc" {x: 1}, retain=3, delete=4]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", op)?;
        }
        return write!(f, "]");
    }
}

// =============================================================================
// Lazy views
// =============================================================================

/// Unit-by-unit view of a document. See [`Delta::chars`].
#[derive(Clone, Debug)]
pub struct Chars<'a> {
    slices: Slices<'a>,
}

impl Iterator for Chars<'_> {
    type Item = (Insert, Attributes);

    fn next(&mut self) -> Option<Self::Item> {
        return match self.slices.next()? {
            Op::Insert { value, attributes } => Some((value, attributes)),
            _ => None,
        };
    }
}

/// Line-by-line view of a document. See [`Delta::lines`].
#[derive(Clone, Debug)]
pub struct Lines<'a> {
    iter: OpIter<'a>,
}

impl Iterator for Lines<'_> {
    type Item = Delta;

    fn next(&mut self) -> Option<Delta> {
        let mut line = DeltaBuilder::new();

        while self.iter.has_next() {
            let newline = self
                .iter
                .rest_text()
                .and_then(|text| text.chars().position(|c| c == LINE_BREAK));

            match newline {
                Some(at) => {
                    line.push(self.iter.next(at + 1));
                    return Some(line.build());
                }
                None => {
                    line.push(self.iter.next(UNBOUNDED));
                }
            }
        }

        if line.is_empty() {
            return None;
        }
        return Some(line.build());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x(value: i64) -> Attributes {
        return Attributes::new().with("x", value);
    }

    // =========================================================================
    // Builder
    // =========================================================================

    #[test]
    fn shortcuts_push_one_op() {
        assert_eq!(Delta::builder().insert_with("abc", x(1)).build().to_string(), "[insert=\"abc\" {x: 1}]");
        assert_eq!(Delta::builder().retain_with(4, x(2)).build().to_string(), "[retain=4 {x: 2}]");
        assert_eq!(Delta::builder().delete(10).build().to_string(), "[delete=10]");
    }

    #[test]
    fn zero_length_ops_are_dropped() {
        let delta = Delta::builder()
            .insert("")
            .retain(0)
            .delete(0)
            .push(Op::retain(0, x(1)))
            .push(Op::insert("", Attributes::new()))
            .build();
        assert!(delta.is_empty());
    }

    #[test]
    fn merges_inserts_with_matching_attributes() {
        let delta = Delta::builder()
            .insert_with("abc", x(1))
            .insert_with("def", x(1))
            .insert_with("ghi", x(2))
            .build();
        assert_eq!(delta.ops(), &[Op::insert("abcdef", x(1)), Op::insert("ghi", x(2))]);
    }

    #[test]
    fn merges_retains_with_matching_attributes() {
        let delta = Delta::builder().retain_with(3, x(1)).retain_with(3, x(1)).retain(4).build();
        assert_eq!(delta.ops(), &[Op::retain(6, x(1)), Op::retain(4, Attributes::new())]);
    }

    #[test]
    fn merges_deletes() {
        let delta = Delta::builder().delete(3).delete(4).build();
        assert_eq!(delta.ops(), &[Op::delete(7)]);
    }

    #[test]
    fn never_merges_embeds() {
        let image = Embed::new("image", "cat.png");
        let delta = Delta::builder().insert(image.clone()).insert(image.clone()).build();
        assert_eq!(delta.ops().len(), 2);
    }

    #[test]
    fn puts_inserts_before_deletes() {
        let delta = Delta::builder().retain(1).delete(4).insert("abc").build();
        assert_eq!(
            delta.ops(),
            &[Op::retain(1, Attributes::new()), Op::insert("abc", Attributes::new()), Op::delete(4)]
        );
    }

    #[test]
    fn hoisted_insert_merges_with_preceding_insert() {
        let delta = Delta::builder().insert("ab").delete(2).insert("cd").build();
        assert_eq!(delta.ops(), &[Op::insert("abcd", Attributes::new()), Op::delete(2)]);
    }

    #[test]
    fn hoisted_insert_goes_to_the_front() {
        let delta = Delta::builder().delete(2).insert("x").build();
        assert_eq!(delta.ops(), &[Op::insert("x", Attributes::new()), Op::delete(2)]);
    }

    #[test]
    fn chop_only_removes_plain_trailing_retain() {
        let mut builder = Delta::builder();
        builder.insert("abc").chop();
        assert_eq!(builder.ops(), &[Op::insert("abc", Attributes::new())]);

        builder.retain_with(3, x(1)).chop();
        assert_eq!(builder.ops().len(), 2);

        builder.retain(10).chop().chop();
        assert_eq!(
            builder.ops(),
            &[Op::insert("abc", Attributes::new()), Op::retain(3, x(1))]
        );
    }

    #[test]
    fn build_leaves_builder_empty() {
        let mut builder = Delta::builder();
        builder.insert("abc");
        let first = builder.build();
        assert_eq!(first.len(), 3);
        assert!(builder.is_empty());
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    #[test]
    fn is_document_requires_only_inserts() {
        let mut builder = Delta::builder();
        assert!(builder.build().is_document());
        builder.insert("abc");
        assert!(builder.clone().build().is_document());
        builder.retain(4);
        assert!(!builder.build().is_document());
    }

    #[test]
    fn trailing_newline() {
        assert!(!Delta::new().has_trailing_newline());
        assert!(!Delta::from("abc").has_trailing_newline());
        assert!(Delta::builder().insert("abc").insert("def\n").build().has_trailing_newline());
        assert!(
            !Delta::builder()
                .insert("def\n")
                .insert(Embed::new("image", "cat.png"))
                .build()
                .has_trailing_newline()
        );
    }

    #[test]
    fn length_sums_all_ops() {
        let delta = Delta::builder().insert("abc").retain(3).delete(4).insert("def").build();
        assert_eq!(delta.len(), 13);
    }

    #[test]
    fn from_ops_canonicalizes() {
        let delta = Delta::from_ops(vec![
            Op::insert("a", Attributes::new()),
            Op::insert("b", Attributes::new()),
            Op::delete(1),
            Op::insert("c", Attributes::new()),
        ]);
        assert_eq!(delta.ops(), &[Op::insert("abc", Attributes::new()), Op::delete(1)]);
    }

    // =========================================================================
    // Length limits
    // =========================================================================

    #[test]
    fn huge_retains_are_clamped() {
        let delta = Delta::builder().retain(usize::MAX).insert("x").build();
        assert_eq!(delta.ops(), &[Op::retain(MAX_LEN, Attributes::new()), Op::insert("x", Attributes::new())]);

        let delta = Delta::builder().delete(UNBOUNDED).build();
        assert_eq!(delta.ops(), &[Op::delete(MAX_LEN)]);
    }

    #[test]
    fn merges_stop_short_of_unbounded() {
        let delta = Delta::builder().retain(MAX_LEN - 1).retain(5).insert("x").build();
        assert_eq!(
            delta.ops(),
            &[
                Op::retain(MAX_LEN - 1, Attributes::new()),
                Op::retain(5, Attributes::new()),
                Op::insert("x", Attributes::new()),
            ]
        );

        let delta = Delta::builder().delete(MAX_LEN).delete(MAX_LEN).build();
        assert_eq!(delta.ops(), &[Op::delete(MAX_LEN), Op::delete(MAX_LEN)]);

        // Exactly reaching the cap still merges
        let delta = Delta::builder().retain(MAX_LEN - 1).retain(1).build();
        assert_eq!(delta.ops(), &[Op::retain(MAX_LEN, Attributes::new())]);
    }

    #[test]
    fn length_saturates() {
        let delta = Delta::builder().retain(MAX_LEN).retain_with(5, x(1)).insert("x").build();
        assert_eq!(delta.len(), usize::MAX);
    }

    #[test]
    fn huge_retain_survives_compose_and_transform() {
        let edit = Delta::builder().retain(MAX_LEN - 1).retain(5).insert("x").build();
        let insert = Op::insert("x", Attributes::new());

        let composed = Delta::new().compose(&edit);
        assert_eq!(composed.ops().last(), Some(&insert));

        let transformed = Delta::new().transform(&edit, true);
        assert_eq!(transformed.ops().last(), Some(&insert));
    }

    // =========================================================================
    // transform_position
    // =========================================================================

    #[test]
    fn transform_position_insert_at_cursor() {
        let delta = Delta::builder().retain(3).insert("def").build();
        assert_eq!(delta.transform_position(3, true), 3);
        assert_eq!(delta.transform_position(3, false), 6);
    }

    #[test]
    fn transform_position_insert_before_cursor() {
        let delta = Delta::builder().insert("ab").build();
        assert_eq!(delta.transform_position(1, true), 3);
        assert_eq!(delta.transform_position(1, false), 3);
    }

    #[test]
    fn transform_position_delete_before_cursor() {
        let delta = Delta::builder().delete(2).build();
        assert_eq!(delta.transform_position(5, true), 3);
    }

    #[test]
    fn transform_position_delete_spanning_cursor() {
        let delta = Delta::builder().retain(1).delete(5).build();
        assert_eq!(delta.transform_position(3, false), 1);
    }

    #[test]
    fn transform_position_after_edit_region() {
        let delta = Delta::builder().retain(5).insert("xyz").build();
        assert_eq!(delta.transform_position(2, false), 2);
    }
}
