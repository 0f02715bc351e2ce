//! Plaintext alignment for `Delta::diff`.
//!
//! Both documents are projected to a sequence of units: one per character,
//! one placeholder per embed. The longest common subsequence of the two
//! projections says where content lines up; it says nothing about
//! attributes, and an embed placeholder matching another embed placeholder
//! does not mean the embeds are equal. `Delta::diff` re-checks both.
//!
//! The alignment itself comes from `similar`, whose Myers implementation
//! finds a shortest edit script, i.e. a longest common subsequence.

use similar::Algorithm;
use similar::DiffTag;

use crate::op::Insert;
use crate::op::Op;

/// One unit of a document's plaintext projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Unit {
    Char(char),
    /// Every embed projects to the same placeholder.
    Embed,
}

/// What the aligned region does to the left document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunKind {
    /// Present on both sides.
    Retain,
    /// Only in the left document.
    Delete,
    /// Only in the right document.
    Insert,
}

/// A maximal stretch of units with the same [`RunKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    pub kind: RunKind,
    pub len: usize,
}

/// Project insert ops to units. Non-insert ops contribute nothing; callers
/// check for documents first.
pub fn project(ops: &[Op]) -> Vec<Unit> {
    let mut units = Vec::new();
    for op in ops {
        match op.value() {
            Some(Insert::Text(text)) => units.extend(text.chars().map(Unit::Char)),
            Some(Insert::Embed(_)) => units.push(Unit::Embed),
            None => {}
        }
    }
    return units;
}

/// Align two unit sequences into merged runs.
///
/// Runs alternate kinds where they can; adjacent runs of the same kind are
/// always merged, so the output never has two consecutive `Retain` runs.
pub fn runs(left: &[Unit], right: &[Unit]) -> Vec<Run> {
    let mut result: Vec<Run> = Vec::new();
    let mut push = |kind: RunKind, len: usize| {
        if len == 0 {
            return;
        }
        match result.last_mut() {
            Some(last) if last.kind == kind => last.len += len,
            _ => result.push(Run { kind, len }),
        }
    };

    for op in similar::capture_diff_slices(Algorithm::Myers, left, right) {
        let (tag, old, new) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => push(RunKind::Retain, old.len()),
            DiffTag::Delete => push(RunKind::Delete, old.len()),
            DiffTag::Insert => push(RunKind::Insert, new.len()),
            DiffTag::Replace => {
                push(RunKind::Delete, old.len());
                push(RunKind::Insert, new.len());
            }
        }
    }

    return result;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attributes;
    use crate::op::Embed;

    fn units(text: &str) -> Vec<Unit> {
        return text.chars().map(Unit::Char).collect();
    }

    fn total(runs: &[Run], kinds: &[RunKind]) -> usize {
        return runs.iter().filter(|r| kinds.contains(&r.kind)).map(|r| r.len).sum();
    }

    #[test]
    fn projection_uses_one_unit_per_embed() {
        let ops = vec![
            Op::insert("ab", Attributes::new().with("bold", true)),
            Op::insert(Embed::new("image", "cat.png"), Attributes::new()),
            Op::insert("c", Attributes::new()),
        ];
        assert_eq!(
            project(&ops),
            vec![Unit::Char('a'), Unit::Char('b'), Unit::Embed, Unit::Char('c')]
        );
    }

    #[test]
    fn identical_sequences_are_one_retain() {
        assert_eq!(
            runs(&units("hello"), &units("hello")),
            vec![Run { kind: RunKind::Retain, len: 5 }]
        );
    }

    #[test]
    fn appended_text_is_an_insert_run() {
        assert_eq!(
            runs(&units("Hello"), &units("Hello!")),
            vec![
                Run { kind: RunKind::Retain, len: 5 },
                Run { kind: RunKind::Insert, len: 1 },
            ]
        );
    }

    #[test]
    fn empty_sides() {
        assert_eq!(runs(&[], &units("ab")), vec![Run { kind: RunKind::Insert, len: 2 }]);
        assert_eq!(runs(&units("ab"), &[]), vec![Run { kind: RunKind::Delete, len: 2 }]);
        assert!(runs(&[], &[]).is_empty());
    }

    #[test]
    fn runs_cover_both_sides_exactly() {
        let left = units("the quick brown fox");
        let right = units("a quick red fox jumps");
        let result = runs(&left, &right);

        assert_eq!(total(&result, &[RunKind::Retain, RunKind::Delete]), left.len());
        assert_eq!(total(&result, &[RunKind::Retain, RunKind::Insert]), right.len());
        assert!(result.windows(2).all(|w| w[0].kind != w[1].kind));
    }

    #[test]
    fn embed_placeholders_align_with_each_other_only() {
        let left = vec![Unit::Char('a'), Unit::Embed];
        let right = vec![Unit::Embed, Unit::Char('a')];
        let result = runs(&left, &right);
        assert_eq!(total(&result, &[RunKind::Retain]), 1);
    }
}
