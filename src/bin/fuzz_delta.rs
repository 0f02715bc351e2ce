//! AFL fuzz harness for the delta algebra.
//!
//! This harness checks the laws collaboration depends on:
//! 1. Convergence: two concurrent edits, each transformed against the other,
//!    produce the same document in either order
//! 2. Compose identity: composing with the empty delta changes nothing
//! 3. Diff round-trip: `a.compose(&a.diff(&b)) == b`
//!
//! Model: two users share a base document. Each edits a local copy and
//! accumulates a pending edit; a sync exchanges the pending edits, transforms
//! them, and both users rebase on the converged result.

use afl::fuzz;
use rich_text::AttrValue;
use rich_text::Attributes;
use rich_text::Delta;
use rich_text::Embed;

const NUM_USERS: usize = 2;

/// Operation types the fuzzer can generate
#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    /// User inserts text at a position in their copy
    Insert { user: u8, pos_frac: u8, len: u8, format: u8 },
    /// User inserts an embed at a position in their copy
    Embed { user: u8, pos_frac: u8 },
    /// User deletes a range from their copy
    Delete { user: u8, pos_frac: u8, len: u8 },
    /// User changes attributes over a range of their copy
    Format { user: u8, pos_frac: u8, len: u8, format: u8 },
    /// Both users exchange pending edits
    Sync,
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        let (&tag, rest) = bytes.split_first()?;
        let user = |b: u8| b % NUM_USERS as u8;

        return match tag % 5 {
            0 if rest.len() >= 4 => Some((
                FuzzOp::Insert {
                    user: user(rest[0]),
                    pos_frac: rest[1],
                    len: (rest[2] % 8).saturating_add(1),
                    format: rest[3],
                },
                &rest[4..],
            )),
            1 if rest.len() >= 2 => Some((
                FuzzOp::Embed {
                    user: user(rest[0]),
                    pos_frac: rest[1],
                },
                &rest[2..],
            )),
            2 if rest.len() >= 3 => Some((
                FuzzOp::Delete {
                    user: user(rest[0]),
                    pos_frac: rest[1],
                    len: (rest[2] % 8).saturating_add(1),
                },
                &rest[3..],
            )),
            3 if rest.len() >= 4 => Some((
                FuzzOp::Format {
                    user: user(rest[0]),
                    pos_frac: rest[1],
                    len: (rest[2] % 8).saturating_add(1),
                    format: rest[3],
                },
                &rest[4..],
            )),
            4 => Some((FuzzOp::Sync, rest)),
            _ => None,
        };
    }
}

fn format(n: u8, removals: bool) -> Attributes {
    return match n % 5 {
        0 => Attributes::new(),
        1 => Attributes::new().with("bold", true),
        2 => Attributes::new().with("color", "red"),
        3 if removals => Attributes::new().with("bold", AttrValue::Null),
        _ => Attributes::new().with("italic", true),
    };
}

fn position(pos_frac: u8, len: usize) -> usize {
    return (pos_frac as usize * len / 256).min(len);
}

/// Exchange pending edits, check convergence, and return the new base.
fn sync(base: &Delta, pending: &mut [Delta; NUM_USERS]) -> Delta {
    let [a, b] = &*pending;
    let left = base.compose(a).compose(&a.transform(b, true));
    let right = base.compose(b).compose(&b.transform(a, false));

    // CRITICAL INVARIANT: both users converge
    assert_eq!(left, right, "Convergence failure!\n  base: {base}\n  a: {a}\n  b: {b}");

    let edit = base.diff(&left).expect("base and result are documents");
    assert_eq!(base.compose(&edit), left, "Diff round-trip failure from {base} to {left}");
    assert_eq!(left.compose(&Delta::new()), left, "Compose identity failure on {left}");

    *pending = [Delta::new(), Delta::new()];
    return left;
}

fn main() {
    fuzz!(|data: &[u8]| {
        let mut base = Delta::builder().insert("Hello World\n").build();
        let mut pending = [Delta::new(), Delta::new()];
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;

            let (user, edit) = match op {
                FuzzOp::Insert { user, pos_frac, len, format: n } => {
                    let local = base.compose(&pending[user as usize]);
                    let pos = position(pos_frac, local.len());
                    let content: String = (0..len).map(|i| (b'a' + (user + i) % 26) as char).collect();
                    let edit = Delta::builder().retain(pos).insert_with(content, format(n, false)).build();
                    (user, edit)
                }

                FuzzOp::Embed { user, pos_frac } => {
                    let local = base.compose(&pending[user as usize]);
                    let pos = position(pos_frac, local.len());
                    let embed = Embed::new("image", format!("{user}.png"));
                    (user, Delta::builder().retain(pos).insert(embed).build())
                }

                FuzzOp::Delete { user, pos_frac, len } => {
                    let local = base.compose(&pending[user as usize]);
                    let pos = position(pos_frac, local.len());
                    let len = (len as usize).min(local.len() - pos);
                    (user, Delta::builder().retain(pos).delete(len).build())
                }

                FuzzOp::Format { user, pos_frac, len, format: n } => {
                    let local = base.compose(&pending[user as usize]);
                    let pos = position(pos_frac, local.len());
                    let len = (len as usize).min(local.len() - pos);
                    (user, Delta::builder().retain(pos).retain_with(len, format(n, true)).build())
                }

                FuzzOp::Sync => {
                    base = sync(&base, &mut pending);
                    continue;
                }
            };

            let slot = &mut pending[user as usize];
            *slot = slot.compose(&edit);
            assert!(base.compose(slot).is_document(), "Local copy stopped being a document");
        }

        sync(&base, &mut pending);
    });
}
