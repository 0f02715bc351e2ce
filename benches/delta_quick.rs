// Quick single-run timings for development iteration

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rich_text::Attributes;
use rich_text::Delta;

const EDITS: usize = 2_000;

fn time_ops<F: Fn() -> usize>(f: F, iterations: usize) -> f64 {
    // Warmup
    for _ in 0..3 {
        let _ = f();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = f();
    }
    return start.elapsed().as_nanos() as f64 / iterations as f64;
}

/// One keystroke against a document of `len` units.
fn keystroke(rng: &mut StdRng, len: usize) -> Delta {
    let pos = rng.gen_range(0..=len);
    let mut edit = Delta::builder();
    edit.retain(pos);
    match rng.gen_range(0..10) {
        0..=6 => {
            edit.insert(((b'a' + rng.gen_range(0..26)) as char).to_string());
        }
        7 | 8 if pos < len => {
            edit.delete(1);
        }
        _ if pos < len => {
            edit.retain_with(1, Attributes::new().with("bold", true));
        }
        _ => {
            edit.insert(" ");
        }
    }
    return edit.build();
}

fn main() {
    // Typing: compose one keystroke at a time onto a growing document
    let typing = time_ops(
        || {
            let mut rng = StdRng::seed_from_u64(7);
            let mut doc = Delta::new();
            for _ in 0..EDITS {
                let edit = keystroke(&mut rng, doc.len());
                doc = doc.compose(&edit);
            }
            doc.len()
        },
        10,
    );

    // Collaboration: rebase a stream of remote keystrokes over local ones
    let rebase = time_ops(
        || {
            let mut rng = StdRng::seed_from_u64(11);
            let mut doc = Delta::builder().insert("x".repeat(1_000)).build();
            for _ in 0..EDITS / 4 {
                let local = keystroke(&mut rng, doc.len());
                let remote = keystroke(&mut rng, doc.len());
                doc = doc.compose(&local).compose(&local.transform(&remote, true));
            }
            doc.len()
        },
        10,
    );

    // History: diff the document against itself after each batch of edits
    let history = time_ops(
        || {
            let mut rng = StdRng::seed_from_u64(13);
            let mut doc = Delta::builder().insert("lorem ipsum dolor sit amet\n".repeat(40)).build();
            let mut changes = 0;
            for _ in 0..20 {
                let mut next = doc.clone();
                for _ in 0..10 {
                    let edit = keystroke(&mut rng, next.len());
                    next = next.compose(&edit);
                }
                changes += doc.diff(&next).map(|d| d.ops().len()).unwrap_or(0);
                doc = next;
            }
            changes
        },
        10,
    );

    println!("{:<12} {:>14}", "workload", "ns/run");
    println!("{:<12} {:>14.0}", "typing", typing);
    println!("{:<12} {:>14.0}", "rebase", rebase);
    println!("{:<12} {:>14.0}", "history", history);
}
