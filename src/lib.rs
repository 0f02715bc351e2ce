//! Rich Text - Rich-text documents and edits as deltas.
//!
//! A [`Delta`] is a list of [`Op`]s. A delta made only of inserts is a
//! document; any other delta is an edit that can be applied to one. The
//! same three algorithms cover editing, history and collaboration:
//!
//! - [`Delta::compose`] folds two successive edits into one.
//! - [`Delta::diff`] recovers the edit between two documents.
//! - [`Delta::transform`] rebases one of two concurrent edits onto the
//!   other so that both replicas converge.
//!
//! # Quick Start
//!
//! ```
//! use rich_text::{Attributes, Delta};
//!
//! // A document
//! let doc = Delta::builder().insert("Hello World\n").build();
//!
//! // An edit: bold the first word, replace "World"
//! let bold = Attributes::new().with("bold", true);
//! let edit = Delta::builder()
//!     .retain_with(5, bold)
//!     .retain(1)
//!     .insert("Sam")
//!     .delete(5)
//!     .build();
//!
//! let next = doc.compose(&edit);
//! assert_eq!(next.to_plaintext().unwrap(), "Hello Sam");
//! assert_eq!(doc.diff(&next).unwrap(), edit);
//! ```
//!
//! # Concurrent edits
//!
//! ```
//! use rich_text::Delta;
//!
//! let a = Delta::builder().insert("a").build();
//! let b = Delta::builder().insert("b").build();
//!
//! // `a` wins the tie at position 0 on both replicas.
//! let left = a.compose(&a.transform(&b, true));
//! let right = b.compose(&b.transform(&a, false));
//! assert_eq!(left, right);
//! ```

pub mod attributes;
pub mod delta;
pub mod diff;
pub mod error;
pub mod iter;
pub mod op;

pub use attributes::AttrValue;
pub use attributes::Attributes;
pub use delta::Delta;
pub use delta::DeltaBuilder;
pub use error::Error;
pub use error::Result;
pub use iter::OpIter;
pub use op::ContentKind;
pub use op::Embed;
pub use op::Insert;
pub use op::Op;
pub use op::OpKind;
