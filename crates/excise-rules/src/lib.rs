//! Removal rules and the block remover for excise.
//!
//! A document is a whole file held as text. Rules run in order against it,
//! each one deleting at most one span:
//!
//! - [`RemovalRule::Literal`] deletes the first exact occurrence of a string.
//! - [`RemovalRule::Range`] deletes from the first start marker up to, but not
//!   including, the first end marker at or after it.
//!
//! A rule that matches nothing leaves the document alone and is reported as
//! not found, so running the same rules twice is a no-op.
//!
//! ```
//! use excise_rules::{RemovalRule, apply_rules};
//!
//! let result = apply_rules(
//!     "before\nSTART\nmiddle\nEND\nafter\n",
//!     &[RemovalRule::range("START\n", "END\n")],
//! );
//! assert_eq!(result.document, "before\nEND\nafter\n");
//! assert!(result.all_matched());
//! ```

pub mod builtin;
pub mod diff;
pub mod error;
pub mod remover;
pub mod rule;
pub mod ruleset;

pub use error::{Error, Result};
pub use remover::{MissReason, RuleOutcome, RuleReport, TransformResult, apply, apply_rules};
pub use rule::{RemovalRule, RuleEntry, RuleKind};
pub use ruleset::RuleSet;
