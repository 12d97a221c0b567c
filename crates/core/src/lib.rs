//! argstree core library.
//!
//! Parses a sequence of arguments into a tree of matched options and
//! commands. The main entry point is [`argstree`], driven by an [`Options`]
//! tree (or one built with [`Spec`]); the result is a [`Tree`] rendered with
//! [`stringify`] or [`to_pretty_json`].

#![warn(missing_docs)]

/// Tree serialization.
pub mod dump;
pub mod error;
pub mod options;
mod parser;
pub mod spec;
pub mod split;
pub mod stringify;
pub mod tree;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Parser
pub use parser::argstree;

// Options
pub use options::{AliasArgs, AliasItem, Args, ArgsFn, Id, IdFn, NodeData, Options, ValidateFn};
pub use spec::{Spec, SpecOptions, spec};

// Result
pub use tree::{Node, Tree};

// Errors
pub use error::{ArgsTreeError, ErrorCause};

// Utilities
pub use dump::to_pretty_json;
pub use split::{Split, split};
pub use stringify::{StringifyOptions, stringify};
