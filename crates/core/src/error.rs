//! The error type shared by the parser and the spec builder.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::options::Options;

/// Why a parse or spec-building operation failed.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCause {
    /// The [`Options::validate`] callback returned `false`.
    Validate,
    /// The [`Options`] are self-contradictory (e.g. `min > max`).
    InvalidOptions,
    /// An option or command did not receive an acceptable number of arguments.
    InvalidRange,
    /// The spec builder was used out of order or declared a duplicate.
    InvalidSpec,
    /// An alias cluster left characters that match no declared alias.
    UnrecognizedAlias,
    /// An option-like argument was not recognized under strict mode, or an
    /// alias expanded to a token that is not declared.
    UnrecognizedArgument,
}

impl ErrorCause {
    /// The stable kebab-case name of this cause (e.g. `"invalid-range"`).
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCause::Validate => "validate",
            ErrorCause::InvalidOptions => "invalid-options",
            ErrorCause::InvalidRange => "invalid-range",
            ErrorCause::InvalidSpec => "invalid-spec",
            ErrorCause::UnrecognizedAlias => "unrecognized-alias",
            ErrorCause::UnrecognizedArgument => "unrecognized-argument",
        }
    }
}

impl fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parse or spec-building failure.
///
/// Carries the state of the node that raised it: the raw argument that
/// created the node (`None` for the root), the alias used to reach it, the
/// arguments collected so far, and the [`Options`] in force at that node.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ArgsTreeError {
    /// The failure category.
    pub cause: ErrorCause,
    /// Human-readable description.
    pub message: String,
    /// The raw argument of the failing node.
    pub raw: Option<String>,
    /// The alias used to reach the failing node.
    pub alias: Option<String>,
    /// The arguments saved to the failing node at the time of the error.
    pub args: Vec<String>,
    /// The options of the failing node.
    #[serde(skip)]
    pub options: Arc<Options>,
}

impl ArgsTreeError {
    /// Returns `true` if this error comes from an invalid specification rather
    /// than from the parsed arguments.
    pub fn is_spec_error(&self) -> bool {
        matches!(
            self.cause,
            ErrorCause::InvalidOptions | ErrorCause::InvalidSpec
        )
    }
}
