//! The parse engine: alias resolution, match nodes, and the driving loop.
//!
//! [`argstree`] is the only public item here; everything else is internal
//! parse state.

mod alias;
mod arg;
mod driver;
mod node;

use std::sync::Arc;

pub(crate) use arg::{display_name, kind};

use crate::error::ArgsTreeError;
use crate::options::Options;
use crate::tree::Tree;

/// Parse arguments into a tree.
///
/// Each argument is matched, in order, against the `args` of the innermost
/// command reached so far. An argument that matches nothing (directly, through
/// `=` assignment, or as an alias) is saved as a positional argument of the
/// latest option, or of the command when that option is full.
///
/// ```
/// use argstree_core::{Options, argstree};
///
/// let options = Options::new()
///     .arg("--input", Options::new().max(1))
///     .arg("run", Options::new().arg("--dry", Options::new().max(0)));
/// let tree = argstree(["--input=a.txt", "b", "run", "--dry", "c"], options).unwrap();
///
/// let root = tree.root();
/// assert_eq!(root.args(), ["b"]);
/// let ids: Vec<_> = root.descendants().iter().map(|n| n.id().unwrap()).collect();
/// assert_eq!(ids, ["--input", "run", "--dry"]);
/// assert_eq!(root.children()[1].args(), ["c"]);
/// ```
///
/// # Errors
///
/// Returns an [`ArgsTreeError`] on the first invalid option range,
/// unrecognized alias or argument, or failed validation.
pub fn argstree<I, S>(args: I, options: impl Into<Arc<Options>>) -> Result<Tree, ArgsTreeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    driver::Parser::new(options.into())?.parse(args)
}
