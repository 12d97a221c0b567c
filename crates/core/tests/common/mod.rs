//! Shared test helpers for `argstree_core` integration tests.

#![allow(unreachable_pub)]

use std::sync::Arc;

use argstree_core::{ArgsTreeError, ErrorCause, Node, Options, Tree, argstree};

// ─── Parse helpers ───────────────────────────────────────────────────────────

/// Parse and fail the test on error.
#[allow(dead_code)]
pub fn parse(args: &[&str], options: impl Into<Arc<Options>>) -> Tree {
    argstree(args, options).unwrap_or_else(|e| panic!("parse {args:?} failed: {e}"))
}

/// Parse, expect an error with `cause`, and return it.
#[allow(dead_code)]
pub fn parse_err(args: &[&str], options: impl Into<Arc<Options>>, cause: ErrorCause) -> ArgsTreeError {
    match argstree(args, options) {
        Ok(tree) => panic!("expected {cause} for {args:?}, got {tree:?}"),
        Err(err) => {
            assert_eq!(err.cause, cause, "unexpected cause: {}", err.message);
            err
        }
    }
}

/// Assert that an error carries exactly the given options (by identity).
#[allow(dead_code)]
pub fn assert_options(err: &ArgsTreeError, options: &Arc<Options>) {
    assert!(
        Arc::ptr_eq(&err.options, options),
        "error options differ: {:?}",
        err.options
    );
}

// ─── Node helpers ────────────────────────────────────────────────────────────

/// Ids of the given nodes, `"null"` for a missing id.
#[allow(dead_code)]
pub fn ids(nodes: &[Node<'_>]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| n.id().unwrap_or("null").to_string())
        .collect()
}

/// Aliases of the given nodes, `"null"` for none.
#[allow(dead_code)]
pub fn aliases(nodes: &[Node<'_>]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| n.alias().unwrap_or("null").to_string())
        .collect()
}

/// Arguments of the given nodes.
#[allow(dead_code)]
pub fn args(nodes: &[Node<'_>]) -> Vec<Vec<String>> {
    nodes.iter().map(|n| n.args().to_vec()).collect()
}

/// An empty argument list for comparisons.
#[allow(dead_code)]
pub const NONE: [&str; 0] = [];
