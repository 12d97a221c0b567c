//! Output rendering for trees, splits, and errors.
//!
//! Pretty output goes to stdout for results and stderr for errors. JSON
//! output is always a single object on stdout.

use std::io::{self, IsTerminal};

use anyhow::Result;
use argstree_core::{ArgsTreeError, Split, StringifyOptions, Tree, stringify};
use ariadne::{Color, Fmt};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Box-drawing trees and coloured errors.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit format, or detect one from whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

/// Colour only when stderr is a terminal.
fn stderr_color(color: Color) -> Option<Color> {
    io::stderr().is_terminal().then_some(color)
}

// ── Results ─────────────────────────────────────────────────────────────

/// Print a parsed tree.
pub(crate) fn render_tree(tree: &Tree, options: StringifyOptions, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let out = serde_json::json!({ "ok": true, "tree": tree });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => println!("{}", stringify(tree.root(), options)),
    }
    Ok(())
}

/// Print a split result.
///
/// ```text
/// values (total: 2)
/// ├── ab
/// └── a
/// remainder (total: 0)
/// ```
pub(crate) fn render_split(split: &Split, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(split)?),
        Format::Pretty => {
            for (label, items) in [("values", &split.values), ("remainder", &split.remainder)] {
                println!("{label} (total: {})", items.len());
                for (index, item) in items.iter().enumerate() {
                    let branch = if index + 1 == items.len() { "└──" } else { "├──" };
                    println!("{branch} {item}");
                }
            }
        }
    }
    Ok(())
}

// ── Errors ──────────────────────────────────────────────────────────────

/// Report a parse or spec error.
///
/// - `Pretty` → `error[<cause>]: <message>` plus node notes on stderr.
/// - `Json`   → `{"ok": false, "error": {...}}` on stdout.
pub(crate) fn render_parse_error(err: &ArgsTreeError, format: Format) {
    match format {
        Format::Json => {
            let out = serde_json::json!({ "ok": false, "error": err });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("error JSON serialization cannot fail")
            );
        }
        Format::Pretty => {
            eprintln!(
                "{}[{}]: {}",
                "error".fg(stderr_color(Color::Red)),
                err.cause,
                err.message
            );
            let mut notes = Vec::new();
            if let Some(raw) = &err.raw {
                notes.push(format!("raw={raw}"));
            }
            if let Some(alias) = &err.alias {
                notes.push(format!("alias={alias}"));
            }
            if !notes.is_empty() {
                eprintln!("  = note: {}", notes.join(", "));
            }
            if !err.args.is_empty() {
                eprintln!("  = args: {}", err.args.join(" "));
            }
        }
    }
}

/// Report a failure outside of parsing (I/O, malformed spec file).
pub(crate) fn render_command_failed(err: &anyhow::Error, format: Format) {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": false,
                "error": "command_failed",
                "message": format!("{err:#}"),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("status JSON serialization cannot fail")
            );
        }
        Format::Pretty => {
            eprintln!("{}: {err:#}", "error".fg(stderr_color(Color::Red)));
        }
    }
}
