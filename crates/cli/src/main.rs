mod config;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use argstree_core::{StringifyOptions, split};
use clap::{Parser, Subcommand};
use log::debug;

use crate::config::SpecFile;
use crate::render::{
    Format, render_command_failed, render_parse_error, render_split, render_tree,
};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "argstree",
    version,
    about = "Parse command-line arguments into a tree of options and commands"
)]
struct Cli {
    /// Output mode: "pretty" for a box-drawing tree, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse arguments against a JSON spec file and print the tree.
    Parse {
        /// Path to the spec file.
        #[arg(long)]
        spec: PathBuf,
        /// Leave node arguments out of the pretty tree.
        #[arg(long)]
        no_args: bool,
        /// List the ancestors of each node in the pretty tree.
        #[arg(long)]
        ancestors: bool,
        /// List the descendants of each node in the pretty tree.
        #[arg(long)]
        descendants: bool,
        /// The arguments to parse, after `--`.
        #[arg(last = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Split a value into the given matches, longest first.
    Split {
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[arg(allow_hyphen_values = true)]
        matches: Vec<String>,
    },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    let result = match cli.cmd {
        Cmd::Parse {
            spec,
            no_args,
            ancestors,
            descendants,
            args,
        } => {
            let view = StringifyOptions {
                args: !no_args,
                ancestors,
                descendants,
            };
            cmd_parse(&spec, &args, view, format)
        }
        Cmd::Split { value, matches } => cmd_split(&value, &matches, format),
    };

    result.unwrap_or_else(|err| {
        render_command_failed(&err, format);
        ExitCode::FAILURE
    })
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(path: &Path, args: &[String], view: StringifyOptions, format: Format) -> Result<ExitCode> {
    let file = SpecFile::load(path)?;
    let spec = match file.build() {
        Ok(spec) => spec,
        Err(err) => {
            render_parse_error(&err, format);
            return Ok(ExitCode::FAILURE);
        }
    };

    debug!("parsing {} argument(s) against {}", args.len(), path.display());
    match spec.parse(args) {
        Ok(tree) => {
            debug!("parsed {} node(s)", tree.len());
            render_tree(&tree, view, format)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            render_parse_error(&err, format);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_split(value: &str, matches: &[String], format: Format) -> Result<ExitCode> {
    let result = split(value, matches);
    render_split(&result, format)?;
    Ok(ExitCode::SUCCESS)
}
