//! JSON spec files.
//!
//! A spec file describes a root command and its nested declarations. It is
//! applied through [`Spec`], so duplicates are rejected the same way as in
//! code:
//!
//! ```json
//! {
//!   "name": "app",
//!   "strict": true,
//!   "options": [
//!     { "arg": "--verbose", "maxRead": 0, "alias": ["-v"] },
//!     { "arg": "build", "command": true,
//!       "options": [{ "arg": "--release", "maxRead": 0, "alias": ["-r"] }] }
//!   ],
//!   "aliases": { "-A": [["--verbose"], ["build"]] }
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use argstree_core::{AliasArgs, ArgsTreeError, Id, Spec, SpecOptions};
use indexmap::IndexMap;
use serde::Deserialize;

/// Node settings shared by the root and every declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Settings {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) min: Option<usize>,
    pub(crate) max: Option<usize>,
    pub(crate) max_read: Option<usize>,
    pub(crate) strict: Option<bool>,
    pub(crate) assign: Option<bool>,
    #[serde(default)]
    pub(crate) initial: Vec<String>,
}

impl Settings {
    fn to_spec_options(&self) -> SpecOptions {
        SpecOptions {
            id: self.id.clone().map(Id::Value),
            name: self.name.clone(),
            min: self.min,
            max: self.max,
            max_read: self.max_read,
            strict: self.strict,
            assign: self.assign,
            initial: self.initial.clone(),
            validate: None,
        }
    }
}

/// `"-v"` or `{ "name": "--no-color", "args": ["0"] }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum AliasEntry {
    Name(String),
    WithArgs {
        name: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

/// One declared option or command.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Entry {
    pub(crate) arg: String,
    /// Force a command even without nested options.
    #[serde(default)]
    pub(crate) command: bool,
    #[serde(flatten)]
    pub(crate) settings: Settings,
    #[serde(default)]
    pub(crate) alias: Vec<AliasEntry>,
    #[serde(default)]
    pub(crate) options: Vec<Entry>,
    #[serde(default)]
    pub(crate) aliases: IndexMap<String, AliasArgs>,
}

impl Entry {
    fn is_command(&self) -> bool {
        self.command || !self.options.is_empty() || !self.aliases.is_empty()
    }
}

/// The root of a spec file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpecFile {
    #[serde(flatten)]
    pub(crate) settings: Settings,
    #[serde(default)]
    pub(crate) options: Vec<Entry>,
    #[serde(default)]
    pub(crate) aliases: IndexMap<String, AliasArgs>,
}

impl SpecFile {
    /// Read and deserialize a spec file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read spec file '{}'", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("failed to parse spec file '{}'", path.display()))
    }

    pub(crate) fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply the declarations to a new root [`Spec`].
    pub(crate) fn build(&self) -> Result<Spec, ArgsTreeError> {
        let mut spec = Spec::new(self.settings.to_spec_options());
        apply(&mut spec, &self.options, &self.aliases)?;
        Ok(spec)
    }
}

fn apply(
    spec: &mut Spec,
    entries: &[Entry],
    aliases: &IndexMap<String, AliasArgs>,
) -> Result<(), ArgsTreeError> {
    for entry in entries {
        let options = entry.settings.to_spec_options();
        if entry.is_command() {
            spec.command(entry.arg.as_str(), options)?;
        } else {
            spec.option(entry.arg.as_str(), options)?;
        }
        for alias in &entry.alias {
            match alias {
                AliasEntry::Name(name) => spec.alias(name.as_str())?,
                AliasEntry::WithArgs { name, args } => {
                    spec.alias_args(name.as_str(), args.as_slice())?
                }
            };
        }
        if entry.is_command() {
            spec.spec(|child| apply(child, &entry.options, &entry.aliases))?;
        }
    }
    spec.aliases(aliases.iter().map(|(alias, args)| (alias.clone(), args.clone())))?;
    Ok(())
}
