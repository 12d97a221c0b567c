use std::sync::Arc;

use super::arg::is_alias;
use crate::options::Options;
use crate::split::{sort_matches, split_sorted};

/// An alias expanded to one argument group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedAlias {
    /// The alias as written in the options (with its `-` prefix, if any).
    pub(crate) alias: String,
    /// `[option-or-command, ...args]`, never empty.
    pub(crate) args: Vec<String>,
}

/// Result of splitting a combined alias argument.
#[derive(Debug)]
pub(crate) struct AliasSplit {
    pub(crate) list: Vec<ResolvedAlias>,
    /// Characters that matched no alias.
    pub(crate) remainder: Vec<String>,
}

/// Alias lookup for the children of one node.
pub(crate) struct AliasTable {
    options: Arc<Options>,
    /// Names of `-x` style aliases without the leading `-`, longest first.
    names: Vec<String>,
}

impl AliasTable {
    pub(crate) fn new(options: Arc<Options>) -> Self {
        // only `-x` style aliases can be combined
        let mut names: Vec<String> = options
            .alias
            .keys()
            .filter(|alias| is_alias(alias))
            .map(|alias| alias[1..].to_string())
            .collect();
        sort_matches(&mut names);
        Self { options, names }
    }

    /// The argument groups of `alias`, or `None` if it is not declared.
    pub(crate) fn get_args(&self, alias: &str) -> Option<Vec<Vec<String>>> {
        self.options.alias.get(alias).map(|args| args.to_groups())
    }

    /// Expand each of `aliases` (after prepending `prefix`) in order.
    ///
    /// Returns `None` if none of them is declared. A declared alias with no
    /// groups still counts, so the result may be empty.
    pub(crate) fn resolve<S: AsRef<str>>(
        &self,
        aliases: &[S],
        prefix: &str,
    ) -> Option<Vec<ResolvedAlias>> {
        let mut found = false;
        let mut list = Vec::new();
        for alias in aliases {
            let alias = format!("{prefix}{}", alias.as_ref());
            let Some(groups) = self.get_args(&alias) else {
                continue;
            };
            found = true;
            for args in groups {
                list.push(ResolvedAlias {
                    alias: alias.clone(),
                    args,
                });
            }
        }
        found.then_some(list)
    }

    /// Split a combined alias argument such as `-abc`.
    ///
    /// Returns `None` unless `arg` is alias-shaped and at least one part of
    /// it is a declared alias.
    pub(crate) fn split(&self, arg: &str) -> Option<AliasSplit> {
        if !is_alias(arg) {
            return None;
        }
        let split = split_sorted(&arg[1..], &self.names);
        if split.values.is_empty() {
            return None;
        }
        // split values have no `-` prefix
        let list = self.resolve(&split.values, "-")?;
        Some(AliasSplit {
            list,
            remainder: split.remainder,
        })
    }
}
