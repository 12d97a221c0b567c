//! Incremental builder for [`Options`].
//!
//! The builder keeps declarations in order and rejects duplicates, which the
//! plain [`Options`] maps would silently overwrite.
//!
//! ```
//! use argstree_core::{SpecOptions, spec};
//!
//! # fn main() -> Result<(), argstree_core::ArgsTreeError> {
//! let mut cmd = spec(SpecOptions::default());
//! cmd.option("--verbose", SpecOptions { max_read: Some(0), ..SpecOptions::default() })?
//!     .alias("-v")?;
//! cmd.command("build", SpecOptions::default())?
//!     .spec(|build| {
//!         build.option("--release", SpecOptions::default())?.alias("-r")?;
//!         Ok(())
//!     })?;
//!
//! let tree = cmd.parse(["-v", "build", "-r"])?;
//! let ids: Vec<_> = tree.root().descendants().iter().map(|n| n.id().unwrap()).collect();
//! assert_eq!(ids, ["--verbose", "build", "--release"]);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{ArgsTreeError, ErrorCause};
use crate::options::{AliasArgs, Args, ArgsFn, Id, NodeData, Options, ValidateFn};
use crate::parser::{argstree, display_name, kind};
use crate::tree::Tree;

/// The non-structural [`Options`] of one declaration.
///
/// `args` and `alias` are managed by [`Spec`] itself.
#[derive(Clone, Default)]
pub struct SpecOptions {
    /// See [`Options::id`].
    pub id: Option<Id>,
    /// See [`Options::name`].
    pub name: Option<String>,
    /// See [`Options::min`].
    pub min: Option<usize>,
    /// See [`Options::max`].
    pub max: Option<usize>,
    /// See [`Options::max_read`].
    pub max_read: Option<usize>,
    /// See [`Options::strict`].
    pub strict: Option<bool>,
    /// See [`Options::assign`].
    pub assign: Option<bool>,
    /// See [`Options::initial`].
    pub initial: Vec<String>,
    /// See [`Options::validate`].
    pub validate: Option<ValidateFn>,
}

impl fmt::Debug for SpecOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecOptions")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("max_read", &self.max_read)
            .field("strict", &self.strict)
            .field("assign", &self.assign)
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

/// Create a root [`Spec`].
pub fn spec(options: SpecOptions) -> Spec {
    Spec::new(options)
}

/// A spec under construction. Each declared option or command owns a child
/// spec, configured through [`Spec::spec`].
#[derive(Clone)]
pub struct Spec {
    id: Option<String>,
    depth: usize,
    /// Declared args from the root down to the parent.
    path: Vec<String>,
    options: SpecOptions,
    args: Option<IndexMap<String, Spec>>,
    handler: Option<ArgsFn>,
    alias: IndexMap<String, AliasArgs>,
}

impl Spec {
    /// A root spec.
    pub fn new(options: SpecOptions) -> Self {
        Self::with_id(None, Vec::new(), options)
    }

    fn with_id(id: Option<String>, path: Vec<String>, options: SpecOptions) -> Self {
        let depth = path.len() + usize::from(id.is_some());
        Self {
            id,
            depth,
            path,
            options,
            args: None,
            handler: None,
            alias: IndexMap::new(),
        }
    }

    /// The declared argument. `None` for the root.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Zero for the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    // ── Declarations ────────────────────────────────────────────────────

    /// Declare an option (or command) matched by `arg`.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCause::InvalidSpec`] error if `arg` is already
    /// declared.
    pub fn option(
        &mut self,
        arg: impl Into<String>,
        options: SpecOptions,
    ) -> Result<&mut Self, ArgsTreeError> {
        let arg = arg.into();
        let exists = self.args_mut().contains_key(&arg);
        if exists {
            let kind = kind(Some(arg.as_str()));
            return Err(self.error(format!("{kind} '{arg}' already exists.")));
        }
        let mut path = self.path.clone();
        path.extend(self.id.clone());
        let child = Self::with_id(Some(arg.clone()), path, options);
        self.args_mut().insert(arg, child);
        Ok(self)
    }

    /// Declare a command: an option whose child spec has its own `args`.
    ///
    /// # Errors
    ///
    /// Same as [`Spec::option`].
    pub fn command(
        &mut self,
        arg: impl Into<String>,
        options: SpecOptions,
    ) -> Result<&mut Self, ArgsTreeError> {
        self.option(arg, options)?.spec(|spec| {
            spec.args();
            Ok(())
        })
    }

    /// Alias the latest declaration.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCause::InvalidSpec`] error if nothing was declared
    /// yet or if `alias` is already declared.
    pub fn alias(&mut self, alias: impl Into<String>) -> Result<&mut Self, ArgsTreeError> {
        let arg = self.current_arg("alias()")?;
        self.assign_alias(alias.into(), AliasArgs::Single(arg))?;
        Ok(self)
    }

    /// Alias the latest declaration under several names.
    ///
    /// # Errors
    ///
    /// Same as [`Spec::alias`]. Names before the failing one stay declared.
    pub fn alias_all<I, S>(&mut self, aliases: I) -> Result<&mut Self, ArgsTreeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let arg = self.current_arg("alias()")?;
        for alias in aliases {
            self.assign_alias(alias.into(), AliasArgs::Single(arg.clone()))?;
        }
        Ok(self)
    }

    /// Alias the latest declaration along with arguments for it.
    ///
    /// # Errors
    ///
    /// Same as [`Spec::alias`].
    pub fn alias_args<S: AsRef<str>>(
        &mut self,
        alias: impl Into<String>,
        args: &[S],
    ) -> Result<&mut Self, ArgsTreeError> {
        let arg = self.current_arg("alias()")?;
        let group: Vec<String> = std::iter::once(arg)
            .chain(args.iter().map(|arg| arg.as_ref().to_string()))
            .collect();
        self.assign_alias(alias.into(), AliasArgs::from(group))?;
        Ok(self)
    }

    /// Configure the child spec of the latest declaration.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCause::InvalidSpec`] error if nothing was declared
    /// yet, or whatever `setup` returns.
    pub fn spec<F>(&mut self, setup: F) -> Result<&mut Self, ArgsTreeError>
    where
        F: FnOnce(&mut Spec) -> Result<(), ArgsTreeError>,
    {
        setup(self.current_mut("spec()")?)?;
        Ok(self)
    }

    /// Declare raw aliases.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCause::InvalidSpec`] error on the first alias that
    /// is already declared.
    pub fn aliases<I, K, V>(&mut self, aliases: I) -> Result<&mut Self, ArgsTreeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AliasArgs>,
    {
        for (alias, args) in aliases {
            self.assign_alias(alias.into(), args.into())?;
        }
        Ok(self)
    }

    /// Make this spec a command, even without declarations.
    pub fn args(&mut self) -> &mut Self {
        self.args_mut();
        self
    }

    /// Match arguments that are not declared through `handler`. Replaces a
    /// previous handler.
    pub fn handler<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&str, &NodeData<'_>) -> Option<Arc<Options>> + Send + Sync + 'static,
    {
        self.args_mut();
        self.handler = Some(Arc::new(handler));
        self
    }

    // ── Output ──────────────────────────────────────────────────────────

    /// Build the [`Options`] described so far.
    pub fn options(&self) -> Arc<Options> {
        Arc::new(self.build())
    }

    /// Parse `args` against [`Spec::options`].
    ///
    /// # Errors
    ///
    /// See [`argstree`].
    pub fn parse<I, S>(&self, args: I) -> Result<Tree, ArgsTreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        argstree(args, self.options())
    }

    /// Child specs, in declaration order.
    pub fn children(&self) -> impl Iterator<Item = &Spec> {
        self.args.iter().flat_map(IndexMap::values)
    }

    /// All specs below this one, depth-first.
    pub fn descendants(&self) -> Vec<&Spec> {
        let mut out = Vec::new();
        for child in self.children() {
            out.push(child);
            out.extend(child.descendants());
        }
        out
    }

    /// The declared args leading to this spec from the root, ending with its
    /// own. Empty for the root.
    pub fn path(&self) -> Vec<&str> {
        self.path
            .iter()
            .chain(&self.id)
            .map(String::as_str)
            .collect()
    }

    /// The child spec declared for `arg`.
    pub fn get(&self, arg: &str) -> Option<&Spec> {
        self.args.as_ref()?.get(arg)
    }

    /// The specs from `root` down to the parent of this one.
    ///
    /// Child specs are owned by their parent, so the chain is looked up from
    /// `root`. Empty for a root spec, or if this spec is not declared under
    /// `root`.
    pub fn ancestors<'a>(&self, root: &'a Spec) -> Vec<&'a Spec> {
        let Some(id) = &self.id else {
            return Vec::new();
        };
        if root.id.is_some() {
            return Vec::new();
        }
        let mut chain = vec![root];
        let mut current = root;
        for arg in &self.path {
            let Some(next) = current.get(arg) else {
                return Vec::new();
            };
            chain.push(next);
            current = next;
        }
        match current.get(id) {
            Some(found) if std::ptr::eq(found, self) => chain,
            _ => Vec::new(),
        }
    }

    /// The spec that declared this one, looked up from `root`.
    pub fn parent<'a>(&self, root: &'a Spec) -> Option<&'a Spec> {
        self.ancestors(root).pop()
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn args_mut(&mut self) -> &mut IndexMap<String, Spec> {
        self.args.get_or_insert_with(IndexMap::new)
    }

    fn has_current(&self) -> bool {
        self.args.as_ref().is_some_and(|args| !args.is_empty())
    }

    fn current_arg(&self, context: &str) -> Result<String, ArgsTreeError> {
        self.args
            .as_ref()
            .and_then(IndexMap::last)
            .map(|(arg, _)| arg.clone())
            .ok_or_else(|| self.requires(context))
    }

    fn current_mut(&mut self, context: &str) -> Result<&mut Spec, ArgsTreeError> {
        if !self.has_current() {
            return Err(self.requires(context));
        }
        let args = self.args_mut();
        let last = args.len() - 1;
        Ok(&mut args[last])
    }

    fn assign_alias(&mut self, alias: String, args: AliasArgs) -> Result<(), ArgsTreeError> {
        if self.alias.contains_key(&alias) {
            return Err(self.error(format!("Alias '{alias}' already exists.")));
        }
        self.alias.insert(alias, args);
        Ok(())
    }

    fn requires(&self, context: &str) -> ArgsTreeError {
        self.error(format!(
            "Requires `option()` or `command()` call before `{context}`."
        ))
    }

    fn error(&self, message: String) -> ArgsTreeError {
        let name = display_name(self.id.as_deref(), self.options.name.as_deref());
        let message = if name.is_empty() {
            message
        } else {
            format!("{name}spec error: {message}")
        };
        ArgsTreeError {
            cause: ErrorCause::InvalidSpec,
            message,
            raw: self.id.clone(),
            alias: None,
            args: Vec::new(),
            options: self.options(),
        }
    }

    fn build(&self) -> Options {
        let SpecOptions {
            id,
            name,
            min,
            max,
            max_read,
            strict,
            assign,
            initial,
            validate,
        } = self.options.clone();

        let args = self.args.as_ref().map(|specs| {
            let map: IndexMap<String, Arc<Options>> = specs
                .iter()
                .map(|(arg, spec)| (arg.clone(), spec.options()))
                .collect();
            match &self.handler {
                // declared args win over the handler
                Some(handler) => {
                    let handler = Arc::clone(handler);
                    Args::handler(move |arg, data| {
                        map.get(arg).cloned().or_else(|| handler(arg, data))
                    })
                }
                None => Args::Map(map),
            }
        });

        Options {
            id,
            name,
            min,
            max,
            max_read,
            strict,
            assign,
            initial,
            alias: self.alias.clone(),
            args,
            validate,
        }
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spec")
            .field("id", &self.id)
            .field("depth", &self.depth)
            .field("path", &self.path)
            .field("options", &self.options)
            .field("args", &self.args)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_spec_has_no_args() {
        let root = spec(SpecOptions::default());
        assert_eq!(root.id(), None);
        assert_eq!(root.depth(), 0);
        assert!(root.options().args.is_none());
    }

    #[test]
    fn args_marks_a_command() {
        let mut root = spec(SpecOptions::default());
        root.args();
        assert!(matches!(root.options().args, Some(Args::Map(ref map)) if map.is_empty()));
    }

    #[test]
    fn options_copy_settings() {
        let root = spec(SpecOptions {
            name: Some("app".into()),
            min: Some(1),
            max: Some(2),
            initial: vec!["x".into()],
            ..SpecOptions::default()
        });
        let options = root.options();
        assert_eq!(options.name.as_deref(), Some("app"));
        assert_eq!((options.min, options.max), (Some(1), Some(2)));
        assert_eq!(options.initial, ["x"]);
    }

    #[test]
    fn children_are_nested_specs() {
        let mut root = spec(SpecOptions::default());
        root.command("build", SpecOptions::default())
            .unwrap()
            .spec(|build| {
                build.option("--release", SpecOptions::default())?;
                Ok(())
            })
            .unwrap();
        let children: Vec<_> = root.children().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id(), Some("build"));
        assert_eq!(children[0].depth(), 1);
        let descendants: Vec<_> = root.descendants().iter().map(|s| s.id()).collect();
        assert_eq!(descendants, [Some("build"), Some("--release")]);
    }

    #[test]
    fn ancestors_run_from_root_to_parent() {
        let mut root = spec(SpecOptions::default());
        root.command("build", SpecOptions::default())
            .unwrap()
            .spec(|build| {
                build
                    .command("run", SpecOptions::default())?
                    .spec(|run| {
                        run.option("--fast", SpecOptions::default())?;
                        Ok(())
                    })?;
                Ok(())
            })
            .unwrap();

        let build = root.get("build").unwrap();
        let run = build.get("run").unwrap();
        let fast = run.get("--fast").unwrap();
        assert_eq!(fast.depth(), 3);
        assert_eq!(fast.path(), ["build", "run", "--fast"]);

        let ancestors: Vec<_> = fast.ancestors(&root).iter().map(|s| s.id()).collect();
        assert_eq!(ancestors, [None, Some("build"), Some("run")]);
        assert!(std::ptr::eq(fast.parent(&root).unwrap(), run));
        assert!(std::ptr::eq(build.parent(&root).unwrap(), &root));

        assert!(root.ancestors(&root).is_empty());
        assert!(root.parent(&root).is_none());
        assert!(root.path().is_empty());
    }

    #[test]
    fn ancestors_require_the_owning_root() {
        let mut root = spec(SpecOptions::default());
        root.option("--foo", SpecOptions::default()).unwrap();
        let mut other = spec(SpecOptions::default());
        other.option("--foo", SpecOptions::default()).unwrap();

        let foo = root.get("--foo").unwrap();
        assert!(foo.ancestors(&other).is_empty());
        assert!(foo.parent(&other).is_none());
        // a detached copy is not the declared spec
        let copy = foo.clone();
        assert!(copy.ancestors(&root).is_empty());
        assert_eq!(foo.ancestors(&root).len(), 1);
    }

    #[test]
    fn alias_all_declares_every_name() {
        let mut root = spec(SpecOptions::default());
        root.option("--help", SpecOptions::default())
            .unwrap()
            .alias_all(["-h", "-?", "help"])
            .unwrap();
        let options = root.options();
        assert_eq!(
            options.alias.keys().map(String::as_str).collect::<Vec<_>>(),
            ["-h", "-?", "help"]
        );
        assert!(options.alias.values().all(|args| *args == AliasArgs::from("--help")));

        let err = root.alias_all(["-H", "-h"]).unwrap_err();
        assert_eq!(err.message, "Alias '-h' already exists.");
        assert!(root.options().alias.contains_key("-H"));

        let mut empty = spec(SpecOptions::default());
        let err = empty.alias_all(["-x"]).unwrap_err();
        assert_eq!(
            err.message,
            "Requires `option()` or `command()` call before `alias()`."
        );
    }

    #[test]
    fn error_prefix_uses_display_name() {
        let mut root = spec(SpecOptions::default());
        let err = root.alias("-x").unwrap_err();
        assert_eq!(
            err.message,
            "Requires `option()` or `command()` call before `alias()`."
        );
        assert_eq!(err.raw, None);

        let mut root = spec(SpecOptions::default());
        root.command("build", SpecOptions::default()).unwrap();
        let err = root
            .spec(|build| {
                build.spec(|_| Ok(()))?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err.cause, ErrorCause::InvalidSpec);
        assert_eq!(
            err.message,
            "Command 'build' spec error: Requires `option()` or `command()` call before `spec()`."
        );
        assert_eq!(err.raw.as_deref(), Some("build"));
    }
}
