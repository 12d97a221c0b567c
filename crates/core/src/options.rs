//! The parse specification: what each depth of the tree recognizes.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Computes a node id from its raw argument and node data.
pub type IdFn = Arc<dyn Fn(Option<&str>, &NodeData<'_>) -> Option<String> + Send + Sync>;

/// Matches an argument to the options of a child node.
pub type ArgsFn = Arc<dyn Fn(&str, &NodeData<'_>) -> Option<Arc<Options>> + Send + Sync>;

/// Validates a node once its arguments are final.
pub type ValidateFn = Arc<dyn Fn(&NodeData<'_>) -> bool + Send + Sync>;

/// Borrowed view of a node, passed to [`Options`] callbacks.
#[derive(Clone, Copy)]
pub struct NodeData<'a> {
    /// The parsed argument. `None` for the root node.
    pub raw: Option<&'a str>,
    /// The alias used to parse the options for this node.
    pub alias: Option<&'a str>,
    /// The arguments saved to this node so far.
    pub args: &'a [String],
    /// The options for this node.
    pub options: &'a Arc<Options>,
}

impl fmt::Debug for NodeData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeData")
            .field("raw", &self.raw)
            .field("alias", &self.alias)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Node identifier: a fixed value or one computed after parsing.
#[derive(Clone)]
pub enum Id {
    /// A literal id.
    Value(String),
    /// Computed from the raw argument and node data. Returning `None` falls
    /// back to the raw argument.
    Compute(IdFn),
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Id::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

/// The arguments an option or command recognizes as its children.
#[derive(Clone)]
pub enum Args {
    /// Exact argument lookup.
    Map(IndexMap<String, Arc<Options>>),
    /// Dynamic lookup.
    Handler(ArgsFn),
}

impl Args {
    /// An empty map. Makes a node a command (a new matching scope) that
    /// recognizes nothing.
    pub fn empty() -> Self {
        Args::Map(IndexMap::new())
    }

    /// Wrap a matcher callback.
    pub fn handler<F>(handler: F) -> Self
    where
        F: Fn(&str, &NodeData<'_>) -> Option<Arc<Options>> + Send + Sync + 'static,
    {
        Args::Handler(Arc::new(handler))
    }

    /// Resolve `arg` to the options of a child node.
    pub fn resolve(&self, arg: &str, data: &NodeData<'_>) -> Option<Arc<Options>> {
        match self {
            Args::Map(map) => map.get(arg).cloned(),
            Args::Handler(handler) => handler(arg, data),
        }
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Args::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Args::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// One entry of an alias list: a bare argument or a full argument group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasItem {
    /// A bare string. All bare strings of a list form a single group.
    Arg(String),
    /// `[option-or-command, ...args]`. Empty groups are ignored.
    Group(Vec<String>),
}

/// What an alias expands to.
///
/// The first string of a group is the option or command to match, the rest
/// are arguments saved to it:
///
/// ```
/// use argstree_core::AliasArgs;
///
/// // -f => --foo
/// let single = AliasArgs::from("--foo");
/// // -f => --foo bar baz
/// let with_args = AliasArgs::from(["--foo", "bar", "baz"]);
/// // -f => --foo bar, --baz
/// let groups = AliasArgs::groups([vec!["--foo", "bar"], vec!["--baz"]]);
/// # let _ = (single, with_args, groups);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasArgs {
    /// A single option or command.
    Single(String),
    /// A mix of bare arguments and argument groups.
    List(Vec<AliasItem>),
}

impl AliasArgs {
    /// Build from several independent argument groups.
    pub fn groups<I, G, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AliasArgs::List(
            groups
                .into_iter()
                .map(|group| AliasItem::Group(group.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }

    /// Normalize into argument groups. Every returned group is non-empty.
    ///
    /// Bare strings collapse into one group positioned where the first bare
    /// string appears.
    pub fn to_groups(&self) -> Vec<Vec<String>> {
        match self {
            AliasArgs::Single(arg) => vec![vec![arg.clone()]],
            AliasArgs::List(items) => {
                let mut groups: Vec<Vec<String>> = Vec::new();
                let mut bare: Option<usize> = None;
                for item in items {
                    match item {
                        AliasItem::Arg(arg) => match bare {
                            Some(index) => groups[index].push(arg.clone()),
                            None => {
                                bare = Some(groups.len());
                                groups.push(vec![arg.clone()]);
                            }
                        },
                        AliasItem::Group(group) if !group.is_empty() => groups.push(group.clone()),
                        AliasItem::Group(_) => {}
                    }
                }
                groups
            }
        }
    }
}

impl From<&str> for AliasArgs {
    fn from(arg: &str) -> Self {
        AliasArgs::Single(arg.to_string())
    }
}

impl From<String> for AliasArgs {
    fn from(arg: String) -> Self {
        AliasArgs::Single(arg)
    }
}

impl<const N: usize> From<[&str; N]> for AliasArgs {
    fn from(args: [&str; N]) -> Self {
        AliasArgs::List(args.iter().map(|arg| AliasItem::Arg((*arg).to_string())).collect())
    }
}

impl From<Vec<String>> for AliasArgs {
    fn from(args: Vec<String>) -> Self {
        AliasArgs::List(args.into_iter().map(AliasItem::Arg).collect())
    }
}

/// Parse options for one option or command (or the root).
///
/// Fields are public; the chainable setters below are shorthands for
/// building nested specs inline:
///
/// ```
/// use argstree_core::{Options, argstree};
///
/// let options = Options::new()
///     .arg("--test", Options::new().max(1))
///     .alias("-t", "--test");
/// let tree = argstree(["-t", "foo", "bar"], options).unwrap();
/// let root = tree.root();
/// assert_eq!(root.args(), ["bar"]);
/// assert_eq!(root.children()[0].id(), Some("--test"));
/// ```
#[derive(Clone, Default)]
pub struct Options {
    /// Unique id for this option or command. Defaults to the raw argument.
    pub id: Option<Id>,
    /// Display name for errors. Defaults to the raw argument.
    pub name: Option<String>,
    /// Minimum number of arguments.
    pub min: Option<usize>,
    /// Maximum number of arguments.
    pub max: Option<usize>,
    /// Maximum number of arguments to read before control returns to the
    /// parent. Defaults to [`max`](Self::max). Assigned values and alias
    /// arguments are not limited by it.
    pub max_read: Option<usize>,
    /// Reject unrecognized option-like arguments. Inherited from the parent
    /// when unset; `false` at the root.
    pub strict: Option<bool>,
    /// Allow `arg=value` assignment. Defaults to `true` for option-like
    /// arguments (`-f`, `--flag`).
    pub assign: Option<bool>,
    /// Initial arguments, saved before any parsed ones.
    pub initial: Vec<String>,
    /// Aliases declared for the children of this node.
    pub alias: IndexMap<String, AliasArgs>,
    /// The arguments to match as options or commands. A node with `args` is a
    /// command: once matched, subsequent arguments are matched against it.
    pub args: Option<Args>,
    /// Called once the arguments of the node are final.
    pub validate: Option<ValidateFn>,
}

impl Options {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a literal id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(Id::Value(id.into()));
        self
    }

    /// Set an id callback.
    #[must_use]
    pub fn id_with<F>(mut self, id: F) -> Self
    where
        F: Fn(Option<&str>, &NodeData<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.id = Some(Id::Compute(Arc::new(id)));
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the minimum number of arguments.
    #[must_use]
    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the maximum number of arguments.
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the read limit.
    #[must_use]
    pub fn max_read(mut self, max_read: usize) -> Self {
        self.max_read = Some(max_read);
        self
    }

    /// Set strict mode.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Set whether `=` assignment is allowed.
    #[must_use]
    pub fn assign(mut self, assign: bool) -> Self {
        self.assign = Some(assign);
        self
    }

    /// Set the initial arguments.
    #[must_use]
    pub fn initial<I, S>(mut self, initial: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial = initial.into_iter().map(Into::into).collect();
        self
    }

    /// Declare an alias. Replaces an existing alias with the same name.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>, args: impl Into<AliasArgs>) -> Self {
        self.alias.insert(alias.into(), args.into());
        self
    }

    /// Declare a child option or command.
    ///
    /// Replaces an [`Args::Handler`] if one was set.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>, options: impl Into<Arc<Options>>) -> Self {
        match &mut self.args {
            Some(Args::Map(map)) => {
                map.insert(arg.into(), options.into());
            }
            _ => {
                let mut map = IndexMap::new();
                map.insert(arg.into(), options.into());
                self.args = Some(Args::Map(map));
            }
        }
        self
    }

    /// Set the child matcher.
    #[must_use]
    pub fn args(mut self, args: Args) -> Self {
        self.args = Some(args);
        self
    }

    /// Set a child matcher callback.
    #[must_use]
    pub fn handler<F>(self, handler: F) -> Self
    where
        F: Fn(&str, &NodeData<'_>) -> Option<Arc<Options>> + Send + Sync + 'static,
    {
        self.args(Args::handler(handler))
    }

    /// Set the validation callback.
    #[must_use]
    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&NodeData<'_>) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("max_read", &self.max_read)
            .field("strict", &self.strict)
            .field("assign", &self.assign)
            .field("initial", &self.initial)
            .field("alias", &self.alias)
            .field("args", &self.args)
            .field("validate", &self.validate.as_ref().map(|_| ".."))
            .finish()
    }
}
