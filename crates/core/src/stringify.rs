//! Box-drawing rendering of a parsed tree, for debugging and CLI output.

use crate::tree::Node;

/// What [`stringify`] includes under each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringifyOptions {
    /// Include node arguments. Defaults to `true`.
    pub args: bool,
    /// Include node ancestors.
    pub ancestors: bool,
    /// Include node descendants.
    pub descendants: bool,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        Self {
            args: true,
            ancestors: false,
            descendants: false,
        }
    }
}

/// Render `node` and everything below it as a tree.
///
/// ```
/// use argstree_core::{Options, StringifyOptions, argstree, stringify};
///
/// let tree = argstree(["foo", "bar"], Options::new().arg("foo", Options::new())).unwrap();
/// let text = stringify(tree.root(), StringifyOptions::default());
/// assert_eq!(
///     text,
///     "null (depth: 0)\n\
///      └─┬ foo (depth: 1)\n  \
///        └─┬ :args (total: 1)\n    \
///          └── bar"
/// );
/// ```
pub fn stringify(node: Node<'_>, options: StringifyOptions) -> String {
    let mut lines = Vec::new();
    Drawer {
        options,
        lines: &mut lines,
    }
    .draw(node, ROOT, true);
    lines.join("\n")
}

// ── Prefixes ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Position<'p> {
    prefix: &'p str,
    first: bool,
    last: bool,
}

const ROOT: Position<'static> = Position {
    prefix: "",
    first: true,
    last: false,
};

impl<'p> Position<'p> {
    fn item(prefix: &'p str, last: bool) -> Self {
        Self {
            prefix,
            first: false,
            last,
        }
    }

    /// The connector drawn before a line.
    fn own(self, next: bool) -> String {
        if self.first {
            return String::new();
        }
        let branch = if self.last { "└─" } else { "├─" };
        let fork = if next { "┬" } else { "─" };
        format!("{}{branch}{fork} ", self.prefix)
    }

    /// The prefix for lines nested under this one.
    fn nested(self) -> String {
        if self.first {
            return String::new();
        }
        let rail = if self.last { "  " } else { "│ " };
        format!("{}{rail}", self.prefix)
    }
}

// ── Drawing ─────────────────────────────────────────────────────────────────

struct Drawer<'l> {
    options: StringifyOptions,
    lines: &'l mut Vec<String>,
}

impl Drawer<'_> {
    fn draw(&mut self, node: Node<'_>, position: Position<'_>, nested: bool) {
        let args = node.args();
        let children = node.children();
        let ancestors = node.ancestors();
        let descendants = node.descendants();
        let show_args = self.options.args && !args.is_empty();
        let show_ancestors = self.options.ancestors && !ancestors.is_empty();
        let show_descendants = self.options.descendants && !descendants.is_empty();

        let total = if nested {
            usize::from(show_args)
                + children.len()
                + usize::from(show_ancestors)
                + usize::from(show_descendants)
        } else {
            0
        };
        let next = total > 0;
        self.lines
            .push(format!("{}{}", position.own(next), label(node)));
        if !next {
            return;
        }

        let prefix = position.nested();
        let mut drawn = 0;
        let mut last = || {
            drawn += 1;
            drawn >= total
        };

        if show_args {
            let item = Position::item(&prefix, last());
            self.lines
                .push(format!("{}:args (total: {})", item.own(true), args.len()));
            let arg_prefix = item.nested();
            for (index, arg) in args.iter().enumerate() {
                let position = Position::item(&arg_prefix, index + 1 == args.len());
                self.lines.push(format!("{}{arg}", position.own(false)));
            }
        }

        for child in children {
            self.draw(child, Position::item(&prefix, last()), true);
        }

        let lists = [
            ("ancestors", show_ancestors, ancestors),
            ("descendants", show_descendants, descendants),
        ];
        for (kind, show, list) in lists {
            if !show {
                continue;
            }
            let item = Position::item(&prefix, last());
            self.lines
                .push(format!("{}:{kind} (total: {})", item.own(true), list.len()));
            let list_prefix = item.nested();
            let count = list.len();
            for (index, entry) in list.into_iter().enumerate() {
                self.draw(entry, Position::item(&list_prefix, index + 1 == count), false);
            }
        }
    }
}

/// `id (depth: N, raw: R, alias: A, name: M)`. `raw` and `name` are only
/// listed when they differ from the displayed id.
fn label(node: Node<'_>) -> String {
    let id = node.id().or(node.raw());
    let mut labels = vec![format!("depth: {}", node.depth())];
    if let Some(raw) = node.raw()
        && Some(raw) != id
    {
        labels.push(format!("raw: {raw}"));
    }
    if let Some(alias) = node.alias() {
        labels.push(format!("alias: {alias}"));
    }
    if let Some(name) = node.name()
        && Some(name) != id
    {
        labels.push(format!("name: {name}"));
    }
    format!("{} ({})", id.unwrap_or("null"), labels.join(", "))
}
