use std::cell::OnceCell;
use std::sync::Arc;

use log::debug;

use super::alias::AliasTable;
use super::arg::{display_name, kind};
use crate::error::{ArgsTreeError, ErrorCause};
use crate::options::{Id, NodeData, Options};
use crate::tree::NodeRecord;

/// What a new node is created from.
pub(crate) struct NodeInit {
    pub(crate) options: Arc<Options>,
    pub(crate) raw: Option<String>,
    pub(crate) alias: Option<String>,
    /// Saved after `options.initial`.
    pub(crate) args: Vec<String>,
}

impl NodeInit {
    pub(crate) fn root(options: Arc<Options>) -> Self {
        Self {
            options,
            raw: None,
            alias: None,
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Range {
    min: Option<usize>,
    max: Option<usize>,
    max_read: Option<usize>,
}

/// Which limits an argument count satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RangeCheck {
    pub(crate) min: bool,
    pub(crate) max: bool,
    pub(crate) max_read: bool,
}

/// Mutable parse-time node. Lives in the parser's arena.
pub(crate) struct MatchNode {
    pub(crate) raw: Option<String>,
    pub(crate) alias: Option<String>,
    pub(crate) args: Vec<String>,
    pub(crate) options: Arc<Options>,
    pub(crate) strict: bool,
    /// Arena indices of the child nodes.
    pub(crate) children: Vec<usize>,
    range: Range,
    alias_table: OnceCell<AliasTable>,
}

impl MatchNode {
    /// Create a node, rejecting contradictory ranges.
    ///
    /// `strict` is the parent's effective value, used unless the options
    /// override it.
    pub(crate) fn new(init: NodeInit, strict: bool) -> Result<Self, ArgsTreeError> {
        let NodeInit {
            options,
            raw,
            alias,
            args: extra,
        } = init;
        let strict = options.strict.unwrap_or(strict);
        let mut args = options.initial.clone();
        args.extend(extra);
        let range = Range {
            min: options.min,
            max: options.max,
            max_read: options.max_read.or(options.max),
        };
        let node = Self {
            raw,
            alias,
            args,
            options,
            strict,
            children: Vec::new(),
            range,
            alias_table: OnceCell::new(),
        };

        if let (Some(min), Some(max)) = (range.min, range.max)
            && min > max
        {
            return Err(node.error(
                ErrorCause::InvalidOptions,
                format!("{}nvalid min and max range: {min}-{max}.", node.invalid_prefix()),
            ));
        }
        if let (Some(max), Some(max_read)) = (range.max, range.max_read)
            && max < max_read
        {
            return Err(node.error(
                ErrorCause::InvalidOptions,
                format!(
                    "{}nvalid max and maxRead range: {max} < {max_read}.",
                    node.invalid_prefix()
                ),
            ));
        }
        Ok(node)
    }

    /// Whether this node matches its own children (a command).
    pub(crate) fn has_args(&self) -> bool {
        self.options.args.is_some()
    }

    /// Built on first use; most nodes never need one.
    pub(crate) fn alias(&self) -> &AliasTable {
        self.alias_table
            .get_or_init(|| AliasTable::new(Arc::clone(&self.options)))
    }

    pub(crate) fn data(&self) -> NodeData<'_> {
        NodeData {
            raw: self.raw.as_deref(),
            alias: self.alias.as_deref(),
            args: &self.args,
            options: &self.options,
        }
    }

    /// Match `arg` against this node's children.
    pub(crate) fn parse(&self, arg: &str) -> Option<Arc<Options>> {
        self.options
            .args
            .as_ref()
            .and_then(|args| args.resolve(arg, &self.data()))
    }

    /// Like [`parse`](Self::parse), but a miss is an error.
    pub(crate) fn parse_strict(&self, arg: &str) -> Result<Arc<Options>, ArgsTreeError> {
        self.parse(arg).ok_or_else(|| self.unrecognized(arg))
    }

    /// Check the limits against the current count plus `diff`.
    pub(crate) fn check_range(&self, diff: usize) -> RangeCheck {
        let Range { min, max, max_read } = self.range;
        let len = self.args.len() + diff;
        RangeCheck {
            min: min.is_none_or(|min| len >= min),
            max: max.is_none_or(|max| len <= max),
            max_read: max_read.is_none_or(|max_read| len <= max_read),
        }
    }

    /// Validate the final arguments: range first, then the callback.
    pub(crate) fn validate(&self) -> Result<(), ArgsTreeError> {
        debug!(
            "validating {} with {} argument(s)",
            self.raw.as_deref().unwrap_or("<root>"),
            self.args.len()
        );
        self.validate_range()?;
        if let Some(validate) = &self.options.validate
            && !validate(&self.data())
        {
            let name = self.display_name();
            let message = if name.is_empty() {
                "Validation failed.".to_string()
            } else {
                format!("{name}failed validation.")
            };
            return Err(self.error(ErrorCause::Validate, message));
        }
        Ok(())
    }

    fn validate_range(&self) -> Result<(), ArgsTreeError> {
        let check = self.check_range(0);
        if check.min && check.max {
            return Ok(());
        }
        let Range { min, max, .. } = self.range;
        let (phrase, count) = match (min, max) {
            (Some(min), Some(max)) if min == max => (min.to_string(), min),
            (Some(min), Some(max)) => (format!("{min}-{max}"), 2),
            (Some(min), None) => (format!("at least {min}"), min),
            (None, Some(0)) => ("no".to_string(), 0),
            (None, Some(max)) => (format!("up to {max}"), max),
            (None, None) => return Ok(()),
        };
        let name = self.display_name();
        let prefix = if name.is_empty() {
            "E".to_string()
        } else {
            format!("{name}e")
        };
        let label = if count == 1 { "argument" } else { "arguments" };
        Err(self.error(
            ErrorCause::InvalidRange,
            format!(
                "{prefix}xpected {phrase} {label}, but got {}.",
                self.args.len()
            ),
        ))
    }

    pub(crate) fn unrecognized(&self, arg: &str) -> ArgsTreeError {
        let name = self.display_name();
        let kind = kind(Some(arg)).to_lowercase();
        let message = if name.is_empty() {
            format!("Unrecognized {kind}: {arg}")
        } else {
            format!("{name}does not recognize the {kind}: {arg}")
        };
        self.error(ErrorCause::UnrecognizedArgument, message)
    }

    /// Reject leftover characters from an alias split.
    pub(crate) fn validate_alias(&self, remainder: &[String]) -> Result<(), ArgsTreeError> {
        if remainder.is_empty() {
            return Ok(());
        }
        let label = if remainder.len() == 1 {
            "alias"
        } else {
            "aliases"
        };
        let list = remainder
            .iter()
            .map(|alias| format!("-{alias}"))
            .collect::<Vec<_>>()
            .join(", ");
        let name = self.display_name();
        let message = if name.is_empty() {
            format!("Unrecognized {label}: {list}")
        } else {
            format!("{name}does not recognize the {label}: {list}")
        };
        Err(self.error(ErrorCause::UnrecognizedAlias, message))
    }

    fn display_name(&self) -> String {
        display_name(self.raw.as_deref(), self.options.name.as_deref())
    }

    /// `"Option '--foo' has i"` or `"I"`.
    fn invalid_prefix(&self) -> String {
        let name = self.display_name();
        if name.is_empty() {
            "I".to_string()
        } else {
            format!("{name}has i")
        }
    }

    fn error(&self, cause: ErrorCause, message: String) -> ArgsTreeError {
        ArgsTreeError {
            cause,
            message,
            raw: self.raw.clone(),
            alias: self.alias.clone(),
            args: self.args.clone(),
            options: Arc::clone(&self.options),
        }
    }

    fn id(&self) -> Option<String> {
        let id = match &self.options.id {
            Some(Id::Value(id)) => Some(id.clone()),
            Some(Id::Compute(compute)) => compute(self.raw.as_deref(), &self.data()),
            None => None,
        };
        id.or_else(|| self.raw.clone())
    }
}

/// Flatten the arena below `index` into pre-ordered records, appending to
/// `out`. Returns the record index of `index`.
///
/// Ancestors are the parent's ancestors plus the parent; descendants are each
/// child followed by that child's descendants.
pub(crate) fn build(
    arena: &[MatchNode],
    index: usize,
    parent: Option<usize>,
    depth: usize,
    out: &mut Vec<NodeRecord>,
) -> usize {
    let node = &arena[index];
    let ancestors = match parent {
        Some(parent) => {
            let mut ancestors = out[parent].ancestors.clone();
            ancestors.push(parent);
            ancestors
        }
        None => Vec::new(),
    };
    let record = out.len();
    out.push(NodeRecord {
        id: node.id(),
        name: node.options.name.clone(),
        raw: node.raw.clone(),
        alias: node.alias.clone(),
        depth,
        args: node.args.clone(),
        parent,
        children: Vec::with_capacity(node.children.len()),
        ancestors,
        descendants: Vec::new(),
    });

    for &child in &node.children {
        let child = build(arena, child, Some(record), depth + 1, out);
        let grandchildren = out[child].descendants.clone();
        let this = &mut out[record];
        this.children.push(child);
        this.descendants.push(child);
        this.descendants.extend(grandchildren);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(options: Options) -> Result<MatchNode, ArgsTreeError> {
        MatchNode::new(NodeInit::root(Arc::new(options)), false)
    }

    fn child(raw: &str, options: Options, args: &[&str]) -> MatchNode {
        MatchNode::new(
            NodeInit {
                options: Arc::new(options),
                raw: Some(raw.to_string()),
                alias: None,
                args: args.iter().map(|arg| arg.to_string()).collect(),
            },
            false,
        )
        .unwrap()
    }

    #[test]
    fn rejects_min_above_max() {
        let err = node(Options::new().min(1).max(0)).err().unwrap();
        assert_eq!(err.cause, ErrorCause::InvalidOptions);
        assert_eq!(err.message, "Invalid min and max range: 1-0.");
    }

    #[test]
    fn rejects_max_read_above_max() {
        let err = MatchNode::new(
            NodeInit {
                options: Arc::new(Options::new().max(1).max_read(2)),
                raw: Some("foo".into()),
                alias: None,
                args: Vec::new(),
            },
            false,
        )
        .err()
        .unwrap();
        assert_eq!(err.cause, ErrorCause::InvalidOptions);
        assert_eq!(
            err.message,
            "Command 'foo' has invalid max and maxRead range: 1 < 2."
        );
    }

    #[test]
    fn initial_args_come_first_and_are_copied() {
        let options = Arc::new(Options::new().initial(["a", "b"]));
        let node = MatchNode::new(
            NodeInit {
                options: Arc::clone(&options),
                raw: None,
                alias: None,
                args: vec!["c".into()],
            },
            false,
        )
        .unwrap();
        assert_eq!(node.args, ["a", "b", "c"]);
        assert_eq!(options.initial, ["a", "b"]);
    }

    #[test]
    fn strict_is_inherited_unless_set() {
        let inherit = MatchNode::new(NodeInit::root(Arc::new(Options::new())), true).unwrap();
        assert!(inherit.strict);
        let set = MatchNode::new(NodeInit::root(Arc::new(Options::new().strict(false))), true)
            .unwrap();
        assert!(!set.strict);
    }

    #[test]
    fn max_read_defaults_to_max() {
        let node = child("--foo", Options::new().max(1), &["a"]);
        assert_eq!(
            node.check_range(1),
            RangeCheck {
                min: true,
                max: false,
                max_read: false,
            }
        );
        let node = child("--foo", Options::new().max(2).max_read(0), &["a"]);
        assert!(node.check_range(0).max);
        assert!(!node.check_range(0).max_read);
    }

    #[test]
    fn range_messages() {
        let cases = [
            (Options::new().max(0), &["a"][..], "Option '--foo' expected no arguments, but got 1."),
            (Options::new().min(1).max(1), &[][..], "Option '--foo' expected 1 argument, but got 0."),
            (Options::new().min(2).max(2), &["a"][..], "Option '--foo' expected 2 arguments, but got 1."),
            (Options::new().min(1).max(2), &[][..], "Option '--foo' expected 1-2 arguments, but got 0."),
            (Options::new().min(1), &[][..], "Option '--foo' expected at least 1 argument, but got 0."),
            (Options::new().max(1), &["a", "b"][..], "Option '--foo' expected up to 1 argument, but got 2."),
        ];
        for (options, args, message) in cases {
            let err = child("--foo", options, args).validate().err().unwrap();
            assert_eq!(err.cause, ErrorCause::InvalidRange);
            assert_eq!(err.message, message);
            assert_eq!(err.raw.as_deref(), Some("--foo"));
        }
    }

    #[test]
    fn root_range_message_has_no_name() {
        let err = node(Options::new().min(3)).unwrap().validate().err().unwrap();
        assert_eq!(err.message, "Expected at least 3 arguments, but got 0.");
    }

    #[test]
    fn validate_callback_runs_after_range() {
        let ok = child("--foo", Options::new().validate(|data| data.args == ["a"]), &["a"]);
        assert!(ok.validate().is_ok());

        let err = child("--foo", Options::new().validate(|_| false), &[])
            .validate()
            .err()
            .unwrap();
        assert_eq!(err.cause, ErrorCause::Validate);
        assert_eq!(err.message, "Option '--foo' failed validation.");

        let err = node(Options::new().validate(|_| false))
            .unwrap()
            .validate()
            .err()
            .unwrap();
        assert_eq!(err.message, "Validation failed.");
    }

    #[test]
    fn unrecognized_messages() {
        let root = node(Options::new()).unwrap();
        assert_eq!(root.unrecognized("--bar").message, "Unrecognized option: --bar");
        let cmd = child("build", Options::new().name("Build"), &[]);
        assert_eq!(
            cmd.unrecognized("bar").message,
            "Command 'Build' does not recognize the command: bar"
        );
    }

    #[test]
    fn alias_remainder_messages() {
        let root = node(Options::new()).unwrap();
        assert!(root.validate_alias(&[]).is_ok());
        let err = root.validate_alias(&["x".to_string()]).err().unwrap();
        assert_eq!(err.cause, ErrorCause::UnrecognizedAlias);
        assert_eq!(err.message, "Unrecognized alias: -x");
        let err = child("foo", Options::new(), &[])
            .validate_alias(&["x".to_string(), "yz".to_string()])
            .err()
            .unwrap();
        assert_eq!(
            err.message,
            "Command 'foo' does not recognize the aliases: -x, -yz"
        );
    }

    #[test]
    fn id_falls_back_to_raw() {
        assert_eq!(child("foo", Options::new(), &[]).id().as_deref(), Some("foo"));
        assert_eq!(child("foo", Options::new().id("bar"), &[]).id().as_deref(), Some("bar"));
        let computed = child("--foo-bar", Options::new().id_with(|raw, _| raw.map(|r| r.trim_start_matches('-').to_string())), &[]);
        assert_eq!(computed.id().as_deref(), Some("foo-bar"));
        let none = child("foo", Options::new().id_with(|_, _| None), &[]);
        assert_eq!(none.id().as_deref(), Some("foo"));
    }
}
