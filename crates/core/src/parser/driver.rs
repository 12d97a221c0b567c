use std::sync::Arc;

use log::{debug, trace};

use super::alias::ResolvedAlias;
use super::arg::{is_assignable, is_option};
use super::node::{self, MatchNode, NodeInit};
use crate::error::ArgsTreeError;
use crate::options::Options;
use crate::tree::Tree;

/// Drives one parse run over an arena of [`MatchNode`]s.
///
/// `parent` is the node whose `args` match incoming tokens; `child` is the
/// most recently created node that may still take positional arguments.
pub(crate) struct Parser {
    nodes: Vec<MatchNode>,
    parent: usize,
    child: Option<usize>,
}

impl Parser {
    const ROOT: usize = 0;

    pub(crate) fn new(options: Arc<Options>) -> Result<Self, ArgsTreeError> {
        let root = MatchNode::new(NodeInit::root(options), false)?;
        Ok(Self {
            nodes: vec![root],
            parent: Self::ROOT,
            child: None,
        })
    }

    /// Consume every argument, validate the open nodes, and build the tree.
    pub(crate) fn parse<I, S>(mut self, args: I) -> Result<Tree, ArgsTreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.parse_arg(arg.as_ref())?;
        }
        if let Some(child) = self.child {
            self.nodes[child].validate()?;
        }
        self.nodes[self.parent].validate()?;

        let mut records = Vec::with_capacity(self.nodes.len());
        node::build(&self.nodes, Self::ROOT, None, 0, &mut records);
        debug!("parsed {} node(s)", records.len());
        Ok(Tree::new(records))
    }

    fn parse_arg(&mut self, arg: &str) -> Result<(), ArgsTreeError> {
        trace!("parsing argument {arg:?}");
        if self.save_arg(arg, None)? {
            return Ok(());
        }

        // the head (or the last alias of a cluster) must be assignable
        let (head, assigned) = match arg.split_once('=') {
            Some((head, value)) => (head, Some(value)),
            None => (arg, None),
        };
        if let Some(value) = assigned
            && self.save_arg(head, Some(value))?
        {
            return Ok(());
        }

        let saved = match self.nodes[self.parent].alias().split(head) {
            Some(split) => self.save_alias_args(assigned, split.list, &split.remainder)?,
            None => false,
        };
        if saved {
            return Ok(());
        }

        // positional: the child takes it while it has read capacity
        let target = match self.child {
            Some(child) if self.nodes[child].check_range(1).max_read => child,
            _ => self.parent,
        };
        let node = &mut self.nodes[target];
        if node.strict && is_option(arg) {
            return Err(node.unrecognized(arg));
        }
        trace!("saving {arg:?} as a positional argument");
        node.args.push(arg.to_string());
        Ok(())
    }

    /// Save `raw` as a matched argument or a direct alias. Returns `false` if
    /// it is neither, or if `assigned` is set and the match is not assignable.
    fn save_arg(&mut self, raw: &str, assigned: Option<&str>) -> Result<bool, ArgsTreeError> {
        if let Some(options) = self.nodes[self.parent].parse(raw) {
            let save = assigned.is_none() || is_assignable(raw, &options);
            if save {
                self.save(vec![NodeInit {
                    options,
                    raw: Some(raw.to_string()),
                    alias: None,
                    args: assigned.map(str::to_string).into_iter().collect(),
                }])?;
            }
            return Ok(save);
        }

        match self.nodes[self.parent].alias().resolve(&[raw], "") {
            Some(list) => self.save_alias_args(assigned, list, &[]),
            None => Ok(false),
        }
    }

    fn save_alias_args(
        &mut self,
        assigned: Option<&str>,
        list: Vec<ResolvedAlias>,
        remainder: &[String],
    ) -> Result<bool, ArgsTreeError> {
        self.nodes[self.parent].validate_alias(remainder)?;

        // e.g. `-fb=value`: `-b` decides whether `value` can be assigned
        let last_options = match (assigned, list.last().and_then(|last| last.args.first())) {
            (Some(_), Some(arg)) => match self.nodes[self.parent].parse(arg) {
                Some(options) if !is_assignable(arg, &options) => return Ok(false),
                options => options,
            },
            _ => None,
        };

        let count = list.len();
        let mut items = Vec::with_capacity(count);
        for (index, ResolvedAlias { alias, args }) in list.into_iter().enumerate() {
            let is_last = index + 1 == count;
            let mut args = args.into_iter();
            let Some(raw) = args.next() else {
                continue;
            };
            let mut args: Vec<String> = args.collect();
            if is_last && let Some(value) = assigned {
                args.push(value.to_string());
            }
            let options = match &last_options {
                Some(options) if is_last => Arc::clone(options),
                _ => self.nodes[self.parent].parse_strict(&raw)?,
            };
            items.push(NodeInit {
                options,
                raw: Some(raw),
                alias: Some(alias),
                args,
            });
        }
        self.save(items)?;
        Ok(true)
    }

    /// Create nodes under the current parent.
    fn save(&mut self, items: Vec<NodeInit>) -> Result<(), ArgsTreeError> {
        if items.is_empty() {
            return Ok(());
        }
        // the pending child can no longer receive arguments
        if let Some(child) = self.child {
            self.nodes[child].validate()?;
        }

        let strict = self.nodes[self.parent].strict;
        let mut created = Vec::with_capacity(items.len());
        let mut next = None;
        for item in items {
            let node = MatchNode::new(item, strict)?;
            let index = self.nodes.len();
            if node.has_args() {
                next = Some(index);
            }
            self.nodes.push(node);
            self.nodes[self.parent].children.push(index);
            self.child = Some(index);
            created.push(index);
        }

        // only the node that stays open skips validation
        let open = next.or(self.child);
        for index in created {
            if Some(index) != open {
                self.nodes[index].validate()?;
            }
        }

        if let Some(next) = next {
            self.nodes[self.parent].validate()?;
            debug!(
                "matching arguments against {}",
                self.nodes[next].raw.as_deref().unwrap_or_default()
            );
            self.parent = next;
            self.child = None;
        }
        Ok(())
    }
}
