//! The control tree diff walker.

use super::error::{DiffError, DiffResult, TreeSide};
use crate::controlpath::ControlPath;
use crate::delta::{AddControl, ChangeProperty, Delta, Deltas, RemoveControl};
use crate::ir::{ControlNode, IrNode, PropertyNode};
use crate::state::{collect_subtree_states, ControlStateLookup};
use std::collections::{HashMap, HashSet};
use tracing::{debug, debug_span, trace};

/// ControlDiffBuilder configures a [`ControlDiff`].
#[derive(Debug, Clone, Default)]
pub struct ControlDiffBuilder {
    in_component: bool,
}

impl ControlDiffBuilder {
    /// Creates a new ControlDiffBuilder.
    pub fn new() -> Self {
        ControlDiffBuilder::default()
    }

    /// Marks the walk as being inside a component definition.
    ///
    /// The flag is copied into every delta the walk emits.
    pub fn in_component(mut self, value: bool) -> Self {
        self.in_component = value;
        self
    }

    /// Builds the ControlDiff.
    pub fn build(self) -> ControlDiff {
        ControlDiff {
            in_component: self.in_component,
        }
    }
}

/// ControlDiff computes the deltas that turn a base control tree into a
/// current one.
#[derive(Debug, Clone, Default)]
pub struct ControlDiff {
    in_component: bool,
}

impl ControlDiff {
    /// Creates a new ControlDiffBuilder.
    pub fn builder() -> ControlDiffBuilder {
        ControlDiffBuilder::new()
    }

    /// Returns true if emitted deltas are flagged as inside a component.
    pub fn in_component(&self) -> bool {
        self.in_component
    }

    /// Diffs `current` against `base`.
    ///
    /// Controls and properties are matched by identifier only. Deltas are
    /// emitted in current-tree order, with removals of unmatched base entries
    /// following the matched and added ones at each level, in base order.
    ///
    /// A missing `base` means the whole document is new: the result is a
    /// single root-level [`AddControl`] for `current`.
    ///
    /// Fails if either tree repeats a control identifier among siblings or a
    /// property identifier within a control, anywhere in the tree. Both trees
    /// are checked before any delta is emitted; no deltas are returned then.
    pub fn diff<S>(&self, current: &ControlNode, base: Option<&ControlNode>, store: &S) -> DiffResult<Deltas>
    where
        S: ControlStateLookup + ?Sized,
    {
        let span = debug_span!(
            "compute_delta",
            root = %current.identifier(),
            in_component = self.in_component
        );
        let _enter = span.enter();

        validate_tree(current, TreeSide::Current)?;
        if let Some(base) = base {
            validate_tree(base, TreeSide::Base)?;
        }

        let mut walker = Walker {
            store,
            deltas: Deltas::new(),
        };
        let ctx = DiffContext {
            path: ControlPath::empty(),
            in_component: self.in_component,
        };

        match base {
            Some(base) => walker.visit(current.into(), base.into(), &ctx)?,
            None => {
                debug!("no base document, adding current tree whole");
                walker.add_control(&ctx, current);
            }
        }

        debug!(deltas = walker.deltas.len(), "control diff complete");
        Ok(walker.deltas)
    }
}

/// Computes the deltas from `base` to `current`.
///
/// Shorthand for a [`ControlDiff`] built with the given `in_component` flag.
pub fn compute_delta<S>(
    current: &ControlNode,
    base: Option<&ControlNode>,
    store: &S,
    in_component: bool,
) -> DiffResult<Deltas>
where
    S: ControlStateLookup + ?Sized,
{
    ControlDiff::builder()
        .in_component(in_component)
        .build()
        .diff(current, base, store)
}

/// Position in the walk: the path to the control being compared (or to its
/// parent, before descending) and the component flag.
#[derive(Debug, Clone)]
struct DiffContext {
    path: ControlPath,
    in_component: bool,
}

impl DiffContext {
    fn descend(&self, identifier: &str) -> DiffContext {
        DiffContext {
            path: self.path.append(identifier),
            in_component: self.in_component,
        }
    }
}

trait Identified {
    fn id(&self) -> &str;
}

impl Identified for ControlNode {
    fn id(&self) -> &str {
        self.identifier()
    }
}

impl Identified for PropertyNode {
    fn id(&self) -> &str {
        &self.identifier
    }
}

/// Base-side entries indexed by identifier, with the ones matched so far.
struct BaseLookup<'a, T> {
    items: &'a [T],
    index: HashMap<&'a str, usize>,
    consumed: Vec<bool>,
}

impl<'a, T: Identified> BaseLookup<'a, T> {
    fn new(items: &'a [T], duplicate: impl Fn(&str) -> DiffError) -> DiffResult<Self> {
        let mut index = HashMap::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if index.insert(item.id(), i).is_some() {
                return Err(duplicate(item.id()));
            }
        }
        Ok(BaseLookup {
            items,
            index,
            consumed: vec![false; items.len()],
        })
    }

    /// Returns the base entry with `identifier` and marks it matched.
    fn take(&mut self, identifier: &str) -> Option<&'a T> {
        let i = *self.index.get(identifier)?;
        self.consumed[i] = true;
        Some(&self.items[i])
    }

    /// Entries never matched, in base order.
    fn residual(&self) -> impl Iterator<Item = &'a T> + '_ {
        let items = self.items;
        self.consumed
            .iter()
            .enumerate()
            .filter(|(_, consumed)| !**consumed)
            .map(move |(i, _)| &items[i])
    }
}

/// Returns the first identifier repeated in `items`.
fn first_duplicate<T: Identified>(items: &[T]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().map(Identified::id).find(|id| !seen.insert(*id))
}

/// Checks sibling identifier uniqueness across the whole tree rooted at `root`.
fn validate_tree(root: &ControlNode, side: TreeSide) -> DiffResult<()> {
    fn check(node: &ControlNode, path: &ControlPath, side: TreeSide) -> DiffResult<()> {
        if let Some(id) = first_duplicate(&node.children) {
            return Err(DiffError::duplicate_control(path, id, side));
        }
        if let Some(id) = first_duplicate(&node.properties) {
            return Err(DiffError::duplicate_property(path, id, side));
        }
        for child in &node.children {
            check(child, &path.append(child.identifier()), side)?;
        }
        Ok(())
    }

    check(root, &ControlPath::empty().append(root.identifier()), side)
}

struct Walker<'s, S: ?Sized> {
    store: &'s S,
    deltas: Deltas,
}

impl<S> Walker<'_, S>
where
    S: ControlStateLookup + ?Sized,
{
    fn emit(&mut self, delta: impl Into<Delta>) {
        let delta = delta.into();
        trace!(delta = %delta, "emit");
        self.deltas.push(delta);
    }

    fn add_control(&mut self, ctx: &DiffContext, control: &ControlNode) {
        let states = collect_subtree_states(control, self.store);
        self.emit(AddControl::new(ctx.path.clone(), control.clone(), states, ctx.in_component));
    }

    fn visit(&mut self, node: IrNode<'_>, theirs: IrNode<'_>, ctx: &DiffContext) -> DiffResult<()> {
        match (node, theirs) {
            (IrNode::Control(ours), IrNode::Control(theirs)) => self.visit_control(ours, theirs, ctx),
            (IrNode::Property(ours), IrNode::Property(theirs)) => {
                self.visit_property(ours, theirs, ctx);
                Ok(())
            }
            (ours, theirs) => Err(DiffError::NodeKindMismatch {
                path: ctx.path.clone(),
                identifier: ours.identifier().to_string(),
                current: ours.kind(),
                base: theirs.kind(),
            }),
        }
    }

    /// `ctx.path` is the path to the parent of `ours`.
    fn visit_control(&mut self, ours: &ControlNode, theirs: &ControlNode, ctx: &DiffContext) -> DiffResult<()> {
        if !ours.name.same_type(&theirs.name) {
            trace!(
                control = %ours.identifier(),
                from = %theirs.type_name(),
                to = %ours.type_name(),
                "control type changed, replacing subtree"
            );
            self.emit(RemoveControl::new(ctx.path.clone(), theirs.identifier(), ctx.in_component));
            self.add_control(ctx, ours);
            return Ok(());
        }

        let ctx = ctx.descend(ours.identifier());

        let mut base_children = BaseLookup::new(&theirs.children, |id| {
            DiffError::duplicate_control(&ctx.path, id, TreeSide::Base)
        })?;
        for child in &ours.children {
            match base_children.take(child.identifier()) {
                Some(their_child) => self.visit(child.into(), their_child.into(), &ctx)?,
                None => self.add_control(&ctx, child),
            }
        }
        for removed in base_children.residual() {
            self.emit(RemoveControl::new(ctx.path.clone(), removed.identifier(), ctx.in_component));
        }

        let mut base_props = BaseLookup::new(&theirs.properties, |id| {
            DiffError::duplicate_property(&ctx.path, id, TreeSide::Base)
        })?;
        for prop in &ours.properties {
            match base_props.take(&prop.identifier) {
                Some(their_prop) => self.visit(prop.into(), their_prop.into(), &ctx)?,
                None => self.emit(ChangeProperty::added(
                    ctx.path.clone(),
                    prop.identifier.as_str(),
                    prop.expression.as_str(),
                    ctx.in_component,
                )),
            }
        }
        for removed in base_props.residual() {
            self.emit(ChangeProperty::removed(
                ctx.path.clone(),
                removed.identifier.as_str(),
                ctx.in_component,
            ));
        }

        Ok(())
    }

    /// `ctx.path` is the path to the control owning both properties.
    fn visit_property(&mut self, ours: &PropertyNode, theirs: &PropertyNode, ctx: &DiffContext) {
        // Expressions are opaque: exact text only.
        if ours.expression != theirs.expression {
            self.emit(ChangeProperty::modified(
                ctx.path.clone(),
                ours.identifier.as_str(),
                ours.expression.as_str(),
                ctx.in_component,
            ));
        }
    }
}
