//! Recursive graph walking.
//!
//! [`enumerate`] lists the immediate children of a value as [`Descriptor`]s:
//! one per declared member, then one per container item. Member descriptors
//! carry the member's own constraints; item descriptors carry the item
//! constraints inherited from the member that holds the container.
//!
//! `walk` drives a run: it executes every descriptor's constraints and then
//! recurses into the descriptor's value, consulting the cycle guard so each
//! complex node is descended into at most once.

use tracing::trace;

use crate::constraint::ConstraintKind;
use crate::context::ValidationContext;
use crate::error::EngineError;
use crate::inspect::{resolve_shape, Inspect, Shape};
use crate::path::AccessPath;

/// Where a descriptor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A declared member of the parent.
    Member,
    /// An item of the parent container.
    Item,
}

/// A child value discovered during a walk.
pub struct Descriptor<'a> {
    /// Full path from the root to the child.
    pub path: AccessPath,
    /// The child's current value.
    pub value: &'a dyn Inspect,
    /// Constraints to execute against the child.
    pub constraints: Vec<ConstraintKind>,
    /// Constraints the child's own items inherit.
    pub item_constraints: Vec<ConstraintKind>,
    /// Whether the child is a member or an item.
    pub origin: Origin,
}

/// Lists the children of `value`, found at `path`.
///
/// Absent values and leaves have no children. `inherited` is the item
/// constraint set of the member holding `value`, attached to each item.
pub fn enumerate<'a>(
    value: &'a dyn Inspect,
    path: &AccessPath,
    inherited: &[ConstraintKind],
) -> Box<dyn Iterator<Item = Descriptor<'a>> + 'a> {
    descriptors(resolve_shape(value).1, path, inherited)
}

fn descriptors<'a>(
    shape: Shape<'a>,
    path: &AccessPath,
    inherited: &[ConstraintKind],
) -> Box<dyn Iterator<Item = Descriptor<'a>> + 'a> {
    let Shape::Complex(complex) = shape else {
        return Box::new(std::iter::empty());
    };
    let (members, items) = complex.into_parts();

    let member_parent = path.clone();
    let members = members.into_iter().map(move |member| {
        let (name, value, constraints, item_constraints) = member.into_parts();
        Descriptor {
            path: member_parent.member(name),
            value,
            constraints,
            item_constraints,
            origin: Origin::Member,
        }
    });

    let item_parent = path.clone();
    let inherited = inherited.to_vec();
    let items = items.into_iter().flatten().map(move |(accessor, value)| Descriptor {
        path: item_parent.push(accessor),
        value,
        constraints: inherited.clone(),
        item_constraints: Vec::new(),
        origin: Origin::Item,
    });

    Box::new(members.chain(items))
}

/// Walks `value`, found at `path`, executing every reachable constraint.
pub(crate) fn walk(
    ctx: &mut ValidationContext,
    value: &dyn Inspect,
    path: &AccessPath,
    inherited: &[ConstraintKind],
) -> Result<(), EngineError> {
    let (node, shape) = resolve_shape(value);
    if shape.is_leaf() {
        return Ok(());
    }
    if ctx.enter(node) {
        trace!(path = %path, node = node.type_name(), "already visited, skipping");
        return Ok(());
    }

    ctx.descend(path)?;
    let outcome = walk_children(ctx, descriptors(shape, path, inherited));
    ctx.ascend();
    outcome
}

fn walk_children<'a>(
    ctx: &mut ValidationContext,
    children: impl Iterator<Item = Descriptor<'a>>,
) -> Result<(), EngineError> {
    for child in children {
        for kind in &child.constraints {
            ctx.run(*kind, &child.path, child.value)?;
        }
        walk(ctx, child.value, &child.path, &child.item_constraints)?;
    }
    Ok(())
}
