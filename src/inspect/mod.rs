//! Type descriptors for walkable values.
//!
//! The engine never reflects over types at runtime. Instead every value it can
//! walk implements [`Inspect`], describing its [`Shape`]: whether it is absent,
//! a leaf, a transparent wrapper around another value, or a complex value with
//! named [`Member`]s and/or indexed items.
//!
//! A model type lists the members the engine should see together with the
//! constraint kinds attached to them. Listing a member with no constraints
//! still makes the engine descend into it; members that are not listed are
//! invisible.
//!
//! # Example
//!
//! ```rust
//! use autopsy::{Inspect, Member, NotEmpty, NotNull, Shape};
//!
//! struct Customer {
//!     name: Option<String>,
//!     tags: Vec<String>,
//! }
//!
//! impl Inspect for Customer {
//!     fn shape(&self) -> Shape<'_> {
//!         Shape::object(vec![
//!             Member::new("name", &self.name).constraint(NotNull::KIND),
//!             Member::new("tags", &self.tags).item_constraint(NotEmpty::KIND),
//!         ])
//!     }
//! }
//! ```

mod impls;

use std::any::Any;
use std::fmt::{self, Display};

use crate::constraint::ConstraintKind;
use crate::path::Accessor;

/// Object-safe access to a value's concrete type.
///
/// Implemented for every `'static` type, so `Inspect` implementors never
/// write it by hand.
pub trait AsAny: Any {
    /// Returns the value as `&dyn Any` for checked downcasts.
    fn as_any(&self) -> &dyn Any;

    /// Returns the full type name of the value.
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A value the validation engine can walk.
pub trait Inspect: AsAny {
    /// Describes this value's structure for the current walk.
    fn shape(&self) -> Shape<'_>;
}

/// Lazy sequence of a container's items and the accessor reaching each one.
pub type Items<'a> = Box<dyn Iterator<Item = (Accessor, &'a dyn Inspect)> + 'a>;

/// The structure of a value as seen by the engine.
pub enum Shape<'a> {
    /// No value: `None`, JSON `null`, an unset cell.
    Absent,
    /// A scalar the engine never descends into.
    Leaf,
    /// A textual scalar.
    Text(&'a str),
    /// A transparent wrapper; the engine continues with the wrapped value.
    Forward(&'a dyn Inspect),
    /// A value with members and/or items.
    Complex(Complex<'a>),
}

impl<'a> Shape<'a> {
    /// A complex value exposing the given members.
    pub fn object(members: Vec<Member<'a>>) -> Self {
        Shape::Complex(Complex::new().with_members(members))
    }

    /// A container whose items are addressed by position.
    pub fn sequence<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
        I::IntoIter: 'a,
        T: Inspect,
    {
        Shape::Complex(Complex::new().with_items(Box::new(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (Accessor::Index(index), item as &dyn Inspect)),
        )))
    }

    /// A container whose items are addressed by key.
    pub fn keyed<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a K, &'a V)>,
        I::IntoIter: 'a,
        K: Display + 'a,
        V: Inspect,
    {
        Shape::Complex(Complex::new().with_items(Box::new(
            entries
                .into_iter()
                .map(|(key, value)| (Accessor::Key(key.to_string()), value as &dyn Inspect)),
        )))
    }

    /// Returns true for [`Shape::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Shape::Absent)
    }

    /// Returns true for shapes the engine never descends into.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Shape::Absent | Shape::Leaf | Shape::Text(_))
    }

    /// Returns the text of a [`Shape::Text`].
    pub fn text(&self) -> Option<&'a str> {
        match self {
            Shape::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Debug for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Absent => write!(f, "Absent"),
            Shape::Leaf => write!(f, "Leaf"),
            Shape::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Shape::Forward(inner) => f
                .debug_tuple("Forward")
                .field(&AsAny::type_name(*inner))
                .finish(),
            Shape::Complex(complex) => f
                .debug_struct("Complex")
                .field("members", &complex.members.len())
                .field("items", &complex.items.is_some())
                .finish(),
        }
    }
}

/// Members and items of a complex value.
///
/// Types that are both containers and carry annotated members of their own
/// expose both; the engine walks members first, then items.
#[derive(Default)]
pub struct Complex<'a> {
    members: Vec<Member<'a>>,
    items: Option<Items<'a>>,
}

impl<'a> Complex<'a> {
    /// Creates a complex value with no members and no items.
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            items: None,
        }
    }

    /// Sets the members and returns self for chaining.
    pub fn with_members(mut self, members: Vec<Member<'a>>) -> Self {
        self.members = members;
        self
    }

    /// Sets the items and returns self for chaining.
    pub fn with_items(mut self, items: Items<'a>) -> Self {
        self.items = Some(items);
        self
    }

    /// Returns the declared members.
    pub fn members(&self) -> &[Member<'a>] {
        &self.members
    }

    /// Returns true if this value is a container.
    pub fn has_items(&self) -> bool {
        self.items.is_some()
    }

    /// Splits into members and items.
    pub fn into_parts(self) -> (Vec<Member<'a>>, Option<Items<'a>>) {
        (self.members, self.items)
    }

    /// Consumes self, returning the members.
    pub fn into_members(self) -> Vec<Member<'a>> {
        self.members
    }

    /// Consumes self, returning the items if this value is a container.
    pub fn into_items(self) -> Option<Items<'a>> {
        self.items
    }
}

/// A member of a complex value together with its constraint annotations.
///
/// Member constraints apply to the member's value as a whole; item
/// constraints apply to every element when that value is a container.
pub struct Member<'a> {
    name: &'static str,
    value: &'a dyn Inspect,
    constraints: Vec<ConstraintKind>,
    item_constraints: Vec<ConstraintKind>,
}

impl<'a> Member<'a> {
    /// Creates a member with no constraints.
    pub fn new(name: &'static str, value: &'a dyn Inspect) -> Self {
        Self {
            name,
            value,
            constraints: Vec::new(),
            item_constraints: Vec::new(),
        }
    }

    /// Adds a member constraint and returns self for chaining.
    pub fn constraint(mut self, kind: ConstraintKind) -> Self {
        self.constraints.push(kind);
        self
    }

    /// Adds an item constraint and returns self for chaining.
    pub fn item_constraint(mut self, kind: ConstraintKind) -> Self {
        self.item_constraints.push(kind);
        self
    }

    /// Returns the member name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the member's current value.
    pub fn value(&self) -> &'a dyn Inspect {
        self.value
    }

    /// Returns the member constraints.
    pub fn constraints(&self) -> &[ConstraintKind] {
        &self.constraints
    }

    /// Returns the item constraints.
    pub fn item_constraints(&self) -> &[ConstraintKind] {
        &self.item_constraints
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        &'static str,
        &'a dyn Inspect,
        Vec<ConstraintKind>,
        Vec<ConstraintKind>,
    ) {
        (
            self.name,
            self.value,
            self.constraints,
            self.item_constraints,
        )
    }
}

/// Follows [`Shape::Forward`] links to the value that carries data.
pub fn resolve(value: &dyn Inspect) -> &dyn Inspect {
    resolve_shape(value).0
}

/// Like [`resolve`], also returning the resolved value's shape.
pub fn resolve_shape(value: &dyn Inspect) -> (&dyn Inspect, Shape<'_>) {
    let mut current = value;
    loop {
        match current.shape() {
            Shape::Forward(inner) => current = inner,
            shape => return (current, shape),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct Node {
        label: String,
        children: Vec<Node>,
    }

    impl Inspect for Node {
        fn shape(&self) -> Shape<'_> {
            Shape::object(vec![
                Member::new("label", &self.label),
                Member::new("children", &self.children),
            ])
        }
    }

    #[test]
    fn test_resolve_follows_wrappers() {
        let value: Option<Box<Rc<String>>> = Some(Box::new(Rc::new("deep".to_string())));
        let (node, shape) = resolve_shape(&value);
        assert_eq!(shape.text(), Some("deep"));
        assert!(node.as_any().downcast_ref::<String>().is_some());
    }

    #[test]
    fn test_resolve_stops_at_absent() {
        let value: Option<Rc<String>> = None;
        assert!(resolve_shape(&value).1.is_absent());
    }

    #[test]
    fn test_object_members_in_declaration_order() {
        let node = Node {
            label: "root".to_string(),
            children: Vec::new(),
        };
        let Shape::Complex(complex) = node.shape() else {
            panic!("expected complex shape");
        };
        let names: Vec<_> = complex.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["label", "children"]);
        assert!(!complex.has_items());
    }

    #[test]
    fn test_sequence_items_are_indexed() {
        let values = vec![1u8, 2, 3];
        let Shape::Complex(complex) = values.shape() else {
            panic!("expected complex shape");
        };
        let accessors: Vec<_> = complex.into_items().unwrap().map(|(a, _)| a).collect();
        assert_eq!(
            accessors,
            vec![Accessor::Index(0), Accessor::Index(1), Accessor::Index(2)]
        );
    }

    #[test]
    fn test_leaf_shapes() {
        assert!(42i64.shape().is_leaf());
        assert!("text".shape().is_leaf());
        assert!(None::<u8>.shape().is_leaf());
        assert!(!Vec::<u8>::new().shape().is_leaf());
    }

    #[test]
    fn test_type_name_through_dyn() {
        let value: &dyn Inspect = &String::from("x");
        assert_eq!(value.type_name(), "alloc::string::String");
    }
}
