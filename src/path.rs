//! Access paths locating values inside an object graph.
//!
//! This module provides [`AccessPath`] and [`Accessor`] for describing how a
//! value is reached from the validation root, e.g. `instance.orders[0].customer`.
//! Paths are plain data: they can be rendered for error messages, composed to
//! splice a member lookup onto an outer location, and evaluated
//! against a root to fetch the value they point at.

use std::fmt::{self, Display};

use crate::inspect::{resolve, Inspect, Shape};

/// Name rendered for the root of a path unless a validator overrides it.
pub const DEFAULT_ROOT: &str = "instance";

/// A single step of an access path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Accessor {
    /// A named member access (e.g. `.customer`)
    Member(String),
    /// A positional access into a container (e.g. `[0]`)
    Index(usize),
    /// A keyed access into a map (e.g. `["eu-west"]`)
    Key(String),
}

impl Accessor {
    /// Creates a new member accessor.
    pub fn member(name: impl Into<String>) -> Self {
        Accessor::Member(name.into())
    }

    /// Creates a new index accessor.
    pub fn index(idx: usize) -> Self {
        Accessor::Index(idx)
    }

    /// Creates a new key accessor.
    pub fn key(key: impl Into<String>) -> Self {
        Accessor::Key(key.into())
    }
}

impl Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Member(name) => write!(f, ".{}", name),
            Accessor::Index(idx) => write!(f, "[{}]", idx),
            Accessor::Key(key) => write!(f, "[{:?}]", key),
        }
    }
}

/// A path from a validation root to a value.
///
/// `AccessPath` is immutable: every builder method returns a new path and
/// leaves the receiver untouched. Two paths built independently from the same
/// accessors compare equal and render identically.
///
/// # Example
///
/// ```rust
/// use autopsy::AccessPath;
///
/// let path = AccessPath::root()
///     .member("orders")
///     .index(0)
///     .member("customer");
///
/// assert_eq!(path.to_string(), "instance.orders[0].customer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessPath {
    root: String,
    accessors: Vec<Accessor>,
}

impl AccessPath {
    /// Creates a path representing the root instance itself.
    pub fn root() -> Self {
        Self::named_root(DEFAULT_ROOT)
    }

    /// Creates a root path rendered with a custom root name.
    pub fn named_root(name: impl Into<String>) -> Self {
        Self {
            root: name.into(),
            accessors: Vec::new(),
        }
    }

    /// Returns a new path with a member accessor appended.
    pub fn member(&self, name: impl Into<String>) -> Self {
        self.push(Accessor::Member(name.into()))
    }

    /// Returns a new path with an index accessor appended.
    pub fn index(&self, index: usize) -> Self {
        self.push(Accessor::Index(index))
    }

    /// Returns a new path with a key accessor appended.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.push(Accessor::Key(key.into()))
    }

    /// Returns a new path with an arbitrary accessor appended.
    pub fn push(&self, accessor: Accessor) -> Self {
        let mut accessors = self.accessors.clone();
        accessors.push(accessor);
        Self {
            root: self.root.clone(),
            accessors,
        }
    }

    /// Follows this path, then `child`.
    ///
    /// `child` is interpreted relative to the value this path points at, so
    /// its root name is dropped and only its accessors are appended.
    ///
    /// ```rust
    /// use autopsy::AccessPath;
    ///
    /// let outer = AccessPath::root().member("entry");
    /// let relative = AccessPath::root().member("value").index(2);
    ///
    /// assert_eq!(outer.compose(&relative).to_string(), "instance.entry.value[2]");
    /// ```
    pub fn compose(&self, child: &AccessPath) -> Self {
        let mut accessors = self.accessors.clone();
        accessors.extend(child.accessors.iter().cloned());
        Self {
            root: self.root.clone(),
            accessors,
        }
    }

    /// Returns the rendered name of the root.
    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// Returns true if this path points at the root itself.
    pub fn is_root(&self) -> bool {
        self.accessors.is_empty()
    }

    /// Returns the number of accessors in this path.
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// Returns true if this path has no accessors.
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    /// Returns an iterator over the accessors, root first.
    pub fn accessors(&self) -> impl Iterator<Item = &Accessor> {
        self.accessors.iter()
    }

    /// Returns the parent path, or None if this is the root.
    pub fn parent(&self) -> Option<Self> {
        if self.accessors.is_empty() {
            None
        } else {
            Some(Self {
                root: self.root.clone(),
                accessors: self.accessors[..self.accessors.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last accessor, or None if this is the root.
    pub fn last(&self) -> Option<&Accessor> {
        self.accessors.last()
    }

    /// Applies this path to `root` and returns the value it currently reaches.
    ///
    /// Returns `None` when a step names a member or position that does not
    /// exist, or crosses an absent value.
    pub fn evaluate<'a>(&self, root: &'a dyn Inspect) -> Option<&'a dyn Inspect> {
        let mut current = root;
        for accessor in &self.accessors {
            current = step(current, accessor)?;
        }
        Some(current)
    }
}

impl Default for AccessPath {
    fn default() -> Self {
        Self::root()
    }
}

fn step<'a>(value: &'a dyn Inspect, accessor: &Accessor) -> Option<&'a dyn Inspect> {
    let Shape::Complex(complex) = resolve(value).shape() else {
        return None;
    };
    match accessor {
        Accessor::Member(name) => complex
            .into_members()
            .into_iter()
            .find(|member| member.name() == name)
            .map(|member| member.value()),
        Accessor::Index(_) | Accessor::Key(_) => complex
            .into_items()?
            .find(|(candidate, _)| candidate == accessor)
            .map(|(_, item)| item),
    }
}

impl Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for accessor in &self.accessors {
            write!(f, "{}", accessor)?;
        }
        Ok(())
    }
}
