//! `Inspect` implementations for standard library and ecosystem types.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::Display;
use std::rc::Rc;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde_json::Value;

use super::{Inspect, Shape};

macro_rules! leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Leaf
                }
            }
        )*
    };
}

leaf!(
    bool, char, (), u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

#[cfg(feature = "chrono")]
leaf!(
    chrono::DateTime<chrono::Utc>,
    chrono::DateTime<chrono::FixedOffset>,
    chrono::DateTime<chrono::Local>,
    chrono::NaiveDateTime,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::TimeDelta,
);

impl Inspect for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Text(self)
    }
}

impl Inspect for &'static str {
    fn shape(&self) -> Shape<'_> {
        Shape::Text(self)
    }
}

impl Inspect for Box<str> {
    fn shape(&self) -> Shape<'_> {
        Shape::Text(self)
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => Shape::Forward(value),
            None => Shape::Absent,
        }
    }
}

macro_rules! forward {
    ($($wrapper:ident),* $(,)?) => {
        $(
            impl<T: Inspect> Inspect for $wrapper<T> {
                fn shape(&self) -> Shape<'_> {
                    Shape::Forward(&**self)
                }
            }
        )*
    };
}

forward!(Box, Rc, Arc);

impl Inspect for Box<dyn Inspect> {
    fn shape(&self) -> Shape<'_> {
        Shape::Forward(&**self)
    }
}

impl<T: Inspect> Inspect for OnceCell<T> {
    fn shape(&self) -> Shape<'_> {
        match self.get() {
            Some(value) => Shape::Forward(value),
            None => Shape::Absent,
        }
    }
}

impl<T: Inspect> Inspect for OnceLock<T> {
    fn shape(&self) -> Shape<'_> {
        match self.get() {
            Some(value) => Shape::Forward(value),
            None => Shape::Absent,
        }
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::sequence(self)
    }
}

impl<T: Inspect> Inspect for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::sequence(self)
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn shape(&self) -> Shape<'_> {
        Shape::sequence(self)
    }
}

impl<T: Inspect> Inspect for BTreeSet<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::sequence(self)
    }
}

impl<T: Inspect, S: 'static> Inspect for HashSet<T, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::sequence(self)
    }
}

impl<K, V> Inspect for BTreeMap<K, V>
where
    K: Display + 'static,
    V: Inspect,
{
    fn shape(&self) -> Shape<'_> {
        Shape::keyed(self)
    }
}

impl<K, V, S> Inspect for HashMap<K, V, S>
where
    K: Display + 'static,
    V: Inspect,
    S: 'static,
{
    fn shape(&self) -> Shape<'_> {
        Shape::keyed(self)
    }
}

impl<K, V, S> Inspect for IndexMap<K, V, S>
where
    K: Display + 'static,
    V: Inspect,
    S: 'static,
{
    fn shape(&self) -> Shape<'_> {
        Shape::keyed(self)
    }
}

/// JSON documents walk like any other graph: arrays by index, objects by key.
impl Inspect for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Null => Shape::Absent,
            Value::Bool(_) | Value::Number(_) => Shape::Leaf,
            Value::String(text) => Shape::Text(text),
            Value::Array(items) => Shape::sequence(items),
            Value::Object(map) => Shape::keyed(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::resolve_shape;
    use crate::path::Accessor;
    use serde_json::json;

    fn accessors(value: &dyn Inspect) -> Vec<Accessor> {
        match resolve_shape(value).1 {
            Shape::Complex(complex) => complex
                .into_items()
                .map(|items| items.map(|(accessor, _)| accessor).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_strings_are_text() {
        assert_eq!(String::from("a").shape().text(), Some("a"));
        assert_eq!("b".shape().text(), Some("b"));
    }

    #[test]
    fn test_once_cell_absent_until_set() {
        let cell: OnceCell<u32> = OnceCell::new();
        assert!(cell.shape().is_absent());
        cell.set(7).unwrap();
        assert!(matches!(cell.shape(), Shape::Forward(_)));
    }

    #[test]
    fn test_btree_map_items_are_keyed() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), 2u8);
        map.insert("a".to_string(), 1u8);
        assert_eq!(accessors(&map), vec![Accessor::key("a"), Accessor::key("b")]);
    }

    #[test]
    fn test_index_map_preserves_insertion_order() {
        let mut map = IndexMap::new();
        map.insert(3u32, "three");
        map.insert(1u32, "one");
        assert_eq!(accessors(&map), vec![Accessor::key("3"), Accessor::key("1")]);
    }

    #[test]
    fn test_json_shapes() {
        assert!(json!(null).shape().is_absent());
        assert!(json!(1).shape().is_leaf());
        assert_eq!(json!("x").shape().text(), Some("x"));
        assert_eq!(
            accessors(&json!([1, 2])),
            vec![Accessor::index(0), Accessor::index(1)]
        );
        assert_eq!(accessors(&json!({"k": 1})), vec![Accessor::key("k")]);
    }

    #[test]
    fn test_fixed_array_is_sequence() {
        assert_eq!(accessors(&[1u8, 2, 3]).len(), 3);
    }
}
