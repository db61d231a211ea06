//! [`Respond`] implementations for std and ecosystem types.
//!
//! - scalars, `String` and `Cow<str>` are leaves
//! - `Option`, `Box`, `Rc`, `Arc` and `&T` are pointers; they forward every
//!   capability query to the value they point at, and `None` is nil
//! - `Vec`, arrays and `VecDeque` are lists
//! - maps keyed by strings are mappings; `HashMap` entries are sorted by key
//!   so output is deterministic
//! - [`Value`] walks itself, so hooks can hand back pre-built trees
//! - [`Serde`] adapts any `serde::Serialize` type

use crate::capability::{
    CollectionResponseConverter, LazyLoader, PreMarshaller, ResponseConverter,
    ResponseElementConverter,
};
use crate::{to_value, Map, Node, Respond, Shape, Value};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;
use tracing::warn;

macro_rules! leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Respond for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Leaf(Value::from(*self))
                }
            }
        )*
    };
}

leaf!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Respond for char {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Value::String(self.to_string()))
    }
}

impl Respond for () {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Value::Null)
    }
}

impl Respond for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Value::String(self.clone()))
    }
}

impl Respond for Cow<'_, str> {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Value::String(self.to_string()))
    }
}

impl Respond for DateTime<Utc> {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Value::Date(*self))
    }
}

impl Respond for BigInt {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Value::BigInt(self.clone()))
    }
}

impl Respond for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Array(items) => Shape::Seq(items.iter().map(|v| v as &dyn Respond).collect()),
            Value::Object(map) => Shape::Map(map.iter().map(map_entry).collect()),
            scalar => Shape::Leaf(scalar.clone()),
        }
    }
}

impl Respond for Map {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(self.iter().map(map_entry).collect())
    }
}

fn map_entry<'a, K, V>((key, value): (&'a K, &'a V)) -> (&'a str, &'a dyn Respond)
where
    K: AsRef<str>,
    V: Respond,
{
    (key.as_ref(), value as &dyn Respond)
}

impl Respond for Box<dyn std::error::Error + Send + Sync> {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Value::String(self.to_string()))
    }

    fn as_error(&self) -> Option<&dyn std::error::Error> {
        Some(&**self)
    }
}

/// Pointer-like wrappers share their pointee's capabilities, the way a
/// pointer shares its pointee's methods.
trait Pointee {
    type Target: Respond;

    fn pointee(&self) -> Option<&Self::Target>;
}

macro_rules! forward_capabilities {
    () => {
        fn as_pre_marshaller(&self) -> Option<&dyn PreMarshaller> {
            self.pointee().and_then(|v| v.as_pre_marshaller())
        }

        fn as_lazy_loader(&self) -> Option<&dyn LazyLoader> {
            self.pointee().and_then(|v| v.as_lazy_loader())
        }

        fn as_response_converter(&self) -> Option<&dyn ResponseConverter> {
            self.pointee().and_then(|v| v.as_response_converter())
        }

        fn as_element_converter(&self) -> Option<&dyn ResponseElementConverter> {
            self.pointee().and_then(|v| v.as_element_converter())
        }

        fn as_collection_converter(&self) -> Option<&dyn CollectionResponseConverter> {
            self.pointee().and_then(|v| v.as_collection_converter())
        }

        fn as_display(&self) -> Option<&dyn fmt::Display> {
            self.pointee().and_then(|v| v.as_display())
        }

        fn as_error(&self) -> Option<&dyn std::error::Error> {
            self.pointee().and_then(|v| v.as_error())
        }
    };
}

impl<T: Respond> Pointee for Option<T> {
    type Target = T;

    fn pointee(&self) -> Option<&T> {
        self.as_ref()
    }
}

impl<T: Respond> Respond for Option<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Pointer(self.as_ref().map(|v| v as &dyn Respond))
    }

    fn is_nil(&self) -> bool {
        self.is_none()
    }

    fn nil_element_data() -> Option<Node<'static>> {
        T::nil_element_data()
    }

    fn absent_element_data(&self) -> Option<Node<'static>> {
        match self {
            Some(_) => None,
            None => T::nil_element_data(),
        }
    }

    forward_capabilities!();
}

macro_rules! pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: Respond> Pointee for $ptr<T> {
                type Target = T;

                fn pointee(&self) -> Option<&T> {
                    Some(&**self)
                }
            }

            impl<T: Respond> Respond for $ptr<T> {
                fn shape(&self) -> Shape<'_> {
                    Shape::Pointer(Some(&**self as &dyn Respond))
                }

                fn nil_element_data() -> Option<Node<'static>> {
                    T::nil_element_data()
                }

                forward_capabilities!();
            }
        )*
    };
}

pointer!(Box, Rc, Arc);

impl<T: Respond> Pointee for &T {
    type Target = T;

    fn pointee(&self) -> Option<&T> {
        Some(*self)
    }
}

impl<T: Respond> Respond for &T {
    fn shape(&self) -> Shape<'_> {
        Shape::Pointer(Some(*self as &dyn Respond))
    }

    fn nil_element_data() -> Option<Node<'static>> {
        T::nil_element_data()
    }

    forward_capabilities!();
}

impl<T: Respond> Respond for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self.iter().map(|v| v as &dyn Respond).collect())
    }
}

impl<T: Respond, const N: usize> Respond for [T; N] {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self.iter().map(|v| v as &dyn Respond).collect())
    }
}

impl<T: Respond> Respond for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self.iter().map(|v| v as &dyn Respond).collect())
    }
}

impl<K, V, S> Respond for HashMap<K, V, S>
where
    K: AsRef<str>,
    V: Respond,
    S: BuildHasher,
{
    fn shape(&self) -> Shape<'_> {
        let mut entries: Vec<_> = self.iter().map(map_entry).collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        Shape::Map(entries)
    }
}

impl<K, V> Respond for BTreeMap<K, V>
where
    K: AsRef<str>,
    V: Respond,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(self.iter().map(map_entry).collect())
    }
}

impl<K, V, S> Respond for IndexMap<K, V, S>
where
    K: AsRef<str>,
    V: Respond,
    S: BuildHasher,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(self.iter().map(map_entry).collect())
    }
}

/// Adapts a `serde::Serialize` type.
///
/// The value is turned into a [`Value`] tree through its `Serialize`
/// implementation; the tree is then walked like any other value, so the
/// Constructor and Fixer still see every level. A value that fails to
/// serialize becomes `null`.
///
/// # Examples
///
/// ```rust
/// use responders::{value, Response, Serde};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let point = Serde(Point { x: 1, y: 2 });
/// assert_eq!(Response::new(&point).output(), &value!({ "x": 1, "y": 2 }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Serde<T>(pub T);

impl<T: Serialize> Serde<T> {
    fn to_tree(&self) -> Value {
        to_value(&self.0).unwrap_or_else(|err| {
            warn!(error = %err, "serde value could not be converted, emitting null");
            Value::Null
        })
    }
}

impl<T: Serialize> Respond for Serde<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(self.to_tree())
    }

    fn as_response_converter(&self) -> Option<&dyn ResponseConverter> {
        Some(self)
    }
}

impl<T: Serialize> ResponseConverter for Serde<T> {
    fn response_data(&self) -> Node<'_> {
        Node::owned(self.to_tree())
    }
}
