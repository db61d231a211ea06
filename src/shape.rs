//! Structural description of source values.
//!
//! A [`Respond`] implementation tells the converter what a value looks like
//! ([`Shape`]) and which optional capabilities it has. Struct types describe
//! their fields with a [`Struct`] table of [`Field`]s, in declaration order,
//! carrying the per-field annotations the struct builder reads:
//!
//! - `response`: explicit output key, `"-"` excludes the field
//! - `json`: fallback output key, ignored when `"-"`
//! - `cond`: comma-separated condition names checked against the
//!   inclusion predicate
//!
//! ## Examples
//!
//! ```rust
//! use responders::{Field, Respond, Response, Shape, Struct, Value};
//!
//! struct User {
//!     id: u64,
//!     name: String,
//!     password: String,
//! }
//!
//! impl Respond for User {
//!     fn shape(&self) -> Shape<'_> {
//!         Shape::Struct(
//!             Struct::new("User")
//!                 .field(Field::new("ID", &self.id))
//!                 .field(Field::new("Name", &self.name).json("full_name"))
//!                 .field(Field::new("Password", &self.password).response("-")),
//!         )
//!     }
//! }
//!
//! let user = User { id: 7, name: "Ada".into(), password: "hunter2".into() };
//! let response = Response::new(&user);
//! let output = response.output();
//!
//! assert_eq!(output.get("id"), Some(&Value::from(7u64)));
//! assert_eq!(output.get("full_name"), Some(&Value::from("Ada")));
//! assert!(output.get("password").is_none());
//! ```

use crate::capability::{
    CollectionResponseConverter, LazyLoader, PreMarshaller, ResponseConverter,
    ResponseElementConverter,
};
use crate::Value;
use std::fmt;
use std::ops::Deref;

/// A value the converter can walk.
///
/// Only [`shape`](Respond::shape) is required. Every other method is a
/// capability query defaulting to "not implemented"; a type opts in by
/// overriding the query to return `Some(self)`.
pub trait Respond {
    /// Describes the value's structure.
    fn shape(&self) -> Shape<'_>;

    /// Returns `true` for an absent reference-like value (`Option::None`).
    fn is_nil(&self) -> bool {
        false
    }

    /// Calls the zero-argument getter named `name`.
    ///
    /// Internal struct fields are read through getters named after the
    /// field with its first letter capitalized (`secret` is read through
    /// `"Secret"`). Returning `None` means no such getter exists and the
    /// field is left out of the output.
    fn getter(&self, _name: &str) -> Option<Node<'_>> {
        None
    }

    fn as_pre_marshaller(&self) -> Option<&dyn PreMarshaller> {
        None
    }

    fn as_lazy_loader(&self) -> Option<&dyn LazyLoader> {
        None
    }

    fn as_response_converter(&self) -> Option<&dyn ResponseConverter> {
        None
    }

    fn as_element_converter(&self) -> Option<&dyn ResponseElementConverter> {
        None
    }

    fn as_collection_converter(&self) -> Option<&dyn CollectionResponseConverter> {
        None
    }

    /// String rendering. Takes precedence over [`as_error`](Respond::as_error).
    fn as_display(&self) -> Option<&dyn fmt::Display> {
        None
    }

    /// Error rendering. A root value answering `Some` is converted to its
    /// message and nothing else.
    fn as_error(&self) -> Option<&dyn std::error::Error> {
        None
    }

    /// Substitute emitted in place of an absent value of this type.
    ///
    /// A nil value has no instance to ask, so this is a type-level query;
    /// `Option<Self>` surfaces it through
    /// [`absent_element_data`](Respond::absent_element_data).
    fn nil_element_data() -> Option<Node<'static>>
    where
        Self: Sized,
    {
        None
    }

    /// Substitute for this value when [`is_nil`](Respond::is_nil) is `true`.
    fn absent_element_data(&self) -> Option<Node<'static>> {
        None
    }
}

/// What a value looks like to the dispatcher.
pub enum Shape<'a> {
    /// A struct described by its field table.
    Struct(Struct<'a>),
    /// A list or array, in index order.
    Seq(Vec<&'a dyn Respond>),
    /// A mapping with string keys.
    Map(Vec<(&'a str, &'a dyn Respond)>),
    /// An indirection; `None` is a nil pointer.
    Pointer(Option<&'a dyn Respond>),
    /// A scalar (or a pre-built tree) emitted as-is.
    Leaf(Value),
}

impl fmt::Debug for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Struct(s) => f.debug_tuple("Struct").field(s).finish(),
            Shape::Seq(items) => write!(f, "Seq({})", items.len()),
            Shape::Map(entries) => f
                .debug_tuple("Map")
                .field(&entries.iter().map(|(k, _)| *k).collect::<Vec<_>>())
                .finish(),
            Shape::Pointer(target) => write!(f, "Pointer(nil: {})", target.is_none()),
            Shape::Leaf(value) => f.debug_tuple("Leaf").field(value).finish(),
        }
    }
}

/// A value produced by a hook or getter: either borrowed from the source
/// data or freshly built.
///
/// # Examples
///
/// ```rust
/// use responders::{Node, Respond, Shape, Value};
///
/// let name = String::from("Ada");
/// let borrowed = Node::borrowed(&name);
/// let owned = Node::value("Ada");
///
/// assert!(matches!(borrowed.shape(), Shape::Leaf(Value::String(_))));
/// assert!(matches!(owned.shape(), Shape::Leaf(Value::String(_))));
/// ```
pub enum Node<'a> {
    Borrowed(&'a dyn Respond),
    Owned(Box<dyn Respond + 'a>),
}

impl<'a> Node<'a> {
    pub fn borrowed<T: Respond>(value: &'a T) -> Self {
        Node::Borrowed(value)
    }

    pub fn owned<T: Respond + 'a>(value: T) -> Self {
        Node::Owned(Box::new(value))
    }

    /// Wraps anything convertible into a [`Value`].
    pub fn value(value: impl Into<Value>) -> Node<'static> {
        Node::Owned(Box::new(value.into()))
    }

    /// A node that converts to `null`, e.g. for a getter with nothing to report.
    pub fn null() -> Node<'static> {
        Node::Owned(Box::new(Value::Null))
    }
}

impl<'a> Deref for Node<'a> {
    type Target = dyn Respond + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            Node::Borrowed(value) => *value,
            Node::Owned(value) => value.as_ref(),
        }
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Borrowed(_) => f.write_str("Node::Borrowed"),
            Node::Owned(_) => f.write_str("Node::Owned"),
        }
    }
}

/// The field table of a struct value.
#[derive(Debug)]
pub struct Struct<'a> {
    name: &'static str,
    fields: Vec<Field<'a>>,
}

impl<'a> Struct<'a> {
    /// Starts a table for the type called `name`.
    ///
    /// The name matters for the nullable-wrapper convention: a type named
    /// `NullX` with fields `X` and `Valid` is unwrapped.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Struct {
            name,
            fields: Vec::new(),
        }
    }

    /// Starts a table with room for `capacity` fields, for types that build
    /// it in a loop with [`Struct::push`].
    ///
    /// ```rust
    /// use responders::{respond, value, Field, Respond, Shape, Struct};
    ///
    /// struct Row {
    ///     columns: Vec<(&'static str, String)>,
    /// }
    ///
    /// impl Respond for Row {
    ///     fn shape(&self) -> Shape<'_> {
    ///         let mut desc = Struct::with_capacity("Row", self.columns.len());
    ///         for (name, cell) in &self.columns {
    ///             desc.push(Field::new(*name, cell));
    ///         }
    ///         Shape::Struct(desc)
    ///     }
    /// }
    ///
    /// let row = Row { columns: vec![("Id", "7".into()), ("Title", "Hi".into())] };
    /// assert_eq!(respond(&row), value!({ "id": "7", "title": "Hi" }));
    /// ```
    #[must_use]
    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        Struct {
            name,
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Appends a field; fields are visited in the order they are added.
    #[must_use]
    pub fn field(mut self, field: Field<'a>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push(&mut self, field: Field<'a>) {
        self.fields.push(field);
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[Field<'a>] {
        &self.fields
    }
}

/// One entry of a [`Struct`] table.
pub struct Field<'a> {
    name: &'static str,
    value: Option<&'a dyn Respond>,
    embedded: bool,
    response: Option<&'static str>,
    json: Option<&'static str>,
    cond: Option<&'static str>,
}

impl<'a> Field<'a> {
    /// An exported field with its value.
    #[must_use]
    pub fn new(name: &'static str, value: &'a dyn Respond) -> Self {
        Field {
            name,
            value: Some(value),
            embedded: false,
            response: None,
            json: None,
            cond: None,
        }
    }

    /// An embedded field whose object entries are merged into the parent.
    #[must_use]
    pub fn embedded(name: &'static str, value: &'a dyn Respond) -> Self {
        Field {
            embedded: true,
            ..Field::new(name, value)
        }
    }

    /// An internal field, only reachable through its getter.
    #[must_use]
    pub fn internal(name: &'static str) -> Self {
        Field {
            name,
            value: None,
            embedded: false,
            response: None,
            json: None,
            cond: None,
        }
    }

    /// Sets the `response` annotation.
    #[must_use]
    pub fn response(mut self, key: &'static str) -> Self {
        self.response = Some(key);
        self
    }

    /// Sets the `json` annotation.
    #[must_use]
    pub fn json(mut self, key: &'static str) -> Self {
        self.json = Some(key);
        self
    }

    /// Sets the `cond` annotation.
    #[must_use]
    pub fn cond(mut self, conditions: &'static str) -> Self {
        self.cond = Some(conditions);
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The field's value; `None` for internal fields.
    #[must_use]
    pub fn value(&self) -> Option<&'a dyn Respond> {
        self.value
    }

    #[must_use]
    pub fn is_exported(&self) -> bool {
        self.value.is_some()
    }

    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    #[must_use]
    pub fn response_tag(&self) -> Option<&'static str> {
        self.response
    }

    #[must_use]
    pub fn json_tag(&self) -> Option<&'static str> {
        self.json
    }

    #[must_use]
    pub fn cond_tag(&self) -> Option<&'static str> {
        self.cond
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("exported", &self.is_exported())
            .field("embedded", &self.embedded)
            .field("response", &self.response)
            .field("json", &self.json)
            .field("cond", &self.cond)
            .finish()
    }
}
