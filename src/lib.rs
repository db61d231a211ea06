//! # responders
//!
//! Converts in-memory values into a generic, wire-ready response tree.
//!
//! The converter walks a value depth-first and produces a [`Value`]: ordered
//! objects, lists and scalars that any serde encoder can turn into bytes.
//! Along the way it applies a fixed sequence of customization points, so a
//! type can load missing data, replace itself, render as a string, collapse
//! into a summary when nested, or substitute something for its absence.
//!
//! ## Key Features
//!
//! - **Field tables instead of reflection**: a type describes its fields,
//!   their output keys and their inclusion conditions through [`Respond`]
//! - **Ordered hooks**: lazy loading, whole-value and element-only
//!   converters, null substitutes and root-collection converters, checked in
//!   a fixed order on every value
//! - **Constructor and Fixer**: per-response hooks seeing every level of
//!   the tree, before and after conversion
//! - **Serde bridge**: anything `Serialize` takes part through [`Serde`]
//!
//! ## Quick Start
//!
//! ```rust
//! use responders::{value, Field, Options, Respond, Response, Shape, Struct};
//!
//! struct Post {
//!     title: String,
//!     draft: bool,
//!     author: Option<String>,
//! }
//!
//! impl Respond for Post {
//!     fn shape(&self) -> Shape<'_> {
//!         Shape::Struct(
//!             Struct::new("Post")
//!                 .field(Field::new("Title", &self.title))
//!                 .field(Field::new("Draft", &self.draft).cond("editor"))
//!                 .field(Field::new("Author", &self.author).response("by")),
//!         )
//!     }
//! }
//!
//! let post = Post { title: "Hello".into(), draft: true, author: None };
//! let options = Options::new().with_inclusion(|condition| condition != "editor");
//! let response = Response::new(&post).with_options(options);
//!
//! assert_eq!(response.output(), &value!({ "title": "Hello", "by": null }));
//! ```
//!
//! ## Handing off to an encoder
//!
//! [`Value`] implements `serde::Serialize`, so the output goes straight to
//! any serde encoder:
//!
//! ```rust
//! use responders::respond;
//!
//! let output = respond(&vec![Some(1), None]);
//! assert_eq!(serde_json::to_string(&output).unwrap(), "[1,null]");
//! ```

pub mod capability;
pub mod collection;
pub mod element;
pub mod error;
pub mod impls;
pub mod macros;
pub mod map;
pub mod options;
pub mod response;
pub mod ser;
pub mod shape;
pub mod structs;
pub mod tag;
pub mod value;

pub use capability::{
    CollectionResponseConverter, LazyLoader, PreMarshaller, ResponseConverter,
    ResponseElementConverter,
};
pub use error::{Error, Result};
pub use impls::Serde;
pub use map::Map;
pub use options::{InclusionPredicate, Options};
pub use response::{Construct, Constructor, Fixer, Response};
pub use ser::{to_value, ValueSerializer};
pub use shape::{Field, Node, Respond, Shape, Struct};
pub use structs::{NULLABLE_PREFIX, VALID_FIELD};
pub use tag::EXCLUDE_KEY;
pub use value::{Number, Value};

/// Converts `data` with default options and no hooks.
///
/// # Examples
///
/// ```rust
/// use responders::{respond, Value};
///
/// assert_eq!(respond(&String::from("hi")), Value::from("hi"));
/// ```
#[must_use]
pub fn respond(data: &dyn Respond) -> Value {
    Response::new(data).into_output()
}

/// Converts `data` with the given options and no hooks.
#[must_use]
pub fn respond_with_options(data: &dyn Respond, options: Options) -> Value {
    Response::new(data).with_options(options).into_output()
}
