//! The top-level driver and the shape dispatcher.
//!
//! A [`Response`] wraps borrowed source data plus the optional
//! [`Constructor`] and [`Fixer`] hooks, and lazily builds the output tree.
//! Every value in the source graph passes through the dispatcher, which
//! applies, in order:
//!
//! 1. the lazy loader ([`LazyLoader`](crate::LazyLoader))
//! 2. the Constructor, which may emit a final value and stop
//! 3. the whole-value converter ([`ResponseConverter`](crate::ResponseConverter)),
//!    checked on the value as received
//! 4. string rendering (`Display`, then `Error`)
//! 5. pointer dereferencing; a nil pointer becomes `null`
//! 6. the shape builders (struct, list, map) or the leaf itself
//! 7. the Fixer, on the finished subtree
//!
//! ## Examples
//!
//! ```rust
//! use responders::{value, Construct, Response, Value};
//!
//! let data = vec![1, 2, 3];
//! let response = Response::new(&data)
//!     .with_constructor(|data, depth| {
//!         if depth == 1 {
//!             return Construct::Emit(Value::from("hidden"));
//!         }
//!         Construct::descend(data)
//!     })
//!     .with_fixer(|value| match value {
//!         Value::Array(items) => Value::Array(items.into_iter().rev().collect()),
//!         other => other,
//!     });
//!
//! assert_eq!(response.output(), &value!(["hidden", "hidden", "hidden"]));
//! ```

use crate::{Node, Options, Respond, Shape, Value};
use std::cell::OnceCell;
use std::fmt;
use tracing::trace;

/// Hook run on every value before it is converted.
///
/// Receives the value and its depth (0 at the root). Returning
/// [`Construct::Emit`] stops processing of that value.
pub type Constructor<'a> = Box<dyn for<'v> Fn(&'v dyn Respond, usize) -> Construct<'v> + 'a>;

/// Hook run on every finished subtree, deepest first.
pub type Fixer<'a> = Box<dyn Fn(Value) -> Value + 'a>;

/// What a [`Constructor`] decided for a value.
#[derive(Debug)]
pub enum Construct<'a> {
    /// Keep converting, starting from this (possibly substituted) value.
    Descend(Node<'a>),
    /// Use this tree verbatim. No further hooks run, not even the Fixer.
    Emit(Value),
}

impl<'a> Construct<'a> {
    /// Continue with `data` unchanged.
    pub fn descend(data: &'a dyn Respond) -> Self {
        Construct::Descend(Node::Borrowed(data))
    }
}

/// Builds the generic output tree for one piece of source data.
///
/// The output is computed on the first call to [`output`](Response::output)
/// and cached; later calls return the same tree without running any hook.
pub struct Response<'a> {
    data: &'a dyn Respond,
    constructor: Option<Constructor<'a>>,
    fixer: Option<Fixer<'a>>,
    options: Options,
    output: OnceCell<Value>,
}

impl<'a> Response<'a> {
    #[must_use]
    pub fn new(data: &'a dyn Respond) -> Self {
        Response {
            data,
            constructor: None,
            fixer: None,
            options: Options::default(),
            output: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn with_constructor<F>(mut self, constructor: F) -> Self
    where
        F: for<'v> Fn(&'v dyn Respond, usize) -> Construct<'v> + 'a,
    {
        self.constructor = Some(Box::new(constructor));
        self
    }

    #[must_use]
    pub fn with_fixer<F>(mut self, fixer: F) -> Self
    where
        F: Fn(Value) -> Value + 'a,
    {
        self.fixer = Some(Box::new(fixer));
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn data(&self) -> &'a dyn Respond {
        self.data
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the output tree, building it on first use.
    pub fn output(&self) -> &Value {
        self.output.get_or_init(|| self.create_output())
    }

    /// Consumes the response and returns its output tree.
    #[must_use]
    pub fn into_output(mut self) -> Value {
        match self.output.take() {
            Some(output) => output,
            None => self.create_output(),
        }
    }

    fn create_output(&self) -> Value {
        if let Some(pre_marshaller) = self.data.as_pre_marshaller() {
            trace!("running pre-marshal hook on root value");
            pre_marshaller.pre_marshal();
        }

        if let Some(err) = self.data.as_error() {
            trace!(error = %err, "root value is an error, emitting its message");
            return Value::String(err.to_string());
        }

        self.create_response(self.data, 0)
    }

    pub(crate) fn create_response(&self, data: &dyn Respond, depth: usize) -> Value {
        if let Some(loader) = data.as_lazy_loader() {
            trace!(depth, "lazy loading value");
            loader.lazy_load(&self.options);
        }

        let mut current = Node::Borrowed(data);
        if let Some(constructor) = &self.constructor {
            match constructor(data, depth) {
                Construct::Emit(output) => {
                    trace!(depth, "constructor emitted final value");
                    return output;
                }
                Construct::Descend(node) => current = node,
            }
        }

        if let Some(converter) = data.as_response_converter() {
            trace!(depth, "applying response converter");
            current = converter.response_data();
        }

        let rendered = match current.as_display() {
            Some(display) => Some(display.to_string()),
            None => current.as_error().map(|err| err.to_string()),
        };
        if let Some(rendered) = rendered {
            current = Node::value(rendered);
        }

        let mut target: &dyn Respond = &*current;
        let built = loop {
            match target.shape() {
                Shape::Pointer(Some(inner)) => target = inner,
                Shape::Pointer(None) => break Value::Null,
                Shape::Struct(desc) => break self.create_struct_response(target, &desc, depth),
                Shape::Seq(items) => break self.create_slice_response(&items, depth),
                Shape::Map(entries) => break self.create_map_response(&entries, depth),
                Shape::Leaf(value) => break value,
            }
        };

        match &self.fixer {
            Some(fixer) => fixer(built),
            None => built,
        }
    }
}

impl fmt::Debug for Response<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("constructor", &self.constructor.is_some())
            .field("fixer", &self.fixer.is_some())
            .field("options", &self.options)
            .field("output", &self.output.get())
            .finish()
    }
}
