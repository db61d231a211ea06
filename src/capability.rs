//! Optional behaviors a source value may implement.
//!
//! Each capability is an independent trait. A type opts in by implementing
//! the trait and answering the matching `as_*` query on
//! [`Respond`](crate::Respond) with `Some(self)`; the converter checks every
//! value for each capability in a fixed order.
//!
//! | capability | when it runs |
//! |---|---|
//! | [`PreMarshaller`] | once, on the root value, before anything else |
//! | [`LazyLoader`] | first, on every value the dispatcher sees |
//! | [`ResponseConverter`] | after the Constructor, before shape classification |
//! | string rendering (`Display`) | after the whole-value converter |
//! | [`ResponseElementConverter`] | only for struct fields, list elements and map values |
//! | null substitute ([`Respond::nil_element_data`](crate::Respond::nil_element_data)) | only for absent sub-elements |
//! | [`CollectionResponseConverter`] | only for elements of a root-level list |

use crate::{Node, Options};

/// Work a root value needs done before the response is encoded.
///
/// Implementations that mutate state need interior mutability (`Cell`,
/// `RefCell`, `OnceCell`), since the converter only holds shared borrows.
pub trait PreMarshaller {
    fn pre_marshal(&self);
}

/// Loads data that was not fetched up front.
///
/// Invoked with the response [`Options`] before any other hook inspects the
/// value. Like [`PreMarshaller`], implementations use interior mutability.
///
/// # Examples
///
/// ```rust
/// use std::cell::OnceCell;
/// use responders::{LazyLoader, Options, Respond, Response, Shape, Value};
///
/// struct Count(OnceCell<i64>);
///
/// impl LazyLoader for Count {
///     fn lazy_load(&self, _options: &Options) {
///         let _ = self.0.set(42);
///     }
/// }
///
/// impl Respond for Count {
///     fn shape(&self) -> Shape<'_> {
///         Shape::Leaf(self.0.get().copied().map_or(Value::Null, Value::from))
///     }
///
///     fn as_lazy_loader(&self) -> Option<&dyn LazyLoader> {
///         Some(self)
///     }
/// }
///
/// let count = Count(OnceCell::new());
/// assert_eq!(Response::new(&count).output(), &Value::from(42));
/// ```
pub trait LazyLoader {
    fn lazy_load(&self, options: &Options);
}

/// Replaces a value with a different one wherever it appears, including at
/// the root of the response.
pub trait ResponseConverter {
    fn response_data(&self) -> Node<'_>;
}

/// Replaces a value only when it is a sub-element of a response: a struct
/// field, a list element or a map value. Never applied to the root value,
/// nor to the elements of a root-level list.
///
/// Useful for collapsing a large struct into a link or summary when it is
/// nested inside another resource.
pub trait ResponseElementConverter {
    fn response_element_data(&self, options: &Options) -> Node<'_>;
}

/// Replaces the elements of a root-level list before they are converted.
pub trait CollectionResponseConverter {
    fn collection_response(&self) -> Node<'_>;
}
