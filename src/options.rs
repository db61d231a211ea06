//! Configuration passed to a conversion.
//!
//! [`Options`] carries two things:
//!
//! - a read-only parameter mapping handed to the lazy-load and
//!   element-converter hooks (for example the fields a client asked to
//!   expand, or the base URL links should be built against)
//! - the inclusion predicate consulted for every condition named in a
//!   field's `cond` annotation
//!
//! ## Examples
//!
//! ```rust
//! use responders::{Options, Value};
//!
//! let options = Options::new()
//!     .with_param("base_url", "https://api.example.com")
//!     .with_inclusion(|condition| condition != "admin");
//!
//! assert_eq!(
//!     options.get("base_url").and_then(Value::as_str),
//!     Some("https://api.example.com")
//! );
//! assert!(options.should_include("user"));
//! assert!(!options.should_include("admin"));
//! ```

use crate::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Decides whether fields guarded by a condition name are emitted.
pub type InclusionPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Configuration for a [`Response`](crate::Response).
///
/// By default the parameter mapping is empty and every condition is
/// included.
#[derive(Clone, Default)]
pub struct Options {
    params: Map,
    inclusion: Option<InclusionPredicate>,
}

impl Options {
    /// Creates default options: no parameters, every condition included.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one parameter to the mapping handed to hooks.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replaces the whole parameter mapping.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use responders::{value, Options};
    ///
    /// let params = match value!({ "expand": ["owner"] }) {
    ///     responders::Value::Object(map) => map,
    ///     _ => unreachable!(),
    /// };
    /// let options = Options::new().with_params(params);
    /// assert!(options.get("expand").is_some());
    /// ```
    #[must_use]
    pub fn with_params(mut self, params: Map) -> Self {
        self.params = params;
        self
    }

    /// Sets the inclusion predicate.
    ///
    /// The predicate receives each condition name parsed from a field's
    /// `cond` annotation; a field without the annotation is checked against
    /// the empty condition `""`.
    #[must_use]
    pub fn with_inclusion<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.inclusion = Some(Arc::new(predicate));
        self
    }

    /// Returns the parameter stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Returns the whole parameter mapping.
    #[must_use]
    pub fn params(&self) -> &Map {
        &self.params
    }

    /// Evaluates the inclusion predicate for one condition name.
    #[must_use]
    pub fn should_include(&self, condition: &str) -> bool {
        match &self.inclusion {
            Some(predicate) => predicate(condition),
            None => true,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("params", &self.params)
            .field("inclusion", &self.inclusion.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}
