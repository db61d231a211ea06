//! Field-name resolution and conditional-tag parsing.
//!
//! The output key of a struct field is the first of these that is
//! non-empty:
//!
//! 1. the `response` annotation
//! 2. the `json` annotation, unless it is `"-"`
//! 3. the declared field name, lower-cased
//!
//! A resolved key of [`EXCLUDE_KEY`] removes the field from the output.

use crate::Field;
use std::borrow::Cow;

/// Resolved key that excludes a field.
pub const EXCLUDE_KEY: &str = "-";

/// Resolves the output key for `field`.
///
/// # Examples
///
/// ```rust
/// use responders::{tag, Field};
///
/// let n = 1;
/// assert_eq!(tag::response_key(&Field::new("Count", &n)), "count");
/// assert_eq!(tag::response_key(&Field::new("Count", &n).json("total")), "total");
/// assert_eq!(tag::response_key(&Field::new("Count", &n).json("-")), "count");
/// assert_eq!(tag::response_key(&Field::new("Count", &n).response("-")), "-");
/// ```
#[must_use]
pub fn response_key<'f>(field: &Field<'f>) -> Cow<'static, str> {
    if let Some(key) = field.response_tag().filter(|key| !key.is_empty()) {
        return Cow::Borrowed(key);
    }
    if let Some(key) = field
        .json_tag()
        .filter(|key| !key.is_empty() && *key != EXCLUDE_KEY)
    {
        return Cow::Borrowed(key);
    }
    Cow::Owned(field.name().to_lowercase())
}

/// Splits the `cond` annotation into condition names.
///
/// A missing annotation yields a single empty condition, so a field without
/// one is still checked against the inclusion predicate.
pub fn conditions<'f>(field: &Field<'f>) -> impl Iterator<Item = &'static str> {
    field.cond_tag().unwrap_or("").split(',')
}

/// Name of the getter used to read an internal field: the field name with
/// its first character upper-cased.
#[must_use]
pub fn getter_name(field_name: &str) -> String {
    let mut chars = field_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
