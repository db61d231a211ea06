//! Errors raised by the serde bridge.
//!
//! Building a tree from a [`Respond`](crate::Respond) value cannot fail:
//! unmatched nullable wrappers, excluded fields and missing getters are
//! dropped. Only [`to_value`](crate::to_value) is fallible, because an
//! arbitrary `Serialize` impl can emit map keys a [`Map`](crate::Map) cannot
//! hold or raise its own error.
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use responders::{to_value, Error};
//!
//! let mut bad = BTreeMap::new();
//! bad.insert(vec![1u8], "value");
//!
//! let err = to_value(&bad).unwrap_err();
//! assert!(matches!(err, Error::KeyMustBeString(_)));
//! ```

use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A map key serialized to something other than a string or scalar.
    #[error("map keys must be strings, found {0}")]
    KeyMustBeString(String),

    /// Raised by a `Serialize` impl, or by misuse of the map serializer.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub fn key_must_be_string(found: &str) -> Self {
        Error::KeyMustBeString(found.to_owned())
    }

    pub fn custom(msg: impl Display) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::custom(msg)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
