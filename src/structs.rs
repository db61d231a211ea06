//! Struct builder and nullable-wrapper unwrapping.
//!
//! Fields are visited in declaration order. Embedded fields are converted
//! at the parent's depth and merged into the parent object without
//! overwriting keys already set. Every other field is keyed through
//! [`tag::response_key`], filtered by its `cond` annotation and converted
//! as a sub-element. Internal fields are read through their getter.
//!
//! A struct named `Null<X>` with an `X` field and a boolean `Valid` field
//! is a nullable wrapper: it converts to the `X` value when `Valid` is
//! `true` and to `null` otherwise.

use crate::tag::{self, EXCLUDE_KEY};
use crate::{Field, Map, Respond, Response, Shape, Struct, Value};
use tracing::{debug, trace};

/// Type-name prefix marking a nullable wrapper.
pub const NULLABLE_PREFIX: &str = "Null";

/// Name of a nullable wrapper's validity field.
pub const VALID_FIELD: &str = "Valid";

impl Response<'_> {
    pub(crate) fn create_struct_response(
        &self,
        value: &dyn Respond,
        desc: &Struct<'_>,
        depth: usize,
    ) -> Value {
        if let Some(unwrapped) = self.create_nullable_response(desc, depth) {
            return unwrapped;
        }

        let mut output = Map::with_capacity(desc.fields().len());
        for field in desc.fields() {
            if field.is_embedded() {
                if let Some(inner) = field.value() {
                    self.merge_embedded(&mut output, field, inner, depth);
                }
                continue;
            }

            let key = tag::response_key(field);
            if key == EXCLUDE_KEY {
                trace!(field = field.name(), "field excluded by tag");
                continue;
            }

            if !tag::conditions(field).any(|condition| self.options().should_include(condition)) {
                debug!(field = field.name(), "field dropped by inclusion predicate");
                continue;
            }

            let resolved = match field.value() {
                Some(inner) => self.create_response_value(inner, depth + 1),
                None => {
                    let getter = tag::getter_name(field.name());
                    match value.getter(&getter) {
                        Some(node) => self.create_response_value(&*node, depth + 1),
                        None => {
                            debug!(
                                type_name = desc.name(),
                                field = field.name(),
                                getter = %getter,
                                "no getter for internal field, dropping it"
                            );
                            continue;
                        }
                    }
                }
            };
            output.insert(key.into_owned(), resolved);
        }
        Value::Object(output)
    }

    fn merge_embedded(&self, output: &mut Map, field: &Field<'_>, inner: &dyn Respond, depth: usize) {
        match self.create_response(inner, depth) {
            Value::Object(embedded) => {
                for (key, value) in embedded {
                    output.insert_if_absent(key, value);
                }
            }
            other => debug!(
                field = field.name(),
                output = ?other,
                "embedded field did not convert to an object, skipping it"
            ),
        }
    }

    fn create_nullable_response(&self, desc: &Struct<'_>, depth: usize) -> Option<Value> {
        let wrapped = desc.name().strip_prefix(NULLABLE_PREFIX)?;
        if wrapped.is_empty() {
            return None;
        }
        let inner = nullable_field(desc, wrapped)?;
        let valid = match nullable_field(desc, VALID_FIELD)?.shape() {
            Shape::Leaf(Value::Bool(valid)) => valid,
            _ => return None,
        };

        trace!(type_name = desc.name(), valid, "unwrapping nullable wrapper");
        if !valid {
            return Some(Value::Null);
        }

        let mut target = inner;
        loop {
            match target.shape() {
                Shape::Pointer(Some(pointee)) => target = pointee,
                Shape::Pointer(None) => return Some(Value::Null),
                Shape::Leaf(value) => return Some(value),
                _ => break,
            }
        }
        Some(self.create_response_value(inner, depth + 1))
    }
}

fn nullable_field<'a>(desc: &Struct<'a>, name: &str) -> Option<&'a dyn Respond> {
    desc.fields()
        .iter()
        .find(|field| field.name().eq_ignore_ascii_case(name))
        .and_then(Field::value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, Node, Options};

    struct NullInt {
        int: i64,
        valid: bool,
    }

    impl Respond for NullInt {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(
                Struct::new("NullInt")
                    .field(Field::new("Int", &self.int))
                    .field(Field::new("Valid", &self.valid)),
            )
        }
    }

    struct NullName {
        name: String,
    }

    impl Respond for NullName {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(Struct::new("NullName").field(Field::new("Name", &self.name)))
        }
    }

    struct Account {
        login: String,
        token: String,
    }

    impl Respond for Account {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(
                Struct::new("Account")
                    .field(Field::new("Login", &self.login))
                    .field(Field::internal("token"))
                    .field(Field::internal("salt")),
            )
        }

        fn getter(&self, name: &str) -> Option<Node<'_>> {
            match name {
                "Token" => Some(Node::value(format!("{}…", &self.token[..2]))),
                _ => None,
            }
        }
    }

    #[test]
    fn test_nullable_valid_unwraps() {
        let data = NullInt { int: 5, valid: true };
        assert_eq!(Response::new(&data).output(), &Value::from(5));
    }

    #[test]
    fn test_nullable_invalid_is_null() {
        let data = NullInt { int: 5, valid: false };
        assert_eq!(Response::new(&data).output(), &Value::Null);
    }

    #[test]
    fn test_nullable_without_valid_is_plain_struct() {
        let data = NullName { name: "x".into() };
        assert_eq!(Response::new(&data).output(), &value!({ "name": "x" }));
    }

    #[test]
    fn test_internal_field_read_through_getter() {
        let data = Account {
            login: "ada".into(),
            token: "abcdef".into(),
        };
        assert_eq!(
            Response::new(&data).output(),
            &value!({ "login": "ada", "token": "ab…" })
        );
    }

    #[test]
    fn test_condition_any_match_includes() {
        struct Profile {
            email: String,
            notes: String,
        }

        impl Respond for Profile {
            fn shape(&self) -> Shape<'_> {
                Shape::Struct(
                    Struct::new("Profile")
                        .field(Field::new("Email", &self.email).cond("admin,user"))
                        .field(Field::new("Notes", &self.notes).cond("staff")),
                )
            }
        }

        let data = Profile {
            email: "a@b.c".into(),
            notes: "n".into(),
        };
        let options = Options::new().with_inclusion(|condition| condition == "admin");
        let response = Response::new(&data).with_options(options);
        assert_eq!(response.output(), &value!({ "email": "a@b.c" }));
    }

    #[test]
    fn test_untagged_field_checks_empty_condition() {
        struct Plain {
            a: u8,
        }

        impl Respond for Plain {
            fn shape(&self) -> Shape<'_> {
                Shape::Struct(Struct::new("Plain").field(Field::new("A", &self.a)))
            }
        }

        let data = Plain { a: 1 };
        let options = Options::new().with_inclusion(|condition| !condition.is_empty());
        assert_eq!(
            Response::new(&data).with_options(options).output(),
            &value!({})
        );
    }

    #[test]
    fn test_nullable_field_names_match_case_insensitively() {
        struct NullInt {
            int: i64,
            valid: bool,
        }

        impl Respond for NullInt {
            fn shape(&self) -> Shape<'_> {
                Shape::Struct(
                    Struct::new("NullInt")
                        .field(Field::new("int", &self.int))
                        .field(Field::new("valid", &self.valid)),
                )
            }
        }

        let data = NullInt { int: 5, valid: true };
        assert_eq!(Response::new(&data).output(), &Value::from(5));
        let data = NullInt { int: 5, valid: false };
        assert_eq!(Response::new(&data).output(), &Value::Null);
    }

    #[test]
    fn test_nullable_with_non_bool_valid_is_plain_struct() {
        struct NullInt {
            int: i64,
            valid: Option<bool>,
        }

        impl Respond for NullInt {
            fn shape(&self) -> Shape<'_> {
                Shape::Struct(
                    Struct::new("NullInt")
                        .field(Field::new("Int", &self.int))
                        .field(Field::new("Valid", &self.valid)),
                )
            }
        }

        let data = NullInt {
            int: 5,
            valid: Some(true),
        };
        assert_eq!(
            Response::new(&data).output(),
            &value!({ "int": 5, "valid": true })
        );
    }
}
