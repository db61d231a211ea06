//! Resolution of sub-elements: struct fields, list elements and map values.
//!
//! A sub-element goes through two extra steps before the dispatcher sees
//! it. An absent value (`None`) becomes its type's null substitute, or
//! `null` when the type has none. Then the element-only converter, if any,
//! replaces the value.

use crate::{Respond, Response, Value};
use tracing::trace;

impl Response<'_> {
    pub(crate) fn create_response_value(&self, value: &dyn Respond, depth: usize) -> Value {
        if value.is_nil() {
            return match value.absent_element_data() {
                Some(substitute) => {
                    trace!(depth, "substituting absent element");
                    self.convert_element(&*substitute, depth)
                }
                None => Value::Null,
            };
        }
        self.convert_element(value, depth)
    }

    fn convert_element(&self, value: &dyn Respond, depth: usize) -> Value {
        match value.as_element_converter() {
            Some(converter) => {
                trace!(depth, "applying element converter");
                let converted = converter.response_element_data(self.options());
                self.create_response(&*converted, depth)
            }
            None => self.create_response(value, depth),
        }
    }
}
