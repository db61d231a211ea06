//! List and map builders.
//!
//! Elements of a nested list, and every map value, go through the element
//! resolver. Elements of a root-level list skip it: they are offered to the
//! collection-root converter instead and then dispatched directly.

use crate::{Map, Respond, Response, Value};
use tracing::trace;

impl Response<'_> {
    pub(crate) fn create_slice_response(&self, items: &[&dyn Respond], depth: usize) -> Value {
        let mut output = Vec::with_capacity(items.len());
        for &item in items {
            let element = if depth == 0 {
                self.create_root_element(item, depth + 1)
            } else {
                self.create_response_value(item, depth + 1)
            };
            output.push(element);
        }
        Value::Array(output)
    }

    fn create_root_element(&self, item: &dyn Respond, depth: usize) -> Value {
        match item.as_collection_converter() {
            Some(converter) => {
                trace!("applying collection converter to root element");
                let converted = converter.collection_response();
                self.create_response(&*converted, depth)
            }
            None => self.create_response(item, depth),
        }
    }

    pub(crate) fn create_map_response(
        &self,
        entries: &[(&str, &dyn Respond)],
        depth: usize,
    ) -> Value {
        let mut output = Map::with_capacity(entries.len());
        for &(key, value) in entries {
            output.insert(key.to_string(), self.create_response_value(value, depth + 1));
        }
        Value::Object(output)
    }
}
