/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Handy for Constructor and Fixer hooks that emit hand-built trees.
///
/// ```rust
/// use responders::{value, Value};
///
/// let link = value!({ "href": "/users/1", "rel": "self" });
/// assert_eq!(link.get("rel"), Some(&Value::from("self")));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };
    ([ $($item:tt),* $(,)? ]) => {
        $crate::Value::Array(::std::vec![$($crate::value!($item)),*])
    };
    ({ $($key:literal : $item:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut map = $crate::Map::new();
        $( map.insert(::std::string::String::from($key), $crate::value!($item)); )*
        $crate::Value::Object(map)
    }};
    // `true`, `false`, numbers, strings and parenthesized expressions.
    ($scalar:expr) => {
        $crate::Value::from($scalar)
    };
}
