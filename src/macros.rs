/// Builds an [`Object`](crate::Object) from a literal.
///
/// Keys are string literals; values are any expression convertible into a
/// [`Value`](crate::Value), or a nested `{ ... }` object literal.
///
/// # Panics
///
/// Panics if a key is not a valid property name or appears twice, the same
/// way an out-of-bounds index in a literal would.
///
/// # Examples
///
/// ```rust
/// use serde_anon::{object, Value};
///
/// let obj = object!({
///     "name": "Alice",
///     "age": 30u32,
///     "scores": vec![1.5f64, 2.0],
///     "address": {
///         "city": "Oslo",
///     },
/// });
///
/// assert_eq!(obj.get("age"), Some(&Value::U32(30)));
/// let address = obj.get("address").and_then(Value::as_object).unwrap();
/// assert_eq!(address.get("city").and_then(Value::as_str), Some("Oslo"));
/// ```
#[macro_export]
macro_rules! object {
    ({ $($body:tt)* }) => {{
        #[allow(unused_mut)]
        let mut object = $crate::Object::new();
        $crate::object!(@insert object $($body)*);
        object
    }};

    (@insert $object:ident) => {};

    (@insert $object:ident $key:literal : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $crate::object!(@put $object, $key, $crate::object!({ $($inner)* }));
        $( $crate::object!(@insert $object $($rest)*); )?
    };

    (@insert $object:ident $key:literal : $value:expr $(, $($rest:tt)*)?) => {
        $crate::object!(@put $object, $key, $value);
        $( $crate::object!(@insert $object $($rest)*); )?
    };

    (@put $object:ident, $key:expr, $value:expr) => {
        if let Err(err) = $object.insert($key, $value) {
            panic!("invalid object! literal: {}", err);
        }
    };
}
