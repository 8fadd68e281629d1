/// Declaratively constructs an [`Object`](crate::Object).
///
/// Keys may be bare or `module:name` qualified; values are anything
/// convertible into a [`Value`](crate::Value), including nested `object!` and
/// `array!` invocations.
///
/// ```rust
/// use rfc7951_data::{array, object};
///
/// let obj = object! {
///     "module-v1:leaf" => "foo",
///     "module-v1:leaf-list" => array![1, 2, 3],
/// };
/// assert_eq!(obj.len(), 2);
/// ```
#[macro_export]
macro_rules! object {
    () => { $crate::Object::new() };
    ( $($key:expr => $value:expr),+ $(,)? ) => {{
        let obj = $crate::Object::new();
        $( let obj = obj.assoc($key, $value); )+
        obj
    }};
}

/// Declaratively constructs an [`Array`](crate::Array) from values
/// convertible into [`Value`](crate::Value).
///
/// ```rust
/// use rfc7951_data::array;
///
/// let arr = array![1, 2, 3];
/// assert_eq!(arr.len(), 3);
/// ```
#[macro_export]
macro_rules! array {
    () => { $crate::Array::new() };
    ( $($value:expr),+ $(,)? ) => {{
        let arr = $crate::Array::new();
        $( let arr = arr.append($value); )+
        arr
    }};
}
