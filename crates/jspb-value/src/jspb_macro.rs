/// Build a [`Value`](crate::Value) tree with JSON-like syntax.
///
/// Sequences are written with brackets, `null` is the null node, and any
/// other element is converted with `Value::from`. Negative integers must be
/// parenthesized: `jspb!([(-1)])`.
///
/// ```
/// use jspb_value::jspb;
///
/// let value = jspb!(["7", null, ["x", 3]]);
/// assert_eq!(value.to_string(), r#"["7",null,["x",3]]"#);
/// ```
#[macro_export]
macro_rules! jspb {
    (null) => {
        $crate::Value::Null
    };
    ([]) => {
        $crate::Value::Sequence($crate::Sequence(::std::vec::Vec::new()))
    };
    ([ $($element:tt),+ $(,)? ]) => {
        $crate::Value::Sequence($crate::Sequence(::std::vec![ $( $crate::jspb!($element) ),+ ]))
    };
    ($other:expr) => {
        $crate::Value::from($other)
    };
}
