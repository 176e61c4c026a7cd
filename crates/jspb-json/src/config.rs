/// How JSON constructs outside the value model are converted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub boolean_repr: BooleanRepr,
}

/// How to represent JSON booleans, which the value model has no node for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanRepr {
    /// `true` becomes `Integer(1)` and `false` becomes `Integer(0)`.
    #[default]
    Integer,
    /// Error on conversion.
    Error,
}
