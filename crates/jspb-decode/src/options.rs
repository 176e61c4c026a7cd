/// Knobs for a decode call. The defaults reproduce the observed behavior of
/// the schemas this engine was written for.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOptions {
    pub repeated_target: RepeatedTarget,
    pub integer_leaf: IntegerLeafRepr,
    /// Keep the failure of every candidate when an alternation fails.
    pub collect_alternation_failures: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            repeated_target: RepeatedTarget::default(),
            integer_leaf: IntegerLeafRepr::default(),
            collect_alternation_failures: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Which accumulator a repeated pattern appends its elements' extractions to.
pub enum RepeatedTarget {
    /// The outermost accumulator of the current decode call, bypassing any
    /// alternation scope in between. A repeated pattern inside an alternation
    /// candidate that later fails leaves its extractions behind.
    #[default]
    TopLevel,
    /// The accumulator of the immediately enclosing construct.
    Enclosing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Which nodes an integer leaf accepts.
pub enum IntegerLeafRepr {
    /// Only strings holding a decimal integer, the way the wire format
    /// transmits numbers.
    #[default]
    StringEncoded,
    /// String-encoded integers and native integer nodes.
    StringOrInteger,
}
