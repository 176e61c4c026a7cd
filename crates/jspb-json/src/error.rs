use jspb_value::NodePath;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("unsupported JSON {kind} at {path}")]
    Unsupported { kind: &'static str, path: NodePath },

    #[error("integer {number} at {path} does not fit in 64 bits")]
    IntegerOutOfRange { number: String, path: NodePath },
}
