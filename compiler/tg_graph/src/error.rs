//! Errors reported while building a value graph.

use thiserror::Error;
use tg_value::Kind;

pub type MarshalResult<T> = Result<T, MarshalError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MarshalError {
    #[error("cannot marshal value of kind `{kind}` (type `{type_name}`)")]
    UnsupportedKind { kind: Kind, type_name: String },
    #[error("invalid root of type `{type_name}`: {reason}")]
    InvalidRoot {
        type_name: String,
        reason: &'static str,
    },
    #[error("map key of type `{type_name}` refers back to an enclosing value")]
    CyclicMapKey { type_name: String },
    #[error("value graph exceeds the limit of {limit} nodes")]
    NodeLimitExceeded { limit: usize },
    #[error("value nesting exceeds the depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}
