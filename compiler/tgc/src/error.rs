//! Errors reported by the command-line front end.

use std::io;

use tg_graph::MarshalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing input file (use `-` to read stdin)")]
    MissingInput,

    #[error("unexpected argument `{arg}`: only one input is accepted")]
    UnexpectedArgument { arg: String },

    #[error("unknown option `{flag}`")]
    UnknownFlag { flag: String },

    #[error("invalid value `{value}` for `{flag}`: expected a positive integer")]
    InvalidNumber { flag: &'static str, value: String },

    #[error("cannot read `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Marshal(#[from] MarshalError),
}
