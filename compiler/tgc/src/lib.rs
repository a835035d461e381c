//! Command-line front end.
//!
//! Reads a JSON document, converts it to a [`tg_value::Value`], and prints the
//! Go function that rebuilds it.

mod args;
mod error;
mod json;

pub use args::{parse_args, CliOptions, Input, USAGE};
pub use error::CliError;
pub use json::json_to_value;

use std::io::Read;
use std::sync::Once;

use tg_codegen::{required_imports, CodeBuilder};
use tg_graph::{Marshaler, Substitutions};
use tracing::debug;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=tg_graph=debug` or
/// `RUST_LOG=tg_codegen=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(filter)
                .init();
        }
    });
}

/// Render the JSON document `source` as a Go function, preceded by any
/// imports it needs.
pub fn generate(source: &str, options: &CliOptions) -> Result<String, CliError> {
    let json: serde_json::Value = serde_json::from_str(source)?;
    let value = json_to_value(&json);
    let graph = Marshaler::new(Substitutions::new())
        .with_options(options.marshal.clone())
        .marshal(&value)?;
    debug!(nodes = graph.len(), "marshaled document");
    let mut out = String::new();
    for package in required_imports(&graph) {
        out.push_str("import \"");
        out.push_str(package);
        out.push_str("\"\n");
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&CodeBuilder::new(&graph, options.codegen.clone()).build());
    Ok(out)
}

/// Read the configured input and render it.
pub fn run(options: &CliOptions) -> Result<String, CliError> {
    let source = read_input(&options.input)?;
    generate(&source, options)
}

fn read_input(input: &Input) -> Result<String, CliError> {
    match input {
        Input::Stdin => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|err| CliError::Read {
                    path: "<stdin>".to_string(),
                    source: err,
                })?;
            Ok(source)
        }
        Input::File(path) => std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        }),
    }
}
