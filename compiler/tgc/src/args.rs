//! Command-line option parsing.

use tg_codegen::CodegenOptions;
use tg_graph::{MarshalOptions, UnsupportedPolicy};

use crate::CliError;

pub const USAGE: &str = "\
Usage: tgc <file.json | -> [options]

Options:
  --func=<name>               Name of the generated function (default: getData)
  --omit=<qualifier>          Package qualifier to drop from type names
  --dedup-values              Share one variable between equal structs and arrays
  --placeholder-unsupported   Render functions and unsafe pointers as nil
  --max-nodes=<n>             Node ceiling (default: 1000000)
  --max-depth=<n>             Nesting ceiling (default: 10000)";

/// Where the document is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliOptions {
    pub input: Input,
    pub marshal: MarshalOptions,
    pub codegen: CodegenOptions,
}

/// Parse the arguments following the program name.
///
/// Flags may appear before or after the input path.
pub fn parse_args(args: &[String]) -> Result<CliOptions, CliError> {
    let mut input = None;
    let mut marshal = MarshalOptions::default();
    let mut codegen = CodegenOptions::default();

    for arg in args {
        if let Some(name) = arg.strip_prefix("--func=") {
            codegen.func_name = name.to_string();
        } else if let Some(qualifier) = arg.strip_prefix("--omit=") {
            codegen.omit_qualifier = qualifier.to_string();
        } else if arg == "--dedup-values" {
            marshal.dedup_values = true;
        } else if arg == "--placeholder-unsupported" {
            marshal.unsupported = UnsupportedPolicy::Placeholder;
        } else if let Some(n) = arg.strip_prefix("--max-nodes=") {
            marshal.max_nodes = parse_limit("--max-nodes", n)?;
        } else if let Some(n) = arg.strip_prefix("--max-depth=") {
            marshal.max_depth = parse_limit("--max-depth", n)?;
        } else if arg == "-" || !arg.starts_with('-') {
            if input.is_some() {
                return Err(CliError::UnexpectedArgument { arg: arg.clone() });
            }
            input = Some(if arg == "-" {
                Input::Stdin
            } else {
                Input::File(arg.clone())
            });
        } else {
            return Err(CliError::UnknownFlag { flag: arg.clone() });
        }
    }

    let input = input.ok_or(CliError::MissingInput)?;
    Ok(CliOptions {
        input,
        marshal,
        codegen,
    })
}

fn parse_limit(flag: &'static str, value: &str) -> Result<usize, CliError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CliError::InvalidNumber {
            flag,
            value: value.to_string(),
        }),
    }
}
