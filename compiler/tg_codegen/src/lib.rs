//! Go source generation from value graphs.
//!
//! Renders a [`tg_graph::Graph`] as a Go function that rebuilds the value:
//!
//! ```text
//! func getData() *recurStruct {
//!   var1 := recurStruct{name:"root",recur:nil,extra:"whatever",}
//!   var1.recur = &var1
//!   return &var1
//! }
//! ```
//!
//! Declarations come first, in node order. Slots that refer to something not
//! declared yet are filled with a zero placeholder and assigned afterwards,
//! which is how cycles and forward references are reconstructed.
//!
//! The function is emitted without a package clause or imports. Floats with
//! no constant form render as calls into `math`; [`required_imports`] lists
//! the packages a caller has to import alongside the function.

mod builder;
mod literal;
mod names;
mod options;
mod patch;
mod plan;
mod writer;

pub use builder::CodeBuilder;
pub use literal::{float_literal, needs_math, quote, render_scalar};
pub use names::{display_type, strip_qualifier};
pub use options::CodegenOptions;

use tg_graph::{Graph, NodeKind};

/// Render `graph` as a function named `func_name`, dropping the package
/// qualifier `omit_qualifier` from type names.
///
/// The result may refer to package `math`; see [`required_imports`].
pub fn build(graph: &Graph, func_name: &str, omit_qualifier: &str) -> String {
    let options = CodegenOptions::default()
        .with_func_name(func_name)
        .with_omit_qualifier(omit_qualifier);
    CodeBuilder::new(graph, options).build()
}

/// Packages the function rendered from `graph` refers to, in import order.
pub fn required_imports(graph: &Graph) -> Vec<&'static str> {
    let math = graph.iter().any(|(_, node)| match &node.kind {
        NodeKind::Scalar { lit, .. } => needs_math(lit),
        _ => false,
    });
    if math {
        vec!["math"]
    } else {
        Vec::new()
    }
}
