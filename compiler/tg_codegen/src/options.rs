//! Code generation options.

/// Options for rendering a graph as a Go function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Name of the generated function.
    pub func_name: String,
    /// Package qualifier removed from type names, e.g. `main`.
    pub omit_qualifier: String,
    /// One level of indentation.
    pub indent: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions {
            func_name: "getData".to_string(),
            omit_qualifier: String::new(),
            indent: "  ".to_string(),
        }
    }
}

impl CodegenOptions {
    #[must_use]
    pub fn with_func_name(mut self, name: &str) -> Self {
        self.func_name = name.to_string();
        self
    }

    #[must_use]
    pub fn with_omit_qualifier(mut self, qualifier: &str) -> Self {
        self.omit_qualifier = qualifier.to_string();
        self
    }
}
