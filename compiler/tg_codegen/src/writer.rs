//! Indented source output.

/// Accumulates generated source text line by line.
pub struct SourceWriter {
    unit: String,
    depth: usize,
    output: String,
}

impl SourceWriter {
    /// Create a writer indenting each level with `unit`.
    pub fn new(unit: &str) -> Self {
        SourceWriter {
            unit: unit.to_string(),
            depth: 0,
            output: String::with_capacity(1024),
        }
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.depth += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        debug_assert!(self.depth > 0, "dedent called with zero indent");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Append `s` as is, without indentation.
    pub fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    /// Append `s` as a full line at the current depth.
    pub fn writeln(&mut self, s: &str) {
        for _ in 0..self.depth {
            self.output.push_str(&self.unit);
        }
        self.output.push_str(s);
        self.output.push('\n');
    }

    pub fn finish(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indent_dedent() {
        let mut writer = SourceWriter::new("  ");
        writer.writeln("line1");
        writer.indent();
        writer.writeln("line2");
        writer.indent();
        writer.writeln("line3");
        writer.dedent();
        writer.dedent();
        writer.write("}");
        assert_eq!(writer.finish(), "line1\n  line2\n    line3\n}");
    }

    #[test]
    fn test_custom_unit() {
        let mut writer = SourceWriter::new("\t");
        writer.indent();
        writer.writeln("x");
        assert_eq!(writer.finish(), "\tx\n");
    }
}
