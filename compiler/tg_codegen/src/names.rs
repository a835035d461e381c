//! Type name display.
//!
//! Runtime type strings carry package qualifiers (`*main.Node`). Generated
//! code lives in one package, so the configured qualifier is dropped wherever
//! it starts an identifier, and the empty interface is spelled `any`.

/// Prepare a runtime type string for use in generated source.
pub fn display_type(type_name: &str, qualifier: &str) -> String {
    strip_qualifier(type_name, qualifier).replace("interface {}", "any")
}

/// Remove `qualifier.` wherever it begins an identifier in `type_name`.
pub fn strip_qualifier(type_name: &str, qualifier: &str) -> String {
    if qualifier.is_empty() {
        return type_name.to_string();
    }
    let mut out = String::with_capacity(type_name.len());
    let mut rest = type_name;
    let mut in_ident = false;
    while let Some(c) = rest.chars().next() {
        if !in_ident {
            if let Some(after) = rest
                .strip_prefix(qualifier)
                .and_then(|after| after.strip_prefix('.'))
            {
                rest = after;
                continue;
            }
        }
        out.push(c);
        in_ident = c.is_alphanumeric() || c == '_';
        rest = &rest[c.len_utf8()..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_leading() {
        assert_eq!(strip_qualifier("main.Node", "main"), "Node");
        assert_eq!(strip_qualifier("*main.Node", "main"), "*Node");
        assert_eq!(strip_qualifier("[]*main.Node", "main"), "[]*Node");
    }

    #[test]
    fn test_strip_nested() {
        assert_eq!(
            strip_qualifier("map[main.Key]*main.Node", "main"),
            "map[Key]*Node"
        );
        assert_eq!(
            strip_qualifier("struct { A main.T; B other.T }", "main"),
            "struct { A T; B other.T }"
        );
    }

    #[test]
    fn test_strip_only_whole_qualifiers() {
        assert_eq!(strip_qualifier("domain.Node", "main"), "domain.Node");
        assert_eq!(strip_qualifier("mainly.Node", "main"), "mainly.Node");
        assert_eq!(strip_qualifier("main.Node", ""), "main.Node");
    }

    #[test]
    fn test_empty_interface_is_any() {
        assert_eq!(display_type("[]interface {}", ""), "[]any");
        assert_eq!(
            display_type("map[string]interface {}", "main"),
            "map[string]any"
        );
    }
}
