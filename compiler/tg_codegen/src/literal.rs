//! Scalar literal rendering.

use std::fmt::Write;

use tg_graph::{Kind, Literal};

/// Render a scalar as a Go expression of exactly its runtime type.
///
/// `int`, `bool`, and `string` are the types untyped constants default to,
/// so they render bare. Every other width is wrapped in a conversion, as is
/// any named scalar type (`Color(3)`). `type_name` is the display name of
/// the value's type.
pub fn render_scalar(kind: Kind, lit: &Literal, type_name: &str) -> String {
    let text = match lit {
        Literal::Bool(b) => b.to_string(),
        Literal::Int(i) => i.to_string(),
        Literal::Uint(u) => u.to_string(),
        Literal::Float(f) => float_literal(*f, kind),
        Literal::Str(s) => quote(s),
    };
    if type_name != kind.name() {
        return format!("{type_name}({text})");
    }
    match kind {
        Kind::Int | Kind::Bool | Kind::String => text,
        _ => format!("{}({text})", kind.name()),
    }
}

/// The shortest decimal that reads back as exactly `f`, or a `math` call
/// for values with no constant form.
///
/// `Float32` values are printed at single precision, so `float32(0.1)` does
/// not spell out the widened double. Go constants have no negative zero.
pub fn float_literal(f: f64, kind: Kind) -> String {
    if f.is_nan() {
        "math.NaN()".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "math.Inf(1)".to_string()
        } else {
            "math.Inf(-1)".to_string()
        }
    } else if f == 0.0 && f.is_sign_negative() {
        "math.Copysign(0, -1)".to_string()
    } else if kind == Kind::Float32 {
        // Float32 literals were widened from f32, so narrowing is exact.
        #[allow(clippy::cast_possible_truncation)]
        let single = f as f32;
        format!("{single:?}")
    } else {
        format!("{f:?}")
    }
}

/// Whether `lit` renders as a call into package `math`.
pub fn needs_math(lit: &Literal) -> bool {
    match lit {
        Literal::Float(f) => !f.is_finite() || (*f == 0.0 && f.is_sign_negative()),
        Literal::Bool(_) | Literal::Int(_) | Literal::Uint(_) | Literal::Str(_) => false,
    }
}

/// Quote `s` as a Go interpreted string literal.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            c if is_printable(c) => out.push(c),
            c if u32::from(c) < 0x80 => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c if u32::from(c) < 0x1_0000 => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => {
                let _ = write!(out, "\\U{:08x}", u32::from(c));
            }
        }
    }
    out.push('"');
    out
}

fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !c.is_control()
        && !c.is_whitespace()
        && !matches!(
            c,
            '\u{ad}' | '\u{200b}'..='\u{200f}' | '\u{2028}'..='\u{202e}' | '\u{2060}'..='\u{2064}' | '\u{feff}'
        )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Tests can panic")]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_widths_bare() {
        assert_eq!(render_scalar(Kind::Int, &Literal::Int(100), "int"), "100");
        assert_eq!(render_scalar(Kind::Bool, &Literal::Bool(true), "bool"), "true");
        assert_eq!(
            render_scalar(Kind::String, &Literal::Str("Hello World".into()), "string"),
            "\"Hello World\""
        );
    }

    #[test]
    fn test_sized_widths_converted() {
        assert_eq!(render_scalar(Kind::Int64, &Literal::Int(100), "int64"), "int64(100)");
        assert_eq!(render_scalar(Kind::Int8, &Literal::Int(-3), "int8"), "int8(-3)");
        assert_eq!(render_scalar(Kind::Uint, &Literal::Uint(7), "uint"), "uint(7)");
        assert_eq!(render_scalar(Kind::Uintptr, &Literal::Uint(7), "uintptr"), "uintptr(7)");
        assert_eq!(
            render_scalar(Kind::Float64, &Literal::Float(1.23), "float64"),
            "float64(1.23)"
        );
        assert_eq!(
            render_scalar(Kind::Float32, &Literal::Float(f64::from(1.23f32)), "float32"),
            "float32(1.23)"
        );
        assert_eq!(
            render_scalar(Kind::Float64, &Literal::Float(2.0), "float64"),
            "float64(2.0)"
        );
    }

    #[test]
    fn test_named_scalar_types() {
        assert_eq!(render_scalar(Kind::Int, &Literal::Int(3), "Color"), "Color(3)");
        assert_eq!(
            render_scalar(Kind::String, &Literal::Str("x".into()), "pkg.Name"),
            "pkg.Name(\"x\")"
        );
    }

    #[test]
    fn test_special_floats() {
        assert_eq!(float_literal(f64::NAN, Kind::Float64), "math.NaN()");
        assert_eq!(float_literal(f64::INFINITY, Kind::Float64), "math.Inf(1)");
        assert_eq!(float_literal(f64::NEG_INFINITY, Kind::Float32), "math.Inf(-1)");
        assert_eq!(float_literal(-0.0, Kind::Float64), "math.Copysign(0, -1)");
        assert_eq!(float_literal(-0.5, Kind::Float64), "-0.5");
        assert!(needs_math(&Literal::Float(f64::NAN)));
        assert!(needs_math(&Literal::Float(-0.0)));
        assert!(!needs_math(&Literal::Float(0.0)));
        assert!(!needs_math(&Literal::Int(0)));
    }

    #[test]
    fn test_floats_read_back_exactly() {
        let doubles = [1e-9, 0.123_456_7, 0.1 + 0.2, 1.234_567_890_123_456_7e300, 5e-324];
        for f in doubles {
            let text = float_literal(f, Kind::Float64);
            assert_eq!(text.parse::<f64>().unwrap().to_bits(), f.to_bits(), "{text}");
        }
        assert_eq!(float_literal(1e-9, Kind::Float64), "1e-9");
        assert_eq!(float_literal(0.1 + 0.2, Kind::Float64), "0.30000000000000004");

        let single = f64::from(0.1f32);
        assert_eq!(float_literal(single, Kind::Float32), "0.1");
        let text = float_literal(single, Kind::Float32);
        assert_eq!(f64::from(text.parse::<f32>().unwrap()).to_bits(), single.to_bits());
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(quote("line\nnext\ttab"), "\"line\\nnext\\ttab\"");
        assert_eq!(quote("\u{0}\u{7f}"), "\"\\x00\\x7f\"");
        assert_eq!(quote("\u{200b}"), "\"\\u200b\"");
        assert_eq!(quote("héllo ☺"), "\"héllo ☺\"");
    }
}
