//! Builtin opaque-string types
//!
//! Values with no reflectable fields that still need to round-trip. Each is
//! carried as its canonical string form and parsed back on decode.

use num_complex::Complex64;

use crate::error::{CodecError, CodecResult};
use crate::reflect::{Reflect, Shape, TextForm};
use crate::registry::TypeRegistry;

pub const COMPLEX_TYPE_PATH: &str = "num_complex::Complex64";

/// Install the builtin allow-list into `registry`
pub(crate) fn install(registry: &mut TypeRegistry) {
    registry
        .register_text::<Complex64>()
        .alias("complex", COMPLEX_TYPE_PATH)
        .alias("builtins.complex", COMPLEX_TYPE_PATH);
}

impl Reflect for Complex64 {
    fn type_path(&self) -> &'static str {
        COMPLEX_TYPE_PATH
    }

    fn shape(&self) -> Shape {
        Shape::Text(self.to_string())
    }
}

impl TextForm for Complex64 {
    const TYPE_PATH: &'static str = COMPLEX_TYPE_PATH;

    /// Accepts `1+3i` as well as the parenthesised `(1+3j)` form
    fn parse_text(text: &str) -> CodecResult<Self> {
        let trimmed = text.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);
        let canonical = match inner.strip_suffix('j') {
            Some(head) => format!("{}i", head),
            None => inner.to_string(),
        };

        canonical.parse::<Complex64>().map_err(|err| {
            CodecError::malformed(format!("invalid complex literal '{}': {}", text, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_form() {
        assert_eq!(Complex64::new(1.0, 3.0).shape(), Shape::Text("1+3i".into()));
        assert_eq!(Complex64::new(0.5, -2.0).shape(), Shape::Text("0.5-2i".into()));
    }

    #[test]
    fn test_parse_forms() {
        let expected = Complex64::new(1.0, 3.0);
        assert_eq!(Complex64::parse_text("1+3i").unwrap(), expected);
        assert_eq!(Complex64::parse_text("(1+3j)").unwrap(), expected);
        assert_eq!(Complex64::parse_text("1+3j").unwrap(), expected);
        assert_eq!(Complex64::parse_text("(3+4j)").unwrap(), Complex64::new(3.0, 4.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Complex64::parse_text("one plus three").unwrap_err();
        assert!(err.to_string().contains("one plus three"));
    }
}
