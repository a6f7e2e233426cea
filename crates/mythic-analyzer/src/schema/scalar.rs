use mythic_tree::Node;

use super::Schema;
use crate::{Context, Diagnostic, DiagnosticCode, Resolvable, SemanticTokenType, ValidationResult};

/// One end of a numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// A numeric scalar, optionally bounded and integer-only.
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    min: Resolvable<Option<Bound>>,
    max: Resolvable<Option<Bound>>,
    integer: Resolvable<bool>,
}

impl NumberSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, value: f64) -> Self {
        self.min = Some(Bound::inclusive(value)).into();
        self
    }

    pub fn min_exclusive(mut self, value: f64) -> Self {
        self.min = Some(Bound::exclusive(value)).into();
        self
    }

    pub fn max(mut self, value: f64) -> Self {
        self.max = Some(Bound::inclusive(value)).into();
        self
    }

    pub fn max_exclusive(mut self, value: f64) -> Self {
        self.max = Some(Bound::exclusive(value)).into();
        self
    }

    /// Compute the upper bound per node.
    pub fn max_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context<'_>, &Node) -> Option<Bound> + Send + Sync + 'static,
    {
        self.max = Resolvable::from_fn(f);
        self
    }

    pub fn integer(mut self) -> Self {
        self.integer = true.into();
        self
    }

    pub(super) fn partial(&self, schema: &Schema, cx: &Context<'_>, node: &Node) -> ValidationResult {
        let Some((scalar, n)) = node.as_scalar().and_then(|s| Some((s, s.as_f64()?))) else {
            return ValidationResult::with_diagnostic(schema.type_mismatch(cx, node));
        };
        let range = cx.range(scalar.span);

        if let Some(min) = self.min.resolve(cx, node) {
            let ok = if min.inclusive { n >= min.value } else { n > min.value };
            if !ok {
                return ValidationResult::with_diagnostic(Diagnostic::new(
                    DiagnosticCode::YamlOutOfRange,
                    range,
                    format!(
                        "Expected value to be greater than {}{}, but got {n}.",
                        if min.inclusive { "or equal to " } else { "" },
                        min.value
                    ),
                ));
            }
        }

        if let Some(max) = self.max.resolve(cx, node) {
            let ok = if max.inclusive { n <= max.value } else { n < max.value };
            if !ok {
                return ValidationResult::with_diagnostic(Diagnostic::new(
                    DiagnosticCode::YamlOutOfRange,
                    range,
                    format!(
                        "Expected value to be less than {}{}, but got {n}.",
                        if max.inclusive { "or equal to " } else { "" },
                        max.value
                    ),
                ));
            }
        }

        if self.integer.resolve(cx, node) && n.fract() != 0.0 {
            return ValidationResult::with_diagnostic(Diagnostic::new(
                DiagnosticCode::YamlNotInteger,
                range,
                format!("Expected value to be an integer, but got {n}."),
            ));
        }

        let mut result = ValidationResult::new();
        result.highlight(range, SemanticTokenType::Number);
        result
    }

    pub(super) fn render(&self, cx: &Context<'_>, node: &Node) -> String {
        let mut out = if self.integer.resolve(cx, node) {
            "integer".to_string()
        } else {
            "number".to_string()
        };
        let min = self.min.resolve(cx, node);
        let max = self.max.resolve(cx, node);
        if min.is_none() && max.is_none() {
            return out;
        }
        out.push('(');
        if let Some(min) = min {
            out.push_str(&min.value.to_string());
            if !min.inclusive {
                out.push('<');
            }
        }
        out.push_str("..");
        if let Some(max) = max {
            if max.inclusive {
                out.push('=');
            }
            out.push_str(&max.value.to_string());
        }
        out.push(')');
        out
    }
}
