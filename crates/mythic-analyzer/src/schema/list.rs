use mythic_tree::Node;

use super::Schema;
use crate::{Context, Diagnostic, DiagnosticCode, Resolvable, ValidationResult};

#[derive(Debug, Clone)]
pub enum ListItems {
    /// Every item has the same schema.
    Each(Schema),
    /// One schema per position.
    Tuple(Vec<Schema>),
}

/// A sequence of values.
#[derive(Debug, Clone)]
pub struct ListSchema {
    items: ListItems,
    unique: Resolvable<bool>,
}

impl ListSchema {
    pub fn of(items: impl Into<Schema>) -> Self {
        Self {
            items: ListItems::Each(items.into()),
            unique: false.into(),
        }
    }

    pub fn tuple(items: Vec<Schema>) -> Self {
        Self {
            items: ListItems::Tuple(items),
            unique: false.into(),
        }
    }

    /// Reject structurally equal items. Nulls never count as duplicates.
    pub fn unique(mut self) -> Self {
        self.unique = true.into();
        self
    }

    pub fn items(&self) -> &ListItems {
        &self.items
    }

    pub(super) fn partial(&self, schema: &Schema, cx: &Context<'_>, node: &Node) -> ValidationResult {
        let Some(seq) = node.as_sequence() else {
            return ValidationResult::with_diagnostic(schema.type_mismatch(cx, node));
        };
        let mut result = ValidationResult::new();

        match &self.items {
            ListItems::Each(item_schema) => {
                for item in &seq.items {
                    result.merge(item_schema.partial_process(cx, item));
                }
            }
            ListItems::Tuple(schemas) => {
                let (expected, got) = (schemas.len(), seq.len());
                if got != expected {
                    let (code, which) = if got > expected {
                        (DiagnosticCode::YamlTooManyItems, "many")
                    } else {
                        (DiagnosticCode::YamlTooFewItems, "few")
                    };
                    result.push_diagnostic(Diagnostic::new(
                        code,
                        cx.range(seq.span),
                        format!("Too {which} items in list. Expected {expected}, but got {got}."),
                    ));
                }
                for (item_schema, item) in schemas.iter().zip(&seq.items) {
                    result.merge(item_schema.partial_process(cx, item));
                }
            }
        }

        if self.unique.resolve(cx, node) {
            let values: Vec<_> = seq.items.iter().map(Node::to_json).collect();
            for (j, value) in values.iter().enumerate() {
                if value.is_null() {
                    continue;
                }
                if values[..j].contains(value) {
                    result.push_diagnostic(Diagnostic::new(
                        DiagnosticCode::YamlDuplicateItem,
                        cx.range(seq.items[j].span()),
                        format!("Duplicate item in list: `{}`.", cx.slice(seq.items[j].span())),
                    ));
                }
            }
        }

        result
    }

    pub(super) fn full(&self, cx: &Context<'_>, node: &Node) -> ValidationResult {
        let mut result = ValidationResult::new();
        let Some(seq) = node.as_sequence() else {
            return result;
        };
        match &self.items {
            ListItems::Each(item_schema) => {
                for item in &seq.items {
                    result.merge(item_schema.full_process(cx, item));
                }
            }
            ListItems::Tuple(schemas) => {
                for (item_schema, item) in schemas.iter().zip(&seq.items) {
                    result.merge(item_schema.full_process(cx, item));
                }
            }
        }
        result
    }

    pub(super) fn render(&self, cx: &Context<'_>, node: &Node) -> String {
        match &self.items {
            ListItems::Each(item_schema) => {
                let item = node
                    .as_sequence()
                    .and_then(|seq| seq.items.first())
                    .unwrap_or(node);
                format!("list({})", item_schema.display_name(cx, item))
            }
            ListItems::Tuple(schemas) => {
                let names: Vec<_> = schemas.iter().map(|s| s.display_name(cx, node)).collect();
                format!("[{}]", names.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NumberSchema, StringSchema};
    use crate::testing::Fixture;

    fn run(schema: ListSchema, source: &str) -> ValidationResult {
        let fixture = Fixture::new(source);
        Schema::from(schema).partial_process(&fixture.cx(), fixture.root())
    }

    #[test]
    fn test_each_item_validated() {
        let result = run(ListSchema::of(NumberSchema::new()), "[1, x, 3]");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].message, "Expected type `number`, but got string.");
    }

    #[test]
    fn test_duplicates_flag_later_occurrences() {
        let fixture = Fixture::new("- a\n- b\n- a\n");
        let schema = Schema::from(ListSchema::of(StringSchema::new()).unique());
        let result = schema.partial_process(&fixture.cx(), fixture.root());
        assert_eq!(result.diagnostics.len(), 1);
        let diagnostic = &result.diagnostics[0];
        assert_eq!(diagnostic.code, DiagnosticCode::YamlDuplicateItem);
        assert_eq!(diagnostic.range.start.line, 2);
    }

    #[test]
    fn test_nulls_are_not_duplicates() {
        assert!(run(ListSchema::of(Schema::any()).unique(), "[~, ~, 1]").diagnostics.is_empty());
    }

    #[test]
    fn test_tuple_length() {
        let pair = || ListSchema::tuple(vec![NumberSchema::new().into(), StringSchema::new().into()]);
        let too_many = run(pair(), "[1, a, b]");
        assert_eq!(too_many.diagnostics[0].message, "Too many items in list. Expected 2, but got 3.");
        let too_few = run(pair(), "[x]");
        let codes: Vec<_> = too_few.diagnostics.iter().map(|d| d.code).collect();
        // The length error and the mistyped first item are both reported.
        assert_eq!(codes, [DiagnosticCode::YamlTooFewItems, DiagnosticCode::YamlInvalidType]);
    }

    #[test]
    fn test_render() {
        let fixture = Fixture::new("[1]");
        let cx = fixture.cx();
        let render = |s: ListSchema| Schema::from(s).internal_name(&cx, fixture.root());
        insta::assert_snapshot!(render(ListSchema::of(StringSchema::new())), @"list(string)");
        insta::assert_snapshot!(
            render(ListSchema::tuple(vec![NumberSchema::new().into(), Schema::bool()])),
            @"[number, boolean]"
        );
    }
}
