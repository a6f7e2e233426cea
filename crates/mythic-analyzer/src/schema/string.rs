use mythic_tree::Node;
use regex::Regex;

use super::Schema;
use crate::suggest::{MAX_DISTANCE, closest, did_you_mean};
use crate::{
    CompletionItem, CompletionItemKind, CompletionProposal, Context, Diagnostic, DiagnosticCode,
    Resolvable, SemanticTokenType, ValidationResult,
};

/// What a string value must look like.
#[derive(Debug, Clone)]
pub enum StringMatcher {
    Regex(Regex),
    Literal(String),
    /// One of a known set of values.
    Enum(Vec<EnumMember>),
}

/// A member of an enumerated string set.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub value: String,
    /// Completion item offered for this member; a plain enum-member item
    /// is used when absent.
    pub completion: Option<CompletionItem>,
}

impl EnumMember {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            completion: None,
        }
    }

    pub fn with_completion(mut self, completion: CompletionItem) -> Self {
        self.completion = Some(completion);
        self
    }

    fn completion_item(&self) -> CompletionItem {
        self.completion
            .clone()
            .unwrap_or_else(|| CompletionItem::new(&self.value, CompletionItemKind::EnumMember))
    }
}

/// A scalar matched by its text.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    matcher: Option<Resolvable<StringMatcher>>,
    case_sensitive: Resolvable<bool>,
    highlight: Option<SemanticTokenType>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regex(regex: Regex) -> Self {
        Self::new().matcher(StringMatcher::Regex(regex))
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::new().matcher(StringMatcher::Literal(value.into()))
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().matcher(StringMatcher::Enum(
            values.into_iter().map(EnumMember::new).collect(),
        ))
    }

    /// An enumeration computed per node, e.g. from the workspace.
    pub fn enumeration_with<F>(f: F) -> Self
    where
        F: Fn(&Context<'_>, &Node) -> Vec<EnumMember> + Send + Sync + 'static,
    {
        Self {
            matcher: Some(Resolvable::from_fn(move |cx, node| {
                StringMatcher::Enum(f(cx, node))
            })),
            ..Self::default()
        }
    }

    pub fn matcher(mut self, matcher: StringMatcher) -> Self {
        self.matcher = Some(matcher.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive.into();
        self
    }

    /// Highlight matching values with `token_type`.
    pub fn highlight(mut self, token_type: SemanticTokenType) -> Self {
        self.highlight = Some(token_type);
        self
    }

    pub(super) fn partial(&self, schema: &Schema, cx: &Context<'_>, node: &Node) -> ValidationResult {
        let Some(scalar) = node.as_scalar().filter(|s| !s.is_null()) else {
            return ValidationResult::with_diagnostic(schema.type_mismatch(cx, node));
        };
        let text = scalar.text.as_str();
        let range = cx.range(scalar.span);

        if let Some(matcher) = &self.matcher {
            let matcher = matcher.resolve(cx, node);
            let case_sensitive = self.case_sensitive.resolve(cx, node);
            let eq = |a: &str| {
                if case_sensitive {
                    a == text
                } else {
                    a.eq_ignore_ascii_case(text)
                }
            };
            let (matched, suggestion) = match &matcher {
                StringMatcher::Regex(regex) => (regex.is_match(text), None),
                StringMatcher::Literal(literal) => (eq(literal), Some(literal.as_str())),
                StringMatcher::Enum(members) => (
                    members.iter().any(|m| eq(&m.value)),
                    closest(text, members.iter().map(|m| m.value.as_str()), MAX_DISTANCE),
                ),
            };
            if !matched {
                return ValidationResult::with_diagnostic(Diagnostic::new(
                    DiagnosticCode::YamlInvalidValue,
                    range,
                    format!(
                        "Expected {}, but got `{text}`.{}",
                        schema.display_name(cx, node),
                        did_you_mean(suggestion)
                    ),
                ));
            }
        }

        let mut result = ValidationResult::new();
        if let Some(token_type) = self.highlight {
            result.highlight(range, token_type);
        }
        result
    }

    pub(super) fn full(&self, cx: &Context<'_>, node: &Node) -> ValidationResult {
        let mut result = ValidationResult::new();
        let (Some(matcher), Some(scalar)) = (&self.matcher, node.as_scalar()) else {
            return result;
        };
        if let StringMatcher::Enum(members) = matcher.resolve(cx, node) {
            result.push_completion(CompletionProposal::new(
                cx.range(scalar.span),
                members.iter().map(EnumMember::completion_item).collect(),
            ));
        }
        result
    }

    pub(super) fn render(&self, cx: &Context<'_>, node: &Node) -> String {
        let Some(matcher) = &self.matcher else {
            return "string".to_string();
        };
        match matcher.resolve(cx, node) {
            StringMatcher::Regex(regex) => format!("string(/{}/)", regex.as_str()),
            StringMatcher::Literal(literal) => format!("\"{literal}\""),
            StringMatcher::Enum(_) => "string(...)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn run(schema: StringSchema, source: &str) -> ValidationResult {
        let fixture = Fixture::new(source);
        Schema::from(schema).partial_process(&fixture.cx(), fixture.root())
    }

    #[test]
    fn test_any_scalar_without_matcher() {
        assert!(run(StringSchema::new(), "hello").diagnostics.is_empty());
        assert!(run(StringSchema::new(), "12").diagnostics.is_empty());
        let result = run(StringSchema::new(), "~");
        assert_eq!(result.diagnostics[0].message, "Expected type `string`, but got null.");
    }

    #[test]
    fn test_enum_is_case_insensitive_by_default() {
        let schema = StringSchema::enumeration(["ZOMBIE", "SKELETON"]);
        assert!(run(schema.clone(), "zombie").diagnostics.is_empty());
        let result = run(schema.case_sensitive(true), "zombie");
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_enum_suggestion() {
        let result = run(StringSchema::enumeration(["ZOMBIE", "SKELETON"]), "ZOMBE");
        assert_eq!(
            result.diagnostics[0].message,
            "Expected string(...), but got `ZOMBE`. Did you mean `ZOMBIE`?"
        );
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::YamlInvalidValue);
    }

    #[test]
    fn test_regex_and_literal() {
        let hex = StringSchema::regex(Regex::new("^#[0-9a-f]{6}$").unwrap());
        assert!(run(hex.clone(), "'#a0b1c2'").diagnostics.is_empty());
        assert_eq!(
            run(hex, "red").diagnostics[0].message,
            "Expected string(/^#[0-9a-f]{6}$/), but got `red`."
        );
        assert_eq!(
            run(StringSchema::literal("yes"), "no").diagnostics[0].message,
            "Expected \"yes\", but got `no`."
        );
    }

    #[test]
    fn test_highlight_on_match_only() {
        let schema = StringSchema::enumeration(["A"]).highlight(SemanticTokenType::EnumMember);
        assert_eq!(run(schema.clone(), "a").highlights.len(), 1);
        assert!(run(schema, "b").highlights.is_empty());
    }

    #[test]
    fn test_full_offers_members() {
        let fixture = Fixture::new("zo");
        let schema = Schema::from(StringSchema::enumeration(["ZOMBIE", "SKELETON"]));
        let result = schema.full_process(&fixture.cx(), fixture.root());
        let labels: Vec<_> = result.completions[0]
            .items
            .iter()
            .map(|i| i.label.as_str())
            .collect();
        assert_eq!(labels, ["ZOMBIE", "SKELETON"]);
    }
}
