//! The accumulator every validation pass produces.

use std::collections::VecDeque;

use mythic_tree::Range;
use serde::Serialize;

use crate::{
    CompletionProposal, Diagnostic, Highlight, Registry, SemanticTokenType, Severity,
};

/// Hover text for a range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Hover {
    pub range: Range,
    /// Markdown contents.
    pub contents: String,
}

/// A link from a usage to a declaration in some document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeLink {
    pub from: Range,
    pub target_uri: String,
    pub target_range: Range,
    pub target_selection_range: Range,
}

/// Everything a pass found out about a document.
///
/// Merging is a union of every field. Highlights are the exception: the
/// merged-in highlights go in front, so on overlap the most recently added
/// highlight is found first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub hovers: Vec<Hover>,
    pub range_links: Vec<RangeLink>,
    pub highlights: VecDeque<Highlight>,
    pub completions: Vec<CompletionProposal>,
    pub components: Registry,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagnostic(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
            ..Self::default()
        }
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn push_hover(&mut self, range: Range, contents: impl Into<String>) {
        self.hovers.push(Hover {
            range,
            contents: contents.into(),
        });
    }

    pub fn push_link(&mut self, link: RangeLink) {
        self.range_links.push(link);
    }

    /// Add a highlight that takes precedence over every existing one.
    pub fn highlight(&mut self, range: Range, token_type: SemanticTokenType) {
        self.highlights.push_front(Highlight::new(range, token_type));
    }

    pub fn push_highlight(&mut self, highlight: Highlight) {
        self.highlights.push_front(highlight);
    }

    pub fn push_completion(&mut self, proposal: CompletionProposal) {
        self.completions.push(proposal);
    }

    /// Merge `other` into `self`.
    pub fn merge(&mut self, other: ValidationResult) {
        let ValidationResult {
            diagnostics,
            hovers,
            range_links,
            highlights,
            completions,
            components,
        } = other;
        self.diagnostics.extend(diagnostics);
        self.hovers.extend(hovers);
        self.range_links.extend(range_links);
        for highlight in highlights.into_iter().rev() {
            self.highlights.push_front(highlight);
        }
        self.completions.extend(completions);
        self.components.merge(components);
    }

    /// Combine two results without touching either input's caller.
    pub fn merged(mut self, other: ValidationResult) -> ValidationResult {
        self.merge(other);
        self
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// True when no error-severity diagnostic was produced.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// The highlight that wins at the start of `range`, if any.
    pub fn highlight_at(&self, range: Range) -> Option<&Highlight> {
        self.highlights
            .iter()
            .find(|h| h.range.contains(range.start) && h.range.contains(range.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticCode;
    use mythic_tree::Position;

    fn range(c1: u32, c2: u32) -> Range {
        Range::new(Position::new(0, c1), Position::new(0, c2))
    }

    #[test]
    fn test_merge_prepends_highlights_in_order() {
        let mut a = ValidationResult::new();
        a.highlight(range(0, 10), SemanticTokenType::String);

        let mut b = ValidationResult::new();
        b.highlight(range(0, 2), SemanticTokenType::Number);
        b.highlight(range(0, 4), SemanticTokenType::Function);

        a.merge(b);
        let types: Vec<_> = a.highlights.iter().map(|h| h.token_type).collect();
        assert_eq!(
            types,
            [
                SemanticTokenType::Function,
                SemanticTokenType::Number,
                SemanticTokenType::String
            ]
        );
        assert_eq!(
            a.highlight_at(range(1, 2)).map(|h| h.token_type),
            Some(SemanticTokenType::Function)
        );
    }

    #[test]
    fn test_merge_unions_diagnostics() {
        let d1 = Diagnostic::new(DiagnosticCode::YamlSyntax, range(0, 1), "a");
        let d2 = Diagnostic::new(DiagnosticCode::CooldownTick, range(1, 2), "b");
        let merged = ValidationResult::with_diagnostic(d1.clone())
            .merged(ValidationResult::with_diagnostic(d2.clone()));
        assert_eq!(merged.diagnostics, vec![d1, d2]);
        assert!(!merged.is_valid());
        assert_eq!(merged.errors().count(), 1);
    }

    #[test]
    fn test_warnings_keep_result_valid() {
        let d = Diagnostic::new(DiagnosticCode::CooldownTick, range(0, 1), "tick");
        assert!(ValidationResult::with_diagnostic(d).is_valid());
    }
}
