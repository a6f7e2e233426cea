//! Completion proposals accumulated during full processing.

use mythic_tree::{Position, Range};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionItemKind {
    Property,
    EnumMember,
    Value,
    Reference,
    Function,
    Keyword,
}

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
}

impl CompletionItem {
    pub fn new(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            insert_text: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_insert_text(mut self, insert_text: impl Into<String>) -> Self {
        self.insert_text = Some(insert_text.into());
        self
    }
}

/// Decides whether a proposal still applies at a cursor position.
///
/// A guarded proposal applies only when the cursor is outside `exclude` and
/// nothing but an identifier being typed precedes it on its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct CompletionGuard {
    pub exclude: Option<Range>,
}

impl CompletionGuard {
    pub fn outside(range: Range) -> Self {
        Self {
            exclude: Some(range),
        }
    }

    pub fn allows(&self, pos: Position, line_prefix: &str) -> bool {
        if let Some(exclude) = self.exclude
            && exclude.contains(pos)
        {
            return false;
        }
        line_prefix
            .trim_end_matches(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.')
            .trim()
            .is_empty()
    }
}

/// A set of completion items offered over a range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CompletionProposal {
    pub range: Range,
    pub items: Vec<CompletionItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guard: Option<CompletionGuard>,
}

impl CompletionProposal {
    pub fn new(range: Range, items: Vec<CompletionItem>) -> Self {
        Self {
            range,
            items,
            guard: None,
        }
    }

    pub fn with_guard(mut self, guard: CompletionGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Whether this proposal should be offered at `pos`, given the text of
    /// the cursor's line up to `pos`.
    pub fn applies_at(&self, pos: Position, line_prefix: &str) -> bool {
        self.range.contains(pos)
            && self
                .guard
                .is_none_or(|guard| guard.allows(pos, line_prefix))
    }
}
