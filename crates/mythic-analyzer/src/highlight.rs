//! Semantic highlight spans.

use mythic_tree::Range;
use serde::Serialize;

/// Semantic token types we emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
#[repr(u32)]
pub enum SemanticTokenType {
    Comment = 0,
    /// Scalar values without a more specific class
    String = 1,
    Number = 2,
    /// Condition names
    Keyword = 3,
    Type = 4,
    /// Targeter names
    Class = 5,
    /// Members of enumerated string sets
    EnumMember = 6,
    /// Object keys
    Property = 7,
    /// Braces, `=`, `;`, sigils
    Operator = 8,
    /// Mechanic names and component ids
    Function = 9,
    /// Trigger names
    Event = 10,
}

impl SemanticTokenType {
    /// Token types in legend order.
    pub const LEGEND: [SemanticTokenType; 11] = [
        SemanticTokenType::Comment,
        SemanticTokenType::String,
        SemanticTokenType::Number,
        SemanticTokenType::Keyword,
        SemanticTokenType::Type,
        SemanticTokenType::Class,
        SemanticTokenType::EnumMember,
        SemanticTokenType::Property,
        SemanticTokenType::Operator,
        SemanticTokenType::Function,
        SemanticTokenType::Event,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticTokenType::Comment => "comment",
            SemanticTokenType::String => "string",
            SemanticTokenType::Number => "number",
            SemanticTokenType::Keyword => "keyword",
            SemanticTokenType::Type => "type",
            SemanticTokenType::Class => "class",
            SemanticTokenType::EnumMember => "enumMember",
            SemanticTokenType::Property => "property",
            SemanticTokenType::Operator => "operator",
            SemanticTokenType::Function => "function",
            SemanticTokenType::Event => "event",
        }
    }

    /// Index of this type in [`SemanticTokenType::LEGEND`].
    pub fn index(self) -> u32 {
        self as u32
    }
}

/// Semantic token modifiers we emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TokenModifier {
    Declaration = 0,
    Documentation = 1,
    Deprecated = 2,
}

impl TokenModifier {
    pub const LEGEND: [TokenModifier; 3] = [
        TokenModifier::Declaration,
        TokenModifier::Documentation,
        TokenModifier::Deprecated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TokenModifier::Declaration => "declaration",
            TokenModifier::Documentation => "documentation",
            TokenModifier::Deprecated => "deprecated",
        }
    }

    /// Bit for this modifier in a highlight's modifier set.
    pub fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// A highlighted range of source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Highlight {
    pub range: Range,
    pub token_type: SemanticTokenType,
    /// Bitset of [`TokenModifier::bit`] values.
    pub modifiers: u32,
}

impl Highlight {
    pub fn new(range: Range, token_type: SemanticTokenType) -> Self {
        Self {
            range,
            token_type,
            modifiers: 0,
        }
    }

    pub fn with_modifier(mut self, modifier: TokenModifier) -> Self {
        self.modifiers |= modifier.bit();
        self
    }

    pub fn has_modifier(&self, modifier: TokenModifier) -> bool {
        self.modifiers & modifier.bit() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_order_matches_index() {
        for (i, ty) in SemanticTokenType::LEGEND.iter().enumerate() {
            assert_eq!(ty.index() as usize, i);
        }
    }

    #[test]
    fn test_modifiers() {
        let h = Highlight::new(Range::default(), SemanticTokenType::Function)
            .with_modifier(TokenModifier::Declaration)
            .with_modifier(TokenModifier::Documentation);
        assert_eq!(h.modifiers, 0b011);
        assert!(h.has_modifier(TokenModifier::Documentation));
        assert!(!h.has_modifier(TokenModifier::Deprecated));
    }
}
