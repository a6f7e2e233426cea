//! The inline mechanic syntax used in skill lists.
//!
//! A skill line is a space separated sequence of components:
//!
//! ```text
//! damage{amount=5;ignoreArmor=true} @Target ~onAttack ?health{h=<50%} 0.5
//! ```
//!
//! Each component that can carry a `{...}` block is parsed into a
//! [`LineConfig`]. Quoted text inside a block is escaped first (see
//! [`escape`]) so that splitting on separators never looks inside strings;
//! every token span is translated back to source offsets.

use mythic_tree::Span;
use tracing::trace;

use crate::{Context, Diagnostic, DiagnosticCode, SemanticTokenType, ValidationResult};

pub mod escape;
mod condition;
mod skill;
mod targeter;
mod trigger;

pub use condition::SkillCondition;
pub use escape::{escape, source_len, unescape};
pub use skill::{SKILL_MECHANICS, SkillLine};
pub use targeter::SkillTargeter;
pub use trigger::SkillTrigger;

/// A piece of a skill line with its source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineToken {
    /// Unescaped text.
    pub text: String,
    pub span: Span,
}

impl LineToken {
    /// Token for `escaped[start..end]`, where `base` is the source offset
    /// of `escaped[0]`.
    pub(crate) fn new(escaped: &str, start: usize, end: usize, base: u32) -> Self {
        Self {
            text: unescape(&escaped[start..end]),
            span: Span::new(
                base + source_len(escaped, start),
                base + source_len(escaped, end),
            ),
        }
    }

    /// Like [`LineToken::new`] with surrounding whitespace dropped. `None`
    /// when nothing is left.
    pub(crate) fn trimmed(escaped: &str, start: usize, end: usize, base: u32) -> Option<Self> {
        let slice = &escaped[start..end];
        let lead = slice.len() - slice.trim_start().len();
        let trail = slice.len() - slice.trim_end().len();
        if lead == slice.len() {
            return None;
        }
        Some(Self::new(escaped, start + lead, end - trail, base))
    }
}

/// One `key=value` entry of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue {
    pub key: LineToken,
    pub equals: LineToken,
    pub value: LineToken,
    pub semicolon: Option<LineToken>,
}

/// A syntax problem found while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub code: DiagnosticCode,
    pub span: Span,
    pub message: String,
}

impl LineError {
    pub fn new(code: DiagnosticCode, span: Span, message: impl Into<String>) -> Self {
        Self {
            code,
            span,
            message: message.into(),
        }
    }

    pub fn to_diagnostic(&self, cx: &Context<'_>) -> Diagnostic {
        Diagnostic::new(self.code, cx.range(self.span), self.message.clone())
    }
}

/// A name with an optional `{...}` or `[...]` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineConfig {
    /// The name before the block.
    pub main: Option<LineToken>,
    pub open_brace: Option<LineToken>,
    pub close_brace: Option<LineToken>,
    /// Entries of a `{...}` block, in order. Duplicates are kept.
    pub values: Vec<ConfigValue>,
    /// Interior of a `[...]` block.
    pub block: Option<LineToken>,
    pub errors: Vec<LineError>,
    pub span: Span,
}

impl LineConfig {
    /// Parse one escaped component whose first byte sits at source offset
    /// `base`.
    pub fn parse(escaped: &str, base: u32) -> Self {
        let text = escape::restore_block_separators(escaped);
        let text = text.as_str();
        let mut config = LineConfig {
            span: Span::new(base, base + source_len(text, text.len())),
            ..LineConfig::default()
        };

        if let Some(open) = text.find('{') {
            config.main = LineToken::trimmed(text, 0, open, base);
            config.open_brace = Some(LineToken::new(text, open, open + 1, base));
            let depth: i32 = text[open..]
                .chars()
                .map(|c| match c {
                    '{' => 1,
                    '}' => -1,
                    _ => 0,
                })
                .sum();
            if depth != 0 {
                config.errors.push(LineError::new(
                    DiagnosticCode::LineConfigMismatchedBraces,
                    Span::new(base + source_len(text, open), config.span.end),
                    "Mismatched braces!",
                ));
            }
            let close = text.rfind('}').filter(|&close| close > open);
            if let Some(close) = close {
                config.close_brace = Some(LineToken::new(text, close, close + 1, base));
            }
            config.parse_entries(text, open + 1, close.unwrap_or(text.len()), base);
        } else if text.contains('[') || text.contains(']') {
            match (text.find('['), text.rfind(']')) {
                (Some(open), Some(close))
                    if open < close
                        && text.matches('[').count() == 1
                        && text.matches(']').count() == 1 =>
                {
                    config.main = LineToken::trimmed(text, 0, open, base);
                    config.open_brace = Some(LineToken::new(text, open, open + 1, base));
                    config.close_brace = Some(LineToken::new(text, close, close + 1, base));
                    config.block = LineToken::trimmed(text, open + 1, close, base);
                }
                _ => config.errors.push(LineError::new(
                    DiagnosticCode::LineConfigInvalidBlockSyntax,
                    config.span,
                    "Invalid block syntax!",
                )),
            }
        } else {
            config.main = LineToken::trimmed(text, 0, text.len(), base);
        }

        trace!(
            main = config.main.as_ref().map(|m| m.text.as_str()),
            values = config.values.len(),
            errors = config.errors.len(),
            "parsed line config"
        );
        config
    }

    /// Split `text[start..end]` on `;` outside nested blocks.
    fn parse_entries(&mut self, text: &str, start: usize, end: usize, base: u32) {
        let mut depth = 0i32;
        let mut entry_start = start;
        for (i, c) in text[start..end].char_indices() {
            let i = start + i;
            match c {
                '{' | '[' => depth += 1,
                '}' | ']' => depth -= 1,
                ';' if depth == 0 => {
                    self.push_entry(text, entry_start, i, Some(i), base);
                    entry_start = i + 1;
                }
                _ => {}
            }
        }
        self.push_entry(text, entry_start, end, None, base);
    }

    fn push_entry(
        &mut self,
        text: &str,
        start: usize,
        end: usize,
        semicolon: Option<usize>,
        base: u32,
    ) {
        let Some(entry) = LineToken::trimmed(text, start, end, base) else {
            return;
        };
        let split = text[start..end]
            .find('=')
            .map(|eq| start + eq)
            .and_then(|eq| Some((eq, LineToken::trimmed(text, start, eq, base)?)));
        let Some((eq, key)) = split else {
            self.errors.push(LineError::new(
                DiagnosticCode::LineConfigExpectedEquals,
                entry.span,
                format!("Expected `key=value`, but got `{}`.", entry.text),
            ));
            return;
        };

        let value = LineToken::trimmed(text, eq + 1, end, base).unwrap_or_else(|| LineToken {
            text: String::new(),
            span: Span::empty(base + source_len(text, eq + 1)),
        });

        if self.get(&[key.text.as_str()]).is_some() {
            self.errors.push(LineError::new(
                DiagnosticCode::LineConfigDuplicateKey,
                key.span,
                format!("Duplicate key: {}", key.text.to_lowercase()),
            ));
        }

        self.values.push(ConfigValue {
            key,
            equals: LineToken::new(text, eq, eq + 1, base),
            value,
            semicolon: semicolon.map(|i| LineToken::new(text, i, i + 1, base)),
        });
    }

    /// The first entry whose key matches any of `keys`, ignoring case.
    pub fn get(&self, keys: &[&str]) -> Option<&ConfigValue> {
        self.values
            .iter()
            .find(|v| keys.iter().any(|k| v.key.text.eq_ignore_ascii_case(k)))
    }

    pub fn name(&self) -> Option<&str> {
        self.main.as_ref().map(|m| m.text.as_str())
    }

    /// Report errors and highlights, highlighting the name as `main`.
    pub fn report(
        &self,
        cx: &Context<'_>,
        main: Option<SemanticTokenType>,
        result: &mut ValidationResult,
    ) {
        for error in &self.errors {
            result.push_diagnostic(error.to_diagnostic(cx));
        }
        if let (Some(token), Some(token_type)) = (&self.main, main) {
            result.highlight(cx.range(token.span), token_type);
        }
        for brace in self.open_brace.iter().chain(&self.close_brace) {
            result.highlight(cx.range(brace.span), SemanticTokenType::Operator);
        }
        if let Some(block) = &self.block {
            result.highlight(cx.range(block.span), SemanticTokenType::String);
        }
        for entry in &self.values {
            result.highlight(cx.range(entry.key.span), SemanticTokenType::Property);
            result.highlight(cx.range(entry.equals.span), SemanticTokenType::Operator);
            let value_type = if entry.value.text.parse::<f64>().is_ok() {
                SemanticTokenType::Number
            } else {
                SemanticTokenType::String
            };
            if !entry.value.span.is_empty() {
                result.highlight(cx.range(entry.value.span), value_type);
            }
            if let Some(semicolon) = &entry.semicolon {
                result.highlight(cx.range(semicolon.span), SemanticTokenType::Operator);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> LineConfig {
        LineConfig::parse(&escape(text), 0)
    }

    fn codes(config: &LineConfig) -> Vec<DiagnosticCode> {
        config.errors.iter().map(|e| e.code).collect()
    }

    #[test]
    fn test_bare_name() {
        let config = parse("damage");
        assert_eq!(config.name(), Some("damage"));
        assert!(config.values.is_empty());
        assert!(config.errors.is_empty());
    }

    #[test]
    fn test_block_entries() {
        let config = parse("damage{amount=5;ignoreArmor=true}");
        assert_eq!(config.name(), Some("damage"));
        let entries: Vec<_> = config
            .values
            .iter()
            .map(|v| (v.key.text.as_str(), v.value.text.as_str()))
            .collect();
        assert_eq!(entries, [("amount", "5"), ("ignoreArmor", "true")]);
        assert_eq!(config.values[0].value.span, Span::new(14, 15));
        assert!(config.values[0].semicolon.is_some());
        assert!(config.values[1].semicolon.is_none());
        assert_eq!(config.close_brace.as_ref().unwrap().span, Span::new(32, 33));
    }

    #[test]
    fn test_unterminated_block() {
        let config = parse("damage{amount=5");
        assert_eq!(codes(&config), [DiagnosticCode::LineConfigMismatchedBraces]);
        assert_eq!(config.errors[0].span, Span::new(6, 15));
        assert_eq!(config.get(&["amount"]).unwrap().value.text, "5");
    }

    #[test]
    fn test_quoted_values_keep_source_offsets() {
        let text = "message{m=\"a; b=c\";x = 1}";
        let config = parse(text);
        assert!(config.errors.is_empty());
        let m = config.get(&["m"]).unwrap();
        assert_eq!(m.value.text, "\"a; b=c\"");
        assert_eq!(m.value.span.slice(text), "\"a; b=c\"");
        let x = config.get(&["X"]).unwrap();
        assert_eq!(x.key.span.slice(text), "x");
        assert_eq!(x.value.span.slice(text), "1");
    }

    #[test]
    fn test_nested_blocks_stay_in_one_entry() {
        let config = parse("skill{s=[ - damage{a=1;b=2} ];sync=true}");
        assert!(config.errors.is_empty());
        assert_eq!(config.values.len(), 2);
        assert_eq!(config.values[0].value.text, "[ - damage{a=1;b=2} ]");
    }

    #[test]
    fn test_duplicate_key() {
        let config = parse("damage{a=1;A=2}");
        assert_eq!(codes(&config), [DiagnosticCode::LineConfigDuplicateKey]);
        assert_eq!(config.errors[0].message, "Duplicate key: a");
        assert_eq!(config.errors[0].span, Span::new(11, 12));
    }

    #[test]
    fn test_missing_equals() {
        let config = parse("damage{amount}");
        assert_eq!(codes(&config), [DiagnosticCode::LineConfigExpectedEquals]);
        assert_eq!(config.errors[0].message, "Expected `key=value`, but got `amount`.");
    }

    #[test]
    fn test_bracket_block() {
        let config = parse("cond[a b]");
        assert!(config.errors.is_empty());
        assert_eq!(config.name(), Some("cond"));
        assert_eq!(config.block.as_ref().unwrap().text, "a b");

        let config = parse("cond]a[");
        assert_eq!(codes(&config), [DiagnosticCode::LineConfigInvalidBlockSyntax]);
    }

    #[test]
    fn test_offsets_with_base() {
        let config = LineConfig::parse("heal{a=1}", 10);
        assert_eq!(config.main.unwrap().span, Span::new(10, 14));
        assert_eq!(config.span, Span::new(10, 19));
    }
}
