use super::LineToken;
use crate::{Context, SemanticTokenType, ValidationResult};

/// A `~onEvent` or `~onEvent:argument` component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTrigger {
    pub tilde: LineToken,
    pub name: Option<LineToken>,
    pub colon: Option<LineToken>,
    pub argument: Option<LineToken>,
}

impl SkillTrigger {
    /// Parse an escaped component starting with `~`.
    pub fn parse(escaped: &str, base: u32) -> Self {
        let tilde = LineToken::new(escaped, 0, 1, base);
        let non_empty = |start: usize, end: usize| {
            (start < end).then(|| LineToken::new(escaped, start, end, base))
        };
        match escaped[1..].find(':').map(|colon| colon + 1) {
            Some(colon) => Self {
                tilde,
                name: non_empty(1, colon),
                colon: Some(LineToken::new(escaped, colon, colon + 1, base)),
                argument: non_empty(colon + 1, escaped.len()),
            },
            None => Self {
                tilde,
                name: non_empty(1, escaped.len()),
                colon: None,
                argument: None,
            },
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.text.as_str())
    }

    pub fn report(&self, cx: &Context<'_>, result: &mut ValidationResult) {
        result.highlight(cx.range(self.tilde.span), SemanticTokenType::Operator);
        if let Some(name) = &self.name {
            result.highlight(cx.range(name.span), SemanticTokenType::Event);
        }
        if let Some(colon) = &self.colon {
            result.highlight(cx.range(colon.span), SemanticTokenType::Operator);
        }
        if let Some(argument) = &self.argument {
            result.highlight(cx.range(argument.span), SemanticTokenType::String);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mythic_tree::Span;

    #[test]
    fn test_plain_trigger() {
        let trigger = SkillTrigger::parse("~onAttack", 0);
        assert_eq!(trigger.name(), Some("onAttack"));
        assert!(trigger.colon.is_none());
        assert_eq!(trigger.name.unwrap().span, Span::new(1, 9));
    }

    #[test]
    fn test_trigger_argument() {
        let trigger = SkillTrigger::parse("~onTimer:20", 4);
        assert_eq!(trigger.name(), Some("onTimer"));
        assert_eq!(trigger.colon.as_ref().unwrap().span, Span::new(12, 13));
        let argument = trigger.argument.unwrap();
        assert_eq!(argument.text, "20");
        assert_eq!(argument.span, Span::new(13, 15));
    }
}
