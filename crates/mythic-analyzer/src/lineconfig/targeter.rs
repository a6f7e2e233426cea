use super::{LineConfig, LineToken};
use crate::{Context, SemanticTokenType, ValidationResult};

/// An `@Targeter{...}` component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTargeter {
    pub at: LineToken,
    pub config: LineConfig,
}

impl SkillTargeter {
    /// Parse an escaped component starting with `@`.
    pub fn parse(escaped: &str, base: u32) -> Self {
        Self {
            at: LineToken::new(escaped, 0, 1, base),
            config: LineConfig::parse(&escaped[1..], base + 1),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.config.name()
    }

    pub fn report(&self, cx: &Context<'_>, result: &mut ValidationResult) {
        self.config.report(cx, Some(SemanticTokenType::Class), result);
        result.highlight(cx.range(self.at.span), SemanticTokenType::Operator);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineconfig::escape;
    use mythic_tree::Span;

    #[test]
    fn test_targeter() {
        let targeter = SkillTargeter::parse(&escape("@PIR{r=10}"), 7);
        assert_eq!(targeter.name(), Some("PIR"));
        assert_eq!(targeter.at.span, Span::new(7, 8));
        assert_eq!(targeter.config.main.as_ref().unwrap().span, Span::new(8, 11));
        assert_eq!(targeter.config.get(&["r"]).unwrap().value.text, "10");
    }
}
