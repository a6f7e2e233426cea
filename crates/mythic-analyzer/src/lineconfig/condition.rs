use super::{LineConfig, LineToken, source_len};
use crate::{Context, SemanticTokenType, ValidationResult};

/// A `?condition{...}` component, optionally `?~` (checked against the
/// trigger) and/or `?!` (negated).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCondition {
    pub question: LineToken,
    pub trigger: Option<LineToken>,
    pub negated: Option<LineToken>,
    pub config: LineConfig,
}

impl SkillCondition {
    /// Parse an escaped component starting with `?`.
    pub fn parse(escaped: &str, base: u32) -> Self {
        let question = LineToken::new(escaped, 0, 1, base);
        let mut rest = 1;
        let mut flag = |c: char| {
            escaped[rest..].starts_with(c).then(|| {
                rest += 1;
                LineToken::new(escaped, rest - 1, rest, base)
            })
        };
        let trigger = flag('~');
        let negated = flag('!');
        Self {
            question,
            trigger,
            negated,
            config: LineConfig::parse(&escaped[rest..], base + source_len(escaped, rest)),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.config.name()
    }

    pub fn is_negated(&self) -> bool {
        self.negated.is_some()
    }

    pub fn report(&self, cx: &Context<'_>, result: &mut ValidationResult) {
        self.config.report(cx, Some(SemanticTokenType::Keyword), result);
        for operator in [Some(&self.question), self.trigger.as_ref(), self.negated.as_ref()]
            .into_iter()
            .flatten()
        {
            result.highlight(cx.range(operator.span), SemanticTokenType::Operator);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineconfig::escape;
    use mythic_tree::Span;

    #[test]
    fn test_plain_condition() {
        let condition = SkillCondition::parse(&escape("?health{h=<50%}"), 0);
        assert_eq!(condition.name(), Some("health"));
        assert!(condition.trigger.is_none());
        assert!(!condition.is_negated());
        assert_eq!(condition.config.get(&["h"]).unwrap().value.text, "<50%");
    }

    #[test]
    fn test_trigger_and_negation() {
        let condition = SkillCondition::parse(&escape("?~!isPlayer"), 3);
        assert_eq!(condition.trigger.unwrap().span, Span::new(4, 5));
        assert_eq!(condition.negated.unwrap().span, Span::new(5, 6));
        assert_eq!(condition.config.main.unwrap().span, Span::new(6, 14));
    }

    #[test]
    fn test_negation_alone() {
        let condition = SkillCondition::parse("?!raining", 0);
        assert!(condition.trigger.is_none());
        assert!(condition.is_negated());
        assert_eq!(condition.name(), Some("raining"));
    }
}
