use mythic_tree::Span;
use tracing::trace;

use super::{
    LineConfig, LineError, LineToken, SkillCondition, SkillTargeter, SkillTrigger, escape,
    source_len,
};
use crate::{
    ComponentKind, Context, DiagnosticCode, MythicData, SemanticTokenType, ValidationResult,
    link_component,
};

/// Mechanics that run another skill by id.
pub const SKILL_MECHANICS: [&str; 4] = ["skill", "metaskill", "meta", "ms"];

/// Keys of [`SKILL_MECHANICS`] naming the skill to run.
const SKILL_KEYS: [&str; 4] = ["s", "skill", "meta", "m"];

/// One parsed entry of a skill list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillLine {
    pub mechanic: LineConfig,
    pub targeters: Vec<SkillTargeter>,
    pub triggers: Vec<SkillTrigger>,
    pub conditions: Vec<SkillCondition>,
    pub chance: Option<LineToken>,
    /// Leading numeric argument of a mechanic that takes one, e.g. the
    /// ticks of `delay 20`.
    pub positional: Option<LineToken>,
    pub errors: Vec<LineError>,
}

impl SkillLine {
    /// Parse `text`, whose first byte sits at source offset `base`.
    ///
    /// `triggers_allowed` is false where the surrounding list runs without
    /// an event, e.g. in a metaskill body.
    pub fn parse(text: &str, base: u32, triggers_allowed: bool, data: &MythicData) -> Self {
        let escaped = escape(text);
        let mut line = SkillLine::default();
        let mut offset = 0;

        for (i, component) in escaped.split(' ').enumerate() {
            let start = base + source_len(&escaped, offset);
            offset += component.len() + 1;
            if i == 0 {
                line.mechanic = LineConfig::parse(component, start);
                continue;
            }
            if component.is_empty() {
                continue;
            }
            let span = Span::new(start, start + source_len(component, component.len()));

            match component.as_bytes()[0] {
                b'@' => {
                    if !line.targeters.is_empty() {
                        line.error(
                            DiagnosticCode::SkillTooManyTargeters,
                            span,
                            "Only one targeter allowed per skill!",
                        );
                    }
                    line.targeters.push(SkillTargeter::parse(component, start));
                }
                b'~' => {
                    if !triggers_allowed {
                        line.error(
                            DiagnosticCode::SkillTriggersNotAllowed,
                            span,
                            "Triggers are not supported in this environment! (e.g. metaskills)",
                        );
                    } else if !line.triggers.is_empty() {
                        line.error(
                            DiagnosticCode::SkillTooManyTriggers,
                            span,
                            "Only one trigger allowed per skill!",
                        );
                    }
                    line.triggers.push(SkillTrigger::parse(component, start));
                }
                b'?' => line.conditions.push(SkillCondition::parse(component, start)),
                _ if is_numeric(component) => line.numeric(component, span, data),
                _ => trace!(component, "ignoring unrecognised skill component"),
            }
        }

        line.errors.extend(line.mechanic.errors.drain(..));
        for targeter in &mut line.targeters {
            line.errors.extend(targeter.config.errors.drain(..));
        }
        for condition in &mut line.conditions {
            line.errors.extend(condition.config.errors.drain(..));
        }
        line.errors.sort_by_key(|e| e.span.start);
        line
    }

    fn numeric(&mut self, component: &str, span: Span, data: &MythicData) {
        let token = LineToken {
            text: component.to_string(),
            span,
        };
        let positional = self
            .mechanic
            .name()
            .is_some_and(|name| data.takes_positional_argument(name));

        if positional && self.positional.is_none() && self.chance.is_none() {
            self.positional = Some(token);
            return;
        }
        if positional || self.chance.is_some() {
            self.error(
                DiagnosticCode::SkillTooManyChances,
                span,
                "Only one chance allowed per skill!",
            );
            return;
        }
        let value: f64 = component.parse().unwrap_or(f64::NAN);
        if !(0.0..=1.0).contains(&value) {
            self.error(
                DiagnosticCode::SkillInvalidChance,
                span,
                format!("Chance must be between 0 and 1, but got {component}."),
            );
        }
        self.chance = Some(token);
    }

    fn error(&mut self, code: DiagnosticCode, span: Span, message: impl Into<String>) {
        self.errors.push(LineError::new(code, span, message));
    }

    /// The id of the skill this line runs, for `skill{s=...}` and friends.
    pub fn skill_reference(&self) -> Option<&LineToken> {
        let name = self.mechanic.name()?;
        if !SKILL_MECHANICS.iter().any(|m| m.eq_ignore_ascii_case(name)) {
            return None;
        }
        let value = &self.mechanic.get(&SKILL_KEYS)?.value;
        (!value.text.is_empty()).then_some(value)
    }

    /// Diagnostics and highlights, independent of other documents.
    pub fn report(&self, cx: &Context<'_>, result: &mut ValidationResult) {
        for error in &self.errors {
            result.push_diagnostic(error.to_diagnostic(cx));
        }
        self.mechanic.report(cx, Some(SemanticTokenType::Function), result);
        for targeter in &self.targeters {
            targeter.report(cx, result);
        }
        for trigger in &self.triggers {
            trigger.report(cx, result);
        }
        for condition in &self.conditions {
            condition.report(cx, result);
        }
        for number in self.chance.iter().chain(&self.positional) {
            result.highlight(cx.range(number.span), SemanticTokenType::Number);
        }
    }

    /// Link skill references to their declarations.
    pub fn resolve_references(&self, cx: &Context<'_>, result: &mut ValidationResult) {
        let Some(reference) = self.skill_reference() else {
            return;
        };
        let id = reference.text.trim_matches(|c| c == '"' || c == '\'');
        if let Some(skill) = cx.registry.get(ComponentKind::Skill, id) {
            let range = cx.range(reference.span);
            link_component(skill, range, result);
            result.highlight(range, SemanticTokenType::Function);
        }
    }
}

/// `-?\d*\.?\d+`
fn is_numeric(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once('.') {
        Some((int, frac)) => digits(int) && !frac.is_empty() && digits(frac),
        None => !s.is_empty() && digits(s),
    }
}
