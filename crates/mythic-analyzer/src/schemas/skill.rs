//! Metaskill files.

use mythic_tree::Node;
use rust_decimal::Decimal;

use super::{component_reference, documentation, skill_list};
use crate::schema::{ListSchema, MapSchema, NumberSchema, ObjectSchema, Property, StringSchema};
use crate::{
    ComponentKind, Context, Diagnostic, DiagnosticCode, Schema, ValidationResult, component,
};

pub fn metaskill() -> Schema {
    let conditions = || Schema::from(ListSchema::of(StringSchema::new()));
    let config = ObjectSchema::new([
        (
            "CancelIfNoTargets",
            Property::new(Schema::bool())
                .description("Whether to cancel the skill if there are no targets."),
        ),
        (
            "OnCooldownSkill",
            Property::new(component_reference(ComponentKind::Skill))
                .description("A skill to run instead if the skill is on cooldown."),
        ),
        (
            "Cooldown",
            Property::new(Schema::from(NumberSchema::new().min(0.0)).on_partial_process(tick_aligned))
                .description("The cooldown of this skill in seconds."),
        ),
        (
            "Skills",
            Property::new(skill_list(false))
                .required()
                .description("The skills that this skill will use."),
        ),
        (
            "Conditions",
            Property::new(conditions())
                .description("The conditions that this skill will check on the **caster**."),
        ),
        (
            "TargetConditions",
            Property::new(conditions())
                .description("The conditions that this skill will check on the **target**."),
        ),
        (
            "TriggerConditions",
            Property::new(conditions())
                .description("The conditions that this skill will check on the **trigger**."),
        ),
    ]);

    Schema::from(
        MapSchema::of(Schema::from(config).named("mythic_skill_config")).describe_keys(documentation),
    )
    .on_partial_process_hook(component(ComponentKind::Skill))
}

/// Warn when a duration is not a whole number of ticks.
fn tick_aligned(cx: &Context<'_>, node: &Node, result: &mut ValidationResult) {
    let Some(scalar) = node.as_scalar() else {
        return;
    };
    let (Ok(value), Ok(tick)) = (
        scalar.text.parse::<Decimal>(),
        cx.data.tick_duration.to_string().parse::<Decimal>(),
    ) else {
        return;
    };
    if tick.is_zero() || (value % tick).is_zero() {
        return;
    }
    result.push_diagnostic(Diagnostic::new(
        DiagnosticCode::CooldownTick,
        cx.range(scalar.span),
        format!(
            "Cooldown should be divisible by {} (1 tick).",
            cx.data.tick_duration
        ),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use crate::{MythicData, Severity};

    fn run(source: &str) -> ValidationResult {
        let fixture = Fixture::new(source);
        metaskill().partial_process(&fixture.cx(), fixture.root())
    }

    #[test]
    fn test_valid_metaskill() {
        let result = run("## Heals the caster.\nheal1:\n  Cooldown: 1.25\n  Skills:\n  - heal{a=10} @Self\n");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let heal = result.components.get(ComponentKind::Skill, "heal1").unwrap();
        assert_eq!(heal.documentation.as_deref(), Some("Heals the caster."));
    }

    #[test]
    fn test_cooldown_must_be_tick_aligned() {
        let result = run("heal1:\n  Cooldown: 0.33\n  Skills: []\n");
        assert_eq!(result.diagnostics.len(), 1);
        let diagnostic = &result.diagnostics[0];
        assert_eq!(diagnostic.code, DiagnosticCode::CooldownTick);
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.message, "Cooldown should be divisible by 0.05 (1 tick).");
        assert!(result.is_valid());
    }

    #[test]
    fn test_cooldown_uses_configured_tick() {
        let data = MythicData {
            tick_duration: 0.5,
            ..MythicData::default()
        };
        let fixture = Fixture::new("heal1:\n  Cooldown: 0.25\n  Skills: []\n").with_data(data);
        let result = metaskill().partial_process(&fixture.cx(), fixture.root());
        assert_eq!(result.diagnostics[0].message, "Cooldown should be divisible by 0.5 (1 tick).");
    }

    #[test]
    fn test_missing_skills_and_triggers() {
        let result = run("heal1:\n  Cooldown: 1\nheal2:\n  Skills:\n  - heal ~onDamaged\n");
        let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            [DiagnosticCode::YamlMissingProperty, DiagnosticCode::SkillTriggersNotAllowed]
        );
        assert_eq!(result.diagnostics[0].message, "Missing required property Skills.");
    }

    #[test]
    fn test_key_hover_uses_documentation() {
        let result = run("## Heals.\nheal1:\n  Skills: []\n");
        let hover = result
            .hovers
            .iter()
            .find(|h| h.range.start.line == 1)
            .unwrap();
        insta::assert_snapshot!(hover.contents, @r"
        `heal1`: `mythic_skill_config`

        Heals.
        ");
    }
}
