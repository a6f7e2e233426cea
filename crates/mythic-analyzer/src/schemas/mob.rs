//! Mob files.

use super::{component_reference, documentation, entity_type, excludable, skill_list};
use crate::schema::{
    Bound, EnumMember, ListSchema, MapSchema, NumberSchema, ObjectSchema, Property, StringSchema,
};
use crate::{ComponentKind, Schema, component};

fn strings() -> Schema {
    ListSchema::of(StringSchema::new()).into()
}

fn boss_bar() -> ObjectSchema {
    ObjectSchema::new([
        (
            "Enabled",
            Property::new(Schema::bool())
                .required()
                .description("Enables or disables the boss bar."),
        ),
        ("Title", Property::new(StringSchema::new()).description("The title of the boss bar.")),
        (
            "Range",
            Property::new(NumberSchema::new().min(0.0))
                .description("The range of the boss bar. Defaults to 64."),
        ),
        (
            "Color",
            Property::new(
                StringSchema::enumeration_with(|cx, _| {
                    cx.data.boss_bar_colors.iter().map(EnumMember::new).collect()
                })
                .case_sensitive(true),
            )
            .description("The color of the boss bar. This is case-sensitive."),
        ),
        (
            "Style",
            Property::new(
                StringSchema::enumeration_with(|cx, _| {
                    cx.data.boss_bar_styles.iter().map(EnumMember::new).collect()
                })
                .case_sensitive(true),
            )
            .description("The style of the boss bar. This is case-sensitive."),
        ),
        ("CreateFog", Property::new(Schema::bool())),
        ("DarkenSky", Property::new(Schema::bool())),
        ("PlayMusic", Property::new(Schema::bool())),
    ])
}

pub fn mob() -> Schema {
    let properties = vec![
        (
            "Template",
            Property::new(component_reference(ComponentKind::Mob))
                .description("The mob to inherit every setting from."),
        ),
        (
            "Type",
            Property::new(entity_type()).description("The base entity type of the mob."),
        ),
        ("Display", Property::new(StringSchema::new()).description("The display name of the mob.")),
        (
            "Health",
            Property::new(NumberSchema::new().min(0.0))
                .description("The base value of the mob's max health attribute."),
        ),
        (
            "Damage",
            Property::new(NumberSchema::new().min(0.0))
                .description("The base value of the mob's melee attack damage attribute."),
        ),
        (
            "Armor",
            Property::new(
                NumberSchema::new()
                    .min(0.0)
                    .max_with(|cx, _| Some(Bound::inclusive(cx.data.attribute_max_armor))),
            )
            .description("The base value of the mob's armor attribute."),
        ),
        (
            "HealthBar",
            Property::new(ObjectSchema::new([
                (
                    "Enabled",
                    Property::new(Schema::bool())
                        .required()
                        .description("Enables or disables the health bar hologram."),
                ),
                (
                    "Offset",
                    Property::new(NumberSchema::new())
                        .description("The vertical offset of the health bar hologram."),
                ),
            ]))
            .description("A basic health bar hologram."),
        ),
        (
            "BossBar",
            Property::new(boss_bar()).description("A configurable boss bar for the mob."),
        ),
        ("Faction", Property::new(StringSchema::new()).description("The mob's faction.")),
        (
            "Mount",
            Property::new(component_reference(ComponentKind::Mob))
                .description("Another mob this mob rides when it spawns."),
        ),
        (
            "Options",
            Property::new(MapSchema::of(Schema::any())).description("Mob options."),
        ),
        (
            "Modules",
            Property::new(ObjectSchema::new([
                (
                    "ThreatTables",
                    Property::new(Schema::bool()).aliases(["ThreatTable"]),
                ),
                ("ImmunityTables", Property::new(Schema::bool())),
            ]))
            .description("Enables or disables modules."),
        ),
        ("AIGoalSelectors", Property::new(strings())),
        ("AITargetSelectors", Property::new(strings())),
        ("Drops", Property::new(strings()).description("The mob's loot drops.")),
        ("DamageModifiers", Property::new(strings())),
        ("Equipment", Property::new(strings())),
        ("KillMessages", Property::new(strings())),
        (
            "LevelModifiers",
            Property::new(ObjectSchema::new(
                ["Health", "Damage", "KnockbackResistance", "Power", "Armor", "MovementSpeed"]
                    .map(|key| {
                        (
                            key,
                            Property::new(NumberSchema::new().min(0.0)).description(format!(
                                "The `{key}` the mob gains per level."
                            )),
                        )
                    }),
            )),
        ),
        ("Disguise", Property::new(StringSchema::new())),
        (
            "Skills",
            Property::new(skill_list(true)).description("The skills of the mob."),
        ),
        ("Variables", Property::new(MapSchema::of(Schema::any()))),
    ];

    let config = excludable(properties);
    Schema::from(MapSchema::of(Schema::from(config).named("mythic_mob_config")).describe_keys(documentation))
        .on_partial_process_hook(component(ComponentKind::Mob))
}
