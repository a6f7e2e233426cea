//! Item files.

use std::sync::Arc;

use mythic_tree::Node;

use super::{component_reference, documentation, excludable, material};
use crate::schema::{EnumMember, ListSchema, MapSchema, NumberSchema, ObjectSchema, Property, StringSchema};
use crate::{
    ComponentKind, Diagnostic, DiagnosticCode, Hook, Schema, SemanticTokenType, component,
};

fn strings() -> Schema {
    ListSchema::of(StringSchema::new()).into()
}

/// `PotionEffects` only applies when the sibling `Id` is potion-like.
fn potion_effects() -> Schema {
    strings().on_partial_process_with(|cx, _| {
        let id = cx
            .parent
            .and_then(|parent| parent.get("Id"))
            .and_then(Node::as_scalar);
        match id {
            Some(id) if !cx.data.is_potion_material(&id.text) => vec![not_a_potion()],
            _ => Vec::new(),
        }
    })
}

fn not_a_potion() -> Hook {
    Arc::new(|cx, node, result| {
        result.push_diagnostic(Diagnostic::new(
            DiagnosticCode::ItemInvalidPotionEffects,
            cx.range(node.span()),
            "Potion effects can only be applied to items of type `potion`, `splash_potion`, \
             `lingering_potion`, or `tipped_arrow`.",
        ));
    })
}

pub fn item() -> Schema {
    let properties = vec![
        (
            "Template",
            Property::new(component_reference(ComponentKind::Item))
                .description("The item to inherit every setting from."),
        ),
        ("Id", Property::new(material()).description("The base material of the item.")),
        ("Display", Property::new(StringSchema::new()).description("The display name of the item.")),
        ("Lore", Property::new(strings()).description("The lore of the item.")),
        (
            "CustomModelData",
            Property::new(NumberSchema::new())
                .aliases(["Model"])
                .description("The CustomModelData tag of the item."),
        ),
        (
            "Durability",
            Property::new(NumberSchema::new().min(0.0))
                .description("The durability to take off the item."),
        ),
        (
            "Amount",
            Property::new(NumberSchema::new().min(1.0).integer())
                .description("The default amount to give."),
        ),
        ("Options", Property::new(MapSchema::of(Schema::any()))),
        (
            "Enchantments",
            Property::new(ListSchema::of(Schema::from(StringSchema::new()).named("enchantment"))),
        ),
        (
            "Hide",
            Property::new(ListSchema::of(
                Schema::from(
                    StringSchema::enumeration_with(|cx, _| {
                        cx.data.hide_flags.iter().map(EnumMember::new).collect()
                    })
                    .highlight(SemanticTokenType::EnumMember),
                )
                .named("hide"),
            ))
            .description("Things to hide from the item tooltip."),
        ),
        (
            "PotionEffects",
            Property::new(potion_effects()).description(
                "The potion effects of the item. Only potions, splash potions, lingering potions \
                 and tipped arrows can carry them.",
            ),
        ),
        ("BannerLayers", Property::new(strings())),
        ("CanPlaceOn", Property::new(strings())),
        ("CanBreak", Property::new(strings())),
        ("Group", Property::new(StringSchema::new())),
        ("NBT", Property::new(MapSchema::of(Schema::any()))),
    ];

    let config: ObjectSchema = excludable(properties);
    Schema::from(MapSchema::of(Schema::from(config).named("mythic_item_config")).describe_keys(documentation))
        .on_partial_process_hook(component(ComponentKind::Item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use crate::ValidationResult;
    use mythic_tree::Position;

    fn run(source: &str) -> ValidationResult {
        let fixture = Fixture::new(source);
        item().partial_process(&fixture.cx(), fixture.root())
    }

    #[test]
    fn test_potion_effects_on_potion() {
        let result = run("Brew:\n  Id: SPLASH_POTION\n  PotionEffects:\n  - SPEED 200 1\n");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_potion_effects_on_sword() {
        let result = run("Blade:\n  Id: DIAMOND_SWORD\n  PotionEffects:\n  - SPEED 200 1\n");
        assert_eq!(result.diagnostics.len(), 1);
        let diagnostic = &result.diagnostics[0];
        assert_eq!(diagnostic.code, DiagnosticCode::ItemInvalidPotionEffects);
        assert_eq!(diagnostic.range.start, Position::new(3, 2));
    }

    #[test]
    fn test_potion_effects_without_id() {
        assert!(run("Thing:\n  PotionEffects: [SPEED]\n").diagnostics.is_empty());
    }

    #[test]
    fn test_amount_and_alias() {
        let result = run("Coin:\n  Id: GOLD_INGOT\n  Amount: 0\n  Model: 5\n  CustomModelData: 6\n");
        let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            [
                DiagnosticCode::YamlDuplicateProperty,
                DiagnosticCode::YamlDuplicateProperty,
                DiagnosticCode::YamlOutOfRange
            ]
        );
    }

    #[test]
    fn test_hide_flags() {
        let result = run("Coin:\n  Hide: [HIDE_ENCHANTS, HIDE_EVERYTHING]\n");
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].message.starts_with("Expected hide, but got `HIDE_EVERYTHING`."));
    }
}
