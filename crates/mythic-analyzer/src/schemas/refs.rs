//! Schemas for values that name something: components and game registry
//! entries.

use mythic_tree::Node;

use crate::schema::{EnumMember, StringMatcher, StringSchema};
use crate::{
    CompletionItem, CompletionItemKind, ComponentKind, Context, Schema, SemanticTokenType,
    ValidationResult, link_component,
};

/// The display name of a reference to a `kind` component.
pub fn reference_name(kind: ComponentKind) -> String {
    format!("mythic_{kind}_id")
}

/// A string naming a component declared somewhere in the workspace.
///
/// Any string passes the partial pass. The full pass checks it against the
/// registry and links it to the component's declarations.
pub fn component_reference(kind: ComponentKind) -> Schema {
    Schema::from(StringSchema::new())
        .named(reference_name(kind))
        .on_full_process(move |cx, node, result| resolve_reference(kind, cx, node, result))
}

fn resolve_reference(
    kind: ComponentKind,
    cx: &Context<'_>,
    node: &Node,
    result: &mut ValidationResult,
) {
    let Some(scalar) = node.as_scalar().filter(|s| !s.is_null()) else {
        return;
    };
    let item_kind = match kind {
        ComponentKind::Skill => CompletionItemKind::Function,
        ComponentKind::Mob | ComponentKind::Item => CompletionItemKind::Reference,
    };
    let members = cx
        .registry
        .components(kind)
        .map(|component| {
            EnumMember::new(&component.id).with_completion(
                CompletionItem::new(&component.id, item_kind)
                    .with_detail(kind.title())
                    .with_documentation(component.description()),
            )
        })
        .collect();
    let known = Schema::from(
        StringSchema::new()
            .matcher(StringMatcher::Enum(members))
            .case_sensitive(true)
            .highlight(SemanticTokenType::Function),
    )
    .named(reference_name(kind));
    result.merge(known.partial_process(cx, node));
    result.merge(known.full_process(cx, node));

    if let Some(component) = cx.registry.get(kind, &scalar.text) {
        link_component(component, cx.range(scalar.span), result);
    }
}

/// One of the game's entity types.
pub fn entity_type() -> Schema {
    Schema::from(
        StringSchema::enumeration_with(|cx, _| {
            cx.data.entity_types.iter().map(EnumMember::new).collect()
        })
        .highlight(SemanticTokenType::EnumMember),
    )
    .named("entity_type")
}

/// One of the game's materials.
pub fn material() -> Schema {
    Schema::from(
        StringSchema::enumeration_with(|cx, _| cx.data.materials.iter().map(EnumMember::new).collect())
            .highlight(SemanticTokenType::EnumMember),
    )
    .named("material_type")
}
