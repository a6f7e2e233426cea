//! Schemas for the document kinds the analyzer knows about.
//!
//! The field tables are not exhaustive: they cover the commonly used
//! properties of each kind.

use mythic_tree::Pair;

use crate::schema::{ListSchema, ObjectSchema, Property, StringSchema};
use crate::{Context, parse_documentation};

mod item;
mod metadata;
mod mob;
mod refs;
mod skill;
mod skill_list;

pub use item::item;
pub use metadata::{FILE_TYPE, header_source, metadata};
pub use mob::mob;
pub use refs::{component_reference, entity_type, material, reference_name};
pub use skill::metaskill;
pub use skill_list::{skill_line, skill_list};

/// Key description taken from the `##` comment above the key.
fn documentation(_cx: &Context<'_>, pair: &Pair) -> Option<String> {
    pair.comment_before.as_deref().and_then(parse_documentation)
}

/// An object with an `Exclude` list naming its own properties, for kinds
/// that inherit from a `Template`.
fn excludable(mut properties: Vec<(&'static str, Property)>) -> ObjectSchema {
    let keys: Vec<&str> = properties.iter().map(|(key, _)| *key).collect();
    let exclude = Property::new(ListSchema::of(StringSchema::enumeration(keys)))
        .description("Inherited properties to drop from the template.");
    properties.insert(1.min(properties.len()), ("Exclude", exclude));
    ObjectSchema::new(properties)
}
