//! Objects and maps.
//!
//! Objects support *submapping*: a property `A` whose schema is itself an
//! object is lifted into dotted properties `A.B`, so that both
//!
//! ```yaml
//! A.B: C
//! A:
//!   B: C
//! ```
//!
//! validate identically. Lookup of a dotted name walks into nested mappings
//! one prefix at a time.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use mythic_tree::{Mapping, Node, Pair, Span};
use tracing::trace;

use super::{Schema, SchemaKind};
use crate::suggest::{MAX_DISTANCE, closest, did_you_mean};
use crate::{
    CompletionGuard, CompletionItem, CompletionItemKind, CompletionProposal, Context, Diagnostic,
    DiagnosticCode, Resolvable, ValidationResult,
};

/// A property of an [`ObjectSchema`].
#[derive(Debug, Clone)]
pub struct Property {
    pub schema: Resolvable<Schema>,
    pub required: Resolvable<bool>,
    pub description: Resolvable<Option<String>>,
    pub aliases: Resolvable<Vec<String>>,
}

impl Property {
    pub fn new(schema: impl Into<Schema>) -> Self {
        Self {
            schema: Resolvable::Value(schema.into()),
            required: false.into(),
            description: None.into(),
            aliases: Vec::new().into(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into()).into();
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect::<Vec<_>>().into();
        self
    }
}

pub type Properties = IndexMap<String, Property>;

/// A mapping with a fixed property set.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    properties: Resolvable<Properties>,
}

impl ObjectSchema {
    pub fn new<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, Property)>,
        K: Into<String>,
    {
        Self {
            properties: Resolvable::Value(
                properties.into_iter().map(|(k, p)| (k.into(), p)).collect(),
            ),
        }
    }

    /// Properties computed per node.
    pub fn with_fn<F>(f: F) -> Self
    where
        F: Fn(&Context<'_>, &Node) -> Properties + Send + Sync + 'static,
    {
        Self {
            properties: Resolvable::from_fn(f),
        }
    }

    pub(super) fn partial(&self, schema: &Schema, cx: &Context<'_>, node: &Node) -> ValidationResult {
        let Some(map) = node.as_mapping() else {
            return ValidationResult::with_diagnostic(schema.type_mismatch(cx, node));
        };
        let properties = submapped(&self.properties.resolve(cx, node), cx, node);
        process_partial(&properties, Lookup::Nested, cx, map)
    }

    pub(super) fn full(&self, cx: &Context<'_>, node: &Node) -> ValidationResult {
        let properties = submapped(&self.properties.resolve(cx, node), cx, node);
        let Some(map) = node.as_mapping() else {
            let mut result = ValidationResult::new();
            let end = next_non_whitespace(cx.source, node.span().end);
            result.push_completion(CompletionProposal::new(
                cx.range(Span::new(node.span().start, end)),
                property_items(&properties, "", &HashSet::new()),
            ));
            return result;
        };
        let mut result = process_full(&properties, Lookup::Nested, cx, map);
        add_completions(&properties, "", cx, map, &mut result);
        result
    }

    pub(super) fn render(&self, cx: &Context<'_>, node: &Node) -> String {
        let properties = self.properties.resolve(cx, node);
        if properties.is_empty() {
            return "{}".to_string();
        }
        let fields: Vec<_> = properties
            .iter()
            .map(|(key, property)| {
                let child = node
                    .as_mapping()
                    .and_then(|m| m.get(key))
                    .unwrap_or(node);
                format!("{key}: {}", property.schema.resolve(cx, node).display_name(cx, child))
            })
            .collect();
        format!("{{ {} }}", fields.join(", "))
    }
}

type KeyDescription = Arc<dyn Fn(&Context<'_>, &Pair) -> Option<String> + Send + Sync>;

/// A mapping whose keys are open; every value shares one schema.
#[derive(Clone)]
pub struct MapSchema {
    values: Resolvable<Schema>,
    key_description: Option<KeyDescription>,
}

impl MapSchema {
    pub fn of(values: impl Into<Schema>) -> Self {
        Self {
            values: Resolvable::Value(values.into()),
            key_description: None,
        }
    }

    /// Describe each key, e.g. from the comment above it.
    pub fn describe_keys<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context<'_>, &Pair) -> Option<String> + Send + Sync + 'static,
    {
        self.key_description = Some(Arc::new(f));
        self
    }

    fn properties(&self, cx: &Context<'_>, map: &Mapping, node: &Node) -> Vec<ResolvedProperty> {
        let values = self.values.resolve(cx, node);
        let mut seen = HashSet::new();
        map.pairs
            .iter()
            .filter(|pair| seen.insert(pair.key.text.as_str()))
            .map(|pair| ResolvedProperty {
                key: pair.key.text.clone(),
                schema: values.clone(),
                required: false,
                description: self.key_description.as_ref().and_then(|f| f(cx, pair)),
                aliases: Vec::new(),
            })
            .collect()
    }

    pub(super) fn partial(&self, schema: &Schema, cx: &Context<'_>, node: &Node) -> ValidationResult {
        let Some(map) = node.as_mapping() else {
            return ValidationResult::with_diagnostic(schema.type_mismatch(cx, node));
        };
        process_partial(&self.properties(cx, map, node), Lookup::Literal, cx, map)
    }

    pub(super) fn full(&self, cx: &Context<'_>, node: &Node) -> ValidationResult {
        match node.as_mapping() {
            Some(map) => process_full(&self.properties(cx, map, node), Lookup::Literal, cx, map),
            None => ValidationResult::new(),
        }
    }

    pub(super) fn render(&self, cx: &Context<'_>, node: &Node) -> String {
        let value = node
            .as_mapping()
            .and_then(|m| m.pairs.first())
            .and_then(|p| p.value.as_ref())
            .unwrap_or(node);
        format!("map({})", self.values.resolve(cx, node).display_name(cx, value))
    }
}

impl std::fmt::Debug for MapSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSchema")
            .field("values", &self.values)
            .field("key_description", &self.key_description.is_some())
            .finish()
    }
}

/// A property with every configurable field resolved.
#[derive(Debug, Clone)]
struct ResolvedProperty {
    key: String,
    schema: Schema,
    required: bool,
    description: Option<String>,
    aliases: Vec<String>,
}

impl ResolvedProperty {
    fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    fn hover(&self, cx: &Context<'_>, value: &Node) -> String {
        let mut hover = format!("`{}`: `{}`", self.key, self.schema.display_name(cx, value));
        if let Some(description) = &self.description {
            hover.push_str("\n\n");
            hover.push_str(description);
        }
        let aliases: Vec<_> = self
            .aliases
            .iter()
            .filter(|a| **a != self.key)
            .map(|a| format!("`{a}`"))
            .collect();
        if !aliases.is_empty() {
            hover.push_str("\n\nAliases: ");
            hover.push_str(&aliases.join(", "));
        }
        hover
    }
}

/// Resolve `properties`, lifting object-typed properties into dotted ones.
fn submapped(properties: &Properties, cx: &Context<'_>, node: &Node) -> Vec<ResolvedProperty> {
    let mut out = Vec::new();
    for (key, property) in properties {
        let resolved = ResolvedProperty {
            key: key.clone(),
            schema: property.schema.resolve(cx, node),
            required: property.required.resolve(cx, node),
            description: property.description.resolve(cx, node),
            aliases: property.aliases.resolve(cx, node),
        };
        let SchemaKind::Object(object) = resolved.schema.kind() else {
            out.push(resolved);
            continue;
        };
        let nested = submapped(&object.properties.resolve(cx, node), cx, node);
        trace!(key, nested = nested.len(), "submapped object property");
        for sub in nested {
            let canonical = format!("{key}.{}", sub.key);
            let mut aliases: Vec<String> = Vec::new();
            for prefix in resolved.names() {
                for name in sub.names() {
                    let alias = format!("{prefix}.{name}");
                    if alias != canonical && !aliases.contains(&alias) {
                        aliases.push(alias);
                    }
                }
            }
            out.push(ResolvedProperty {
                key: canonical,
                aliases,
                ..sub
            });
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    /// Only literal keys of the mapping match.
    Literal,
    /// Dotted names also match through nested mappings.
    Nested,
}

/// Pairs matching any of `property`'s names, with the mapping each lives in.
fn find_matches<'n>(
    property: &ResolvedProperty,
    lookup: Lookup,
    map: &'n Mapping,
) -> Vec<(&'n Mapping, &'n Pair)> {
    let mut found = Vec::new();
    for name in property.names() {
        match lookup {
            Lookup::Literal => found.extend(
                map.pairs
                    .iter()
                    .filter(|p| p.key.text == name)
                    .map(|p| (map, p)),
            ),
            Lookup::Nested => find_pairs(map, name, &mut found),
        }
    }
    let mut seen = HashSet::new();
    found.retain(|(_, pair)| seen.insert(pair.key.span));
    found
}

fn find_pairs<'n>(map: &'n Mapping, name: &str, out: &mut Vec<(&'n Mapping, &'n Pair)>) {
    out.extend(map.pairs.iter().filter(|p| p.key.text == name).map(|p| (map, p)));
    for (dot, _) in name.match_indices('.') {
        let (head, rest) = (&name[..dot], &name[dot + 1..]);
        for pair in &map.pairs {
            if pair.key.text == head
                && let Some(inner) = pair.value_mapping()
            {
                find_pairs(inner, rest, out);
            }
        }
    }
}

fn process_partial(
    properties: &[ResolvedProperty],
    lookup: Lookup,
    cx: &Context<'_>,
    map: &Mapping,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut processed: HashSet<Span> = HashSet::new();

    for property in properties {
        let matches = find_matches(property, lookup, map);
        if matches.is_empty() {
            if property.required && !property.key.contains('.') {
                result.push_diagnostic(Diagnostic::new(
                    DiagnosticCode::YamlMissingProperty,
                    cx.range(map.span),
                    format!("Missing required property {}.", property.key),
                ));
            }
            continue;
        }
        if matches.len() > 1 {
            for (_, pair) in &matches {
                result.push_diagnostic(Diagnostic::new(
                    DiagnosticCode::YamlDuplicateProperty,
                    cx.range(pair.key.span),
                    format!("Duplicate property {}.", property.key),
                ));
            }
        }
        for (container, pair) in matches {
            processed.insert(pair.key.span);
            let Some(value) = &pair.value else {
                result.push_diagnostic(Diagnostic::new(
                    DiagnosticCode::YamlMissingValue,
                    cx.range(pair.key.span),
                    format!("Expected a value for {}.", property.key),
                ));
                continue;
            };
            let child_cx = cx.with_parent(container);
            result.push_hover(cx.range(pair.key.span), property.hover(&child_cx, value));
            result.merge(property.schema.partial_process(&child_cx, value));
            // The child schema owns everything below this pair.
            if let Node::Mapping(inner) = value {
                processed.extend(inner.nested_pairs().iter().map(|p| p.key.span));
            }
        }
    }

    let names: Vec<&str> = properties.iter().flat_map(ResolvedProperty::names).collect();
    sweep_unexpected(map, "", &names, &processed, cx, &mut result);
    result
}

/// Flag every pair no property claimed.
fn sweep_unexpected(
    map: &Mapping,
    prefix: &str,
    names: &[&str],
    processed: &HashSet<Span>,
    cx: &Context<'_>,
    result: &mut ValidationResult,
) {
    for pair in &map.pairs {
        if processed.contains(&pair.key.span) {
            continue;
        }
        let path = format!("{prefix}{}", pair.key.text);
        if let Some(inner) = pair.value_mapping() {
            let group = format!("{path}.");
            if names.iter().any(|n| *n == path || n.starts_with(&group)) {
                sweep_unexpected(inner, &group, names, processed, cx, result);
                continue;
            }
        }
        let children = format!("{}.", pair.key.text);
        let candidates = names
            .iter()
            .filter_map(|n| n.strip_prefix(prefix))
            .filter(|n| !n.starts_with(&children));
        let suggestion = closest(&pair.key.text, candidates, MAX_DISTANCE);
        result.push_diagnostic(Diagnostic::new(
            DiagnosticCode::YamlUnexpectedProperty,
            cx.range(pair.key.span),
            format!("Unexpected property {}.{}", pair.key.text, did_you_mean(suggestion)),
        ));
    }
}

fn process_full(
    properties: &[ResolvedProperty],
    lookup: Lookup,
    cx: &Context<'_>,
    map: &Mapping,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    for property in properties {
        for (container, pair) in find_matches(property, lookup, map) {
            if let Some(value) = &pair.value {
                let child_cx = cx.with_parent(container);
                result.merge(property.schema.full_process(&child_cx, value));
            }
        }
    }
    result
}

/// Completion items for the next key segment below `prefix`, skipping keys
/// already present.
fn property_items(
    properties: &[ResolvedProperty],
    prefix: &str,
    existing: &HashSet<&str>,
) -> Vec<CompletionItem> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut items = Vec::new();
    for property in properties {
        let Some(rest) = property.key.strip_prefix(prefix) else {
            continue;
        };
        let (segment, is_group) = match rest.split_once('.') {
            Some((head, _)) => (head, true),
            None => (rest, false),
        };
        if segment.is_empty() || existing.contains(segment) || !seen.insert(segment) {
            continue;
        }
        let item = CompletionItem::new(segment, CompletionItemKind::Property);
        let item = if is_group {
            item.with_detail("object")
        } else {
            match &property.description {
                Some(description) => item.with_detail(description.clone()),
                None => item,
            }
        };
        items.push(item);
    }
    items
}

fn add_completions(
    properties: &[ResolvedProperty],
    prefix: &str,
    cx: &Context<'_>,
    map: &Mapping,
    result: &mut ValidationResult,
) {
    let existing: HashSet<&str> = map.pairs.iter().map(|p| p.key.text.as_str()).collect();

    if map.pairs.is_empty() {
        let items = property_items(properties, prefix, &existing);
        if !items.is_empty() {
            result.push_completion(CompletionProposal::new(cx.range(map.span), items));
        }
        return;
    }

    let items = property_items(properties, prefix, &existing);
    for (i, pair) in map.pairs.iter().enumerate() {
        let start = pair.span().end;
        let end = match map.pairs.get(i + 1) {
            Some(next) => end_of_previous_line(cx, next.key.span.start),
            None => end_of_block(cx, start, cx.index.offset_to_position(pair.key.span.start).character),
        }
        .max(start);
        if !items.is_empty() {
            result.push_completion(
                CompletionProposal::new(cx.range(Span::new(start, end)), items.clone())
                    .with_guard(CompletionGuard::outside(cx.range(pair.span()))),
            );
        }

        let child_prefix = format!("{prefix}{}.", pair.key.text);
        if !properties.iter().any(|p| p.key.starts_with(&child_prefix)) {
            continue;
        }
        match &pair.value {
            Some(Node::Mapping(inner)) => add_completions(properties, &child_prefix, cx, inner, result),
            Some(Node::Scalar(s)) if !s.is_null() => {}
            Some(Node::Sequence(_)) => {}
            _ => {
                let child_items = property_items(properties, &child_prefix, &HashSet::new());
                if !child_items.is_empty() {
                    result.push_completion(
                        CompletionProposal::new(
                            cx.range(Span::new(pair.key.span.end, end.max(pair.key.span.end))),
                            child_items,
                        )
                        .with_guard(CompletionGuard::outside(cx.range(pair.key.span))),
                    );
                }
            }
        }
    }
}

/// Offset of the newline ending the line before the one containing `offset`.
fn end_of_previous_line(cx: &Context<'_>, offset: u32) -> u32 {
    let column = cx.index.offset_to_position(offset).character;
    (offset - column).saturating_sub(1)
}

/// End of the last line belonging to a block whose keys sit at
/// `key_column`, scanning from `offset`.
fn end_of_block(cx: &Context<'_>, offset: u32, key_column: u32) -> u32 {
    let first = cx.index.offset_to_position(offset).line + 1;
    for line in first..cx.index.line_count() {
        let Some(span) = cx.index.line_span(line) else {
            break;
        };
        let text = cx.slice(span);
        let content = text.trim_start();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        let indent = (text.len() - content.len()) as u32;
        if indent <= key_column {
            return span.start.saturating_sub(1);
        }
    }
    cx.source.len() as u32
}

fn next_non_whitespace(source: &str, offset: u32) -> u32 {
    source
        .get(offset as usize..)
        .and_then(|rest| rest.find(|c: char| !c.is_whitespace()))
        .map(|i| offset + i as u32)
        .unwrap_or(source.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ListSchema, NumberSchema, StringSchema};
    use crate::testing::Fixture;
    use mythic_tree::Position;

    fn health_bar() -> Schema {
        ObjectSchema::new([
            ("Enabled", Property::new(Schema::bool()).required()),
            ("Offset", Property::new(NumberSchema::new())),
        ])
        .into()
    }

    fn mob() -> Schema {
        ObjectSchema::new([
            ("Type", Property::new(StringSchema::new()).required()),
            ("Health", Property::new(NumberSchema::new().min(0.0)).aliases(["HP"])),
            ("HealthBar", Property::new(health_bar())),
            ("Skills", Property::new(ListSchema::of(StringSchema::new()))),
        ])
        .into()
    }

    fn run(schema: &Schema, source: &str) -> ValidationResult {
        let fixture = Fixture::new(source);
        schema.partial_process(&fixture.cx(), fixture.root())
    }

    fn messages(result: &ValidationResult) -> Vec<&str> {
        result.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_missing_required() {
        let result = run(&mob(), "{}");
        assert_eq!(messages(&result), ["Missing required property Type."]);
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::YamlMissingProperty);
    }

    #[test]
    fn test_nested_required_is_not_reported_when_absent() {
        assert!(run(&mob(), "Type: ZOMBIE\n").diagnostics.is_empty());
    }

    #[test]
    fn test_duplicates_via_alias() {
        let result = run(&mob(), "Type: ZOMBIE\nHealth: 5\nHP: 6\n");
        assert_eq!(messages(&result), ["Duplicate property Health.", "Duplicate property Health."]);
        assert_eq!(result.diagnostics[0].range.start.line, 1);
        assert_eq!(result.diagnostics[1].range.start.line, 2);
    }

    #[test]
    fn test_duplicate_keys_in_block_and_flow_style() {
        let schema: Schema = ObjectSchema::new([("A", Property::new(NumberSchema::new()))]).into();
        for source in ["A: 1\nA: 2\n", "{A: 1, A: 2}"] {
            let result = run(&schema, source);
            assert_eq!(messages(&result), ["Duplicate property A.", "Duplicate property A."], "{source}");
            assert!(result.diagnostics.iter().all(|d| d.code == DiagnosticCode::YamlDuplicateProperty));
            assert_ne!(result.diagnostics[0].range, result.diagnostics[1].range);
        }
    }

    #[test]
    fn test_scalar_for_group_is_not_suggested_its_children() {
        let group = ObjectSchema::new([("B", Property::new(StringSchema::new()))]);
        let schema: Schema = ObjectSchema::new([("A", Property::new(group))]).into();
        let result = run(&schema, "A: 5\n");
        assert_eq!(messages(&result), ["Unexpected property A."]);
    }

    #[test]
    fn test_missing_value() {
        let result = run(&mob(), "Type:\n");
        assert_eq!(messages(&result), ["Expected a value for Type."]);
    }

    #[test]
    fn test_unexpected_with_suggestion() {
        let result = run(&mob(), "Type: ZOMBIE\nHelth: 5\n");
        assert_eq!(messages(&result), ["Unexpected property Helth. Did you mean `Health`?"]);
    }

    #[test]
    fn test_unexpected_inside_submapping() {
        let result = run(&mob(), "Type: ZOMBIE\nHealthBar:\n  Enabled: true\n  Ofset: 2\n");
        assert_eq!(messages(&result), ["Unexpected property Ofset. Did you mean `Offset`?"]);
    }

    #[test]
    fn test_unknown_group_is_flagged_once() {
        let result = run(&mob(), "Type: ZOMBIE\nBossBar:\n  Enabled: true\n  Title: x\n");
        assert_eq!(messages(&result), ["Unexpected property BossBar."]);
    }

    #[test]
    fn test_submapping_equivalence() {
        let nested = run(&mob(), "Type: ZOMBIE\nHealthBar:\n  Offset: x\n");
        let dotted = run(&mob(), "Type: ZOMBIE\nHealthBar.Offset: x\n");
        assert_eq!(messages(&nested), messages(&dotted));
        assert_eq!(messages(&nested), ["Expected type `number`, but got string."]);

        let hover = |r: &ValidationResult| {
            r.hovers
                .iter()
                .map(|h| h.contents.clone())
                .find(|c| c.starts_with("`HealthBar.Offset`"))
                .unwrap()
        };
        assert_eq!(hover(&nested), hover(&dotted));
        assert_eq!(hover(&nested), "`HealthBar.Offset`: `number`");
    }

    #[test]
    fn test_hover_lists_aliases() {
        let result = run(&mob(), "Type: ZOMBIE\nHP: 5\n");
        let hover = result.hovers.iter().find(|h| h.range.start.line == 1).unwrap();
        assert_eq!(hover.contents, "`Health`: `number(0..)`\n\nAliases: `HP`");
    }

    #[test]
    fn test_list_values_are_owned_by_the_list() {
        let result = run(&mob(), "Type: ZOMBIE\nSkills:\n- a\n- b\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_child_sees_parent_mapping() {
        let sibling_checked = Schema::any().on_partial_process(|cx, node, result| {
            let id = cx.parent.and_then(|p| p.get("Id")).and_then(Node::as_scalar);
            if id.is_none_or(|id| id.text != "POTION") {
                result.push_diagnostic(Diagnostic::new(
                    DiagnosticCode::ItemInvalidPotionEffects,
                    cx.range(node.span()),
                    "not a potion",
                ));
            }
        });
        let schema: Schema = ObjectSchema::new([
            ("Id", Property::new(StringSchema::new())),
            ("Effects", Property::new(sibling_checked)),
        ])
        .into();
        assert!(run(&schema, "Id: POTION\nEffects: [a]\n").diagnostics.is_empty());
        assert_eq!(run(&schema, "Id: STONE\nEffects: [a]\n").diagnostics.len(), 1);
    }

    #[test]
    fn test_render() {
        let fixture = Fixture::new("{}");
        insta::assert_snapshot!(
            mob().internal_name(&fixture.cx(), fixture.root()),
            @"{ Type: string, Health: number(0..), HealthBar: { Enabled: boolean, Offset: number }, Skills: list(string) }"
        );
        let map: Schema = MapSchema::of(NumberSchema::new()).into();
        insta::assert_snapshot!(map.internal_name(&fixture.cx(), fixture.root()), @"map(number)");
    }

    #[test]
    fn test_map_validates_every_value() {
        let schema: Schema = MapSchema::of(health_bar()).into();
        let result = run(&schema, "a:\n  Enabled: true\nb:\n  Offset: 1\nc: 5\n");
        assert_eq!(
            messages(&result),
            [
                "Missing required property Enabled.",
                "Expected type `{ Enabled: boolean, Offset: number }`, but got number."
            ]
        );
    }

    #[test]
    fn test_map_duplicate_keys() {
        let schema: Schema = MapSchema::of(Schema::any()).into();
        let result = run(&schema, "a: 1\na: 2\n");
        assert_eq!(messages(&result), ["Duplicate property a.", "Duplicate property a."]);
    }

    #[test]
    fn test_completions_between_properties() {
        let fixture = Fixture::new("Type: ZOMBIE\n\nHealth: 5\n");
        let result = mob().full_process(&fixture.cx(), fixture.root());
        let proposal = result
            .completions
            .iter()
            .find(|c| c.applies_at(Position::new(1, 0), ""))
            .unwrap();
        let labels: Vec<_> = proposal.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["HealthBar", "Skills"]);
        assert_eq!(proposal.items[0].detail.as_deref(), Some("object"));
        // Not offered while typing a value.
        assert!(!proposal.applies_at(Position::new(0, 8), "Type: ZO"));
    }

    #[test]
    fn test_completions_after_last_property_and_in_group() {
        let fixture = Fixture::new("Type: ZOMBIE\nHealthBar:\n  Enabled: true\n\n");
        let result = mob().full_process(&fixture.cx(), fixture.root());
        let at = |pos: Position, prefix: &str| -> Vec<String> {
            result
                .completions
                .iter()
                .filter(|c| c.applies_at(pos, prefix))
                .flat_map(|c| c.items.iter().map(|i| i.label.clone()))
                .collect()
        };
        assert!(at(Position::new(3, 2), "  ").contains(&"Offset".to_string()));
        assert!(at(Position::new(3, 0), "").contains(&"Health".to_string()));
    }

    #[test]
    fn test_completions_in_empty_object() {
        let fixture = Fixture::new("HealthBar: {}\nType: x\n");
        let result = mob().full_process(&fixture.cx(), fixture.root());
        let labels: Vec<_> = result
            .completions
            .iter()
            .filter(|c| c.guard.is_none())
            .flat_map(|c| c.items.iter().map(|i| i.label.as_str()))
            .collect();
        assert_eq!(labels, ["Enabled", "Offset"]);
    }
}
