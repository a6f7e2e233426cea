//! Named, cross-document components: mobs, skills, and items.

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;
use mythic_tree::{Range, ScalarStyle, Span};
use serde::Serialize;
use tracing::trace;

use crate::{
    Context, Diagnostic, DiagnosticCode, DocumentId, Hook, RangeLink, SemanticTokenType,
    ValidationResult,
};

/// The kinds of component a document can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Mob,
    Skill,
    Item,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 3] = [ComponentKind::Mob, ComponentKind::Skill, ComponentKind::Item];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Mob => "mob",
            ComponentKind::Skill => "skill",
            ComponentKind::Item => "item",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ComponentKind::Mob => "Mythic Mob",
            ComponentKind::Skill => "Mythic Skill",
            ComponentKind::Item => "Mythic Item",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a component is declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub document: DocumentId,
    pub uri: String,
    /// Range of the declaring key.
    pub key_range: Range,
    /// Range of the whole declaring pair.
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub kind: ComponentKind,
    pub id: String,
    pub declarations: Vec<Declaration>,
    pub documentation: Option<String>,
}

impl Component {
    pub fn new(kind: ComponentKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            declarations: Vec::new(),
            documentation: None,
        }
    }

    /// Markdown shown when hovering a reference to this component.
    pub fn description(&self) -> String {
        let mut out = format!("# {}: `{}`", self.kind.title(), self.id);
        if let Some(doc) = &self.documentation {
            out.push_str("\n\n");
            out.push_str(doc);
        }
        out
    }

    /// The document that declared this component first.
    pub fn owner(&self) -> Option<DocumentId> {
        self.declarations.iter().map(|d| d.document).min()
    }
}

/// Components grouped by kind, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    components: BTreeMap<ComponentKind, IndexMap<String, Component>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.components.values().all(IndexMap::is_empty)
    }

    pub fn len(&self) -> usize {
        self.components.values().map(IndexMap::len).sum()
    }

    pub fn get(&self, kind: ComponentKind, id: &str) -> Option<&Component> {
        self.components.get(&kind)?.get(id)
    }

    pub fn get_mut(&mut self, kind: ComponentKind, id: &str) -> Option<&mut Component> {
        self.components.get_mut(&kind)?.get_mut(id)
    }

    pub fn components(&self, kind: ComponentKind) -> impl Iterator<Item = &Component> {
        self.components.get(&kind).into_iter().flat_map(IndexMap::values)
    }

    pub fn ids(&self, kind: ComponentKind) -> impl Iterator<Item = &str> {
        self.components(kind).map(|c| c.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.values().flat_map(IndexMap::values)
    }

    /// Insert a component, appending its declarations to an existing
    /// component with the same kind and id.
    pub fn insert(&mut self, component: Component) {
        let by_id = self.components.entry(component.kind).or_default();
        match by_id.get_mut(&component.id) {
            Some(existing) => {
                existing.declarations.extend(component.declarations);
                if existing.documentation.is_none() {
                    existing.documentation = component.documentation;
                }
            }
            None => {
                by_id.insert(component.id.clone(), component);
            }
        }
    }

    pub fn merge(&mut self, other: Registry) {
        for (_, by_id) in other.components {
            for (_, component) in by_id {
                self.insert(component);
            }
        }
    }

    /// Drop every declaration made by `document`, and components left with
    /// none.
    pub fn remove_document(&mut self, document: DocumentId) {
        for by_id in self.components.values_mut() {
            for component in by_id.values_mut() {
                component.declarations.retain(|d| d.document != document);
            }
            by_id.retain(|_, c| !c.declarations.is_empty());
        }
    }
}

/// Turn a key's preceding comment into documentation.
///
/// Only `##` doc comments count: the reader strips one `#`, so the lines
/// kept here are those still starting with `#`. A plain comment line resets
/// the block.
pub fn parse_documentation(comment: &str) -> Option<String> {
    let mut lines: Vec<&str> = Vec::new();
    for line in comment.lines() {
        match line.strip_prefix('#') {
            Some(rest) => lines.push(rest.strip_prefix(' ').unwrap_or(rest)),
            None => lines.clear(),
        }
    }
    let doc = lines.join("\n");
    if doc.trim().is_empty() { None } else { Some(doc) }
}

/// A partial-process hook that declares one component per key of the
/// mapping it runs on.
pub fn component(kind: ComponentKind) -> Hook {
    Arc::new(move |cx, node, result| declare_components(kind, cx, node, result))
}

fn declare_components(
    kind: ComponentKind,
    cx: &Context<'_>,
    node: &mythic_tree::Node,
    result: &mut ValidationResult,
) {
    let Some(map) = node.as_mapping() else {
        return;
    };

    for pair in &map.pairs {
        let key = &pair.key;
        if key.text.chars().any(char::is_whitespace) {
            result.push_diagnostic(Diagnostic::new(
                DiagnosticCode::ComponentWhitespace,
                cx.range(key.span),
                "Whitespaces are not allowed here!",
            ));
        }

        if pair.value.is_none() {
            continue;
        }

        let id = match key.text.find('.') {
            Some(dot) => &key.text[..dot],
            None => key.text.as_str(),
        };
        let id_start = match key.style {
            ScalarStyle::Plain => key.span.start,
            ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted => key.span.start + 1,
        };
        let id_end = (id_start + id.len() as u32).min(key.span.end);
        result.highlight(cx.range(Span::new(id_start, id_end)), SemanticTokenType::Function);

        if let Some(existing) = cx.registry.get(kind, id)
            && existing.owner().is_some_and(|owner| owner < cx.document)
        {
            result.push_diagnostic(Diagnostic::new(
                DiagnosticCode::DuplicateComponent,
                cx.range(key.span),
                format!("Duplicate {kind} id: {id}"),
            ));
            continue;
        }

        let declaration = Declaration {
            document: cx.document,
            uri: cx.uri.to_string(),
            key_range: cx.range(key.span),
            range: cx.range(pair.span()),
        };

        match result.components.get_mut(kind, id) {
            Some(existing) => existing.declarations.push(declaration),
            None => {
                trace!(%kind, id, "declared component");
                let mut new = Component::new(kind, id);
                new.declarations.push(declaration);
                new.documentation = pair
                    .comment_before
                    .as_deref()
                    .and_then(parse_documentation);
                result.components.insert(new);
            }
        }
    }
}

/// Link a usage at `from` to every declaration of `component` and attach
/// the component's description as hover text.
pub fn link_component(component: &Component, from: Range, result: &mut ValidationResult) {
    for declaration in &component.declarations {
        result.push_link(RangeLink {
            from,
            target_uri: declaration.uri.clone(),
            target_range: declaration.range,
            target_selection_range: declaration.key_range,
        });
    }
    result.push_hover(from, component.description());
}
