//! Composable schema nodes.
//!
//! A [`Schema`] is an immutable, cheaply clonable validator. Its shape is one
//! of the closed set of [`SchemaKind`] variants; on top of the built-in
//! checks of that shape, callers attach hooks that run after them. Every
//! schema supports two passes:
//!
//! - [`Schema::partial_process`]: local checks that only need the document
//!   itself. Components are declared here.
//! - [`Schema::full_process`]: checks that resolve references into other
//!   documents. Completion proposals are produced here.

use std::sync::Arc;

use mythic_tree::Node;

use crate::{Context, Diagnostic, DiagnosticCode, Resolvable, SemanticTokenType, ValidationResult};

mod list;
mod object;
mod scalar;
mod string;

pub use list::{ListItems, ListSchema};
pub use object::{MapSchema, ObjectSchema, Properties, Property};
pub use scalar::{Bound, NumberSchema};
pub use string::{EnumMember, StringMatcher, StringSchema};

/// A callback run after a schema's built-in checks.
pub type Hook = Arc<dyn Fn(&Context<'_>, &Node, &mut ValidationResult) + Send + Sync>;

/// The shape a schema validates.
#[derive(Debug)]
pub enum SchemaKind {
    /// Accepts everything.
    Any,
    Bool,
    Number(NumberSchema),
    String(StringSchema),
    List(ListSchema),
    Object(ObjectSchema),
    /// An object whose properties are the document's own keys.
    Map(MapSchema),
}

#[derive(Clone)]
pub struct Schema {
    kind: Arc<SchemaKind>,
    name: Option<String>,
    partial_hooks: Vec<Resolvable<Vec<Hook>>>,
    full_hooks: Vec<Resolvable<Vec<Hook>>>,
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind: Arc::new(kind),
            name: None,
            partial_hooks: Vec::new(),
            full_hooks: Vec::new(),
        }
    }

    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    pub fn bool() -> Self {
        Self::new(SchemaKind::Bool)
    }

    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Give this schema a display name used in messages instead of its
    /// structural signature.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Run `hook` after the built-in partial checks.
    pub fn on_partial_process<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context<'_>, &Node, &mut ValidationResult) + Send + Sync + 'static,
    {
        self.partial_hooks.push(Resolvable::Value(vec![Arc::new(hook)]));
        self
    }

    /// Attach partial hooks chosen per node, e.g. from sibling values.
    pub fn on_partial_process_with<F>(mut self, select: F) -> Self
    where
        F: Fn(&Context<'_>, &Node) -> Vec<Hook> + Send + Sync + 'static,
    {
        self.partial_hooks.push(Resolvable::from_fn(select));
        self
    }

    pub fn on_partial_process_hook(mut self, hook: Hook) -> Self {
        self.partial_hooks.push(Resolvable::Value(vec![hook]));
        self
    }

    /// Run `hook` after the built-in full checks.
    pub fn on_full_process<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context<'_>, &Node, &mut ValidationResult) + Send + Sync + 'static,
    {
        self.full_hooks.push(Resolvable::Value(vec![Arc::new(hook)]));
        self
    }

    pub fn on_full_process_with<F>(mut self, select: F) -> Self
    where
        F: Fn(&Context<'_>, &Node) -> Vec<Hook> + Send + Sync + 'static,
    {
        self.full_hooks.push(Resolvable::from_fn(select));
        self
    }

    /// Local validation of `node`.
    pub fn partial_process(&self, cx: &Context<'_>, node: &Node) -> ValidationResult {
        let mut result = match &*self.kind {
            SchemaKind::Any => ValidationResult::new(),
            SchemaKind::Bool => self.bool_partial(cx, node),
            SchemaKind::Number(number) => number.partial(self, cx, node),
            SchemaKind::String(string) => string.partial(self, cx, node),
            SchemaKind::List(list) => list.partial(self, cx, node),
            SchemaKind::Object(object) => object.partial(self, cx, node),
            SchemaKind::Map(map) => map.partial(self, cx, node),
        };
        run_hooks(&self.partial_hooks, cx, node, &mut result);
        result
    }

    /// Validation of `node` that may depend on other documents.
    pub fn full_process(&self, cx: &Context<'_>, node: &Node) -> ValidationResult {
        let mut result = match &*self.kind {
            SchemaKind::Any | SchemaKind::Bool | SchemaKind::Number(_) => ValidationResult::new(),
            SchemaKind::String(string) => string.full(cx, node),
            SchemaKind::List(list) => list.full(cx, node),
            SchemaKind::Object(object) => object.full(cx, node),
            SchemaKind::Map(map) => map.full(cx, node),
        };
        run_hooks(&self.full_hooks, cx, node, &mut result);
        result
    }

    /// The structural signature of this schema, e.g. `{ Health: number }`.
    pub fn internal_name(&self, cx: &Context<'_>, node: &Node) -> String {
        match &*self.kind {
            SchemaKind::Any => "any".to_string(),
            SchemaKind::Bool => "boolean".to_string(),
            SchemaKind::Number(number) => number.render(cx, node),
            SchemaKind::String(string) => string.render(cx, node),
            SchemaKind::List(list) => list.render(cx, node),
            SchemaKind::Object(object) => object.render(cx, node),
            SchemaKind::Map(map) => map.render(cx, node),
        }
    }

    /// The user-assigned name, or the structural signature.
    pub fn display_name(&self, cx: &Context<'_>, node: &Node) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.internal_name(cx, node),
        }
    }

    /// Diagnostic for a node of the wrong shape.
    pub(crate) fn type_mismatch(&self, cx: &Context<'_>, node: &Node) -> Diagnostic {
        Diagnostic::new(
            DiagnosticCode::YamlInvalidType,
            cx.range(node.span()),
            format!(
                "Expected type `{}`, but got {}.",
                self.display_name(cx, node),
                node.kind_name()
            ),
        )
    }

    fn bool_partial(&self, cx: &Context<'_>, node: &Node) -> ValidationResult {
        let Some(scalar) = node.as_scalar() else {
            return ValidationResult::with_diagnostic(self.type_mismatch(cx, node));
        };
        if scalar.as_bool().is_none() {
            return ValidationResult::with_diagnostic(Diagnostic::new(
                DiagnosticCode::YamlInvalidValue,
                cx.range(scalar.span),
                format!("Expected a boolean, but got {}.", cx.slice(scalar.span)),
            ));
        }
        let mut result = ValidationResult::new();
        result.highlight(cx.range(scalar.span), SemanticTokenType::Keyword);
        result
    }
}

fn run_hooks(
    hooks: &[Resolvable<Vec<Hook>>],
    cx: &Context<'_>,
    node: &Node,
    result: &mut ValidationResult,
) {
    for selected in hooks {
        for hook in selected.resolve(cx, node) {
            hook(cx, node, result);
        }
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("partial_hooks", &self.partial_hooks.len())
            .field("full_hooks", &self.full_hooks.len())
            .finish()
    }
}

impl From<NumberSchema> for Schema {
    fn from(schema: NumberSchema) -> Self {
        Schema::new(SchemaKind::Number(schema))
    }
}

impl From<StringSchema> for Schema {
    fn from(schema: StringSchema) -> Self {
        Schema::new(SchemaKind::String(schema))
    }
}

impl From<ListSchema> for Schema {
    fn from(schema: ListSchema) -> Self {
        Schema::new(SchemaKind::List(schema))
    }
}

impl From<ObjectSchema> for Schema {
    fn from(schema: ObjectSchema) -> Self {
        Schema::new(SchemaKind::Object(schema))
    }
}

impl From<MapSchema> for Schema {
    fn from(schema: MapSchema) -> Self {
        Schema::new(SchemaKind::Map(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    #[test]
    fn test_bool() {
        let fixture = Fixture::new("[true, maybe, [1]]");
        let cx = fixture.cx();
        let items = &fixture.root().as_sequence().unwrap().items;

        assert!(Schema::bool().partial_process(&cx, &items[0]).diagnostics.is_empty());

        let result = Schema::bool().partial_process(&cx, &items[1]);
        assert_eq!(result.diagnostics[0].message, "Expected a boolean, but got maybe.");

        let result = Schema::bool().partial_process(&cx, &items[2]);
        assert_eq!(result.diagnostics[0].message, "Expected type `boolean`, but got list.");
    }

    #[test]
    fn test_hooks_run_after_builtins() {
        let fixture = Fixture::new("x");
        let cx = fixture.cx();
        let schema = Schema::bool().on_partial_process(|cx, node, result| {
            // The built-in diagnostic is already there.
            assert_eq!(result.diagnostics.len(), 1);
            result.push_hover(cx.range(node.span()), "hooked");
        });
        let result = schema.partial_process(&cx, fixture.root());
        assert_eq!(result.hovers.len(), 1);
        assert!(schema.full_process(&cx, fixture.root()).hovers.is_empty());
    }

    #[test]
    fn test_selected_hooks() {
        let fixture = Fixture::new("x");
        let cx = fixture.cx();
        let schema = Schema::any().on_partial_process_with(|_cx, node| {
            let hook: Hook = Arc::new(|cx, node, result| {
                result.push_hover(cx.range(node.span()), "selected")
            });
            if node.as_scalar().is_some() { vec![hook] } else { vec![] }
        });
        assert_eq!(schema.partial_process(&cx, fixture.root()).hovers.len(), 1);
    }

    #[test]
    fn test_display_name_prefers_name() {
        let fixture = Fixture::new("x");
        let cx = fixture.cx();
        let schema = Schema::any().named("mythic_thing");
        insta::assert_snapshot!(schema.display_name(&cx, fixture.root()), @"mythic_thing");
        insta::assert_snapshot!(schema.internal_name(&cx, fixture.root()), @"any");
    }
}
