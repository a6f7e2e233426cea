//! A loaded source file and the results of validating it.

use mythic_tree::{LineIndex, Node, Parsed, Position, parse};
use serde::Serialize;
use tracing::{debug, warn};

use crate::schemas::{FILE_TYPE, header_source, metadata};
use crate::{
    CompletionItem, Context, Diagnostic, DiagnosticCode, Hover, MythicData, RangeLink, Registry,
    Schema, SchemaBindings, SemanticTokenType, ValidationResult, render_diagnostics,
};

/// Identity of a document within a workspace. Lower ids were loaded first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DocumentId(u32);

impl DocumentId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    uri: String,
    source: String,
    index: LineIndex,
    parsed: Parsed,
    kind: Option<String>,
    schema: Option<Schema>,
    metadata: ValidationResult,
    partial: ValidationResult,
    full: ValidationResult,
}

impl Document {
    /// Read `source` and pick its schema: a valid `## FileType:` header
    /// wins over the path bindings.
    pub fn new(
        id: DocumentId,
        uri: impl Into<String>,
        source: impl Into<String>,
        bindings: &SchemaBindings,
        data: &MythicData,
    ) -> Self {
        let uri = uri.into();
        let source = source.into();
        let index = LineIndex::new(&source);
        let parsed = parse(&source);

        let (metadata, declared) = read_metadata(id, &uri, &source, &index, bindings, data);
        let binding = declared
            .as_deref()
            .and_then(|kind| bindings.by_kind(kind))
            .or_else(|| bindings.find(&uri));
        match binding {
            Some(binding) => debug!(uri, kind = %binding.kind, "bound document"),
            None => warn!(uri, "no schema bound to document"),
        }

        Self {
            id,
            kind: binding.map(|b| b.kind.clone()),
            schema: binding.map(|b| b.schema.clone()),
            uri,
            source,
            index,
            parsed,
            metadata,
            partial: ValidationResult::new(),
            full: ValidationResult::new(),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn index(&self) -> &LineIndex {
        &self.index
    }

    pub fn root(&self) -> Option<&Node> {
        self.parsed.root.as_ref()
    }

    /// The kind id of the bound schema, e.g. `metaskill`.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    fn context<'a>(&'a self, registry: &'a Registry, data: &'a MythicData) -> Context<'a> {
        Context {
            document: self.id,
            uri: &self.uri,
            source: &self.source,
            index: &self.index,
            registry,
            data,
            parent: None,
        }
    }

    /// Local validation. `registry` holds the components of every other
    /// loaded document.
    pub fn partial_process(&mut self, registry: &Registry, data: &MythicData) {
        let cx = self.context(registry, data);
        let mut result = self.base_highlights();
        result.merge(self.metadata.clone());
        for error in &self.parsed.errors {
            result.push_diagnostic(Diagnostic::new(
                DiagnosticCode::YamlSyntax,
                cx.range(error.span),
                error.to_string(),
            ));
        }
        if let (Some(schema), Some(root)) = (&self.schema, self.root()) {
            result.merge(schema.partial_process(&cx, root));
        }
        debug!(
            uri = %self.uri,
            diagnostics = result.diagnostics.len(),
            components = result.components.len(),
            "partial pass"
        );
        self.partial = result;
    }

    /// Cross-document validation. `registry` holds the components of every
    /// loaded document, this one included.
    pub fn full_process(&mut self, registry: &Registry, data: &MythicData) {
        let cx = self.context(registry, data);
        let result = match (&self.schema, self.root()) {
            (Some(schema), Some(root)) => schema.full_process(&cx, root),
            _ => ValidationResult::new(),
        };
        debug!(
            uri = %self.uri,
            diagnostics = result.diagnostics.len(),
            links = result.range_links.len(),
            "full pass"
        );
        self.full = result;
    }

    /// Keys as properties and scalar values as strings, under every schema
    /// highlight.
    fn base_highlights(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(root) = self.root() {
            self.highlight_node(root, &mut result);
        }
        result
    }

    fn highlight_node(&self, node: &Node, result: &mut ValidationResult) {
        match node {
            Node::Scalar(scalar) => {
                if !scalar.is_null() {
                    result.highlight(self.index.range(scalar.span), SemanticTokenType::String);
                }
            }
            Node::Sequence(sequence) => {
                for item in sequence.iter() {
                    self.highlight_node(item, result);
                }
            }
            Node::Mapping(mapping) => {
                for pair in mapping.iter() {
                    result.highlight(self.index.range(pair.key.span), SemanticTokenType::Property);
                    if let Some(value) = &pair.value {
                        self.highlight_node(value, result);
                    }
                }
            }
        }
    }

    /// The result of the last partial pass.
    pub fn partial_result(&self) -> &ValidationResult {
        &self.partial
    }

    /// The result of the last full pass.
    pub fn full_result(&self) -> &ValidationResult {
        &self.full
    }

    /// Both passes merged.
    pub fn result(&self) -> ValidationResult {
        self.partial.clone().merged(self.full.clone())
    }

    /// Components this document declared in its last partial pass.
    pub fn components(&self) -> &Registry {
        &self.partial.components
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.partial.diagnostics.iter().chain(&self.full.diagnostics)
    }

    pub fn has_errors(&self) -> bool {
        !self.partial.is_valid() || !self.full.is_valid()
    }

    /// Every diagnostic as an ariadne report over this document's source.
    pub fn render(&self) -> String {
        let diagnostics: Vec<Diagnostic> = self.diagnostics().cloned().collect();
        render_diagnostics(&self.uri, &self.source, &diagnostics)
    }

    /// Text of the cursor's line up to `pos`.
    pub fn line_prefix(&self, pos: Position) -> &str {
        let Some(line) = self.index.line_span(pos.line) else {
            return "";
        };
        let end = self.index.position_to_offset(pos).clamp(line.start, line.end);
        self.source
            .get(line.start as usize..end as usize)
            .unwrap_or_default()
    }

    /// Completion items offered at `pos`.
    pub fn completions_at(&self, pos: Position) -> Vec<&CompletionItem> {
        let prefix = self.line_prefix(pos);
        self.partial
            .completions
            .iter()
            .chain(&self.full.completions)
            .filter(|proposal| proposal.applies_at(pos, prefix))
            .flat_map(|proposal| &proposal.items)
            .collect()
    }

    /// The narrowest hover covering `pos`.
    pub fn hover_at(&self, pos: Position) -> Option<&Hover> {
        self.partial
            .hovers
            .iter()
            .chain(&self.full.hovers)
            .filter(|hover| hover.range.contains(pos))
            .min_by_key(|hover| std::ops::Range::<usize>::from(self.index.span(hover.range)).len())
    }

    /// Declarations linked from `pos`.
    pub fn definitions_at(&self, pos: Position) -> Vec<&RangeLink> {
        self.partial
            .range_links
            .iter()
            .chain(&self.full.range_links)
            .filter(|link| link.from.contains(pos))
            .collect()
    }

    /// The highlight that wins at `pos`.
    pub fn highlight_at(&self, pos: Position) -> Option<SemanticTokenType> {
        self.full
            .highlights
            .iter()
            .chain(&self.partial.highlights)
            .find(|h| h.range.contains(pos))
            .map(|h| h.token_type)
    }
}

/// Validate the `##` header, if it reads as a mapping, and return its
/// result with the declared file type when that is valid.
fn read_metadata(
    id: DocumentId,
    uri: &str,
    source: &str,
    index: &LineIndex,
    bindings: &SchemaBindings,
    data: &MythicData,
) -> (ValidationResult, Option<String>) {
    let Some(header) = header_source(source) else {
        return (ValidationResult::new(), None);
    };
    let parsed = parse(&header);
    let Some(root @ Node::Mapping(mapping)) = &parsed.root else {
        return (ValidationResult::new(), None);
    };

    let registry = Registry::new();
    let cx = Context {
        document: id,
        uri,
        source: &header,
        index,
        registry: &registry,
        data,
        parent: None,
    };
    let result = metadata(bindings.kinds()).partial_process(&cx, root);
    let declared = mapping
        .get(FILE_TYPE)
        .and_then(Node::as_scalar)
        .filter(|_| result.is_valid())
        .map(|scalar| scalar.text.clone());
    (result, declared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComponentKind;

    const SKILL_URI: &str = "file:///srv/MythicMobs/Skills/heal.yml";

    fn processed(uri: &str, source: &str) -> Document {
        let data = MythicData::default();
        let mut doc =
            Document::new(DocumentId::new(0), uri, source, &SchemaBindings::default(), &data);
        let registry = Registry::new();
        doc.partial_process(&registry, &data);
        let own = doc.components().clone();
        doc.full_process(&own, &data);
        doc
    }

    fn codes(doc: &Document) -> Vec<DiagnosticCode> {
        doc.diagnostics().map(|d| d.code).collect()
    }

    #[test]
    fn test_bound_by_path() {
        let doc = processed(SKILL_URI, "heal1:\n  Skills:\n  - heal{a=10} @Self\n");
        assert_eq!(doc.kind(), Some("metaskill"));
        assert!(codes(&doc).is_empty(), "{:?}", codes(&doc));
        assert!(doc.components().get(ComponentKind::Skill, "heal1").is_some());
    }

    #[test]
    fn test_file_type_overrides_path() {
        let source = "## FileType: mob\nKing:\n  Type: ZOMBIE\n";
        let doc = processed(SKILL_URI, source);
        assert_eq!(doc.kind(), Some("mob"));
        assert!(codes(&doc).is_empty(), "{:?}", codes(&doc));
        assert!(doc.components().get(ComponentKind::Mob, "King").is_some());
        assert_eq!(
            doc.highlight_at(Position::new(0, 14)),
            Some(SemanticTokenType::EnumMember)
        );
    }

    #[test]
    fn test_invalid_file_type_falls_back_to_path() {
        let doc = processed(SKILL_URI, "## FileType: mobs\nheal1:\n  Skills: []\n");
        assert_eq!(doc.kind(), Some("metaskill"));
        assert_eq!(codes(&doc), [DiagnosticCode::YamlInvalidValue]);
        let range = doc.diagnostics().next().unwrap().range;
        assert_eq!(range.start, Position::new(0, 13));
    }

    #[test]
    fn test_doc_comment_is_not_a_header() {
        let doc = processed(SKILL_URI, "## Heals the caster.\nheal1:\n  Skills: []\n");
        assert!(codes(&doc).is_empty(), "{:?}", codes(&doc));
    }

    #[test]
    fn test_unbound_document() {
        let doc = processed("file:///tmp/notes.yml", "anything: [1, 2]\n");
        assert_eq!(doc.kind(), None);
        assert!(codes(&doc).is_empty());
        assert_eq!(doc.highlight_at(Position::new(0, 2)), Some(SemanticTokenType::Property));
        assert_eq!(doc.highlight_at(Position::new(0, 11)), Some(SemanticTokenType::String));
    }

    #[test]
    fn test_syntax_errors_are_diagnostics() {
        let doc = processed(SKILL_URI, "heal1:\n  Skills:\n  - \"heal{a=10}\n");
        let syntax: Vec<_> = doc
            .diagnostics()
            .filter(|d| d.code == DiagnosticCode::YamlSyntax)
            .collect();
        assert_eq!(syntax.len(), 1);
        assert_eq!(syntax[0].message, "unterminated string");
        assert!(doc.has_errors());
    }

    #[test]
    fn test_schema_highlight_wins_over_base() {
        let doc = processed(SKILL_URI, "heal1:\n  Skills:\n  - heal{a=10} @Self\n");
        assert_eq!(doc.highlight_at(Position::new(0, 1)), Some(SemanticTokenType::Function));
        assert_eq!(doc.highlight_at(Position::new(2, 5)), Some(SemanticTokenType::Function));
        assert_eq!(doc.highlight_at(Position::new(2, 17)), Some(SemanticTokenType::Class));
    }

    #[test]
    fn test_line_prefix() {
        let doc = processed(SKILL_URI, "heal1:\n  Sk\n");
        assert_eq!(doc.line_prefix(Position::new(1, 4)), "  Sk");
        assert_eq!(doc.line_prefix(Position::new(1, 99)), "  Sk");
        assert_eq!(doc.line_prefix(Position::new(7, 0)), "");
    }

    #[test]
    fn test_property_completions() {
        let doc = processed(SKILL_URI, "heal1:\n  Skills: []\n\n");
        let labels: Vec<_> = doc
            .completions_at(Position::new(2, 2))
            .into_iter()
            .map(|item| item.label.as_str())
            .collect();
        assert!(labels.contains(&"Cooldown"), "{labels:?}");
        assert!(!labels.contains(&"Skills"), "{labels:?}");
    }

    #[test]
    fn test_hover_on_property_key() {
        let doc = processed(SKILL_URI, "heal1:\n  Cooldown: 1\n  Skills: []\n");
        let hover = doc.hover_at(Position::new(1, 4)).unwrap();
        assert!(hover.contents.contains("Cooldown"), "{}", hover.contents);
    }
}
