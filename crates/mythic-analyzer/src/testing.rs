//! Test fixtures shared by the unit tests.

use mythic_tree::{LineIndex, Node, Parsed, parse};

use crate::{Context, DocumentId, MythicData, Registry};

/// A parsed source text plus everything a [`Context`] borrows.
pub(crate) struct Fixture {
    source: String,
    index: LineIndex,
    parsed: Parsed,
    registry: Registry,
    data: MythicData,
    document: DocumentId,
    uri: String,
}

impl Fixture {
    pub(crate) fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            index: LineIndex::new(source),
            parsed: parse(source),
            registry: Registry::new(),
            data: MythicData::default(),
            document: DocumentId::new(0),
            uri: "file:///test.yml".to_string(),
        }
    }

    pub(crate) fn with_document(mut self, document: DocumentId) -> Self {
        self.document = document;
        self
    }

    pub(crate) fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub(crate) fn with_data(mut self, data: MythicData) -> Self {
        self.data = data;
        self
    }

    pub(crate) fn cx(&self) -> Context<'_> {
        Context {
            document: self.document,
            uri: &self.uri,
            source: &self.source,
            index: &self.index,
            registry: &self.registry,
            data: &self.data,
            parent: None,
        }
    }

    pub(crate) fn root(&self) -> &Node {
        self.parsed.root.as_ref().expect("fixture source has a root node")
    }
}
