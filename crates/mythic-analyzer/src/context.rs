//! The environment a schema sees while processing a node.

use mythic_tree::{LineIndex, Mapping, Range, Span};

use crate::{DocumentId, MythicData, Registry};

/// Everything a schema needs besides the node itself.
///
/// `registry` holds the components declared by the *other* loaded documents
/// during partial processing; during full processing it also includes the
/// current document's own components.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub document: DocumentId,
    pub uri: &'a str,
    pub source: &'a str,
    pub index: &'a LineIndex,
    pub registry: &'a Registry,
    pub data: &'a MythicData,
    /// The mapping containing the pair whose value is being processed.
    pub parent: Option<&'a Mapping>,
}

impl<'a> Context<'a> {
    pub fn range(&self, span: Span) -> Range {
        self.index.range(span)
    }

    pub fn slice(&self, span: Span) -> &'a str {
        let source: &'a str = self.source;
        source
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }

    /// A child context whose parent mapping is `parent`.
    pub fn with_parent<'b>(&self, parent: &'b Mapping) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            document: self.document,
            uri: self.uri,
            source: self.source,
            index: self.index,
            registry: self.registry,
            data: self.data,
            parent: Some(parent),
        }
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("document", &self.document)
            .field("uri", &self.uri)
            .field("has_parent", &self.parent.is_some())
            .finish_non_exhaustive()
    }
}
