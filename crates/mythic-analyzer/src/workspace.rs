//! The set of loaded documents and their shared component registry.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{Document, DocumentId, MythicData, Registry, SchemaBindings};

/// Loaded documents keyed by uri, in load order.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    bindings: SchemaBindings,
    data: MythicData,
    documents: IndexMap<String, Document>,
    next_id: u32,
}

impl Workspace {
    pub fn new(bindings: SchemaBindings, data: MythicData) -> Self {
        Self {
            bindings,
            data,
            documents: IndexMap::new(),
            next_id: 0,
        }
    }

    pub fn bindings(&self) -> &SchemaBindings {
        &self.bindings
    }

    pub fn data(&self) -> &MythicData {
        &self.data
    }

    /// Load or replace the document at `uri`.
    ///
    /// A replaced document keeps its id, so it keeps its place in the
    /// first-declaration-wins order of components.
    pub fn load(&mut self, uri: impl Into<String>, source: impl Into<String>) -> DocumentId {
        let uri = uri.into();
        let id = match self.documents.get(&uri) {
            Some(existing) => existing.id(),
            None => {
                let id = DocumentId::new(self.next_id);
                self.next_id += 1;
                id
            }
        };
        let document = Document::new(id, uri.clone(), source, &self.bindings, &self.data);
        debug!(uri, id = id.get(), kind = document.kind(), "loaded document");
        self.documents.insert(uri, document);
        id
    }

    /// Read a file from disk and load it under its `file://` uri.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<DocumentId, WorkspaceError> {
        let path = path.as_ref();
        let io_error = |error| WorkspaceError::Io {
            path: path.to_path_buf(),
            error,
        };
        let source = std::fs::read_to_string(path).map_err(|e| {
            warn!(?path, "unreadable document");
            io_error(e)
        })?;
        let absolute = std::path::absolute(path).map_err(io_error)?;
        Ok(self.load(file_uri(&absolute), source))
    }

    /// Forget the document at `uri`. Its components disappear from the
    /// registry the next time another document is processed.
    pub fn unload(&mut self, uri: &str) -> Option<Document> {
        let removed = self.documents.shift_remove(uri);
        if removed.is_some() {
            debug!(uri, "unloaded document");
        }
        removed
    }

    pub fn document(&self, uri: &str) -> Option<&Document> {
        self.documents.get(uri)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Every component declared by a loaded document, merged.
    pub fn components(&self) -> Registry {
        self.registry_where(|_| true)
    }

    fn registry_where(&self, include: impl Fn(DocumentId) -> bool) -> Registry {
        let mut registry = Registry::new();
        for document in self.documents.values().filter(|d| include(d.id())) {
            registry.merge(document.components().clone());
        }
        registry
    }

    /// Run the local pass over `uri` against the components of every other
    /// document.
    ///
    /// Later-loaded documents declaring an id this one also declares are
    /// processed again, so the earliest declaration wins whatever order the
    /// passes run in.
    pub fn partial_process(&mut self, uri: &str) -> Result<(), WorkspaceError> {
        let id = self.id_of(uri)?;
        self.partial_process_document(uri, id);

        let Some(declared) = self.documents.get(uri).map(|d| d.components().clone()) else {
            return Ok(());
        };
        let colliding: Vec<(String, DocumentId)> = self
            .documents
            .iter()
            .filter(|(_, other)| other.id() > id)
            .filter(|(_, other)| {
                declared
                    .iter()
                    .any(|c| other.components().get(c.kind, &c.id).is_some())
            })
            .map(|(uri, other)| (uri.clone(), other.id()))
            .collect();
        for (uri, other) in colliding {
            debug!(uri, "reprocessing later declaration");
            self.partial_process_document(&uri, other);
        }
        Ok(())
    }

    fn partial_process_document(&mut self, uri: &str, id: DocumentId) {
        let registry = self.registry_where(|other| other != id);
        if let Some(document) = self.documents.get_mut(uri) {
            document.partial_process(&registry, &self.data);
        }
    }

    /// Run the cross-document pass over `uri`.
    pub fn full_process(&mut self, uri: &str) -> Result<(), WorkspaceError> {
        self.id_of(uri)?;
        let registry = self.components();
        if let Some(document) = self.documents.get_mut(uri) {
            document.full_process(&registry, &self.data);
        }
        Ok(())
    }

    /// Partial-process every document, then full-process every document.
    pub fn process_all(&mut self) {
        let uris: Vec<String> = self.documents.keys().cloned().collect();
        for uri in &uris {
            let id = self.documents[uri.as_str()].id();
            self.partial_process_document(uri, id);
        }
        let registry = self.components();
        for document in self.documents.values_mut() {
            document.full_process(&registry, &self.data);
        }
        let diagnostics: usize = self.documents.values().map(|d| d.diagnostics().count()).sum();
        info!(
            documents = self.documents.len(),
            components = registry.len(),
            diagnostics,
            "processed workspace"
        );
    }

    fn id_of(&self, uri: &str) -> Result<DocumentId, WorkspaceError> {
        self.documents
            .get(uri)
            .map(Document::id)
            .ok_or_else(|| WorkspaceError::NotLoaded(uri.to_string()))
    }
}

fn file_uri(path: &Path) -> String {
    let path = path.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        format!("file://{path}")
    } else {
        format!("file:///{path}")
    }
}

/// Error from a workspace operation.
#[derive(Debug)]
pub enum WorkspaceError {
    Io { path: PathBuf, error: std::io::Error },
    NotLoaded(String),
}

impl std::fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkspaceError::Io { path, error } => {
                write!(f, "Failed to read {}: {}", path.display(), error)
            }
            WorkspaceError::NotLoaded(uri) => write!(f, "No document loaded at {uri}"),
        }
    }
}

impl std::error::Error for WorkspaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkspaceError::Io { error, .. } => Some(error),
            WorkspaceError::NotLoaded(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentKind, DiagnosticCode};

    const A: &str = "file:///srv/MythicMobs/Skills/a.yml";
    const B: &str = "file:///srv/MythicMobs/Skills/b.yml";
    const C: &str = "file:///srv/MythicMobs/Skills/c.yml";

    fn codes(workspace: &Workspace, uri: &str) -> Vec<DiagnosticCode> {
        workspace.document(uri).unwrap().diagnostics().map(|d| d.code).collect()
    }

    #[test]
    fn test_reload_keeps_id() {
        let mut workspace = Workspace::default();
        let a = workspace.load(A, "x:\n  Skills: []\n");
        let b = workspace.load(B, "y:\n  Skills: []\n");
        assert_eq!(workspace.load(A, "z:\n  Skills: []\n"), a);
        assert!(a < b);
        assert_eq!(workspace.len(), 2);
    }

    #[test]
    fn test_first_declaration_wins() {
        let mut workspace = Workspace::default();
        for uri in [A, B, C] {
            workspace.load(uri, "heal1:\n  Skills: []\n");
        }
        workspace.process_all();
        assert!(codes(&workspace, A).is_empty());
        assert_eq!(codes(&workspace, B), [DiagnosticCode::DuplicateComponent]);
        assert_eq!(codes(&workspace, C), [DiagnosticCode::DuplicateComponent]);

        let registry = workspace.components();
        let heal = registry.get(ComponentKind::Skill, "heal1").unwrap();
        assert_eq!(heal.declarations.len(), 1);
        assert_eq!(heal.declarations[0].uri, A);
    }

    #[test]
    fn test_first_declaration_wins_in_any_pass_order() {
        let mut workspace = Workspace::default();
        for uri in [A, B, C] {
            workspace.load(uri, "heal1:\n  Skills: []\n");
        }
        for uri in [C, B, A] {
            workspace.partial_process(uri).unwrap();
        }
        for uri in [A, B, C] {
            workspace.full_process(uri).unwrap();
        }
        assert!(codes(&workspace, A).is_empty());
        assert_eq!(codes(&workspace, B), [DiagnosticCode::DuplicateComponent]);
        assert_eq!(codes(&workspace, C), [DiagnosticCode::DuplicateComponent]);

        let registry = workspace.components();
        let heal = registry.get(ComponentKind::Skill, "heal1").unwrap();
        assert_eq!(heal.declarations.len(), 1);
        assert_eq!(heal.declarations[0].uri, A);
    }

    #[test]
    fn test_header_bound_document_uses_workspace_data() {
        let data = MythicData {
            entity_types: vec!["WARDEN_KING".to_string()],
            ..MythicData::default()
        };
        let mut workspace = Workspace::new(SchemaBindings::default(), data);
        workspace.load(A, "## FileType: mob\nKing:\n  Type: WARDEN_KING\n");
        workspace.process_all();
        assert_eq!(workspace.document(A).unwrap().kind(), Some("mob"));
        assert!(codes(&workspace, A).is_empty(), "{:?}", codes(&workspace, A));
    }

    #[test]
    fn test_unload_drops_components() {
        let mut workspace = Workspace::default();
        workspace.load(A, "heal1:\n  Skills: []\n");
        workspace.load(B, "heal1:\n  Skills: []\n");
        workspace.process_all();
        assert!(workspace.unload(A).is_some());
        workspace.partial_process(B).unwrap();
        assert!(codes(&workspace, B).is_empty());
        assert!(workspace.unload(A).is_none());
    }

    #[test]
    fn test_unknown_uri() {
        let mut workspace = Workspace::default();
        let error = workspace.full_process(A).unwrap_err();
        assert_eq!(error.to_string(), format!("No document loaded at {A}"));
    }

    #[test]
    fn test_load_missing_file() {
        let mut workspace = Workspace::default();
        let error = workspace.load_file("/definitely/not/here.yml").unwrap_err();
        assert!(matches!(error, WorkspaceError::Io { .. }));
        assert!(workspace.is_empty());
    }

    #[test]
    fn test_file_uri() {
        assert_eq!(file_uri(Path::new("/a/b.yml")), "file:///a/b.yml");
        assert_eq!(file_uri(Path::new("C:\\a\\b.yml")), "file:///C:/a/b.yml");
    }
}
