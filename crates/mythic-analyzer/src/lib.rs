#![doc = include_str!("../README.md")]

mod completion;
mod component;
mod context;
mod data;
mod diagnostic;
mod highlight;
mod resolve;
mod result;

pub mod binding;
pub mod document;
pub mod lineconfig;
pub mod schema;
pub mod schemas;
pub mod suggest;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use binding::{Binding, SchemaBindings};
pub use completion::{CompletionGuard, CompletionItem, CompletionItemKind, CompletionProposal};
pub use component::{
    Component, ComponentKind, Declaration, Registry, component, link_component,
    parse_documentation,
};
pub use context::Context;
pub use data::{LoadDataError, MythicData};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, render_diagnostics};
pub use document::{Document, DocumentId};
pub use highlight::{Highlight, SemanticTokenType, TokenModifier};
pub use resolve::Resolvable;
pub use result::{Hover, RangeLink, ValidationResult};
pub use schema::{Hook, Schema, SchemaKind};
pub use workspace::{Workspace, WorkspaceError};
