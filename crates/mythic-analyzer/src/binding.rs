//! Which schema validates which document.

use glob::{Pattern, PatternError};
use tracing::debug;

use crate::Schema;
use crate::schemas::{item, metaskill, mob};

const SKILL_KIND: &str = "metaskill";
const MOB_KIND: &str = "mob";
const ITEM_KIND: &str = "item";

/// A path pattern bound to the schema of one document kind.
#[derive(Clone)]
pub struct Binding {
    pub pattern: Pattern,
    pub schema: Schema,
    /// The kind id, as written in a `## FileType:` header.
    pub kind: String,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("pattern", &self.pattern.as_str())
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// An ordered list of bindings; the first match wins.
#[derive(Debug, Clone)]
pub struct SchemaBindings {
    bindings: Vec<Binding>,
}

impl Default for SchemaBindings {
    /// Bindings for the MythicMobs plugin folder layout, including packs.
    fn default() -> Self {
        let mut bindings = Self::empty();
        let kinds = [
            ("Skills", SKILL_KIND, metaskill()),
            ("Mobs", MOB_KIND, mob()),
            ("Items", ITEM_KIND, item()),
        ];
        for (folder, kind, schema) in kinds {
            for root in ["**/MythicMobs", "**/MythicMobs/Packs/*"] {
                for extension in ["yml", "yaml"] {
                    let pattern = format!("{root}/{folder}/**/*.{extension}");
                    if let Ok(pattern) = Pattern::new(&pattern) {
                        bindings.push_pattern(pattern, schema.clone(), kind);
                    }
                }
            }
        }
        bindings
    }
}

impl SchemaBindings {
    /// No bindings at all.
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Append a binding; it is consulted after every existing one.
    pub fn push(
        &mut self,
        pattern: &str,
        schema: Schema,
        kind: impl Into<String>,
    ) -> Result<(), PatternError> {
        let pattern = Pattern::new(pattern)?;
        self.push_pattern(pattern, schema, kind);
        Ok(())
    }

    fn push_pattern(&mut self, pattern: Pattern, schema: Schema, kind: impl Into<String>) {
        self.bindings.push(Binding {
            pattern,
            schema,
            kind: kind.into(),
        });
    }

    /// The first binding whose pattern matches `uri`. A `file://` scheme is
    /// ignored.
    pub fn find(&self, uri: &str) -> Option<&Binding> {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        let found = self.bindings.iter().find(|b| b.pattern.matches(path));
        debug!(path, kind = found.map(|b| b.kind.as_str()), "binding lookup");
        found
    }

    /// The first binding of `kind`, compared case-insensitively.
    pub fn by_kind(&self, kind: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|b| b.kind.eq_ignore_ascii_case(kind))
    }

    /// Every distinct kind id, in binding order.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = Vec::new();
        for binding in &self.bindings {
            if !kinds.contains(&binding.kind.as_str()) {
                kinds.push(&binding.kind);
            }
        }
        kinds
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(bindings: &SchemaBindings, path: &str) -> Option<String> {
        bindings.find(path).map(|b| b.kind.clone())
    }

    #[test]
    fn test_default_paths() {
        let bindings = SchemaBindings::default();
        assert_eq!(
            kind_of(&bindings, "file:///srv/plugins/MythicMobs/Skills/heal.yml").as_deref(),
            Some("metaskill")
        );
        assert_eq!(
            kind_of(&bindings, "/srv/plugins/MythicMobs/Mobs/bosses/king.yaml").as_deref(),
            Some("mob")
        );
        assert_eq!(
            kind_of(&bindings, "/srv/plugins/MythicMobs/Packs/extra/Items/sword.yml").as_deref(),
            Some("item")
        );
        assert_eq!(kind_of(&bindings, "/srv/plugins/MythicMobs/config.yml"), None);
        assert_eq!(kind_of(&bindings, "/srv/plugins/MythicMobs/Skills/notes.txt"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let mut bindings = SchemaBindings::empty();
        bindings.push("**/special/*.yml", Schema::any(), "first").unwrap();
        bindings.push("**/*.yml", Schema::any(), "second").unwrap();
        assert_eq!(kind_of(&bindings, "a/special/x.yml").as_deref(), Some("first"));
        assert_eq!(kind_of(&bindings, "a/other/x.yml").as_deref(), Some("second"));
    }

    #[test]
    fn test_kinds() {
        let bindings = SchemaBindings::default();
        assert_eq!(bindings.kinds(), ["metaskill", "mob", "item"]);
        assert_eq!(bindings.by_kind("MOB").map(|b| b.kind.as_str()), Some("mob"));
        assert!(bindings.by_kind("npc").is_none());
    }

    #[test]
    fn test_invalid_pattern() {
        let mut bindings = SchemaBindings::empty();
        assert!(bindings.push("a/***/b", Schema::any(), "bad").is_err());
    }
}
