//! The `##` header at the top of a document.
//!
//! ```yaml
//! ## FileType: metaskill
//! heal1:
//!   Skills: [heal 10]
//! ```

use crate::Schema;
use crate::schema::{ObjectSchema, Property, StringSchema};
use crate::SemanticTokenType;

pub const FILE_TYPE: &str = "FileType";

/// The metadata header's schema; `FileType` must be one of `kinds`.
pub fn metadata<I, S>(kinds: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ObjectSchema::new([(
        FILE_TYPE,
        Property::new(StringSchema::enumeration(kinds).highlight(SemanticTokenType::EnumMember))
            .description(
                "The type of file this document represents. Useful when the file type cannot be \
                 determined from its path.",
            ),
    )])
    .into()
}

/// Text of the metadata header with every `##` replaced by two spaces, so
/// that offsets are the same as in `source`. `None` without a header.
pub fn header_source(source: &str) -> Option<String> {
    let mut header = String::new();
    for line in source.split_inclusive('\n') {
        let Some(rest) = line.strip_prefix("##") else {
            break;
        };
        header.push_str("  ");
        header.push_str(rest);
    }
    (!header.is_empty()).then_some(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticCode;
    use crate::testing::Fixture;

    #[test]
    fn test_header_source() {
        assert_eq!(
            header_source("## FileType: mob\n##Other: 1\nfoo:\n## not header\n").as_deref(),
            Some("   FileType: mob\n  Other: 1\n")
        );
        assert_eq!(header_source("foo: 1\n"), None);
    }

    #[test]
    fn test_file_type() {
        let schema = metadata(["metaskill", "mob", "item"]);
        let fixture = Fixture::new("  FileType: MOB\n");
        assert!(schema.partial_process(&fixture.cx(), fixture.root()).diagnostics.is_empty());

        let fixture = Fixture::new("  FileType: mobs\n");
        let result = schema.partial_process(&fixture.cx(), fixture.root());
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::YamlInvalidValue);
        assert!(result.diagnostics[0].message.ends_with("Did you mean `mob`?"));
    }
}
