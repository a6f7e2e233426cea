//! Diagnostic records and their rendering.

use ariadne::{Color, IndexType, Label, Report, ReportKind, Source};
use mythic_tree::{LineIndex, Range, ariadne_config};
use serde::{Serialize, Serializer};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

/// Stable machine-readable diagnostic codes.
///
/// Consumers key behavior off these codes, never off message text, so the
/// strings returned by [`DiagnosticCode::as_str`] must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticCode {
    /// The document could not be read as YAML.
    YamlSyntax,
    /// Wrong node shape: expected object/list/scalar.
    YamlInvalidType,
    YamlMissingProperty,
    YamlDuplicateProperty,
    YamlMissingValue,
    YamlUnexpectedProperty,
    YamlTooManyItems,
    YamlTooFewItems,
    YamlDuplicateItem,
    /// A scalar failed its matcher (including unresolved references).
    YamlInvalidValue,
    YamlOutOfRange,
    YamlNotInteger,
    LineConfigMismatchedBraces,
    LineConfigInvalidBlockSyntax,
    LineConfigDuplicateKey,
    LineConfigExpectedEquals,
    SkillTooManyTargeters,
    SkillTooManyTriggers,
    SkillTriggersNotAllowed,
    SkillTooManyChances,
    SkillInvalidChance,
    ComponentWhitespace,
    DuplicateComponent,
    CooldownTick,
    ItemInvalidPotionEffects,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::YamlSyntax => "yaml-syntax",
            DiagnosticCode::YamlInvalidType => "yaml-invalid-type",
            DiagnosticCode::YamlMissingProperty => "yaml-missing-property",
            DiagnosticCode::YamlDuplicateProperty => "yaml-duplicate-property",
            DiagnosticCode::YamlMissingValue => "yaml-missing-value",
            DiagnosticCode::YamlUnexpectedProperty => "yaml-unexpected-property",
            DiagnosticCode::YamlTooManyItems => "yaml-too-many-items",
            DiagnosticCode::YamlTooFewItems => "yaml-too-few-items",
            DiagnosticCode::YamlDuplicateItem => "yaml-duplicate-item",
            DiagnosticCode::YamlInvalidValue => "yaml-invalid-value",
            DiagnosticCode::YamlOutOfRange => "yaml-out-of-range",
            DiagnosticCode::YamlNotInteger => "yaml-not-integer",
            DiagnosticCode::LineConfigMismatchedBraces => "lineconfig-mismatched-braces",
            DiagnosticCode::LineConfigInvalidBlockSyntax => "lineconfig-invalid-block-syntax",
            DiagnosticCode::LineConfigDuplicateKey => "lineconfig-duplicate-key",
            DiagnosticCode::LineConfigExpectedEquals => "lineconfig-expected-equals",
            DiagnosticCode::SkillTooManyTargeters => "mythic-skill-too-many-targeters",
            DiagnosticCode::SkillTooManyTriggers => "mythic-skill-too-many-triggers",
            DiagnosticCode::SkillTriggersNotAllowed => "mythic-skill-triggers-not-allowed",
            DiagnosticCode::SkillTooManyChances => "mythic-skill-too-many-chances",
            DiagnosticCode::SkillInvalidChance => "mythic-skill-invalid-chance",
            DiagnosticCode::ComponentWhitespace => "mythic-component-whitespace",
            DiagnosticCode::DuplicateComponent => "mythic-duplicate-component",
            DiagnosticCode::CooldownTick => "mythic-cooldown-tick",
            DiagnosticCode::ItemInvalidPotionEffects => "mythic-item-invalid-potion-effects",
        }
    }

    /// Severity used when a diagnostic is created without an explicit one.
    pub fn default_severity(self) -> Severity {
        match self {
            DiagnosticCode::CooldownTick => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
    pub code: DiagnosticCode,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, range: Range, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
            code,
            severity: code.default_severity(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Render this diagnostic with ariadne.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &LineIndex::new(source), &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.message.clone())
    }

    /// Write the report for this diagnostic to a writer.
    pub fn write_report<W: std::io::Write>(
        &self,
        filename: &str,
        source: &str,
        index: &LineIndex,
        writer: W,
    ) {
        let range: std::ops::Range<usize> = index.span(self.range).into();
        let (kind, color) = match self.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
            Severity::Information | Severity::Hint => (ReportKind::Advice, Color::Blue),
        };

        let _ = Report::build(kind, (filename, range.clone()))
            .with_config(ariadne_config().with_index_type(IndexType::Byte))
            .with_code(self.code.as_str())
            .with_message(&self.message)
            .with_label(
                Label::new((filename, range))
                    .with_message(&self.message)
                    .with_color(color),
            )
            .finish()
            .write((filename, Source::from(source)), writer);
    }
}

/// Render a set of diagnostics for one source text.
pub fn render_diagnostics(filename: &str, source: &str, diagnostics: &[Diagnostic]) -> String {
    let index = LineIndex::new(source);
    let mut output = Vec::new();
    for diagnostic in diagnostics {
        diagnostic.write_report(filename, source, &index, &mut output);
    }
    String::from_utf8_lossy(&output).into_owned()
}
