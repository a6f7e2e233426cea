//! Syntax errors produced while reading a document.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::Span;

/// Kind of syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A quoted scalar is missing its closing quote on the same line.
    UnterminatedString,
    /// A `[` without its matching `]`.
    UnclosedSequence,
    /// A `{` without its matching `}`.
    UnclosedMapping,
    /// A line is indented deeper than the block it belongs to.
    UnexpectedIndentation,
    /// Text that fits nowhere in the surrounding structure.
    UnexpectedContent,
    /// Tab characters used for indentation.
    TabIndentation,
}

impl ParseErrorKind {
    fn help(self) -> &'static str {
        match self {
            ParseErrorKind::UnterminatedString => "add the closing quote",
            ParseErrorKind::UnclosedSequence => "add a closing ']'",
            ParseErrorKind::UnclosedMapping => "add a closing '}'",
            ParseErrorKind::UnexpectedIndentation => "align this line with its siblings",
            ParseErrorKind::UnexpectedContent => "remove this text or quote the whole value",
            ParseErrorKind::TabIndentation => "indent with spaces",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ParseErrorKind::UnterminatedString => "unterminated string",
            ParseErrorKind::UnclosedSequence => "unclosed list",
            ParseErrorKind::UnclosedMapping => "unclosed object",
            ParseErrorKind::UnexpectedIndentation => "unexpected indentation",
            ParseErrorKind::UnexpectedContent => "unexpected content",
            ParseErrorKind::TabIndentation => "tabs are not allowed for indentation",
        };
        f.write_str(msg)
    }
}

/// A syntax error with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Render this error with ariadne.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.to_string())
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let range: std::ops::Range<usize> = self.span.into();
        let _ = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_config(ariadne_config())
            .with_message(self.kind.to_string())
            .with_label(
                Label::new((filename, range))
                    .with_message(self.kind.to_string())
                    .with_color(Color::Red),
            )
            .with_help(self.kind.help())
            .finish()
            .write((filename, Source::from(source)), writer);
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}..{}", self.kind, self.span.start, self.span.end)
    }
}

impl std::error::Error for ParseError {}

/// Get ariadne config, respecting the NO_COLOR env var.
pub fn ariadne_config() -> Config {
    if std::env::var("NO_COLOR").is_ok() {
        Config::default().with_color(false)
    } else {
        Config::default()
    }
}
