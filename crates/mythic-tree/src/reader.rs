//! Reader for the block-style YAML subset used by MythicMobs configuration.
//!
//! Block structure is handled line by line; flow collections (`[...]`,
//! `{...}`) are scanned byte by byte and may span lines. Reading never
//! fails: anything that does not fit is reported as a [`ParseError`] and
//! skipped.

use tracing::trace;

use crate::{
    Mapping, Node, Pair, ParseError, ParseErrorKind, Scalar, ScalarStyle, ScalarValue, Sequence,
    Span,
};

/// Result of reading a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// The root node, or `None` for a document without content.
    pub root: Option<Node>,
    pub errors: Vec<ParseError>,
}

/// Read `source` into a positioned tree.
pub fn parse(source: &str) -> Parsed {
    let mut reader = Reader::new(source);
    let root = reader.read_document();
    Parsed {
        root,
        errors: reader.errors,
    }
}

#[derive(Debug, Clone, Copy)]
struct Line {
    start: u32,
    /// End of the line, before any `\r\n` or `\n`.
    end: u32,
    indent: u32,
    /// Offset of the first non-blank byte; equal to `end` for blank lines.
    content: u32,
}

struct Reader<'src> {
    source: &'src str,
    bytes: &'src [u8],
    lines: Vec<Line>,
    /// Index of the next unconsumed line.
    line: usize,
    errors: Vec<ParseError>,
}

impl<'src> Reader<'src> {
    fn new(source: &'src str) -> Self {
        let bytes = source.as_bytes();
        let mut lines = Vec::new();
        let mut errors = Vec::new();
        let mut seen_content = false;
        let mut start = 0usize;

        while start <= bytes.len() {
            let newline = bytes[start..].iter().position(|&b| b == b'\n');
            let mut end = newline.map(|n| start + n).unwrap_or(bytes.len());
            let next = newline.map(|n| start + n + 1);
            if end > start && bytes[end - 1] == b'\r' {
                end -= 1;
            }

            let mut content = start;
            while content < end && matches!(bytes[content], b' ' | b'\t') {
                content += 1;
            }
            let text = &source[content..end];
            let is_marker = content == start && (text.trim_end() == "---" || text.trim_end() == "...");

            if is_marker && seen_content {
                break;
            }
            if is_marker {
                content = end;
            } else if content < end && bytes[content] != b'#' {
                seen_content = true;
                if bytes[start..content].contains(&b'\t') {
                    errors.push(ParseError::new(
                        ParseErrorKind::TabIndentation,
                        Span::new(start as u32, content as u32),
                    ));
                }
            }

            lines.push(Line {
                start: start as u32,
                end: end as u32,
                indent: (content - start) as u32,
                content: content as u32,
            });

            match next {
                Some(next) => start = next,
                None => break,
            }
        }

        Self {
            source,
            bytes,
            lines,
            line: 0,
            errors,
        }
    }

    fn error(&mut self, kind: ParseErrorKind, span: Span) {
        trace!(?kind, ?span, "syntax error");
        self.errors.push(ParseError::new(kind, span));
    }

    fn is_trivia(&self, line: &Line) -> bool {
        line.content == line.end || self.bytes[line.content as usize] == b'#'
    }

    /// Index of the next line with content, without consuming anything.
    fn peek_content_line(&self) -> Option<usize> {
        (self.line..self.lines.len()).find(|&i| !self.is_trivia(&self.lines[i]))
    }

    /// Consume blank and comment lines, returning the comment block that
    /// directly precedes the next content line.
    fn take_comment(&mut self) -> Option<String> {
        let mut block: Vec<&str> = Vec::new();
        while let Some(line) = self.lines.get(self.line).copied() {
            if line.content == line.end {
                block.clear();
            } else if self.bytes[line.content as usize] == b'#' {
                let text = &self.source[line.content as usize + 1..line.end as usize];
                block.push(text.strip_prefix(' ').unwrap_or(text));
            } else {
                break;
            }
            self.line += 1;
        }
        (!block.is_empty()).then(|| block.join("\n"))
    }

    fn line_of(&self, offset: u32) -> usize {
        self.lines
            .partition_point(|l| l.start <= offset)
            .saturating_sub(1)
    }

    fn skip_spaces(&self, mut pos: u32, end: u32) -> u32 {
        while pos < end && matches!(self.bytes[pos as usize], b' ' | b'\t') {
            pos += 1;
        }
        pos
    }

    fn is_sequence_item(&self, line: &Line) -> bool {
        let c = line.content as usize;
        self.bytes[c] == b'-'
            && (c + 1 == line.end as usize || matches!(self.bytes[c + 1], b' ' | b'\t'))
    }

    /// Offset of the `:` that ends a mapping key on this line, if the line
    /// starts a key/value pair.
    fn key_colon(&self, line: &Line) -> Option<u32> {
        let b = self.bytes;
        let start = line.content as usize;
        let end = line.end as usize;
        let ends_key = |i: usize| i + 1 == end || matches!(b[i + 1], b' ' | b'\t');

        match b[start] {
            b'"' | b'\'' => {
                let close = quoted_end(b, start, end)?;
                let colon = self.skip_spaces(close as u32, line.end) as usize;
                (colon < end && b[colon] == b':' && ends_key(colon)).then_some(colon as u32)
            }
            b'[' | b'{' => None,
            _ => {
                let mut depth = 0i32;
                for i in start..end {
                    match b[i] {
                        b'{' => depth += 1,
                        b'}' => depth -= 1,
                        b'#' if i > start && matches!(b[i - 1], b' ' | b'\t') => return None,
                        b':' if depth <= 0 && ends_key(i) => return Some(i as u32),
                        _ => {}
                    }
                }
                None
            }
        }
    }

    fn read_document(&mut self) -> Option<Node> {
        let root = match self.peek_content_line() {
            Some(idx) => {
                let indent = self.lines[idx].indent;
                self.read_block(indent)
            }
            None => None,
        };

        while let Some(idx) = self.peek_content_line() {
            let line = self.lines[idx];
            self.error(
                ParseErrorKind::UnexpectedContent,
                Span::new(line.content, line.end),
            );
            self.line = idx + 1;
        }

        root
    }

    /// Read the block node starting on the next content line, if that line
    /// is indented at least `min_indent`.
    fn read_block(&mut self, min_indent: u32) -> Option<Node> {
        let idx = self.peek_content_line()?;
        let line = self.lines[idx];
        if line.indent < min_indent {
            return None;
        }
        if self.is_sequence_item(&line) {
            return Some(Node::Sequence(self.read_sequence(line.indent)));
        }
        if self.key_colon(&line).is_some() {
            return Some(Node::Mapping(self.read_mapping(line.indent)));
        }
        self.line = idx;
        Some(self.read_inline(line.content))
    }

    fn read_mapping(&mut self, indent: u32) -> Mapping {
        let start = self
            .peek_content_line()
            .map(|idx| self.lines[idx].content)
            .unwrap_or_default();
        let mut pairs = Vec::new();

        while let Some(idx) = self.peek_content_line() {
            let line = self.lines[idx];
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                self.error(
                    ParseErrorKind::UnexpectedIndentation,
                    Span::new(line.content, line.end),
                );
                self.line = idx + 1;
                continue;
            }
            if self.is_sequence_item(&line) {
                break;
            }

            let comment_before = self.take_comment();
            let Some(colon) = self.key_colon(&line) else {
                self.error(
                    ParseErrorKind::UnexpectedContent,
                    Span::new(line.content, line.end),
                );
                self.line = idx + 1;
                continue;
            };

            let key = self.read_key(line.content, colon, line.end);
            trace!(key = %key.text, ?key.span, "mapping key");

            let value_start = self.skip_spaces(colon + 1, line.end);
            let value = if value_start == line.end || self.bytes[value_start as usize] == b'#' {
                self.line = idx + 1;
                self.read_nested_value(indent)
            } else {
                Some(self.read_inline(value_start))
            };

            pairs.push(Pair {
                key,
                value,
                comment_before,
            });
        }

        let span = match (pairs.first(), pairs.last()) {
            (Some(first), Some(last)) => first.key.span.extend(last.span()),
            _ => Span::empty(start),
        };
        Mapping { pairs, span }
    }

    fn read_nested_value(&mut self, indent: u32) -> Option<Node> {
        let idx = self.peek_content_line()?;
        let line = self.lines[idx];
        if line.indent > indent {
            return self.read_block(indent + 1);
        }
        if line.indent == indent && self.is_sequence_item(&line) {
            return Some(Node::Sequence(self.read_sequence(indent)));
        }
        None
    }

    fn read_sequence(&mut self, indent: u32) -> Sequence {
        let start = self
            .peek_content_line()
            .map(|idx| self.lines[idx].content)
            .unwrap_or_default();
        let mut items = Vec::new();

        while let Some(idx) = self.peek_content_line() {
            let line = self.lines[idx];
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                self.error(
                    ParseErrorKind::UnexpectedIndentation,
                    Span::new(line.content, line.end),
                );
                self.line = idx + 1;
                continue;
            }
            if !self.is_sequence_item(&line) {
                break;
            }

            self.line = idx;
            let dash = line.content;
            let rest = self.skip_spaces(dash + 1, line.end);
            let item = if rest == line.end || self.bytes[rest as usize] == b'#' {
                self.line = idx + 1;
                self.read_block(indent + 1)
                    .unwrap_or_else(|| Node::Scalar(plain_scalar(dash + 1, "")))
            } else {
                // Treat the dash as indentation so the item's content reads
                // like any other block.
                let column = rest - line.start;
                self.lines[idx].indent = column;
                self.lines[idx].content = rest;
                self.read_block(column)
                    .unwrap_or_else(|| Node::Scalar(plain_scalar(rest, "")))
            };
            trace!(span = ?item.span(), "sequence item");
            items.push(item);
        }

        let span = match items.last() {
            Some(last) => Span::new(start, last.span().end.max(start)),
            None => Span::empty(start),
        };
        Sequence { items, span }
    }

    fn read_key(&mut self, start: u32, colon: u32, line_end: u32) -> Scalar {
        if matches!(self.bytes[start as usize], b'"' | b'\'') {
            let (scalar, _) = self.read_quoted(start, line_end);
            return scalar;
        }
        let text = self.source[start as usize..colon as usize].trim_end();
        plain_scalar(start, text)
    }

    /// Read a value that starts mid-line and consume the rest of its line.
    fn read_inline(&mut self, start: u32) -> Node {
        let line_idx = self.line_of(start);
        let line = self.lines[line_idx];

        let (node, end) = match self.bytes[start as usize] {
            b'[' | b'{' => {
                let mut pos = start as usize;
                let node = self.read_flow(&mut pos);
                (node, pos as u32)
            }
            b'"' | b'\'' => {
                let (scalar, end) = self.read_quoted(start, line.end);
                (Node::Scalar(scalar), end)
            }
            _ => {
                let end = plain_end(self.bytes, start as usize, line.end as usize);
                let text = self.source[start as usize..end].trim_end();
                (Node::Scalar(plain_scalar(start, text)), end as u32)
            }
        };

        let end_line_idx = self.line_of(end);
        let end_line = self.lines[end_line_idx];
        let rest = self.skip_spaces(end.max(end_line.start), end_line.end);
        if rest < end_line.end && self.bytes[rest as usize] != b'#' {
            self.error(
                ParseErrorKind::UnexpectedContent,
                Span::new(rest, end_line.end),
            );
        }
        self.line = end_line_idx + 1;
        node
    }

    /// Read a quoted scalar starting at `start`, stopping at `limit` when
    /// the closing quote is missing.
    fn read_quoted(&mut self, start: u32, limit: u32) -> (Scalar, u32) {
        let b = self.bytes;
        let quote = b[start as usize];
        let (style, decoded, end) = if quote == b'"' {
            let (text, end) = decode_double(self.source, start as usize + 1, limit as usize);
            (ScalarStyle::DoubleQuoted, text, end)
        } else {
            let (text, end) = decode_single(self.source, start as usize + 1, limit as usize);
            (ScalarStyle::SingleQuoted, text, end)
        };

        let end = match end {
            Some(end) => end as u32,
            None => {
                self.error(
                    ParseErrorKind::UnterminatedString,
                    Span::new(start, limit),
                );
                limit
            }
        };

        let scalar = Scalar {
            value: ScalarValue::String(decoded.clone()),
            text: decoded,
            style,
            span: Span::new(start, end),
        };
        (scalar, end)
    }

    fn skip_flow_trivia(&self, pos: &mut usize) {
        let b = self.bytes;
        while *pos < b.len() {
            match b[*pos] {
                b' ' | b'\t' | b'\r' | b'\n' => *pos += 1,
                b'#' => {
                    while *pos < b.len() && b[*pos] != b'\n' {
                        *pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn read_flow(&mut self, pos: &mut usize) -> Node {
        self.skip_flow_trivia(pos);
        match self.bytes.get(*pos) {
            Some(b'[') => self.read_flow_sequence(pos),
            Some(b'{') => self.read_flow_mapping(pos),
            Some(b'"' | b'\'') => {
                let line = self.lines[self.line_of(*pos as u32)];
                let (scalar, end) = self.read_quoted(*pos as u32, line.end);
                *pos = end as usize;
                Node::Scalar(scalar)
            }
            _ => {
                let start = *pos;
                let end = flow_plain_end(self.bytes, start);
                let text = self.source[start..end].trim_end();
                *pos = end;
                Node::Scalar(plain_scalar(start as u32, text))
            }
        }
    }

    fn read_flow_sequence(&mut self, pos: &mut usize) -> Node {
        let open = *pos;
        *pos += 1;
        let mut items = Vec::new();

        loop {
            self.skip_flow_trivia(pos);
            match self.bytes.get(*pos) {
                None => {
                    self.error(
                        ParseErrorKind::UnclosedSequence,
                        Span::new(open as u32, open as u32 + 1),
                    );
                    break;
                }
                Some(b']') => {
                    *pos += 1;
                    break;
                }
                Some(b',') => *pos += 1,
                Some(b'}') => {
                    self.error(
                        ParseErrorKind::UnexpectedContent,
                        Span::new(*pos as u32, *pos as u32 + 1),
                    );
                    *pos += 1;
                }
                Some(_) => {
                    let before = *pos;
                    items.push(self.read_flow(pos));
                    if *pos == before {
                        *pos += 1;
                    }
                }
            }
        }

        Node::Sequence(Sequence {
            items,
            span: Span::new(open as u32, *pos as u32),
        })
    }

    fn read_flow_mapping(&mut self, pos: &mut usize) -> Node {
        let open = *pos;
        *pos += 1;
        let mut pairs = Vec::new();

        loop {
            self.skip_flow_trivia(pos);
            match self.bytes.get(*pos) {
                None => {
                    self.error(
                        ParseErrorKind::UnclosedMapping,
                        Span::new(open as u32, open as u32 + 1),
                    );
                    break;
                }
                Some(b'}') => {
                    *pos += 1;
                    break;
                }
                Some(b',') => *pos += 1,
                Some(b']') => {
                    self.error(
                        ParseErrorKind::UnexpectedContent,
                        Span::new(*pos as u32, *pos as u32 + 1),
                    );
                    *pos += 1;
                }
                Some(_) => {
                    let before = *pos;
                    let key = match self.read_flow(pos) {
                        Node::Scalar(scalar) => scalar,
                        other => {
                            self.error(ParseErrorKind::UnexpectedContent, other.span());
                            continue;
                        }
                    };
                    self.skip_flow_trivia(pos);
                    let value = if self.bytes.get(*pos) == Some(&b':') {
                        *pos += 1;
                        self.skip_flow_trivia(pos);
                        match self.bytes.get(*pos) {
                            None | Some(b',' | b'}') => None,
                            Some(_) => Some(self.read_flow(pos)),
                        }
                    } else {
                        None
                    };
                    if *pos == before {
                        *pos += 1;
                        continue;
                    }
                    trace!(key = %key.text, "flow mapping key");
                    pairs.push(Pair {
                        key,
                        value,
                        comment_before: None,
                    });
                }
            }
        }

        Node::Mapping(Mapping {
            pairs,
            span: Span::new(open as u32, *pos as u32),
        })
    }
}

/// Index just past the closing quote of the quoted scalar at `start`.
fn quoted_end(b: &[u8], start: usize, end: usize) -> Option<usize> {
    let quote = b[start];
    let mut i = start + 1;
    while i < end {
        match b[i] {
            b'\\' if quote == b'"' => i += 2,
            b'\'' if quote == b'\'' && i + 1 < end && b[i + 1] == b'\'' => i += 2,
            c if c == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

fn decode_double(source: &str, from: usize, limit: usize) -> (String, Option<usize>) {
    let mut out = String::new();
    let mut chars = source[from..limit].char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return (out, Some(from + i + 1)),
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, '0')) => out.push('\0'),
                Some((_, 'u')) => {
                    let hex: String = chars.by_ref().take(4).map(|(_, c)| c).collect();
                    match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                        Some(decoded) => out.push(decoded),
                        None => {
                            out.push_str("\\u");
                            out.push_str(&hex);
                        }
                    }
                }
                Some((_, c @ ('"' | '\\' | '/' | ' '))) => out.push(c),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            c => out.push(c),
        }
    }
    (out, None)
}

fn decode_single(source: &str, from: usize, limit: usize) -> (String, Option<usize>) {
    let mut out = String::new();
    let mut chars = source[from..limit].char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '\'' {
            if matches!(chars.peek(), Some((_, '\''))) {
                chars.next();
                out.push('\'');
            } else {
                return (out, Some(from + i + 1));
            }
        } else {
            out.push(c);
        }
    }
    (out, None)
}

/// End of a plain scalar in block context: the line end, or the start of a
/// trailing comment.
fn plain_end(b: &[u8], start: usize, end: usize) -> usize {
    (start + 1..end)
        .find(|&i| b[i] == b'#' && matches!(b[i - 1], b' ' | b'\t'))
        .unwrap_or(end)
}

/// End of a plain scalar inside a flow collection.
fn flow_plain_end(b: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < b.len() {
        match b[i] {
            b',' | b']' | b'}' | b'\n' | b'\r' => break,
            b':' if matches!(b.get(i + 1), None | Some(b' ' | b'\t' | b',' | b']' | b'}' | b'\n' | b'\r')) => {
                break;
            }
            b'#' if i > start && matches!(b[i - 1], b' ' | b'\t') => break,
            _ => i += 1,
        }
    }
    i
}

fn plain_scalar(start: u32, text: &str) -> Scalar {
    Scalar {
        value: decode_plain(text),
        text: text.to_string(),
        style: ScalarStyle::Plain,
        span: Span::new(start, start + text.len() as u32),
    }
}

fn decode_plain(text: &str) -> ScalarValue {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return ScalarValue::Null,
        "true" | "True" | "TRUE" => return ScalarValue::Bool(true),
        "false" | "False" | "FALSE" => return ScalarValue::Bool(false),
        _ => {}
    }
    if let Ok(int) = text.parse::<i64>() {
        return ScalarValue::Int(int);
    }
    if looks_numeric(text)
        && let Ok(float) = text.parse::<f64>()
    {
        return ScalarValue::Float(float);
    }
    ScalarValue::String(text.to_string())
}

fn looks_numeric(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some('0'..='9' | '+' | '-' | '.'))
        && text.chars().all(|c| c.is_ascii_digit() || "+-.eE".contains(c))
        && text.chars().any(|c| c.is_ascii_digit())
}
