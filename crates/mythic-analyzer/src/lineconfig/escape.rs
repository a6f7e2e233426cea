//! Sentinel substitution inside `{...}` blocks.
//!
//! Quoted text inside a block may contain any of the characters the line
//! parser splits on. Before splitting, those characters are replaced by
//! multi-character sentinels; [`source_len`] maps offsets in the escaped
//! text back to the original by counting each sentinel as one byte.

/// Sentinels for characters inside quotes within a block.
const QUOTED: [(char, &str); 12] = [
    ('-', "<&da>"),
    ('\\', "<&bs>"),
    ('/', "<&fs>"),
    (' ', "<&sp>"),
    (',', "<&cm>"),
    (';', "<&sc>"),
    ('=', "<&eq>"),
    ('{', "<&lc>"),
    ('}', "<&rc>"),
    ('[', "<&lb>"),
    (']', "<&rb>"),
    ('\'', "<&sq>"),
];

/// Sentinel for an unquoted space inside a block.
pub const BLOCK_SPACE: &str = "<&csp>";
/// Sentinel for an unquoted dash inside a block.
pub const DASH: &str = "<&da>";

fn quoted_sentinel(c: char) -> Option<&'static str> {
    QUOTED.iter().find(|(ch, _)| *ch == c).map(|(_, s)| *s)
}

/// The sentinel starting at the beginning of `s`, if any.
fn sentinel_at(s: &str) -> Option<(&'static str, char)> {
    if s.starts_with(BLOCK_SPACE) {
        return Some((BLOCK_SPACE, ' '));
    }
    if !s.starts_with("<&") {
        return None;
    }
    QUOTED
        .iter()
        .find(|(_, sentinel)| s.starts_with(sentinel))
        .map(|(c, sentinel)| (*sentinel, *c))
}

/// Byte ranges of closed top-level `{...}` blocks, braces included.
/// Quotes are only recognised inside a block.
fn closed_blocks(input: &str) -> Vec<(usize, usize)> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut quote: Option<char> = None;
    for (i, c) in input.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' if depth > 0 => quote = Some(c),
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    blocks.push((start, i + 1));
                }
            }
            _ => {}
        }
    }
    blocks
}

/// Replace separator characters inside closed blocks with sentinels.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for (start, end) in closed_blocks(input) {
        out.push_str(&input[last..start]);
        let mut quote: Option<char> = None;
        for c in input[start..end].chars() {
            match quote {
                Some(q) if c == q => {
                    quote = None;
                    out.push(c);
                }
                Some(_) => match quoted_sentinel(c) {
                    Some(sentinel) => out.push_str(sentinel),
                    None => out.push(c),
                },
                None => match c {
                    '"' | '\'' => {
                        quote = Some(c);
                        out.push(c);
                    }
                    ' ' => out.push_str(BLOCK_SPACE),
                    '-' => out.push_str(DASH),
                    _ => out.push(c),
                },
            }
        }
        last = end;
    }
    out.push_str(&input[last..]);
    out
}

/// Restore every sentinel in `s`.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        match sentinel_at(rest) {
            Some((sentinel, original)) => {
                out.push(original);
                rest = &rest[sentinel.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

/// Restore only the unquoted block sentinels, leaving quoted content
/// escaped.
pub fn restore_block_separators(s: &str) -> String {
    s.replace(BLOCK_SPACE, " ").replace(DASH, "-")
}

/// Length in source bytes of `escaped[..idx]`.
pub fn source_len(escaped: &str, idx: usize) -> u32 {
    let mut len = 0u32;
    let mut i = 0;
    while i < idx.min(escaped.len()) {
        let rest = &escaped[i..];
        match sentinel_at(rest) {
            Some((sentinel, _)) => {
                len += 1;
                i += sentinel.len();
            }
            None => {
                let c = rest.chars().next().map_or(1, char::len_utf8);
                len += c as u32;
                i += c;
            }
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_blocks_untouched() {
        assert_eq!(escape("damage @Self 0.5"), "damage @Self 0.5");
    }

    #[test]
    fn test_block_spaces_and_quotes() {
        let escaped = escape("message{m=\"a b;c\"; x = -1} @Self");
        assert_eq!(
            escaped,
            "message{m=\"a<&sp>b<&sc>c\";<&csp>x<&csp>=<&csp><&da>1} @Self"
        );
        assert_eq!(unescape(&escaped), "message{m=\"a b;c\"; x = -1} @Self");
    }

    #[test]
    fn test_unclosed_block_is_raw() {
        assert_eq!(escape("damage{amount=5 @Self"), "damage{amount=5 @Self");
    }

    #[test]
    fn test_nested_blocks() {
        assert_eq!(
            escape("skill{s=[ - a{b=1} ]}"),
            "skill{s=[<&csp><&da><&csp>a{b=1}<&csp>]}"
        );
    }

    #[test]
    fn test_source_len_counts_sentinels_once() {
        let escaped = escape("m{a=\"x y\"} z");
        let z = escaped.find('z').unwrap();
        assert_eq!(source_len(&escaped, z), "m{a=\"x y\"} ".len() as u32);
    }

    #[test]
    fn test_restore_block_separators() {
        let escaped = escape("m{a = 'x y'}");
        assert_eq!(restore_block_separators(&escaped), "m{a = 'x<&sp>y'}");
    }
}
