//! Positioned document tree.

use serde_json::json;

use crate::Span;

/// A node in a document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Sequence),
    Mapping(Mapping),
}

/// Decoded value of a scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// How a scalar was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
}

/// A scalar value with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    /// The decoded value.
    pub value: ScalarValue,
    /// Text form of the scalar: the raw text for plain scalars, the
    /// unescaped content for quoted ones.
    pub text: String,
    pub style: ScalarStyle,
    /// Span in the source, including quotes.
    pub span: Span,
}

/// An ordered sequence of nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub items: Vec<Node>,
    pub span: Span,
}

/// An ordered list of key/value pairs. Duplicate keys are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    pub pairs: Vec<Pair>,
    pub span: Span,
}

/// A key/value pair in a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub key: Scalar,
    /// `None` when the key has no value at all (`key:` followed by nothing).
    pub value: Option<Node>,
    /// Comment lines directly above the key, with the `#` stripped.
    pub comment_before: Option<String>,
}

impl Node {
    /// The source span of this node.
    pub fn span(&self) -> Span {
        match self {
            Node::Scalar(s) => s.span,
            Node::Sequence(s) => s.span,
            Node::Mapping(m) => m.span,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Node::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    /// Human-readable name of the node's shape.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Scalar(s) => s.kind_name(),
            Node::Sequence(_) => "list",
            Node::Mapping(_) => "object",
        }
    }

    /// Convert the decoded values of this subtree to JSON. Mapping keys use
    /// their text form; a later duplicate key overwrites an earlier one.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Node::Scalar(s) => s.to_json(),
            Node::Sequence(seq) => {
                serde_json::Value::Array(seq.items.iter().map(Node::to_json).collect())
            }
            Node::Mapping(map) => {
                let mut object = serde_json::Map::new();
                for pair in &map.pairs {
                    let value = pair
                        .value
                        .as_ref()
                        .map(Node::to_json)
                        .unwrap_or(serde_json::Value::Null);
                    object.insert(pair.key.text.clone(), value);
                }
                serde_json::Value::Object(object)
            }
        }
    }
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self.value, ScalarValue::Null)
    }

    /// The scalar's numeric value, if it decoded as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            ScalarValue::Int(i) => Some(i as f64),
            ScalarValue::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            ScalarValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.value {
            ScalarValue::Null => "null",
            ScalarValue::Bool(_) => "boolean",
            ScalarValue::Int(_) | ScalarValue::Float(_) => "number",
            ScalarValue::String(_) => "string",
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match &self.value {
            ScalarValue::Null => serde_json::Value::Null,
            ScalarValue::Bool(b) => json!(b),
            ScalarValue::Int(i) => json!(i),
            ScalarValue::Float(f) => json!(f),
            ScalarValue::String(s) => json!(s),
        }
    }
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.items.iter()
    }
}

impl Mapping {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.iter()
    }

    /// Get the first pair with the given key text.
    pub fn pair(&self, key: &str) -> Option<&Pair> {
        self.pairs.iter().find(|p| p.key.text == key)
    }

    /// Get the value of the first pair with the given key text.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.pair(key).and_then(|p| p.value.as_ref())
    }

    /// All pairs of this mapping and of every mapping nested below it
    /// through pair values, depth first. Mappings inside sequences are not
    /// visited.
    pub fn nested_pairs(&self) -> Vec<&Pair> {
        let mut out = Vec::new();
        collect_pairs(self, &mut out);
        out
    }
}

fn collect_pairs<'a>(map: &'a Mapping, out: &mut Vec<&'a Pair>) {
    for pair in &map.pairs {
        out.push(pair);
        if let Some(Node::Mapping(inner)) = &pair.value {
            collect_pairs(inner, out);
        }
    }
}

impl Pair {
    /// Span covering the key and, when present, the value.
    pub fn span(&self) -> Span {
        match &self.value {
            Some(value) => self.key.span.extend(value.span()),
            None => self.key.span,
        }
    }

    pub fn key_text(&self) -> &str {
        &self.key.text
    }

    pub fn value_mapping(&self) -> Option<&Mapping> {
        self.value.as_ref().and_then(Node::as_mapping)
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;

    #[test]
    fn test_get_and_pair() {
        let doc = parse("a: 1\nb: two\n").root.unwrap();
        let map = doc.as_mapping().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("b").unwrap().as_scalar().unwrap().text, "two");
        assert!(map.get("c").is_none());
    }

    #[test]
    fn test_nested_pairs_skips_sequences() {
        let doc = parse("a:\n  b: 1\n  c:\n  - d: 2\n").root.unwrap();
        let keys: Vec<_> = doc
            .as_mapping()
            .unwrap()
            .nested_pairs()
            .into_iter()
            .map(|p| p.key_text().to_string())
            .collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn test_to_json_structural_values() {
        let doc = parse("- 1\n- x\n- [true, ~]\n").root.unwrap();
        assert_eq!(doc.to_json(), serde_json::json!([1, "x", [true, null]]));
    }
}
