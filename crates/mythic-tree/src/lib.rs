#![doc = include_str!("../README.md")]

mod diagnostic;
mod node;
mod position;
mod reader;
mod span;

pub use diagnostic::{ParseError, ParseErrorKind, ariadne_config};
pub use node::{Mapping, Node, Pair, Scalar, ScalarStyle, ScalarValue, Sequence};
pub use position::{LineIndex, Position, Range};
pub use reader::{Parsed, parse};
pub use span::Span;
