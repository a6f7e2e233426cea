use mythic_tree::{Node, ScalarStyle, Span};

use crate::lineconfig::SkillLine;
use crate::schema::{ListSchema, StringSchema};
use crate::{Context, Schema};

/// A list of skill lines.
///
/// `triggers_allowed` is false for lists that do not run in response to an
/// event, such as a metaskill's `Skills`.
pub fn skill_list(triggers_allowed: bool) -> Schema {
    ListSchema::of(skill_line(triggers_allowed)).into()
}

/// A single skill line. Syntax is checked in the partial pass; references
/// to other skills are resolved in the full pass.
pub fn skill_line(triggers_allowed: bool) -> Schema {
    Schema::from(StringSchema::new())
        .named("skill")
        .on_partial_process(move |cx, node, result| {
            if let Some(line) = parse_line(cx, node, triggers_allowed) {
                line.report(cx, result);
            }
        })
        .on_full_process(move |cx, node, result| {
            if let Some(line) = parse_line(cx, node, triggers_allowed) {
                line.resolve_references(cx, result);
            }
        })
}

/// Parse the source text of a scalar, inside its quotes if it has any.
fn parse_line(cx: &Context<'_>, node: &Node, triggers_allowed: bool) -> Option<SkillLine> {
    let scalar = node.as_scalar().filter(|s| !s.is_null())?;
    let span = match scalar.style {
        ScalarStyle::Plain => scalar.span,
        ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted => {
            let start = (scalar.span.start + 1).min(scalar.span.end);
            Span::new(start, scalar.span.end.saturating_sub(1).max(start))
        }
    };
    Some(SkillLine::parse(
        cx.slice(span),
        span.start,
        triggers_allowed,
        cx.data,
    ))
}
