//! `{name}` placeholder substitution for prompts and task descriptions.
//!
//! - `{name}` is replaced by the value of `name` (surrounding spaces ignored)
//! - `{{` and `}}` render as literal braces; a lone `}` is kept as is
//! - referencing a name with no value is an error, never an empty string

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("undefined variable '{name}' at position {position} in template")]
    UndefinedVariable { name: String, position: usize },

    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace { position: usize },

    #[error("empty variable name '{{}}' at position {position} in template")]
    EmptyVariableName { position: usize },
}

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Literal(char),
    Var { name: &'a str, position: usize },
}

fn segments(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if ch != '{' && ch != '}' {
            continue;
        }
        if text_start < pos {
            out.push(Segment::Text(&template[text_start..pos]));
        }

        let doubled = chars.peek().is_some_and(|(_, next)| *next == ch);
        if doubled {
            chars.next();
            out.push(Segment::Literal(ch));
            text_start = pos + 2;
            continue;
        }

        if ch == '}' {
            out.push(Segment::Literal('}'));
            text_start = pos + 1;
            continue;
        }

        let close = template[pos + 1..]
            .find('}')
            .map(|offset| pos + 1 + offset)
            .ok_or(TemplateError::UnmatchedBrace { position: pos })?;
        let name = template[pos + 1..close].trim();
        if name.is_empty() {
            return Err(TemplateError::EmptyVariableName { position: pos });
        }
        out.push(Segment::Var {
            name,
            position: pos,
        });

        while chars.peek().is_some_and(|(i, _)| *i <= close) {
            chars.next();
        }
        text_start = close + 1;
    }

    if text_start < template.len() {
        out.push(Segment::Text(&template[text_start..]));
    }
    Ok(out)
}

/// Render `template`, substituting every placeholder from `variables`.
pub fn render_template(
    template: &str,
    variables: &BTreeMap<String, String>,
) -> Result<String, TemplateError> {
    let mut result = String::with_capacity(template.len());
    for segment in segments(template)? {
        match segment {
            Segment::Text(text) => result.push_str(text),
            Segment::Literal(ch) => result.push(ch),
            Segment::Var { name, position } => match variables.get(name) {
                Some(value) => result.push_str(value),
                None => {
                    return Err(TemplateError::UndefinedVariable {
                        name: name.to_string(),
                        position,
                    });
                }
            },
        }
    }
    Ok(result)
}

/// Placeholder names in order of first appearance, without duplicates.
pub fn placeholders(template: &str) -> Result<Vec<String>, TemplateError> {
    let mut names: Vec<String> = Vec::new();
    for segment in segments(template)? {
        if let Segment::Var { name, .. } = segment
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Escape braces so `text` renders back to itself.
pub fn escape_braces(text: &str) -> String {
    text.replace('{', "{{").replace('}', "}}")
}

/// Build a variables map from key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
