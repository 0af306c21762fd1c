//! Message templates with named placeholders.
//!
//! A template is plain text with `{field}` placeholders. Supported fields are
//! `{project_name}`, `{url}`, `{title}`, `{message}` and `{tag[KEY]}` for any
//! tag key. Literal braces are written `{{` and `}}`. Templates are parsed
//! once, so every malformed or unknown placeholder is reported up front and
//! rendering itself cannot fail.

use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Substituted for `{tag[KEY]}` when the event has no tag `KEY`.
pub const MISSING_TAG: &str = "[NA]";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("placeholder opened at byte {position} is never closed")]
    UnclosedPlaceholder { position: usize },

    #[error("single '}}' at byte {position}; write '}}}}' for a literal brace")]
    UnmatchedClosingBrace { position: usize },

    #[error("unknown template field '{0}'")]
    UnknownField(String),

    #[error("'{{tag}}' needs a key, e.g. '{{tag[level]}}'")]
    MissingTagKey,

    #[error("'{{tag[]}}' has an empty key")]
    EmptyTagKey,

    #[error("malformed tag lookup '{0}'")]
    MalformedTagLookup(String),

    #[error("format specs and conversions are not supported in '{0}'")]
    UnsupportedFormatSpec(String),
}

/// A placeholder a template may reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    ProjectName,
    Url,
    Title,
    Message,
    Tag(String),
}

impl Field {
    fn parse(name: &str) -> Result<Self, TemplateError> {
        if let Some(rest) = name.strip_prefix("tag[") {
            let Some(end) = rest.find(']') else {
                return Err(TemplateError::MalformedTagLookup(name.to_string()));
            };
            let (key, trailer) = (&rest[..end], &rest[end + 1..]);
            if key.is_empty() {
                return Err(TemplateError::EmptyTagKey);
            }
            return match trailer.chars().next() {
                None => Ok(Field::Tag(key.to_string())),
                Some(':') | Some('!') => {
                    Err(TemplateError::UnsupportedFormatSpec(name.to_string()))
                }
                Some(_) => Err(TemplateError::MalformedTagLookup(name.to_string())),
            };
        }

        if name.contains([':', '!']) {
            return Err(TemplateError::UnsupportedFormatSpec(name.to_string()));
        }

        match name {
            "project_name" => Ok(Field::ProjectName),
            "url" => Ok(Field::Url),
            "title" => Ok(Field::Title),
            "message" => Ok(Field::Message),
            "tag" => Err(TemplateError::MissingTagKey),
            other => Err(TemplateError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Values substituted into a [`Template`].
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub project_name: &'a str,
    pub url: &'a str,
    pub title: &'a str,
    pub message: &'a str,
    pub tags: &'a HashMap<&'a str, &'a str>,
}

/// A parsed, validated message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `source`, rejecting anything that is not a supported placeholder.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((position, c)) = chars.next() {
            match c {
                '{' => {
                    if chars.next_if(|&(_, next)| next == '{').is_some() {
                        literal.push('{');
                        continue;
                    }

                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedPlaceholder { position });
                    }

                    let field = Field::parse(&name)?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => {
                    if chars.next_if(|&(_, next)| next == '}').is_some() {
                        literal.push('}');
                        continue;
                    }
                    return Err(TemplateError::UnmatchedClosingBrace { position });
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// The fields referenced by this template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(field) => Some(field),
            Segment::Literal(_) => None,
        })
    }

    /// Substitutes every placeholder. Absent tag keys render as [`MISSING_TAG`].
    pub fn render(&self, context: &TemplateContext<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            let value = match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Field(Field::ProjectName) => context.project_name,
                Segment::Field(Field::Url) => context.url,
                Segment::Field(Field::Title) => context.title,
                Segment::Field(Field::Message) => context.message,
                Segment::Field(Field::Tag(key)) => context
                    .tags
                    .get(key.as_str())
                    .copied()
                    .unwrap_or(MISSING_TAG),
            };
            out.push_str(value);
        }
        out
    }
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
