//! Artifact-path and line templates
//!
//! Two template kinds drive the written output:
//!
//! - a path template renders the artifact path for one scanned directory
//!   from a closed set of named fields (`{path}`, `{dir}`, `{dotdir}`,
//!   `{ext}`, `{prefix}`, `{sep}`, `{pathsep}`, `{lists}`);
//! - a line template has a single positional `{}` slot and wraps either one
//!   entry or a whole joined list body (e.g. `#EXTM3U\n{}`).
//!
//! Both kinds are parsed when configuration is resolved, so a typo in a
//! field name fails the run before any directory is touched. `{{` and `}}`
//! are literal braces in either kind.

use std::path::MAIN_SEPARATOR;

use thiserror::Error;

use crate::paths::PATH_LIST_SEPARATOR;

/// Template parse failures. These surface as configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed field in template \"{0}\"")]
    Unclosed(String),

    #[error("unmatched \"}}\" in template \"{0}\"")]
    StrayBrace(String),

    #[error("unknown field \"{name}\" in template \"{template}\"")]
    UnknownField { template: String, name: String },

    #[error("expected a positional \"{{}}\" slot, found field \"{name}\" in template \"{template}\"")]
    UnexpectedField { template: String, name: String },
}

/// Named fields available in a path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathField {
    /// `{path}`: default artifact path derived from the directory, without
    /// an extension.
    DefaultPath,
    /// `{dir}`: directory relative to the scan root, empty at the root.
    RawDir,
    /// `{dotdir}`: like `{dir}` but `.` at the root.
    DotDir,
    /// `{ext}`: configured list extension.
    Extension,
    /// `{prefix}`: configured or derived prefix.
    Prefix,
    /// `{sep}`: platform path separator.
    Separator,
    /// `{pathsep}`: platform path-list separator.
    PathListSeparator,
    /// `{lists}`: lists folder.
    ListsFolder,
}

impl PathField {
    fn from_name(name: &str) -> Option<PathField> {
        Some(match name {
            "path" => PathField::DefaultPath,
            "dir" => PathField::RawDir,
            "dotdir" => PathField::DotDir,
            "ext" => PathField::Extension,
            "prefix" => PathField::Prefix,
            "sep" => PathField::Separator,
            "pathsep" => PathField::PathListSeparator,
            "lists" => PathField::ListsFolder,
            _ => return None,
        })
    }
}

/// Values substituted into a path template for one directory.
#[derive(Debug, Clone, Copy)]
pub struct PathVars<'a> {
    pub default_path: &'a str,
    pub raw_dir: &'a str,
    pub dot_dir: &'a str,
    pub extension: &'a str,
    pub prefix: &'a str,
    pub lists_folder: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Field(PathField),
}

/// A parsed artifact-path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<PathSegment>,
}

impl PathTemplate {
    /// Parse and validate a path template.
    pub fn parse(template: &str) -> Result<PathTemplate, TemplateError> {
        let mut segments = Vec::new();
        for token in tokenize(template)? {
            segments.push(match token {
                RawToken::Literal(text) => PathSegment::Literal(text),
                RawToken::Placeholder(name) => match PathField::from_name(&name) {
                    Some(field) => PathSegment::Field(field),
                    None => {
                        return Err(TemplateError::UnknownField {
                            template: template.to_string(),
                            name,
                        });
                    }
                },
            });
        }
        Ok(PathTemplate {
            raw: template.to_string(),
            segments,
        })
    }

    /// Render the template against one directory's values.
    pub fn render(&self, vars: &PathVars<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                PathSegment::Literal(text) => out.push_str(text),
                PathSegment::Field(field) => match field {
                    PathField::DefaultPath => out.push_str(vars.default_path),
                    PathField::RawDir => out.push_str(vars.raw_dir),
                    PathField::DotDir => out.push_str(vars.dot_dir),
                    PathField::Extension => out.push_str(vars.extension),
                    PathField::Prefix => out.push_str(vars.prefix),
                    PathField::Separator => out.push(MAIN_SEPARATOR),
                    PathField::PathListSeparator => out.push(PATH_LIST_SEPARATOR),
                    PathField::ListsFolder => out.push_str(vars.lists_folder),
                },
            }
        }
        out
    }

    /// The template source text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LineSegment {
    Literal(String),
    Slot,
}

/// A parsed single-slot template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTemplate {
    raw: String,
    segments: Vec<LineSegment>,
}

impl LineTemplate {
    /// Parse and validate a line template. The slot is written `{}`; a
    /// template without any slot renders to a constant.
    pub fn parse(template: &str) -> Result<LineTemplate, TemplateError> {
        let mut segments = Vec::new();
        for token in tokenize(template)? {
            segments.push(match token {
                RawToken::Literal(text) => LineSegment::Literal(text),
                RawToken::Placeholder(name) if name.is_empty() => LineSegment::Slot,
                RawToken::Placeholder(name) => {
                    return Err(TemplateError::UnexpectedField {
                        template: template.to_string(),
                        name,
                    });
                }
            });
        }
        Ok(LineTemplate {
            raw: template.to_string(),
            segments,
        })
    }

    /// Render the template around `text`.
    pub fn render(&self, text: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                LineSegment::Literal(literal) => out.push_str(literal),
                LineSegment::Slot => out.push_str(text),
            }
        }
        out
    }

    /// The template source text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

enum RawToken {
    Literal(String),
    Placeholder(String),
}

fn tokenize(template: &str) -> Result<Vec<RawToken>, TemplateError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => return Err(TemplateError::Unclosed(template.to_string())),
                    }
                }
                if !literal.is_empty() {
                    tokens.push(RawToken::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(RawToken::Placeholder(name));
            }
            '}' => return Err(TemplateError::StrayBrace(template.to_string())),
            c => literal.push(c),
        }
    }
    if !literal.is_empty() {
        tokens.push(RawToken::Literal(literal));
    }
    Ok(tokens)
}
