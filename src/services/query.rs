//! Search query construction and transport encoding.
//!
//! Queries are built from [`Predicate`] trees and rendered into the search
//! service's expression syntax, e.g.
//!
//! ```text
//! is_web=true && (web.title="X" || web.body="X") && ip.country="CN"
//! ```
//!
//! The rendered text is then sent base64url-encoded without padding.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::{AppError, Result};

/// Fixed query used to check that the API key is accepted.
pub const PERMISSION_PROBE: &str = r#"is_web=true && web.title="test""#;

/// A node of a structured search predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `field=true` / `field=false`
    Flag { field: String, value: bool },
    /// `field="value"`
    Equals { field: String, value: String },
    /// Children joined by `&&`
    All(Vec<Predicate>),
    /// Children joined by `||`
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn flag(field: &str, value: bool) -> Self {
        Self::Flag {
            field: field.to_string(),
            value,
        }
    }

    pub fn equals(field: &str, value: &str) -> Self {
        Self::Equals {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Render into expression syntax. Compound children are parenthesized.
    fn render(&self, out: &mut String) -> Result<()> {
        match self {
            Self::Flag { field, value } => {
                out.push_str(&format!("{field}={value}"));
            }
            Self::Equals { field, value } => {
                if value.is_empty() {
                    return Err(AppError::encoding(format!("empty value for {field}")));
                }
                if value.contains('"') {
                    return Err(AppError::encoding(format!(
                        "value for {field} contains a double quote: {value}"
                    )));
                }
                out.push_str(&format!("{field}=\"{value}\""));
            }
            Self::All(children) => Self::render_joined(children, " && ", out)?,
            Self::Any(children) => Self::render_joined(children, " || ", out)?,
        }
        Ok(())
    }

    fn render_joined(children: &[Predicate], separator: &str, out: &mut String) -> Result<()> {
        if children.is_empty() {
            return Err(AppError::encoding("empty predicate group"));
        }
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            if child.is_compound() {
                out.push('(');
                child.render(out)?;
                out.push(')');
            } else {
                child.render(out)?;
            }
        }
        Ok(())
    }

    fn is_compound(&self) -> bool {
        matches!(self, Self::All(_) | Self::Any(_))
    }
}

/// A rendered search expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryExpression(String);

impl QueryExpression {
    /// Render a predicate tree.
    ///
    /// Fails with an encoding error when a literal is empty or contains a
    /// double quote, since neither can be expressed in the query syntax.
    pub fn build(predicate: &Predicate) -> Result<Self> {
        let mut text = String::new();
        predicate.render(&mut text)?;
        Ok(Self(text))
    }

    /// Every web asset whose title or body mentions `name` in `country`.
    pub fn primary(name: &str, country: &str) -> Result<Self> {
        Self::build(&Predicate::All(vec![
            Predicate::flag("is_web", true),
            name_match(name),
            Predicate::equals("ip.country", country),
        ]))
    }

    /// Web assets mentioning `name` whose title matches any of `keywords`.
    pub fn secondary(name: &str, keywords: &[String], country: &str) -> Result<Self> {
        let keyword_match = Predicate::Any(
            keywords
                .iter()
                .map(|kw| Predicate::equals("web.title", kw))
                .collect(),
        );
        Self::build(&Predicate::All(vec![
            Predicate::flag("is_web", true),
            Predicate::All(vec![name_match(name), keyword_match]),
            Predicate::equals("ip.country", country),
        ]))
    }

    /// The fixed permission probe query.
    pub fn permission_probe() -> Self {
        Self(PERMISSION_PROBE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encode for transport (consumes the expression).
    pub fn encode(self) -> EncodedQuery {
        EncodedQuery(URL_SAFE_NO_PAD.encode(self.0.as_bytes()))
    }
}

impl fmt::Display for QueryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unpadded base64url form of a [`QueryExpression`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedQuery(String);

impl EncodedQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn name_match(name: &str) -> Predicate {
    Predicate::Any(vec![
        Predicate::equals("web.title", name),
        Predicate::equals("web.body", name),
    ])
}
