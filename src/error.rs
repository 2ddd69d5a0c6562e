//! Error types for the marketplace client

use std::fmt;
use thiserror::Error;
use validator::ValidationErrorsKind;

pub type Result<T> = std::result::Result<T, MarketError>;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Resource not found: {kind} with id {id}")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid rate response: {0}")]
    Rates(String),
}

/// One failing form field, named by its dotted payload path
/// (`location.city`, `images`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every failing field of a submitted form
#[derive(Error, Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: ")?;
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{} {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::default();
        flatten(&mut errors, "", &source);
        errors.errors.sort_by(|a, b| a.field.cmp(&b.field));
        errors
    }
}

impl From<validator::ValidationErrors> for MarketError {
    fn from(source: validator::ValidationErrors) -> Self {
        MarketError::Validation(source.into())
    }
}

fn flatten(into: &mut ValidationErrors, prefix: &str, source: &validator::ValidationErrors) {
    for (field, kind) in source.errors() {
        let name = camel_case(&field.to_string());
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{}.{}", prefix, name)
        };

        match kind {
            ValidationErrorsKind::Field(failures) => {
                for failure in failures {
                    let message = match &failure.message {
                        Some(message) => message.to_string(),
                        None => failure.code.to_string(),
                    };
                    into.add(path.clone(), message);
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten(into, &path, nested),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten(into, &format!("{}[{}]", path, index), nested);
                }
            }
        }
    }
}

/// Struct field names are snake_case; payload keys are camelCase
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
