//! Crate-level error type.

use thiserror::Error;

use crate::config::ValidationError;
use crate::path::PathError;
use crate::schema::{
    FactoryError,
    SchemaError,
};

/// Errors raised while configuring or running the translation editor.
///
/// Collaborator failures are never caught or retried; they bubble out of the
/// reconciliation calls synchronously.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Config(Vec<ValidationError>),

    #[error("Field access failed: {0}")]
    Path(#[from] PathError),

    #[error("Item construction failed: {0}")]
    Factory(#[from] FactoryError),

    #[error("Invalid item schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Locale value at '{path}' is neither a string nor null")]
    LocaleType { path: String },
}

/// Renders accumulated validation errors as a numbered list.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}
