// caseline-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by pure domain logic. None of them is worth retrying:
/// re-running the same input reproduces the same failure.
#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Payload is not a JSON array of records: {0}")]
    #[diagnostic(
        code(caseline::domain::payload_shape),
        help("The source API must return a JSON array of objects.")
    )]
    PayloadShape(String),

    #[error("Record #{record}: missing source field '{field}'")]
    #[diagnostic(code(caseline::domain::missing_field))]
    MissingField { record: usize, field: String },

    #[error("Record #{record}: unexpected source field '{field}'")]
    #[diagnostic(
        code(caseline::domain::unexpected_field),
        help("The source schema changed. Update the field mapping or disable `strict_fields`.")
    )]
    UnexpectedField { record: usize, field: String },

    #[error("Record #{record}: invalid age value {value}")]
    #[diagnostic(
        code(caseline::domain::invalid_age),
        help("Ages must be non-negative numbers (\"0.0\" is accepted as 0).")
    )]
    InvalidAge { record: usize, value: String },

    #[error("Record #{record}: field '{field}' is not an integer ({value})")]
    #[diagnostic(code(caseline::domain::invalid_integer))]
    InvalidInteger {
        record: usize,
        field: String,
        value: String,
    },

    #[error("Record #{record}: unparsable timestamp {value}")]
    #[diagnostic(code(caseline::domain::invalid_timestamp))]
    InvalidTimestamp { record: usize, value: String },

    #[error("Table encoding failed: {0}")]
    #[diagnostic(code(caseline::domain::table))]
    Table(#[from] arrow::error::ArrowError),

    #[error("Circular dependency detected involving: {0}")]
    #[diagnostic(code(caseline::domain::cycle))]
    CircularDependency(String),

    #[error("Task '{task}' requires the output of '{upstream}', which is not available")]
    #[diagnostic(code(caseline::domain::missing_upstream_output))]
    MissingUpstreamOutput { task: String, upstream: String },
}
