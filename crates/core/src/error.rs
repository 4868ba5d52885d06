//! Domain error model.

use thiserror::Error;

use crate::id::FamilyId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// An input the engine cannot compute without.
///
/// Absence of any of these is a precondition failure, never an empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    Family(FamilyId),
    Settings,
    CourseCatalog,
    HourLabels,
    GradeTable,
}

impl core::fmt::Display for MissingInput {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MissingInput::Family(id) => write!(f, "family {id}"),
            MissingInput::Settings => f.write_str("settings"),
            MissingInput::CourseCatalog => f.write_str("course catalog"),
            MissingInput::HourLabels => f.write_str("hour labels"),
            MissingInput::GradeTable => f.write_str("grade table"),
        }
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic failures of the billing domain.
/// Data-quality anomalies (unparsable amounts, unknown course names) are not
/// errors; they are recovered where they occur.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required input was not supplied.
    #[error("precondition failed: missing {0}")]
    Precondition(MissingInput),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier or public token was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn missing(input: MissingInput) -> Self {
        Self::Precondition(input)
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}
