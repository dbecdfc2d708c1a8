//! Error types for skill operations

use thiserror::Error;

/// Coarse classification of a [`SkillError`], for callers that branch on the
/// failure category rather than the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An expected file or directory is absent
    NotFound,
    /// Document structure or YAML decode failure
    Parse,
    /// One or more validation rules were violated
    Validation,
    /// Caller supplied unusable input
    InvalidArgument,
    /// The archive container is unreadable or unsafe
    Archive,
    /// Underlying filesystem error
    Io,
}

/// Skill errors
#[derive(Debug, Error)]
pub enum SkillError {
    /// Expected file or directory is absent
    #[error("{0}")]
    NotFound(String),

    /// SKILL.md structure or frontmatter decode failure
    #[error("{0}")]
    Parse(String),

    /// Validation failed; carries every violation in check order
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    /// Rejected input (e.g. empty name passed to the generator)
    #[error("{0}")]
    InvalidArgument(String),

    /// Archive container error
    #[error("Archive error: {0}")]
    Archive(String),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkillError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Validation(_) => ErrorKind::Validation,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Archive(_) => ErrorKind::Archive,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Violations carried by a validation error, empty for every other kind
    pub fn violations(&self) -> &[String] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl From<zip::result::ZipError> for SkillError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::Archive(other.to_string()),
        }
    }
}

impl From<walkdir::Error> for SkillError {
    fn from(err: walkdir::Error) -> Self {
        let message = err.to_string();
        Self::Io(
            err.into_io_error()
                .unwrap_or_else(|| std::io::Error::other(message)),
        )
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, SkillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_joins_violations() {
        let err = SkillError::Validation(vec![
            "name is required".to_string(),
            "description is required".to_string(),
        ]);
        assert_eq!(err.to_string(), "name is required, description is required");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_non_validation_error_has_no_violations() {
        let err = SkillError::NotFound("SKILL.md not found in /tmp/x".to_string());
        assert!(err.violations().is_empty());
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
