use thiserror::Error;

/// dfpatch error types
#[derive(Error, Debug)]
pub enum DfError {
    /// Image reference does not match the reference grammar
    #[error("Invalid image reference: {0}")]
    InvalidImageReference(String),

    /// Instruction source text could not be parsed
    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A required instruction is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// A located instruction lacks the value needed for the operation
    #[error("Missing value: {0}")]
    MissingValue(String),

    /// I/O error (reader or output sink)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DfError {
    /// True for both image-reference and instruction syntax failures.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            DfError::InvalidImageReference(_) | DfError::Syntax { .. }
        )
    }
}

/// Result type alias for dfpatch operations
pub type Result<T> = std::result::Result<T, DfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_image_reference_display() {
        let error = DfError::InvalidImageReference("empty path".to_string());
        assert_eq!(error.to_string(), "Invalid image reference: empty path");
    }

    #[test]
    fn test_syntax_error_display() {
        let error = DfError::Syntax {
            line: 7,
            message: "invalid instruction '=x'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Syntax error at line 7: invalid instruction '=x'"
        );
    }

    #[test]
    fn test_not_found_display() {
        let error = DfError::NotFound("no FROM statements found".to_string());
        assert_eq!(error.to_string(), "Not found: no FROM statements found");
    }

    #[test]
    fn test_missing_value_display() {
        let error = DfError::MissingValue("FROM at line 3 has no image".to_string());
        assert_eq!(
            error.to_string(),
            "Missing value: FROM at line 3 has no image"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error: DfError = io_error.into();
        assert!(matches!(error, DfError::Io(_)));
        assert!(error.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_is_parse_error() {
        assert!(DfError::InvalidImageReference(String::new()).is_parse_error());
        assert!(DfError::Syntax {
            line: 1,
            message: String::new()
        }
        .is_parse_error());
        assert!(!DfError::NotFound(String::new()).is_parse_error());
        assert!(!DfError::MissingValue(String::new()).is_parse_error());
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(DfError::NotFound("test".to_string()))
        }

        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }
}
