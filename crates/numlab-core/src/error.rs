use thiserror::Error;

#[derive(Debug, Error)]
pub enum NumError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Singular system: {0}")]
    Singular(String),

    #[error("Did not converge: {0}")]
    Convergence(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),
}

impl NumError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, NumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = NumError::DimensionMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 4, got 3");

        let err = NumError::invalid("empty control polygon");
        assert_eq!(err.to_string(), "Invalid input: empty control polygon");
    }

    #[test]
    fn test_io_conversion() {
        fn open_missing() -> Result<()> {
            std::fs::File::open("/definitely/not/here.txt")?;
            Ok(())
        }
        assert!(matches!(open_missing(), Err(NumError::Io(_))));
    }
}
