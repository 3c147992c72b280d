//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("review request carries no artifact files")]
    EmptyArtifact,

    #[error("review request has an empty correlation id")]
    MissingCorrelationId,

    #[error("similarity threshold {0} is outside 0.0..=1.0")]
    InvalidThreshold(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::EmptyArtifact.to_string(),
            "review request carries no artifact files"
        );
        assert!(
            DomainError::InvalidThreshold(1.5)
                .to_string()
                .contains("1.5")
        );
    }
}
