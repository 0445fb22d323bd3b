use thiserror::Error;

use crate::numeric::NumericError;

/// Failure taxonomy for the order pipeline.
///
/// Validation and arithmetic failures are always raised before any
/// cryptographic work; a signing failure wraps its underlying cause and is
/// never retried here — an identical salt would just reproduce the identical
/// signature.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] NumericError),

    #[error("signing failed: {0}")]
    Signing(#[source] anyhow::Error),
}

impl OrderError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        OrderError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn signing(cause: impl Into<anyhow::Error>) -> Self {
        OrderError::Signing(cause.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_names_the_field() {
        let err = OrderError::validation("price", "must be between 0 and 100");
        assert_eq!(err.to_string(), "invalid price: must be between 0 and 100");
    }

    #[test]
    fn arithmetic_errors_convert() {
        let err: OrderError = NumericError::Malformed("x".into()).into();
        assert!(matches!(err, OrderError::Arithmetic(_)));
    }
}
