//! Error types for bootstrap analysis.

/// Errors returned by the bootstrap pipeline.
///
/// Every failure is deterministic given the same inputs; nothing here is
/// worth retrying.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Caller-supplied data or parameters violate a precondition.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Human-readable description of the violated precondition.
        reason: String,
    },

    /// A [`CancelToken`](crate::CancelToken) was tripped between replicates.
    #[error("bootstrap cancelled after {completed} of {requested} replicates")]
    Cancelled {
        /// Replicates finished before the cancellation was observed.
        completed: usize,
        /// Replicates originally requested.
        requested: usize,
    },
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Whether this is an [`Error::InvalidInput`].
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = Error::invalid("n_boots must be at least 2, got 1");
        assert_eq!(
            err.to_string(),
            "invalid input: n_boots must be at least 2, got 1"
        );
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_cancelled_display() {
        let err = Error::Cancelled {
            completed: 10,
            requested: 1000,
        };
        assert_eq!(
            err.to_string(),
            "bootstrap cancelled after 10 of 1000 replicates"
        );
        assert!(!err.is_invalid_input());
    }
}
