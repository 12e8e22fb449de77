//! Error types for template expansion.
//!
//! Missing data never produces an error: absent keys, unknown partials and
//! unmatched directives all degrade to empty or literal output. The only
//! failure is a caller-contract violation reported by
//! [`Expander::try_expand`](crate::Expander::try_expand).

use thiserror::Error;

/// Errors reported by strict expansion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// Sections and partials nested deeper than the configured limit,
    /// usually a partial that includes itself.
    #[error("template nesting exceeds the depth limit of {limit}")]
    DepthExceeded { limit: usize },
}
