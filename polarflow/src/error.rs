//! # Estimation errors

use thiserror::Error;

/// Errors produced while converting or estimating motion.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Correspondence lists are not positionally aligned.
    #[error("mismatched input length: {before} points before, {after} after")]
    MismatchedInputLength { before: usize, after: usize },

    /// There are no samples to pick the dominant vector from.
    #[error("no samples to estimate from")]
    EmptyInput,

    /// A cluster center has no neighbours, not even itself.
    ///
    /// Only reachable with non-finite samples or a refinement center that drifted away from all
    /// the data.
    #[error("cluster center has no neighbouring samples")]
    EmptyCluster,
}

/// Result type for estimation operations.
pub type Result<T> = std::result::Result<T, Error>;
