//! Result type alias used throughout the crate

use crate::error::BentoError;

/// Result type for bento operations
pub type Result<T> = std::result::Result<T, BentoError>;
