//! CommentGuard Core
//!
//! Core types, traits, and utilities shared across CommentGuard components.
//!
//! This crate provides:
//! - The fixed toxicity category set and per-category score types
//! - Error types and result handling
//! - The deterministic text normalizer applied at both training and
//!   inference time

pub mod error;
pub mod labels;
pub mod normalize;

pub use error::{Error, Result};
pub use labels::{CategoryScores, LABEL_COUNT, TOXICITY_LABELS};
pub use normalize::TextNormalizer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::labels::{CategoryScores, LABEL_COUNT, TOXICITY_LABELS};
    pub use crate::normalize::TextNormalizer;
}
