//! CommentGuard Verdict Policy
//!
//! Pure derivation of the caller-facing verdict from a set of
//! per-category scores: the aggregate toxicity flag, the displayed
//! maximum, and the severity level. No hidden state, no I/O.

pub mod verdict;

pub use verdict::{
    assess, ToxicityLevel, Verdict, BATCH_PREDICT_THRESHOLD, SINGLE_PREDICT_THRESHOLD,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::verdict::{
        assess, ToxicityLevel, Verdict, BATCH_PREDICT_THRESHOLD, SINGLE_PREDICT_THRESHOLD,
    };
}
