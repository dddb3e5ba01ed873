//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use difstat::prelude::*;
//! ```

pub use crate::data::{ScoreSource, ScoredTable, DEFAULT_MISSING};
pub use crate::dif::{
    CTermGrouping, DifBatchRunner, DifConfig, DifFlag, DifReport, ItemOutcome, ItemResult,
    Statistic, StrataSpec,
};
pub use crate::error::DifError;
