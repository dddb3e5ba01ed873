//! difstat: Differential item functioning statistics in pure Rust.
//!
//! Given per-examinee item responses, a raw total score and a group code,
//! difstat checks whether items behave differently for focal and reference
//! examinees matched on ability.
//!
//! # Quick Start
//!
//! ```
//! use difstat::prelude::*;
//!
//! let raw: Vec<f64> = (0..60).map(|i| f64::from(i % 6)).collect();
//! let group: Vec<f64> = (0..60).map(|i| f64::from(i % 2)).collect();
//! let item: Vec<f64> = (0..60).map(|i| f64::from(u8::from((i * 7) % 5 < 3))).collect();
//! let table = ScoredTable::new(
//!     vec![
//!         ("Q1".to_string(), item),
//!         ("RawScore".to_string(), raw),
//!         ("Group".to_string(), group),
//!     ],
//!     DEFAULT_MISSING,
//! )
//! .expect("valid table");
//!
//! let config = DifConfig::default()
//!     .with_strata(StrataSpec::Count(3))
//!     .with_stats(["M_chisq_pval", "Counts"]);
//! let report = DifBatchRunner::new(config)
//!     .expect("valid config")
//!     .run(&table, &["Q1"])
//!     .expect("columns present");
//!
//! assert_eq!(report.get("Q1", Statistic::CountFocal), Some(30.0));
//! ```
//!
//! # Modules
//!
//! - [`data`]: Scored response tables and the [`data::ScoreSource`] trait
//! - [`dif`]: Stratification, SMD, Mantel and Mantel-Haenszel statistics, batch runner
//! - [`stats`]: Descriptive statistics and normal/chi-square tail probabilities
//! - [`error`]: Error type and `Result` alias

pub mod data;
pub mod dif;
pub mod error;
pub mod prelude;
pub mod stats;

pub use error::{DifError, Result};
