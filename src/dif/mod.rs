//! Differential item functioning (DIF) statistics.
//!
//! Includes ability stratification and contingency tables, per-stratum
//! variance terms, the Standardized Mean Difference, Mantel and
//! Mantel-Haenszel statistics, the composite ETS severity flag and a batch
//! runner that assembles one report row per item.
//!
//! # Examples
//!
//! ```
//! use difstat::data::ScoredTable;
//! use difstat::dif::{DifBatchRunner, DifConfig, Statistic};
//!
//! // 0 = reference, 1 = focal; focal examinees do worse at equal raw score
//! let raw = vec![1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 1.0, 2.0, 1.0, 2.0];
//! let group = vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0];
//! let item = vec![1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0];
//! let table = ScoredTable::new(
//!     vec![
//!         ("Q1".to_string(), item),
//!         ("RawScore".to_string(), raw),
//!         ("Group".to_string(), group),
//!     ],
//!     -99.0,
//! )
//! .expect("valid table");
//!
//! let runner = DifBatchRunner::new(DifConfig::default()).expect("default config is valid");
//! let report = runner.run(&table, &["Q1"]).expect("columns present");
//! assert_eq!(report.get("Q1", Statistic::CountAll), Some(12.0));
//! assert!(report.get("Q1", Statistic::MhAlpha).is_none()); // not requested
//! ```
//!
//! # References
//!
//! - Holland, P. W., & Thayer, D. T. (1988). Differential item performance and
//!   the Mantel-Haenszel procedure.
//! - Dorans, N. J., & Schmitt, A. P. (1991). Constructed response and
//!   differential item functioning.
//! - Zwick, R., Thayer, D. T., & Mazzeo, J. (1997). Descriptive and
//!   inferential procedures for assessing DIF in polytomous items.

pub mod config;
pub mod flag;
pub mod mantel;
pub mod mantel_haenszel;
pub mod report;
pub mod result;
pub mod runner;
pub mod smd;
pub mod statistic;
pub mod strata;
pub mod table;
pub mod variance;

pub use config::DifConfig;
pub use flag::DifFlag;
pub use mantel::{mantel, MantelResult};
pub use mantel_haenszel::{mantel_haenszel, CTermGrouping, MhOptions, MhResult, ETS_DELTA_SCALE};
pub use report::DifReport;
pub use result::{Descriptives, ItemOutcome, ItemResult, ItemStatistics};
pub use runner::DifBatchRunner;
pub use smd::{smd, SmdResult};
pub use statistic::{resolve_statistics, Cardinality, Family, ResolvedStatistics, StatRequest, Statistic};
pub use strata::{stratum_indices, StrataSpec, StratumAssignment};
pub use table::{ContingencyTable, GroupPair};
pub use variance::{stratum_variance, VarianceFormula};
