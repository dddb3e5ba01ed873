//! Error types for DIF computations.
//!
//! Provides rich error context for library consumers. Item-level failures
//! (stratification, degenerate variances) are recoverable and are turned into
//! sentinel cells by the batch runner; configuration failures abort a batch
//! before any per-item work starts.

use std::fmt;

/// Main error type for difstat operations.
///
/// # Examples
///
/// ```
/// use difstat::error::DifError;
///
/// let err = DifError::InsufficientStrataData {
///     stratum: 3,
///     count: 1,
/// };
/// assert!(err.to_string().contains("stratum 3"));
/// assert!(err.is_item_level());
/// ```
#[derive(Debug)]
pub enum DifError {
    /// A stratum holds one observation or none.
    InsufficientStrataData {
        /// Stratum index (0 = lowest raw scores)
        stratum: usize,
        /// Total count across groups and categories
        count: usize,
    },

    /// A variance or ratio denominator is zero for one statistic family.
    DegenerateVariance {
        /// Statistic family name (e.g. "MH")
        family: String,
        /// What was degenerate
        detail: String,
    },

    /// A response value cannot be used as an ordinal category code.
    InvalidCategory {
        /// Item label
        item: String,
        /// Offending value
        value: f64,
    },

    /// Requested statistic name is not known.
    UnknownStatistic {
        /// Name as supplied by the caller
        name: String,
    },

    /// Focal/reference labels are inconsistent with the group column.
    GroupMismatch {
        /// Description of the inconsistency
        message: String,
    },

    /// Column label not present in the table.
    ColumnNotFound {
        /// Missing label
        label: String,
    },

    /// Invalid configuration value.
    InvalidParameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Lengths don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for DifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifError::InsufficientStrataData { stratum, count } => {
                write!(
                    f,
                    "Insufficient strata data: stratum {stratum} has {count} observation(s), need more than 1"
                )
            }
            DifError::DegenerateVariance { family, detail } => {
                write!(f, "Degenerate {family} computation: {detail}")
            }
            DifError::InvalidCategory { item, value } => {
                write!(
                    f,
                    "Invalid category code {value} for item {item}: expected a non-negative integer"
                )
            }
            DifError::UnknownStatistic { name } => {
                write!(f, "Unknown statistic: {name}")
            }
            DifError::GroupMismatch { message } => {
                write!(f, "Group mismatch: {message}")
            }
            DifError::ColumnNotFound { label } => {
                write!(f, "Column not found: {label}")
            }
            DifError::InvalidParameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter: {param} = {value}, expected {constraint}"
                )
            }
            DifError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            DifError::Io(e) => write!(f, "I/O error: {e}"),
            DifError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            DifError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for DifError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DifError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DifError {
    fn from(err: std::io::Error) -> Self {
        DifError::Io(err)
    }
}

impl From<serde_json::Error> for DifError {
    fn from(err: serde_json::Error) -> Self {
        DifError::Serialization(err.to_string())
    }
}

impl From<&str> for DifError {
    fn from(msg: &str) -> Self {
        DifError::Other(msg.to_string())
    }
}

impl From<String> for DifError {
    fn from(msg: String) -> Self {
        DifError::Other(msg)
    }
}

impl DifError {
    /// Create a degenerate-variance error for a statistic family.
    #[must_use]
    pub fn degenerate(family: &str, detail: impl Into<String>) -> Self {
        Self::DegenerateVariance {
            family: family.to_string(),
            detail: detail.into(),
        }
    }

    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }

    /// True for failures scoped to a single item (the batch keeps going).
    #[must_use]
    pub fn is_item_level(&self) -> bool {
        matches!(
            self,
            DifError::InsufficientStrataData { .. }
                | DifError::DegenerateVariance { .. }
                | DifError::InvalidCategory { .. }
        )
    }

    /// True for caller mistakes detected before any item is processed.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DifError::UnknownStatistic { .. }
                | DifError::GroupMismatch { .. }
                | DifError::ColumnNotFound { .. }
                | DifError::InvalidParameter { .. }
        )
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for DifError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, DifError>;
