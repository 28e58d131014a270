//! Error types for the MCS implementation.
//!
//! Configuration problems are reported through [`McsError`] before any
//! objective evaluation happens. Every way a run can end is described by a
//! [`McsReturnCode`]: negative values are errors, positive values are normal
//! terminations.

use thiserror::Error;

/// Return codes for a Multilevel Coordinate Search run.
///
/// Negative values indicate errors, positive values indicate successful termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum McsReturnCode {
    /// Invalid bounds (lower >= upper, NaN, or infinite where not allowed)
    InvalidBounds = -1,
    /// Bound vectors or per-dimension settings disagree on the dimension count
    DimensionMismatch = -2,
    /// Population size (candidates per dimension) below 3
    InvalidPopulationSize = -3,
    /// Maximum number of levels is zero
    InvalidMaxLevels = -4,
    /// Initialization list or initial index is unusable
    InvalidInitList = -5,
    /// Invalid arguments
    InvalidArgs = -101,
    /// Forced stop via callback
    ForcedStop = -102,

    /// Maximum function evaluations exceeded
    MaxFevalExceeded = 1,
    /// Acceptable objective value reached (within tolerance of `fglobal`)
    GlobalFound = 3,
    /// Too many consecutive sweeps without improving the best value
    StaleSweeps = 4,
    /// No box below the maximum level remains to be processed
    Exhausted = 5,
    /// Maximum time exceeded
    MaxTimeExceeded = 6,
}

impl McsReturnCode {
    /// Returns true if this is a successful termination (positive code).
    pub fn is_success(&self) -> bool {
        (*self as i32) > 0
    }

    /// Returns true if this is an error (negative code).
    pub fn is_error(&self) -> bool {
        (*self as i32) < 0
    }

    /// Convert from an integer code.
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::InvalidBounds),
            -2 => Some(Self::DimensionMismatch),
            -3 => Some(Self::InvalidPopulationSize),
            -4 => Some(Self::InvalidMaxLevels),
            -5 => Some(Self::InvalidInitList),
            -101 => Some(Self::InvalidArgs),
            -102 => Some(Self::ForcedStop),
            1 => Some(Self::MaxFevalExceeded),
            3 => Some(Self::GlobalFound),
            4 => Some(Self::StaleSweeps),
            5 => Some(Self::Exhausted),
            6 => Some(Self::MaxTimeExceeded),
            _ => None,
        }
    }
}

/// Errors that can occur while configuring an MCS run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum McsError {
    #[error("Invalid bounds in dimension {dim}: lower bound must be < upper bound")]
    InvalidBounds { dim: usize },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Population size must be at least 3, got {0}")]
    InvalidPopulationSize(usize),

    #[error("Maximum number of levels must be positive, got {0}")]
    InvalidMaxLevels(usize),

    #[error("Initial index {index} out of range in dimension {dim}")]
    InvalidInitialIndex { dim: usize, index: usize },

    #[error("Invalid initialization list: {0}")]
    InvalidInitList(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
}

impl McsError {
    /// The return code corresponding to this error.
    pub fn code(&self) -> McsReturnCode {
        match self {
            McsError::InvalidBounds { .. } => McsReturnCode::InvalidBounds,
            McsError::DimensionMismatch { .. } => McsReturnCode::DimensionMismatch,
            McsError::InvalidPopulationSize(_) => McsReturnCode::InvalidPopulationSize,
            McsError::InvalidMaxLevels(_) => McsReturnCode::InvalidMaxLevels,
            McsError::InvalidInitialIndex { .. } | McsError::InvalidInitList(_) => {
                McsReturnCode::InvalidInitList
            }
            McsError::InvalidArgs(_) => McsReturnCode::InvalidArgs,
        }
    }
}

/// Result type alias for MCS operations.
pub type Result<T> = std::result::Result<T, McsError>;

/// Control flow of an operation that evaluates the objective.
///
/// `Err(code)` means a termination predicate fired; callers unwind with `?`
/// and keep whatever state was already committed.
pub type Step<T = ()> = std::result::Result<T, McsReturnCode>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_code_sign() {
        assert!(McsReturnCode::MaxFevalExceeded.is_success());
        assert!(McsReturnCode::Exhausted.is_success());
        assert!(McsReturnCode::ForcedStop.is_error());
        assert!(McsReturnCode::InvalidBounds.is_error());
        assert!(!McsReturnCode::GlobalFound.is_error());
    }

    #[test]
    fn test_return_code_roundtrip_i32() {
        for code in [
            McsReturnCode::InvalidBounds,
            McsReturnCode::DimensionMismatch,
            McsReturnCode::InvalidPopulationSize,
            McsReturnCode::InvalidMaxLevels,
            McsReturnCode::InvalidInitList,
            McsReturnCode::InvalidArgs,
            McsReturnCode::ForcedStop,
            McsReturnCode::MaxFevalExceeded,
            McsReturnCode::GlobalFound,
            McsReturnCode::StaleSweeps,
            McsReturnCode::Exhausted,
            McsReturnCode::MaxTimeExceeded,
        ] {
            assert_eq!(McsReturnCode::from_i32(code as i32), Some(code));
        }
        assert_eq!(McsReturnCode::from_i32(2), None);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            McsError::InvalidPopulationSize(2).code(),
            McsReturnCode::InvalidPopulationSize
        );
        assert_eq!(
            McsError::InvalidInitialIndex { dim: 0, index: 7 }.code(),
            McsReturnCode::InvalidInitList
        );
        assert_eq!(McsError::InvalidMaxLevels(0).code(), McsReturnCode::InvalidMaxLevels);
    }

    #[test]
    fn test_error_display() {
        let e = McsError::InvalidBounds { dim: 3 };
        assert!(e.to_string().contains("dimension 3"));
        let e = McsError::DimensionMismatch { expected: 2, found: 5 };
        assert_eq!(e.to_string(), "Dimension mismatch: expected 2, found 5");
    }
}
