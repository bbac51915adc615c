//! Schema-level validation of progress payloads.
//!
//! Deserialization accepts any number for `percentage`; these checks are run
//! separately by whoever wants to flag out-of-range values.

use thiserror::Error;

use crate::notifications::ProgressNotification;
use crate::params::{ProgressDoneParams, ProgressReportParams, ProgressStartParams};

/// Smallest meaningful percentage.
pub const MIN_PERCENTAGE: f64 = 0.0;
/// Largest meaningful percentage; 100 is considered complete.
pub const MAX_PERCENTAGE: f64 = 100.0;

/// Validation failures for progress payloads.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Percentage {0} is outside [0, 100]")]
    PercentageOutOfRange(f64),

    #[error("Progress id must not be empty")]
    EmptyId,

    #[error("Progress title must not be empty")]
    EmptyTitle,
}

/// Check that a percentage is finite and within `[0, 100]`.
pub fn validate_percentage(percentage: f64) -> Result<(), ValidationError> {
    if percentage.is_finite() && (MIN_PERCENTAGE..=MAX_PERCENTAGE).contains(&percentage) {
        Ok(())
    } else {
        Err(ValidationError::PercentageOutOfRange(percentage))
    }
}

fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::EmptyId);
    }
    Ok(())
}

/// Payloads that can be checked against the schema constraints.
pub trait Validate {
    /// Return the first constraint the payload violates.
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for ProgressStartParams {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_id(&self.id)?;
        if self.title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        self.percentage.map_or(Ok(()), validate_percentage)
    }
}

impl Validate for ProgressReportParams {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_id(&self.id)?;
        self.percentage.map_or(Ok(()), validate_percentage)
    }
}

impl Validate for ProgressDoneParams {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_id(&self.id)
    }
}

impl Validate for ProgressNotification {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Start(params) => params.validate(),
            Self::Report(params) => params.validate(),
            Self::Done(params) => params.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_bounds() {
        assert!(validate_percentage(0.0).is_ok());
        assert!(validate_percentage(42.5).is_ok());
        assert!(validate_percentage(100.0).is_ok());

        assert_eq!(
            validate_percentage(100.5),
            Err(ValidationError::PercentageOutOfRange(100.5))
        );
        assert!(validate_percentage(-1.0).is_err());
        assert!(validate_percentage(f64::NAN).is_err());
        assert!(validate_percentage(f64::INFINITY).is_err());
    }

    #[test]
    fn test_start_validation() {
        assert!(ProgressStartParams::new("a", "Indexing").validate().is_ok());
        assert_eq!(
            ProgressStartParams::new("", "Indexing").validate(),
            Err(ValidationError::EmptyId)
        );
        assert_eq!(
            ProgressStartParams::new("a", "").validate(),
            Err(ValidationError::EmptyTitle)
        );
        assert!(
            ProgressStartParams::new("a", "Indexing")
                .with_percentage(150.0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_report_validation() {
        assert!(ProgressReportParams::new("a").validate().is_ok());
        assert!(
            ProgressReportParams::new("a")
                .with_percentage(-5.0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_notification_validation() {
        let done: ProgressNotification = ProgressDoneParams::new("").into();
        assert_eq!(done.validate(), Err(ValidationError::EmptyId));
    }
}
