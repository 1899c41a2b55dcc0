use thiserror::Error;

use crate::pointing::DirectionBin;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointingError {
    #[error("no objects within range")]
    NoCandidates,
    #[error("selected bin {0} has no matching objects")]
    EmptyBinAfterFilter(DirectionBin),
}

impl PointingError {
    /// `NoCandidates` is a "nothing found" outcome rather than a failure.
    pub fn is_informational(&self) -> bool {
        matches!(self, PointingError::NoCandidates)
    }
}
