//! Errors returned by [`AbilityManager`](super::AbilityManager) operations.

use crate::ability::{AbilityId, DefinitionError};
use crate::error::{EngineError, ErrorSeverity};

/// Failures of manager calls.
///
/// A cast that is merely not usable right now is not an error; it comes back
/// as [`CastOutcome::Rejected`](super::CastOutcome::Rejected).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ManagerError {
    #[error("ability {0} is not granted to this actor")]
    AbilityNotFound(AbilityId),

    #[error("no cast in progress")]
    NotCasting,

    #[error("ability {0} does not take a target")]
    TargetNotRequired(AbilityId),

    #[error("invalid ability definition: {0}")]
    InvalidDefinition(#[from] DefinitionError),
}

impl EngineError for ManagerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AbilityNotFound(_) | Self::InvalidDefinition(_) => ErrorSeverity::Validation,
            Self::NotCasting | Self::TargetNotRequired(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AbilityNotFound(_) => "MANAGER_ABILITY_NOT_FOUND",
            Self::NotCasting => "MANAGER_NOT_CASTING",
            Self::TargetNotRequired(_) => "MANAGER_TARGET_NOT_REQUIRED",
            Self::InvalidDefinition(_) => "MANAGER_INVALID_DEFINITION",
        }
    }
}
