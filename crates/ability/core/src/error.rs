//! Common error infrastructure for ability-core.
//!
//! Domain-specific errors (e.g., [`ManagerError`](crate::manager::ManagerError),
//! [`SignatureError`](crate::formula::SignatureError)) live in their respective
//! modules. They all implement [`EngineError`] so callers can classify failures
//! without matching on every variant.
//!
//! # Taxonomy
//!
//! - **Expected outcomes** (ability not usable, requirement failed, charge
//!   unavailable) are *not* errors. They are returned as plain enums such as
//!   [`UseOutcome`](crate::ability::UseOutcome).
//! - **Lookup failures** (unknown ability id) are errors with
//!   [`ErrorSeverity::Validation`].
//! - **Binding failures** are never errors: an unresolved formula degrades to
//!   the base value and is reported through logging.
//! - **Invariant violations** (negative cooldown, malformed signature reaching
//!   the core, invoking an unbound formula) panic.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry later or with another request.
    ///
    /// Examples: nothing is being cast, so there is nothing to target.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: ability id unknown to the manager, malformed signature text.
    Validation,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all ability-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Error codes are stable identifiers suitable for logs and tests
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
