//! Error taxonomy for matching runs.
//!
//! Errors fall into two groups:
//!
//! - **Invalid input**: the market references something that does not exist
//!   or is ambiguous. Detected by [`Market::validate`](crate::da::Market::validate)
//!   before any proposal is made.
//! - **Invariant violation**: the engine reached a state that a correct
//!   implementation never produces. The message carries the offending state.
//!
//! An applicant that exhausts its preference list is *not* an error; it is
//! reported as [`Placement::Unmatched`](crate::da::Placement::Unmatched).

use thiserror::Error;

/// Errors produced while building or running a matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Two applicants share the same identifier.
    #[error("duplicate applicant id {0}")]
    DuplicateApplicant(String),

    /// Two resources share the same identifier.
    #[error("duplicate resource id {0}")]
    DuplicateResource(String),

    /// An applicant's preference list names a resource that is not in the market.
    #[error("applicant {applicant} lists unknown resource {resource}")]
    UnknownResource { applicant: String, resource: String },

    /// An applicant lists the same resource twice.
    #[error("applicant {applicant} lists resource {resource} more than once")]
    DuplicatePreference { applicant: String, resource: String },

    /// A resource has no rank for an applicant that may propose to it.
    #[error("resource {resource} has no rank for applicant {applicant}")]
    UnrankedApplicant { resource: String, applicant: String },

    /// A resource grants priority standing to an applicant not in the market.
    #[error("resource {resource} grants priority to unknown applicant {applicant}")]
    UnknownPriorityMember { resource: String, applicant: String },

    /// Internal consistency check failed. Never expected on well-formed input.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl MatchError {
    /// Whether this error was caused by malformed input.
    pub fn is_invalid_input(&self) -> bool {
        !self.is_invariant_violation()
    }

    /// Whether this error signals a broken engine invariant.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, MatchError::Invariant(_))
    }

    pub(crate) fn unranked(resource: &impl std::fmt::Debug, applicant: &impl std::fmt::Debug) -> Self {
        MatchError::UnrankedApplicant {
            resource: format!("{resource:?}"),
            applicant: format!("{applicant:?}"),
        }
    }
}
