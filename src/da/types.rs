//! Core identifier trait and per-applicant outcome.

use std::fmt::Debug;
use std::hash::Hash;

/// Identifier usable for applicants and resources.
///
/// `Ord` is required because applicant ids break accidental rank ties
/// inside a resource. `Debug` is used for error context and tracing.
///
/// Blanket-implemented for every type meeting the bounds (`u32`,
/// `String`, `&'static str`, ...).
pub trait MatchId: Clone + Eq + Hash + Ord + Debug + Send + Sync {}

impl<T: Clone + Eq + Hash + Ord + Debug + Send + Sync> MatchId for T {}

/// Where an applicant ended up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement<R> {
    /// Holding a seat at `resource`, its `rank`-th choice (0-based).
    Matched { resource: R, rank: usize },
    /// Rejected by (or never accepted at) every listed resource.
    Unmatched,
}

impl<R> Placement<R> {
    /// Whether the applicant holds a seat.
    pub fn is_matched(&self) -> bool {
        matches!(self, Placement::Matched { .. })
    }

    /// The resource the applicant holds a seat at.
    pub fn resource(&self) -> Option<&R> {
        match self {
            Placement::Matched { resource, .. } => Some(resource),
            Placement::Unmatched => None,
        }
    }

    /// Position of the matched resource in the applicant's preferences.
    pub fn rank(&self) -> Option<usize> {
        match self {
            Placement::Matched { rank, .. } => Some(*rank),
            Placement::Unmatched => None,
        }
    }
}
