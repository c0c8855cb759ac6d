//! Capacitated deferred acceptance with reserved priority seats.
//!
//! Applicants propose to resources in preference order; each resource
//! provisionally holds the best applicants it has seen so far and releases
//! the worst one when a better proposal arrives. The loop stops when no free
//! applicant has anyone left to propose to.
//!
//! Resources optionally reserve extra seats for a set of priority members.
//! Reserved seats are filled first; priority members who do not fit there
//! compete for general seats like everyone else.
//!
//! With strict rankings on every resource the result is the
//! applicant-optimal stable matching, independent of proposal order.
//!
//! # References
//!
//! - Gale & Shapley (1962), "College Admissions and the Stability of Marriage"
//! - Roth & Sotomayor (1990), "Two-Sided Matching"
//! - Abdulkadiroğlu & Sönmez (2003), "School Choice: A Mechanism Design Approach"
//! - Kominers & Sönmez (2016), "Matching with Slot-Specific Priorities"

mod applicant;
mod config;
mod heap;
mod market;
mod outcome;
mod resource;
mod runner;
mod stability;
mod types;

pub use applicant::Applicant;
pub use config::{DaConfig, QueueOrder, Requeue};
pub use market::{ApplicantSpec, Market, MarketSpec, PrioritySpec, ResourceSpec};
pub use outcome::{Matching, RankBuckets};
pub use resource::{Resource, Roster};
pub use runner::{DaResult, DaRunner};
pub use stability::{BlockingPair, StabilityReport, StabilityVerifier};
pub use types::{MatchId, Placement};
