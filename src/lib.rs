//! Stable matching between applicants and capacity-limited resources.
//!
//! Provides a generic implementation of applicant-proposing deferred
//! acceptance (Gale–Shapley) for many-to-one markets such as school choice:
//!
//! - **Deferred acceptance**: propose/reject loop over bounded
//!   provisional-acceptance pools, with optional reserved seats for
//!   priority members.
//! - **Stability verification**: independent scan for blocking pairs.
//! - **Rank tables**: resource-side orderings from lists, scores, or
//!   seeded lotteries.
//!
//! # Architecture
//!
//! Identifiers are generic ([`da::MatchId`]): the crate contains no
//! domain-specific concepts. Generating populations, estimating match
//! probabilities, and persisting results are left to consumers.
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` on inputs, configs, and results.
//! - `parallel`: run the stability scan on rayon.
//! - `wasm`: `runMatching` entry point for JavaScript callers.

pub mod da;
pub mod error;
pub mod ranking;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::MatchError;
