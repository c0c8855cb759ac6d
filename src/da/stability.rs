//! Post-hoc stability check.
//!
//! An applicant `a` and a resource `r` form a **blocking pair** when `a`
//! ranks `r` strictly above its current placement (any listed `r` if `a` is
//! unmatched) and `r` would admit `a` right now. A matching is stable iff
//! no blocking pair exists.
//!
//! The verifier only reads the final state and never calls back into the
//! engine, so it can audit matchings produced elsewhere too.

use super::applicant::Applicant;
use super::outcome::Matching;
use super::types::{MatchId, Placement};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// An applicant/resource pair that would both rather be matched together.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockingPair<A, R> {
    pub applicant: A,
    pub resource: R,
    /// Position of `resource` in the applicant's preferences.
    pub preference_rank: usize,
    /// Where the applicant actually ended up.
    pub placement: Placement<R>,
}

/// Outcome of a stability check.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StabilityReport<A, R> {
    /// Every blocking pair, grouped by applicant in input order.
    pub blocking_pairs: Vec<BlockingPair<A, R>>,
    pub applicants_checked: usize,
}

impl<A, R> StabilityReport<A, R> {
    pub fn is_stable(&self) -> bool {
        self.blocking_pairs.is_empty()
    }
}

/// Enumerates blocking pairs of a [`Matching`].
pub struct StabilityVerifier;

impl StabilityVerifier {
    /// Checks every applicant against every resource it prefers to its
    /// placement and reports all blocking pairs found.
    ///
    /// With the `parallel` feature the per-applicant scans run on rayon;
    /// the report is identical either way.
    pub fn verify<A: MatchId, R: MatchId>(matching: &Matching<A, R>) -> StabilityReport<A, R> {
        #[cfg(feature = "parallel")]
        let blocking_pairs = matching
            .applicants
            .par_iter()
            .flat_map_iter(|a| blocking_pairs_of(matching, a))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let blocking_pairs = matching
            .applicants
            .iter()
            .flat_map(|a| blocking_pairs_of(matching, a))
            .collect();

        StabilityReport {
            blocking_pairs,
            applicants_checked: matching.applicants.len(),
        }
    }
}

fn blocking_pairs_of<A: MatchId, R: MatchId>(
    matching: &Matching<A, R>,
    applicant: &Applicant<A, R>,
) -> Vec<BlockingPair<A, R>> {
    let placement = applicant.result();
    let preferred = match placement.rank() {
        Some(rank) => &applicant.preferences()[..rank],
        None => applicant.preferences(),
    };

    preferred
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            matching
                .resource(r)
                .is_some_and(|resource| resource.prefers(applicant.id()))
        })
        .map(|(preference_rank, r)| BlockingPair {
            applicant: applicant.id().clone(),
            resource: r.clone(),
            preference_rank,
            placement: placement.clone(),
        })
        .collect()
}
