//! Matching state and its result views.

use super::applicant::Applicant;
use super::resource::{Resource, Roster};
use super::types::{MatchId, Placement};
use std::collections::HashMap;

/// Applicants grouped by the preference position they were matched at.
///
/// `by_rank[k]` lists applicants matched to their `k`-th choice (0-based);
/// `unmatched` lists the rest. Within a bucket applicants keep input order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankBuckets<A> {
    pub by_rank: Vec<Vec<A>>,
    pub unmatched: Vec<A>,
}

impl<A> RankBuckets<A> {
    /// Number of applicants matched at position `rank`.
    pub fn count_at(&self, rank: usize) -> usize {
        self.by_rank.get(rank).map_or(0, Vec::len)
    }

    pub fn matched_count(&self) -> usize {
        self.by_rank.iter().map(Vec::len).sum()
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched.len()
    }
}

/// Applicants and resources with their provisional holdings.
///
/// Produced by [`DaRunner`](super::DaRunner); after a run it holds the
/// final, stable state. Every view is a pure read.
#[derive(Debug, Clone)]
pub struct Matching<A: MatchId, R: MatchId> {
    pub(crate) applicants: Vec<Applicant<A, R>>,
    pub(crate) resources: Vec<Resource<A, R>>,
    pub(crate) applicant_index: HashMap<A, usize>,
    pub(crate) resource_index: HashMap<R, usize>,
}

impl<A: MatchId, R: MatchId> Matching<A, R> {
    pub(crate) fn new(applicants: Vec<Applicant<A, R>>, resources: Vec<Resource<A, R>>) -> Self {
        let applicant_index = applicants
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id().clone(), i))
            .collect();
        let resource_index = resources
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id().clone(), i))
            .collect();
        Self {
            applicants,
            resources,
            applicant_index,
            resource_index,
        }
    }

    pub fn applicants(&self) -> &[Applicant<A, R>] {
        &self.applicants
    }

    pub fn resources(&self) -> &[Resource<A, R>] {
        &self.resources
    }

    pub fn applicant(&self, id: &A) -> Option<&Applicant<A, R>> {
        self.applicant_index.get(id).map(|&i| &self.applicants[i])
    }

    pub fn resource(&self, id: &R) -> Option<&Resource<A, R>> {
        self.resource_index.get(id).map(|&i| &self.resources[i])
    }

    /// Placement of one applicant, `None` if the id is unknown.
    pub fn placement(&self, id: &A) -> Option<Placement<R>> {
        self.applicant(id).map(Applicant::result)
    }

    /// Every applicant's placement, in input order.
    pub fn placements(&self) -> Vec<(A, Placement<R>)> {
        self.applicants
            .iter()
            .map(|a| (a.id().clone(), a.result()))
            .collect()
    }

    /// Placements keyed by applicant id.
    pub fn assignment(&self) -> HashMap<A, Placement<R>> {
        self.applicants
            .iter()
            .map(|a| (a.id().clone(), a.result()))
            .collect()
    }

    pub fn roster(&self, id: &R) -> Option<Roster<A, R>> {
        self.resource(id).map(Resource::snapshot)
    }

    /// Every resource's roster, in input order.
    pub fn rosters(&self) -> Vec<Roster<A, R>> {
        self.resources.iter().map(Resource::snapshot).collect()
    }

    /// Applicants left without a seat, in input order.
    pub fn unmatched(&self) -> Vec<&A> {
        self.applicants
            .iter()
            .filter(|a| !a.is_matched())
            .map(Applicant::id)
            .collect()
    }

    pub fn matched_count(&self) -> usize {
        self.applicants.iter().filter(|a| a.is_matched()).count()
    }

    /// Groups applicants by matched preference position.
    ///
    /// There is one bucket per position up to the longest preference list,
    /// so trailing buckets may be empty.
    pub fn rank_buckets(&self) -> RankBuckets<A> {
        let depth = self
            .applicants
            .iter()
            .map(|a| a.preferences().len())
            .max()
            .unwrap_or(0);
        let mut buckets = RankBuckets {
            by_rank: vec![Vec::new(); depth],
            unmatched: Vec::new(),
        };
        for applicant in &self.applicants {
            match applicant.result().rank() {
                Some(rank) => buckets.by_rank[rank].push(applicant.id().clone()),
                None => buckets.unmatched.push(applicant.id().clone()),
            }
        }
        buckets
    }
}
