//! Deferred-acceptance execution loop.
//!
//! [`DaRunner`] drains a queue of free applicants: each one proposes down
//! its list until some resource provisionally accepts it. An applicant
//! displaced by that acceptance goes back into the queue. The loop ends when
//! the queue is empty, i.e. when every applicant is either seated or has
//! exhausted its list.

use super::config::{DaConfig, QueueOrder, Requeue};
use super::market::Market;
use super::outcome::Matching;
use super::stability::{StabilityReport, StabilityVerifier};
use super::types::MatchId;
use crate::error::MatchError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Result of a deferred-acceptance run.
#[derive(Debug, Clone)]
pub struct DaResult<A: MatchId, R: MatchId> {
    /// Final applicant and resource state.
    pub matching: Matching<A, R>,

    /// Total proposals sent (accepted or not).
    pub proposals: usize,

    /// Number of times a held applicant lost its seat.
    pub evictions: usize,

    /// Applicants that exhausted their preferences.
    pub unmatched: usize,

    /// Stability report, when verification was enabled.
    pub stability: Option<StabilityReport<A, R>>,
}

/// Executes capacitated deferred acceptance (applicants propose).
///
/// # Usage
///
/// ```
/// use u_matching::da::{DaConfig, DaRunner, Market, Placement, Resource};
/// use u_matching::ranking::RankTable;
///
/// let ranking = || RankTable::from_order(["A", "B"]);
/// let market = Market::new()
///     .with_applicant("A", ["X", "Y"])
///     .with_applicant("B", ["X", "Y"])
///     .with_resource(Resource::new("X", ranking(), 1))
///     .with_resource(Resource::new("Y", ranking(), 1));
///
/// let result = DaRunner::run(market, &DaConfig::default()).unwrap();
/// assert_eq!(
///     result.matching.placement(&"B"),
///     Some(Placement::Matched { resource: "Y", rank: 1 })
/// );
/// ```
pub struct DaRunner;

impl DaRunner {
    /// Validates the market and runs deferred acceptance to its fixed point.
    ///
    /// # Errors
    ///
    /// Invalid-input variants of [`MatchError`] when validation fails;
    /// [`MatchError::Invariant`] if an internal consistency check trips.
    pub fn run<A: MatchId, R: MatchId>(
        market: Market<A, R>,
        config: &DaConfig,
    ) -> Result<DaResult<A, R>, MatchError> {
        let budget = match config.max_proposals {
            0 => market.total_preferences(),
            n => n,
        };
        let mut matching = market.into_matching()?;
        let mut rng = config.is_randomized().then(|| match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        });

        debug!(
            applicants = matching.applicants.len(),
            resources = matching.resources.len(),
            budget,
            queue_order = ?config.queue_order,
            requeue = ?config.requeue,
            "starting deferred acceptance"
        );

        let mut queue = initial_queue(matching.applicants.len(), config.queue_order, rng.as_mut());
        let mut proposals = 0usize;
        let mut evictions = 0usize;

        while let Some(idx) = queue.pop_front() {
            let Some(target) = propose_until_accepted(&mut matching, idx, &mut proposals, budget)? else {
                trace!(applicant = ?matching.applicants[idx].id(), "preferences exhausted");
                continue;
            };

            let applicant = &mut matching.applicants[idx];
            applicant.set_matched(true);
            let id = applicant.id().clone();

            let Some(rejected) = matching.resources[target].accept(id.clone())? else {
                continue;
            };
            if rejected == id {
                return Err(MatchError::Invariant(format!(
                    "resource {:?} rejected applicant {:?} right after admitting it",
                    matching.resources[target].id(),
                    id
                )));
            }

            let Some(&evicted) = matching.applicant_index.get(&rejected) else {
                return Err(MatchError::Invariant(format!(
                    "resource {:?} evicted unknown applicant {:?}",
                    matching.resources[target].id(),
                    rejected
                )));
            };
            trace!(
                resource = ?matching.resources[target].id(),
                admitted = ?id,
                evicted = ?rejected,
                "eviction"
            );
            matching.applicants[evicted].set_matched(false);
            evictions += 1;
            requeue(&mut queue, evicted, config.requeue, rng.as_mut());
        }

        let unmatched = matching.applicants.len() - matching.matched_count();
        debug!(proposals, evictions, unmatched, "deferred acceptance converged");

        let stability = config.verify.then(|| {
            let report = StabilityVerifier::verify(&matching);
            if !report.is_stable() {
                warn!(
                    blocking_pairs = report.blocking_pairs.len(),
                    "matching is not stable"
                );
            }
            report
        });

        Ok(DaResult {
            matching,
            proposals,
            evictions,
            unmatched,
            stability,
        })
    }
}

/// Lets applicant `idx` propose down its list. Returns the index of the
/// first resource that would accept, or `None` once the list is exhausted.
fn propose_until_accepted<A: MatchId, R: MatchId>(
    matching: &mut Matching<A, R>,
    idx: usize,
    proposals: &mut usize,
    budget: usize,
) -> Result<Option<usize>, MatchError> {
    while matching.applicants[idx].can_propose() {
        let applicant = &mut matching.applicants[idx];
        let target = applicant.propose()?.clone();
        *proposals += 1;
        if *proposals > budget {
            return Err(MatchError::Invariant(format!(
                "proposal budget {budget} exceeded by applicant {:?} at cursor {:?}",
                applicant.id(),
                applicant.cursor()
            )));
        }

        let Some(&r) = matching.resource_index.get(&target) else {
            return Err(MatchError::Invariant(format!(
                "applicant {:?} proposed to unindexed resource {target:?}",
                applicant.id()
            )));
        };

        let accepted = matching.resources[r].would_accept(applicant.id())?;
        trace!(
            applicant = ?applicant.id(),
            resource = ?matching.resources[r].id(),
            accepted,
            "proposal"
        );
        if accepted {
            return Ok(Some(r));
        }
    }
    Ok(None)
}

fn initial_queue(n: usize, order: QueueOrder, rng: Option<&mut StdRng>) -> VecDeque<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    match (order, rng) {
        (QueueOrder::Reversed, _) => indices.reverse(),
        (QueueOrder::Shuffled, Some(rng)) => indices.shuffle(rng),
        _ => {}
    }
    indices.into()
}

fn requeue(queue: &mut VecDeque<usize>, idx: usize, policy: Requeue, rng: Option<&mut StdRng>) {
    match (policy, rng) {
        (Requeue::Front, _) => queue.push_front(idx),
        (Requeue::Random, Some(rng)) => {
            let at = rng.random_range(0..=queue.len());
            queue.insert(at, idx);
        }
        _ => queue.push_back(idx),
    }
}
