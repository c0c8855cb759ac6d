//! Resource-side rank tables.
//!
//! A [`RankTable`] maps each applicant to an integer rank where **lower is
//! better**. The matching engine assumes ranks form a strict order; the
//! constructors here resolve ties before the table reaches a resource:
//!
//! - [`RankTable::from_order`]: rank = position in a best-first list.
//! - [`RankTable::from_ranks`]: explicit ranks supplied by the caller.
//! - [`RankTable::from_scores`]: sort by a score, ties broken by id.
//! - [`RankTable::lottery`]: a uniformly random order drawn from an RNG,
//!   the usual tie-breaker in school-choice lotteries.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::hash::Hash;

/// Applicant → rank mapping held by a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankTable<A: Eq + Hash> {
    ranks: HashMap<A, usize>,
}

impl<A: Eq + Hash> RankTable<A> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            ranks: HashMap::new(),
        }
    }

    /// Builds a table from a best-first ordering.
    ///
    /// If an applicant appears more than once, its first position wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_matching::ranking::RankTable;
    ///
    /// let table = RankTable::from_order(["ana", "ben", "cid"]);
    /// assert_eq!(table.rank(&"ana"), Some(0));
    /// assert_eq!(table.rank(&"cid"), Some(2));
    /// assert_eq!(table.rank(&"dee"), None);
    /// ```
    pub fn from_order(order: impl IntoIterator<Item = A>) -> Self {
        let mut ranks = HashMap::new();
        for (rank, applicant) in order.into_iter().enumerate() {
            ranks.entry(applicant).or_insert(rank);
        }
        Self { ranks }
    }

    /// Builds a table from explicit `(applicant, rank)` pairs.
    ///
    /// Ranks need not be contiguous. Equal ranks are tolerated but the
    /// engine then falls back to comparing applicant ids.
    pub fn from_ranks(pairs: impl IntoIterator<Item = (A, usize)>) -> Self {
        Self {
            ranks: pairs.into_iter().collect(),
        }
    }

    /// Returns the rank of an applicant, if ranked.
    pub fn rank(&self, applicant: &A) -> Option<usize> {
        self.ranks.get(applicant).copied()
    }

    /// Whether the applicant is ranked by this table.
    pub fn contains(&self, applicant: &A) -> bool {
        self.ranks.contains_key(applicant)
    }

    /// Number of ranked applicants.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether no applicant is ranked.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Sets (or overwrites) the rank of one applicant.
    pub fn insert(&mut self, applicant: A, rank: usize) {
        self.ranks.insert(applicant, rank);
    }
}

impl<A: Eq + Hash + Ord + Clone> RankTable<A> {
    /// Builds a table by sorting applicants on a score (lower first).
    ///
    /// Applicants with equal scores are ordered by id so the result is a
    /// strict order independent of input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_matching::ranking::RankTable;
    ///
    /// // Higher grade average ranks first: negate into a "lower is better" key.
    /// let table = RankTable::from_scores([("b", -35), ("a", -35), ("c", -40)]);
    /// assert_eq!(table.ordered(), vec!["c", "a", "b"]);
    /// ```
    pub fn from_scores<K: Ord>(scored: impl IntoIterator<Item = (A, K)>) -> Self {
        let mut scored: Vec<(A, K)> = scored.into_iter().collect();
        scored.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Self::from_order(scored.into_iter().map(|(applicant, _)| applicant))
    }

    /// Builds a table from a uniformly random order of `applicants`.
    ///
    /// The input order does not influence the outcome beyond the RNG draw:
    /// applicants are sorted by id before shuffling.
    pub fn lottery<R: Rng + ?Sized>(applicants: impl IntoIterator<Item = A>, rng: &mut R) -> Self {
        let mut pool: Vec<A> = applicants.into_iter().collect();
        pool.sort();
        pool.dedup();
        pool.shuffle(rng);
        Self::from_order(pool)
    }

    /// Returns ranked applicants best-first (ties by id).
    pub fn ordered(&self) -> Vec<A> {
        let mut entries: Vec<(&A, usize)> = self.ranks.iter().map(|(a, &r)| (a, r)).collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        entries.into_iter().map(|(a, _)| a.clone()).collect()
    }
}

impl<A: Eq + Hash> Default for RankTable<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Eq + Hash> FromIterator<A> for RankTable<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self::from_order(iter)
    }
}
