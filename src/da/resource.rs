//! The receiving side: bounded provisional-acceptance pools.
//!
//! A [`Resource`] holds a general pool of `capacity` seats and, optionally,
//! a reserved pool of seats open only to a set of priority members. Both
//! pools are bounded max-heaps keyed by `(rank, applicant id)` with the
//! worst member on top.
//!
//! # Admission table
//!
//! A proposal falls into exactly one branch, evaluated in this order:
//!
//! | Branch | Condition | Effect |
//! |--------|-----------|--------|
//! | `Vacant` | a seat the applicant may occupy is free | admit, reject nobody |
//! | `ReservedOpen` | all seats taken, priority applicant, reserved pool has room | admit to reserved pool, evict worst general member |
//! | `PriorityContest` | all seats taken, reserved pool full, priority applicant | bump through reserved pool, then general pool |
//! | `GeneralContest` | general pool full, general applicant | bounded insert against the general pool only |
//!
//! A general applicant may only ever occupy the general pool, so for it
//! "a seat it may occupy is free" means the general pool has room. A
//! priority applicant may occupy either pool and counts every seat.

use super::heap::{BoundedHeap, Seat};
use super::types::MatchId;
use crate::error::MatchError;
use crate::ranking::RankTable;
use std::collections::HashSet;

/// Admission case for one proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Vacant,
    ReservedOpen,
    PriorityContest,
    GeneralContest,
}

/// Reserved seats and who may take them.
#[derive(Debug, Clone)]
struct PrioritySeats<A: Ord> {
    members: HashSet<A>,
    pool: BoundedHeap<A>,
}

/// Read-only view of a resource's current holdings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster<A, R> {
    pub resource: R,
    /// Held applicants: reserved pool first, each pool best-first.
    pub held: Vec<A>,
    pub held_count: usize,
    /// How many of `held` occupy reserved seats.
    pub priority_held: usize,
    /// General plus reserved seats.
    pub total_seats: usize,
    /// Every proposal ever received, accepted or not.
    pub applications_received: usize,
}

/// A resource with a strict applicant ranking and bounded seat pools.
///
/// # Examples
///
/// ```
/// use u_matching::da::Resource;
/// use u_matching::ranking::RankTable;
///
/// let mut school = Resource::new("X", RankTable::from_order(["ana", "ben"]), 1);
/// assert!(school.would_accept(&"ben").unwrap());
/// assert_eq!(school.accept("ben").unwrap(), None);
///
/// // Full; "ana" ranks higher and displaces "ben".
/// assert!(school.would_accept(&"ana").unwrap());
/// assert_eq!(school.accept("ana").unwrap(), Some("ben"));
/// assert_eq!(school.applications_received(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Resource<A: MatchId, R> {
    id: R,
    ranks: RankTable<A>,
    general: BoundedHeap<A>,
    priority: Option<PrioritySeats<A>>,
    applications_received: usize,
}

impl<A: MatchId, R: MatchId> Resource<A, R> {
    /// Creates a resource with `capacity` general seats and no reserved seats.
    pub fn new(id: R, ranks: RankTable<A>, capacity: usize) -> Self {
        Self {
            id,
            ranks,
            general: BoundedHeap::new(capacity),
            priority: None,
            applications_received: 0,
        }
    }

    /// Adds `seats` reserved seats open to `members` only.
    ///
    /// Reserved seats are in addition to the general capacity.
    pub fn with_priority_seats(mut self, members: impl IntoIterator<Item = A>, seats: usize) -> Self {
        self.priority = Some(PrioritySeats {
            members: members.into_iter().collect(),
            pool: BoundedHeap::new(seats),
        });
        self
    }

    pub fn id(&self) -> &R {
        &self.id
    }

    pub fn ranks(&self) -> &RankTable<A> {
        &self.ranks
    }

    /// General seats.
    pub fn capacity(&self) -> usize {
        self.general.capacity()
    }

    /// Reserved seats (0 for a plain resource).
    pub fn priority_capacity(&self) -> usize {
        self.priority.as_ref().map_or(0, |p| p.pool.capacity())
    }

    pub fn total_seats(&self) -> usize {
        self.capacity() + self.priority_capacity()
    }

    pub fn held_count(&self) -> usize {
        self.general.len() + self.priority_held()
    }

    fn priority_held(&self) -> usize {
        self.priority.as_ref().map_or(0, |p| p.pool.len())
    }

    pub fn applications_received(&self) -> usize {
        self.applications_received
    }

    pub fn has_priority_seats(&self) -> bool {
        self.priority.is_some()
    }

    /// Applicants holding priority standing here.
    pub fn priority_members(&self) -> Option<&HashSet<A>> {
        self.priority.as_ref().map(|p| &p.members)
    }

    pub fn is_priority_member(&self, applicant: &A) -> bool {
        self.priority
            .as_ref()
            .is_some_and(|p| p.members.contains(applicant))
    }

    /// Whether the applicant currently holds a seat here.
    pub fn holds(&self, applicant: &A) -> bool {
        self.general.contains(applicant)
            || self
                .priority
                .as_ref()
                .is_some_and(|p| p.pool.contains(applicant))
    }

    fn rank_of(&self, applicant: &A) -> Result<usize, MatchError> {
        self.ranks
            .rank(applicant)
            .ok_or_else(|| MatchError::unranked(&self.id, applicant))
    }

    fn branch(&self, applicant: &A) -> Branch {
        match &self.priority {
            Some(reserved) if reserved.members.contains(applicant) => {
                if self.held_count() < self.total_seats() {
                    Branch::Vacant
                } else if reserved.pool.has_room() {
                    Branch::ReservedOpen
                } else {
                    Branch::PriorityContest
                }
            }
            _ => {
                if self.general.has_room() {
                    Branch::Vacant
                } else {
                    Branch::GeneralContest
                }
            }
        }
    }

    fn admits(&self, branch: Branch, rank: usize, applicant: &A) -> bool {
        match branch {
            Branch::Vacant | Branch::ReservedOpen => true,
            Branch::PriorityContest => {
                let beats_reserved = self
                    .priority
                    .as_ref()
                    .is_some_and(|p| p.pool.outranks_worst(rank, applicant));
                beats_reserved || self.general.outranks_worst(rank, applicant)
            }
            Branch::GeneralContest => self.general.outranks_worst(rank, applicant),
        }
    }

    /// Records a proposal and reports whether it would be provisionally accepted.
    ///
    /// Counts toward [`applications_received`](Self::applications_received)
    /// whatever the answer.
    pub fn would_accept(&mut self, applicant: &A) -> Result<bool, MatchError> {
        self.applications_received += 1;
        let rank = self.rank_of(applicant)?;
        Ok(self.admits(self.branch(applicant), rank, applicant))
    }

    /// Whether the applicant would displace someone (or take a free seat)
    /// if it proposed now. Pure; unranked applicants are never preferred.
    pub fn prefers(&self, applicant: &A) -> bool {
        match self.ranks.rank(applicant) {
            Some(rank) => self.admits(self.branch(applicant), rank, applicant),
            None => false,
        }
    }

    /// Commits the applicant and returns whoever lost a seat as a result.
    ///
    /// Call only after [`would_accept`](Self::would_accept) returned true;
    /// otherwise the applicant itself may come back as the rejected one.
    pub fn accept(&mut self, applicant: A) -> Result<Option<A>, MatchError> {
        let rank = self.rank_of(&applicant)?;
        let branch = self.branch(&applicant);
        let seat = Seat::new(rank, applicant);

        let Self {
            general, priority, ..
        } = self;

        let rejected = match (branch, priority.as_mut()) {
            (Branch::Vacant, Some(reserved)) if reserved.members.contains(&seat.id) => {
                // A demoted member (or the newcomer) moves to the general
                // pool, which has room since total seats are not exhausted.
                match reserved.pool.insert(seat) {
                    Some(bumped) => general.insert(bumped),
                    None => None,
                }
            }
            (Branch::ReservedOpen, Some(reserved)) => {
                reserved.pool.insert(seat);
                general.pop_worst()
            }
            (Branch::PriorityContest, Some(reserved)) => match reserved.pool.insert(seat) {
                Some(bumped) => general.insert(bumped),
                None => None,
            },
            (_, _) => general.insert(seat),
        };

        self.check_capacity()?;
        Ok(rejected.map(|seat| seat.id))
    }

    fn check_capacity(&self) -> Result<(), MatchError> {
        let reserved_over = self
            .priority
            .as_ref()
            .is_some_and(|p| p.pool.len() > p.pool.capacity());
        if self.general.len() > self.general.capacity() || reserved_over {
            return Err(MatchError::Invariant(format!(
                "resource {:?} holds {} general / {} reserved seats, capacity {} / {}",
                self.id,
                self.general.len(),
                self.priority_held(),
                self.capacity(),
                self.priority_capacity()
            )));
        }
        Ok(())
    }

    /// Current holdings and counters.
    pub fn snapshot(&self) -> Roster<A, R> {
        let mut held: Vec<A> = Vec::with_capacity(self.held_count());
        if let Some(reserved) = &self.priority {
            held.extend(reserved.pool.members().into_iter().cloned());
        }
        held.extend(self.general.members().into_iter().cloned());

        Roster {
            resource: self.id.clone(),
            held_count: held.len(),
            held,
            priority_held: self.priority_held(),
            total_seats: self.total_seats(),
            applications_received: self.applications_received,
        }
    }

    /// Applicants in the reserved pool, best-first.
    pub fn reserved_members(&self) -> Vec<&A> {
        self.priority
            .as_ref()
            .map_or_else(Vec::new, |p| p.pool.members())
    }

    /// Applicants in the general pool, best-first.
    pub fn general_members(&self) -> Vec<&A> {
        self.general.members()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn propose(r: &mut Resource<&'static str, &'static str>, a: &'static str) -> Option<Option<&'static str>> {
        if r.would_accept(&a).unwrap() {
            Some(r.accept(a).unwrap())
        } else {
            None
        }
    }

    #[test]
    fn test_saturated_resource_evicts_worse_holder() {
        let ranks = RankTable::from_ranks([("H", 5), ("N", 2)]);
        let mut r = Resource::new("X", ranks, 1);
        assert_eq!(propose(&mut r, "H"), Some(None));

        assert!(r.would_accept(&"N").unwrap());
        assert_eq!(r.accept("N").unwrap(), Some("H"));
        assert!(r.holds(&"N"));
        assert!(!r.holds(&"H"));
        assert_eq!(r.applications_received(), 2);
    }

    #[test]
    fn test_rejects_worse_proposer_but_counts_it() {
        let mut r = Resource::new("X", RankTable::from_order(["a", "b"]), 1);
        propose(&mut r, "a");
        assert!(!r.would_accept(&"b").unwrap());
        assert_eq!(r.applications_received(), 2);
        assert_eq!(r.snapshot().held, vec!["a"]);
    }

    #[test]
    fn test_unranked_applicant_is_an_error() {
        let mut r: Resource<&str, &str> = Resource::new("X", RankTable::from_order(["a"]), 1);
        let err = r.would_accept(&"ghost").unwrap_err();
        assert!(err.is_invalid_input());
        assert!(!r.prefers(&"ghost"));
    }

    #[test]
    fn test_prefers_is_pure() {
        let mut r = Resource::new("X", RankTable::from_order(["a", "b", "c"]), 1);
        propose(&mut r, "b");
        let before = r.applications_received();
        assert!(r.prefers(&"a"));
        assert!(!r.prefers(&"c"));
        assert_eq!(r.applications_received(), before);
        assert_eq!(r.snapshot().held, vec!["b"]);
    }

    #[test]
    fn test_vacant_seat_is_preferred() {
        let r: Resource<&str, &str> = Resource::new("X", RankTable::from_order(["a"]), 1);
        assert!(r.prefers(&"a"));

        let closed: Resource<&str, &str> = Resource::new("Y", RankTable::from_order(["a"]), 0);
        assert!(!closed.prefers(&"a"));
    }

    #[test]
    fn test_both_tiers_admitted_when_seats_remain() {
        // capacity 1 + 1 reserved; G outranks P.
        let ranks = RankTable::from_order(["G", "P"]);
        let mut r = Resource::new("X", ranks, 1).with_priority_seats(["P"], 1);
        assert_eq!(r.total_seats(), 2);

        assert_eq!(propose(&mut r, "P"), Some(None));
        assert_eq!(propose(&mut r, "G"), Some(None));
        assert_eq!(r.reserved_members(), vec![&"P"]);
        assert_eq!(r.general_members(), vec![&"G"]);

        let roster = r.snapshot();
        assert_eq!(roster.held, vec!["P", "G"]);
        assert_eq!(roster.held_count, 2);
        assert_eq!(roster.priority_held, 1);
        assert_eq!(roster.total_seats, 2);
    }

    #[test]
    fn test_both_tiers_admitted_in_reverse_order() {
        let ranks = RankTable::from_order(["G", "P"]);
        let mut r = Resource::new("X", ranks, 1).with_priority_seats(["P"], 1);
        assert_eq!(propose(&mut r, "G"), Some(None));
        assert_eq!(propose(&mut r, "P"), Some(None));
        assert_eq!(r.reserved_members(), vec![&"P"]);
        assert_eq!(r.general_members(), vec![&"G"]);
    }

    #[test]
    fn test_second_priority_applicant_takes_general_seat() {
        let ranks = RankTable::from_order(["P1", "P2"]);
        let mut r = Resource::new("X", ranks, 1).with_priority_seats(["P1", "P2"], 1);
        assert_eq!(propose(&mut r, "P1"), Some(None));
        assert_eq!(propose(&mut r, "P2"), Some(None));
        assert_eq!(r.reserved_members(), vec![&"P1"]);
        assert_eq!(r.general_members(), vec![&"P2"]);
    }

    #[test]
    fn test_stronger_priority_applicant_demotes_without_rejecting() {
        let ranks = RankTable::from_order(["P1", "P2"]);
        let mut r = Resource::new("X", ranks, 1).with_priority_seats(["P1", "P2"], 1);
        assert_eq!(propose(&mut r, "P2"), Some(None));
        assert_eq!(propose(&mut r, "P1"), Some(None));
        assert_eq!(r.reserved_members(), vec![&"P1"]);
        assert_eq!(r.general_members(), vec![&"P2"]);
    }

    #[test]
    fn test_general_applicant_cannot_use_reserved_seat() {
        let ranks = RankTable::from_order(["G1", "G2", "P"]);
        let mut r = Resource::new("X", ranks, 1).with_priority_seats(["P"], 1);
        assert_eq!(propose(&mut r, "G2"), Some(None));
        // Reserved seat is free but G1 only competes for the general seat.
        assert_eq!(propose(&mut r, "G1"), Some(Some("G2")));
        assert_eq!(r.held_count(), 1);
        assert_eq!(r.reserved_members(), Vec::<&&str>::new());
    }

    #[test]
    fn test_general_applicant_never_displaces_reserved_holder() {
        let ranks = RankTable::from_order(["G", "P", "Q"]);
        let mut r = Resource::new("X", ranks, 1).with_priority_seats(["P", "Q"], 1);
        propose(&mut r, "P");
        propose(&mut r, "Q");
        assert_eq!(r.general_members(), vec![&"Q"]);
        // G beats everyone but only the general holder is exposed.
        assert_eq!(propose(&mut r, "G"), Some(Some("Q")));
        assert_eq!(r.reserved_members(), vec![&"P"]);
    }

    #[test]
    fn test_priority_cascade_rejects_worst_across_pools() {
        // Reserved: P2; general: G. P1 bumps P2 into the general pool,
        // which then rejects its worst member.
        let ranks = RankTable::from_order(["P1", "G", "P2"]);
        let mut r = Resource::new("X", ranks, 1).with_priority_seats(["P1", "P2"], 1);
        propose(&mut r, "P2");
        propose(&mut r, "G");
        assert_eq!(propose(&mut r, "P1"), Some(Some("P2")));
        assert_eq!(r.reserved_members(), vec![&"P1"]);
        assert_eq!(r.general_members(), vec![&"G"]);
    }

    #[test]
    fn test_priority_cascade_demoted_member_displaces_general() {
        let ranks = RankTable::from_order(["P1", "P2", "G"]);
        let mut r = Resource::new("X", ranks, 1).with_priority_seats(["P1", "P2"], 1);
        propose(&mut r, "P2");
        propose(&mut r, "G");
        assert_eq!(propose(&mut r, "P1"), Some(Some("G")));
        assert_eq!(r.reserved_members(), vec![&"P1"]);
        assert_eq!(r.general_members(), vec![&"P2"]);
    }

    #[test]
    fn test_priority_applicant_competes_in_general_pool() {
        // P2 loses to the reserved holder but beats the general holder.
        let ranks = RankTable::from_order(["P1", "P2", "G"]);
        let mut r = Resource::new("X", ranks, 1).with_priority_seats(["P1", "P2"], 1);
        propose(&mut r, "P1");
        propose(&mut r, "G");
        assert!(r.prefers(&"P2"));
        assert_eq!(propose(&mut r, "P2"), Some(Some("G")));
        assert_eq!(r.reserved_members(), vec![&"P1"]);
        assert_eq!(r.general_members(), vec![&"P2"]);
    }

    #[test]
    fn test_reserved_only_resource() {
        let ranks = RankTable::from_order(["P1", "G", "P2"]);
        let mut r = Resource::new("X", ranks, 0).with_priority_seats(["P1", "P2"], 1);
        assert_eq!(propose(&mut r, "G"), None);
        assert_eq!(propose(&mut r, "P2"), Some(None));
        assert_eq!(propose(&mut r, "P1"), Some(Some("P2")));
        assert_eq!(r.snapshot().held, vec!["P1"]);
    }

    proptest! {
        #[test]
        fn prop_pools_never_exceed_capacity(
            capacity in 0usize..4,
            reserved in 0usize..3,
            with_priority in any::<bool>(),
            order in proptest::collection::vec(0u32..12, 0..40),
            member_mask in any::<u16>(),
        ) {
            let ranks = RankTable::from_order((0u32..12).rev());
            let mut r: Resource<u32, &str> = Resource::new("X", ranks, capacity);
            if with_priority {
                r = r.with_priority_seats((0u32..12).filter(|a| member_mask & (1 << *a) != 0), reserved);
            }

            let mut held: HashSet<u32> = HashSet::new();
            for a in order {
                if held.contains(&a) {
                    continue;
                }
                if r.would_accept(&a).unwrap() {
                    held.insert(a);
                    if let Some(out) = r.accept(a).unwrap() {
                        prop_assert_ne!(out, a);
                        prop_assert!(held.remove(&out));
                    }
                }
                prop_assert!(r.general_members().len() <= r.capacity());
                prop_assert!(r.reserved_members().len() <= r.priority_capacity());
                prop_assert!(r.held_count() <= r.total_seats());
                prop_assert_eq!(r.held_count(), held.len());
                for g in r.general_members() {
                    prop_assert!(held.contains(g));
                }
                for p in r.reserved_members() {
                    prop_assert!(r.is_priority_member(p));
                }
            }
        }
    }
}
