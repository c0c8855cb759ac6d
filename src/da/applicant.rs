//! The proposing side.

use super::types::{MatchId, Placement};
use crate::error::MatchError;

/// An applicant with a strict preference list and a proposal cursor.
///
/// The cursor starts before the first entry (`None`) and only ever moves
/// forward, one step per [`propose`](Applicant::propose). An applicant never
/// inspects a resource; the engine relays every decision through
/// [`set_matched`](Applicant::set_matched).
#[derive(Debug, Clone)]
pub struct Applicant<A, R> {
    id: A,
    preferences: Vec<R>,
    cursor: Option<usize>,
    matched: bool,
}

impl<A: MatchId, R: MatchId> Applicant<A, R> {
    /// Creates an applicant that has not proposed yet.
    pub fn new(id: A, preferences: impl IntoIterator<Item = R>) -> Self {
        Self {
            id,
            preferences: preferences.into_iter().collect(),
            cursor: None,
            matched: false,
        }
    }

    pub fn id(&self) -> &A {
        &self.id
    }

    /// Resources in order of preference, best first.
    pub fn preferences(&self) -> &[R] {
        &self.preferences
    }

    /// Index of the last resource proposed to, `None` before the first proposal.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of proposals sent so far.
    pub fn proposals_sent(&self) -> usize {
        self.cursor.map_or(0, |c| c + 1)
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Whether the applicant is free and still has resources left to try.
    pub fn can_propose(&self) -> bool {
        !self.matched && self.proposals_sent() < self.preferences.len()
    }

    /// Advances the cursor and returns the resource proposed to.
    ///
    /// Calling this while [`can_propose`](Self::can_propose) is false is a
    /// caller bug and yields [`MatchError::Invariant`]; the cursor is left
    /// untouched in that case.
    pub fn propose(&mut self) -> Result<&R, MatchError> {
        if !self.can_propose() {
            return Err(MatchError::Invariant(format!(
                "applicant {:?} proposed with cursor {:?} over {} preferences (matched: {})",
                self.id,
                self.cursor,
                self.preferences.len(),
                self.matched
            )));
        }
        let next = self.proposals_sent();
        self.cursor = Some(next);
        Ok(&self.preferences[next])
    }

    pub fn set_matched(&mut self, matched: bool) {
        self.matched = matched;
    }

    /// The resource currently holding this applicant and its position in
    /// the preference list.
    pub fn result(&self) -> Placement<R> {
        match self.cursor {
            Some(rank) if self.matched => Placement::Matched {
                resource: self.preferences[rank].clone(),
                rank,
            },
            _ => Placement::Unmatched,
        }
    }
}
