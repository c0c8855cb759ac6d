//! Input model: applicants, resources, and their validation.

use super::applicant::Applicant;
use super::outcome::Matching;
use super::resource::Resource;
use super::types::MatchId;
use crate::error::MatchError;
use crate::ranking::RankTable;
use std::collections::{HashMap, HashSet};

/// The two sides of a matching before the run.
///
/// Applicants keep their insertion order; it is the initial queue order
/// under [`QueueOrder::AsGiven`](super::QueueOrder::AsGiven).
///
/// # Examples
///
/// ```
/// use u_matching::da::{Market, Resource};
/// use u_matching::ranking::RankTable;
///
/// let market = Market::new()
///     .with_applicant("A", ["X", "Y"])
///     .with_applicant("B", ["X", "Y"])
///     .with_resource(Resource::new("X", RankTable::from_order(["A", "B"]), 1))
///     .with_resource(Resource::new("Y", RankTable::from_order(["A", "B"]), 1));
///
/// assert_eq!(market.applicant_count(), 2);
/// assert!(market.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Market<A: MatchId, R: MatchId> {
    applicants: Vec<Applicant<A, R>>,
    resources: Vec<Resource<A, R>>,
}

impl<A: MatchId, R: MatchId> Market<A, R> {
    pub fn new() -> Self {
        Self {
            applicants: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Adds an applicant with its preferences, best first.
    pub fn with_applicant(mut self, id: A, preferences: impl IntoIterator<Item = R>) -> Self {
        self.add_applicant(id, preferences);
        self
    }

    pub fn with_resource(mut self, resource: Resource<A, R>) -> Self {
        self.add_resource(resource);
        self
    }

    pub fn add_applicant(&mut self, id: A, preferences: impl IntoIterator<Item = R>) {
        self.applicants.push(Applicant::new(id, preferences));
    }

    pub fn add_resource(&mut self, resource: Resource<A, R>) {
        self.resources.push(resource);
    }

    pub fn applicants(&self) -> &[Applicant<A, R>] {
        &self.applicants
    }

    pub fn resources(&self) -> &[Resource<A, R>] {
        &self.resources
    }

    pub fn applicant_count(&self) -> usize {
        self.applicants.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Sum of all preference-list lengths: an upper bound on proposals.
    pub fn total_preferences(&self) -> usize {
        self.applicants.iter().map(|a| a.preferences().len()).sum()
    }

    /// Checks that the market is well-formed.
    ///
    /// - applicant and resource ids are unique;
    /// - every preference names a known resource, at most once;
    /// - every resource ranks every applicant that lists it;
    /// - every priority member is a known applicant.
    pub fn validate(&self) -> Result<(), MatchError> {
        let mut applicant_ids: HashSet<&A> = HashSet::with_capacity(self.applicants.len());
        for applicant in &self.applicants {
            if !applicant_ids.insert(applicant.id()) {
                return Err(MatchError::DuplicateApplicant(format!("{:?}", applicant.id())));
            }
        }

        let mut resources: HashMap<&R, &Resource<A, R>> = HashMap::with_capacity(self.resources.len());
        for resource in &self.resources {
            if resources.insert(resource.id(), resource).is_some() {
                return Err(MatchError::DuplicateResource(format!("{:?}", resource.id())));
            }
        }

        for applicant in &self.applicants {
            let mut seen: HashSet<&R> = HashSet::with_capacity(applicant.preferences().len());
            for target in applicant.preferences() {
                let Some(resource) = resources.get(target) else {
                    return Err(MatchError::UnknownResource {
                        applicant: format!("{:?}", applicant.id()),
                        resource: format!("{target:?}"),
                    });
                };
                if !seen.insert(target) {
                    return Err(MatchError::DuplicatePreference {
                        applicant: format!("{:?}", applicant.id()),
                        resource: format!("{target:?}"),
                    });
                }
                if !resource.ranks().contains(applicant.id()) {
                    return Err(MatchError::unranked(target, applicant.id()));
                }
            }
        }

        for resource in &self.resources {
            let Some(members) = resource.priority_members() else {
                continue;
            };
            // Smallest offender keeps the error deterministic.
            if let Some(unknown) = members.iter().filter(|m| !applicant_ids.contains(m)).min() {
                return Err(MatchError::UnknownPriorityMember {
                    resource: format!("{:?}", resource.id()),
                    applicant: format!("{unknown:?}"),
                });
            }
        }

        Ok(())
    }

    /// Validates and indexes the market for a run.
    pub(crate) fn into_matching(self) -> Result<Matching<A, R>, MatchError> {
        self.validate()?;
        Ok(Matching::new(self.applicants, self.resources))
    }
}

impl<A: MatchId, R: MatchId> Default for Market<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-data description of one applicant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicantSpec<A, R> {
    pub id: A,
    pub preferences: Vec<R>,
}

/// Reserved seats of a [`ResourceSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrioritySpec<A> {
    pub members: Vec<A>,
    pub seats: usize,
}

/// Plain-data description of one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceSpec<A, R> {
    pub id: R,
    /// Applicants best-first.
    pub ranking: Vec<A>,
    pub capacity: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Option<PrioritySpec<A>>,
}

/// Plain-data market, the boundary shape handed over by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketSpec<A, R> {
    pub applicants: Vec<ApplicantSpec<A, R>>,
    pub resources: Vec<ResourceSpec<A, R>>,
}

impl<A: MatchId, R: MatchId> From<ResourceSpec<A, R>> for Resource<A, R> {
    fn from(spec: ResourceSpec<A, R>) -> Self {
        let resource = Resource::new(spec.id, RankTable::from_order(spec.ranking), spec.capacity);
        match spec.priority {
            Some(priority) => resource.with_priority_seats(priority.members, priority.seats),
            None => resource,
        }
    }
}

impl<A: MatchId, R: MatchId> From<MarketSpec<A, R>> for Market<A, R> {
    fn from(spec: MarketSpec<A, R>) -> Self {
        let mut market = Market::new();
        for applicant in spec.applicants {
            market.add_applicant(applicant.id, applicant.preferences);
        }
        for resource in spec.resources {
            market.add_resource(resource.into());
        }
        market
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: &'static str, order: &[&'static str], capacity: usize) -> Resource<&'static str, &'static str> {
        Resource::new(id, RankTable::from_order(order.iter().copied()), capacity)
    }

    #[test]
    fn test_valid_market() {
        let market = Market::new()
            .with_applicant("a", ["X"])
            .with_applicant("b", ["X", "Y"])
            .with_resource(resource("X", &["a", "b"], 1))
            .with_resource(resource("Y", &["b"], 1));
        assert!(market.validate().is_ok());
        assert_eq!(market.total_preferences(), 3);
        assert_eq!(market.resource_count(), 2);
    }

    #[test]
    fn test_duplicate_applicant() {
        let market = Market::new()
            .with_applicant("a", ["X"])
            .with_applicant("a", ["X"])
            .with_resource(resource("X", &["a"], 1));
        assert_eq!(market.validate(), Err(MatchError::DuplicateApplicant("\"a\"".into())));
    }

    #[test]
    fn test_duplicate_resource() {
        let market: Market<&str, &str> = Market::new()
            .with_resource(resource("X", &[], 1))
            .with_resource(resource("X", &[], 2));
        assert_eq!(market.validate(), Err(MatchError::DuplicateResource("\"X\"".into())));
    }

    #[test]
    fn test_unknown_resource() {
        let market = Market::new()
            .with_applicant("a", ["X", "Z"])
            .with_resource(resource("X", &["a"], 1));
        let err = market.validate().unwrap_err();
        assert!(err.is_invalid_input());
        assert!(matches!(err, MatchError::UnknownResource { .. }));
    }

    #[test]
    fn test_duplicate_preference() {
        let market = Market::new()
            .with_applicant("a", ["X", "X"])
            .with_resource(resource("X", &["a"], 1));
        assert!(matches!(
            market.validate(),
            Err(MatchError::DuplicatePreference { .. })
        ));
    }

    #[test]
    fn test_unranked_applicant() {
        let market = Market::new()
            .with_applicant("a", ["X"])
            .with_applicant("b", ["X"])
            .with_resource(resource("X", &["a"], 1));
        assert_eq!(
            market.validate(),
            Err(MatchError::UnrankedApplicant {
                resource: "\"X\"".into(),
                applicant: "\"b\"".into(),
            })
        );
    }

    #[test]
    fn test_unknown_priority_member() {
        let market = Market::new()
            .with_applicant("a", ["X"])
            .with_resource(resource("X", &["a"], 1).with_priority_seats(["a", "zed", "ghost"], 1));
        assert_eq!(
            market.validate(),
            Err(MatchError::UnknownPriorityMember {
                resource: "\"X\"".into(),
                applicant: "\"ghost\"".into(),
            })
        );
    }

    #[test]
    fn test_rank_table_may_cover_extra_applicants() {
        let market = Market::new()
            .with_applicant("a", ["X"])
            .with_resource(resource("X", &["nobody", "a"], 1));
        assert!(market.validate().is_ok());
    }

    #[test]
    fn test_from_spec() {
        let spec = MarketSpec {
            applicants: vec![
                ApplicantSpec {
                    id: "p".to_string(),
                    preferences: vec!["X".to_string()],
                },
                ApplicantSpec {
                    id: "g".to_string(),
                    preferences: vec!["X".to_string()],
                },
            ],
            resources: vec![ResourceSpec {
                id: "X".to_string(),
                ranking: vec!["g".to_string(), "p".to_string()],
                capacity: 1,
                priority: Some(PrioritySpec {
                    members: vec!["p".to_string()],
                    seats: 1,
                }),
            }],
        };

        let market: Market<String, String> = spec.into();
        assert!(market.validate().is_ok());
        assert_eq!(market.applicant_count(), 2);
        let x = &market.resources()[0];
        assert_eq!(x.total_seats(), 2);
        assert!(x.is_priority_member(&"p".to_string()));
        assert_eq!(x.ranks().rank(&"g".to_string()), Some(0));
    }
}
