//! Deferred-acceptance run configuration.

/// Order in which applicants enter the pending queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueueOrder {
    /// Market insertion order.
    #[default]
    AsGiven,
    /// Market insertion order, reversed.
    Reversed,
    /// Uniformly shuffled with the configured seed.
    Shuffled,
}

/// Where an evicted applicant is put back into the pending queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Requeue {
    /// Behind every pending applicant (FIFO).
    #[default]
    Back,
    /// Ahead of every pending applicant.
    Front,
    /// At a uniformly random position.
    Random,
}

/// Configuration for [`DaRunner`](super::DaRunner).
///
/// With strict rankings the final matching is the same whatever the queue
/// and requeue policies; they only change the path taken to reach it.
///
/// # Examples
///
/// ```
/// use u_matching::da::{DaConfig, QueueOrder, Requeue};
///
/// let config = DaConfig::default()
///     .with_queue_order(QueueOrder::Shuffled)
///     .with_requeue(Requeue::Random)
///     .with_seed(42)
///     .with_verification(true);
/// assert_eq!(config.max_proposals, 0);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DaConfig {
    /// Initial order of the pending queue.
    pub queue_order: QueueOrder,

    /// Placement of evicted applicants in the pending queue.
    pub requeue: Requeue,

    /// Hard budget on total proposals. 0 = sum of preference-list lengths,
    /// which no correct run can exceed.
    ///
    /// Exceeding the budget aborts the run with an invariant violation.
    pub max_proposals: usize,

    /// Run the stability verifier on the final state.
    pub verify: bool,

    /// Random seed for shuffled orders (None for random).
    pub seed: Option<u64>,
}

impl Default for DaConfig {
    fn default() -> Self {
        Self {
            queue_order: QueueOrder::AsGiven,
            requeue: Requeue::Back,
            max_proposals: 0,
            verify: false,
            seed: None,
        }
    }
}

impl DaConfig {
    pub fn with_queue_order(mut self, order: QueueOrder) -> Self {
        self.queue_order = order;
        self
    }

    pub fn with_requeue(mut self, requeue: Requeue) -> Self {
        self.requeue = requeue;
        self
    }

    /// Sets the proposal budget (0 = derive from the market).
    pub fn with_max_proposals(mut self, n: usize) -> Self {
        self.max_proposals = n;
        self
    }

    /// Enables or disables post-run stability verification.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether the run needs a random number generator.
    pub(crate) fn is_randomized(&self) -> bool {
        self.queue_order == QueueOrder::Shuffled || self.requeue == Requeue::Random
    }
}
