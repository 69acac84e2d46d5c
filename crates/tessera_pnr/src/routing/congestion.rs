//! Present and historical use costs for negotiated congestion routing.

use petgraph::graph::NodeIndex;

/// Cost of a resource before any congestion pricing.
pub const BASE_COST: u64 = 1;

/// Present-use cost of a resource no net has claimed this iteration.
pub const UNUSED: u32 = 1;

/// Present-use cost of a resource claimed by exactly one net. Anything
/// above this is shared.
pub const EXCLUSIVE: u32 = UNUSED + 1;

/// Per-resource congestion state, indexed by routing graph node.
///
/// Present use starts at [`UNUSED`] each iteration and gains one for every
/// net whose tree contains the resource. History accumulates the present
/// use of every iteration and is never reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CongestionMap {
    present: Vec<u32>,
    history: Vec<u64>,
}

impl CongestionMap {
    /// Creates a map for a graph of `node_count` resources.
    pub fn new(node_count: usize) -> Self {
        Self {
            present: vec![UNUSED; node_count],
            history: vec![0; node_count],
        }
    }

    /// Present-use cost of a resource.
    pub fn present(&self, node: NodeIndex) -> u32 {
        self.present[node.index()]
    }

    /// Historical cost of a resource.
    pub fn history(&self, node: NodeIndex) -> u64 {
        self.history[node.index()]
    }

    /// Cost of entering a resource: `(base + history) * present`.
    pub fn cost(&self, node: NodeIndex) -> u64 {
        (BASE_COST + self.history(node)) * u64::from(self.present(node))
    }

    /// Records one more net using a resource.
    pub fn occupy(&mut self, node: NodeIndex) {
        self.present[node.index()] += 1;
    }

    /// Starts a new iteration: every resource back to unused.
    pub fn reset_present(&mut self) {
        self.present.fill(UNUSED);
    }

    /// Folds this iteration's present use into the history.
    pub fn update_history(&mut self) {
        for (history, &present) in self.history.iter_mut().zip(&self.present) {
            *history += u64::from(present);
        }
    }

    /// Returns `true` if any resource is used by more than one net.
    pub fn has_congestion(&self) -> bool {
        self.present.iter().any(|&p| p > EXCLUSIVE)
    }

    /// Number of resources used by more than one net.
    pub fn overused_count(&self) -> usize {
        self.overused().count()
    }

    /// Resources used by more than one net, in index order.
    pub fn overused(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.present
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p > EXCLUSIVE)
            .map(|(i, _)| NodeIndex::new(i))
    }
}
