//! The node selector: which node should serve the next request.

use arc_swap::{ArcSwap, Guard};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::domain::server_node::SharedServerNode;
use crate::domain::topology::{SharedTopology, Topology};
use crate::error::{Result, SelectorError};
use crate::load_balancer::failures::FailureCounters;
use crate::load_balancer::selector::{
    first_healthy, first_healthy_from, session_start_index, FALLBACK_INDEX,
};

/// A node picked for a request, together with its position in the topology.
///
/// The index is what the caller hands back to
/// [`NodeSelector::on_failed_request`] if the request fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedNode {
    /// Position of the node in the topology it was picked from
    pub index: usize,
    /// The node itself
    pub node: SharedServerNode,
}

/// One generation of selection state.
///
/// The topology is immutable once published; only the counters change, in
/// place, while this generation is live.
#[derive(Debug)]
struct SelectorState {
    topology: SharedTopology,
    current_node_index: usize,
    failures: FailureCounters,
}

impl SelectorState {
    fn new(current_node_index: usize, topology: SharedTopology) -> Result<Self> {
        if topology.is_empty() {
            return Err(SelectorError::EmptyTopology {
                version: topology.version,
            });
        }

        Ok(Self {
            failures: FailureCounters::new(topology.len()),
            current_node_index,
            topology,
        })
    }

    fn selected(&self, index: usize) -> SelectedNode {
        SelectedNode {
            index,
            node: Arc::clone(&self.topology.nodes[index]),
        }
    }

    fn everyone_faulted(&self) -> SelectedNode {
        trace!(
            version = self.topology.version,
            "all nodes marked as failed, falling back to the first one"
        );
        self.selected(FALLBACK_INDEX)
    }
}

fn is_stale(current: &SelectorState, incoming: &Topology, force_update: bool) -> bool {
    let stale = current.topology.version >= incoming.version && !force_update;
    if stale {
        debug!(
            current_version = current.topology.version,
            incoming_version = incoming.version,
            "ignoring stale topology"
        );
    }
    stale
}

/// Lock-free node selection and failure tracking for one cluster connection.
///
/// Every read takes exactly one snapshot of the published state and works on
/// it for the whole call, so a caller never sees the nodes of one topology
/// mixed with the counters of another. Topology updates publish a whole new
/// generation with a single atomic swap.
#[derive(Debug)]
pub struct NodeSelector {
    state: ArcSwap<SelectorState>,
}

impl NodeSelector {
    /// Create a selector for the initial topology, with no failures recorded.
    ///
    /// Fails with [`SelectorError::EmptyTopology`] if the topology has no nodes.
    pub fn new(topology: impl Into<SharedTopology>) -> Result<Self> {
        let state = SelectorState::new(0, topology.into())?;

        Ok(Self {
            state: ArcSwap::from_pointee(state),
        })
    }

    /// The topology of the currently published generation.
    pub fn topology(&self) -> SharedTopology {
        Arc::clone(&self.state.load().topology)
    }

    /// Number of nodes in the currently published generation.
    pub fn node_count(&self) -> usize {
        self.state.load().topology.len()
    }

    /// A copy of the failure counters of the currently published generation.
    pub fn failures(&self) -> Vec<u64> {
        self.state.load().failures.to_vec()
    }

    /// Record a failed request against the node at `node_index`.
    ///
    /// An index outside the current topology means a newer topology was
    /// published after the node was picked; the signal is dropped.
    pub fn on_failed_request(&self, node_index: usize) {
        let state = self.state.load();

        if !state.failures.increment(node_index) {
            trace!(
                node_index,
                version = state.topology.version,
                "ignoring failure for a node outside the current topology"
            );
        }
    }

    /// Offer a new topology to the selector.
    ///
    /// Returns `Ok(false)` if `topology` is absent, or if it is not newer than
    /// the current one and `force_update` is not set. Otherwise publishes a new
    /// generation with every failure counter back at zero and returns `Ok(true)`.
    /// A topology that would be accepted but has no nodes is rejected with
    /// [`SelectorError::EmptyTopology`] and the current generation stays.
    pub fn on_update_topology(
        &self,
        topology: Option<SharedTopology>,
        force_update: bool,
    ) -> Result<bool> {
        let Some(topology) = topology else {
            return Ok(false);
        };

        let mut current = self.state.load_full();
        if is_stale(&current, &topology, force_update) {
            return Ok(false);
        }

        let state = SelectorState::new(0, topology).inspect_err(|err| {
            warn!(%err, "rejecting topology update");
        })?;
        let state = Arc::new(state);

        // Publish only over the generation the version was checked against.
        loop {
            let previous = self.state.compare_and_swap(&current, Arc::clone(&state));
            if Arc::ptr_eq(&*previous, &current) {
                break;
            }

            current = Guard::into_inner(previous);
            if is_stale(&current, &state.topology, force_update) {
                return Ok(false);
            }
        }

        debug!(
            previous_version = current.topology.version,
            incoming_version = state.topology.version,
            node_count = state.topology.len(),
            force_update,
            "topology updated"
        );

        Ok(true)
    }

    /// The first node, in topology order, with no recorded failures.
    ///
    /// Falls back to the first node when every node has failed.
    pub fn preferred_node(&self) -> SelectedNode {
        let state = self.state.load();

        match first_healthy(&state.failures) {
            Some(index) => state.selected(index),
            None => state.everyone_faulted(),
        }
    }

    /// The node a session sticks to.
    ///
    /// Starts at `session_id mod node_count` and walks forward, wrapping
    /// around, to the first node with no recorded failures. For the same
    /// generation and the same counters a session always lands on the same
    /// node. Falls back to the first node when every node has failed.
    pub fn node_by_session_id(&self, session_id: u64) -> SelectedNode {
        let state = self.state.load();
        let start = session_start_index(session_id, state.topology.len());

        match first_healthy_from(&state.failures, start) {
            Some(index) => state.selected(index),
            None => state.everyone_faulted(),
        }
    }

    /// Clear the failures recorded against `node_index`.
    ///
    /// Only applies when `node_index` does not exceed the generation's current
    /// node index, which is `0` for every generation, so in practice only the
    /// first node can be restored this way.
    pub fn restore_node_index(&self, node_index: usize) {
        let state = self.state.load();

        if state.current_node_index < node_index {
            trace!(
                node_index,
                current_node_index = state.current_node_index,
                "skipping restore past the current node index"
            );
            return;
        }

        state.failures.reset(node_index);
    }
}
