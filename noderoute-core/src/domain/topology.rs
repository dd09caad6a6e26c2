//! Versioned cluster topology.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::server_node::{ServerNode, SharedServerNode};

/// The ordered list of nodes serving a database, as last reported by the server.
///
/// Node order is priority order: the "first healthy" policy walks it from the front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Topology {
    /// Monotonically increasing version. Only used to order updates.
    #[serde(rename = "Etag")]
    pub version: u64,
    /// Nodes in priority order.
    pub nodes: Vec<SharedServerNode>,
}

impl Topology {
    /// Create a topology from already shared nodes.
    pub fn new(version: u64, nodes: Vec<SharedServerNode>) -> Self {
        Self { version, nodes }
    }

    /// Create a topology, wrapping each node in an `Arc`.
    pub fn from_nodes<I>(version: u64, nodes: I) -> Self
    where
        I: IntoIterator<Item = ServerNode>,
    {
        Self {
            version,
            nodes: nodes.into_iter().map(Arc::new).collect(),
        }
    }

    /// Number of nodes in the topology.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the topology has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A shared, immutable topology.
pub type SharedTopology = Arc<Topology>;
