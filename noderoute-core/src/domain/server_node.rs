//! Server node descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A single database server as advertised in a cluster topology.
///
/// The selector never looks inside a node; it only cares about the node's
/// position in [`Topology::nodes`](crate::domain::topology::Topology::nodes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerNode {
    /// Base URL of the server
    pub url: String,
    /// Name of the database hosted on this node
    pub database: String,
    /// Tag of the node inside the cluster (e.g. `"A"`)
    #[serde(default)]
    pub cluster_tag: Option<String>,
}

impl ServerNode {
    /// Create a node descriptor without a cluster tag.
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            cluster_tag: None,
        }
    }

    /// Attach a cluster tag to the descriptor.
    pub fn with_cluster_tag(mut self, tag: impl Into<String>) -> Self {
        self.cluster_tag = Some(tag.into());
        self
    }
}

impl fmt::Display for ServerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cluster_tag {
            Some(tag) => write!(f, "{} ({}/{})", tag, self.url, self.database),
            None => write!(f, "{}/{}", self.url, self.database),
        }
    }
}

/// A thread-safe reference to a ServerNode.
pub type SharedServerNode = Arc<ServerNode>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_tag_when_present() {
        let node = ServerNode::new("http://a:8080", "orders").with_cluster_tag("A");
        assert_eq!(node.to_string(), "A (http://a:8080/orders)");

        let untagged = ServerNode::new("http://b:8080", "orders");
        assert_eq!(untagged.to_string(), "http://b:8080/orders");
    }
}
