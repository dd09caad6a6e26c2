//! Noderoute Core functionality.
//!
//! This crate decides which server node of a database cluster should serve each
//! outgoing request. It tracks the failures reported by the request layer and
//! swaps in new cluster topologies without ever taking a lock on the hot path.

pub mod domain;
pub mod error;
pub mod load_balancer;

pub use domain::server_node::{ServerNode, SharedServerNode};
pub use domain::topology::{SharedTopology, Topology};
pub use error::{Result, SelectorError};
pub use load_balancer::node_selector::{NodeSelector, SelectedNode};
