//! Error types for node selection.

/// Errors surfaced by the [`NodeSelector`](crate::load_balancer::node_selector::NodeSelector).
///
/// Races between a topology swap and in-flight callers are not errors and
/// never show up here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The topology has no nodes, so there is nothing to select from.
    #[error("empty database topology (version {version}), this shouldn't happen")]
    EmptyTopology {
        /// Version of the rejected topology.
        version: u64,
    },
}

/// Result alias for selector operations.
pub type Result<T> = std::result::Result<T, SelectorError>;
