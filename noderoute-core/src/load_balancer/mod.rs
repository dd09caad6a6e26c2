//! Node selection and failure tracking.

pub mod failures;
pub mod node_selector;
pub mod selector;
