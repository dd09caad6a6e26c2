//! Domain models handed to the selector by the rest of the client.

pub mod server_node;
pub mod topology;
