use crate::topology::ids::{HostId, TableId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SketchError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SketchError {
    /// Topology knows the host but it has not reported a shard count.
    #[error("Shard count not known for node {host}")]
    UnknownShardCount { host: HostId },

    /// A replica or a selection named a host missing from topology.
    #[error("Node {host} not found in topology")]
    NodeNotFound { host: HostId },

    #[error("Tablet map not found for table {table}")]
    NoSuchTable { table: TableId },
}
