use crate::topology::nodes::Topology;
use crate::topology::tablets::TabletMetadata;
use std::sync::Arc;

/// Point-in-time view of the cluster: which hosts exist with how many shards,
/// and where every tablet lives. Never mutated once shared.
#[derive(Debug, Clone, Default)]
pub struct TokenMetadata {
    topology: Topology,
    tablets: TabletMetadata,
}

pub type TokenMetadataPtr = Arc<TokenMetadata>;

impl TokenMetadata {
    pub fn new(topology: Topology, tablets: TabletMetadata) -> Self {
        Self { topology, tablets }
    }

    pub fn get_topology(&self) -> &Topology {
        &self.topology
    }

    pub fn tablets(&self) -> &TabletMetadata {
        &self.tablets
    }

    pub fn into_ptr(self) -> TokenMetadataPtr {
        Arc::new(self)
    }
}
