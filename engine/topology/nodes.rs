use crate::topology::ids::HostId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub host: HostId,
    /// Zero when the node has not reported its shard count yet.
    pub shard_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: HashMap<HostId, Node>,
}

impl Topology {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    pub fn add_node(&mut self, host: HostId, shard_count: u32) -> &Node {
        self.nodes.insert(host, Node { host, shard_count });
        &self.nodes[&host]
    }

    pub fn find_node(&self, host: HostId) -> Option<&Node> {
        self.nodes.get(&host)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
