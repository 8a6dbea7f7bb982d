use crate::topology::ids::ShardId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardLoad {
    pub id: ShardId,
    /// In tablets.
    pub load: u64,
}

// BinaryHeap is a max-heap, so the order is reversed to surface the least
// loaded shard first. Equal loads prefer the lower shard id.
impl Ord for ShardLoad {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .load
            .cmp(&self.load)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for ShardLoad {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Tablet load of one node. `loads` is indexed by shard id and is the source
/// of truth; `heap` is the priority view over it and must be rebuilt after
/// writes that bypass it.
#[derive(Debug, Clone)]
pub struct NodeLoad {
    loads: Vec<u64>,
    heap: BinaryHeap<ShardLoad>,
    load: u64,
}

impl NodeLoad {
    pub fn new(shard_count: u32) -> Self {
        let mut node = Self {
            loads: vec![0; shard_count as usize],
            heap: BinaryHeap::with_capacity(shard_count as usize),
            load: 0,
        };
        node.rebuild_heap();
        node
    }

    pub fn load(&self) -> u64 {
        self.load
    }

    pub fn shard_count(&self) -> usize {
        self.loads.len()
    }

    pub fn shard_load(&self, shard: ShardId) -> Option<u64> {
        self.loads.get(shard.index()).copied()
    }

    pub fn shard_loads(&self) -> &[u64] {
        &self.loads
    }

    /// Counts one tablet on `shard` without touching the heap. Returns false
    /// when the shard does not exist on this node.
    pub(crate) fn account(&mut self, shard: ShardId) -> bool {
        match self.loads.get_mut(shard.index()) {
            Some(load) => {
                *load += 1;
                self.load += 1;
                true
            }
            None => false,
        }
    }

    pub(crate) fn rebuild_heap(&mut self) {
        let shards: Vec<ShardLoad> = self
            .loads
            .iter()
            .enumerate()
            .map(|(id, &load)| ShardLoad {
                id: ShardId(id as u32),
                load,
            })
            .collect();
        self.heap = BinaryHeap::from(shards);
    }

    /// Assigns one tablet to the least loaded shard. None when the node has no shards.
    pub fn take_least_loaded(&mut self) -> Option<ShardId> {
        let mut top = self.heap.peek_mut()?;
        top.load += 1;
        let id = top.id;
        drop(top);

        self.loads[id.index()] += 1;
        self.load += 1;
        Some(id)
    }

    pub fn pick(&mut self, shard: ShardId) {
        let count = self.loads.len();
        let load = self
            .loads
            .get_mut(shard.index())
            .unwrap_or_else(|| panic!("Shard {} out of range for node with {} shards", shard, count));
        *load += 1;
        self.load += 1;
        self.rebuild_heap();
    }

    pub fn unload(&mut self, shard: ShardId) {
        let count = self.loads.len();
        let load = self
            .loads
            .get_mut(shard.index())
            .unwrap_or_else(|| panic!("Shard {} out of range for node with {} shards", shard, count));
        assert!(*load > 0, "Unload of shard {} which carries no load", shard);
        *load -= 1;
        self.load -= 1;
        self.rebuild_heap();
    }

    pub fn peek_least_loaded(&self) -> Option<ShardLoad> {
        self.heap.peek().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(node: &NodeLoad) {
        assert_eq!(node.load(), node.shard_loads().iter().sum::<u64>());
        let min = node.shard_loads().iter().copied().min();
        assert_eq!(node.peek_least_loaded().map(|s| s.load), min);
    }

    #[test]
    fn test_ordering_prefers_lower_load() {
        let light = ShardLoad { id: ShardId(3), load: 1 };
        let heavy = ShardLoad { id: ShardId(0), load: 5 };
        assert!(light > heavy);

        let tie_low = ShardLoad { id: ShardId(1), load: 2 };
        let tie_high = ShardLoad { id: ShardId(2), load: 2 };
        assert!(tie_low > tie_high);
    }

    #[test]
    fn test_take_least_loaded_spreads_evenly() {
        let mut node = NodeLoad::new(3);
        let picked: Vec<_> = (0..3).filter_map(|_| node.take_least_loaded()).collect();

        assert_eq!(picked, vec![ShardId(0), ShardId(1), ShardId(2)]);
        assert_eq!(node.shard_loads(), &[1, 1, 1]);
        assert_consistent(&node);
    }

    #[test]
    fn test_account_then_rebuild() {
        let mut node = NodeLoad::new(2);
        assert!(node.account(ShardId(0)));
        assert!(node.account(ShardId(0)));
        assert!(!node.account(ShardId(2)));
        node.rebuild_heap();

        assert_eq!(node.load(), 2);
        assert_eq!(node.take_least_loaded(), Some(ShardId(1)));
        assert_consistent(&node);
    }

    #[test]
    fn test_pick_and_unload_keep_heap_valid() {
        let mut node = NodeLoad::new(4);
        node.pick(ShardId(0));
        node.pick(ShardId(1));
        node.pick(ShardId(2));
        assert_consistent(&node);
        assert_eq!(node.peek_least_loaded().map(|s| s.id), Some(ShardId(3)));

        node.unload(ShardId(1));
        assert_consistent(&node);
        assert_eq!(node.peek_least_loaded().map(|s| s.id), Some(ShardId(1)));
    }

    #[test]
    fn test_zero_shards() {
        let mut node = NodeLoad::new(0);
        assert_eq!(node.take_least_loaded(), None);
        assert_eq!(node.load(), 0);
    }

    #[test]
    #[should_panic(expected = "carries no load")]
    fn test_unload_empty_shard_panics() {
        let mut node = NodeLoad::new(2);
        node.unload(ShardId(1));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_pick_out_of_range_panics() {
        let mut node = NodeLoad::new(2);
        node.pick(ShardId(2));
    }
}
