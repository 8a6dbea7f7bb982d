use crate::config::SketchConfig;
use crate::error::{Result, SketchError};
use crate::sketch::minmax::MinMaxTracker;
use crate::sketch::node::NodeLoad;
use crate::sketch::yielder::{clear_gently, Yielder};
use crate::topology::{
    HostId, ShardId, TableId, TabletInfo, TabletMap, TabletReplicaSet, TabletTransitionInfo,
    TokenMetadata, TokenMetadataPtr, Topology,
};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// Counters gathered by one `populate` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulateStats {
    pub tablets_scanned: u64,
    pub replicas_accounted: u64,
    pub replicas_filtered: u64,
    /// Replicas naming a shard the node does not have.
    pub replicas_skipped: u64,
    pub yields: u64,
}

/// Tracks how many tablets each shard of each node owns, and hands out the
/// least loaded shard of a node for new tablets.
///
/// Built from one token metadata snapshot. Selection and mutation only touch
/// the in-memory counters, never the snapshot.
#[derive(Debug)]
pub struct LoadSketch {
    nodes: HashMap<HostId, NodeLoad>,
    tm: TokenMetadataPtr,
    config: SketchConfig,
}

// Migrations are reflected as if they already happened, assuming they succeed.
fn get_replicas_for_tablet_load<'a>(
    ti: &'a TabletInfo,
    trinfo: Option<&'a TabletTransitionInfo>,
) -> &'a TabletReplicaSet {
    match trinfo {
        Some(trinfo) => &trinfo.next,
        None => &ti.replicas,
    }
}

impl LoadSketch {
    pub fn new(tm: TokenMetadataPtr) -> Self {
        Self::with_config(tm, SketchConfig::default())
    }

    pub fn with_config(tm: TokenMetadataPtr, config: SketchConfig) -> Self {
        Self {
            nodes: HashMap::new(),
            tm,
            config,
        }
    }

    /// Rebuilds all counters from the bound snapshot, optionally restricted
    /// to replicas on `host` and to tablets of `only_table`.
    pub async fn populate(
        &mut self,
        host: Option<HostId>,
        only_table: Option<TableId>,
    ) -> Result<PopulateStats> {
        let mut yielder = Yielder::new(self.config.yield_interval);
        let mut stats = PopulateStats::default();

        clear_gently(&mut self.nodes, &mut yielder).await;

        let tm = Arc::clone(&self.tm);

        tracing::debug!(
            "Populating load sketch: host={:?}, table={:?}, tables_known={}",
            host,
            only_table,
            tm.tablets().table_count()
        );

        let scanned = self
            .scan(&tm, host, only_table, &mut yielder, &mut stats)
            .await;

        // Counters written before a failed scan still need a valid heap.
        for node in self.nodes.values_mut() {
            node.rebuild_heap();
        }

        stats.yields = yielder.yields();
        scanned?;

        if stats.replicas_skipped > 0 {
            tracing::warn!(
                "Load sketch dropped {} replicas with out-of-range shards",
                stats.replicas_skipped
            );
        }

        tracing::debug!(
            "Load sketch populated: nodes={}, tablets={}, replicas={}",
            self.nodes.len(),
            stats.tablets_scanned,
            stats.replicas_accounted
        );

        Ok(stats)
    }

    async fn scan(
        &mut self,
        tm: &TokenMetadata,
        host: Option<HostId>,
        only_table: Option<TableId>,
        yielder: &mut Yielder,
        stats: &mut PopulateStats,
    ) -> Result<()> {
        let topo = tm.get_topology();
        match only_table {
            Some(table) => {
                let tmap = tm.tablets().get_tablet_map(table)?;
                self.populate_table(topo, tmap, host, yielder, stats).await
            }
            None => {
                for (_, tmap) in tm.tablets().all_tables() {
                    self.populate_table(topo, tmap, host, yielder, stats).await?;
                }
                Ok(())
            }
        }
    }

    async fn populate_table(
        &mut self,
        topo: &Topology,
        tmap: &TabletMap,
        host: Option<HostId>,
        yielder: &mut Yielder,
        stats: &mut PopulateStats,
    ) -> Result<()> {
        for (tid, ti) in tmap.tablets() {
            let replicas = get_replicas_for_tablet_load(ti, tmap.get_tablet_transition_info(tid));
            for replica in replicas {
                if host.is_some_and(|h| h != replica.host) {
                    stats.replicas_filtered += 1;
                    continue;
                }

                let node = match self.nodes.entry(replica.host) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => {
                        let shard_count = topo
                            .find_node(replica.host)
                            .ok_or(SketchError::NodeNotFound { host: replica.host })?
                            .shard_count;
                        entry.insert(NodeLoad::new(shard_count))
                    }
                };

                if node.account(replica.shard) {
                    stats.replicas_accounted += 1;
                } else {
                    stats.replicas_skipped += 1;
                    if self.config.log_skipped_replicas {
                        tracing::warn!(
                            "Skipping replica of tablet {} on {}: shard {} out of range ({} shards)",
                            tid,
                            replica.host,
                            replica.shard,
                            node.shard_count()
                        );
                    }
                }
            }

            stats.tablets_scanned += 1;
            yielder.tick().await;
        }

        Ok(())
    }

    /// Returns the least loaded shard of `node` and counts one more tablet on it.
    pub fn next_shard(&mut self, node: HostId) -> Result<ShardId> {
        if !self.nodes.contains_key(&node) {
            let shard_count = self
                .tm
                .get_topology()
                .find_node(node)
                .ok_or(SketchError::NodeNotFound { host: node })?
                .shard_count;
            if shard_count == 0 {
                return Err(SketchError::UnknownShardCount { host: node });
            }
            tracing::debug!("Creating load entry for node {} with {} shards", node, shard_count);
            self.nodes.insert(node, NodeLoad::new(shard_count));
        }

        self.nodes
            .get_mut(&node)
            .and_then(NodeLoad::take_least_loaded)
            .ok_or(SketchError::UnknownShardCount { host: node })
    }

    /// Undoes one tablet on `shard`.
    ///
    /// # Panics
    ///
    /// Panics if the node has no entry or the shard carries no load.
    pub fn unload(&mut self, node: HostId, shard: ShardId) {
        self.node_mut(node).unload(shard);
    }

    /// Counts one tablet on `shard`, placed by the caller rather than by `next_shard`.
    ///
    /// # Panics
    ///
    /// Panics if the node has no entry or the shard is out of range.
    pub fn pick(&mut self, node: HostId, shard: ShardId) {
        self.node_mut(node).pick(shard);
    }

    fn node_mut(&mut self, node: HostId) -> &mut NodeLoad {
        match self.nodes.get_mut(&node) {
            Some(n) => n,
            None => panic!("No load entry for node {}", node),
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &HostId> {
        self.nodes.keys()
    }

    pub fn get_load(&self, node: HostId) -> u64 {
        self.nodes.get(&node).map_or(0, NodeLoad::load)
    }

    pub fn total_load(&self) -> u64 {
        self.nodes.values().map(NodeLoad::load).sum()
    }

    pub fn get_shard_load(&self, node: HostId, shard: ShardId) -> u64 {
        self.nodes
            .get(&node)
            .and_then(|n| n.shard_load(shard))
            .unwrap_or(0)
    }

    pub fn get_avg_shard_load(&self, node: HostId) -> u64 {
        match self.nodes.get(&node) {
            Some(n) if n.shard_count() > 0 => n.load().div_ceil(n.shard_count() as u64),
            _ => 0,
        }
    }

    pub fn get_real_avg_shard_load(&self, node: HostId) -> f64 {
        match self.nodes.get(&node) {
            Some(n) if n.shard_count() > 0 => n.load() as f64 / n.shard_count() as f64,
            _ => 0.0,
        }
    }

    pub fn get_shard_count(&self, node: HostId) -> usize {
        self.nodes.get(&node).map_or(0, NodeLoad::shard_count)
    }

    /// Difference in tablet count between the most and least loaded shard.
    /// 0 means perfectly balanced; 1 is the best reachable when the load
    /// does not divide evenly across shards.
    pub fn get_shard_imbalance(&self, node: HostId) -> u64 {
        self.get_shard_minmax(node).spread()
    }

    pub fn get_shard_minmax(&self, node: HostId) -> MinMaxTracker<u64> {
        let mut minmax = MinMaxTracker::new();
        if let Some(n) = self.nodes.get(&node) {
            for &load in n.shard_loads() {
                minmax.update(load);
            }
        }
        if minmax.is_empty() {
            minmax.update(0);
        }
        minmax
    }
}
