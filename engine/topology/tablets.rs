use crate::error::{Result, SketchError};
use crate::topology::ids::{HostId, ShardId, TableId, TabletId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabletReplica {
    pub host: HostId,
    pub shard: ShardId,
}

impl TabletReplica {
    pub fn new(host: HostId, shard: u32) -> Self {
        Self {
            host,
            shard: ShardId(shard),
        }
    }
}

pub type TabletReplicaSet = Vec<TabletReplica>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabletInfo {
    pub replicas: TabletReplicaSet,
}

/// An in-flight migration. `next` is the replica set the tablet moves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabletTransitionInfo {
    pub next: TabletReplicaSet,
}

#[derive(Debug, Clone, Default)]
pub struct TabletMap {
    tablets: Vec<TabletInfo>,
    transitions: BTreeMap<TabletId, TabletTransitionInfo>,
}

impl TabletMap {
    pub fn new() -> Self {
        Self {
            tablets: Vec::new(),
            transitions: BTreeMap::new(),
        }
    }

    pub fn push_tablet(&mut self, replicas: TabletReplicaSet) -> TabletId {
        let id = TabletId(self.tablets.len());
        self.tablets.push(TabletInfo { replicas });
        id
    }

    pub fn set_transition(&mut self, tablet: TabletId, next: TabletReplicaSet) {
        self.transitions.insert(tablet, TabletTransitionInfo { next });
    }

    pub fn tablet_count(&self) -> usize {
        self.tablets.len()
    }

    pub fn get_tablet_info(&self, tablet: TabletId) -> Option<&TabletInfo> {
        self.tablets.get(tablet.0)
    }

    pub fn get_tablet_transition_info(&self, tablet: TabletId) -> Option<&TabletTransitionInfo> {
        self.transitions.get(&tablet)
    }

    pub fn tablets(&self) -> impl Iterator<Item = (TabletId, &TabletInfo)> {
        self.tablets
            .iter()
            .enumerate()
            .map(|(i, info)| (TabletId(i), info))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TabletMetadata {
    tables: HashMap<TableId, TabletMap>,
}

impl TabletMetadata {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    pub fn set_tablet_map(&mut self, table: TableId, tmap: TabletMap) {
        self.tables.insert(table, tmap);
    }

    pub fn get_tablet_map(&self, table: TableId) -> Result<&TabletMap> {
        self.tables
            .get(&table)
            .ok_or(SketchError::NoSuchTable { table })
    }

    pub fn all_tables(&self) -> impl Iterator<Item = (&TableId, &TabletMap)> {
        self.tables.iter()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}
