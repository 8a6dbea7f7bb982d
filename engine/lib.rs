//! Tablet load accounting for minsql placement.
//!
//! A [`LoadSketch`] is built from a token metadata snapshot and counts how many
//! tablets live on every shard of every node. The balancer asks it for the
//! least loaded shard of a node and records tentative moves with `pick` and
//! `unload` before committing anything to the cluster.

pub mod config;
pub mod error;
pub mod sketch;
pub mod topology;

pub use config::SketchConfig;
pub use error::{Result, SketchError};
pub use sketch::{LoadSketch, MinMaxTracker, PopulateStats};
pub use topology::{
    HostId, ShardId, TableId, TabletId, TabletMap, TabletMetadata, TabletReplica, TokenMetadata,
    TokenMetadataPtr, Topology,
};
