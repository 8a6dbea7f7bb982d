use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use load_sketch::{
    HostId, LoadSketch, TabletMap, TabletMetadata, TabletReplica, TableId, TokenMetadata,
    Topology,
};
use tokio::runtime::Builder;

fn cluster(shard_count: u32, tablets: u32) -> (HostId, TokenMetadata) {
    let host = HostId::new_random();
    let mut topology = Topology::new();
    topology.add_node(host, shard_count);

    let mut tmap = TabletMap::new();
    for i in 0..tablets {
        tmap.push_tablet(vec![TabletReplica::new(host, (i * 7) % shard_count)]);
    }
    let mut metadata = TabletMetadata::new();
    metadata.set_tablet_map(TableId::new_random(), tmap);

    (host, TokenMetadata::new(topology, metadata))
}

fn bench_next_shard(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_shard");
    for shard_count in [8u32, 64, 256] {
        let (host, tm) = cluster(shard_count, 0);
        let tm = tm.into_ptr();
        group.bench_with_input(
            BenchmarkId::from_parameter(shard_count),
            &shard_count,
            |b, _| {
                let mut sketch = LoadSketch::new(tm.clone());
                b.iter(|| black_box(sketch.next_shard(host).unwrap()));
            },
        );
    }
    group.finish();
}

fn bench_populate(c: &mut Criterion) {
    let runtime = Builder::new_current_thread().build().unwrap();
    let (_, tm) = cluster(64, 100_000);
    let tm = tm.into_ptr();

    c.bench_function("populate_100k_tablets", |b| {
        b.iter(|| {
            let mut sketch = LoadSketch::new(tm.clone());
            runtime.block_on(sketch.populate(None, None)).unwrap()
        });
    });
}

criterion_group!(benches, bench_next_shard, bench_populate);
criterion_main!(benches);
