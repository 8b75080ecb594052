//! Criterion benchmarks for the spatial structures.
//! Playfields of k x k regions, k in {4, 8, 16}.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use hullmerge::geom2::rand::{scatter_regions, ScatterCfg};
use hullmerge::geom2::{ConvexPolygon, Rect, RegionId, VertexArena};
use hullmerge::locate::TrapezoidMap;
use hullmerge::partition::{PartitionIndex, PartitionKind, SegmentIndex};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SIDE: f64 = 1000.0;

fn playfield(k: usize, seed: u64) -> (VertexArena, Vec<ConvexPolygon>) {
    let mut arena = VertexArena::new();
    let cfg = ScatterCfg {
        cols: k,
        rows: k,
        ..ScatterCfg::default()
    };
    let polys = scatter_regions(&mut arena, Rect::new(10.0, 10.0, SIDE - 10.0, SIDE - 10.0), cfg, seed);
    (arena, polys)
}

fn filled_map(polys: &[ConvexPolygon]) -> TrapezoidMap {
    let mut map = TrapezoidMap::new(Rect::new(0.0, 0.0, SIDE, SIDE), 3);
    for (i, p) in polys.iter().enumerate() {
        map.insert(p, RegionId(i as u32)).ok();
    }
    map
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");
    for &k in &[4usize, 8, 16] {
        let (_, polys) = playfield(k, 11);
        group.bench_with_input(BenchmarkId::new("build", k), &k, |b, _| {
            b.iter(|| filled_map(&polys))
        });
        let map = filled_map(&polys);
        let mut rng = StdRng::seed_from_u64(5);
        let probes: Vec<(f64, f64)> = (0..1024)
            .map(|_| (rng.gen_range(0.0..SIDE), rng.gen_range(0.0..SIDE)))
            .collect();
        group.bench_with_input(BenchmarkId::new("query_1024", k), &k, |b, _| {
            b.iter(|| probes.iter().filter(|(x, y)| map.query(*x, *y).is_some()).count())
        });
        group.bench_with_input(BenchmarkId::new("remove_last", k), &k, |b, _| {
            let last = RegionId(polys.len() as u32 - 1);
            b.iter_batched(
                || map.clone(),
                |mut m| m.remove(last).ok(),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition");
    for &k in &[4usize, 8, 16] {
        let (_, polys) = playfield(k, 13);
        let vertices: Vec<_> = polys.iter().flat_map(|p| p.positions()).collect();
        let all: Vec<_> = polys.iter().flat_map(|p| p.points().to_vec()).collect();
        for kind in [PartitionKind::AxisSplit, PartitionKind::Conjugate] {
            let mut index = PartitionIndex::build(kind, &vertices);
            for (i, p) in polys.iter().enumerate() {
                index.insert_polygon(p, RegionId(i as u32));
            }
            let mut rng = StdRng::seed_from_u64(17);
            let queries: Vec<_> = (0..256)
                .map(|_| (all[rng.gen_range(0..all.len())], all[rng.gen_range(0..all.len())]))
                .filter(|(p, q)| p.id != q.id)
                .collect();
            let name = format!("intersects_256_{kind:?}");
            group.bench_with_input(BenchmarkId::new(name, k), &k, |b, _| {
                b.iter(|| queries.iter().filter(|(p, q)| index.intersects(p, q)).count())
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_locate, bench_partition);
criterion_main!(benches);
