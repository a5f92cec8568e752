use std::collections::HashMap;

use core_recon::{merge_cohort, CollectingSink, ReconConfig};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use report_schema::{Player, PlayerId, Report, Star, StarId};

/// Overlapping sensor windows: neighbouring players see half of each other's
/// stars, so the merge exercises both the insert and the compare paths.
fn synthetic_cohort(players: u32, stars_per_player: u32) -> Vec<Report> {
    (0..players)
        .map(|p| {
            let mut stars = HashMap::new();
            for s in 0..stars_per_player {
                let id = (p * stars_per_player / 2 + s) as i32;
                stars.insert(
                    StarId(id),
                    Star {
                        name: format!("star-{id}"),
                        owner: PlayerId(id % 8),
                        x: f64::from(id),
                        y: f64::from(id) * 0.5,
                    },
                );
            }
            let mut players_map = HashMap::new();
            players_map.insert(
                PlayerId(p as i32),
                Player {
                    id: PlayerId(p as i32),
                    alias: format!("player-{p}"),
                    tech: HashMap::new(),
                },
            );
            Report {
                tick: 60,
                player: PlayerId(p as i32),
                stars,
                players: players_map,
                fleets: HashMap::new(),
            }
        })
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let config = ReconConfig::default();

    for players in [2u32, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::new("players", players), &players, |b, &players| {
            b.iter_batched(
                || synthetic_cohort(players, 200),
                |cohort| {
                    let mut sink = CollectingSink::default();
                    merge_cohort(10, cohort, &config, &mut sink)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(merge_benches, bench_merge);
criterion_main!(merge_benches);
