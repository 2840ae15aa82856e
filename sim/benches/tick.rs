use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use jhansi_sim::{FortSim, Position, UnitType};

fn garrisoned_siege() -> FortSim {
    let mut sim = FortSim::with_seed(7);
    sim.start();
    for (unit, y) in [
        (UnitType::Cannon, 150.0),
        (UnitType::Musketeer, 270.0),
        (UnitType::Cannon, 390.0),
    ] {
        sim.select_unit(Some(unit));
        sim.place_defender(Position::new(450.0, y));
    }
    sim
}

fn bench_tick(c: &mut Criterion) {
    c.bench_function("advance_one_tick", |b| {
        b.iter_batched(
            garrisoned_siege,
            |mut sim| {
                sim.advance(black_box(0.016));
                sim
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("advance_600_ticks", |b| {
        b.iter_batched(
            garrisoned_siege,
            |mut sim| {
                for _ in 0..600 {
                    sim.advance(black_box(0.016));
                }
                sim
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("snapshot_json", |b| {
        let mut sim = garrisoned_siege();
        for _ in 0..60 {
            sim.advance(0.016);
        }
        b.iter(|| black_box(sim.snapshot_json()))
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
