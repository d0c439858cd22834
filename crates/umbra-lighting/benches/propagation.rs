use criterion::{Criterion, black_box, criterion_group, criterion_main};
use umbra_grid::{DungeonStyle, LIGHT_DARK};
use umbra_lighting::*;

fn bench_build_tables(c: &mut Criterion) {
    c.bench_function("build_light_tables", |bencher| {
        bencher.iter(|| black_box(LightTables::new(black_box(DungeonStyle::Crypt))))
    });
}

fn bench_apply_max_radius(c: &mut Criterion) {
    let tables = LightTables::new(DungeonStyle::Cathedral);
    let mut grid = LightGrid::new(112, 112, LIGHT_DARK);
    c.bench_function("apply_light_r15", |bencher| {
        bencher.iter(|| {
            apply_light(&mut grid.working, &tables, 56, 56, black_box((3, -2)), 15);
            unlight(&mut grid, &tables, 56, 56, 15);
        })
    });
}

fn bench_process_full_pool(c: &mut Criterion) {
    let tables = LightTables::new(DungeonStyle::Caves);
    let mut grid = LightGrid::new(112, 112, LIGHT_DARK);
    let mut lights = LightManager::new(32);
    let ids: Vec<_> = (0..32)
        .map(|i| lights.add_light(8 + (i % 8) * 12, 8 + (i / 8) * 24, 8))
        .collect();
    lights.process(&mut grid, &tables);

    let mut step = 0;
    c.bench_function("process_32_moving_lights", |bencher| {
        bencher.iter(|| {
            step = (step + 1) % 4;
            for (i, &id) in ids.iter().enumerate() {
                let i = i as i32;
                lights.change_light_xy(id, 8 + (i % 8) * 12 + step, 8 + (i / 8) * 24);
            }
            lights.process(&mut grid, &tables);
        })
    });
}

criterion_group!(
    benches,
    bench_build_tables,
    bench_apply_max_radius,
    bench_process_full_pool
);
criterion_main!(benches);
