use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use court_physics::*;
use std::hint::black_box;

fn prepare_court(player_count: usize) -> CourtWorld {
    let mut world = CourtWorld::default();
    world.add_object(
        CollisionObject::cuboid(Vec3::new(-150.0, -80.0, -5.0), Vec3::new(150.0, 80.0, 0.0))
            .with_object_type(ObjectType::Floor)
            .with_material(Material::floor()),
    );
    world.add_object(
        CollisionObject::cuboid(Vec3::new(-10.0, 70.0, 30.0), Vec3::new(10.0, 72.0, 45.0))
            .with_object_type(ObjectType::Backboard)
            .with_material(Material::backboard()),
    );

    for i in 0..player_count {
        let x = (i % 16) as f32 * 15.0 - 120.0;
        let y = (i / 16) as f32 * 15.0 - 60.0;
        let heading = if i % 2 == 0 { 2.0 } else { -2.0 };
        world.add_object(
            CollisionObject::player(Vec3::new(x, y, 10.0), 2.5, 20.0, PlayerTraits::default())
                .with_velocity(Vec3::new(heading, 1.0, 0.0))
                .with_material(Material::player()),
        );
    }

    let ball = world.add_object(
        CollisionObject::sphere(Vec3::new(0.0, 0.0, 40.0), 1.2)
            .with_object_type(ObjectType::Ball)
            .with_material(Material::ball())
            .with_velocity(Vec3::new(1.5, 3.0, 0.0))
            .with_gravity_scale(1.0),
    );
    world.set_virtual_ball(ball);
    world
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree");
    for &count in &[16usize, 64, 256] {
        let world = prepare_court(count);
        group.bench_with_input(BenchmarkId::new("build", count), &world, |b, world| {
            b.iter(|| {
                let mut tree = CollisionObjectTree::default();
                tree.build(black_box(world.objects()));
                tree
            })
        });

        let mut tree = CollisionObjectTree::default();
        tree.build(world.objects());
        let probe = Aabb::new(Vec3::new(-20.0, -20.0, 0.0), Vec3::new(20.0, 20.0, 40.0));
        group.bench_with_input(BenchmarkId::new("query", count), &tree, |b, tree| {
            b.iter(|| tree.query(black_box(&probe)))
        });
    }
    group.finish();
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("court_step");
    for &count in &[16usize, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut world = prepare_court(count);
            b.iter(|| black_box(world.step()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tree, bench_step);
criterion_main!(benches);
