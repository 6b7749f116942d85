use approx::assert_abs_diff_eq;
use court_physics::*;

fn ctx() -> TickContext {
    TickContext::default()
}

fn backboard() -> CollisionObject {
    CollisionObject::cuboid(Vec3::new(-10.0, 40.0, 30.0), Vec3::new(10.0, 42.0, 45.0))
        .with_object_type(ObjectType::Backboard)
        .with_material(Material::backboard())
}

fn rim_post() -> CollisionObject {
    CollisionObject::cylinder(Vec3::new(0.0, 36.0, 30.0), 0.5, 2.0).with_object_type(ObjectType::Rim)
}

#[test]
fn back_out_leaves_pair_separated() {
    let cases = [
        (
            CollisionObject::sphere(Vec3::new(0.0, 40.5, 35.0), 1.0).with_velocity(Vec3::new(0.0, 3.0, 0.5)),
            backboard(),
        ),
        (
            CollisionObject::sphere(Vec3::new(0.2, 36.0, 31.5), 1.0).with_velocity(Vec3::new(0.0, 0.5, -2.0)),
            rim_post(),
        ),
        (
            CollisionObject::cylinder(Vec3::new(0.0, 38.5, 35.0), 2.0, 6.0).with_velocity(Vec3::new(1.0, 4.0, 0.0)),
            backboard(),
        ),
        (
            CollisionObject::cylinder(Vec3::new(7.0, 1.0, 10.0), 5.0, 20.0).with_velocity(Vec3::new(6.0, 0.0, 0.0)),
            CollisionObject::cylinder(Vec3::new(14.0, 0.0, 10.0), 5.0, 20.0),
        ),
    ];

    for (mut mover, target) in cases {
        assert!(mover.test_object_intersection(&target).overlapping);
        mover.save();
        let mut budget = 0.0;
        assert!(mover.back_out_of_object(&target, &mut budget, &ctx()));
        assert!(
            !mover.test_object_intersection(&target).overlapping,
            "{:?} still overlaps {:?}",
            mover.kind(),
            target.kind()
        );
        assert!(budget > 0.0);
    }
}

#[test]
fn nudge_closes_gap_to_contact_skin() {
    let cases = [
        (
            CollisionObject::sphere(Vec3::new(0.0, 37.0, 35.0), 1.0).with_velocity(Vec3::new(0.0, 4.0, 0.0)),
            backboard(),
        ),
        (
            CollisionObject::sphere(Vec3::new(-4.0, 36.0, 30.0), 1.0).with_velocity(Vec3::new(3.0, 0.0, 0.0)),
            rim_post(),
        ),
        (
            CollisionObject::cylinder(Vec3::new(0.0, 0.0, 10.0), 5.0, 20.0).with_velocity(Vec3::new(5.0, 0.0, 0.0)),
            CollisionObject::cylinder(Vec3::new(14.0, 2.0, 10.0), 5.0, 20.0),
        ),
    ];

    for (mut mover, target) in cases {
        let mut budget = 1.0;
        assert!(mover.nudge_object(&target, &mut budget, &ctx()));
        let gap = mover.object_distance(&target);
        assert!(gap > 0.0 && gap < 5e-3, "gap after nudge was {gap}");
        assert!(!mover.test_object_intersection(&target).overlapping);
        assert!(budget >= 0.0 && budget < 1.0);
    }
}

#[test]
fn nudge_is_capped_by_remaining_budget() {
    let mut ball = CollisionObject::sphere(Vec3::new(0.0, 30.0, 35.0), 1.0).with_velocity(Vec3::new(0.0, 4.0, 0.0));
    let mut budget = 0.5;
    assert!(ball.nudge_object(&backboard(), &mut budget, &ctx()));
    assert_abs_diff_eq!(ball.position().y, 32.0, epsilon = 1e-5);
    assert_abs_diff_eq!(budget, 0.0, epsilon = 1e-6);
}

#[test]
fn ignored_objects_still_intersect_but_are_not_moved() {
    let start = Vec3::new(0.0, 40.5, 35.0);
    let mut ghost = CollisionObject::sphere(start, 1.0)
        .with_velocity(Vec3::new(0.0, 3.0, 0.0))
        .with_ignore(true);
    let board = backboard();

    assert!(ghost.test_object_intersection(&board).overlapping);
    let mut budget = 0.25;
    assert!(ghost.back_out_of_object(&board, &mut budget, &ctx()));
    assert!(ghost.nudge_object(&board, &mut budget, &ctx()));
    assert_eq!(ghost.position(), start);
    assert_eq!(budget, 0.25);
    assert!(ghost.test_object_intersection(&board).overlapping);
}

#[test]
fn intersection_is_symmetric_for_supported_shapes() {
    let ball = CollisionObject::sphere(Vec3::new(0.3, 36.0, 31.8), 1.0);
    let post = rim_post();
    let forward = ball.test_object_intersection(&post);
    let backward = post.test_object_intersection(&ball);
    assert_eq!(forward.overlapping, backward.overlapping);
    assert_eq!(forward.separation, -backward.separation);
    assert_abs_diff_eq!(ball.object_distance(&post), post.object_distance(&ball), epsilon = 1e-6);
}

#[test]
fn box_pairs_are_neutral() {
    let a = backboard();
    let b = CollisionObject::cuboid(Vec3::new(0.0, 41.0, 40.0), Vec3::new(1.0, 43.0, 50.0));
    let result = a.test_object_intersection(&b);
    assert!(!result.overlapping);
    assert_eq!(result.separation, Vec3::ZERO);
    assert_eq!(a.object_distance(&b), f32::INFINITY);
}

#[test]
fn unstoppable_overlap_restores_snapshot() {
    let mut ball = CollisionObject::sphere(Vec3::new(0.0, 30.0, 35.0), 1.0);
    ball.save();
    ball.set_position(Vec3::new(0.0, 41.0, 35.0));
    let mut budget = 0.0;
    assert!(!ball.back_out_of_object(&backboard(), &mut budget, &ctx()));
    assert_eq!(ball.position(), Vec3::new(0.0, 30.0, 35.0));
    assert_eq!(ball.velocity, Vec3::ZERO);
    assert_eq!(budget, 0.0);
}

#[test]
fn nearest_surface_points() {
    let board = backboard();
    assert_eq!(
        board.find_nearest_point(Vec3::new(0.0, 30.0, 35.0)),
        Vec3::new(0.0, 40.0, 35.0)
    );
    let post = rim_post();
    let on_side = post.find_nearest_point(Vec3::new(3.0, 36.0, 30.0));
    assert_abs_diff_eq!(on_side.x, 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(on_side.z, 30.0, epsilon = 1e-6);
}

#[test]
fn moving_away_is_rejected() {
    let ball = CollisionObject::sphere(Vec3::new(0.0, 39.5, 35.0), 1.0).with_velocity(Vec3::new(0.0, -3.0, 0.0));
    let board = backboard();
    let hit = ball.test_object_intersection(&board);
    assert!(hit.overlapping);
    assert!(!ball.validate_collision(&board, hit.separation));
}

#[test]
fn back_out_past_time_cap_restores_snapshot() {
    let mut ball = CollisionObject::sphere(Vec3::new(0.0, 37.0, 35.0), 1.0).with_velocity(Vec3::new(0.0, 0.01, 0.0));
    ball.save();
    ball.set_position(Vec3::new(0.0, 40.5, 35.0));
    assert!(ball.test_object_intersection(&backboard()).overlapping);

    let mut budget = 0.0;
    assert!(!ball.back_out_of_object(&backboard(), &mut budget, &ctx()));
    assert_eq!(ball.position(), Vec3::new(0.0, 37.0, 35.0));
    assert_eq!(ball.velocity, Vec3::ZERO);
    assert_eq!(budget, 0.0);
}

#[test]
fn back_out_past_iteration_cap_restores_snapshot() {
    // Every axis is below the clearance threshold, so each step falls back to
    // `back_out_step` and 500 of them stay well inside the time cap.
    let context = TickContext::new(
        CollisionConfig {
            max_back_out_time: 10.0,
            ..CollisionConfig::default()
        },
        0,
    );
    let crawl = Vec3::splat(9.0e-7);
    let mut ball = CollisionObject::sphere(Vec3::new(0.0, 37.0, 35.0), 1.0).with_velocity(crawl);
    ball.save();
    ball.set_position(Vec3::new(0.0, 40.5, 35.0));

    let mut budget = 0.0;
    assert!(!ball.back_out_of_object(&backboard(), &mut budget, &context));
    assert_eq!(ball.position(), Vec3::new(0.0, 37.0, 35.0));
    assert_eq!(ball.velocity, Vec3::ZERO);
    assert_eq!(budget, 0.0);
}
