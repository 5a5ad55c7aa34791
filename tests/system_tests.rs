use phys_collide::{
    core::IndexKind,
    error::CollisionError,
    math::{Aabb, Vector},
    Body, BodyHandle, BodyKind, BodyOptions, System, SystemConfig,
};
use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sorted(mut handles: Vec<BodyHandle>) -> Vec<BodyHandle> {
    handles.sort();
    handles
}

/// Fills a system with a random mix of every body kind
fn populate(system: &mut System, rng: &mut StdRng, count: usize) -> Vec<BodyHandle> {
    let mut handles = Vec::with_capacity(count);
    for i in 0..count {
        let position = Vector::new(rng.gen_range(0.0..40.0), rng.gen_range(0.0..40.0));
        let options = BodyOptions::new().with_angle(rng.gen_range(0.0..6.28));
        let handle = match i % 6 {
            0 => system.create_point(position, options),
            1 => system.create_circle(position, rng.gen_range(0.5..4.0), options),
            2 => system.create_box(position, rng.gen_range(0.5..6.0), rng.gen_range(0.5..6.0), options),
            3 => system.create_polygon(
                position,
                vec![
                    Vector::new(0.0, 0.0),
                    Vector::new(4.0, 0.0),
                    Vector::new(4.0, 4.0),
                    Vector::new(2.0, 1.0),
                    Vector::new(0.0, 4.0),
                ],
                options,
            ),
            4 => system.create_line(
                position,
                position + Vector::new(rng.gen_range(-5.0..5.0), rng.gen_range(1.0..5.0)),
                options,
            ),
            _ => system.create_ellipse(position, rng.gen_range(1.0..4.0), rng.gen_range(1.0..4.0), None, options),
        };
        handles.push(handle.unwrap());
    }
    handles
}

#[test]
fn test_collision_verdict_is_symmetric() {
    init();
    let mut rng = StdRng::seed_from_u64(42);
    let mut system = System::new();
    let handles = populate(&mut system, &mut rng, 60);

    let mut collisions = 0;
    for &a in &handles {
        for &b in &handles {
            if a == b {
                continue;
            }
            let ab = system.check_collision(a, b).unwrap();
            let ba = system.check_collision(b, a).unwrap();
            assert_eq!(ab.is_some(), ba.is_some(), "{:?} vs {:?}", a, b);
            if ab.is_some() {
                collisions += 1;
            }
        }
    }
    assert!(collisions > 0);
}

#[test]
fn test_static_bodies_never_initiate_checks() {
    init();
    let mut system = System::new();
    let wall = system
        .create_box(Vector::new(0.0, 0.0), 10.0, 10.0, BodyOptions::new().with_static(true))
        .unwrap();
    let ball = system
        .create_circle(Vector::new(5.0, 5.0), 2.0, BodyOptions::new())
        .unwrap();

    assert!(system.get_potentials(wall).unwrap().is_empty());

    let mut calls = 0;
    system.check_one(wall, |_| calls += 1).unwrap();
    assert_eq!(calls, 0);

    // the static body is still a candidate for others
    assert_eq!(system.get_potentials(ball).unwrap(), vec![wall]);
    let mut seen = Vec::new();
    system.check_one(ball, |response| seen.push(response.b)).unwrap();
    assert_eq!(seen, vec![wall]);
}

#[test]
fn test_update_body_makes_the_body_searchable() {
    init();
    let mut system = System::new();
    let handle = system
        .create_polygon(
            Vector::new(0.0, 0.0),
            vec![Vector::new(0.0, 0.0), Vector::new(2.0, 0.0), Vector::new(1.0, 2.0)],
            BodyOptions::new(),
        )
        .unwrap();

    let body = system.get_body_mut(handle).unwrap();
    body.set_position(Vector::new(50.0, -20.0));
    body.set_angle(1.0);
    body.set_scale(3.0, 0.5);
    let aabb = body.get_aabb();

    // the index is only touched on commit
    assert!(!system.search(&aabb).contains(&handle));

    system.update_body(handle).unwrap();
    assert!(system.search(&aabb).contains(&handle));
}

#[test]
fn test_remove_and_reinsert_round_trip() {
    init();
    let mut rng = StdRng::seed_from_u64(3);
    let mut system = System::new();
    populate(&mut system, &mut rng, 30);
    let circle = system
        .create_circle(Vector::new(20.0, 20.0), 5.0, BodyOptions::new())
        .unwrap();

    let queries: Vec<Aabb> = (0..20)
        .map(|_| {
            let min = Vector::new(rng.gen_range(0.0..40.0), rng.gen_range(0.0..40.0));
            Aabb::new(min, min + Vector::new(8.0, 8.0))
        })
        .collect();
    let before: Vec<Vec<BodyHandle>> = queries.iter().map(|q| sorted(system.search(q))).collect();

    let body = system.remove(circle).unwrap();
    assert!(body.system_ref().is_none());
    assert!(system.get_body(circle).is_err());

    let reinserted = system.insert(body).unwrap();
    for (query, expected) in queries.iter().zip(&before) {
        let expected: Vec<BodyHandle> = expected
            .iter()
            .map(|&h| if h == circle { reinserted } else { h })
            .collect();
        assert_eq!(sorted(system.search(query)), sorted(expected));
    }
}

#[test]
fn test_update_is_idempotent() {
    init();
    let mut rng = StdRng::seed_from_u64(11);
    let mut system = System::new();
    populate(&mut system, &mut rng, 40);

    system.update().unwrap();
    let first: Vec<Aabb> = system.bodies().map(|(_, body)| body.get_aabb()).collect();
    let first_index = system.index_boxes();

    system.update().unwrap();
    let second: Vec<Aabb> = system.bodies().map(|(_, body)| body.get_aabb()).collect();

    assert_eq!(first, second);
    assert_eq!(first_index.len(), system.index_boxes().len());
}

#[test]
fn test_raycast_hits_nearest_circle_boundary() {
    init();
    let mut system = System::new();
    let circle = system
        .create_circle(Vector::new(5.0, 0.0), 1.0, BodyOptions::new())
        .unwrap();

    let hit = system.raycast(Vector::new(0.0, 0.0), Vector::new(10.0, 0.0)).unwrap();
    assert_eq!(hit.collider, circle);
    assert_relative_eq!(hit.point, Vector::new(4.0, 0.0), epsilon = 1e-4);

    // the probe never stays in the index
    assert_eq!(system.index_boxes().len(), 1);
}

#[test]
fn test_raycast_on_empty_system_misses() {
    init();
    let system = System::new();
    assert!(system.raycast(Vector::new(0.0, 0.0), Vector::new(1.0, 1.0)).is_none());
}

#[test]
fn test_raycast_picks_closest_collider() {
    init();
    let mut system = System::new();
    let far = system
        .create_box(Vector::new(8.0, -1.0), 2.0, 2.0, BodyOptions::new())
        .unwrap();
    let near = system
        .create_box(Vector::new(3.0, -1.0), 2.0, 2.0, BodyOptions::new())
        .unwrap();

    let hit = system.raycast(Vector::new(0.0, 0.0), Vector::new(20.0, 0.0)).unwrap();
    assert_eq!(hit.collider, near);
    assert_relative_eq!(hit.point, Vector::new(3.0, 0.0), epsilon = 1e-4);

    let hit = system
        .raycast_filtered(Vector::new(0.0, 0.0), Vector::new(20.0, 0.0), |handle, _| handle != near)
        .unwrap();
    assert_eq!(hit.collider, far);
    assert_relative_eq!(hit.point, Vector::new(8.0, 0.0), epsilon = 1e-4);

    // ray ending short of everything
    assert!(system.raycast(Vector::new(0.0, 0.0), Vector::new(2.0, 0.0)).is_none());
    // degenerate ray
    assert!(system.raycast(Vector::new(4.0, 0.0), Vector::new(4.0, 0.0)).is_none());
}

#[test]
fn test_separate_moves_circle_out_of_static_box() {
    init();
    let mut system = System::new();
    let wall = system
        .create_box(Vector::new(0.0, 0.0), 10.0, 10.0, BodyOptions::new().with_static(true))
        .unwrap();
    let ball = system
        .create_circle(Vector::new(5.0, 5.0), 3.0, BodyOptions::new())
        .unwrap();

    let response = system.check_collision(ball, wall).unwrap().unwrap();
    assert!(response.a_in_b);

    system.separate().unwrap();

    let moved = system.get_body(ball).unwrap().get_position();
    assert_relative_eq!(moved, Vector::new(5.0, 5.0) - response.overlap_v, epsilon = 1e-5);
    assert_relative_eq!((moved - Vector::new(5.0, 5.0)).norm(), response.overlap, epsilon = 1e-5);
    assert_eq!(system.get_body(wall).unwrap().get_position(), Vector::new(0.0, 0.0));

    // the moved body was committed to the index
    let aabb = system.get_body(ball).unwrap().get_aabb();
    assert!(system.search(&aabb).contains(&ball));
}

#[test]
fn test_separate_leaves_triggers_in_place() {
    init();
    let mut system = System::new();
    let sensor = system
        .create_circle(Vector::new(0.0, 0.0), 2.0, BodyOptions::new().with_trigger(true))
        .unwrap();
    let ball = system
        .create_circle(Vector::new(1.0, 0.0), 2.0, BodyOptions::new())
        .unwrap();

    system.separate().unwrap();

    assert_eq!(system.get_body(sensor).unwrap().get_position(), Vector::new(0.0, 0.0));
    let moved = system.get_body(ball).unwrap().get_position();
    assert_relative_eq!(moved, Vector::new(4.0, 0.0), epsilon = 1e-5);
    assert!(system.check_collision(ball, sensor).unwrap().map_or(true, |r| r.overlap < 1e-4));
}

#[test]
fn test_check_all_reports_both_directions() {
    init();
    let mut system = System::new();
    let a = system.create_circle(Vector::new(0.0, 0.0), 1.0, BodyOptions::new()).unwrap();
    let b = system.create_circle(Vector::new(1.5, 0.0), 1.0, BodyOptions::new()).unwrap();
    system.create_circle(Vector::new(10.0, 0.0), 1.0, BodyOptions::new()).unwrap();

    let collisions = system.collisions().unwrap();
    assert_eq!(collisions.len(), 2);
    assert!(collisions.iter().any(|r| r.a == a && r.b == b));
    assert!(collisions.iter().any(|r| r.a == b && r.b == a));

    let ab = collisions.iter().find(|r| r.a == a).unwrap();
    let ba = collisions.iter().find(|r| r.a == b).unwrap();
    assert_relative_eq!(ab.overlap_v, -ba.overlap_v, epsilon = 1e-5);
    assert_relative_eq!(ab.overlap, 0.5, epsilon = 1e-5);
}

#[test]
fn test_concave_polygon_notch_is_empty() {
    init();
    let mut system = System::new();
    let cup = system
        .create_polygon(
            Vector::new(0.0, 0.0),
            vec![
                Vector::new(0.0, 0.0),
                Vector::new(6.0, 0.0),
                Vector::new(6.0, 4.0),
                Vector::new(4.0, 4.0),
                Vector::new(4.0, 2.0),
                Vector::new(2.0, 2.0),
                Vector::new(2.0, 4.0),
                Vector::new(0.0, 4.0),
            ],
            BodyOptions::new(),
        )
        .unwrap();
    let ball = system
        .create_circle(Vector::new(3.0, 3.2), 0.8, BodyOptions::new())
        .unwrap();

    assert!(!system.get_body(cup).unwrap().is_convex());
    // the boxes overlap, the shapes do not
    assert!(system.get_potentials(ball).unwrap().contains(&cup));
    assert!(system.check_collision(ball, cup).unwrap().is_none());

    system.get_body_mut(ball).unwrap().set_position(Vector::new(3.0, 2.5));
    system.update_body(ball).unwrap();
    assert!(system.check_collision(ball, cup).unwrap().is_some());
}

#[test]
fn test_separate_frees_circle_from_concave_corner() {
    init();
    let mut system = System::new();
    let ell = system
        .create_polygon(
            Vector::new(0.0, 0.0),
            vec![
                Vector::new(0.0, 0.0),
                Vector::new(10.0, 0.0),
                Vector::new(10.0, 4.0),
                Vector::new(4.0, 4.0),
                Vector::new(4.0, 10.0),
                Vector::new(0.0, 10.0),
            ],
            BodyOptions::new().with_static(true),
        )
        .unwrap();
    let ball = system
        .create_circle(Vector::new(2.0, 2.0), 1.5, BodyOptions::new())
        .unwrap();
    assert!(!system.get_body(ell).unwrap().is_convex());

    let response = system.check_collision(ball, ell).unwrap().unwrap();
    assert!(response.a_in_b);
    assert!(!response.b_in_a);
    assert_relative_eq!(response.overlap, 3.5, epsilon = 1e-4);

    system.separate().unwrap();

    let moved = system.get_body(ball).unwrap().get_position();
    assert_relative_eq!(moved, Vector::new(2.0, 2.0) - response.overlap_v, epsilon = 1e-5);
    let after = system.check_collision(ball, ell).unwrap();
    assert!(after.map_or(true, |r| r.overlap < 1e-3 && !r.a_in_b));
}

#[test]
fn test_padding_skips_small_moves() {
    init();
    let mut system = System::with_config(SystemConfig {
        padding: 2.0,
        ..SystemConfig::default()
    });
    let ball = system
        .create_circle(Vector::new(0.0, 0.0), 1.0, BodyOptions::new())
        .unwrap();
    assert_eq!(system.get_body(ball).unwrap().get_padding(), 2.0);

    // stored box spans -3..3
    let far_corner = Aabb::from_bounds(-2.9, -2.9, -2.8, -2.8);
    assert_eq!(system.search(&far_corner), vec![ball]);

    system.get_body_mut(ball).unwrap().set_position(Vector::new(1.0, 1.0));
    system.update_body(ball).unwrap();
    // still inside the padded box, nothing reinserted
    assert_eq!(system.search(&far_corner), vec![ball]);

    system.get_body_mut(ball).unwrap().set_position(Vector::new(10.0, 10.0));
    system.update_body(ball).unwrap();
    assert!(system.search(&far_corner).is_empty());
    assert_eq!(system.search(&Aabb::from_point(Vector::new(12.5, 12.5))), vec![ball]);
}

#[test]
fn test_explicit_padding_overrides_config() {
    init();
    let mut system = System::with_config(SystemConfig {
        padding: 2.0,
        ..SystemConfig::default()
    });
    let handle = system
        .create_point(Vector::new(0.0, 0.0), BodyOptions::new().with_padding(0.0))
        .unwrap();
    assert_eq!(system.get_body(handle).unwrap().get_padding(), 0.0);
    assert_eq!(system.get_body(handle).unwrap().kind(), BodyKind::Point);
}

#[test]
fn test_brute_force_index_agrees_with_tree() {
    init();
    let mut tree = System::new();
    let mut flat = System::with_config(SystemConfig {
        index: IndexKind::BruteForce,
        ..SystemConfig::default()
    });

    let tree_handles = populate(&mut tree, &mut StdRng::seed_from_u64(5), 50);
    let flat_handles = populate(&mut flat, &mut StdRng::seed_from_u64(5), 50);
    assert_eq!(tree_handles.len(), flat_handles.len());

    for (&a, &b) in tree_handles.iter().zip(&flat_handles) {
        assert_eq!(a, b);
        assert_eq!(sorted(tree.get_potentials(a).unwrap()), sorted(flat.get_potentials(b).unwrap()));
    }

    let mut tree_count = 0;
    tree.check_all(|_| tree_count += 1).unwrap();
    let mut flat_count = 0;
    flat.check_all(|_| flat_count += 1).unwrap();
    assert_eq!(tree_count, flat_count);
}

#[test]
fn test_invalid_geometry_leaves_index_untouched() {
    init();
    let mut system = System::new();
    let handle = system
        .create_box(Vector::new(0.0, 0.0), 1.0, 1.0, BodyOptions::new())
        .unwrap();

    system.get_body_mut(handle).unwrap().set_position(Vector::new(f32::NAN, 0.0));
    let result = system.update_body(handle);
    assert!(matches!(result, Err(CollisionError::InvalidGeometry(_))));
    assert_eq!(system.search(&Aabb::from_bounds(0.0, 0.0, 1.0, 1.0)), vec![handle]);
}

#[test]
fn test_bodies_belong_to_one_system() {
    init();
    let mut first = System::new();
    let mut second = System::new();
    let handle = first.create_circle(Vector::zeros(), 1.0, BodyOptions::new()).unwrap();

    let stamped = first.get_body(handle).unwrap().clone();
    assert_eq!(stamped.system_ref().map(|r| r.system), Some(first.id()));
    assert!(matches!(second.insert(stamped), Err(CollisionError::ForeignBody(id)) if id == first.id()));

    let body = first.remove(handle).unwrap();
    assert!(second.insert(body).is_ok());
    assert!(first.is_empty());
    assert_eq!(second.body_count(), 1);
}

#[test]
fn test_construction_errors() {
    init();
    let mut system = System::new();
    let result = system.create_polygon(
        Vector::zeros(),
        vec![Vector::zeros(), Vector::new(1.0, 0.0)],
        BodyOptions::new(),
    );
    assert!(matches!(result, Err(CollisionError::InvalidParameter(_))));
    assert!(system.create_circle(Vector::zeros(), -1.0, BodyOptions::new()).is_err());
    assert!(system.create_ellipse(Vector::zeros(), 0.0, 1.0, None, BodyOptions::new()).is_err());
    assert!(system.create_line(Vector::zeros(), Vector::zeros(), BodyOptions::new()).is_err());
    assert!(system.is_empty());

    let handle = system.create_point(Vector::zeros(), BodyOptions::new()).unwrap();
    system.remove(handle).unwrap();
    assert!(matches!(system.remove(handle), Err(CollisionError::ResourceNotFound(_))));
    assert!(matches!(system.update_body(handle), Err(CollisionError::ResourceNotFound(_))));
}

#[test]
fn test_inserted_body_is_stamped() {
    init();
    let mut system = System::new();
    let body = Body::new_ellipse(Vector::new(3.0, 3.0), 2.0, 1.0, Some(0.5)).unwrap();
    assert!(body.handle().is_none());

    let handle = system.insert(body).unwrap();
    let body = system.get_body(handle).unwrap();
    assert_eq!(body.handle(), Some(handle));
    assert_eq!(body.kind(), BodyKind::Ellipse);
    assert_eq!(system.search(&body.get_aabb()), vec![handle]);
}
