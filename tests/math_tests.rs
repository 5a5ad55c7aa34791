use phys_collide::math::{self, Aabb, Ray, Vector};
use std::f32::consts::PI;
use approx::assert_relative_eq;

#[test]
fn test_vector_helpers() {
    let v = math::vector(1.0, 0.0);

    let rotated = math::rotate(&v, PI / 2.0);
    assert_relative_eq!(rotated, Vector::new(0.0, 1.0), epsilon = 1e-6);

    assert_eq!(math::perp(&v), Vector::new(0.0, 1.0));
    assert_relative_eq!(math::distance_squared(&v, &Vector::new(4.0, 4.0)), 25.0);
    assert!(!math::is_finite(&Vector::new(f32::NAN, 0.0)));
}

#[test]
fn test_contour_area_and_centroid() {
    let square = [
        Vector::new(0.0, 0.0),
        Vector::new(2.0, 0.0),
        Vector::new(2.0, 2.0),
        Vector::new(0.0, 2.0),
    ];
    assert_relative_eq!(math::signed_area(&square), 4.0);
    assert_relative_eq!(math::centroid(&square), Vector::new(1.0, 1.0));

    // clockwise winding flips the sign but not the centroid
    let mut clockwise = square;
    clockwise.reverse();
    assert_relative_eq!(math::signed_area(&clockwise), -4.0);
    assert_relative_eq!(math::centroid(&clockwise), Vector::new(1.0, 1.0));

    // degenerate contours fall back to the mean
    let flat = [Vector::new(0.0, 0.0), Vector::new(4.0, 0.0)];
    assert_relative_eq!(math::centroid(&flat), Vector::new(2.0, 0.0));
}

#[test]
fn test_aabb_queries() {
    let a = Aabb::from_bounds(0.0, 0.0, 2.0, 2.0);
    let b = Aabb::from_bounds(2.0, 1.0, 3.0, 3.0);
    let c = Aabb::from_bounds(5.0, 5.0, 6.0, 6.0);

    // touching counts
    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));

    let union = a.union(&c);
    assert_eq!(union.min, Vector::new(0.0, 0.0));
    assert_eq!(union.max, Vector::new(6.0, 6.0));
    assert!(union.contains_aabb(&a));
    assert!(!a.contains_aabb(&union));

    assert_relative_eq!(a.perimeter(), 8.0);
    assert_relative_eq!(a.area(), 4.0);
    assert_eq!(a.center(), Vector::new(1.0, 1.0));
    assert!(a.contains_point(Vector::new(2.0, 2.0)));

    let padded = a.expand(1.0);
    assert_eq!(padded.min, Vector::new(-1.0, -1.0));
    assert_eq!(padded.max, Vector::new(3.0, 3.0));
}

#[test]
fn test_aabb_validity() {
    assert!(Aabb::from_bounds(0.0, 0.0, 0.0, 0.0).is_valid());
    assert!(!Aabb::from_bounds(1.0, 0.0, 0.0, 1.0).is_valid());
    assert!(!Aabb::from_bounds(f32::NAN, 0.0, 1.0, 1.0).is_valid());

    let points = [Vector::new(-1.0, 2.0), Vector::new(3.0, -4.0)];
    let aabb = Aabb::from_points(Vector::new(10.0, 10.0), &points).unwrap();
    assert_eq!(aabb.min, Vector::new(9.0, 6.0));
    assert_eq!(aabb.max, Vector::new(13.0, 12.0));
    assert!(Aabb::from_points(Vector::zeros(), &[]).is_none());
}

#[test]
fn test_ray_circle_intersection() {
    let ray = Ray::new(Vector::new(0.0, 0.0), Vector::new(10.0, 0.0));

    let hits = ray.intersect_circle(Vector::new(5.0, 0.0), 1.0);
    assert_eq!(hits.len(), 2);
    assert_relative_eq!(hits[0], Vector::new(4.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(hits[1], Vector::new(6.0, 0.0), epsilon = 1e-5);

    assert!(ray.intersect_circle(Vector::new(5.0, 3.0), 1.0).is_empty());

    // only the exit lies on a segment starting inside the circle
    let inside = Ray::new(Vector::new(5.0, 0.0), Vector::new(10.0, 0.0));
    let hits = inside.intersect_circle(Vector::new(5.0, 0.0), 1.0);
    assert_eq!(hits.len(), 1);
    assert_relative_eq!(hits[0], Vector::new(6.0, 0.0), epsilon = 1e-5);
}

#[test]
fn test_ray_segment_intersection() {
    let ray = Ray::new(Vector::new(0.0, 0.0), Vector::new(4.0, 4.0));

    let hit = ray.intersect_segment(Vector::new(0.0, 4.0), Vector::new(4.0, 0.0)).unwrap();
    assert_relative_eq!(hit, Vector::new(2.0, 2.0), epsilon = 1e-5);

    // parallel
    assert!(ray.intersect_segment(Vector::new(1.0, 0.0), Vector::new(5.0, 4.0)).is_none());

    // collinear overlap reports the shared point nearest to the start
    let hit = ray.intersect_segment(Vector::new(3.0, 3.0), Vector::new(1.0, 1.0)).unwrap();
    assert_relative_eq!(hit, Vector::new(1.0, 1.0), epsilon = 1e-5);
}

#[test]
fn test_ray_polygon_intersection() {
    let ray = Ray::new(Vector::new(-5.0, 1.0), Vector::new(5.0, 1.0));
    let square = [
        Vector::new(0.0, 0.0),
        Vector::new(2.0, 0.0),
        Vector::new(2.0, 2.0),
        Vector::new(0.0, 2.0),
    ];

    let hits = ray.intersect_polygon(Vector::new(-1.0, 0.0), &square);
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().any(|p| (p - Vector::new(-1.0, 1.0)).norm() < 1e-5));
    assert!(hits.iter().any(|p| (p - Vector::new(1.0, 1.0)).norm() < 1e-5));

    let point = [Vector::zeros()];
    assert_eq!(ray.intersect_polygon(Vector::new(3.0, 1.0), &point).len(), 1);
    assert!(ray.intersect_polygon(Vector::new(3.0, 2.0), &point).is_empty());
}
