use crate::bodies::Body;
use crate::collision::sat::{self, Contact};
use crate::math::{self, Ray, Vector, EPSILON};
use crate::shapes::{Convex, Polygon, Shape};

/// Extra push used when checking that a candidate translation frees `a`
const CLEARANCE: f32 = 1.0e-3;

/// Exact overlap test between two bodies.
///
/// Two convex bodies go straight to the separating axis test. When either
/// body is concave its convex pieces decide whether the bodies touch, while
/// the push-out direction is picked from the edges of the real outlines and
/// must free `a` from every piece of `b` at once. Containment is judged
/// against the whole body.
pub fn test_bodies(a: &Body, b: &Body) -> Option<Contact> {
    let parts_a = a.shape().convex_parts();
    let parts_b = b.shape().convex_parts();

    if let ([part_a], [part_b]) = (parts_a.as_slice(), parts_b.as_slice()) {
        return sat::test(part_a, part_b);
    }

    let touching: Vec<(Convex, Convex)> = parts_a
        .iter()
        .flat_map(|part_a| parts_b.iter().map(move |part_b| (*part_a, *part_b)))
        .filter(|(part_a, part_b)| sat::test(part_a, part_b).is_some())
        .collect();
    if touching.is_empty() {
        return None;
    }

    let mut axes = outline_axes(a.shape());
    axes.extend(outline_axes(b.shape()));
    axes.extend(vertex_axis(a.shape(), b.shape()));
    axes.extend(vertex_axis(b.shape(), a.shape()));

    let mut pushes: Vec<(f32, Vector)> = axes
        .iter()
        .flat_map(|axis| [*axis, -*axis])
        .map(|normal| (push_depth(&touching, &normal), normal))
        .collect();
    pushes.sort_by(|p, q| p.0.total_cmp(&q.0));

    let (overlap, overlap_n) = pushes
        .iter()
        .find(|(depth, normal)| frees(&parts_a, &parts_b, *normal * (depth + CLEARANCE)))
        .or_else(|| pushes.first())
        .copied()?;

    Some(Contact {
        overlap,
        overlap_n,
        overlap_v: overlap_n * overlap,
        a_in_b: contains(b.shape(), &parts_b, &parts_a),
        b_in_a: contains(a.shape(), &parts_a, &parts_b),
    })
}

/// Whether two bodies overlap, without keeping penetration data
pub fn overlaps(a: &Body, b: &Body) -> bool {
    let parts_b = b.shape().convex_parts();
    a.shape()
        .convex_parts()
        .iter()
        .any(|part_a| parts_b.iter().any(|part_b| sat::test(part_a, part_b).is_some()))
}

/// World-space outline of every kind except circles
fn outline(shape: &Shape) -> Option<Vec<Vector>> {
    shape.as_polygon().map(Polygon::world_points)
}

/// Edge normals of the outline; a segment also contributes its direction
fn outline_axes(shape: &Shape) -> Vec<Vector> {
    let Some(points) = outline(shape) else {
        return Vec::new();
    };

    match points.len() {
        0 | 1 => Vec::new(),
        2 => {
            let edge = points[1] - points[0];
            if edge.norm() <= EPSILON {
                return Vec::new();
            }
            let dir = edge.normalize();
            vec![Vector::new(dir.y, -dir.x), dir]
        }
        len => (0..len)
            .filter_map(|i| {
                let edge = points[(i + 1) % len] - points[i];
                let norm = edge.norm();
                (norm > EPSILON).then(|| Vector::new(edge.y, -edge.x) / norm)
            })
            .collect(),
    }
}

/// Axis from the outline vertex of `polygon` closest to the center of `circle`
fn vertex_axis(polygon: &Shape, circle: &Shape) -> Option<Vector> {
    let center = circle.as_circle()?.position();
    let closest = outline(polygon)?.into_iter().min_by(|p, q| {
        math::distance_squared(p, &center).total_cmp(&math::distance_squared(q, &center))
    })?;
    Some(sat::unit_or_x(center - closest))
}

/// Distance `a` has to move against `normal` to leave every touching pair
fn push_depth(touching: &[(Convex, Convex)], normal: &Vector) -> f32 {
    touching
        .iter()
        .map(|(part_a, part_b)| {
            let (_, a_max) = part_a.project(normal);
            let (b_min, _) = part_b.project(normal);
            a_max - b_min
        })
        .fold(0.0, f32::max)
}

fn shifted<'a>(part: &Convex<'a>, by: Vector) -> Convex<'a> {
    match *part {
        Convex::Circle { center, radius } => Convex::Circle {
            center: center - by,
            radius,
        },
        Convex::Polygon { position, points } => Convex::Polygon {
            position: position - by,
            points,
        },
    }
}

/// Whether moving `a` by `-by` leaves it clear of every piece of `b`
fn frees(parts_a: &[Convex], parts_b: &[Convex], by: Vector) -> bool {
    parts_a.iter().all(|part_a| {
        let moved = shifted(part_a, by);
        parts_b.iter().all(|part_b| sat::test(&moved, part_b).is_none())
    })
}

/// Whether every piece of `inner` lies inside the body made of `outer_parts`
fn contains(outer: &Shape, outer_parts: &[Convex], inner_parts: &[Convex]) -> bool {
    if let [outer_part] = outer_parts {
        return inner_parts
            .iter()
            .all(|part| sat::test(part, outer_part).map_or(false, |contact| contact.a_in_b));
    }

    let Some(contour) = outline(outer) else {
        return false;
    };
    inner_parts.iter().all(|part| match *part {
        Convex::Circle { center, radius } => {
            inside_contour(center, &contour)
                && edges(&contour).all(|edge| {
                    (edge.closest_point(center) - center).norm() + EPSILON >= radius
                })
        }
        Convex::Polygon { position, points } => {
            let world: Vec<Vector> = points.iter().map(|p| position + p).collect();
            let inner_edges: Vec<Ray> = match world.len() {
                0 | 1 => Vec::new(),
                2 => vec![Ray::new(world[0], world[1])],
                _ => edges(&world).collect(),
            };

            world.iter().all(|p| inside_contour(*p, &contour))
                && inner_edges.iter().all(|edge| {
                    inside_contour(edge.point_at(0.5), &contour)
                        && edges(&contour).all(|other| !crosses(edge, &other))
                })
        }
    })
}

fn edges(contour: &[Vector]) -> impl Iterator<Item = Ray> + '_ {
    let len = contour.len();
    (0..len).map(move |i| Ray::new(contour[i], contour[(i + 1) % len]))
}

/// Even-odd test, points on the boundary count as inside
fn inside_contour(point: Vector, contour: &[Vector]) -> bool {
    if edges(contour).any(|edge| edge.contains_point(point)) {
        return true;
    }

    let mut inside = false;
    for edge in edges(contour) {
        let (p, q) = (edge.start, edge.end);
        if (p.y > point.y) != (q.y > point.y) {
            let x = p.x + (point.y - p.y) / (q.y - p.y) * (q.x - p.x);
            if point.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Whether two segments cross at a single point interior to both
fn crosses(a: &Ray, b: &Ray) -> bool {
    let side = |ray: &Ray, point: Vector| ray.direction().perp(&(point - ray.start));
    let opposite = |s: f32, t: f32| (s > EPSILON && t < -EPSILON) || (s < -EPSILON && t > EPSILON);

    opposite(side(b, a.start), side(b, a.end)) && opposite(side(a, b.start), side(a, b.end))
}
