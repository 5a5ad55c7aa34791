use log::trace;

use crate::bodies::Body;
use crate::collision::narrow_phase;
use crate::core::{BodyHandle, System};
use crate::math::{self, Ray, Vector};
use crate::shapes::Shape;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Closest hit of a raycast
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct RaycastHit {
    /// Point on the collider's boundary nearest to the ray start
    pub point: Vector,

    /// The body that was hit
    pub collider: BodyHandle,
}

impl System {
    /// Casts a segment from `start` to `end` against every body
    pub fn raycast(&self, start: Vector, end: Vector) -> Option<RaycastHit> {
        self.raycast_filtered(start, end, |_, _| true)
    }

    /// Casts a segment from `start` to `end` against the bodies `allow` accepts.
    ///
    /// Returns the boundary point closest to `start`; on equal distances the
    /// body found first by the spatial index wins. The probe segment is only
    /// used as a query and never enters the index.
    pub fn raycast_filtered<F>(&self, start: Vector, end: Vector, mut allow: F) -> Option<RaycastHit>
    where
        F: FnMut(BodyHandle, &Body) -> bool,
    {
        let probe = Body::new_line(start, end).ok()?;
        let ray = Ray::new(start, end);

        let mut closest: Option<(f32, RaycastHit)> = None;
        for collider in self.search(&probe.get_aabb()) {
            let Ok(body) = self.get_body(collider) else {
                continue;
            };
            if !allow(collider, body) || !narrow_phase::overlaps(&probe, body) {
                continue;
            }

            for point in boundary_hits(&ray, body.shape()) {
                let distance = math::distance_squared(&start, &point);
                if closest.map_or(true, |(best, _)| distance < best) {
                    closest = Some((distance, RaycastHit { point, collider }));
                }
            }
        }

        if let Some((_, hit)) = &closest {
            trace!("ray hit {:?} at ({}, {})", hit.collider, hit.point.x, hit.point.y);
        }
        closest.map(|(_, hit)| hit)
    }
}

fn boundary_hits(ray: &Ray, shape: &Shape) -> Vec<Vector> {
    match shape {
        Shape::Circle(circle) => ray.intersect_circle(circle.position(), circle.radius()),
        other => other
            .as_polygon()
            .map(|polygon| ray.intersect_polygon(polygon.position(), polygon.calc_points()))
            .unwrap_or_default(),
    }
}
