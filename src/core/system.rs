use log::{debug, trace};

use crate::bodies::{Body, BodyOptions};
use crate::collision::{narrow_phase, Response, SpatialIndex};
use crate::core::{BodyHandle, BodyStorage, SystemConfig, SystemId, SystemRef};
use crate::error::CollisionError;
use crate::math::{Aabb, Vector};
use crate::Result;

/// The collision system: owns the bodies and the spatial index over them
#[derive(Debug)]
pub struct System {
    /// Process-unique id stamped into resident bodies
    id: SystemId,

    /// All bodies in the system
    bodies: BodyStorage,

    /// Padded body boxes for the broad phase
    index: Box<dyn SpatialIndex>,

    /// Configuration for the system
    config: SystemConfig,
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

impl System {
    /// Creates a new collision system with default settings
    pub fn new() -> Self {
        Self::with_config(SystemConfig::default())
    }

    /// Creates a new collision system with the given configuration
    pub fn with_config(config: SystemConfig) -> Self {
        Self {
            id: SystemId::next(),
            bodies: BodyStorage::new(),
            index: config.index.build(),
            config,
        }
    }

    /// Returns the system's id
    pub fn id(&self) -> SystemId {
        self.id
    }

    /// Returns a reference to the system configuration
    pub fn get_config(&self) -> &SystemConfig {
        &self.config
    }

    /// Number of resident bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Removes every body, clearing their back-references
    pub fn clear(&mut self) {
        for (_, body) in self.bodies.iter_mut() {
            body.set_system_ref(None);
        }
        self.bodies.clear();
        self.index.clear();
        debug!("cleared collision system {:?}", self.id);
    }

    /// Gets a reference to a body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies.get_body(handle)
    }

    /// Gets a mutable reference to a body by its handle.
    ///
    /// Changes reach the spatial index on the next [`System::update_body`] or
    /// [`System::update`].
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies.get_body_mut(handle)
    }

    /// Iterates over all bodies in handle order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies.iter()
    }

    /// All resident handles in ascending order
    pub fn handles(&self) -> Vec<BodyHandle> {
        self.bodies.handles()
    }

    /// Adds a body to the system and returns its handle
    pub fn insert(&mut self, mut body: Body) -> Result<BodyHandle> {
        if let Some(owner) = body.system_ref() {
            return Err(CollisionError::ForeignBody(owner.system));
        }

        body.update_aabb();
        body.validate()?;

        let padded = body.get_padded_aabb();
        let kind = body.kind();
        let system = self.id;
        let handle = self.bodies.add_with(body, |body, handle| {
            body.set_system_ref(Some(SystemRef { system, handle }));
        });
        self.index.insert(handle, padded);

        debug!("inserted {:?} body {:?} into {:?}", kind, handle, self.id);
        Ok(handle)
    }

    /// Removes a body from the system and hands it back, unstamped
    pub fn remove(&mut self, handle: BodyHandle) -> Result<Body> {
        let mut body = self.bodies.remove(handle)?;
        self.index.remove(handle);
        body.set_system_ref(None);

        debug!("removed {:?} body {:?} from {:?}", body.kind(), handle, self.id);
        Ok(body)
    }

    fn create(&mut self, body: Body, options: &BodyOptions) -> Result<BodyHandle> {
        let mut body = body.with_options(options);
        if options.padding.is_none() {
            body.set_padding(self.config.padding);
        }
        self.insert(body)
    }

    /// Creates a point body
    pub fn create_point(&mut self, position: Vector, options: BodyOptions) -> Result<BodyHandle> {
        self.create(Body::new_point(position)?, &options)
    }

    /// Creates a circle body
    pub fn create_circle(&mut self, position: Vector, radius: f32, options: BodyOptions) -> Result<BodyHandle> {
        self.create(Body::new_circle(position, radius)?, &options)
    }

    /// Creates a box body anchored at its unrotated corner
    pub fn create_box(
        &mut self,
        position: Vector,
        width: f32,
        height: f32,
        options: BodyOptions,
    ) -> Result<BodyHandle> {
        self.create(Body::new_box(position, width, height)?, &options)
    }

    /// Creates a polygon body from a contour relative to `position`
    pub fn create_polygon(
        &mut self,
        position: Vector,
        points: Vec<Vector>,
        options: BodyOptions,
    ) -> Result<BodyHandle> {
        self.create(Body::new_polygon(position, points)?, &options)
    }

    /// Creates a line body from `start` to `end`
    pub fn create_line(&mut self, start: Vector, end: Vector, options: BodyOptions) -> Result<BodyHandle> {
        self.create(Body::new_line(start, end)?, &options)
    }

    /// Creates an ellipse body
    pub fn create_ellipse(
        &mut self,
        position: Vector,
        radius_x: f32,
        radius_y: f32,
        step: Option<f32>,
        options: BodyOptions,
    ) -> Result<BodyHandle> {
        self.create(Body::new_ellipse(position, radius_x, radius_y, step)?, &options)
    }

    /// Commits a body's current geometry to the spatial index.
    ///
    /// A padded body whose box is still inside the padded box stored in the
    /// index is left where it is.
    pub fn update_body(&mut self, handle: BodyHandle) -> Result<()> {
        let body = self.bodies.get_body_mut(handle)?;
        body.update_aabb();
        body.validate()?;

        let aabb = body.get_aabb();
        let padding = body.get_padding();
        if padding > 0.0 {
            if let Some(stored) = self.index.get(handle) {
                if stored.contains_aabb(&aabb) {
                    return Ok(());
                }
            }
        }

        self.index.insert(handle, aabb.expand(padding));
        trace!("reinserted body {:?}", handle);
        Ok(())
    }

    /// Commits every non-static body to the spatial index
    pub fn update(&mut self) -> Result<()> {
        for handle in self.bodies.handles() {
            if !self.bodies.get_body(handle)?.is_static() {
                self.update_body(handle)?;
            }
        }
        Ok(())
    }

    /// Handles of every resident body whose indexed box overlaps `aabb`
    pub fn search(&self, aabb: &Aabb) -> Vec<BodyHandle> {
        self.index.search(aabb)
    }

    /// All boxes kept by the spatial index, for debug drawing
    pub fn index_boxes(&self) -> Vec<Aabb> {
        self.index.boxes()
    }

    /// Broad-phase candidates of a body; static bodies have none
    pub fn get_potentials(&self, handle: BodyHandle) -> Result<Vec<BodyHandle>> {
        let body = self.bodies.get_body(handle)?;
        if body.is_static() {
            return Ok(Vec::new());
        }

        let mut potentials = self.index.search(&body.get_aabb());
        potentials.retain(|&other| other != handle);
        Ok(potentials)
    }

    /// Exact overlap test between two bodies, `overlap_v` pushes `a` out of `b`
    pub fn check_collision(&self, a: BodyHandle, b: BodyHandle) -> Result<Option<Response>> {
        let body_a = self.bodies.get_body(a)?;
        let body_b = self.bodies.get_body(b)?;
        Ok(narrow_phase::test_bodies(body_a, body_b).map(|contact| Response::new(a, b, contact)))
    }

    /// Calls `callback` for every body colliding with `handle`, in index order
    pub fn check_one<F>(&self, handle: BodyHandle, mut callback: F) -> Result<()>
    where
        F: FnMut(&Response),
    {
        for other in self.get_potentials(handle)? {
            if let Some(response) = self.check_collision(handle, other)? {
                callback(&response);
            }
        }
        Ok(())
    }

    /// Calls `callback` for every colliding pair seen from each non-static body
    pub fn check_all<F>(&self, mut callback: F) -> Result<()>
    where
        F: FnMut(&Response),
    {
        for handle in self.bodies.handles() {
            self.check_one(handle, &mut callback)?;
        }
        Ok(())
    }

    /// Collects every collision `check_all` reports
    pub fn collisions(&self) -> Result<Vec<Response>> {
        let mut responses = Vec::new();
        self.check_all(|response| responses.push(*response))?;
        Ok(responses)
    }

    /// Single positional correction pass.
    ///
    /// Each colliding non-static, non-trigger body is moved out of its
    /// collider by the penetration vector and committed to the index before
    /// the next check runs. Residual overlap against several colliders is
    /// left for the next call.
    pub fn separate(&mut self) -> Result<()> {
        for handle in self.bodies.handles() {
            let body = self.bodies.get_body(handle)?;
            if body.is_static() || body.is_trigger() {
                continue;
            }

            for other in self.get_potentials(handle)? {
                let Some(response) = self.check_collision(handle, other)? else {
                    continue;
                };

                let body = self.bodies.get_body_mut(handle)?;
                let position = body.get_position() - response.overlap_v;
                body.set_position(position);
                self.update_body(handle)?;
            }
        }
        Ok(())
    }
}
