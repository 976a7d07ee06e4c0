use crate::steering;
use crate::{Boid, Kinematic, KinematicBody, Pose, Renderer, Vector2D};

/// Desired separation between boids, in boid radii.
pub const DESIRED_SEPARATION_TO_RADIUS_RATIO: f64 = 5.0;
/// Neighbourhood radius for alignment and cohesion, in boid radii.
pub const NEIGHBOR_DISTANCE_TO_RADIUS_RATIO: f64 = 10.0;

/// A flock of boids plus the predators and obstacles it avoids.
#[derive(Debug, Clone)]
pub struct Flock {
    /// Iteration order is insertion order.
    pub boids: Vec<Boid>,
    pub desired_separation: f64,
    pub neighbor_radius: f64,
    pub separation_weight: f64,
    pub alignment_weight: f64,
    pub cohesion_weight: f64,
    /// Moving threats, evaded through their predicted position.
    pub predators: Vec<KinematicBody>,
    /// Static points to keep away from.
    pub obstacles: Vec<Vector2D>,
    pub safe_distance: f64,
    pub evasion_weight: f64,
    pub fleeing_weight: f64,
}

impl Default for Flock {
    fn default() -> Self {
        Self::new(25.0, 50.0, 1.5, 1.0, 1.0)
    }
}

impl Flock {
    /// An empty flock; fill it with [`Flock::add_boid`].
    pub fn new(
        desired_separation: f64,
        neighbor_radius: f64,
        separation_weight: f64,
        alignment_weight: f64,
        cohesion_weight: f64,
    ) -> Self {
        Self {
            boids: Vec::new(),
            desired_separation,
            neighbor_radius,
            separation_weight,
            alignment_weight,
            cohesion_weight,
            predators: Vec::new(),
            obstacles: Vec::new(),
            safe_distance: 200.0,
            evasion_weight: 1.0,
            fleeing_weight: 1.0,
        }
    }

    pub fn add_boid(&mut self, boid: Boid) {
        self.boids.push(boid);
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn separation(&self, boid: &Boid) -> Vector2D {
        steering::separation(boid, &self.boids, self.desired_separation)
    }

    pub fn alignment(&self, boid: &Boid) -> Vector2D {
        steering::alignment(boid, &self.boids, self.neighbor_radius)
    }

    pub fn cohesion(&self, boid: &Boid) -> Vector2D {
        steering::cohesion(boid, &self.boids, self.neighbor_radius)
    }

    /// Every force acting on `boid` this tick, in application order:
    /// separation, alignment, cohesion, one per predator, one per obstacle.
    fn steering_forces(&self, boid: &Boid, dt: f64, forces: &mut Vec<Vector2D>) {
        forces.push(self.separation(boid) * self.separation_weight);
        forces.push(self.alignment(boid) * self.alignment_weight);
        forces.push(self.cohesion(boid) * self.cohesion_weight);
        for predator in &self.predators {
            let evade = steering::evade_if_near(boid, predator, self.safe_distance, dt);
            forces.push(evade * self.evasion_weight);
        }
        for obstacle in &self.obstacles {
            let flee = steering::flee_if_near(boid, *obstacle, self.safe_distance);
            forces.push(flee * self.fleeing_weight);
        }
    }

    fn forces_per_boid(&self) -> usize {
        3 + self.predators.len() + self.obstacles.len()
    }

    /// Advances the whole flock by one tick.
    ///
    /// Boids are processed in order: each one has its forces computed, is
    /// integrated and wrapped into `[min_x, max_x] x [min_y, max_y]` before the
    /// next one is looked at, so later boids already see the moved positions
    /// of earlier ones.
    pub fn run(&mut self, dt: f64, min_x: f64, max_x: f64, min_y: f64, max_y: f64) {
        log::trace!(
            "flock tick: {} boids, {} predators, {} obstacles, dt={}",
            self.boids.len(),
            self.predators.len(),
            self.obstacles.len(),
            dt
        );

        let mut forces = Vec::with_capacity(self.forces_per_boid());
        for i in 0..self.boids.len() {
            forces.clear();
            self.steering_forces(&self.boids[i], dt, &mut forces);

            let boid = &mut self.boids[i];
            for force in &forces {
                boid.apply_force(*force);
            }
            boid.integrate(dt);
            boid.wrap_edges(min_x, max_x, min_y, max_y);
        }
    }

    /// Variant of [`Flock::run`] where every boid's forces are computed from
    /// the state at the start of the tick before any boid moves. The result
    /// does not depend on boid order.
    pub fn run_synchronous(&mut self, dt: f64, min_x: f64, max_x: f64, min_y: f64, max_y: f64) {
        let stride = self.forces_per_boid();
        let mut forces = Vec::with_capacity(stride * self.boids.len());
        for boid in &self.boids {
            self.steering_forces(boid, dt, &mut forces);
        }

        for (boid, boid_forces) in self.boids.iter_mut().zip(forces.chunks(stride)) {
            for force in boid_forces {
                boid.apply_force(*force);
            }
            boid.integrate(dt);
            boid.wrap_edges(min_x, max_x, min_y, max_y);
        }
    }

    /// Resizes every boid and rescales the neighbourhood distances with it.
    pub fn boid_size_change(&mut self, size: f64) {
        for boid in &mut self.boids {
            boid.resize(size);
        }
        self.desired_separation = size * DESIRED_SEPARATION_TO_RADIUS_RATIO;
        self.neighbor_radius = size * NEIGHBOR_DISTANCE_TO_RADIUS_RATIO;
        log::debug!(
            "boid size set to {}: separation {}, neighbourhood {}",
            size,
            self.desired_separation,
            self.neighbor_radius
        );
    }

    pub fn poses(&self) -> impl Iterator<Item = Pose<'_>> + '_ {
        self.boids.iter().map(Kinematic::pose)
    }

    /// Hands every boid to `renderer`, stopping at the first error.
    pub fn render<R: Renderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        for pose in self.poses() {
            renderer.draw(&pose)?;
        }
        Ok(())
    }
}
