use core::f64::consts::PI;

use crate::{Pose, Shape, Vector2D};

/// Drag coefficient applied to a body moving through liquid.
const WATER_FRICTION: f64 = 0.8;

/// A simulated point mass.
///
/// `acceleration` accumulates everything applied during a tick and is cleared
/// by [`KinematicBody::integrate`]; position and velocity persist.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    pub shape: Shape,
    /// Must be strictly positive; forces are divided by it.
    pub mass: f64,
    pub radius: f64,
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub acceleration: Vector2D,
    pub faces_velocity: bool,
}

impl KinematicBody {
    pub fn new(
        shape: Shape,
        mass: f64,
        radius: f64,
        position: Vector2D,
        velocity: Vector2D,
        acceleration: Vector2D,
        faces_velocity: bool,
    ) -> Self {
        debug_assert!(mass > 0.0, "body mass must be positive, got {mass}");
        Self {
            shape,
            mass,
            radius,
            position,
            velocity,
            acceleration,
            faces_velocity,
        }
    }

    /// Explicit Euler step. Call once per tick, after every force of the tick
    /// has been applied.
    pub fn integrate(&mut self, dt: f64) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
        self.acceleration = Vector2D::zero();
    }

    /// Adds an acceleration regardless of mass (gravity and similar fields).
    pub fn apply_acceleration(&mut self, acceleration: Vector2D) {
        self.acceleration += acceleration;
    }

    pub fn apply_force(&mut self, force: Vector2D) {
        self.acceleration += force / self.mass;
    }

    /// Buoyancy and drag for a spherical body in a liquid whose surface sits at
    /// `sea_level` (y grows downwards).
    pub fn apply_flotation_forces(&mut self, gravity: f64, liquid_density: f64, sea_level: f64) {
        let r = self.radius;
        let y = self.position.y;
        if y + r < sea_level {
            return;
        }

        let submerged_volume = if y - r >= sea_level {
            4.0 * PI * r * r * r / 3.0
        } else {
            // spherical cap of height h
            let h = y + r - sea_level;
            let a = (2.0 * h * r - h * h).sqrt();
            (3.0 * a * a + h * h) * PI * h / 6.0
        };

        let buoyancy = liquid_density * gravity * submerged_volume;
        self.apply_force(Vector2D::new(0.0, -buoyancy));
        self.apply_force(self.velocity * -WATER_FRICTION);
    }

    pub fn pose(&self) -> Pose<'_> {
        Pose {
            shape: &self.shape,
            position: self.position,
            radius: self.radius,
            facing: self.faces_velocity.then(|| self.velocity.angle()),
        }
    }
}

/// Anything that carries kinematic state and can be stepped forward in time.
pub trait Kinematic {
    fn body(&self) -> &KinematicBody;

    fn body_mut(&mut self) -> &mut KinematicBody;

    fn integrate(&mut self, dt: f64) {
        self.body_mut().integrate(dt);
    }

    fn position(&self) -> Vector2D {
        self.body().position
    }

    fn velocity(&self) -> Vector2D {
        self.body().velocity
    }

    /// Where the body will be after `dt` if it keeps its current velocity.
    fn predicted_position(&self, dt: f64) -> Vector2D {
        self.body().position + self.body().velocity * dt
    }

    fn apply_force(&mut self, force: Vector2D) {
        self.body_mut().apply_force(force);
    }

    fn apply_acceleration(&mut self, acceleration: Vector2D) {
        self.body_mut().apply_acceleration(acceleration);
    }

    fn pose(&self) -> Pose<'_> {
        self.body().pose()
    }

    /// Toroidal wrap: a body leaving through one edge comes back through the
    /// opposite one, offset by its radius.
    fn wrap_edges(&mut self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) {
        let body = self.body_mut();
        let r = body.radius;
        if body.position.x - r < min_x {
            body.position.x = max_x + r;
        }
        if body.position.y - r < min_y {
            body.position.y = max_y + r;
        }
        if body.position.x > max_x + r {
            body.position.x = min_x + r;
        }
        if body.position.y > max_y + r {
            body.position.y = min_y + r;
        }
    }
}

impl Kinematic for KinematicBody {
    fn body(&self) -> &KinematicBody {
        self
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ball(mass: f64, position: Vector2D, velocity: Vector2D) -> KinematicBody {
        KinematicBody::new(
            Shape::Circle,
            mass,
            1.0,
            position,
            velocity,
            Vector2D::zero(),
            false,
        )
    }

    #[test]
    fn test_integrate_moves_and_resets_acceleration() {
        let mut body = ball(1.0, Vector2D::zero(), Vector2D::new(1.0, 0.0));
        body.apply_acceleration(Vector2D::new(0.0, 2.0));
        body.integrate(0.5);

        assert_eq!(body.velocity, Vector2D::new(1.0, 1.0));
        assert_eq!(body.position, Vector2D::new(0.5, 0.5));
        assert_eq!(body.acceleration, Vector2D::zero());

        // no forces: constant velocity
        body.integrate(1.0);
        assert_eq!(body.position, Vector2D::new(1.5, 1.5));
    }

    #[test]
    fn test_apply_force_divides_by_mass() {
        let mut body = ball(4.0, Vector2D::zero(), Vector2D::zero());
        body.apply_force(Vector2D::new(8.0, -2.0));
        assert_eq!(body.acceleration, Vector2D::new(2.0, -0.5));

        body.apply_acceleration(Vector2D::new(1.0, 1.0));
        assert_eq!(body.acceleration, Vector2D::new(3.0, 0.5));
    }

    #[test]
    fn test_forces_accumulate_until_integration() {
        let mut body = ball(2.0, Vector2D::zero(), Vector2D::zero());
        body.apply_force(Vector2D::new(2.0, 0.0));
        body.apply_force(Vector2D::new(2.0, 0.0));
        body.integrate(1.0);
        assert_eq!(body.velocity, Vector2D::new(2.0, 0.0));

        body.integrate(1.0);
        assert_eq!(body.velocity, Vector2D::new(2.0, 0.0));
    }

    #[test]
    fn test_pose_facing_follows_velocity_only_when_oriented() {
        let mut body = ball(1.0, Vector2D::new(3.0, 4.0), Vector2D::new(0.0, 2.0));
        assert_eq!(body.pose().facing, None);

        body.faces_velocity = true;
        let pose = body.pose();
        assert_eq!(pose.position, Vector2D::new(3.0, 4.0));
        assert_relative_eq!(pose.facing.unwrap_or_default(), core::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_wrap_edges_reenters_from_opposite_side() {
        let mut body = ball(1.0, Vector2D::new(-100.5, 0.0), Vector2D::zero());
        body.wrap_edges(-100.0, 100.0, -50.0, 50.0);
        assert_eq!(body.position, Vector2D::new(101.0, 0.0));

        body.position = Vector2D::new(0.0, 52.0);
        body.wrap_edges(-100.0, 100.0, -50.0, 50.0);
        assert_eq!(body.position, Vector2D::new(0.0, -49.0));

        // inside the margin: untouched
        body.position = Vector2D::new(100.5, -48.5);
        body.wrap_edges(-100.0, 100.0, -50.0, 50.0);
        assert_eq!(body.position, Vector2D::new(100.5, -48.5));
    }

    #[test]
    fn test_flotation_does_nothing_above_surface() {
        let mut body = ball(1.0, Vector2D::new(0.0, -10.0), Vector2D::new(0.0, 3.0));
        body.apply_flotation_forces(9.8, 1.0, 0.0);
        assert_eq!(body.acceleration, Vector2D::zero());
    }

    #[test]
    fn test_flotation_fully_submerged_uses_sphere_volume() {
        let mut body = ball(2.0, Vector2D::new(0.0, 10.0), Vector2D::zero());
        body.apply_flotation_forces(1.0, 1.0, 0.0);
        let volume = 4.0 * PI / 3.0;
        assert_relative_eq!(body.acceleration.y, -volume / 2.0, epsilon = 1e-12);
        assert_eq!(body.acceleration.x, 0.0);
    }

    #[test]
    fn test_flotation_half_submerged_uses_cap_volume() {
        // centre on the surface: exactly half the sphere is under water
        let mut body = ball(1.0, Vector2D::zero(), Vector2D::zero());
        body.apply_flotation_forces(1.0, 1.0, 0.0);
        let half_volume = 2.0 * PI / 3.0;
        assert_relative_eq!(body.acceleration.y, -half_volume, epsilon = 1e-12);
    }

    #[test]
    fn test_flotation_drag_opposes_velocity() {
        let mut body = ball(1.0, Vector2D::new(0.0, 10.0), Vector2D::new(5.0, 0.0));
        body.apply_flotation_forces(0.0, 1.0, 0.0);
        assert_relative_eq!(body.acceleration.x, -4.0, epsilon = 1e-12);
    }
}
