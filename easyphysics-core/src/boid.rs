#[cfg(test)]
use rand::Rng;

use crate::{Kinematic, KinematicBody, Shape, Vector2D};

/// Distance from the boid to the centre of its wander circle, in radii.
pub const WANDER_CIRCLE_DISTANCE_RATIO: f64 = 3.0;
/// Radius of the wander circle, in radii.
pub const WANDER_CIRCLE_RADIUS_RATIO: f64 = 1.5;

/// A steering-capable body with bounded speed and force.
///
/// Reynolds' boid: <https://www.red3d.com/cwr/boids/>
#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub body: KinematicBody,
    pub max_speed: f64,
    pub max_force: f64,
    pub wander_circle_distance: f64,
    pub wander_circle_radius: f64,
    /// Heading on the wander circle, only changed by [`crate::steering::wander`].
    pub wander_angle: f64,
}

impl Boid {
    /// Boids always have unit mass.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        shape: Shape,
        radius: f64,
        position: Vector2D,
        velocity: Vector2D,
        acceleration: Vector2D,
        max_speed: f64,
        max_force: f64,
        faces_velocity: bool,
    ) -> Self {
        debug_assert!(max_speed > 0.0, "max_speed must be positive, got {max_speed}");
        debug_assert!(max_force > 0.0, "max_force must be positive, got {max_force}");
        Self {
            body: KinematicBody::new(
                shape,
                1.0,
                radius,
                position,
                velocity,
                acceleration,
                faces_velocity,
            ),
            max_speed,
            max_force,
            wander_circle_distance: WANDER_CIRCLE_DISTANCE_RATIO * radius,
            wander_circle_radius: WANDER_CIRCLE_RADIUS_RATIO * radius,
            wander_angle: 0.0,
        }
    }

    #[cfg(test)]
    pub(crate) fn random<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64) -> Self {
        let position = Vector2D::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
        let velocity = Vector2D::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        Self::new(
            Shape::Triangle,
            5.0,
            position,
            velocity,
            Vector2D::zero(),
            2.0,
            0.03,
            true,
        )
    }

    /// Changes the radius and the wander circle that scales with it.
    pub fn resize(&mut self, radius: f64) {
        self.body.radius = radius;
        self.wander_circle_distance = WANDER_CIRCLE_DISTANCE_RATIO * radius;
        self.wander_circle_radius = WANDER_CIRCLE_RADIUS_RATIO * radius;
    }

    pub fn radius(&self) -> f64 {
        self.body.radius
    }
}

impl Kinematic for Boid {
    fn body(&self) -> &KinematicBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }

    /// Same as a plain body, except the speed is clamped to `max_speed` before
    /// the position moves.
    fn integrate(&mut self, dt: f64) {
        let body = &mut self.body;
        body.velocity += body.acceleration * dt;
        body.velocity.limit(self.max_speed);
        body.position += body.velocity * dt;
        body.acceleration = Vector2D::zero();
    }
}
