//! Steering behaviors.
//!
//! Every function returns a steering force without applying it, so callers can
//! weight several behaviors and apply them together before integrating. Each
//! force is already clamped to the boid's `max_force`.

use rand::Rng;

use crate::{Boid, Kinematic, Vector2D};

/// Largest change of the wander heading per call, in radians.
pub const WANDER_JITTER: f64 = 0.3;

/// Reynolds' `steering = desired - velocity`, where the desired velocity points
/// along `direction` at full speed. A zero direction means "stop".
fn steer_towards(boid: &Boid, direction: Vector2D) -> Vector2D {
    let desired = if direction.is_zero() {
        Vector2D::zero()
    } else {
        direction.normalized() * boid.max_speed
    };
    (desired - boid.body.velocity).limited(boid.max_force)
}

pub fn seek(boid: &Boid, target: Vector2D) -> Vector2D {
    steer_towards(boid, target - boid.body.position)
}

pub fn flee(boid: &Boid, target: Vector2D) -> Vector2D {
    -seek(boid, target)
}

/// [`seek`] when `target` is within `radius` (inclusive), zero otherwise.
pub fn seek_if_near(boid: &Boid, target: Vector2D, radius: f64) -> Vector2D {
    if Vector2D::distance(&boid.body.position, &target) <= radius {
        seek(boid, target)
    } else {
        Vector2D::zero()
    }
}

/// [`flee`] when `target` is within `radius` (inclusive), zero otherwise.
pub fn flee_if_near(boid: &Boid, target: Vector2D, radius: f64) -> Vector2D {
    if Vector2D::distance(&boid.body.position, &target) <= radius {
        flee(boid, target)
    } else {
        Vector2D::zero()
    }
}

/// Seeks where `target` will be after `dt` at its current velocity.
pub fn pursue<T: Kinematic + ?Sized>(boid: &Boid, target: &T, dt: f64) -> Vector2D {
    seek(boid, target.predicted_position(dt))
}

/// [`pursue`], gated on the distance to the target's current position.
pub fn pursue_if_near<T: Kinematic + ?Sized>(
    boid: &Boid,
    target: &T,
    radius: f64,
    dt: f64,
) -> Vector2D {
    if Vector2D::distance(&boid.body.position, &target.position()) <= radius {
        pursue(boid, target, dt)
    } else {
        Vector2D::zero()
    }
}

/// Flees from where `target` will be after `dt` at its current velocity.
pub fn evade<T: Kinematic + ?Sized>(boid: &Boid, target: &T, dt: f64) -> Vector2D {
    flee(boid, target.predicted_position(dt))
}

/// [`evade`], gated on the distance to the target's *predicted* position.
///
/// Unlike [`pursue_if_near`], a target that is close now but moving away fast
/// enough is ignored.
pub fn evade_if_near<T: Kinematic + ?Sized>(
    boid: &Boid,
    target: &T,
    radius: f64,
    dt: f64,
) -> Vector2D {
    let predicted = target.predicted_position(dt);
    if Vector2D::distance(&boid.body.position, &predicted) <= radius {
        flee(boid, predicted)
    } else {
        Vector2D::zero()
    }
}

/// Random walk on the heading angle.
///
/// Nudges `wander_angle` by up to [`WANDER_JITTER`], then steers towards a point
/// on a circle projected ahead of the boid. A boid at rest projects the circle
/// along +X.
pub fn wander<R: Rng + ?Sized>(boid: &mut Boid, rng: &mut R) -> Vector2D {
    let heading = if boid.body.velocity.is_zero() {
        Vector2D::new(1.0, 0.0)
    } else {
        boid.body.velocity.normalized()
    };
    let circle_center = heading * boid.wander_circle_distance;

    boid.wander_angle += rng.gen_range(-WANDER_JITTER..=WANDER_JITTER);
    let displacement = Vector2D::from_angle(boid.wander_angle, boid.wander_circle_radius);

    steer_towards(boid, circle_center + displacement)
}

/// Repulsion from every peer closer than `desired_separation`, weighted by
/// `1 / distance`. Zero when nobody is too close.
pub fn separation<'a, I>(boid: &Boid, peers: I, desired_separation: f64) -> Vector2D
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut steer = Vector2D::zero();
    let mut count = 0;

    for other in peers {
        let d = Vector2D::distance(&boid.body.position, &other.body.position);
        if d > 0.0 && d < desired_separation {
            let mut diff = boid.body.position - other.body.position;
            diff.normalize();
            diff /= d;
            steer += diff;
            count += 1;
        }
    }

    if count > 0 {
        steer /= count as f64;
    }

    if steer.magnitude() > 0.0 {
        steer = steer_towards(boid, steer);
    }

    steer
}

/// Steers towards the average velocity of the peers within `neighbor_radius`.
pub fn alignment<'a, I>(boid: &Boid, peers: I, neighbor_radius: f64) -> Vector2D
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in peers {
        let d = Vector2D::distance(&boid.body.position, &other.body.position);
        if d > 0.0 && d < neighbor_radius {
            sum += other.body.velocity;
            count += 1;
        }
    }

    if count > 0 {
        sum /= count as f64;
        steer_towards(boid, sum)
    } else {
        Vector2D::zero()
    }
}

/// Seeks the centre of mass of the peers within `neighbor_radius`.
pub fn cohesion<'a, I>(boid: &Boid, peers: I, neighbor_radius: f64) -> Vector2D
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in peers {
        let d = Vector2D::distance(&boid.body.position, &other.body.position);
        if d > 0.0 && d < neighbor_radius {
            sum += other.body.position;
            count += 1;
        }
    }

    if count > 0 {
        sum /= count as f64;
        seek(boid, sum)
    } else {
        Vector2D::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KinematicBody, Shape};
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn boid(position: Vector2D, velocity: Vector2D) -> Boid {
        Boid::new(
            Shape::Triangle,
            5.0,
            position,
            velocity,
            Vector2D::zero(),
            2.0,
            0.1,
            true,
        )
    }

    fn mover(position: Vector2D, velocity: Vector2D) -> KinematicBody {
        KinematicBody::new(
            Shape::Circle,
            1.0,
            5.0,
            position,
            velocity,
            Vector2D::zero(),
            false,
        )
    }

    #[test]
    fn test_seek_points_towards_target() {
        let b = boid(Vector2D::zero(), Vector2D::zero());
        let force = seek(&b, Vector2D::new(10.0, 0.0));
        assert_relative_eq!(force.x, 0.1);
        assert_eq!(force.y, 0.0);
    }

    #[test]
    fn test_seek_is_desired_minus_velocity_when_small() {
        let b = Boid::new(
            Shape::Circle,
            1.0,
            Vector2D::zero(),
            Vector2D::new(1.5, 0.0),
            Vector2D::zero(),
            2.0,
            10.0,
            false,
        );
        let force = seek(&b, Vector2D::new(0.0, 100.0));
        assert_relative_eq!(force.x, -1.5);
        assert_relative_eq!(force.y, 2.0);
    }

    #[test]
    fn test_seek_at_target_opposes_velocity() {
        let b = boid(Vector2D::new(3.0, 3.0), Vector2D::new(1.0, -1.0));
        let force = seek(&b, Vector2D::new(3.0, 3.0));

        assert!(force.magnitude() <= b.max_force + 1e-12);
        assert_relative_eq!(force.angle(), (-b.body.velocity).angle(), epsilon = 1e-12);
    }

    #[test]
    fn test_flee_is_opposite_of_seek() {
        let b = boid(Vector2D::new(1.0, 2.0), Vector2D::new(0.5, 0.0));
        let target = Vector2D::new(-7.0, 4.0);
        assert_eq!(flee(&b, target), -seek(&b, target));
    }

    #[test]
    fn test_seek_if_near_boundary_is_inclusive() {
        let b = boid(Vector2D::zero(), Vector2D::zero());
        let target = Vector2D::new(30.0, 40.0);

        assert_eq!(seek_if_near(&b, target, 50.0), seek(&b, target));
        assert_eq!(seek_if_near(&b, target, 49.9), Vector2D::zero());
        assert_eq!(flee_if_near(&b, target, 50.0), flee(&b, target));
        assert_eq!(flee_if_near(&b, target, 49.9), Vector2D::zero());
    }

    #[test]
    fn test_pursue_seeks_predicted_position() {
        let b = boid(Vector2D::zero(), Vector2D::zero());
        let target = mover(Vector2D::new(10.0, 0.0), Vector2D::new(0.0, 10.0));

        let force = pursue(&b, &target, 1.0);
        assert_eq!(force, seek(&b, Vector2D::new(10.0, 10.0)));
        assert_relative_eq!(force.angle(), core::f64::consts::FRAC_PI_4, epsilon = 1e-12);
    }

    #[test]
    fn test_evade_flees_predicted_position() {
        let b = boid(Vector2D::zero(), Vector2D::zero());
        let target = mover(Vector2D::new(10.0, 0.0), Vector2D::new(0.0, 10.0));

        assert_eq!(evade(&b, &target, 2.0), flee(&b, Vector2D::new(10.0, 20.0)));
    }

    #[test]
    fn test_pursue_if_near_gates_on_current_distance() {
        let b = boid(Vector2D::zero(), Vector2D::zero());
        // close now, far after one step
        let target = mover(Vector2D::new(10.0, 0.0), Vector2D::new(100.0, 0.0));

        assert_eq!(pursue_if_near(&b, &target, 20.0, 1.0), pursue(&b, &target, 1.0));

        // far now, close after one step
        let target = mover(Vector2D::new(100.0, 0.0), Vector2D::new(-95.0, 0.0));
        assert_eq!(pursue_if_near(&b, &target, 20.0, 1.0), Vector2D::zero());
    }

    #[test]
    fn test_evade_if_near_gates_on_predicted_distance() {
        let b = boid(Vector2D::zero(), Vector2D::zero());
        // close now, far after one step: ignored
        let target = mover(Vector2D::new(10.0, 0.0), Vector2D::new(100.0, 0.0));
        assert_eq!(evade_if_near(&b, &target, 20.0, 1.0), Vector2D::zero());

        // far now, close after one step: evaded
        let target = mover(Vector2D::new(100.0, 0.0), Vector2D::new(-95.0, 0.0));
        let force = evade_if_near(&b, &target, 20.0, 1.0);
        assert_eq!(force, evade(&b, &target, 1.0));
        assert!(force.x < 0.0);
    }

    #[test]
    fn test_wander_heading_varies_smoothly_from_rest() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut b = boid(Vector2D::zero(), Vector2D::zero());

        let mut previous = b.wander_angle;
        for _ in 0..500 {
            let force = wander(&mut b, &mut rng);
            assert!(force.magnitude() <= b.max_force + 1e-12);
            assert!(force.x.is_finite() && force.y.is_finite());
            assert!((b.wander_angle - previous).abs() <= WANDER_JITTER + 1e-9);
            previous = b.wander_angle;
        }
        assert!(b.wander_angle.abs() <= 500.0 * WANDER_JITTER);
    }

    #[test]
    fn test_wander_from_rest_heads_along_x() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut b = Boid::new(
            Shape::Circle,
            2.0,
            Vector2D::zero(),
            Vector2D::zero(),
            Vector2D::zero(),
            2.0,
            10.0,
            false,
        );
        let force = wander(&mut b, &mut rng);
        // circle centre at (6, 0), radius 3: the target is always ahead
        assert!(force.x > 0.0);
        assert_relative_eq!(force.magnitude(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_separation_points_away_from_single_peer() {
        let b = boid(Vector2D::new(0.0, 0.0), Vector2D::zero());
        let peer = boid(Vector2D::new(3.0, 4.0), Vector2D::zero());

        let force = separation(&b, [&b, &peer], 10.0);
        let away = b.body.position - peer.body.position;

        assert_relative_eq!(force.angle(), away.angle(), epsilon = 1e-12);
        assert!(force.magnitude() <= b.max_force + 1e-12);
    }

    #[test]
    fn test_separation_ignores_far_peers_and_self() {
        let b = boid(Vector2D::zero(), Vector2D::new(1.0, 0.0));
        let far = boid(Vector2D::new(10.0, 0.0), Vector2D::zero());

        assert_eq!(separation(&b, [&b, &far], 10.0), Vector2D::zero());
    }

    #[test]
    fn test_separation_closer_peers_push_harder() {
        let b = Boid::new(
            Shape::Circle,
            1.0,
            Vector2D::zero(),
            Vector2D::zero(),
            Vector2D::zero(),
            2.0,
            10.0,
            false,
        );
        let near = boid(Vector2D::new(1.0, 0.0), Vector2D::zero());
        let farther = boid(Vector2D::new(0.0, 4.0), Vector2D::zero());

        let force = separation(&b, [&near, &farther], 10.0);
        // (-1/1, 0) and (0, -1/4) averaged, then scaled to full speed
        assert!(force.x < 0.0 && force.y < 0.0);
        assert!(force.x.abs() > force.y.abs());
        assert_relative_eq!(force.magnitude(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_alignment_and_cohesion_without_neighbors_are_zero() {
        let b = boid(Vector2D::zero(), Vector2D::new(1.0, 1.0));
        let far = boid(Vector2D::new(100.0, 0.0), Vector2D::new(-1.0, 0.0));

        assert_eq!(alignment(&b, [&b, &far], 50.0), Vector2D::zero());
        assert_eq!(cohesion(&b, [&b, &far], 50.0), Vector2D::zero());
        assert_eq!(alignment(&b, core::iter::empty(), 50.0), Vector2D::zero());
        assert_eq!(cohesion(&b, core::iter::empty(), 50.0), Vector2D::zero());
    }

    #[test]
    fn test_alignment_matches_average_heading() {
        let b = boid(Vector2D::zero(), Vector2D::zero());
        let a = boid(Vector2D::new(5.0, 0.0), Vector2D::new(0.0, 1.0));
        let c = boid(Vector2D::new(-5.0, 0.0), Vector2D::new(0.0, 3.0));

        let force = alignment(&b, [&a, &b, &c], 50.0);
        assert_eq!(force.x, 0.0);
        assert_relative_eq!(force.y, b.max_force);
    }

    #[test]
    fn test_cohesion_seeks_centroid() {
        let b = boid(Vector2D::zero(), Vector2D::zero());
        let a = boid(Vector2D::new(10.0, 10.0), Vector2D::zero());
        let c = boid(Vector2D::new(10.0, -4.0), Vector2D::zero());

        let force = cohesion(&b, [&a, &b, &c], 50.0);
        assert_eq!(force, seek(&b, Vector2D::new(10.0, 3.0)));
    }
}
