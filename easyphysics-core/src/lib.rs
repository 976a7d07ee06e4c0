//! Steering and flocking kinematics.
//!
//! [`Vector2D`] algebra, force-accumulating [`KinematicBody`] integration, the
//! [`steering`] behaviors of Reynolds' boids and a [`Flock`] driver. Drawing is
//! left to a [`Renderer`].

mod body;
mod boid;
mod flock;
mod render;
pub mod steering;
mod vector;

pub use body::{Kinematic, KinematicBody};
pub use boid::{Boid, WANDER_CIRCLE_DISTANCE_RATIO, WANDER_CIRCLE_RADIUS_RATIO};
pub use flock::{Flock, DESIRED_SEPARATION_TO_RADIUS_RATIO, NEIGHBOR_DISTANCE_TO_RADIUS_RATIO};
pub use render::{Pose, PoseRecorder, RecordedPose, Renderer, Shape};
pub use vector::Vector2D;
