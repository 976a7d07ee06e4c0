use core::f64::consts::TAU;

use easyphysics_core::{
    Boid, Flock, Pose, Renderer, Vector2D, DESIRED_SEPARATION_TO_RADIUS_RATIO,
    NEIGHBOR_DISTANCE_TO_RADIUS_RATIO,
};
use rand::Rng;

use crate::{Bounds, FlockingSettings, SettingsError};

/// Reynolds' flocking in a world centred on the origin.
#[derive(Debug, Clone)]
pub struct FlockingScene {
    pub settings: FlockingSettings,
    pub flock: Flock,
    bounds: Bounds,
}

impl FlockingScene {
    /// Builds `settings.quantity` boids at the origin, each heading in a random
    /// direction at unit speed. `aspect` is the viewport's height / width and
    /// must be finite and positive.
    pub fn new<R: Rng + ?Sized>(
        settings: FlockingSettings,
        aspect: f64,
        rng: &mut R,
    ) -> Result<Self, SettingsError> {
        let bounds = Bounds::centered(settings.scene_width, aspect)?;
        let mut flock = Flock::new(
            settings.size * DESIRED_SEPARATION_TO_RADIUS_RATIO,
            settings.size * NEIGHBOR_DISTANCE_TO_RADIUS_RATIO,
            settings.separation_weight,
            settings.alignment_weight,
            settings.cohesion_weight,
        );

        for _ in 0..settings.quantity {
            let angle = rng.gen_range(0.0..TAU);
            flock.add_boid(Boid::new(
                settings.shape.clone(),
                settings.size,
                Vector2D::zero(),
                Vector2D::from_angle(angle, 1.0),
                Vector2D::zero(),
                settings.max_speed,
                settings.max_force,
                settings.oriented,
            ));
        }

        log::info!(
            "flocking scene: {} boids of size {} in a {}-wide world",
            settings.quantity,
            settings.size,
            settings.scene_width
        );

        Ok(Self {
            settings,
            flock,
            bounds,
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Keeps the world width and changes its height. A degenerate aspect
    /// leaves the world as it was.
    pub fn set_aspect(&mut self, aspect: f64) -> Result<(), SettingsError> {
        self.bounds = Bounds::centered(self.settings.scene_width, aspect)?;
        Ok(())
    }

    pub fn set_boid_size(&mut self, size: f64) {
        self.settings.size = size;
        self.flock.boid_size_change(size);
    }

    pub fn add_obstacle(&mut self, obstacle: Vector2D) {
        self.flock.obstacles.push(obstacle);
    }

    pub fn step(&mut self) {
        let Bounds {
            min_x,
            max_x,
            min_y,
            max_y,
        } = self.bounds;
        self.flock.run(self.settings.dt, min_x, max_x, min_y, max_y);
    }

    pub fn poses(&self) -> impl Iterator<Item = Pose<'_>> + '_ {
        self.flock.poses()
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        self.flock.render(renderer)
    }
}
