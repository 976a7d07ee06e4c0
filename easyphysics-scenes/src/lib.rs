//! Ready-made animations built on `easyphysics-core`.
//!
//! Each scene is configured through a plain settings struct (deserializable
//! from JSON) and stepped headless; drawing goes through any
//! [`easyphysics_core::Renderer`].

use easyphysics_core::Vector2D;
use rand::Rng;
use serde::{Deserialize, Serialize};

mod flocking;
mod settings;
mod steering;

pub use flocking::FlockingScene;
pub use settings::{AgentSettings, FlockingSettings, SettingsError, SteeringSettings};

use settings::positive;
pub use steering::SteeringScene;

/// Axis-aligned world rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// World of the given width centred on the origin; `aspect` is height / width.
    ///
    /// Both must be finite and positive, otherwise random points could not be
    /// drawn from the world.
    pub fn centered(width: f64, aspect: f64) -> Result<Self, SettingsError> {
        positive("scene_width", width)?;
        positive("aspect", aspect)?;
        let half_width = width / 2.0;
        let half_height = width * aspect / 2.0;
        Ok(Self {
            min_x: -half_width,
            max_x: half_width,
            min_y: -half_height,
            max_y: half_height,
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, point: Vector2D) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector2D {
        Vector2D::new(
            rng.gen_range(self.min_x..=self.max_x),
            rng.gen_range(self.min_y..=self.max_y),
        )
    }
}
