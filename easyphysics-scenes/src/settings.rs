use easyphysics_core::Shape;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid {field}: {value} (expected {expected})")]
    InvalidValue {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::InvalidValue {
            field,
            value,
            expected: "a positive number",
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::InvalidValue {
            field,
            value,
            expected: "zero or a positive number",
        })
    }
}

/// Parameters of the flocking animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockingSettings {
    /// Width of the visible world, in world units
    pub scene_width: f64,
    /// Boid radius; separation and neighbourhood distances derive from it
    pub size: f64,
    pub quantity: usize,
    pub separation_weight: f64,
    pub alignment_weight: f64,
    pub cohesion_weight: f64,
    pub max_speed: f64,
    pub max_force: f64,
    pub dt: f64,
    pub shape: Shape,
    pub oriented: bool,
    pub color: String,
    pub grid: bool,
}

impl Default for FlockingSettings {
    fn default() -> Self {
        Self {
            scene_width: 400.0,
            size: 5.0,
            quantity: 200,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            max_speed: 2.0,
            max_force: 0.03,
            dt: 1.0,
            shape: Shape::Triangle,
            oriented: true,
            color: "#000000".to_string(),
            grid: false,
        }
    }
}

impl FlockingSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("scene_width", self.scene_width)?;
        positive("size", self.size)?;
        non_negative("separation_weight", self.separation_weight)?;
        non_negative("alignment_weight", self.alignment_weight)?;
        non_negative("cohesion_weight", self.cohesion_weight)?;
        positive("max_speed", self.max_speed)?;
        positive("max_force", self.max_force)?;
        positive("dt", self.dt)?;
        Ok(())
    }
}

/// Look of one agent of the steering animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub enabled: bool,
    pub shape: Shape,
    pub color: String,
    pub oriented: bool,
    /// Draw the agent's detection radius around it
    pub show_distance: bool,
}

impl AgentSettings {
    fn with_shape(shape: Shape) -> Self {
        Self {
            enabled: true,
            shape,
            color: "#000000".to_string(),
            oriented: true,
            show_distance: false,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self::with_shape(Shape::Circle)
    }
}

/// Parameters of the hunter / gatherer / target animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringSettings {
    pub scene_width: f64,
    pub size: f64,
    pub pursue_distance: f64,
    pub seek_distance: f64,
    pub evade_distance: f64,
    pub pursue_weight: f64,
    pub seek_weight: f64,
    pub evade_weight: f64,
    pub max_speed: f64,
    pub max_force: f64,
    pub dt: f64,
    pub hunter: AgentSettings,
    pub gatherer: AgentSettings,
    /// `oriented` is ignored for the target, it never moves on its own
    pub target: AgentSettings,
    pub grid: bool,
}

impl Default for SteeringSettings {
    fn default() -> Self {
        Self {
            scene_width: 400.0,
            size: 5.0,
            pursue_distance: 50.0,
            seek_distance: 50.0,
            evade_distance: 50.0,
            pursue_weight: 1.0,
            seek_weight: 1.0,
            evade_weight: 1.0,
            max_speed: 2.0,
            max_force: 0.03,
            dt: 1.0,
            hunter: AgentSettings::with_shape(Shape::Triangle),
            gatherer: AgentSettings::with_shape(Shape::Circle),
            target: AgentSettings {
                oriented: false,
                ..AgentSettings::with_shape(Shape::Square)
            },
            grid: false,
        }
    }
}

impl SteeringSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("scene_width", self.scene_width)?;
        positive("size", self.size)?;
        non_negative("pursue_distance", self.pursue_distance)?;
        non_negative("seek_distance", self.seek_distance)?;
        non_negative("evade_distance", self.evade_distance)?;
        non_negative("pursue_weight", self.pursue_weight)?;
        non_negative("seek_weight", self.seek_weight)?;
        non_negative("evade_weight", self.evade_weight)?;
        positive("max_speed", self.max_speed)?;
        positive("max_force", self.max_force)?;
        positive("dt", self.dt)?;
        Ok(())
    }
}
