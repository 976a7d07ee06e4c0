use crate::Vector2D;

/// How a body looks on screen. The engine never inspects it; renderers do.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Shape {
    #[default]
    Circle,
    Square,
    Triangle,
    /// Image identified by a renderer-specific key (a DOM element id on the web).
    Sprite(String),
    Glyph(char),
}

/// Everything a renderer needs to draw one body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pose<'a> {
    pub shape: &'a Shape,
    pub position: Vector2D,
    pub radius: f64,
    /// Rotation in radians, present only for bodies oriented along their velocity.
    pub facing: Option<f64>,
}

/// Drawing surface that bodies are handed to once per frame.
pub trait Renderer {
    type Error;

    fn draw(&mut self, pose: &Pose<'_>) -> Result<(), Self::Error>;
}

/// Collects poses into a list of owned records, mostly useful for tests and
/// headless runs.
#[derive(Debug, Default)]
pub struct PoseRecorder {
    pub poses: Vec<RecordedPose>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordedPose {
    pub shape: Shape,
    pub position: Vector2D,
    pub radius: f64,
    pub facing: Option<f64>,
}

impl From<&Pose<'_>> for RecordedPose {
    fn from(pose: &Pose<'_>) -> Self {
        Self {
            shape: pose.shape.clone(),
            position: pose.position,
            radius: pose.radius,
            facing: pose.facing,
        }
    }
}

impl Renderer for PoseRecorder {
    type Error = core::convert::Infallible;

    fn draw(&mut self, pose: &Pose<'_>) -> Result<(), Self::Error> {
        self.poses.push(RecordedPose::from(pose));
        Ok(())
    }
}
