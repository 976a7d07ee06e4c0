//! Headless runner for the EasyPhysics scenes.
//!
//! A run steps one scene for a fixed number of ticks and writes its poses as
//! JSON lines, one `{"tick": n, "poses": [...]}` object per emitted frame.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use easyphysics_core::Pose;
use easyphysics_scenes::{
    FlockingScene, FlockingSettings, SettingsError, SteeringScene, SteeringSettings,
};
use rand::Rng;
use serde::Serialize;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Flocking,
    Steering,
}

/// One of the runnable scenes.
#[derive(Debug, Clone)]
pub enum Scene {
    Flocking(FlockingScene),
    Steering(SteeringScene),
}

/// A single line of output.
#[derive(Debug, Serialize)]
pub struct Frame<'a> {
    pub tick: u64,
    pub poses: Vec<Pose<'a>>,
}

impl Scene {
    /// Builds a scene from JSON settings, or from the defaults when `json` is `None`.
    /// `aspect` must be finite and positive.
    pub fn new<R: Rng + ?Sized>(
        kind: SceneKind,
        json: Option<&str>,
        aspect: f64,
        rng: &mut R,
    ) -> Result<Self, SettingsError> {
        let scene = match kind {
            SceneKind::Flocking => {
                let settings = match json {
                    Some(json) => FlockingSettings::from_json(json)?,
                    None => FlockingSettings::default(),
                };
                Scene::Flocking(FlockingScene::new(settings, aspect, rng)?)
            }
            SceneKind::Steering => {
                let settings = match json {
                    Some(json) => SteeringSettings::from_json(json)?,
                    None => SteeringSettings::default(),
                };
                Scene::Steering(SteeringScene::new(settings, aspect, rng)?)
            }
        };
        Ok(scene)
    }

    /// Like [`Scene::new`], reading the settings from a file.
    pub fn from_file<R: Rng + ?Sized>(
        kind: SceneKind,
        path: Option<&Path>,
        aspect: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let json = match path {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings from {}", path.display()))?,
            ),
            None => None,
        };
        let scene = Self::new(kind, json.as_deref(), aspect, rng)
            .context("Invalid scene settings")?;
        Ok(scene)
    }

    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self {
            Scene::Flocking(scene) => scene.step(),
            Scene::Steering(scene) => scene.step(rng),
        }
    }

    pub fn poses(&self) -> Vec<Pose<'_>> {
        match self {
            Scene::Flocking(scene) => scene.poses().collect(),
            Scene::Steering(scene) => scene.poses().collect(),
        }
    }
}

/// Steps `scene` `ticks` times and writes a frame after every `every`-th tick.
/// Returns the number of frames written.
pub fn run_scene<W, R>(
    scene: &mut Scene,
    ticks: u64,
    every: u64,
    rng: &mut R,
    out: &mut W,
) -> Result<u64>
where
    W: Write,
    R: Rng + ?Sized,
{
    let every = every.max(1);
    let mut frames = 0;

    for tick in 1..=ticks {
        scene.step(rng);
        if tick % every != 0 {
            continue;
        }

        let frame = Frame {
            tick,
            poses: scene.poses(),
        };
        serde_json::to_writer(&mut *out, &frame)
            .with_context(|| format!("Failed to write frame {}", tick))?;
        writeln!(out)?;
        frames += 1;
        log::trace!("frame {} written ({} poses)", tick, frame.poses.len());
    }

    out.flush()?;
    log::debug!("{} ticks run, {} frames written", ticks, frames);
    Ok(frames)
}
