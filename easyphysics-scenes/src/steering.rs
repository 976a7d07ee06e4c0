use easyphysics_core::steering::{evade_if_near, pursue_if_near, seek_if_near, wander};
use easyphysics_core::{Boid, Kinematic, Pose, Renderer, Shape, Vector2D};
use rand::Rng;

use crate::{Bounds, SettingsError, SteeringSettings};

/// A hunter chasing a gatherer that is busy collecting targets.
#[derive(Debug, Clone)]
pub struct SteeringScene {
    pub settings: SteeringSettings,
    pub hunter: Option<Boid>,
    pub gatherer: Option<Boid>,
    pub target: Option<Vector2D>,
    bounds: Bounds,
}

impl SteeringScene {
    /// Places every enabled agent at a random spot of the world, at rest.
    /// Fails when `aspect` is not finite and positive.
    pub fn new<R: Rng + ?Sized>(
        settings: SteeringSettings,
        aspect: f64,
        rng: &mut R,
    ) -> Result<Self, SettingsError> {
        let bounds = Bounds::centered(settings.scene_width, aspect)?;

        let spawn = |shape: &Shape, oriented: bool, rng: &mut R| {
            Boid::new(
                shape.clone(),
                settings.size,
                bounds.random_point(rng),
                Vector2D::zero(),
                Vector2D::zero(),
                settings.max_speed,
                settings.max_force,
                oriented,
            )
        };

        let hunter = settings
            .hunter
            .enabled
            .then(|| spawn(&settings.hunter.shape, settings.hunter.oriented, rng));
        let gatherer = settings
            .gatherer
            .enabled
            .then(|| spawn(&settings.gatherer.shape, settings.gatherer.oriented, rng));
        let target = settings.target.enabled.then(|| bounds.random_point(rng));

        log::info!(
            "steering scene: hunter={} gatherer={} target={}",
            hunter.is_some(),
            gatherer.is_some(),
            target.is_some()
        );

        Ok(Self {
            settings,
            hunter,
            gatherer,
            target,
            bounds,
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// A degenerate aspect leaves the world as it was.
    pub fn set_aspect(&mut self, aspect: f64) -> Result<(), SettingsError> {
        self.bounds = Bounds::centered(self.settings.scene_width, aspect)?;
        Ok(())
    }

    /// One tick: decide, integrate, collect the target, wrap.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let dt = self.settings.dt;
        self.steer_gatherer(rng);
        self.steer_hunter(rng);

        if let Some(gatherer) = self.gatherer.as_mut() {
            gatherer.integrate(dt);
        }
        if let Some(hunter) = self.hunter.as_mut() {
            hunter.integrate(dt);
        }

        if let (Some(gatherer), Some(target)) = (&self.gatherer, self.target.as_mut()) {
            if Vector2D::distance(&gatherer.body.position, target) < gatherer.radius() * 2.0 {
                *target = self.bounds.random_point(rng);
                log::debug!("target collected, respawned at ({}, {})", target.x, target.y);
            }
        }

        let Bounds {
            min_x,
            max_x,
            min_y,
            max_y,
        } = self.bounds;
        for boid in [self.gatherer.as_mut(), self.hunter.as_mut()].into_iter().flatten() {
            boid.wrap_edges(min_x, max_x, min_y, max_y);
        }
    }

    /// Seeks a close target, evades a close hunter, wanders otherwise.
    fn steer_gatherer<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let settings = &self.settings;
        let Some(gatherer) = self.gatherer.as_mut() else {
            return;
        };
        let mut busy = false;

        if let Some(target) = self.target {
            if Vector2D::distance(&gatherer.body.position, &target) <= settings.seek_distance {
                busy = true;
                let seek = seek_if_near(gatherer, target, settings.seek_distance);
                gatherer.apply_force(seek * settings.seek_weight);
            }
        }

        if let Some(hunter) = &self.hunter {
            if Vector2D::distance(&gatherer.body.position, &hunter.body.position)
                <= settings.evade_distance
            {
                busy = true;
                let evade = evade_if_near(gatherer, hunter, settings.evade_distance, settings.dt);
                gatherer.apply_force(evade * settings.evade_weight);
            }
        }

        if !busy {
            let force = wander(gatherer, rng);
            gatherer.apply_force(force);
        }
    }

    /// Pursues a close gatherer, wanders otherwise.
    fn steer_hunter<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let settings = &self.settings;
        let Some(hunter) = self.hunter.as_mut() else {
            return;
        };

        let prey = self.gatherer.as_ref().filter(|gatherer| {
            Vector2D::distance(&hunter.body.position, &gatherer.body.position)
                <= settings.pursue_distance
        });

        match prey {
            Some(gatherer) => {
                let pursue =
                    pursue_if_near(hunter, gatherer, settings.pursue_distance, settings.dt);
                hunter.apply_force(pursue * settings.pursue_weight);
            }
            None => {
                let force = wander(hunter, rng);
                hunter.apply_force(force);
            }
        }
    }

    /// Target, gatherer, hunter, in drawing order.
    pub fn poses(&self) -> impl Iterator<Item = Pose<'_>> + '_ {
        let target = self.target.map(|position| Pose {
            shape: &self.settings.target.shape,
            position,
            radius: self.settings.size,
            facing: None,
        });
        target
            .into_iter()
            .chain(self.gatherer.iter().map(Kinematic::pose))
            .chain(self.hunter.iter().map(Kinematic::pose))
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        for pose in self.poses() {
            renderer.draw(&pose)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AgentSettings;
    use easyphysics_core::PoseRecorder;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(5)
    }

    fn scene(settings: SteeringSettings) -> SteeringScene {
        SteeringScene::new(settings, 1.0, &mut rng()).unwrap()
    }

    #[test]
    fn test_agents_spawn_inside_world() {
        let scene = scene(SteeringSettings::default());
        let bounds = scene.bounds();
        let gatherer = scene.gatherer.as_ref().unwrap();
        let hunter = scene.hunter.as_ref().unwrap();
        let target = scene.target.unwrap();

        for p in [gatherer.body.position, hunter.body.position, target] {
            assert!(bounds.contains(p));
        }
        assert_eq!(gatherer.body.velocity, Vector2D::zero());
        assert_eq!(hunter.body.shape, Shape::Triangle);
    }

    #[test]
    fn test_degenerate_aspect_is_rejected() {
        let result = SteeringScene::new(SteeringSettings::default(), f64::INFINITY, &mut rng());
        assert!(matches!(
            result,
            Err(SettingsError::InvalidValue { field: "aspect", .. })
        ));

        let mut scene = scene(SteeringSettings::default());
        let before = scene.bounds();
        assert!(scene.set_aspect(f64::NAN).is_err());
        assert_eq!(scene.bounds(), before);

        // the target can still be respawned inside the old world
        scene.hunter = None;
        scene.gatherer.as_mut().unwrap().body.position = Vector2D::zero();
        scene.target = Some(Vector2D::new(1.0, 0.0));
        scene.step(&mut rng());
        assert!(before.contains(scene.target.unwrap()));
    }

    #[test]
    fn test_disabled_agents_are_absent() {
        let settings = SteeringSettings {
            hunter: AgentSettings {
                enabled: false,
                ..AgentSettings::default()
            },
            target: AgentSettings {
                enabled: false,
                ..AgentSettings::default()
            },
            ..SteeringSettings::default()
        };
        let mut scene = scene(settings);
        assert!(scene.hunter.is_none());
        assert!(scene.target.is_none());

        let mut rng = rng();
        for _ in 0..50 {
            scene.step(&mut rng);
        }
        assert_eq!(scene.poses().count(), 1);
    }

    #[test]
    fn test_gatherer_seeks_nearby_target() {
        let mut scene = scene(SteeringSettings::default());
        scene.hunter = None;
        let gatherer = scene.gatherer.as_mut().unwrap();
        gatherer.body.position = Vector2D::zero();
        scene.target = Some(Vector2D::new(40.0, 0.0));

        scene.step(&mut rng());

        let gatherer = scene.gatherer.as_ref().unwrap();
        assert!(gatherer.body.velocity.x > 0.0);
        assert_eq!(gatherer.body.velocity.y, 0.0);
        // seeking leaves the wander heading alone
        assert_eq!(gatherer.wander_angle, 0.0);
    }

    #[test]
    fn test_gatherer_wanders_without_stimulus() {
        let mut scene = scene(SteeringSettings::default());
        scene.hunter = None;
        scene.gatherer.as_mut().unwrap().body.position = Vector2D::zero();
        scene.target = Some(Vector2D::new(150.0, 150.0));

        scene.step(&mut rng());

        let gatherer = scene.gatherer.as_ref().unwrap();
        assert!(gatherer.body.velocity.magnitude() > 0.0);
        assert_ne!(gatherer.wander_angle, 0.0);
    }

    #[test]
    fn test_hunter_pursues_and_gatherer_evades() {
        let mut scene = scene(SteeringSettings::default());
        scene.target = None;
        scene.gatherer.as_mut().unwrap().body.position = Vector2D::zero();
        scene.hunter.as_mut().unwrap().body.position = Vector2D::new(30.0, 0.0);

        scene.step(&mut rng());

        let gatherer = scene.gatherer.as_ref().unwrap();
        let hunter = scene.hunter.as_ref().unwrap();
        assert!(gatherer.body.velocity.x < 0.0);
        assert!(hunter.body.velocity.x < 0.0);
        assert_eq!(hunter.wander_angle, 0.0);
    }

    #[test]
    fn test_collected_target_respawns() {
        let mut scene = scene(SteeringSettings::default());
        scene.hunter = None;
        scene.gatherer.as_mut().unwrap().body.position = Vector2D::zero();
        scene.target = Some(Vector2D::new(1.0, 0.0));

        scene.step(&mut rng());

        let target = scene.target.unwrap();
        assert_ne!(target, Vector2D::new(1.0, 0.0));
        assert!(scene.bounds().contains(target));
    }

    #[test]
    fn test_render_order_is_target_gatherer_hunter() {
        let scene = scene(SteeringSettings::default());
        let mut recorder = PoseRecorder::default();
        assert!(scene.render(&mut recorder).is_ok());

        let shapes: Vec<Shape> = recorder.poses.into_iter().map(|p| p.shape).collect();
        assert_eq!(shapes, vec![Shape::Square, Shape::Circle, Shape::Triangle]);
    }
}
