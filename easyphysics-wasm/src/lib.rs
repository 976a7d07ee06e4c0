use easyphysics_core::{Renderer, Vector2D};
use easyphysics_scenes::{FlockingScene, FlockingSettings, SteeringScene, SteeringSettings};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, MouseEvent};

mod renderer;

pub use renderer::CanvasRenderer;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

fn canvas_by_id(
    canvas_id: &str,
) -> Result<(Document, HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let window = web_sys::window().ok_or("no global window")?;
    let document = window.document().ok_or("no document")?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or("canvas not found")?
        .dyn_into::<HtmlCanvasElement>()?;
    let context = canvas
        .get_context("2d")?
        .ok_or("no 2d context")?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((document, canvas, context))
}

fn settings_error(err: easyphysics_scenes::SettingsError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn aspect(canvas: &HtmlCanvasElement) -> f64 {
    canvas.height() as f64 / canvas.width() as f64
}

/// Clears the canvas and switches to world coordinates: origin at the centre,
/// `scene_width` world units across.
fn begin_frame(
    canvas: &HtmlCanvasElement,
    context: &CanvasRenderingContext2d,
    scene_width: f64,
) -> Result<(), JsValue> {
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    context.clear_rect(0.0, 0.0, width, height);
    context.save();
    let zoom = width / scene_width;
    let result = context.set_transform(zoom, 0.0, 0.0, zoom, width / 2.0, height / 2.0);
    if result.is_err() {
        // draw() only restores after a successful begin
        context.restore();
    }
    result
}

/// Canvas pixel under the mouse, converted to world coordinates.
fn world_point(canvas: &HtmlCanvasElement, scene_width: f64, event: &MouseEvent) -> Vector2D {
    let canvas_element: &Element = canvas.as_ref();
    let rect = canvas_element.get_bounding_client_rect();
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let zoom = width / scene_width;
    let px = event.client_x() as f64 - rect.left();
    let py = event.client_y() as f64 - rect.top();
    Vector2D::new((px - width / 2.0) / zoom, (py - height / 2.0) / zoom)
}

/// Reynolds' flocking drawn on a canvas. Call `draw()` once per animation frame.
#[wasm_bindgen]
pub struct FlockingAnimation {
    scene: FlockingScene,
    canvas: HtmlCanvasElement,
    renderer: CanvasRenderer,
    edit_mode: bool,
}

#[wasm_bindgen]
impl FlockingAnimation {
    /// `settings_json` may be omitted to use the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        settings_json: Option<String>,
        edit_mode: bool,
    ) -> Result<FlockingAnimation, JsValue> {
        let settings = match settings_json {
            Some(json) => FlockingSettings::from_json(&json).map_err(settings_error)?,
            None => FlockingSettings::default(),
        };
        let (document, canvas, context) = canvas_by_id(canvas_id)?;

        console_log!("Initializing flocking animation with {} boids", settings.quantity);

        let scene = FlockingScene::new(settings, aspect(&canvas), &mut rand::thread_rng())
            .map_err(settings_error)?;
        let mut renderer = CanvasRenderer::new(context, document);
        renderer.set_color(&scene.settings.color);

        Ok(FlockingAnimation {
            scene,
            canvas,
            renderer,
            edit_mode,
        })
    }

    pub fn draw(&mut self) -> Result<(), JsValue> {
        let scene_width = self.scene.settings.scene_width;
        begin_frame(&self.canvas, self.renderer.context(), scene_width)?;

        if self.scene.settings.grid || self.edit_mode {
            self.renderer.draw_grid(scene_width);
        }

        self.scene.step();
        let result = self.scene.render(&mut self.renderer);
        self.renderer.context().restore();

        if self.edit_mode {
            self.renderer
                .draw_edit_corner(self.canvas.width() as f64, self.canvas.height() as f64);
        }
        result
    }

    /// Fails, leaving the canvas untouched, when either side is not positive.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.scene.set_aspect(height / width).map_err(settings_error)?;
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        console_log!("Resized to {}x{}", width, height);
        Ok(())
    }

    /// Drops an obstacle the flock will steer around where the user clicked.
    pub fn handle_mouse_click(&mut self, event: MouseEvent) {
        let point = world_point(&self.canvas, self.scene.settings.scene_width, &event);
        self.scene.add_obstacle(point);
        console_log!("Obstacle placed at ({:.1}, {:.1})", point.x, point.y);
    }

    pub fn boid_count(&self) -> usize {
        self.scene.flock.len()
    }

    /// Boid positions as a flat `[x0, y0, x1, y1, ...]` array in world units.
    pub fn positions(&self) -> js_sys::Float64Array {
        let flat: Vec<f64> = self
            .scene
            .flock
            .boids
            .iter()
            .flat_map(|boid| [boid.body.position.x, boid.body.position.y])
            .collect();
        js_sys::Float64Array::from(flat.as_slice())
    }

    pub fn set_boid_size(&mut self, size: f64) {
        self.scene.set_boid_size(size);
    }

    pub fn set_separation_weight(&mut self, weight: f64) {
        self.scene.flock.separation_weight = weight;
    }

    pub fn set_alignment_weight(&mut self, weight: f64) {
        self.scene.flock.alignment_weight = weight;
    }

    pub fn set_cohesion_weight(&mut self, weight: f64) {
        self.scene.flock.cohesion_weight = weight;
    }

    pub fn set_color(&mut self, color: &str) {
        self.scene.settings.color = color.to_string();
        self.renderer.set_color(color);
    }
}

/// Hunter, gatherer and target drawn on a canvas.
#[wasm_bindgen]
pub struct SteeringAnimation {
    scene: SteeringScene,
    canvas: HtmlCanvasElement,
    renderer: CanvasRenderer,
    edit_mode: bool,
}

#[wasm_bindgen]
impl SteeringAnimation {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        settings_json: Option<String>,
        edit_mode: bool,
    ) -> Result<SteeringAnimation, JsValue> {
        let settings = match settings_json {
            Some(json) => SteeringSettings::from_json(&json).map_err(settings_error)?,
            None => SteeringSettings::default(),
        };
        let (document, canvas, context) = canvas_by_id(canvas_id)?;

        let scene = SteeringScene::new(settings, aspect(&canvas), &mut rand::thread_rng())
            .map_err(settings_error)?;
        console_log!(
            "Initializing steering animation (hunter: {}, gatherer: {}, target: {})",
            scene.hunter.is_some(),
            scene.gatherer.is_some(),
            scene.target.is_some()
        );

        Ok(SteeringAnimation {
            scene,
            canvas,
            renderer: CanvasRenderer::new(context, document),
            edit_mode,
        })
    }

    pub fn draw(&mut self) -> Result<(), JsValue> {
        let scene_width = self.scene.settings.scene_width;
        begin_frame(&self.canvas, self.renderer.context(), scene_width)?;

        if self.scene.settings.grid || self.edit_mode {
            self.renderer.draw_grid(scene_width);
        }

        self.scene.step(&mut rand::thread_rng());
        let result = self.draw_agents();
        self.renderer.context().restore();

        if self.edit_mode {
            self.renderer
                .draw_edit_corner(self.canvas.width() as f64, self.canvas.height() as f64);
        }
        result
    }

    /// Fails, leaving the canvas untouched, when either side is not positive.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.scene.set_aspect(height / width).map_err(settings_error)?;
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        console_log!("Resized to {}x{}", width, height);
        Ok(())
    }

    /// Moves the target to where the user clicked.
    pub fn handle_mouse_click(&mut self, event: MouseEvent) {
        if self.scene.target.is_some() {
            let point = world_point(&self.canvas, self.scene.settings.scene_width, &event);
            self.scene.target = Some(point);
        }
    }

    pub fn set_show_distances(&mut self, show: bool) {
        let settings = &mut self.scene.settings;
        settings.hunter.show_distance = show;
        settings.gatherer.show_distance = show;
        settings.target.show_distance = show;
    }
}

impl SteeringAnimation {
    fn draw_agents(&mut self) -> Result<(), JsValue> {
        let scene = &self.scene;
        let settings = &scene.settings;

        if let Some(target) = scene.target {
            if scene.gatherer.is_some() && settings.target.show_distance {
                self.renderer
                    .fill_range(target, settings.seek_distance, &settings.target.color)?;
            }
        }
        if let Some(gatherer) = &scene.gatherer {
            if settings.gatherer.show_distance {
                self.renderer.fill_range(
                    gatherer.body.position,
                    settings.evade_distance,
                    &settings.gatherer.color,
                )?;
            }
        }
        if let Some(hunter) = &scene.hunter {
            if settings.hunter.show_distance {
                self.renderer.fill_range(
                    hunter.body.position,
                    settings.pursue_distance,
                    &settings.hunter.color,
                )?;
            }
        }

        // poses come out as target, gatherer, hunter, skipping absent ones
        let colors = [
            (scene.target.is_some(), &settings.target.color),
            (scene.gatherer.is_some(), &settings.gatherer.color),
            (scene.hunter.is_some(), &settings.hunter.color),
        ];
        let present = colors.iter().filter(|(present, _)| *present).map(|(_, color)| color);
        for (pose, color) in scene.poses().zip(present) {
            self.renderer.set_color(color);
            self.renderer.draw(&pose)?;
        }
        Ok(())
    }
}
