use core::f64::consts::TAU;

use easyphysics_core::{Pose, Renderer, Shape, Vector2D};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlImageElement};

/// Draws poses on a 2D canvas context, in whatever transform is current.
pub struct CanvasRenderer {
    context: CanvasRenderingContext2d,
    document: Document,
    color: String,
}

impl CanvasRenderer {
    pub fn new(context: CanvasRenderingContext2d, document: Document) -> Self {
        Self {
            context,
            document,
            color: "#000000".to_string(),
        }
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.context
    }

    /// Fill colour for everything drawn from now on.
    pub fn set_color(&mut self, color: &str) {
        self.color = color.to_string();
    }

    fn image(&self, id: &str) -> Option<HtmlImageElement> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlImageElement>()
            .ok()
    }

    fn fill_circle(&self, center: Vector2D, radius: f64) -> Result<(), JsValue> {
        self.context.begin_path();
        self.context.arc(center.x, center.y, radius, 0.0, TAU)?;
        self.context.close_path();
        self.context.fill();
        Ok(())
    }

    /// Translucent disc showing a detection radius.
    pub fn fill_range(&self, center: Vector2D, radius: f64, color: &str) -> Result<(), JsValue> {
        self.context.save();
        self.context.set_fill_style_str(color);
        self.context.set_global_alpha(0.25);
        let result = self.fill_circle(center, radius);
        self.context.restore();
        result
    }

    fn draw_shape(&self, pose: &Pose<'_>) -> Result<(), JsValue> {
        let ctx = &self.context;
        let Vector2D { x, y } = pose.position;
        let r = pose.radius;

        match pose.shape {
            Shape::Square => ctx.fill_rect(x - r, y - r, 2.0 * r, 2.0 * r),
            Shape::Circle => self.fill_circle(pose.position, r)?,
            Shape::Triangle => {
                ctx.translate(x, y)?;
                if let Some(angle) = pose.facing {
                    ctx.rotate(angle)?;
                }
                ctx.begin_path();
                ctx.move_to(r, 0.0);
                ctx.line_to(-r, -3.0 * r / 5.0);
                ctx.line_to(-r, 3.0 * r / 5.0);
                ctx.close_path();
                ctx.fill();
            }
            Shape::Sprite(id) => match self.image(id) {
                Some(image) => {
                    ctx.translate(x, y)?;
                    if let Some(angle) = pose.facing {
                        ctx.rotate(angle)?;
                    }
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        &image,
                        -r,
                        -r,
                        2.0 * r,
                        2.0 * r,
                    )?;
                }
                // image not in the page (yet): keep the body visible
                None => self.fill_circle(pose.position, r)?,
            },
            Shape::Glyph(glyph) => {
                ctx.set_font(&format!("{}px sans-serif", 2.0 * r));
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                ctx.fill_text(&glyph.to_string(), x, y)?;
            }
        }
        Ok(())
    }

    /// Axes, a 100-unit grid and a faint 10-unit grid over a square world of
    /// `scene_width` centred on the origin.
    pub fn draw_grid(&self, scene_width: f64) {
        let ctx = &self.context;
        let half = scene_width / 2.0;
        ctx.save();

        ctx.set_stroke_style_str("#000000");
        ctx.set_line_width(1.0);
        self.line(-half, 0.0, half, 0.0);
        self.line(0.0, -half, 0.0, half);

        for (spacing, color, width) in [(100.0, "#444444", 0.6), (10.0, "#AAAAAA", 0.05)] {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(width);
            let mut offset = spacing;
            while offset < half {
                for at in [offset, -offset] {
                    self.line(at, -half, at, half);
                    self.line(-half, at, half, at);
                }
                offset += spacing;
            }
        }

        ctx.restore();
    }

    fn line(&self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.context.begin_path();
        self.context.move_to(x0, y0);
        self.context.line_to(x1, y1);
        self.context.stroke();
    }

    /// Resize handle in the bottom-right corner, in canvas pixels.
    pub fn draw_edit_corner(&self, width: f64, height: f64) {
        let ctx = &self.context;
        ctx.save();
        ctx.set_global_alpha(1.0);
        ctx.set_stroke_style_str("#000000");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(width - 15.0, height - 3.0);
        ctx.line_to(width - 3.0, height - 3.0);
        ctx.line_to(width - 3.0, height - 15.0);
        ctx.move_to(width - 15.0, height - 8.0);
        ctx.line_to(width - 8.0, height - 8.0);
        ctx.line_to(width - 8.0, height - 15.0);
        ctx.stroke();
        ctx.restore();
    }
}

impl Renderer for CanvasRenderer {
    type Error = JsValue;

    fn draw(&mut self, pose: &Pose<'_>) -> Result<(), JsValue> {
        self.context.save();
        self.context.set_fill_style_str(&self.color);
        let result = self.draw_shape(pose);
        self.context.restore();
        result
    }
}
