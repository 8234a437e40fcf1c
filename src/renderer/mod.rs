//! Canvas 2D rendering
//!
//! Draws the play field, the paddle and the falling objects. The paddle and
//! objects are only shown while a session is playing.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::settings::GameConfig;
use crate::sim::GameState;

const BACKGROUND_COLOR: &str = "#f3f1ea";
const PADDLE_COLOR: &str = "#2f5d8a";
const OBJECT_COLOR: &str = "#e0565b";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    field_width: f64,
}

impl CanvasRenderer {
    /// Size the canvas to the play field and grab its 2D context
    pub fn new(canvas: HtmlCanvasElement, config: &GameConfig) -> Result<Self, JsValue> {
        canvas.set_width(config.width as u32);
        canvas.set_height(config.height as u32);

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            canvas,
            ctx,
            field_width: config.width as f64,
        })
    }

    /// Convert a viewport pointer x into field units (CSS may scale the canvas)
    pub fn pointer_to_field_x(&self, client_x: f64) -> f32 {
        let rect = self.canvas.get_bounding_client_rect();
        let scale = if rect.width() > 0.0 {
            self.field_width / rect.width()
        } else {
            1.0
        };
        ((client_x - rect.left()) * scale) as f32
    }

    pub fn render(&self, state: &GameState) {
        let config = &state.config;
        let ctx = &self.ctx;

        ctx.set_fill_style_str(BACKGROUND_COLOR);
        ctx.fill_rect(0.0, 0.0, config.width as f64, config.height as f64);

        if !state.is_playing() {
            return;
        }

        let paddle = state.paddle.bounds(config);
        ctx.set_fill_style_str(PADDLE_COLOR);
        ctx.fill_rect(
            paddle.left() as f64,
            paddle.top() as f64,
            paddle.size.x as f64,
            paddle.size.y as f64,
        );

        ctx.set_fill_style_str(OBJECT_COLOR);
        let size = config.object_size as f64;
        for obj in &state.objects {
            ctx.fill_rect(obj.x as f64, obj.y as f64, size, size);
        }
    }
}
