//! 2D canvas painter for the universe and the panel leader lines.

use crate::constants::*;
use anyhow::anyhow;
use galaxy_core::{AnchorId, Camera, CameraView, CelestialBody, PanelSet};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub struct Painter {
    ctx2d: web::CanvasRenderingContext2d,
}

/// A body after projection, in backing-store pixels.
struct Projected<'a> {
    body: &'a CelestialBody,
    x: f64,
    y: f64,
    radius: f64,
    depth: f32,
}

impl Painter {
    pub fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx2d = canvas
            .get_context("2d")
            .map_err(|e| anyhow!("{:?}", e))?
            .ok_or_else(|| anyhow!("canvas has no 2d context"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow!("{:?}", e))?;
        Ok(Self { ctx2d })
    }

    #[allow(deprecated)]
    pub fn draw(
        &self,
        canvas: &web::HtmlCanvasElement,
        camera: &Camera,
        bodies: &[CelestialBody],
        hovered: Option<AnchorId>,
        panels: &PanelSet,
    ) {
        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        let c = &self.ctx2d;
        c.set_global_alpha(1.0);
        c.set_fill_style(&JsValue::from_str(BACKGROUND_COLOR));
        c.fill_rect(0.0, 0.0, w as f64, h as f64);

        // Painter's algorithm: far bodies first.
        let mut visible: Vec<Projected> = bodies
            .iter()
            .filter_map(|b| project_body(camera, b, w, h))
            .collect();
        visible.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        for p in &visible {
            let [r, g, b] = p.body.color_rgb;
            c.set_fill_style(&JsValue::from_str(&css_rgb(r, g, b)));
            c.begin_path();
            _ = c.arc(p.x, p.y, p.radius, 0.0, std::f64::consts::TAU);
            c.fill();
            if hovered == Some(p.body.id) {
                c.set_stroke_style(&JsValue::from_str(HOVER_RING_COLOR));
                c.set_line_width(HOVER_RING_WIDTH_PX);
                c.begin_path();
                _ = c.arc(
                    p.x,
                    p.y,
                    p.radius + HOVER_RING_GAP_PX,
                    0.0,
                    std::f64::consts::TAU,
                );
                c.stroke();
            }
        }

        c.set_stroke_style(&JsValue::from_str(LEADER_LINE_COLOR));
        c.set_line_width(LEADER_LINE_WIDTH_PX);
        for (id, panel) in panels.iter() {
            if !panel.is_placed() || !panel.interactive {
                continue;
            }
            let Some(from) = visible.iter().find(|p| p.body.id == id) else {
                continue;
            };
            let Some(ndc) = camera.project(panel.position) else {
                continue;
            };
            let (tx, ty) = Camera::ndc_to_screen(ndc, w, h);
            c.set_global_alpha(panel.opacity as f64);
            c.begin_path();
            c.move_to(from.x, from.y);
            c.line_to(tx as f64, ty as f64);
            c.stroke();
        }
        c.set_global_alpha(1.0);
    }
}

fn project_body<'a>(
    camera: &Camera,
    body: &'a CelestialBody,
    w: f32,
    h: f32,
) -> Option<Projected<'a>> {
    let ndc = camera.project(body.position)?;
    if ndc.z < 0.0 || ndc.z > 1.0 {
        return None;
    }
    let (x, y) = Camera::ndc_to_screen(ndc, w, h);
    let distance = camera.eye.distance(body.position).max(camera.znear);
    let focal = 0.5 * h / (camera.fovy_radians * 0.5).tan();
    let radius = (body.radius * focal / distance) as f64;
    Some(Projected {
        body,
        x: x as f64,
        y: y as f64,
        radius: radius.max(MIN_BODY_RADIUS_PX),
        depth: distance,
    })
}

#[inline]
fn css_rgb(r: f32, g: f32, b: f32) -> String {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("rgb({}, {}, {})", to_u8(r), to_u8(g), to_u8(b))
}
