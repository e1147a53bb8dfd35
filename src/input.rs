use galaxy_core::{AnchorId, Camera, CelestialBody};
use glam::{Vec2, Vec3, Vec4};
use web_sys as web;

#[derive(Default, Clone, Copy)]
pub struct MouseState {
    /// Canvas backing-store pixels.
    pub x: f32,
    pub y: f32,
    pub inside: bool,
}

#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// World-space ray through pixel `(sx, sy)` of a `width` x `height` viewport.
pub fn screen_to_world_ray(
    camera: &Camera,
    sx: f32,
    sy: f32,
    width: f32,
    height: f32,
) -> (Vec3, Vec3) {
    let ndc_x = (2.0 * sx / width.max(1.0)) - 1.0;
    let ndc_y = 1.0 - (2.0 * sy / height.max(1.0));
    let inv = camera.view_projection().inverse();
    let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    let p1: Vec3 = p_far.truncate() / p_far.w;
    let ro = camera.eye;
    let rd = (p1 - ro).normalize_or_zero();
    (ro, rd)
}

/// Closest body hit by the ray, using an inflated pick radius.
pub fn pick_body(
    ray_origin: Vec3,
    ray_dir: Vec3,
    bodies: &[CelestialBody],
    radius_scale: f32,
) -> Option<AnchorId> {
    let mut best = None::<(AnchorId, f32)>;
    for body in bodies {
        if let Some(t) = ray_sphere(ray_origin, ray_dir, body.position, body.radius * radius_scale)
        {
            match best {
                Some((_, bt)) if t >= bt => {}
                _ => best = Some((body.id, t)),
            }
        }
    }
    best.map(|(id, _)| id)
}

#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let sx = (x_css / rect.width().max(1.0) as f32) * canvas.width() as f32;
    let sy = (y_css / rect.height().max(1.0) as f32) * canvas.height() as f32;
    Vec2::new(sx, sy)
}
