use crate::constants::MAX_FRAME_DT_SEC;
use crate::events;
use crate::AppContext;
use galaxy_core::{Camera, CameraView};
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// One rendered frame: orbit the camera, advance every panel, sync the card
/// elements and repaint.
pub fn frame(ctx: &Rc<AppContext>) {
    let now = Instant::now();
    let dt = (now - ctx.last_instant.get()).min(Duration::from_secs_f32(MAX_FRAME_DT_SEC));
    ctx.last_instant.set(now);

    {
        let mut camera = ctx.camera.borrow_mut();
        let w = ctx.canvas.width().max(1) as f32;
        let h = ctx.canvas.height().max(1) as f32;
        camera.aspect = w / h;
        let cam_cfg = &ctx.config.camera;
        let angle = ctx.orbit_angle.get() + cam_cfg.orbit_speed * dt.as_secs_f32();
        ctx.orbit_angle.set(angle % std::f32::consts::TAU);
        camera.set_orbit(angle, cam_cfg.distance, cam_cfg.height);
    }

    // The camera moved under a resting pointer.
    events::refresh_hover(ctx);

    let camera = ctx.camera.borrow();
    let retired = ctx
        .panels
        .borrow_mut()
        .update_all(Some(&*camera), dt, |id| {
            ctx.body(id).map(|b| (b.position, b.radius))
        });
    if !retired.is_empty() {
        let mut cards = ctx.cards.borrow_mut();
        for id in retired {
            if let Some(card) = cards.remove(&id) {
                card.remove();
            }
        }
    }

    let panels = ctx.panels.borrow();
    let css_w = ctx.canvas.client_width() as f32;
    let css_h = ctx.canvas.client_height() as f32;
    {
        let cards = ctx.cards.borrow();
        for (id, panel) in panels.iter() {
            let Some(card) = cards.get(&id) else {
                continue;
            };
            let screen = panel
                .is_placed()
                .then(|| camera.project(panel.position))
                .flatten()
                .filter(|ndc| (0.0..=1.0).contains(&ndc.z))
                .map(|ndc| Camera::ndc_to_screen(ndc, css_w, css_h));
            card.apply(panel, screen);
        }
    }

    ctx.painter
        .draw(&ctx.canvas, &camera, &ctx.bodies, ctx.hovered.get(), &panels);
}

/// Drive [`frame`] from requestAnimationFrame until the context is dropped
/// or disposed.
pub fn start_loop(ctx: Weak<AppContext>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let Some(ctx) = ctx.upgrade().filter(|c| !c.is_disposed()) else {
            log::info!("[frame] loop stopped");
            return;
        };
        frame(&ctx);
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
