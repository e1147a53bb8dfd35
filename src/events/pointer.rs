//! Hover handling for bodies on the canvas and for their info cards.
//!
//! Both the body under the pointer and the card itself keep a panel hovered.
//! Leaving either arms a debounced exit: a `setTimeout` carrying the
//! panel's exit ticket. Re-entering clears that timer, so moving from a body
//! onto its card never flickers the card.

use crate::constants::PICK_RADIUS_SCALE;
use crate::input;
use crate::overlay::InfoCard;
use crate::AppContext;
use galaxy_core::{AnchorId, ExitTicket};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_pointer_handlers(ctx: &Rc<AppContext>) {
    wire_pointermove(ctx);
    wire_pointerleave(ctx);
}

fn wire_pointermove(ctx: &Rc<AppContext>) {
    let weak = Rc::downgrade(ctx);
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let Some(ctx) = weak.upgrade() else {
            return;
        };
        let pos = input::pointer_canvas_px(&ev, &ctx.canvas);
        ctx.mouse.set(input::MouseState {
            x: pos.x,
            y: pos.y,
            inside: true,
        });
        refresh_hover(&ctx);
    }) as Box<dyn FnMut(_)>);
    _ = ctx
        .canvas
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerleave(ctx: &Rc<AppContext>) {
    let weak = Rc::downgrade(ctx);
    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        let Some(ctx) = weak.upgrade() else {
            return;
        };
        let mut ms = ctx.mouse.get();
        ms.inside = false;
        ctx.mouse.set(ms);
        set_hovered(&ctx, None);
    }) as Box<dyn FnMut(_)>);
    _ = ctx
        .canvas
        .add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Re-pick the body under the last known pointer position.
pub fn refresh_hover(ctx: &Rc<AppContext>) {
    let ms = ctx.mouse.get();
    if !ms.inside || ctx.is_disposed() {
        return;
    }
    let picked = {
        let camera = ctx.camera.borrow();
        let (ro, rd) = input::screen_to_world_ray(
            &camera,
            ms.x,
            ms.y,
            ctx.canvas.width() as f32,
            ctx.canvas.height() as f32,
        );
        input::pick_body(ro, rd, &ctx.bodies, PICK_RADIUS_SCALE)
    };
    set_hovered(ctx, picked);
}

fn set_hovered(ctx: &Rc<AppContext>, picked: Option<AnchorId>) {
    let previous = ctx.hovered.replace(picked);
    if previous == picked {
        return;
    }
    if let Some(id) = previous {
        hover_leave(ctx, id);
    }
    if let Some(id) = picked {
        hover_enter(ctx, id);
    }
}

pub fn hover_enter(ctx: &Rc<AppContext>, id: AnchorId) {
    if ctx.is_disposed() {
        return;
    }
    clear_exit_timer(ctx, id);
    ctx.panels.borrow_mut().hover_enter(id);
    ensure_card(ctx, id);
}

pub fn hover_leave(ctx: &Rc<AppContext>, id: AnchorId) {
    if ctx.is_disposed() {
        return;
    }
    let ticket = ctx.panels.borrow_mut().hover_exit(id);
    if let Some(ticket) = ticket {
        schedule_exit(ctx, id, ticket);
    }
}

fn schedule_exit(ctx: &Rc<AppContext>, id: AnchorId, ticket: ExitTicket) {
    clear_exit_timer(ctx, id);
    let Some(window) = web::window() else {
        return;
    };
    let weak = Rc::downgrade(ctx);
    let callback = Closure::once_into_js(move || {
        let Some(ctx) = weak.upgrade() else {
            return;
        };
        ctx.exit_timers.borrow_mut().remove(&id);
        ctx.panels.borrow_mut().fire_exit(id, ticket);
    });
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        ticket.delay.as_millis() as i32,
    ) {
        Ok(handle) => {
            ctx.exit_timers.borrow_mut().insert(id, handle);
        }
        Err(e) => {
            log::warn!("[hover] could not arm exit timer: {:?}", e);
            ctx.panels.borrow_mut().fire_exit(id, ticket);
        }
    }
}

fn clear_exit_timer(ctx: &AppContext, id: AnchorId) {
    if let Some(handle) = ctx.exit_timers.borrow_mut().remove(&id) {
        if let Some(w) = web::window() {
            w.clear_timeout_with_handle(handle);
        }
    }
}

fn ensure_card(ctx: &Rc<AppContext>, id: AnchorId) {
    if ctx.cards.borrow().contains_key(&id) {
        return;
    }
    let Some(body) = ctx.body(id) else {
        return;
    };
    let Some(mut card) = InfoCard::create(&ctx.document, body) else {
        log::warn!("[hover] no card for {:?}", id);
        return;
    };
    let weak = Rc::downgrade(ctx);
    card.listen("pointerenter", move |_ev| {
        if let Some(ctx) = weak.upgrade() {
            hover_enter(&ctx, id);
        }
    });
    let weak = Rc::downgrade(ctx);
    card.listen("pointerleave", move |_ev| {
        if let Some(ctx) = weak.upgrade() {
            hover_leave(&ctx, id);
        }
    });
    ctx.cards.borrow_mut().insert(id, card);
}
