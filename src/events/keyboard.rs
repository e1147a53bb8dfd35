use crate::AppContext;
use galaxy_core::{TransportCommand, TransportOutcome};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, ctx: &Rc<AppContext>) {
    if ctx.is_disposed() {
        return;
    }
    let Some(command) = TransportCommand::from_key(&ev.key()) else {
        return;
    };
    match command {
        // Volume steps auto-repeat; track changes do not.
        TransportCommand::VolumeUp | TransportCommand::VolumeDown => {}
        _ if ev.repeat() => return,
        _ => {}
    }
    // Space and arrows would otherwise scroll the page.
    ev.prevent_default();

    let ctx = ctx.clone();
    spawn_local(async move {
        let outcome = ctx.playlist.execute(command).await;
        match &outcome {
            TransportOutcome::Failed(e) => log::warn!("[keys] {:?} failed: {}", command, e),
            TransportOutcome::Ignored(reason) => {
                log::debug!("[keys] {:?} ignored: {:?}", command, reason)
            }
            _ => log::debug!("[keys] {:?} -> {:?}", command, outcome),
        }
        if !ctx.is_disposed() {
            ctx.refresh_now_playing();
        }
    });
}

pub fn wire_global_keydown(ctx: &Rc<AppContext>) {
    if let Some(window) = web::window() {
        let weak = Rc::downgrade(ctx);
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                if let Some(ctx) = weak.upgrade() {
                    handle_global_keydown(&ev, &ctx);
                }
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
