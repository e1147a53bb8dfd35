pub mod keyboard;
pub mod pointer;

pub use keyboard::wire_global_keydown;
pub use pointer::{refresh_hover, wire_pointer_handlers};

use crate::constants::OVERLAY_OK_ID;
use crate::{dom, overlay, AppContext};
use galaxy_core::{TrackId, TransportOutcome};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

/// The start overlay doubles as the user gesture that unlocks audio.
pub fn wire_overlay_buttons(ctx: &Rc<AppContext>) {
    let weak = Rc::downgrade(ctx);
    dom::add_click_listener(&ctx.document, OVERLAY_OK_ID, move || {
        let Some(ctx) = weak.upgrade() else {
            return;
        };
        overlay::hide(&ctx.document);
        if !ctx.playlist.initialize() {
            ctx.refresh_now_playing();
            return;
        }
        let Some(track) = ctx.config.audio.autoplay_track.clone() else {
            ctx.refresh_now_playing();
            return;
        };
        let ctx = ctx.clone();
        spawn_local(async move {
            let outcome = ctx.playlist.play_track(TrackId::new(track)).await;
            if let TransportOutcome::Failed(e) = &outcome {
                log::warn!("[audio] autoplay failed: {}", e);
            }
            ctx.refresh_now_playing();
        });
    });
}
