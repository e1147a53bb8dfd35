use crate::constants::*;
use galaxy_core::{CelestialBody, PanelState, PlaybackState, TrackInfo};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(START_OVERLAY_ID) {
        _ = el.class_list().remove_1(HIDDEN_CLASS);
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(START_OVERLAY_ID) {
        _ = el.class_list().add_1(HIDDEN_CLASS);
        _ = el.set_attribute("style", "display:none");
    }
}

/// DOM element of one info panel inside `#info-layer`. Listeners attached
/// with [`listen`](Self::listen) live as long as the card.
pub struct InfoCard {
    root: web::HtmlElement,
    listeners: Vec<Closure<dyn FnMut(web::PointerEvent)>>,
}

impl InfoCard {
    pub fn create(document: &web::Document, body: &CelestialBody) -> Option<Self> {
        let layer = document.get_element_by_id(INFO_LAYER_ID)?;
        let root = create_div(document, CARD_CLASS)?;
        let title = create_div(document, CARD_TITLE_CLASS)?;
        title.set_text_content(Some(&body.name));
        let text = create_div(document, CARD_BODY_CLASS)?;
        text.set_text_content(Some(&body.description));
        _ = root.append_child(&title);
        _ = root.append_child(&text);
        _ = root.set_attribute("data-anchor", &body.id.0.to_string());
        let style = root.style();
        _ = style.set_property("position", "absolute");
        _ = style.set_property("left", "0");
        _ = style.set_property("top", "0");
        _ = style.set_property("opacity", "0");
        _ = style.set_property("pointer-events", "none");
        _ = layer.append_child(&root);
        Some(Self {
            root,
            listeners: Vec::new(),
        })
    }

    pub fn listen(&mut self, event: &str, handler: impl FnMut(web::PointerEvent) + 'static) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::PointerEvent)>);
        _ = self
            .root
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        self.listeners.push(closure);
    }

    /// Place the card at `screen` (CSS pixels) or hide it when off screen.
    pub fn apply(&self, panel: &PanelState, screen: Option<(f32, f32)>) {
        let style = self.root.style();
        match screen {
            Some((x, y)) => {
                _ = style.set_property("display", "block");
                _ = style.set_property(
                    "transform",
                    &format!(
                        "translate({:.1}px, {:.1}px) translate(-50%, -50%) scale({:.3})",
                        x, y, panel.scale
                    ),
                );
            }
            None => {
                _ = style.set_property("display", "none");
            }
        }
        _ = style.set_property("opacity", &format!("{:.3}", panel.opacity));
        let events = if panel.interactive { "auto" } else { "none" };
        _ = style.set_property("pointer-events", events);
    }

    pub fn remove(self) {
        self.root.remove();
    }
}

fn create_div(document: &web::Document, class: &str) -> Option<web::HtmlElement> {
    let el = document.create_element("div").ok()?;
    el.set_class_name(class);
    el.dyn_into::<web::HtmlElement>().ok()
}

/// Update the now-playing HUD from the playlist state. The track
/// description goes into the tooltip.
pub fn update_now_playing(
    document: &web::Document,
    state: &PlaybackState,
    info: Option<&TrackInfo>,
) {
    if let Some(el) = document.get_element_by_id(NOW_PLAYING_ID) {
        el.set_text_content(Some(&now_playing_text(state, info)));
        match info {
            Some(info) => {
                _ = el.set_attribute("title", info.description);
            }
            None => {
                _ = el.remove_attribute("title");
            }
        }
    }
}

pub fn now_playing_text(state: &PlaybackState, info: Option<&TrackInfo>) -> String {
    let status = match (state.enabled, state.is_playing) {
        (false, _) => "muted",
        (true, true) => "playing",
        (true, false) => "paused",
    };
    let track = match info {
        Some(info) => format!("{} [{}]", info.title, info.category.label()),
        None => "No track".to_string(),
    };
    format!("{} • {} • vol {:.0}%", track, status, state.volume * 100.0)
}
