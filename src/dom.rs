use crate::constants::CONFIG_SCRIPT_ID;
use galaxy_core::AppConfig;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::warn!("[dom] missing #{}", element_id);
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Read `<script id="app-config" type="application/json">`. A missing
/// script means defaults; an invalid one is logged and also falls back.
pub fn read_config(document: &web::Document) -> AppConfig {
    let text = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|el| el.text_content())
        .filter(|t| !t.trim().is_empty());
    match text {
        None => AppConfig::default(),
        Some(text) => match AppConfig::from_json(&text) {
            Ok(config) => config,
            Err(e) => {
                log::error!("[config] {}; using defaults", e);
                AppConfig::default()
            }
        },
    }
}
