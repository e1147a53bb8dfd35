#![cfg(target_arch = "wasm32")]
use crate::audio::WebAudioBackend;
use crate::constants::*;
use fnv::FnvHashMap;
use galaxy_core::{
    generate_universe, AnchorId, AppConfig, Camera, CelestialBody, PanelSet, PlaylistController,
    TrackCatalog,
};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;

/// Everything the running explorer owns. Built once in [`init`], shared by
/// the frame loop and the event handlers, and torn down on `pagehide`.
pub struct AppContext {
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub painter: render::Painter,
    pub config: AppConfig,
    pub bodies: Vec<CelestialBody>,
    pub camera: RefCell<Camera>,
    pub orbit_angle: Cell<f32>,
    pub panels: RefCell<PanelSet>,
    pub cards: RefCell<FnvHashMap<AnchorId, overlay::InfoCard>>,
    /// `setTimeout` handles of pending hover exits.
    pub exit_timers: RefCell<FnvHashMap<AnchorId, i32>>,
    pub hovered: Cell<Option<AnchorId>>,
    pub mouse: Cell<input::MouseState>,
    pub playlist: Rc<PlaylistController<WebAudioBackend>>,
    pub last_instant: Cell<Instant>,
    disposed: Cell<bool>,
}

impl AppContext {
    fn new(
        document: web::Document,
        canvas: web::HtmlCanvasElement,
        config: AppConfig,
    ) -> anyhow::Result<Self> {
        let painter = render::Painter::new(&canvas)?;
        let bodies = generate_universe(&config.scene);

        let aspect = canvas.width() as f32 / canvas.height().max(1) as f32;
        let mut camera = Camera {
            eye: glam::Vec3::ZERO,
            target: glam::Vec3::ZERO,
            up: glam::Vec3::Y,
            aspect,
            fovy_radians: config.camera.fov_degrees.to_radians(),
            znear: galaxy_core::constants::CAMERA_ZNEAR,
            zfar: galaxy_core::constants::CAMERA_ZFAR,
        };
        camera.set_orbit(0.0, config.camera.distance, config.camera.height);

        let catalog = TrackCatalog::soundtrack();
        let backend = WebAudioBackend::new(
            &catalog,
            &config.audio.base_url,
            config.audio.volume,
            config.audio.enabled,
        );
        let playlist = Rc::new(PlaylistController::new(backend, catalog));
        let panels = PanelSet::new(
            config.billboard.smoothing,
            config.billboard.hover_exit_delay(),
        );

        log::info!(
            "[init] seed={} bodies={} smoothing={:?}",
            config.scene.seed,
            bodies.len(),
            config.billboard.smoothing
        );

        Ok(Self {
            document,
            canvas,
            painter,
            config,
            bodies,
            camera: RefCell::new(camera),
            orbit_angle: Cell::new(0.0),
            panels: RefCell::new(panels),
            cards: RefCell::new(FnvHashMap::default()),
            exit_timers: RefCell::new(FnvHashMap::default()),
            hovered: Cell::new(None),
            mouse: Cell::new(input::MouseState::default()),
            playlist,
            last_instant: Cell::new(Instant::now()),
            disposed: Cell::new(false),
        })
    }

    pub fn body(&self, id: AnchorId) -> Option<&CelestialBody> {
        self.bodies.get(id.0 as usize).filter(|b| b.id == id)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    pub fn refresh_now_playing(&self) {
        overlay::update_now_playing(
            &self.document,
            &self.playlist.state(),
            self.playlist.current_info(),
        );
    }

    /// Cancel timers, drop panels and cards, stop audio. Idempotent.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(w) = web::window() {
            for (_, handle) in self.exit_timers.borrow_mut().drain() {
                w.clear_timeout_with_handle(handle);
            }
        }
        self.panels.borrow_mut().clear();
        for (_, card) in self.cards.borrow_mut().drain() {
            card.remove();
        }
        self.playlist.shutdown();
        self.playlist.backend().close();
        log::info!("[app] disposed");
    }
}

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

/// The `pagehide` listener is the only strong owner of the context; every
/// other closure holds a `Weak` and goes quiet once it is dropped.
fn wire_teardown(ctx: Rc<AppContext>) {
    let slot = RefCell::new(Some(ctx));
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        if let Some(ctx) = slot.borrow_mut().take() {
            ctx.dispose();
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("galaxy-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Keep the backing store at CSS size * devicePixelRatio.
    wire_canvas_resize(&canvas);

    let config = dom::read_config(&document);
    let ctx = Rc::new(AppContext::new(document.clone(), canvas, config)?);

    overlay::show(&document);
    ctx.refresh_now_playing();

    events::wire_overlay_buttons(&ctx);
    events::wire_pointer_handlers(&ctx);
    events::wire_global_keydown(&ctx);
    frame::start_loop(Rc::downgrade(&ctx));
    wire_teardown(ctx);

    Ok(())
}
