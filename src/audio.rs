//! Web Audio implementation of the playlist's audio backend.
//!
//! Each track is an `HtmlAudioElement` created on first use and routed
//! through a `MediaElementAudioSourceNode` into a shared master gain. The
//! master gain carries `volume * enabled`, so muting keeps track positions.

use fnv::FnvHashMap;
use galaxy_core::{AudioBackend, AudioError, PlayOptions, TrackCatalog, TrackId};
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

struct Graph {
    ctx: web::AudioContext,
    master: web::GainNode,
}

struct Inner {
    files: FnvHashMap<TrackId, String>,
    graph: Option<Graph>,
    sources: FnvHashMap<TrackId, web::HtmlAudioElement>,
    volume: f32,
    enabled: bool,
}

impl Inner {
    fn apply_gain(&self) {
        if let Some(g) = &self.graph {
            let level = if self.enabled { self.volume } else { 0.0 };
            g.master.gain().set_value(level);
        }
    }

    fn source_for(&mut self, track: &TrackId) -> Result<web::HtmlAudioElement, AudioError> {
        if let Some(el) = self.sources.get(track) {
            return Ok(el.clone());
        }
        let graph = self
            .graph
            .as_ref()
            .ok_or_else(|| AudioError::Unavailable("audio context not started".into()))?;
        let url = self
            .files
            .get(track)
            .ok_or_else(|| AudioError::UnknownTrack(track.clone()))?;
        let el = web::HtmlAudioElement::new_with_src(url).map_err(|e| AudioError::Rejected {
            track: track.clone(),
            reason: format!("{:?}", e),
        })?;
        el.set_preload("auto");
        let node = graph
            .ctx
            .create_media_element_source(&el)
            .map_err(|e| AudioError::Unavailable(format!("{:?}", e)))?;
        node.connect_with_audio_node(&graph.master)
            .map_err(|e| AudioError::Unavailable(format!("{:?}", e)))?;
        log::debug!("[audio] created source for {} ({})", track, url);
        self.sources.insert(track.clone(), el.clone());
        Ok(el)
    }
}

/// Cheap handle; clones share the same graph.
#[derive(Clone)]
pub struct WebAudioBackend {
    inner: Rc<RefCell<Inner>>,
}

impl WebAudioBackend {
    pub fn new(catalog: &TrackCatalog, base_url: &str, volume: f32, enabled: bool) -> Self {
        let files = catalog
            .iter()
            .map(|t| (t.id.clone(), format!("{}{}", base_url, t.file)))
            .collect();
        Self {
            inner: Rc::new(RefCell::new(Inner {
                files,
                graph: None,
                sources: FnvHashMap::default(),
                volume: volume.clamp(0.0, 1.0),
                enabled,
            })),
        }
    }

    /// Stop every source and close the context.
    pub fn close(&self) {
        let mut inner = self.inner.borrow_mut();
        for el in inner.sources.values() {
            _ = el.pause();
        }
        inner.sources.clear();
        if let Some(graph) = inner.graph.take() {
            _ = graph.ctx.close();
        }
    }
}

impl AudioBackend for WebAudioBackend {
    /// Must run inside a user gesture, otherwise the context stays suspended.
    fn initialize(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        if let Some(g) = &inner.graph {
            _ = g.ctx.resume();
            return true;
        }
        let graph = match build_graph() {
            Ok(g) => g,
            Err(e) => {
                log::error!("[audio] init failed: {:?}", e);
                return false;
            }
        };
        _ = graph.ctx.resume();
        inner.graph = Some(graph);
        inner.apply_gain();
        log::info!("[audio] context ready");
        true
    }

    fn is_initialized(&self) -> bool {
        self.inner.borrow().graph.is_some()
    }

    fn play(
        &self,
        track: &TrackId,
        options: PlayOptions,
    ) -> impl Future<Output = Result<(), AudioError>> {
        let track = track.clone();
        let source = self.inner.borrow_mut().source_for(&track);
        let started: Result<js_sys::Promise, AudioError> = source.and_then(|el| {
            el.set_loop(options.looped);
            el.set_current_time(0.0);
            el.play().map_err(|e| AudioError::Rejected {
                track: track.clone(),
                reason: format!("{:?}", e),
            })
        });
        async move {
            let promise = started?;
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| AudioError::Rejected {
                    track,
                    reason: format!("{:?}", e),
                })
        }
    }

    fn stop(&self, track: &TrackId) {
        if let Some(el) = self.inner.borrow().sources.get(track) {
            _ = el.pause();
            el.set_current_time(0.0);
        }
    }

    fn volume(&self) -> f32 {
        self.inner.borrow().volume
    }

    fn set_volume(&self, volume: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.volume = volume.clamp(0.0, 1.0);
        inner.apply_gain();
    }

    fn is_enabled(&self) -> bool {
        self.inner.borrow().enabled
    }

    fn set_enabled(&self, enabled: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.enabled = enabled;
        inner.apply_gain();
    }
}

fn build_graph() -> Result<Graph, wasm_bindgen::JsValue> {
    let ctx = web::AudioContext::new()?;
    let master = web::GainNode::new(&ctx)?;
    master.connect_with_audio_node(&ctx.destination())?;
    Ok(Graph { ctx, master })
}
