// Recording audio backend shared by the playlist tests.

#![allow(dead_code)]

use futures::channel::oneshot;
use galaxy_core::{AudioBackend, AudioError, PlayOptions, TrackId};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Play(String),
    Stop(String),
    SetVolume(f32),
    SetEnabled(bool),
}

/// How the next ungated `play` settles.
pub enum PlayBehavior {
    Succeed,
    Reject(&'static str),
}

type Gate = oneshot::Receiver<Result<(), AudioError>>;

#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Rc<Inner>,
}

#[derive(Default)]
struct Inner {
    initialized: Cell<bool>,
    enabled: Cell<bool>,
    volume: Cell<f32>,
    calls: RefCell<Vec<Call>>,
    behaviors: RefCell<VecDeque<PlayBehavior>>,
    gates: RefCell<HashMap<String, Gate>>,
    playing: RefCell<Vec<String>>,
}

impl MockBackend {
    pub fn ready() -> Self {
        let b = Self::default();
        b.inner.initialized.set(true);
        b.inner.enabled.set(true);
        b.inner.volume.set(0.5);
        b
    }

    pub fn uninitialized() -> Self {
        let b = Self::ready();
        b.inner.initialized.set(false);
        b
    }

    pub fn push_behavior(&self, behavior: PlayBehavior) {
        self.inner.behaviors.borrow_mut().push_back(behavior);
    }

    /// The next play of `track` stays pending until the returned sender
    /// settles it.
    pub fn gate(&self, track: &str) -> oneshot::Sender<Result<(), AudioError>> {
        let (tx, rx) = oneshot::channel();
        self.inner.gates.borrow_mut().insert(track.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.inner.calls.borrow_mut().clear();
    }

    /// Tracks the backend is currently sounding.
    pub fn playing(&self) -> Vec<String> {
        self.inner.playing.borrow().clone()
    }
}

impl AudioBackend for MockBackend {
    fn initialize(&self) -> bool {
        self.inner.initialized.set(true);
        true
    }

    fn is_initialized(&self) -> bool {
        self.inner.initialized.get()
    }

    fn play(
        &self,
        track: &TrackId,
        _options: PlayOptions,
    ) -> impl Future<Output = Result<(), AudioError>> {
        let id = track.as_str().to_string();
        self.inner.calls.borrow_mut().push(Call::Play(id.clone()));
        let gate = self.inner.gates.borrow_mut().remove(&id);
        let behavior = if gate.is_some() {
            PlayBehavior::Succeed
        } else {
            self.inner
                .behaviors
                .borrow_mut()
                .pop_front()
                .unwrap_or(PlayBehavior::Succeed)
        };
        let inner = self.inner.clone();
        let track = track.clone();
        async move {
            let result = match (gate, behavior) {
                (Some(rx), _) => rx
                    .await
                    .unwrap_or_else(|_| Err(AudioError::Unavailable("gate dropped".into()))),
                (None, PlayBehavior::Succeed) => Ok(()),
                (None, PlayBehavior::Reject(reason)) => Err(AudioError::Rejected {
                    track,
                    reason: reason.to_string(),
                }),
            };
            if result.is_ok() {
                inner.playing.borrow_mut().push(id);
            }
            result
        }
    }

    fn stop(&self, track: &TrackId) {
        let id = track.as_str().to_string();
        self.inner.playing.borrow_mut().retain(|t| t != &id);
        self.inner.calls.borrow_mut().push(Call::Stop(id));
    }

    fn volume(&self) -> f32 {
        self.inner.volume.get()
    }

    fn set_volume(&self, volume: f32) {
        self.inner.volume.set(volume);
        self.inner.calls.borrow_mut().push(Call::SetVolume(volume));
    }

    fn is_enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.set(enabled);
        self.inner.calls.borrow_mut().push(Call::SetEnabled(enabled));
    }
}
