//! Background-music transport over a fixed, ordered track catalog.
//!
//! The controller mirrors what the player is doing (`PlaybackState`) and
//! delegates sound to an [`AudioBackend`]. It is meant to be shared behind an
//! `Rc` on a single thread: every method takes `&self`, state lives in
//! `RefCell`/`Cell`, and no borrow is held across an `.await`.
//!
//! Overlapping requests are resolved with a request sequence number. Every
//! play, pause and shutdown takes a new number; a play that settles after a
//! newer request was issued is reported as [`TransportOutcome::Superseded`]
//! and never touches the state. A superseded play that did start sounding is
//! only left running while a newer request for the same track is still
//! pending, and is stopped as soon as that request fails or anything else is
//! requested.

use crate::audio::{AudioBackend, PlayOptions};
use crate::catalog::{TrackCatalog, TrackId, TrackInfo};
use crate::constants::VOLUME_STEP;
use crate::error::AudioError;
use std::cell::{Cell, RefCell};

#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub current_track: Option<TrackId>,
    pub is_playing: bool,
    pub current_index: usize,
    pub enabled: bool,
    pub volume: f32,
}

impl PlaybackState {
    pub fn new(enabled: bool, volume: f32) -> Self {
        Self {
            current_track: None,
            is_playing: false,
            current_index: 0,
            enabled,
            volume: volume.clamp(0.0, 1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    NotInitialized,
    Disabled,
    NoCurrentTrack,
    EmptyCatalog,
    InvalidVolume,
}

/// What a transport request ended up doing.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportOutcome {
    Started(TrackId),
    Paused,
    /// Enable flag or volume changed.
    Adjusted,
    Failed(AudioError),
    /// A newer request was issued while this one was in flight.
    Superseded,
    Ignored(IgnoreReason),
}

/// User-facing transport actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportCommand {
    TogglePlayback,
    Next,
    Previous,
    ToggleEnabled,
    VolumeUp,
    VolumeDown,
}

impl TransportCommand {
    #[inline]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " => Some(TransportCommand::TogglePlayback),
            "ArrowRight" | "n" | "N" => Some(TransportCommand::Next),
            "ArrowLeft" | "b" | "B" => Some(TransportCommand::Previous),
            "m" | "M" => Some(TransportCommand::ToggleEnabled),
            "+" | "=" => Some(TransportCommand::VolumeUp),
            "-" | "_" => Some(TransportCommand::VolumeDown),
            _ => None,
        }
    }
}

pub struct PlaylistController<B: AudioBackend> {
    backend: B,
    catalog: TrackCatalog,
    state: RefCell<PlaybackState>,
    latest_request: Cell<u64>,
    latest_target: RefCell<Option<TrackId>>,
    latest_failed: Cell<bool>,
    /// Superseded play still sounding, waiting on a newer play of the same
    /// track.
    lingering: RefCell<Option<TrackId>>,
    in_flight: Cell<u32>,
}

impl<B: AudioBackend> PlaylistController<B> {
    /// Starts with no track and nothing playing; enable flag and volume are
    /// mirrored from the backend.
    pub fn new(backend: B, catalog: TrackCatalog) -> Self {
        let state = PlaybackState::new(backend.is_enabled(), backend.volume());
        Self {
            backend,
            catalog,
            state: RefCell::new(state),
            latest_request: Cell::new(0),
            latest_target: RefCell::new(None),
            latest_failed: Cell::new(false),
            lingering: RefCell::new(None),
            in_flight: Cell::new(0),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state.borrow().clone()
    }

    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn current_info(&self) -> Option<&TrackInfo> {
        let current = self.state.borrow().current_track.clone();
        current.and_then(|id| self.catalog.info(&id))
    }

    /// Initialize the backend and push the mirrored volume and enable flag.
    pub fn initialize(&self) -> bool {
        let ready = self.backend.initialize();
        if ready {
            let (enabled, volume) = {
                let s = self.state.borrow();
                (s.enabled, s.volume)
            };
            self.backend.set_volume(volume);
            self.backend.set_enabled(enabled);
        } else {
            log::warn!("[audio] backend failed to initialize");
        }
        ready
    }

    pub async fn play_track(&self, track: TrackId) -> TransportOutcome {
        if !self.backend.is_initialized() {
            log::debug!("[audio] play `{}` ignored: not initialized", track);
            return TransportOutcome::Ignored(IgnoreReason::NotInitialized);
        }
        if !self.state.borrow().enabled {
            log::debug!("[audio] play `{}` ignored: disabled", track);
            return TransportOutcome::Ignored(IgnoreReason::Disabled);
        }

        let seq = self.issue(Some(track.clone()));
        let playing = {
            let s = self.state.borrow();
            if s.is_playing {
                s.current_track.clone()
            } else {
                None
            }
        };
        if let Some(previous) = playing {
            self.backend.stop(&previous);
        }

        self.in_flight.set(self.in_flight.get() + 1);
        let result = self.backend.play(&track, PlayOptions { looped: true }).await;
        self.in_flight.set(self.in_flight.get().saturating_sub(1));
        let is_latest = seq == self.latest_request.get();

        match result {
            Ok(()) if !is_latest => {
                let newest = self.latest_target.borrow().clone();
                if newest.as_ref() == Some(&track) && !self.latest_failed.get() {
                    *self.lingering.borrow_mut() = Some(track.clone());
                } else {
                    self.backend.stop(&track);
                }
                log::debug!("[audio] play `{}` superseded", track);
                TransportOutcome::Superseded
            }
            Ok(()) => {
                self.lingering.borrow_mut().take();
                let index = self.catalog.position(&track);
                let mut s = self.state.borrow_mut();
                match index {
                    Some(i) => s.current_index = i,
                    None => log::warn!("[audio] `{}` is not in the catalog", track),
                }
                s.current_track = Some(track.clone());
                s.is_playing = true;
                log::info!("[audio] playing `{}` (index {})", track, s.current_index);
                TransportOutcome::Started(track)
            }
            Err(e) => {
                if is_latest {
                    self.latest_failed.set(true);
                    let lingering = self.lingering.borrow_mut().take();
                    if let Some(stale) = lingering {
                        self.backend.stop(&stale);
                    }
                }
                log::warn!("[audio] failed to play `{}`: {}", track, e);
                TransportOutcome::Failed(e)
            }
        }
    }

    pub fn pause_track(&self) -> TransportOutcome {
        if !self.backend.is_initialized() {
            return TransportOutcome::Ignored(IgnoreReason::NotInitialized);
        }
        let current = self.state.borrow().current_track.clone();
        if current.is_none() && self.in_flight.get() == 0 {
            return TransportOutcome::Ignored(IgnoreReason::NoCurrentTrack);
        }
        // Also cancels a first play that has not settled yet.
        self.issue(None);
        if let Some(track) = &current {
            self.backend.stop(track);
        }
        self.state.borrow_mut().is_playing = false;
        log::info!("[audio] paused {:?}", current.as_ref().map(TrackId::as_str));
        TransportOutcome::Paused
    }

    pub async fn resume_track(&self) -> TransportOutcome {
        let current = self.state.borrow().current_track.clone();
        match current {
            Some(track) => self.play_track(track).await,
            None => TransportOutcome::Ignored(IgnoreReason::NoCurrentTrack),
        }
    }

    pub async fn next_track(&self) -> TransportOutcome {
        let index = self.catalog.next_index(self.state.borrow().current_index);
        self.play_index(index).await
    }

    pub async fn previous_track(&self) -> TransportOutcome {
        let index = self
            .catalog
            .previous_index(self.state.borrow().current_index);
        self.play_index(index).await
    }

    /// Pause when playing, otherwise resume the current track or start the
    /// one at `current_index`.
    pub async fn toggle_playback(&self) -> TransportOutcome {
        let (playing, has_track, index) = {
            let s = self.state.borrow();
            (s.is_playing, s.current_track.is_some(), s.current_index)
        };
        if playing {
            self.pause_track()
        } else if has_track {
            self.resume_track().await
        } else {
            self.play_index(self.catalog.get(index).map(|_| index)).await
        }
    }

    /// Mute gate only: a playing track keeps its position and its state.
    pub fn set_enabled(&self, enabled: bool) -> TransportOutcome {
        self.state.borrow_mut().enabled = enabled;
        self.backend.set_enabled(enabled);
        log::info!("[audio] enabled={}", enabled);
        TransportOutcome::Adjusted
    }

    /// Clamp to [0, 1] and forward. Non-finite input is ignored.
    pub fn set_volume(&self, volume: f32) -> TransportOutcome {
        if !volume.is_finite() {
            log::debug!("[audio] ignoring non-finite volume {}", volume);
            return TransportOutcome::Ignored(IgnoreReason::InvalidVolume);
        }
        let v = volume.clamp(0.0, 1.0);
        self.state.borrow_mut().volume = v;
        self.backend.set_volume(v);
        TransportOutcome::Adjusted
    }

    pub async fn execute(&self, command: TransportCommand) -> TransportOutcome {
        match command {
            TransportCommand::TogglePlayback => self.toggle_playback().await,
            TransportCommand::Next => self.next_track().await,
            TransportCommand::Previous => self.previous_track().await,
            TransportCommand::ToggleEnabled => {
                let enabled = self.state.borrow().enabled;
                self.set_enabled(!enabled)
            }
            TransportCommand::VolumeUp => {
                let v = self.state.borrow().volume;
                self.set_volume(v + VOLUME_STEP)
            }
            TransportCommand::VolumeDown => {
                let v = self.state.borrow().volume;
                self.set_volume(v - VOLUME_STEP)
            }
        }
    }

    /// Stop output and drop any in-flight request. Used on teardown.
    pub fn shutdown(&self) {
        self.issue(None);
        let playing = {
            let mut s = self.state.borrow_mut();
            let track = s.current_track.clone().filter(|_| s.is_playing);
            s.is_playing = false;
            track
        };
        if let Some(track) = playing {
            self.backend.stop(&track);
        }
        log::info!("[audio] playlist shut down");
    }

    async fn play_index(&self, index: Option<usize>) -> TransportOutcome {
        let track = index.and_then(|i| self.catalog.get(i)).map(|t| t.id.clone());
        match track {
            Some(track) => self.play_track(track).await,
            None => TransportOutcome::Ignored(IgnoreReason::EmptyCatalog),
        }
    }

    fn issue(&self, target: Option<TrackId>) -> u64 {
        let seq = self.latest_request.get() + 1;
        self.latest_request.set(seq);
        self.latest_failed.set(false);
        let stale = {
            let mut lingering = self.lingering.borrow_mut();
            if lingering.is_some() && *lingering != target {
                lingering.take()
            } else {
                None
            }
        };
        if let Some(stale) = stale {
            self.backend.stop(&stale);
        }
        *self.latest_target.borrow_mut() = target;
        seq
    }
}
