use crate::catalog::TrackId;
use crate::error::AudioError;
use std::future::Future;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayOptions {
    pub looped: bool,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self { looped: true }
    }
}

/// Sound output used by the playlist controller.
///
/// Implementations own the actual sources (web: media elements routed through
/// a master gain). All methods take `&self`; a backend is expected to be a
/// cheap handle around shared, single-threaded state.
pub trait AudioBackend {
    /// Bring the output up. Returns whether the backend is now ready.
    fn initialize(&self) -> bool;

    fn is_initialized(&self) -> bool;

    /// Start `track` from the beginning. Resolves once the output has
    /// actually started (or failed to).
    fn play(
        &self,
        track: &TrackId,
        options: PlayOptions,
    ) -> impl Future<Output = Result<(), AudioError>>;

    fn stop(&self, track: &TrackId);

    fn volume(&self) -> f32;

    fn set_volume(&self, volume: f32);

    fn is_enabled(&self) -> bool;

    /// Mute gate. Disabling silences output without stopping sources.
    fn set_enabled(&self, enabled: bool);
}
