use std::time::Duration;

// Shared tuning constants for the info-card billboards and the music player.

// Billboard offset placement
pub const MIN_OFFSET_RADIUS: f32 = 2.0; // floor applied to the anchor's radius
pub const OFFSET_DISTANCE_GAIN: f32 = 0.1; // extra offset per unit of camera distance
pub const FORWARD_OFFSET_RATIO: f32 = 0.2; // pull toward the camera, avoids z-fighting
pub const VERTICAL_OFFSET_RATIO: f32 = 0.5;
pub const EDGE_THRESHOLD_X: f32 = 0.3; // NDC x beyond which the card flips sides
pub const EDGE_THRESHOLD_Y: f32 = 0.2; // NDC y above which the card drops below

// Billboard distance scaling
pub const SCALE_NUMERATOR: f32 = 0.8;
pub const SCALE_DISTANCE_GAIN: f32 = 0.1;
pub const SCALE_MIN: f32 = 0.5;
pub const SCALE_MAX: f32 = 1.5;

// Opacity fade
pub const OPACITY_SMOOTHING_PER_TICK: f32 = 0.15;
pub const REFERENCE_FRAME_RATE: f32 = 60.0;
pub const OPACITY_HIDDEN_THRESHOLD: f32 = 0.01; // below this the card ignores the pointer
pub const OPACITY_VISIBLE_THRESHOLD: f32 = 0.99;

// Hover
pub const HOVER_EXIT_DELAY: Duration = Duration::from_millis(150);

// Audio
pub const DEFAULT_VOLUME: f32 = 0.5;
pub const VOLUME_STEP: f32 = 0.05;

// Scene
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_BODY_COUNT: usize = 24;
pub const MAX_BODY_COUNT: usize = 512;
pub const DEFAULT_SPREAD: f32 = 40.0;

// Camera
pub const DEFAULT_CAMERA_DISTANCE: f32 = 70.0;
pub const DEFAULT_CAMERA_HEIGHT: f32 = 18.0;
pub const DEFAULT_ORBIT_SPEED: f32 = 0.05; // radians per second
pub const DEFAULT_FOV_DEGREES: f32 = 50.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

/// Exponential rate that reproduces `OPACITY_SMOOTHING_PER_TICK` at
/// `REFERENCE_FRAME_RATE`.
#[inline]
pub fn default_smoothing_rate() -> f32 {
    -(1.0 - OPACITY_SMOOTHING_PER_TICK).ln() * REFERENCE_FRAME_RATE
}
