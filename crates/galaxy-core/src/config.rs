//! Application configuration.
//!
//! A closed structure: every section rejects unknown keys and every omitted
//! field falls back to the defaults in `constants`. `from_json` parses and
//! validates in one step.

use crate::billboard::Smoothing;
use crate::catalog::{TrackCatalog, TrackId};
use crate::constants::*;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub scene: SceneConfig,
    pub camera: CameraConfig,
    pub billboard: BillboardConfig,
    pub audio: AudioSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub seed: u64,
    pub body_count: usize,
    pub spread: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            body_count: DEFAULT_BODY_COUNT,
            spread: DEFAULT_SPREAD,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub distance: f32,
    pub height: f32,
    /// Radians per second.
    pub orbit_speed: f32,
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: DEFAULT_CAMERA_DISTANCE,
            height: DEFAULT_CAMERA_HEIGHT,
            orbit_speed: DEFAULT_ORBIT_SPEED,
            fov_degrees: DEFAULT_FOV_DEGREES,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BillboardConfig {
    pub smoothing: Smoothing,
    pub hover_exit_delay_ms: u64,
}

impl Default for BillboardConfig {
    fn default() -> Self {
        Self {
            smoothing: Smoothing::default(),
            hover_exit_delay_ms: HOVER_EXIT_DELAY.as_millis() as u64,
        }
    }
}

impl BillboardConfig {
    pub fn hover_exit_delay(&self) -> Duration {
        Duration::from_millis(self.hover_exit_delay_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioSettings {
    pub enabled: bool,
    pub volume: f32,
    /// Track started once the user unlocks audio. `None` waits for input.
    pub autoplay_track: Option<String>,
    /// Prefix for track files.
    pub base_url: String,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: DEFAULT_VOLUME,
            autoplay_track: Some("epic_march".to_string()),
            base_url: "/audio/".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range(
            "scene.body_count",
            self.scene.body_count as f64,
            1.0,
            MAX_BODY_COUNT as f64,
        )?;
        ConfigError::check_range("scene.spread", self.scene.spread as f64, 1.0, 10_000.0)?;
        ConfigError::check_range(
            "camera.distance",
            self.camera.distance as f64,
            1.0,
            (CAMERA_ZFAR * 0.5) as f64,
        )?;
        ConfigError::check_range(
            "camera.height",
            self.camera.height as f64,
            -(CAMERA_ZFAR as f64) * 0.5,
            (CAMERA_ZFAR as f64) * 0.5,
        )?;
        ConfigError::check_range(
            "camera.orbit_speed",
            self.camera.orbit_speed as f64,
            -std::f64::consts::TAU,
            std::f64::consts::TAU,
        )?;
        ConfigError::check_range(
            "camera.fov_degrees",
            self.camera.fov_degrees as f64,
            10.0,
            120.0,
        )?;
        match self.billboard.smoothing {
            Smoothing::PerTick { factor } => {
                ConfigError::check_range("billboard.smoothing.factor", factor as f64, 1e-3, 1.0)?
            }
            Smoothing::TimeBased { rate_per_sec } => ConfigError::check_range(
                "billboard.smoothing.rate_per_sec",
                rate_per_sec as f64,
                1e-3,
                1_000.0,
            )?,
        }
        ConfigError::check_range(
            "billboard.hover_exit_delay_ms",
            self.billboard.hover_exit_delay_ms as f64,
            0.0,
            5_000.0,
        )?;
        ConfigError::check_range("audio.volume", self.audio.volume as f64, 0.0, 1.0)?;
        if let Some(track) = &self.audio.autoplay_track {
            if TrackCatalog::soundtrack()
                .position(&TrackId::new(track.as_str()))
                .is_none()
            {
                return Err(ConfigError::UnknownTrack(track.clone()));
            }
        }
        Ok(())
    }
}
