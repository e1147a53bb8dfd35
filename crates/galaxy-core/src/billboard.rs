//! Floating info panels attached to 3D anchors.
//!
//! Each frame a panel is pushed off its anchor toward the emptier side of the
//! screen, pulled slightly toward the camera, turned to face the camera,
//! scaled by camera distance and faded toward its hover target.

use crate::camera::CameraView;
use crate::constants::*;
use crate::hover::{ExitTicket, HoverDebounce};
use fnv::FnvHashMap;
use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the opacity fade advances each frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case", deny_unknown_fields)]
pub enum Smoothing {
    /// Fixed blend per rendered frame; speed depends on the frame rate.
    PerTick { factor: f32 },
    /// `1 - exp(-rate * dt)`; same perceived speed at any frame rate.
    TimeBased { rate_per_sec: f32 },
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::TimeBased {
            rate_per_sec: default_smoothing_rate(),
        }
    }
}

impl Smoothing {
    #[inline]
    pub fn factor(self, dt: Duration) -> f32 {
        let f = match self {
            Smoothing::PerTick { factor } => factor,
            Smoothing::TimeBased { rate_per_sec } => {
                1.0 - (-rate_per_sec * dt.as_secs_f32()).exp()
            }
        };
        if f.is_finite() {
            f.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Where a panel is in its fade, inferred from hover and opacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelPhase {
    Hidden,
    Appearing,
    Visible,
    Disappearing,
}

/// Screen-aware offset of a panel from its anchor.
///
/// `project` maps world space to NDC. Returns `None` when the anchor cannot
/// be projected.
pub fn compute_offset(
    anchor: Vec3,
    camera_position: Vec3,
    project: impl Fn(Vec3) -> Option<Vec3>,
    base_radius: f32,
) -> Option<Vec3> {
    let ndc = project(anchor)?;
    let distance = camera_position.distance(anchor);
    let magnitude = base_radius.max(MIN_OFFSET_RADIUS) * (1.0 + distance * OFFSET_DISTANCE_GAIN);
    let (right, up, toward_camera) = screen_axes(anchor, camera_position);

    // Near the right edge go left; otherwise (left edge or center) go right.
    let horizontal = if ndc.x > EDGE_THRESHOLD_X { -1.0 } else { 1.0 };
    let vertical = if ndc.y > EDGE_THRESHOLD_Y {
        -VERTICAL_OFFSET_RATIO
    } else {
        VERTICAL_OFFSET_RATIO
    };

    Some(
        right * (horizontal * magnitude)
            + up * (vertical * magnitude)
            + toward_camera * (FORWARD_OFFSET_RATIO * magnitude),
    )
}

/// Panel scale for a camera distance, bounded to `[SCALE_MIN, SCALE_MAX]`.
#[inline]
pub fn distance_scale(distance: f32) -> f32 {
    if distance.is_nan() {
        return SCALE_MAX;
    }
    (SCALE_NUMERATOR / (distance * SCALE_DISTANCE_GAIN)).clamp(SCALE_MIN, SCALE_MAX)
}

/// Rotation that points the panel's +Z at the camera.
pub fn face_camera(position: Vec3, camera_position: Vec3, up: Vec3) -> Quat {
    let z = (camera_position - position).normalize_or_zero();
    if z == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut x = up.cross(z);
    if x.length_squared() < 1e-8 {
        x = z.any_orthonormal_vector();
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

/// Camera right, camera up and anchor-to-camera unit vectors.
fn screen_axes(anchor: Vec3, camera_position: Vec3) -> (Vec3, Vec3, Vec3) {
    let toward_camera = (camera_position - anchor).normalize_or_zero();
    if toward_camera == Vec3::ZERO {
        return (Vec3::X, Vec3::Y, Vec3::Z);
    }
    let view_dir = -toward_camera;
    let right = view_dir.cross(Vec3::Y);
    let right = if right.length_squared() < 1e-8 {
        Vec3::X
    } else {
        right.normalize()
    };
    let up = right.cross(view_dir).normalize();
    (right, up, toward_camera)
}

#[derive(Clone, Debug)]
pub struct PanelState {
    pub offset: Vec3,
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
    pub opacity: f32,
    /// Accepts pointer input. False once the panel has faded out.
    pub interactive: bool,
    hover: HoverDebounce,
    placed: bool,
}

impl PanelState {
    pub fn new(hover_exit_delay: Duration) -> Self {
        Self {
            offset: Vec3::ZERO,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: 1.0,
            opacity: 0.0,
            interactive: false,
            hover: HoverDebounce::new(hover_exit_delay),
            placed: false,
        }
    }

    pub fn hover(&self) -> &HoverDebounce {
        &self.hover
    }

    pub fn hover_mut(&mut self) -> &mut HoverDebounce {
        &mut self.hover
    }

    /// Whether a position has been computed at least once.
    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn phase(&self) -> PanelPhase {
        match (self.hover.is_active(), self.opacity) {
            (true, o) if o >= OPACITY_VISIBLE_THRESHOLD => PanelPhase::Visible,
            (true, _) => PanelPhase::Appearing,
            (false, o) if o < OPACITY_HIDDEN_THRESHOLD => PanelPhase::Hidden,
            (false, _) => PanelPhase::Disappearing,
        }
    }

    /// Advance one rendered frame.
    ///
    /// Without a camera (or when the anchor cannot be projected) the panel
    /// keeps its last placement; the fade still advances.
    pub fn update_frame<C: CameraView + ?Sized>(
        &mut self,
        anchor: Vec3,
        base_radius: f32,
        camera: Option<&C>,
        smoothing: Smoothing,
        dt: Duration,
    ) {
        if let Some(camera) = camera {
            let eye = camera.position();
            if let Some(offset) = compute_offset(anchor, eye, |p| camera.project(p), base_radius) {
                self.offset = offset;
                self.position = anchor + offset;
                self.orientation = face_camera(self.position, eye, camera.up());
                self.scale = distance_scale(eye.distance(anchor));
                self.placed = true;
            }
        }

        let target = if self.hover.is_active() { 1.0 } else { 0.0 };
        let f = smoothing.factor(dt);
        self.opacity = (self.opacity + (target - self.opacity) * f).clamp(0.0, 1.0);
        self.interactive = self.opacity >= OPACITY_HIDDEN_THRESHOLD;
    }

    /// Faded out with nothing left to wait for.
    pub fn is_retired(&self) -> bool {
        !self.hover.is_active() && !self.hover.is_pending() && self.phase() == PanelPhase::Hidden
    }
}

/// Identifies the body a panel is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub u32);

/// Live panels keyed by anchor. A panel exists from the first hover until it
/// has faded out after the last one.
#[derive(Debug)]
pub struct PanelSet {
    panels: FnvHashMap<AnchorId, PanelState>,
    smoothing: Smoothing,
    hover_exit_delay: Duration,
}

impl Default for PanelSet {
    fn default() -> Self {
        Self::new(Smoothing::default(), HOVER_EXIT_DELAY)
    }
}

impl PanelSet {
    pub fn new(smoothing: Smoothing, hover_exit_delay: Duration) -> Self {
        Self {
            panels: FnvHashMap::default(),
            smoothing,
            hover_exit_delay,
        }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn get(&self, id: AnchorId) -> Option<&PanelState> {
        self.panels.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnchorId, &PanelState)> {
        self.panels.iter().map(|(id, p)| (*id, p))
    }

    pub fn hover_enter(&mut self, id: AnchorId) {
        let delay = self.hover_exit_delay;
        self.panels
            .entry(id)
            .or_insert_with(|| PanelState::new(delay))
            .hover_mut()
            .enter();
        log::debug!("[hover] enter {:?}", id);
    }

    /// Arm the delayed exit for `id`. The caller schedules a timer and calls
    /// [`fire_exit`](Self::fire_exit) with the ticket when it expires.
    pub fn hover_exit(&mut self, id: AnchorId) -> Option<ExitTicket> {
        self.panels.get_mut(&id).and_then(|p| p.hover_mut().exit())
    }

    pub fn fire_exit(&mut self, id: AnchorId, ticket: ExitTicket) -> bool {
        let fired = self
            .panels
            .get_mut(&id)
            .map(|p| p.hover_mut().fire(ticket))
            .unwrap_or(false);
        if fired {
            log::debug!("[hover] exit {:?}", id);
        }
        fired
    }

    /// Advance every panel one frame and drop the ones that have faded out.
    ///
    /// `anchor_of` returns the anchor position and radius; a panel whose
    /// anchor is gone loses its hover and fades out. Returns removed ids.
    pub fn update_all<C: CameraView + ?Sized>(
        &mut self,
        camera: Option<&C>,
        dt: Duration,
        anchor_of: impl Fn(AnchorId) -> Option<(Vec3, f32)>,
    ) -> Vec<AnchorId> {
        let smoothing = self.smoothing;
        for (id, panel) in self.panels.iter_mut() {
            match anchor_of(*id) {
                Some((anchor, radius)) => {
                    panel.update_frame(anchor, radius, camera, smoothing, dt);
                }
                None => {
                    panel.hover_mut().cancel();
                    panel.update_frame(panel.position, 0.0, None::<&C>, smoothing, dt);
                }
            }
        }
        self.retire_hidden()
    }

    pub fn retire_hidden(&mut self) -> Vec<AnchorId> {
        let retired: Vec<AnchorId> = self
            .panels
            .iter()
            .filter(|(_, p)| p.is_retired())
            .map(|(id, _)| *id)
            .collect();
        for id in &retired {
            self.panels.remove(id);
        }
        retired
    }

    /// Teardown: cancel all pending exits and drop every panel.
    pub fn clear(&mut self) {
        for panel in self.panels.values_mut() {
            panel.hover_mut().cancel();
        }
        self.panels.clear();
    }
}
