/// DOM contract and painter tuning for the web front-end.
///
/// Element ids are shared with `index.html`; colours and sizes keep magic
/// numbers out of the painter and the card styling.
// Element ids
pub const CANVAS_ID: &str = "app-canvas";
pub const START_OVERLAY_ID: &str = "start-overlay";
pub const OVERLAY_OK_ID: &str = "overlay-ok";
pub const INFO_LAYER_ID: &str = "info-layer";
pub const NOW_PLAYING_ID: &str = "now-playing";
pub const CONFIG_SCRIPT_ID: &str = "app-config";

// CSS classes
pub const HIDDEN_CLASS: &str = "hidden";
pub const CARD_CLASS: &str = "info-card";
pub const CARD_TITLE_CLASS: &str = "info-card-title";
pub const CARD_BODY_CLASS: &str = "info-card-body";

// Painter colours
pub const BACKGROUND_COLOR: &str = "#05070d";
pub const HOVER_RING_COLOR: &str = "rgba(207, 231, 255, 0.9)";
pub const LEADER_LINE_COLOR: &str = "rgba(140, 180, 230, 0.8)";

// Bodies never shrink below this many CSS pixels on screen.
pub const MIN_BODY_RADIUS_PX: f64 = 1.5;
pub const HOVER_RING_WIDTH_PX: f64 = 1.5;
pub const HOVER_RING_GAP_PX: f64 = 3.0;
pub const LEADER_LINE_WIDTH_PX: f64 = 1.0;

// Picking uses a slightly inflated sphere so small planets stay hoverable.
pub const PICK_RADIUS_SCALE: f32 = 1.35;

// Frame deltas above this are treated as a resumed tab, not a slow frame.
pub const MAX_FRAME_DT_SEC: f32 = 0.25;
