// Web-side presentation constants. Simulation tuning lives in field-core.

/// Camera distance on the +z axis looking at the origin.
pub const CAMERA_Z: f32 = 8.0;

/// Near-black blue backdrop.
pub const CLEAR_COLOR: [f64; 4] = [0.016, 0.02, 0.045, 1.0];

/// Connection and interaction lines share one translucent color.
pub const LINE_COLOR: [f32; 4] = [0.545, 0.643, 0.769, 0.16];

/// Text the field forms under scroll.
pub const FORMATION_TEXT: &str = "ENTROPY";

/// Viewports narrower than this (CSS px) get the compact profile.
pub const COMPACT_WIDTH_PX: f64 = 768.0;

/// Pointer travel between press and release (backing-store px) above which
/// the release counts as the end of a drag, not a click.
pub const CLICK_MAX_TRAVEL_PX: f32 = 12.0;

/// Default master volume; the original mix is deliberately quiet.
pub const MASTER_GAIN_DEFAULT: f32 = 0.15;
