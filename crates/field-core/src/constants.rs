// Shared tuning constants for the particle field. Values carried over from
// the production scene are kept verbatim so the feel survives retuning.

// Field population
pub const DEFAULT_PARTICLE_COUNT: usize = 5500;
pub const COMPACT_PARTICLE_COUNT: usize = 2200;
pub const NODE_COUNT: usize = 150; // indices below this are connection-eligible nodes

// Proximity graph
pub const MAX_LINES: usize = 600;
pub const RECOMPUTE_EVERY: u64 = 15; // frames between spatial-hash rebuilds
pub const CONN_DIST: f32 = 0.45; // connection threshold, also the hash cell size

// Kinematics
pub const LERP_SPEED: f32 = 0.04;
pub const DT_FRAME_CAP: f32 = 3.0; // cap dt (in 60fps frames) to avoid tab-resume jumps
pub const ENTRANCE_DURATION: f32 = 3.0; // faster lerp during the first seconds
pub const ORB_SPEED_FACTOR: f32 = 0.5;
pub const ORB_DRIFT_X: f32 = 0.008;
pub const ORB_DRIFT_Y: f32 = 0.005;
pub const ORB_CORE_RADIUS: f32 = 0.3; // no orbital drift inside this radius
pub const JITTER_AMP: f32 = 0.0004;
pub const BROWNIAN_AMP: f32 = 0.0015;
pub const BROWNIAN_FORMATION_CUTOFF: f32 = 0.4; // brownian drift fades out above this strength
pub const MOUSE_RADIUS: f32 = 2.5;
pub const MOUSE_FORCE: f32 = 0.08;
pub const GRAB_FORCE_FACTOR: f32 = 0.5; // attraction while grabbed is half the repulsion

// Formation strength ramps. Disengage is slower than engage on purpose:
// formation should feel responsive, dissolution organic.
pub const CURSOR_ENGAGE_PER_SEC: f32 = 1.25;
pub const CURSOR_DISENGAGE_PER_SEC: f32 = 0.4;
pub const POINTER_IDLE_TIMEOUT: f32 = 2.5;
pub const SCROLL_WINDOW_START: f32 = 0.05;
pub const SCROLL_WINDOW_END: f32 = 0.35;

// Vortex
pub const VORTEX_ZONE_RADIUS: f32 = 1.4; // central zone that engages the orbit
pub const VORTEX_ENGAGE_PER_SEC: f32 = 0.5;
pub const VORTEX_DISENGAGE_PER_SEC: f32 = 0.3;
pub const VORTEX_TILT_MIN_DEG: f32 = 25.0;
pub const VORTEX_TILT_MAX_DEG: f32 = 55.0;
pub const VORTEX_OMEGA: f32 = 0.9; // angular velocity scale at unit perpendicular distance
pub const VORTEX_EPS: f32 = 0.15; // floor for the inverse-3/2 law near the axis
pub const VORTEX_MIN_STRENGTH: f32 = 0.01; // below this the ring target is used unrotated

// Birth stagger
pub const BIRTH_DELAY_MAX: f32 = 2.0;
pub const BIRTH_FADE_DURATION: f32 = 1.2;

// Scale
pub const NODE_SCALE_MIN: f32 = 0.5;
pub const NODE_SCALE_SPAN: f32 = 0.2;
pub const DUST_SCALE_MIN: f32 = 0.12;
pub const DUST_SCALE_SPAN: f32 = 0.2;
pub const NODE_SIZE_MULT: f32 = 0.032;
pub const DUST_SIZE_MULT: f32 = 0.018;
pub const COMPACT_SIZE_BOOST: f32 = 1.8;
pub const PULSE_BASE: f32 = 0.9;
pub const PULSE_AMP: f32 = 0.1;
pub const PULSE_SPEED: f32 = 1.5;
pub const PROXIMITY_BOOST_BASE: f32 = 1.3;

// Layout geometry
pub const ENTROPY_SPREAD: [f32; 3] = [16.0, 10.0, 8.0];
pub const TEXT_SPREAD_X: f32 = 5.5;
pub const TEXT_SPREAD_Y: f32 = 2.4;
pub const TEXT_SPREAD_X_COMPACT: f32 = 2.8;
pub const TEXT_SPREAD_Y_COMPACT: f32 = 1.2;
pub const EVENT_HORIZON: f32 = 1.0;
pub const EVENT_HORIZON_COMPACT: f32 = 0.25;
pub const LENS_STRENGTH: f32 = 1.8;
pub const LENS_STRENGTH_COMPACT: f32 = 0.4;
pub const RING_RADIUS: f32 = 3.0;
pub const RING_RADIUS_COMPACT: f32 = 2.0;
pub const RING_THICKNESS: f32 = 0.5;

// Layer unlock thresholds: cumulative dwell seconds in the vortex zone.
// Layer 0 is implicit and always active.
pub const LAYER_THRESHOLDS: [f32; 6] = [0.0, 15.0, 30.0, 60.0, 90.0, 120.0];
pub const DWELL_MIN_VORTEX_STRENGTH: f32 = 0.3;
pub const COMPACT_LAYER_CAP_MASK: u8 = 0b0000_0111; // compact platforms render layers 0-2 only

// Layer 1: pair annihilation
pub const ANNIHILATION_INTERVAL: f32 = 2.5;
pub const ANNIHILATION_FLASH_DUR: f32 = 0.4;
pub const ANNIHILATION_FADE_DUR: f32 = 0.3;
pub const ANNIHILATION_REFORM_DUR: f32 = 0.5;
pub const ANNIHILATION_TOTAL: f32 =
    ANNIHILATION_FLASH_DUR + ANNIHILATION_FADE_DUR + ANNIHILATION_REFORM_DUR;
pub const ANNIHILATION_SEARCH_DIST: f32 = 0.8;
pub const ANNIHILATION_MAX_CONCURRENT: usize = 3;
pub const ANNIHILATION_SEARCH_ATTEMPTS: usize = 10;

// Layer 2: force lines
pub const FORCE_LINE_ENGAGE: f32 = 0.3; // seconds to full opacity
pub const FORCE_LINE_SEGMENTS: usize = 8;
pub const FORCE_LINE_ANCHOR_INTERVAL: f32 = 2.0;
pub const FORCE_LINE_MIN_OPACITY: f32 = 0.05;
pub const FORCE_LINE_BULGE: f32 = 0.4;

// Layer 3: decay cascades
pub const DECAY_INTERVAL: f32 = 3.5;
pub const DECAY_FLASH_DUR: f32 = 0.35;
pub const DECAY_SPLIT_DUR: f32 = 0.6;
pub const DECAY_SETTLE_DUR: f32 = 1.0;
pub const DECAY_TOTAL: f32 = DECAY_FLASH_DUR + DECAY_SPLIT_DUR + DECAY_SETTLE_DUR;
pub const DECAY_CHILD_COUNT: usize = 4;
pub const DECAY_MIN_CHILDREN: usize = 2;
pub const DECAY_EJECT_SPEED: f32 = 2.5;
pub const DECAY_CHILD_SEARCH_DIST_SQ: f32 = 1.5;
pub const DECAY_MAX_CONCURRENT: usize = 2;
pub const DECAY_ENTANGLE_FLASH_DIST: f32 = 1.5; // decay near a pair member flashes the partner

// Layer 4: condensation
pub const CONDENSATION_EXPAND_RATE: f32 = 0.4; // units/sec
pub const CONDENSATION_MAX_RADIUS: f32 = 3.0;
pub const CONDENSATION_BLEND_WINDOW: f32 = 1.5;
pub const CONDENSATION_BLEND_MAX: f32 = 0.6;
pub const CONDENSATION_CHAIN_SHRINK: f32 = 0.5; // radius lost per annihilation inside the core

// Layer 5: entanglement
pub const ENTANGLE_PAIR_COUNT: usize = 16;
pub const ENTANGLE_MIN_DIST: f32 = 3.0;
pub const ENTANGLE_SHUFFLE_INTERVAL: f32 = 12.0;
pub const ENTANGLE_SHUFFLE_ATTEMPTS: usize = 100;
pub const ENTANGLE_PULSE_SPEED: f32 = 2.5;
pub const ENTANGLE_PULSE_AMP: f32 = 0.6;
pub const PARTNER_FLASH_DUR: f32 = 0.3;

// Shockwaves (mask-independent side effects)
pub const SHOCKWAVE_SPEED: f32 = 3.0;
pub const SHOCKWAVE_THICKNESS: f32 = 0.8;
pub const SHOCKWAVE_DURATION: f32 = 1.2;
pub const SHOCKWAVE_BOOST: f32 = 1.5;

// Click handling
pub const CLICK_COOLDOWN: f32 = 0.8;
pub const SUPERNOVA_RADIUS: f32 = 2.5;
pub const SUPERNOVA_DURATION: f32 = 1.6;
pub const SUPERNOVA_INWARD_FRAC: f32 = 0.2; // leading fraction spent contracting
pub const SUPERNOVA_EJECT_DIST: f32 = 2.0;
pub const GRAVITY_WELL_RADIUS: f32 = 2.0;
pub const GRAVITY_WELL_DURATION: f32 = 1.2;
pub const GRAVITY_WELL_PULL: f32 = 0.6;
pub const TELEPORT_DURATION: f32 = 0.6;

// Post-click ambient events
pub const CASCADE_INTERVAL: f32 = 6.0;
pub const CASCADE_SPEED: f32 = 2.0;
pub const CASCADE_DURATION: f32 = 1.5;
pub const CASCADE_BAND: f32 = 0.6;
pub const FUSION_INTERVAL: f32 = 8.0;
pub const FUSION_ABSORB_DUR: f32 = 0.5;
pub const FUSION_FLASH_DUR: f32 = 0.3;
pub const FUSION_EJECT_DUR: f32 = 0.7;
pub const FUSION_TOTAL: f32 = FUSION_ABSORB_DUR + FUSION_FLASH_DUR + FUSION_EJECT_DUR;
pub const FUSION_SEARCH_DIST_SQ: f32 = 1.44;

// Monochrome blue-silver palette; subtle variation, not rainbow.
pub const PARTICLE_COLORS: [[f32; 3]; 8] = [
    [0.545, 0.643, 0.769], // muted steel blue
    [0.616, 0.710, 0.831], // light blue-gray
    [0.478, 0.580, 0.722], // deeper steel
    [0.690, 0.769, 0.871], // light steel blue
    [0.420, 0.518, 0.659], // mid blue-gray
    [0.639, 0.722, 0.816], // soft periwinkle gray
    [0.769, 0.831, 0.894], // pale silver-blue
    [0.361, 0.478, 0.612], // deeper navy-gray
];

// Warm accent the condensation core blends toward.
pub const CORE_COLOR: [f32; 3] = [0.961, 0.620, 0.043];
pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

// Fixed world anchors the force-line arcs thread through.
pub const PIPELINE_ANCHORS: [[f32; 3]; 6] = [
    [-4.5, 0.3, -0.5],
    [-2.5, -0.2, 0.3],
    [-0.5, 0.1, -0.2],
    [1.5, -0.3, 0.4],
    [3.5, 0.2, -0.3],
    [5.5, -0.1, 0.2],
];
