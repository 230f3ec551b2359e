//! Progressive interaction layers.
//!
//! The longer the pointer dwells near the field's center watching the
//! vortex, the more interaction types unlock. All effects reuse existing
//! particles: events override instance scale/color and add position
//! offsets, but never touch the canonical position arrays, so every effect
//! is pure elapsed-time math that catches up after a dropped frame.
//!
//! Layer 0:   0s  — vortex (handled by the formation blender)
//! Layer 1:  15s  — pair annihilation (flash + swap)
//! Layer 2:  30s  — force lines (pipeline arcs)
//! Layer 3:  60s  — decay cascades (node splits into dust children)
//! Layer 4:  90s  — field condensation (warm core)
//! Layer 5: 120s  — entanglement pairs (distant sync + lines)

use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;

use crate::constants::*;
use crate::grid::LineBuffer;
use crate::store::{ParticleInstance, ParticleStore};

/// Pure unlock rule over the cumulative dwell accumulator. Thresholds are
/// dwell seconds, not wall-clock, so a single large `dt` can set several
/// bits at once.
pub fn unlocked_layers(dwell_secs: f32) -> u8 {
    let mut mask = 0u8;
    for (l, threshold) in LAYER_THRESHOLDS.iter().enumerate() {
        if dwell_secs >= *threshold {
            mask |= 1 << l;
        }
    }
    mask
}

#[inline]
fn has_layer(mask: u8, layer: u8) -> bool {
    mask & (1 << layer) != 0
}

/// Per-tick sonification record. The caller fires each synthesis function
/// at most once per tick per set flag.
#[derive(Clone, Copy, Debug, Default)]
pub struct AudioTriggers {
    pub annihilation: bool,
    pub decay: bool,
    pub entanglement: bool,
    pub shockwave: bool,
    pub supernova: bool,
    /// Strength of the continuous condensation hum, when active.
    pub condensation: Option<f32>,
}

/// Transient, time-boxed animation events. Each variant captures the state
/// it needs at trigger time; lifecycle is `elapsed = now - start` evaluated
/// fresh each frame, removal once `elapsed` passes the total duration.
#[derive(Clone, Debug)]
pub enum LayerEvent {
    Annihilation {
        a: u32,
        b: u32,
        start: f32,
        a_pos: Vec3,
        b_pos: Vec3,
    },
    Decay {
        source: u32,
        start: f32,
        children: SmallVec<[u32; 4]>,
        dirs: SmallVec<[Vec3; 4]>,
    },
    Shockwave {
        center: Vec3,
        start: f32,
    },
    Supernova {
        center: Vec3,
        start: f32,
        affected: Vec<(u32, Vec3)>,
    },
    GravityWell {
        center: Vec3,
        start: f32,
    },
    Teleport {
        index: u32,
        from: Vec3,
        to: Vec3,
        start: f32,
    },
    ColorCascade {
        center: Vec3,
        start: f32,
    },
    Fusion {
        node: u32,
        dust: u32,
        start: f32,
        node_pos: Vec3,
        dust_pos: Vec3,
        eject_dir: Vec3,
    },
    PartnerFlash {
        index: u32,
        start: f32,
    },
}

impl LayerEvent {
    pub fn start(&self) -> f32 {
        match self {
            LayerEvent::Annihilation { start, .. }
            | LayerEvent::Decay { start, .. }
            | LayerEvent::Shockwave { start, .. }
            | LayerEvent::Supernova { start, .. }
            | LayerEvent::GravityWell { start, .. }
            | LayerEvent::Teleport { start, .. }
            | LayerEvent::ColorCascade { start, .. }
            | LayerEvent::Fusion { start, .. }
            | LayerEvent::PartnerFlash { start, .. } => *start,
        }
    }

    pub fn total_duration(&self) -> f32 {
        match self {
            LayerEvent::Annihilation { .. } => ANNIHILATION_TOTAL,
            LayerEvent::Decay { .. } => DECAY_TOTAL,
            LayerEvent::Shockwave { .. } => SHOCKWAVE_DURATION,
            LayerEvent::Supernova { .. } => SUPERNOVA_DURATION,
            LayerEvent::GravityWell { .. } => GRAVITY_WELL_DURATION,
            LayerEvent::Teleport { .. } => TELEPORT_DURATION,
            LayerEvent::ColorCascade { .. } => CASCADE_DURATION,
            LayerEvent::Fusion { .. } => FUSION_TOTAL,
            LayerEvent::PartnerFlash { .. } => PARTNER_FLASH_DUR,
        }
    }
}

pub struct LayerTickInput {
    pub time: f32,
    pub dt: f32,
    pub in_vortex_zone: bool,
    pub vortex_strength: f32,
    pub compact: bool,
}

pub struct InteractionEngine {
    dwell_accum: f32,
    layer_mask: u8,
    events: Vec<LayerEvent>,

    last_annihilation: f32,
    last_decay: f32,

    force_line_strength: f32,
    anchors: SmallVec<[u32; 6]>,
    last_anchor_update: f32,

    condensation_radius: f32,
    /// Original colors stashed once before condensation modifies them, so
    /// repeated blends never compound.
    original_colors: Option<Vec<[f32; 3]>>,

    entangled_pairs: Vec<(u32, u32)>,
    last_entangle_shuffle: f32,

    pending_click: Option<Vec3>,
    last_click: f32,
    has_clicked: bool,
    last_cascade: f32,
    last_fusion: f32,

    rng: StdRng,
}

impl InteractionEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            dwell_accum: 0.0,
            layer_mask: 0,
            events: Vec::new(),
            last_annihilation: 0.0,
            last_decay: 0.0,
            force_line_strength: 0.0,
            anchors: SmallVec::new(),
            last_anchor_update: 0.0,
            condensation_radius: 0.0,
            original_colors: None,
            entangled_pairs: Vec::new(),
            last_entangle_shuffle: 0.0,
            pending_click: None,
            last_click: f32::MIN,
            has_clicked: false,
            last_cascade: 0.0,
            last_fusion: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn dwell_secs(&self) -> f32 {
        self.dwell_accum
    }

    #[inline]
    pub fn layer_mask(&self) -> u8 {
        self.layer_mask
    }

    /// What is actually rendered: compact platforms cap at layer 2 while the
    /// accumulator keeps counting, so a later viewport change reveals
    /// already-earned layers.
    #[inline]
    pub fn effective_mask(&self, compact: bool) -> u8 {
        if compact {
            self.layer_mask & COMPACT_LAYER_CAP_MASK
        } else {
            self.layer_mask
        }
    }

    #[inline]
    pub fn has_clicked(&self) -> bool {
        self.has_clicked
    }

    #[inline]
    pub fn active_event_count(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn condensation_radius(&self) -> f32 {
        self.condensation_radius
    }

    #[inline]
    pub fn entangled_pairs(&self) -> &[(u32, u32)] {
        &self.entangled_pairs
    }

    /// Queue a click at a world position. One pending click is consumed per
    /// cooldown window; extras are dropped.
    pub fn queue_click(&mut self, world: Vec3) {
        if self.pending_click.is_none() {
            self.pending_click = Some(world);
        }
    }

    /// Seed the dwell accumulator from a host that mirrors the dwell state.
    /// Unlock bits are recomputed on the next tick.
    pub fn restore_dwell(&mut self, secs: f32) {
        self.dwell_accum = secs;
    }

    /// Phase-2 pass. Reads the just-integrated positions as authoritative,
    /// mutates instances via overrides and appends event lines after the
    /// tensor region.
    pub fn tick(
        &mut self,
        store: &mut ParticleStore,
        instances: &mut [ParticleInstance],
        lines: &mut LineBuffer,
        input: &LayerTickInput,
    ) -> AudioTriggers {
        let mut audio = AudioTriggers::default();
        let time = input.time;

        if input.in_vortex_zone && input.vortex_strength > DWELL_MIN_VORTEX_STRENGTH {
            self.dwell_accum += input.dt;
        }
        let unlocked = unlocked_layers(self.dwell_accum);
        let newly = unlocked & !self.layer_mask;
        if newly != 0 {
            for l in 0..LAYER_THRESHOLDS.len() as u8 {
                if has_layer(newly, l) {
                    log::info!("interaction layer {l} unlocked at dwell {:.1}s", self.dwell_accum);
                }
            }
        }
        // Bits are never cleared for the lifetime of the session.
        self.layer_mask |= unlocked;
        let mask = self.effective_mask(input.compact);

        // A field with no nodes (reduced-motion hosts run zero particles)
        // has nothing to trigger on; dwell still accumulated above.
        if store.node_count == 0 {
            lines.begin_extra();
            return audio;
        }

        self.trigger_annihilation(store, mask, time, &mut audio);
        self.trigger_decay(store, mask, time, &mut audio);
        self.update_entanglement(store, mask, time, &mut audio);
        self.update_condensation(store, mask, time, input.dt, &mut audio);
        self.resolve_click(store, mask, time, &mut audio);
        self.trigger_post_click(store, time, &mut audio);

        self.animate_events(store, instances, time, &mut audio);

        lines.begin_extra();
        self.write_force_lines(store, lines, mask, time, input.dt);
        self.write_entanglement(store, instances, lines, mask, time);

        audio
    }

    // ---------------- triggers ----------------

    fn trigger_annihilation(
        &mut self,
        store: &ParticleStore,
        mask: u8,
        time: f32,
        audio: &mut AudioTriggers,
    ) {
        if !has_layer(mask, 1) {
            return;
        }
        let concurrent = self
            .events
            .iter()
            .filter(|e| matches!(e, LayerEvent::Annihilation { .. }))
            .count();
        if time - self.last_annihilation <= ANNIHILATION_INTERVAL
            || concurrent >= ANNIHILATION_MAX_CONCURRENT
        {
            return;
        }
        // No pair in range is not an error; the timer retries next interval.
        let Some((a, b)) = self.find_annihilation_pair(store) else {
            return;
        };
        let a_pos = store.position(a as usize);
        let b_pos = store.position(b as usize);
        self.events.push(LayerEvent::Annihilation {
            a,
            b,
            start: time,
            a_pos,
            b_pos,
        });
        self.events.push(LayerEvent::Shockwave {
            center: (a_pos + b_pos) * 0.5,
            start: time,
        });
        self.last_annihilation = time;
        audio.annihilation = true;
        audio.shockwave = true;
    }

    fn find_annihilation_pair(&mut self, store: &ParticleStore) -> Option<(u32, u32)> {
        let threshold_sq = ANNIHILATION_SEARCH_DIST * ANNIHILATION_SEARCH_DIST;
        for _ in 0..ANNIHILATION_SEARCH_ATTEMPTS {
            let a = self.rng.gen_range(0..store.node_count);
            let pa = store.position(a);
            let mut best = None;
            let mut best_d = threshold_sq;
            for j in 0..store.node_count {
                if j == a {
                    continue;
                }
                let d = pa.distance_squared(store.position(j));
                if d < best_d {
                    best_d = d;
                    best = Some(j);
                }
            }
            if let Some(b) = best {
                return Some((a as u32, b as u32));
            }
        }
        None
    }

    fn trigger_decay(
        &mut self,
        store: &ParticleStore,
        mask: u8,
        time: f32,
        audio: &mut AudioTriggers,
    ) {
        if !has_layer(mask, 3) {
            return;
        }
        let concurrent = self
            .events
            .iter()
            .filter(|e| matches!(e, LayerEvent::Decay { .. }))
            .count();
        if time - self.last_decay <= DECAY_INTERVAL || concurrent >= DECAY_MAX_CONCURRENT {
            return;
        }
        let source = self.rng.gen_range(0..store.node_count);
        let src_pos = store.position(source);

        // Children are always dust: nodes stay primary targets, dust gets
        // ejected and eased back.
        let mut children: SmallVec<[u32; 4]> = SmallVec::new();
        for i in store.node_count..store.count {
            if children.len() >= DECAY_CHILD_COUNT {
                break;
            }
            if src_pos.distance_squared(store.position(i)) < DECAY_CHILD_SEARCH_DIST_SQ {
                children.push(i as u32);
            }
        }
        if children.len() < DECAY_MIN_CHILDREN {
            return;
        }
        let dirs: SmallVec<[Vec3; 4]> = (0..children.len())
            .map(|_| {
                let theta = self.rng.gen::<f32>() * std::f32::consts::TAU;
                let phi = self.rng.gen::<f32>() * std::f32::consts::PI
                    - std::f32::consts::FRAC_PI_2;
                Vec3::new(
                    theta.cos() * phi.cos(),
                    phi.sin(),
                    theta.sin() * phi.cos(),
                )
            })
            .collect();

        // Cross-layer coupling: a decay landing near an entangled pair
        // member gives the partner an immediate flash.
        if has_layer(mask, 5) {
            let flash_dist_sq = DECAY_ENTANGLE_FLASH_DIST * DECAY_ENTANGLE_FLASH_DIST;
            let mut flashes: SmallVec<[u32; 4]> = SmallVec::new();
            for &(a, b) in &self.entangled_pairs {
                if src_pos.distance_squared(store.position(a as usize)) < flash_dist_sq {
                    flashes.push(b);
                } else if src_pos.distance_squared(store.position(b as usize)) < flash_dist_sq {
                    flashes.push(a);
                }
            }
            for index in flashes {
                self.events.push(LayerEvent::PartnerFlash { index, start: time });
            }
        }

        self.events.push(LayerEvent::Decay {
            source: source as u32,
            start: time,
            children,
            dirs,
        });
        self.events.push(LayerEvent::Shockwave {
            center: src_pos,
            start: time,
        });
        self.last_decay = time;
        audio.decay = true;
        audio.shockwave = true;
    }

    fn update_entanglement(
        &mut self,
        store: &ParticleStore,
        mask: u8,
        time: f32,
        audio: &mut AudioTriggers,
    ) {
        if !has_layer(mask, 5) {
            return;
        }
        if time - self.last_entangle_shuffle > ENTANGLE_SHUFFLE_INTERVAL
            || self.entangled_pairs.is_empty()
        {
            self.entangled_pairs = self.find_entangled_pairs(store);
            self.last_entangle_shuffle = time;
            if !self.entangled_pairs.is_empty() {
                audio.entanglement = true;
            }
        }
    }

    fn find_entangled_pairs(&mut self, store: &ParticleStore) -> Vec<(u32, u32)> {
        let mut pairs = Vec::new();
        let mut used = vec![false; store.node_count];
        let min_dist_sq = ENTANGLE_MIN_DIST * ENTANGLE_MIN_DIST;
        for _ in 0..ENTANGLE_SHUFFLE_ATTEMPTS {
            if pairs.len() >= ENTANGLE_PAIR_COUNT {
                break;
            }
            let a = self.rng.gen_range(0..store.node_count);
            let b = self.rng.gen_range(0..store.node_count);
            if a == b || used[a] || used[b] {
                continue;
            }
            if store.position(a).distance_squared(store.position(b)) >= min_dist_sq {
                pairs.push((a as u32, b as u32));
                used[a] = true;
                used[b] = true;
            }
        }
        pairs
    }

    fn update_condensation(
        &mut self,
        store: &mut ParticleStore,
        mask: u8,
        _time: f32,
        dt: f32,
        audio: &mut AudioTriggers,
    ) {
        if !has_layer(mask, 4) {
            return;
        }
        // Stash once; the blend below always reads from this copy so calling
        // it twice in a row cannot compound.
        if self.original_colors.is_none() {
            self.original_colors = Some(store.live_colors.clone());
        }
        self.condensation_radius = (self.condensation_radius
            + CONDENSATION_EXPAND_RATE * dt)
            .min(CONDENSATION_MAX_RADIUS);

        let originals = self.original_colors.as_ref().unwrap();
        let r = self.condensation_radius;
        for i in 0..store.node_count {
            let dist = store.position(i).length();
            if dist < r {
                let blend =
                    ((r - dist) / CONDENSATION_BLEND_WINDOW).min(1.0) * CONDENSATION_BLEND_MAX;
                store.live_colors[i] = lerp_color(originals[i], CORE_COLOR, blend);
            }
        }
        audio.condensation = Some((r / CONDENSATION_MAX_RADIUS).min(1.0));
    }

    fn resolve_click(
        &mut self,
        store: &ParticleStore,
        mask: u8,
        time: f32,
        audio: &mut AudioTriggers,
    ) {
        if time - self.last_click < CLICK_COOLDOWN {
            return;
        }
        let Some(world) = self.pending_click.take() else {
            return;
        };
        let Some(clicked) = nearest_node(store, world) else {
            return;
        };
        self.last_click = time;
        self.has_clicked = true;
        let pos = store.position(clicked);

        // Strict precedence by highest unlocked layer; exactly one outcome.
        if has_layer(mask, 5) {
            if let Some(partner) = self.partner_of(clicked as u32) {
                self.events.push(LayerEvent::Teleport {
                    index: clicked as u32,
                    from: pos,
                    to: store.position(partner as usize),
                    start: time,
                });
                audio.entanglement = true;
                return;
            }
        }
        if has_layer(mask, 4) {
            let mut affected = Vec::new();
            for i in 0..store.node_count {
                let p = store.position(i);
                if p.distance_squared(pos) < SUPERNOVA_RADIUS * SUPERNOVA_RADIUS {
                    let dir = (p - pos).try_normalize().unwrap_or_else(|| {
                        let theta = self.rng.gen::<f32>() * std::f32::consts::TAU;
                        Vec3::new(theta.cos(), theta.sin(), 0.0)
                    });
                    affected.push((i as u32, dir));
                }
            }
            self.events.push(LayerEvent::Supernova {
                center: pos,
                start: time,
                affected,
            });
            self.events.push(LayerEvent::Shockwave {
                center: pos,
                start: time,
            });
            audio.supernova = true;
            audio.shockwave = true;
            return;
        }
        if has_layer(mask, 2) || has_layer(mask, 3) {
            self.events.push(LayerEvent::GravityWell {
                center: pos,
                start: time,
            });
            audio.shockwave = true;
            return;
        }
        if has_layer(mask, 1) {
            // Forced annihilation: pair the clicked node with its nearest
            // neighbor, no search-radius requirement.
            let mut best = None;
            let mut best_d = f32::MAX;
            for j in 0..store.node_count {
                if j == clicked {
                    continue;
                }
                let d = pos.distance_squared(store.position(j));
                if d < best_d {
                    best_d = d;
                    best = Some(j);
                }
            }
            if let Some(b) = best {
                self.events.push(LayerEvent::Annihilation {
                    a: clicked as u32,
                    b: b as u32,
                    start: time,
                    a_pos: pos,
                    b_pos: store.position(b),
                });
                self.events.push(LayerEvent::Shockwave {
                    center: (pos + store.position(b)) * 0.5,
                    start: time,
                });
                audio.annihilation = true;
                audio.shockwave = true;
            }
        }
    }

    fn partner_of(&self, index: u32) -> Option<u32> {
        self.entangled_pairs.iter().find_map(|&(a, b)| {
            if a == index {
                Some(b)
            } else if b == index {
                Some(a)
            } else {
                None
            }
        })
    }

    /// Color cascades and fusion events run indefinitely once the user has
    /// clicked at least once, independent of the layer mask.
    fn trigger_post_click(
        &mut self,
        store: &ParticleStore,
        time: f32,
        audio: &mut AudioTriggers,
    ) {
        if !self.has_clicked {
            return;
        }
        if time - self.last_cascade > CASCADE_INTERVAL {
            let i = self.rng.gen_range(0..store.node_count);
            self.events.push(LayerEvent::ColorCascade {
                center: store.position(i),
                start: time,
            });
            self.last_cascade = time;
            audio.entanglement = true;
        }
        if time - self.last_fusion > FUSION_INTERVAL {
            let node = self.rng.gen_range(0..store.node_count);
            let node_pos = store.position(node);
            let mut best = None;
            let mut best_d = FUSION_SEARCH_DIST_SQ;
            for i in store.node_count..store.count {
                let d = node_pos.distance_squared(store.position(i));
                if d < best_d {
                    best_d = d;
                    best = Some(i);
                }
            }
            // No dust nearby: skip, retry on the next interval.
            if let Some(dust) = best {
                let theta = self.rng.gen::<f32>() * std::f32::consts::TAU;
                let phi =
                    self.rng.gen::<f32>() * std::f32::consts::PI - std::f32::consts::FRAC_PI_2;
                self.events.push(LayerEvent::Fusion {
                    node: node as u32,
                    dust: dust as u32,
                    start: time,
                    node_pos,
                    dust_pos: store.position(dust),
                    eject_dir: Vec3::new(
                        theta.cos() * phi.cos(),
                        phi.sin(),
                        theta.sin() * phi.cos(),
                    ),
                });
                self.last_fusion = time;
                audio.annihilation = true;
            }
        }
    }

    // ---------------- animation ----------------

    fn animate_events(
        &mut self,
        store: &mut ParticleStore,
        instances: &mut [ParticleInstance],
        time: f32,
        _audio: &mut AudioTriggers,
    ) {
        let mut events = std::mem::take(&mut self.events);
        let mut condensation_shrink = 0.0f32;
        events.retain(|event| {
            let elapsed = time - event.start();
            if elapsed > event.total_duration() {
                match event {
                    LayerEvent::Annihilation { a_pos, b_pos, .. } => {
                        // Chain: annihilating inside the condensed core eats
                        // some of its radius.
                        let midpoint = (*a_pos + *b_pos) * 0.5;
                        if midpoint.length() < self.condensation_radius {
                            condensation_shrink += CONDENSATION_CHAIN_SHRINK;
                        }
                    }
                    LayerEvent::Teleport { index, to, .. } => {
                        store.set_position(*index as usize, *to);
                    }
                    _ => {}
                }
                return false;
            }
            apply_event(event, elapsed, store, instances);
            true
        });
        self.condensation_radius = (self.condensation_radius - condensation_shrink).max(0.0);
        self.events = events;
    }

    // ---------------- continuous line writers ----------------

    fn write_force_lines(
        &mut self,
        store: &ParticleStore,
        lines: &mut LineBuffer,
        mask: u8,
        time: f32,
        dt: f32,
    ) {
        if !has_layer(mask, 2) {
            self.force_line_strength = 0.0;
            return;
        }
        self.force_line_strength = (self.force_line_strength + dt / FORCE_LINE_ENGAGE).min(1.0);

        // Anchors map fixed pipeline coordinates to the nearest live node,
        // refreshed periodically rather than per frame.
        if time - self.last_anchor_update > FORCE_LINE_ANCHOR_INTERVAL || self.anchors.is_empty()
        {
            self.anchors = PIPELINE_ANCHORS
                .iter()
                .filter_map(|p| {
                    nearest_node(store, Vec3::from_array(*p)).map(|i| i as u32)
                })
                .collect();
            self.last_anchor_update = time;
        }

        if self.force_line_strength <= FORCE_LINE_MIN_OPACITY {
            return;
        }
        for a in 0..self.anchors.len().saturating_sub(1) {
            let from = store.position(self.anchors[a] as usize);
            let to = store.position(self.anchors[a + 1] as usize);
            // Quadratic bezier with a slow vertical sine bulge.
            let mid = Vec3::new(
                (from.x + to.x) * 0.5,
                (from.y + to.y) * 0.5 + FORCE_LINE_BULGE * (time * 0.8 + a as f32).sin(),
                (from.z + to.z) * 0.5 + 0.2,
            );
            for s in 0..FORCE_LINE_SEGMENTS {
                let t0 = s as f32 / FORCE_LINE_SEGMENTS as f32;
                let t1 = (s + 1) as f32 / FORCE_LINE_SEGMENTS as f32;
                let p0 = quadratic_bezier(from, mid, to, t0);
                let p1 = quadratic_bezier(from, mid, to, t1);
                if !lines.push_extra(p0, p1) {
                    return;
                }
            }
        }
    }

    fn write_entanglement(
        &mut self,
        store: &ParticleStore,
        instances: &mut [ParticleInstance],
        lines: &mut LineBuffer,
        mask: u8,
        time: f32,
    ) {
        if !has_layer(mask, 5) {
            return;
        }
        let phase = time * ENTANGLE_PULSE_SPEED;
        for (pi, &(a, b)) in self.entangled_pairs.iter().enumerate() {
            let pulse = 1.0 + ENTANGLE_PULSE_AMP * (phase + pi as f32 * 0.5).sin();
            instances[a as usize].scale *= pulse;
            instances[b as usize].scale *= pulse;
            if !lines.push_extra(store.position(a as usize), store.position(b as usize)) {
                break;
            }
        }
    }
}

// ---------------- event override math ----------------

fn apply_event(
    event: &LayerEvent,
    elapsed: f32,
    store: &ParticleStore,
    instances: &mut [ParticleInstance],
) {
    match event {
        LayerEvent::Annihilation {
            a, b, a_pos, b_pos, ..
        } => {
            let (a, b) = (*a as usize, *b as usize);
            if elapsed < ANNIHILATION_FLASH_DUR {
                // Flash bright, scale up.
                let t = elapsed / ANNIHILATION_FLASH_DUR;
                let scale = 1.0 + 2.0 * (t * std::f32::consts::PI).sin();
                scale_override(instances, a, scale);
                scale_override(instances, b, scale);
                color_override(instances, a, WHITE);
                color_override(instances, b, WHITE);
            } else if elapsed < ANNIHILATION_FLASH_DUR + ANNIHILATION_FADE_DUR {
                // Shrink to nothing.
                let t = (elapsed - ANNIHILATION_FLASH_DUR) / ANNIHILATION_FADE_DUR;
                let scale = (1.0 - t).max(0.01);
                scale_override(instances, a, scale);
                scale_override(instances, b, scale);
            } else {
                // Re-appear at swapped positions, ease in.
                let t = (elapsed - ANNIHILATION_FLASH_DUR - ANNIHILATION_FADE_DUR)
                    / ANNIHILATION_REFORM_DUR;
                let scale = t * t;
                scale_override(instances, a, scale);
                scale_override(instances, b, scale);
                offset_override(instances, a, (*b_pos - *a_pos) * t);
                offset_override(instances, b, (*a_pos - *b_pos) * t);
            }
        }
        LayerEvent::Decay {
            source,
            children,
            dirs,
            ..
        } => {
            let source = *source as usize;
            if elapsed < DECAY_FLASH_DUR {
                let t = elapsed / DECAY_FLASH_DUR;
                scale_override(
                    instances,
                    source,
                    1.0 + 1.5 * (t * std::f32::consts::PI).sin(),
                );
                color_override(instances, source, lerp_color(WHITE, CORE_COLOR, t));
            } else if elapsed < DECAY_FLASH_DUR + DECAY_SPLIT_DUR {
                // Source shrinks, children eject with a quadratic ease-in.
                let t = (elapsed - DECAY_FLASH_DUR) / DECAY_SPLIT_DUR;
                scale_override(instances, source, (1.0 - t * 0.8).max(0.1));
                let dist = t * t * DECAY_EJECT_SPEED;
                for (ci, &child) in children.iter().enumerate() {
                    scale_override(instances, child as usize, 1.0 + t * 1.5);
                    offset_override(instances, child as usize, dirs[ci] * dist);
                }
            } else {
                // Settle back.
                let t = (elapsed - DECAY_FLASH_DUR - DECAY_SPLIT_DUR) / DECAY_SETTLE_DUR;
                let fade = 1.0 - t;
                scale_override(instances, source, 0.2 + t * 0.8);
                let dist = fade * DECAY_EJECT_SPEED;
                for (ci, &child) in children.iter().enumerate() {
                    scale_override(instances, child as usize, 1.0 + fade * 1.5);
                    offset_override(instances, child as usize, dirs[ci] * dist);
                }
            }
        }
        LayerEvent::Shockwave { center, .. } => {
            // Expanding thin ring; boost is proportional to ring proximity
            // and remaining lifetime. Independent of the unlock mask.
            let radius = SHOCKWAVE_SPEED * elapsed;
            let life = 1.0 - elapsed / SHOCKWAVE_DURATION;
            let half = SHOCKWAVE_THICKNESS * 0.5;
            for i in 0..store.node_count {
                let band = (store.position(i).distance(*center) - radius).abs();
                if band < half {
                    let boost = 1.0 + SHOCKWAVE_BOOST * (1.0 - band / half) * life;
                    scale_override(instances, i, boost);
                }
            }
        }
        LayerEvent::Supernova { affected, .. } => {
            let t = elapsed / SUPERNOVA_DURATION;
            if t < SUPERNOVA_INWARD_FRAC {
                // Brief contraction before the blast.
                let ease = t / SUPERNOVA_INWARD_FRAC;
                for &(i, dir) in affected {
                    offset_override(instances, i as usize, -dir * 0.3 * ease);
                    color_override(instances, i as usize, WHITE);
                }
            } else {
                let t2 = (t - SUPERNOVA_INWARD_FRAC) / (1.0 - SUPERNOVA_INWARD_FRAC);
                let out = (t2 * std::f32::consts::PI).sin();
                for &(i, dir) in affected {
                    offset_override(instances, i as usize, dir * SUPERNOVA_EJECT_DIST * out);
                    scale_override(instances, i as usize, 1.0 + (1.0 - t2));
                    if t2 < 0.2 {
                        color_override(instances, i as usize, WHITE);
                    }
                }
            }
        }
        LayerEvent::GravityWell { center, .. } => {
            // Inward pull then release; affected set is recomputed from live
            // positions each frame.
            let t = elapsed / GRAVITY_WELL_DURATION;
            let pull = GRAVITY_WELL_PULL * (t * std::f32::consts::PI).sin();
            let radius_sq = GRAVITY_WELL_RADIUS * GRAVITY_WELL_RADIUS;
            for i in 0..store.node_count {
                let p = store.position(i);
                let to_center = *center - p;
                if to_center.length_squared() < radius_sq {
                    offset_override(instances, i, to_center * pull);
                }
            }
        }
        LayerEvent::Teleport {
            index, from, to, ..
        } => {
            let t = elapsed / TELEPORT_DURATION;
            let ease = t * t * (3.0 - 2.0 * t); // smoothstep
            let i = *index as usize;
            offset_override(instances, i, (*to - *from) * ease);
            // Scale dips through the jump midpoint.
            let dip = 1.0 - 0.8 * (t * std::f32::consts::PI).sin();
            scale_override(instances, i, dip.max(0.1));
            color_override(instances, i, WHITE);
        }
        LayerEvent::ColorCascade { center, .. } => {
            let radius = CASCADE_SPEED * elapsed;
            let life = 1.0 - elapsed / CASCADE_DURATION;
            let half = CASCADE_BAND * 0.5;
            for i in 0..store.node_count {
                let band = (store.position(i).distance(*center) - radius).abs();
                if band < half {
                    let blend = (1.0 - band / half) * life;
                    let c = store.live_colors[i];
                    color_override(
                        instances,
                        i,
                        lerp_color(c, PARTICLE_COLORS[6], blend),
                    );
                }
            }
        }
        LayerEvent::Fusion {
            node,
            dust,
            node_pos,
            dust_pos,
            eject_dir,
            ..
        } => {
            let node = *node as usize;
            let dust = *dust as usize;
            let to_node = *node_pos - *dust_pos;
            if elapsed < FUSION_ABSORB_DUR {
                // Dust falls into the node.
                let t = elapsed / FUSION_ABSORB_DUR;
                offset_override(instances, dust, to_node * (t * t));
                scale_override(instances, dust, 1.0 - 0.6 * t);
            } else if elapsed < FUSION_ABSORB_DUR + FUSION_FLASH_DUR {
                let t = (elapsed - FUSION_ABSORB_DUR) / FUSION_FLASH_DUR;
                offset_override(instances, dust, to_node);
                scale_override(instances, dust, 0.01);
                scale_override(instances, node, 1.0 + 1.2 * (t * std::f32::consts::PI).sin());
                color_override(instances, node, WHITE);
            } else {
                // Re-emit and eject outward, easing home by the end.
                let t = (elapsed - FUSION_ABSORB_DUR - FUSION_FLASH_DUR) / FUSION_EJECT_DUR;
                let back = 1.0 - t * t * (3.0 - 2.0 * t);
                let fling = (t * std::f32::consts::PI).sin() * 0.8;
                offset_override(instances, dust, to_node * back + *eject_dir * fling);
                scale_override(instances, dust, 0.4 + 0.6 * t);
            }
        }
        LayerEvent::PartnerFlash { index, .. } => {
            let t = elapsed / PARTNER_FLASH_DUR;
            let i = *index as usize;
            scale_override(instances, i, 1.0 + 1.5 * (t * std::f32::consts::PI).sin());
            color_override(instances, i, WHITE);
        }
    }
}

#[inline]
fn scale_override(instances: &mut [ParticleInstance], i: usize, mult: f32) {
    instances[i].scale *= mult;
}

#[inline]
fn color_override(instances: &mut [ParticleInstance], i: usize, c: [f32; 3]) {
    instances[i].color[0] = c[0];
    instances[i].color[1] = c[1];
    instances[i].color[2] = c[2];
}

#[inline]
fn offset_override(instances: &mut [ParticleInstance], i: usize, offset: Vec3) {
    instances[i].pos[0] += offset.x;
    instances[i].pos[1] += offset.y;
    instances[i].pos[2] += offset.z;
}

#[inline]
fn lerp_color(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

#[inline]
fn quadratic_bezier(a: Vec3, mid: Vec3, b: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    a * (u * u) + mid * (2.0 * u * t) + b * (t * t)
}

fn nearest_node(store: &ParticleStore, target: Vec3) -> Option<usize> {
    if store.node_count == 0 {
        return None;
    }
    let mut best = 0;
    let mut best_d = f32::MAX;
    for i in 0..store.node_count {
        let d = store.position(i).distance_squared(target);
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    Some(best)
}
