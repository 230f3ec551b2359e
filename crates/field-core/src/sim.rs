//! Simulation facade: owns the store, blender, grid and interaction engine
//! and runs the two-phase tick. The host feeds it wall-clock time, scroll
//! progress and pointer state and reads back instance and line buffers.

use glam::Vec3;
use rand::prelude::*;

use crate::constants::*;
use crate::formation::FormationBlender;
use crate::grid::{LineBuffer, SpatialHashGrid};
use crate::layers::{AudioTriggers, InteractionEngine, LayerTickInput};
use crate::store::{ParticleInstance, ParticleStore};
use crate::text::sample_text_points;

/// Host-provided per-frame input. `pointer_world` is the pointer projected
/// onto the z = 0 plane; `scroll_progress` is 0..1 page scroll.
#[derive(Clone, Copy, Debug)]
pub struct TickInput {
    pub time: f32,
    pub dt: f32,
    pub scroll_progress: f32,
    pub pointer_world: Vec3,
    pub pointer_down: bool,
}

pub struct Simulation {
    store: ParticleStore,
    blender: FormationBlender,
    grid: SpatialHashGrid,
    layers: InteractionEngine,
    lines: LineBuffer,
    instances: Vec<ParticleInstance>,
    text: String,
    compact: bool,
    frame: u64,
    start_time: Option<f32>,
    last_pointer: Vec3,
    last_pointer_activity: f32,
    rng: StdRng,
}

impl Simulation {
    pub fn new(count: usize, text: &str, compact: bool, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut store = ParticleStore::new(count, &mut rng);
        let samples = sample_text_points(text, count, &mut rng);
        store.assign_layout(&samples, compact, &mut rng);
        let blender = FormationBlender::new(compact, &mut rng);
        log::info!("simulation ready: {count} particles, {} nodes", store.node_count);
        Self {
            store,
            blender,
            grid: SpatialHashGrid::new(),
            layers: InteractionEngine::new(seed.wrapping_add(1)),
            lines: LineBuffer::new(),
            instances: vec![
                ParticleInstance {
                    pos: [0.0; 3],
                    scale: 0.0,
                    color: [0.0; 4],
                };
                count
            ],
            text: text.to_owned(),
            compact,
            frame: 0,
            start_time: None,
            last_pointer: Vec3::ZERO,
            last_pointer_activity: f32::MIN,
            rng,
        }
    }

    /// Change the formation text; targets are relaid out, entropy homes and
    /// current positions are left alone so the swap reads as a morph.
    pub fn set_formation_text(&mut self, text: &str) {
        self.text = text.to_owned();
        let samples = sample_text_points(text, self.store.count, &mut self.rng);
        self.store.assign_layout(&samples, self.compact, &mut self.rng);
    }

    /// Viewport class change. Dwell and unlocked layers carry over; only the
    /// render cap and layout geometry move.
    pub fn set_compact(&mut self, compact: bool) {
        if compact == self.compact {
            return;
        }
        self.compact = compact;
        self.blender.set_compact(compact);
        let samples = sample_text_points(&self.text, self.store.count, &mut self.rng);
        self.store.assign_layout(&samples, compact, &mut self.rng);
    }

    pub fn queue_click(&mut self, world: Vec3) {
        self.layers.queue_click(world);
    }

    /// One full tick: strengths, phase-1 integration, periodic proximity
    /// recompute, then the interaction pass. Returns the tick's audio record.
    pub fn tick(&mut self, input: &TickInput) -> AudioTriggers {
        let start = *self.start_time.get_or_insert(input.time);
        let entrance_elapsed = input.time - start;

        if input.pointer_world.distance_squared(self.last_pointer) > 1e-6 {
            self.last_pointer = input.pointer_world;
            self.last_pointer_activity = input.time;
        }
        let pointer_active = input.time - self.last_pointer_activity < POINTER_IDLE_TIMEOUT;

        self.blender.update_strengths(
            input.dt,
            input.scroll_progress,
            input.pointer_world,
            pointer_active,
        );
        self.blender.integrate(
            &mut self.store,
            &mut self.instances,
            input.time,
            input.dt,
            entrance_elapsed,
            input.pointer_world,
            input.pointer_down,
        );

        if self.frame % RECOMPUTE_EVERY == 0 {
            self.grid
                .recompute(&self.store.positions, self.store.node_count, &mut self.lines);
        }
        self.frame += 1;

        let in_zone = pointer_active && FormationBlender::in_vortex_zone(input.pointer_world);
        self.layers.tick(
            &mut self.store,
            &mut self.instances,
            &mut self.lines,
            &LayerTickInput {
                time: input.time,
                dt: input.dt,
                in_vortex_zone: in_zone,
                vortex_strength: self.blender.vortex_strength,
                compact: self.compact,
            },
        )
    }

    // ---- render-side accessors ----

    #[inline]
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    #[inline]
    pub fn line_positions(&self) -> &[f32] {
        self.lines.positions()
    }

    #[inline]
    pub fn line_vertex_count(&self) -> usize {
        self.lines.vertex_count()
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.store.count
    }

    #[inline]
    pub fn dwell_secs(&self) -> f32 {
        self.layers.dwell_secs()
    }

    #[inline]
    pub fn layer_mask(&self) -> u8 {
        self.layers.layer_mask()
    }

    #[inline]
    pub fn effective_layer_mask(&self) -> u8 {
        self.layers.effective_mask(self.compact)
    }

    #[inline]
    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    /// Seed the dwell accumulator. Hosts that mirror the dwell/mask state
    /// outside the field use this to hand a prior value back.
    pub fn restore_dwell(&mut self, secs: f32) {
        self.layers.restore_dwell(secs);
    }
}
