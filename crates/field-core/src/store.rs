//! Structure-of-arrays particle storage.
//!
//! Particles are index-addressed; there is no per-particle object. Indices
//! below `node_count` are "nodes": larger, connection-eligible and the only
//! valid primary targets for interaction-layer events. The rest are "dust",
//! rendered but never selected as a primary target.

use glam::{Vec2, Vec3};
use rand::prelude::*;

use crate::constants::*;

/// Per-instance data uploaded to the GPU each frame. Position and scale are
/// recomputed every tick; color starts from the live color array and may be
/// overridden by interaction layers.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub pos: [f32; 3],
    pub scale: f32,
    pub color: [f32; 4],
}

pub struct ParticleStore {
    pub count: usize,
    pub node_count: usize,
    /// Current world positions, xyz triples. Mutated only by the phase-1
    /// integration pass.
    pub positions: Vec<f32>,
    /// Ambient drift anchors assigned at creation; never mutated after init.
    pub entropy_home: Vec<f32>,
    /// Orbit formation targets; recomputed on relayout.
    pub ring_target: Vec<f32>,
    /// Text formation targets; recomputed on relayout.
    pub text_target: Vec<f32>,
    pub base_scale: Vec<f32>,
    pub color_index: Vec<u8>,
    pub random_phase: Vec<f32>,
    pub birth_delay: Vec<f32>,
    /// Current render colors. Condensation blends these toward the core
    /// accent from a one-time stash kept by the interaction engine.
    pub live_colors: Vec<[f32; 3]>,
}

impl ParticleStore {
    pub fn new<R: Rng>(count: usize, rng: &mut R) -> Self {
        let node_count = NODE_COUNT.min(count);
        let mut positions = vec![0.0f32; count * 3];
        let mut base_scale = vec![0.0f32; count];
        let mut color_index = vec![0u8; count];
        let mut random_phase = vec![0.0f32; count];
        let mut birth_delay = vec![0.0f32; count];
        let mut live_colors = vec![[0.0f32; 3]; count];

        for i in 0..count {
            positions[i * 3] = (rng.gen::<f32>() - 0.5) * ENTROPY_SPREAD[0];
            positions[i * 3 + 1] = (rng.gen::<f32>() - 0.5) * ENTROPY_SPREAD[1];
            positions[i * 3 + 2] = (rng.gen::<f32>() - 0.5) * ENTROPY_SPREAD[2];

            base_scale[i] = if i < node_count {
                NODE_SCALE_MIN + rng.gen::<f32>() * NODE_SCALE_SPAN
            } else {
                DUST_SCALE_MIN + rng.gen::<f32>() * DUST_SCALE_SPAN
            };
            color_index[i] = rng.gen_range(0..PARTICLE_COLORS.len()) as u8;
            random_phase[i] = rng.gen::<f32>() * std::f32::consts::TAU;
            birth_delay[i] = rng.gen::<f32>() * BIRTH_DELAY_MAX;

            let base = PARTICLE_COLORS[color_index[i] as usize];
            live_colors[i] = if i < node_count {
                lighten(base, 0.12)
            } else {
                dim(base, 0.85)
            };
        }

        let entropy_home = positions.clone();
        Self {
            count,
            node_count,
            positions,
            entropy_home,
            ring_target: vec![0.0; count * 3],
            text_target: vec![0.0; count * 3],
            base_scale,
            color_index,
            random_phase,
            birth_delay,
            live_colors,
        }
    }

    /// Recompute ring and text targets from sampled glyph points and the
    /// compact flag. Entropy homes are deliberately untouched: relayout
    /// changes where formations go, not where particles rest.
    pub fn assign_layout<R: Rng>(&mut self, samples: &[Vec2], compact: bool, rng: &mut R) {
        let (spread_x, spread_y, horizon, lens) = if compact {
            (
                TEXT_SPREAD_X_COMPACT,
                TEXT_SPREAD_Y_COMPACT,
                EVENT_HORIZON_COMPACT,
                LENS_STRENGTH_COMPACT,
            )
        } else {
            (TEXT_SPREAD_X, TEXT_SPREAD_Y, EVENT_HORIZON, LENS_STRENGTH)
        };
        let ring_radius = if compact { RING_RADIUS_COMPACT } else { RING_RADIUS };

        for i in 0..self.count {
            if i < samples.len() {
                // Gravitational-lens warp: push radially off the horizon and
                // shear tangentially so the glyphs read as bent spacetime.
                let p = samples[i];
                let x = p.x * spread_x;
                let y = p.y * spread_y;
                let r = (x * x + y * y).sqrt();
                let angle = y.atan2(x);

                let radial_push = (horizon * horizon) / (r + 0.3);
                let lensed_r = r + radial_push * lens;
                let tangential_warp = (horizon / (r + 0.4)) * 0.8;
                let lensed_angle = angle + tangential_warp;
                let flatten = 0.45 + 0.45 * (r / 4.0).min(1.0);

                self.text_target[i * 3] = lensed_r * lensed_angle.cos();
                self.text_target[i * 3 + 1] = lensed_r * lensed_angle.sin() * flatten;
                self.text_target[i * 3 + 2] = (rng.gen::<f32>() - 0.5) * 0.2;
            } else {
                // Past the sample count: loose scatter around the horizon.
                let angle = rng.gen::<f32>() * std::f32::consts::TAU;
                let radius = horizon + 0.3 + rng.gen::<f32>() * 3.0;
                self.text_target[i * 3] = angle.cos() * radius;
                self.text_target[i * 3 + 1] = angle.sin() * radius * 0.25;
                self.text_target[i * 3 + 2] = (rng.gen::<f32>() - 0.5) * 0.3;
            }

            // Ring targets: a flat annulus the vortex rotation acts on.
            let angle = rng.gen::<f32>() * std::f32::consts::TAU;
            let radius = ring_radius + (rng.gen::<f32>() - 0.5) * RING_THICKNESS * 2.0;
            self.ring_target[i * 3] = angle.cos() * radius;
            self.ring_target[i * 3 + 1] = angle.sin() * radius * 0.35;
            self.ring_target[i * 3 + 2] = (rng.gen::<f32>() - 0.5) * RING_THICKNESS;
        }
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(
            self.positions[i * 3],
            self.positions[i * 3 + 1],
            self.positions[i * 3 + 2],
        )
    }

    #[inline]
    pub fn set_position(&mut self, i: usize, p: Vec3) {
        self.positions[i * 3] = p.x;
        self.positions[i * 3 + 1] = p.y;
        self.positions[i * 3 + 2] = p.z;
    }

    #[inline]
    pub fn entropy_home(&self, i: usize) -> Vec3 {
        Vec3::new(
            self.entropy_home[i * 3],
            self.entropy_home[i * 3 + 1],
            self.entropy_home[i * 3 + 2],
        )
    }

    #[inline]
    pub fn ring_target(&self, i: usize) -> Vec3 {
        Vec3::new(
            self.ring_target[i * 3],
            self.ring_target[i * 3 + 1],
            self.ring_target[i * 3 + 2],
        )
    }

    #[inline]
    pub fn text_target(&self, i: usize) -> Vec3 {
        Vec3::new(
            self.text_target[i * 3],
            self.text_target[i * 3 + 1],
            self.text_target[i * 3 + 2],
        )
    }

    #[inline]
    pub fn is_node(&self, i: usize) -> bool {
        i < self.node_count
    }
}

#[inline]
fn lighten(c: [f32; 3], amount: f32) -> [f32; 3] {
    [
        c[0] + (1.0 - c[0]) * amount,
        c[1] + (1.0 - c[1]) * amount,
        c[2] + (1.0 - c[2]) * amount,
    ]
}

#[inline]
fn dim(c: [f32; 3], factor: f32) -> [f32; 3] {
    [c[0] * factor, c[1] * factor, c[2] * factor]
}
