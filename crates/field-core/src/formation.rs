//! Formation blending and phase-1 integration.
//!
//! Every frame each particle is pulled toward a blended target built from
//! three independent 0..1 signals: idle "entropy" drift, pointer-proximity
//! ring formation, and scroll-driven text formation. The ring target is
//! optionally rotated into an orbital vortex around a session-random axis.
//! The integration here is phase 1 of the tick; interaction layers read the
//! resulting positions as authoritative for the same tick.

use glam::Vec3;
use rand::prelude::*;

use crate::constants::*;
use crate::store::{ParticleInstance, ParticleStore};

/// Rodrigues' rotation of `v` about the unit `axis` by `angle` radians.
#[inline]
pub fn rotate_about_axis(v: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    v * c + axis.cross(v) * s + axis * (axis.dot(v) * (1.0 - c))
}

/// Stylized Kepler rule: angular velocity falls with the 3/2 power of the
/// perpendicular distance from the spin axis, floored near the axis.
#[inline]
pub fn vortex_omega(axis: Vec3, p: Vec3) -> f32 {
    let perp = p - axis * axis.dot(p);
    VORTEX_OMEGA / (perp.length().powf(1.5) + VORTEX_EPS)
}

pub struct FormationBlender {
    pub cursor_strength: f32,
    pub scroll_strength: f32,
    pub vortex_strength: f32,
    vortex_phase: f32,
    spin_axis: Vec3,
    compact: bool,
}

impl FormationBlender {
    pub fn new<R: Rng>(compact: bool, rng: &mut R) -> Self {
        // Tilt the orbit plane 25-55 degrees off vertical, once per session,
        // so the vortex reads with visible depth instead of a flat spin.
        let tilt = rng
            .gen_range(VORTEX_TILT_MIN_DEG..VORTEX_TILT_MAX_DEG)
            .to_radians();
        let azimuth = rng.gen::<f32>() * std::f32::consts::TAU;
        let spin_axis = Vec3::new(
            tilt.sin() * azimuth.cos(),
            tilt.cos(),
            tilt.sin() * azimuth.sin(),
        );
        Self {
            cursor_strength: 0.0,
            scroll_strength: 0.0,
            vortex_strength: 0.0,
            vortex_phase: 0.0,
            spin_axis,
            compact,
        }
    }

    pub fn set_compact(&mut self, compact: bool) {
        self.compact = compact;
    }

    #[inline]
    pub fn spin_axis(&self) -> Vec3 {
        self.spin_axis
    }

    /// Combined formation strength; drives jitter damping and the entropy
    /// blend.
    #[inline]
    pub fn formation_strength(&self) -> f32 {
        self.scroll_strength.max(self.cursor_strength)
    }

    #[inline]
    pub fn in_vortex_zone(pointer_world: Vec3) -> bool {
        pointer_world.truncate().length() < VORTEX_ZONE_RADIUS
    }

    /// Advance the three strength signals. `pointer_active` is true while
    /// the pointer has moved within the idle timeout.
    pub fn update_strengths(
        &mut self,
        dt: f32,
        scroll_progress: f32,
        pointer_world: Vec3,
        pointer_active: bool,
    ) {
        self.scroll_strength = ((scroll_progress - SCROLL_WINDOW_START)
            / (SCROLL_WINDOW_END - SCROLL_WINDOW_START))
            .clamp(0.0, 1.0);

        if pointer_active {
            self.cursor_strength =
                (self.cursor_strength + CURSOR_ENGAGE_PER_SEC * dt).min(1.0);
        } else {
            self.cursor_strength =
                (self.cursor_strength - CURSOR_DISENGAGE_PER_SEC * dt).max(0.0);
        }

        // Slow onset, slow decay: the orbit should feel like settling in,
        // not a toggle.
        if pointer_active && Self::in_vortex_zone(pointer_world) {
            self.vortex_strength =
                (self.vortex_strength + VORTEX_ENGAGE_PER_SEC * dt).min(1.0);
        } else {
            self.vortex_strength =
                (self.vortex_strength - VORTEX_DISENGAGE_PER_SEC * dt).max(0.0);
        }
        self.vortex_phase += dt * self.vortex_strength;
    }

    /// Phase-1 pass: integrate every particle toward its blended target and
    /// fill the instance buffer with position, scale and base color.
    #[allow(clippy::too_many_arguments)]
    pub fn integrate(
        &self,
        store: &mut ParticleStore,
        instances: &mut [ParticleInstance],
        time: f32,
        dt: f32,
        entrance_elapsed: f32,
        pointer_world: Vec3,
        pointer_down: bool,
    ) {
        let dtf = (dt * 60.0).min(DT_FRAME_CAP);
        let lerp_speed = if entrance_elapsed < ENTRANCE_DURATION {
            LERP_SPEED * (2.5 - entrance_elapsed * 0.5)
        } else {
            LERP_SPEED
        };
        let strength = self.formation_strength();
        let jitter_amp = JITTER_AMP * (1.0 - 0.8 * strength);
        let brownian = strength < BROWNIAN_FORMATION_CUTOFF;
        let brownian_fade = if brownian {
            1.0 - strength / BROWNIAN_FORMATION_CUTOFF
        } else {
            0.0
        };
        let vortex_on = self.vortex_strength > VORTEX_MIN_STRENGTH;
        let (mx, my) = (pointer_world.x, pointer_world.y);
        let mouse_radius_sq = MOUSE_RADIUS * MOUSE_RADIUS;
        let platform_boost = if self.compact { COMPACT_SIZE_BOOST } else { 1.0 };

        for i in 0..store.count {
            let mut x = store.positions[i * 3];
            let mut y = store.positions[i * 3 + 1];
            let mut z = store.positions[i * 3 + 2];

            let ring = store.ring_target(i);
            let ring = if vortex_on {
                let angle = self.vortex_phase * vortex_omega(self.spin_axis, ring);
                rotate_about_axis(ring, self.spin_axis, angle * self.vortex_strength)
            } else {
                ring
            };
            let formation = ring.lerp(store.text_target(i), self.scroll_strength);
            let blended = store.entropy_home(i).lerp(formation, strength);

            // Frame-rate-independent approach to the blended target.
            x += (blended.x - x) * lerp_speed * dtf;
            y += (blended.y - y) * lerp_speed * dtf;
            z += (blended.z - z) * lerp_speed * dtf;

            // Keplerian-looking orbital drift: faster revolution nearer the
            // visual center. Decorative, not literal gravity.
            let rr = (x * x + y * y).sqrt();
            if rr > ORB_CORE_RADIUS {
                let orb_speed = ORB_SPEED_FACTOR / (rr + 0.4);
                let orb_angle = y.atan2(x);
                x += -orb_angle.sin() * orb_speed * ORB_DRIFT_X * dtf;
                y += orb_angle.cos() * orb_speed * ORB_DRIFT_Y * dtf;
            }

            // Alive in entropy, calm when formed.
            let phase = store.random_phase[i];
            x += (time * 0.8 + phase).sin() * jitter_amp * dtf;
            y += (time * 0.9 + phase).cos() * jitter_amp * dtf;

            if brownian {
                x += (time * 0.13 + phase * 3.1).sin() * BROWNIAN_AMP * brownian_fade * dtf;
                y += (time * 0.11 + phase * 2.3).cos() * BROWNIAN_AMP * brownian_fade * dtf;
                z += (time * 0.17 + phase * 1.7).sin()
                    * BROWNIAN_AMP
                    * 0.5
                    * brownian_fade
                    * dtf;
            }

            // Pointer force: repulsion by default, attraction while grabbed.
            let dx = x - mx;
            let dy = y - my;
            let d_sq = dx * dx + dy * dy;
            if d_sq < mouse_radius_sq {
                let d = d_sq.sqrt();
                let falloff = (MOUSE_RADIUS - d) / MOUSE_RADIUS;
                if pointer_down {
                    let force = falloff * MOUSE_FORCE * dtf * GRAB_FORCE_FACTOR;
                    x -= dx * force;
                    y -= dy * force;
                } else {
                    let force = falloff * MOUSE_FORCE * dtf;
                    x += dx * force;
                    y += dy * force;
                }
            }

            store.positions[i * 3] = x;
            store.positions[i * 3 + 1] = y;
            store.positions[i * 3 + 2] = z;

            // Staggered fade-in keyed to each particle's birth delay.
            let birth = ((time - store.birth_delay[i]) / BIRTH_FADE_DURATION).clamp(0.0, 1.0);
            let pulse = PULSE_BASE + PULSE_AMP * (time * PULSE_SPEED + phase).sin();
            let size_mult = if store.is_node(i) {
                NODE_SIZE_MULT
            } else {
                DUST_SIZE_MULT
            };
            let proximity_boost = PROXIMITY_BOOST_BASE + 1.0 / (rr + 0.8);
            let scale = store.base_scale[i]
                * pulse
                * size_mult
                * proximity_boost
                * platform_boost
                * birth
                * birth;

            let c = store.live_colors[i];
            instances[i] = ParticleInstance {
                pos: [x, y, z],
                scale,
                color: [c[0], c[1], c[2], 1.0],
            };
        }
    }
}
