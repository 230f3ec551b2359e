// End-to-end simulation tests: tick orchestration, dwell progression and
// render-side buffer contracts.

use field_core::constants::*;
use field_core::sim::{Simulation, TickInput};
use glam::Vec3;

fn idle_input(time: f32) -> TickInput {
    TickInput {
        time,
        dt: 1.0 / 60.0,
        scroll_progress: 0.0,
        pointer_world: Vec3::ZERO,
        pointer_down: false,
    }
}

#[test]
fn node_dust_partition_follows_the_count() {
    let sim = Simulation::new(1000, "TEST", false, 1);
    let store = sim.store();
    assert_eq!(store.count, 1000);
    assert_eq!(store.node_count, NODE_COUNT);
    assert!(store.is_node(NODE_COUNT - 1));
    assert!(!store.is_node(NODE_COUNT));

    // Tiny fields are all nodes.
    let small = Simulation::new(40, "TEST", false, 1);
    assert_eq!(small.store().node_count, 40);
}

#[test]
fn instance_buffer_matches_particle_count() {
    let mut sim = Simulation::new(300, "TEST", false, 2);
    sim.tick(&idle_input(0.0));
    assert_eq!(sim.instances().len(), 300);
    assert_eq!(sim.particle_count(), 300);
}

#[test]
fn line_vertex_count_never_exceeds_budget() {
    let mut sim = Simulation::new(500, "TEST", false, 3);
    for frame in 0..120 {
        sim.tick(&TickInput {
            time: frame as f32 / 60.0,
            dt: 1.0 / 60.0,
            scroll_progress: 1.0,
            pointer_world: Vec3::ZERO,
            pointer_down: false,
        });
        assert!(sim.line_vertex_count() <= MAX_LINES * 2);
        assert_eq!(sim.line_positions().len(), MAX_LINES * 6);
    }
}

#[test]
fn zero_particle_field_ticks_without_events() {
    // Reduced-motion hosts run the field with no particles at all; every
    // unlocked layer must stay inert instead of sampling an empty store.
    let mut sim = Simulation::new(0, "TEST", false, 1);
    sim.restore_dwell(200.0);
    sim.queue_click(Vec3::ZERO);
    for frame in 0..240 {
        let t = frame as f32 / 60.0;
        let triggers = sim.tick(&TickInput {
            time: t,
            dt: 1.0 / 60.0,
            scroll_progress: 0.5,
            pointer_world: Vec3::new(0.2 * (t * 3.0).sin(), 0.1, 0.0),
            pointer_down: false,
        });
        assert!(!triggers.annihilation && !triggers.decay && !triggers.supernova);
        assert!(triggers.condensation.is_none());
        assert_eq!(sim.line_vertex_count(), 0);
    }
    assert_eq!(sim.particle_count(), 0);
    assert_eq!(sim.layer_mask(), 0b11_1111);
}

#[test]
fn hovering_the_vortex_zone_accumulates_dwell() {
    let mut sim = Simulation::new(200, "TEST", false, 4);
    // Wiggle the pointer near the center so it registers as active and
    // stays inside the zone.
    for frame in 0..600 {
        let t = frame as f32 / 60.0;
        sim.tick(&TickInput {
            time: t,
            dt: 1.0 / 60.0,
            scroll_progress: 0.0,
            pointer_world: Vec3::new(0.2 * (t * 3.0).sin(), 0.1, 0.0),
            pointer_down: false,
        });
    }
    // Ten seconds in the zone minus the vortex engage ramp.
    let dwell = sim.dwell_secs();
    assert!(dwell > 5.0 && dwell < 10.0, "dwell {dwell}");
    assert!(sim.layer_mask() & 1 != 0, "layer 0 should be unlocked");
}

#[test]
fn pointer_outside_the_zone_never_accumulates_dwell() {
    let mut sim = Simulation::new(200, "TEST", false, 5);
    for frame in 0..600 {
        let t = frame as f32 / 60.0;
        sim.tick(&TickInput {
            time: t,
            dt: 1.0 / 60.0,
            scroll_progress: 0.0,
            pointer_world: Vec3::new(5.0 + 0.2 * (t * 3.0).sin(), 3.0, 0.0),
            pointer_down: false,
        });
    }
    assert_eq!(sim.dwell_secs(), 0.0);
}

#[test]
fn restored_dwell_survives_a_compact_toggle() {
    let mut sim = Simulation::new(200, "TEST", true, 6);
    sim.restore_dwell(200.0);
    sim.tick(&idle_input(0.0));
    assert_eq!(sim.layer_mask(), 0b11_1111);
    assert_eq!(sim.effective_layer_mask(), COMPACT_LAYER_CAP_MASK);

    // Widening the viewport reveals the layers the accumulator already
    // earned.
    sim.set_compact(false);
    sim.tick(&idle_input(1.0 / 60.0));
    assert_eq!(sim.effective_layer_mask(), 0b11_1111);
}

#[test]
fn condensation_hum_reports_strength_once_unlocked() {
    let mut sim = Simulation::new(200, "TEST", false, 7);
    sim.restore_dwell(LAYER_THRESHOLDS[4]);
    let audio = sim.tick(&idle_input(0.0));
    let strength = audio.condensation.expect("condensation should be active");
    assert!((0.0..=1.0).contains(&strength));
}

#[test]
fn changing_text_keeps_positions_and_homes() {
    let mut sim = Simulation::new(200, "TEST", false, 8);
    for frame in 0..30 {
        sim.tick(&idle_input(frame as f32 / 60.0));
    }
    let store = sim.store();
    let pos_before: Vec<Vec3> = (0..store.count).map(|i| store.position(i)).collect();
    let home_before: Vec<Vec3> = (0..store.count).map(|i| store.entropy_home(i)).collect();

    sim.set_formation_text("OTHER");

    let store = sim.store();
    for i in 0..store.count {
        assert_eq!(store.position(i), pos_before[i]);
        assert_eq!(store.entropy_home(i), home_before[i]);
    }
}
