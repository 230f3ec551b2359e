// Interaction layer engine tests: unlock progression, click precedence,
// event lifecycles and condensation color handling.

use field_core::constants::*;
use field_core::grid::LineBuffer;
use field_core::layers::{unlocked_layers, InteractionEngine, LayerTickInput};
use field_core::store::{ParticleInstance, ParticleStore};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Store with all particles as nodes, spaced 5 units apart on the x axis so
/// no proximity-based trigger can fire spontaneously. Node 5 sits at the
/// origin.
fn spaced_store(count: usize) -> ParticleStore {
    let mut rng = StdRng::seed_from_u64(99);
    let mut store = ParticleStore::new(count, &mut rng);
    for i in 0..count {
        store.set_position(i, Vec3::new(i as f32 * 5.0 - 25.0, 0.0, 0.0));
    }
    store
}

fn unit_instances(count: usize) -> Vec<ParticleInstance> {
    vec![
        ParticleInstance {
            pos: [0.0; 3],
            scale: 1.0,
            color: [1.0; 4],
        };
        count
    ]
}

fn quiet_input(time: f32) -> LayerTickInput {
    LayerTickInput {
        time,
        dt: 0.0,
        in_vortex_zone: false,
        vortex_strength: 0.0,
        compact: false,
    }
}

#[test]
fn unlock_thresholds_and_monotonicity() {
    assert_eq!(unlocked_layers(0.0), 0b00_0001);
    assert_eq!(unlocked_layers(14.9), 0b00_0001);
    assert_eq!(unlocked_layers(15.0), 0b00_0011);
    assert_eq!(unlocked_layers(60.0), 0b00_1111);
    assert_eq!(unlocked_layers(89.9), 0b00_1111);
    assert_eq!(unlocked_layers(120.0), 0b11_1111);

    let mut prev = 0u8;
    let mut dwell = 0.0;
    while dwell < 200.0 {
        let mask = unlocked_layers(dwell);
        assert_eq!(mask & prev, prev, "a bit cleared at dwell {dwell}");
        prev = mask;
        dwell += 0.5;
    }
}

#[test]
fn dwell_requires_zone_and_vortex_strength() {
    let mut store = spaced_store(12);
    let mut instances = unit_instances(12);
    let mut lines = LineBuffer::new();
    let mut engine = InteractionEngine::new(1);

    engine.tick(
        &mut store,
        &mut instances,
        &mut lines,
        &LayerTickInput {
            time: 0.0,
            dt: 1.0,
            in_vortex_zone: false,
            vortex_strength: 1.0,
            compact: false,
        },
    );
    assert_eq!(engine.dwell_secs(), 0.0);

    engine.tick(
        &mut store,
        &mut instances,
        &mut lines,
        &LayerTickInput {
            time: 1.0,
            dt: 1.0,
            in_vortex_zone: true,
            vortex_strength: DWELL_MIN_VORTEX_STRENGTH * 0.5,
            compact: false,
        },
    );
    assert_eq!(engine.dwell_secs(), 0.0);

    engine.tick(
        &mut store,
        &mut instances,
        &mut lines,
        &LayerTickInput {
            time: 2.0,
            dt: 1.0,
            in_vortex_zone: true,
            vortex_strength: 1.0,
            compact: false,
        },
    );
    assert!((engine.dwell_secs() - 1.0).abs() < 1e-6);
}

#[test]
fn mask_bits_never_clear_within_a_session() {
    let mut store = spaced_store(12);
    let mut instances = unit_instances(12);
    let mut lines = LineBuffer::new();
    let mut engine = InteractionEngine::new(2);

    engine.restore_dwell(200.0);
    engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.0));
    assert_eq!(engine.layer_mask(), 0b11_1111);

    engine.restore_dwell(0.0);
    engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.1));
    assert_eq!(engine.layer_mask(), 0b11_1111);
}

#[test]
fn compact_caps_rendering_but_not_accumulation() {
    let mut store = spaced_store(12);
    let mut instances = unit_instances(12);
    let mut lines = LineBuffer::new();
    let mut engine = InteractionEngine::new(3);

    engine.restore_dwell(200.0);
    engine.tick(
        &mut store,
        &mut instances,
        &mut lines,
        &LayerTickInput {
            time: 1.0,
            dt: 0.0,
            in_vortex_zone: false,
            vortex_strength: 0.0,
            compact: true,
        },
    );
    assert_eq!(engine.layer_mask(), 0b11_1111);
    assert_eq!(engine.effective_mask(true), COMPACT_LAYER_CAP_MASK);
    assert_eq!(engine.effective_mask(false), 0b11_1111);
}

#[test]
fn dwell_to_layer_three_sets_exactly_four_bits() {
    let mut store = spaced_store(12);
    let mut instances = unit_instances(12);
    let mut lines = LineBuffer::new();
    let mut engine = InteractionEngine::new(4);

    engine.restore_dwell(LAYER_THRESHOLDS[3]);
    engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.0));
    let mask = engine.layer_mask();
    for l in 0..=3u8 {
        assert!(mask & (1 << l) != 0, "layer {l} should be unlocked");
    }
    assert!(mask & (1 << 4) == 0, "layer 4 should stay locked");
    assert!(mask & (1 << 5) == 0, "layer 5 should stay locked");
}

#[test]
fn click_with_only_annihilation_forces_a_pair() {
    let mut store = spaced_store(12);
    let mut instances = unit_instances(12);
    let mut lines = LineBuffer::new();
    let mut engine = InteractionEngine::new(5);

    engine.restore_dwell(LAYER_THRESHOLDS[1]);
    engine.queue_click(Vec3::ZERO);
    let audio = engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.0));

    assert!(audio.annihilation);
    assert!(audio.shockwave);
    assert!(!audio.supernova);
    assert!(audio.condensation.is_none());
    // One annihilation plus its shockwave.
    assert_eq!(engine.active_event_count(), 2);
    assert!(engine.has_clicked());
}

#[test]
fn click_with_condensation_unlocked_is_a_supernova() {
    let mut store = spaced_store(12);
    let mut instances = unit_instances(12);
    let mut lines = LineBuffer::new();
    let mut engine = InteractionEngine::new(6);

    engine.restore_dwell(LAYER_THRESHOLDS[4]);
    engine.queue_click(Vec3::ZERO);
    let audio = engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.0));

    assert!(audio.supernova);
    assert!(audio.shockwave);
    assert!(!audio.annihilation);
}

#[test]
fn clicks_inside_cooldown_are_deferred() {
    let mut store = spaced_store(12);
    let mut instances = unit_instances(12);
    let mut lines = LineBuffer::new();
    let mut engine = InteractionEngine::new(7);

    engine.restore_dwell(LAYER_THRESHOLDS[1]);
    engine.queue_click(Vec3::ZERO);
    engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.0));
    assert_eq!(engine.active_event_count(), 2);

    engine.queue_click(Vec3::ZERO);
    let audio = engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.1));
    assert!(!audio.annihilation, "cooldown should swallow the second click");
    assert_eq!(engine.active_event_count(), 2);
}

#[test]
fn events_are_removed_after_their_duration() {
    let mut store = spaced_store(12);
    let mut instances = unit_instances(12);
    let mut lines = LineBuffer::new();
    let mut engine = InteractionEngine::new(8);

    engine.restore_dwell(LAYER_THRESHOLDS[1]);
    engine.queue_click(Vec3::ZERO);
    engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.0));
    assert_eq!(engine.active_event_count(), 2);

    // Still animating mid-flight.
    engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.3));
    assert_eq!(engine.active_event_count(), 2);

    // Past both durations but before any timer can re-trigger.
    engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(2.3));
    assert_eq!(engine.active_event_count(), 0);
}

#[test]
fn entangled_pairs_are_distant_and_disjoint() {
    let mut store = spaced_store(12);
    let mut instances = unit_instances(12);
    let mut lines = LineBuffer::new();
    let mut engine = InteractionEngine::new(9);

    engine.restore_dwell(200.0);
    engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.0));

    let pairs = engine.entangled_pairs();
    assert!(!pairs.is_empty());
    let mut seen = std::collections::HashSet::new();
    for &(a, b) in pairs {
        assert!(
            store
                .position(a as usize)
                .distance(store.position(b as usize))
                >= ENTANGLE_MIN_DIST
        );
        assert!(seen.insert(a), "index {a} reused across pairs");
        assert!(seen.insert(b), "index {b} reused across pairs");
    }
    // Entanglement and force lines land in the extra region.
    assert!(lines.extra_count() >= pairs.len());
}

#[test]
fn teleport_click_commits_the_partner_position() {
    let mut store = spaced_store(12);
    let mut instances = unit_instances(12);
    let mut lines = LineBuffer::new();
    let mut engine = InteractionEngine::new(10);

    engine.restore_dwell(200.0);
    engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.0));
    let &(a, b) = engine
        .entangled_pairs()
        .first()
        .expect("spaced store should entangle");
    let target = store.position(b as usize);

    engine.queue_click(store.position(a as usize));
    let audio = engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.05));
    assert!(audio.entanglement);
    assert!(!audio.supernova, "teleport outranks supernova");

    // Past the teleport duration the jump becomes canonical.
    engine.tick(
        &mut store,
        &mut instances,
        &mut lines,
        &quiet_input(1.05 + TELEPORT_DURATION + 0.1),
    );
    assert!(store.position(a as usize).distance(target) < 1e-4);
}

#[test]
fn condensation_blend_is_idempotent_across_ticks() {
    let mut store = spaced_store(12);
    let mut instances = unit_instances(12);
    let mut lines = LineBuffer::new();
    let mut engine = InteractionEngine::new(11);

    engine.restore_dwell(LAYER_THRESHOLDS[4]);
    let before = store.live_colors[5];
    // One second of growth puts node 5 (at the origin) inside the core.
    let input = LayerTickInput {
        time: 1.0,
        dt: 1.0,
        in_vortex_zone: false,
        vortex_strength: 0.0,
        compact: false,
    };
    let audio = engine.tick(&mut store, &mut instances, &mut lines, &input);
    assert!(audio.condensation.is_some());
    assert!(engine.condensation_radius() > 0.0);

    let blended = store.live_colors[5];
    assert_ne!(blended, before, "origin node should shift toward the core");

    // Re-running the blend with a frozen radius must not compound.
    engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.0));
    assert_eq!(store.live_colors[5], blended);
    engine.tick(&mut store, &mut instances, &mut lines, &quiet_input(1.0));
    assert_eq!(store.live_colors[5], blended);
}

#[test]
fn condensation_radius_saturates_at_the_cap() {
    let mut store = spaced_store(12);
    let mut instances = unit_instances(12);
    let mut lines = LineBuffer::new();
    let mut engine = InteractionEngine::new(12);

    engine.restore_dwell(LAYER_THRESHOLDS[4]);
    let mut audio = None;
    for i in 0..20 {
        let input = LayerTickInput {
            time: 1.0 + i as f32 * 0.1,
            dt: 1.0,
            in_vortex_zone: false,
            vortex_strength: 0.0,
            compact: false,
        };
        audio = Some(engine.tick(&mut store, &mut instances, &mut lines, &input));
    }
    assert_eq!(engine.condensation_radius(), CONDENSATION_MAX_RADIUS);
    assert_eq!(audio.unwrap().condensation, Some(1.0));
}
