// Sanity checks on tuning constants and their relationships.

use field_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn population_and_budget_bounds() {
    assert!(NODE_COUNT <= COMPACT_PARTICLE_COUNT);
    assert!(COMPACT_PARTICLE_COUNT < DEFAULT_PARTICLE_COUNT);
    assert!(MAX_LINES > 0);
    assert!(RECOMPUTE_EVERY >= 1);
    assert!(CONN_DIST > 0.0);
}

#[test]
fn layer_thresholds_are_strictly_ascending_from_zero() {
    assert_eq!(LAYER_THRESHOLDS[0], 0.0);
    for w in LAYER_THRESHOLDS.windows(2) {
        assert!(w[0] < w[1], "thresholds must ascend: {w:?}");
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn compact_cap_covers_exactly_layers_zero_to_two() {
    assert_eq!(COMPACT_LAYER_CAP_MASK, 0b0000_0111);
    assert_eq!(COMPACT_LAYER_CAP_MASK.count_ones(), 3);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn ramps_favor_slow_release() {
    // Formation and vortex both engage faster than they let go.
    assert!(CURSOR_ENGAGE_PER_SEC > CURSOR_DISENGAGE_PER_SEC);
    assert!(VORTEX_ENGAGE_PER_SEC > VORTEX_DISENGAGE_PER_SEC);
    assert!(SCROLL_WINDOW_START < SCROLL_WINDOW_END);
    assert!(POINTER_IDLE_TIMEOUT > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn event_phase_durations_sum_to_totals() {
    assert_eq!(
        ANNIHILATION_TOTAL,
        ANNIHILATION_FLASH_DUR + ANNIHILATION_FADE_DUR + ANNIHILATION_REFORM_DUR
    );
    assert_eq!(DECAY_TOTAL, DECAY_FLASH_DUR + DECAY_SPLIT_DUR + DECAY_SETTLE_DUR);
    assert_eq!(
        FUSION_TOTAL,
        FUSION_ABSORB_DUR + FUSION_FLASH_DUR + FUSION_EJECT_DUR
    );
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn intervals_exceed_their_event_durations() {
    // Timed triggers should not stack events faster than they expire.
    assert!(ANNIHILATION_INTERVAL > ANNIHILATION_TOTAL);
    assert!(DECAY_INTERVAL > DECAY_TOTAL);
    assert!(CASCADE_INTERVAL > CASCADE_DURATION);
    assert!(FUSION_INTERVAL > FUSION_TOTAL);
    assert!(CLICK_COOLDOWN > 0.0);
}

#[test]
fn palette_entries_are_normalized() {
    for c in PARTICLE_COLORS.iter().chain([&CORE_COLOR, &WHITE]) {
        for ch in c {
            assert!((0.0..=1.0).contains(ch), "channel {ch} out of range");
        }
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn vortex_tilt_band_is_valid() {
    assert!(VORTEX_TILT_MIN_DEG < VORTEX_TILT_MAX_DEG);
    assert!(VORTEX_TILT_MAX_DEG < 90.0);
    assert!(VORTEX_EPS > 0.0);
    assert!(VORTEX_ZONE_RADIUS > 0.0);
}

#[test]
fn pipeline_anchors_are_ordered_left_to_right() {
    for w in PIPELINE_ANCHORS.windows(2) {
        assert!(w[0][0] < w[1][0], "anchor x must ascend: {w:?}");
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn condensation_blend_stays_partial() {
    // Full blend would erase the palette; the core only tints.
    assert!(CONDENSATION_BLEND_MAX > 0.0 && CONDENSATION_BLEND_MAX < 1.0);
    assert!(CONDENSATION_MAX_RADIUS > CONDENSATION_CHAIN_SHRINK);
}
