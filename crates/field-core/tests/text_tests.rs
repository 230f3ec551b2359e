// Glyph sampling tests.

use field_core::text::sample_text_points;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn sampling_yields_requested_count_in_unit_range() {
    let mut rng = StdRng::seed_from_u64(1);
    let points = sample_text_points("TEST", 500, &mut rng);
    assert_eq!(points.len(), 500);
    for p in &points {
        assert!(p.x >= -1.0 && p.x <= 1.0, "x out of range: {}", p.x);
        assert!(p.y >= -1.0 && p.y <= 1.0, "y out of range: {}", p.y);
    }
}

#[test]
fn blank_and_unknown_text_yields_no_samples() {
    let mut rng = StdRng::seed_from_u64(2);
    assert!(sample_text_points("", 100, &mut rng).is_empty());
    assert!(sample_text_points("   ", 100, &mut rng).is_empty());
    assert!(sample_text_points("@#$", 100, &mut rng).is_empty());
}

#[test]
fn zero_budget_yields_no_samples() {
    let mut rng = StdRng::seed_from_u64(3);
    assert!(sample_text_points("TEST", 0, &mut rng).is_empty());
}

#[test]
fn lowercase_maps_to_uppercase_glyphs() {
    let mut rng_a = StdRng::seed_from_u64(4);
    let mut rng_b = StdRng::seed_from_u64(4);
    let upper = sample_text_points("DRIFT", 200, &mut rng_a);
    let lower = sample_text_points("drift", 200, &mut rng_b);
    assert_eq!(upper.len(), lower.len());
    for (a, b) in upper.iter().zip(lower.iter()) {
        assert!((a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6);
    }
}

#[test]
fn wider_text_spreads_horizontally() {
    // A single glyph should not occupy only the left edge; a long string
    // should produce samples across most of the -1..1 span.
    let mut rng = StdRng::seed_from_u64(5);
    let points = sample_text_points("INFORMATION", 1000, &mut rng);
    let min_x = points.iter().map(|p| p.x).fold(f32::MAX, f32::min);
    let max_x = points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
    assert!(min_x < -0.8, "left extent {min_x}");
    assert!(max_x > 0.8, "right extent {max_x}");
}
