//! Formation text sampling.
//!
//! The production scene rasterized the target text into an off-screen 2D
//! canvas and sampled lit pixels. Here the text is rasterized from an
//! embedded 5x7 bitmap font instead, which keeps the sampler deterministic
//! and testable off the render thread. Output points are normalized to
//! x, y in -1..1 with y up, matching the layout pass.

use glam::Vec2;
use rand::prelude::*;

const GLYPH_W: usize = 5;
const GLYPH_H: usize = 7;
const ADVANCE: usize = GLYPH_W + 1; // one blank column between glyphs

/// 5x7 glyph rows, top to bottom, low 5 bits used (MSB = leftmost column).
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x0A, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00],
        _ => return None,
    };
    Some(rows)
}

/// Rasterize `text` and randomly sample up to `max_samples` lit cells as
/// normalized points. Unknown characters (and spaces) advance the pen
/// without emitting anything; an all-blank string yields no samples.
pub fn sample_text_points<R: Rng>(text: &str, max_samples: usize, rng: &mut R) -> Vec<Vec2> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || max_samples == 0 {
        return Vec::new();
    }
    let width = chars.len() * ADVANCE - 1;
    let height = GLYPH_H;

    let mut lit: Vec<(usize, usize)> = Vec::new();
    for (ci, &c) in chars.iter().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let x0 = ci * ADVANCE;
        for (y, row) in rows.iter().enumerate() {
            for x in 0..GLYPH_W {
                if row & (1 << (GLYPH_W - 1 - x)) != 0 {
                    lit.push((x0 + x, y));
                }
            }
        }
    }
    if lit.is_empty() {
        return Vec::new();
    }

    // Sample with replacement, jittered inside the cell so repeated picks of
    // the same cell still land on distinct points.
    let mut out = Vec::with_capacity(max_samples);
    for _ in 0..max_samples {
        let (cx, cy) = lit[rng.gen_range(0..lit.len())];
        let fx = cx as f32 + rng.gen::<f32>();
        let fy = cy as f32 + rng.gen::<f32>();
        let nx = (fx / width as f32 - 0.5) * 2.0;
        let ny = -(fy / height as f32 - 0.5) * 2.0;
        out.push(Vec2::new(nx, ny));
    }
    out
}
