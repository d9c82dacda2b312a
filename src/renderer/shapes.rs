//! Shape generation for 2D primitives
//!
//! Everything is built from axis-aligned quads in stage coordinates.

use glam::Vec2;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Two triangles covering `rect`
pub fn quad(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    push_quad(&mut vertices, rect.min(), rect.max(), color);
    vertices
}

fn push_quad(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, color: [f32; 4]) {
    if max.x <= min.x || max.y <= min.y {
        return;
    }
    out.push(Vertex::new(min.x, min.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(min.x, max.y, color));

    out.push(Vertex::new(min.x, max.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(max.x, max.y, color));
}

/// Hollow rectangle of the given line width, drawn inside `rect`
pub fn stroke(rect: &Rect, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let (min, max) = (rect.min(), rect.max());
    let w = width.min(rect.size.x / 2.0).min(rect.size.y / 2.0);
    let mut vertices = Vec::with_capacity(24);
    // Top and bottom span the full width, sides fill between them
    push_quad(&mut vertices, min, Vec2::new(max.x, min.y + w), color);
    push_quad(&mut vertices, Vec2::new(min.x, max.y - w), max, color);
    push_quad(&mut vertices, Vec2::new(min.x, min.y + w), Vec2::new(min.x + w, max.y - w), color);
    push_quad(&mut vertices, Vec2::new(max.x - w, min.y + w), Vec2::new(max.x, max.y - w), color);
    vertices
}

/// Thick line segment between two points
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Soft halo around `rect`: concentric translucent rects, outermost first.
///
/// Approximates a canvas shadow blur of radius `blur`.
pub fn glow(rect: &Rect, blur: f32, layers: u32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(layers as usize * 6);
    for i in (1..=layers).rev() {
        let t = i as f32 / layers as f32;
        let grow = Vec2::splat(blur * t * 0.5);
        let alpha = color[3] * 0.35 * (1.0 - t * 0.8);
        let halo = [color[0], color[1], color[2], alpha];
        push_quad(&mut vertices, rect.min() - grow, rect.max() + grow, halo);
    }
    vertices
}

/// 3x5 bitmap digits, one bit per cell, rows top to bottom
const DIGIT_ROWS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Render a run of decimal digits centred on `center`. Non-digits are skipped.
pub fn digits(text: &str, center: Vec2, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    let cell = height / 5.0;
    let glyphs: Vec<usize> = text
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as usize)
        .collect();
    if glyphs.is_empty() {
        return Vec::new();
    }

    // 3 cells per glyph plus 1 cell of spacing between glyphs
    let width = cell * (glyphs.len() as f32 * 4.0 - 1.0);
    let origin = center - Vec2::new(width, height) / 2.0;

    let mut vertices = Vec::new();
    for (n, glyph) in glyphs.iter().enumerate() {
        let gx = origin.x + n as f32 * 4.0 * cell;
        for (row, bits) in DIGIT_ROWS[*glyph].iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) != 0 {
                    let min = Vec2::new(gx + col as f32 * cell, origin.y + row as f32 * cell);
                    push_quad(&mut vertices, min, min + Vec2::splat(cell), color);
                }
            }
        }
    }
    vertices
}
