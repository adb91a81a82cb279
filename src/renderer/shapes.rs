//! Shape generation for 2D primitives
//!
//! All shapes are triangle lists in canvas pixel space (origin top-left).

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::vertex::Vertex;

/// Axis-aligned filled rectangle
pub fn quad(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    gradient_quad(min, max, color, color)
}

/// Rectangle whose color blends from `top` to `bottom`
pub fn gradient_quad(min: Vec2, max: Vec2, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, top),
        Vertex::new(max.x, min.y, top),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(max.x, min.y, top),
        Vertex::new(max.x, max.y, bottom),
    ]
}

/// Thick line segment from `a` to `b`
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    sector(center, radius, 0.0, 2.0 * PI, color, segments)
}

/// Filled pie slice from `start` spanning `span` radians
fn sector(
    center: Vec2,
    radius: f32,
    start: f32,
    span: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * span;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * span;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Filled rectangle with rounded corners
///
/// The corner radius is limited to half the shorter side.
pub fn rounded_rect(
    min: Vec2,
    size: Vec2,
    radius: f32,
    color: [f32; 4],
    corner_segments: u32,
) -> Vec<Vertex> {
    let r = radius.clamp(0.0, size.x.min(size.y) / 2.0);
    let max = min + size;
    if r <= 0.0 {
        return quad(min, max, color);
    }

    let mut vertices = Vec::with_capacity(18 + (corner_segments * 12) as usize);

    // Middle column spans full height, side strips fill between the corners
    vertices.extend(quad(Vec2::new(min.x + r, min.y), Vec2::new(max.x - r, max.y), color));
    vertices.extend(quad(
        Vec2::new(min.x, min.y + r),
        Vec2::new(min.x + r, max.y - r),
        color,
    ));
    vertices.extend(quad(
        Vec2::new(max.x - r, min.y + r),
        Vec2::new(max.x, max.y - r),
        color,
    ));

    // Corners (y grows downward, so angles run clockwise on screen)
    let corners = [
        (Vec2::new(max.x - r, max.y - r), 0.0),
        (Vec2::new(min.x + r, max.y - r), FRAC_PI_2),
        (Vec2::new(min.x + r, min.y + r), PI),
        (Vec2::new(max.x - r, min.y + r), PI + FRAC_PI_2),
    ];
    for (center, start) in corners {
        vertices.extend(sector(center, r, start, FRAC_PI_2, color, corner_segments));
    }

    vertices
}

/// Rotate vertices in place by `angle` radians around `pivot`
pub fn rotate(vertices: &mut [Vertex], pivot: Vec2, angle: f32) {
    if angle == 0.0 {
        return;
    }
    let (sin, cos) = angle.sin_cos();
    for v in vertices {
        let p = Vec2::from(v.position) - pivot;
        let rotated = Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos) + pivot;
        v.position = rotated.into();
    }
}
