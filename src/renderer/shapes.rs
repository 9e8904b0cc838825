//! Shape generation for 2D primitives

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::ui::{CellKind, Scene};

/// Two triangles covering the axis-aligned rectangle `min..max`
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Vertices (board pixels) for every cell in the scene plus the pause mask
pub fn scene_vertices(scene: &Scene) -> Vec<Vertex> {
    let size = scene.grid.cell_size as f32;
    let mut vertices = Vec::with_capacity((scene.cells.len() + 1) * 6);

    for cell in &scene.cells {
        let color = match cell.kind {
            CellKind::Snake => colors::SNAKE,
            CellKind::Food => colors::FOOD,
        };
        let min = Vec2::new(cell.pos.x as f32, cell.pos.y as f32);
        vertices.extend_from_slice(&rect(min, min + Vec2::splat(size), color));
    }

    if scene.overlay.is_some() {
        let board = Vec2::new(scene.grid.width as f32, scene.grid.height as f32);
        vertices.extend_from_slice(&rect(Vec2::ZERO, board, colors::MASK));
    }

    vertices
}
