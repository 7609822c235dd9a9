//! Grid ↔ world coordinate conversion.

use crate::state::Position;

/// Point in the abstract world space consumed by presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Fixed affine transform: `world = origin + (cell + 0.5) * cell_size`.
///
/// The transform knows nothing about rendering; it maps a cell to the world
/// position of its centre and back.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridTransform {
    pub origin: WorldPoint,
    pub cell_size: f32,
}

impl GridTransform {
    pub const fn new(origin: WorldPoint, cell_size: f32) -> Self {
        Self { origin, cell_size }
    }

    /// World-space centre of a cell.
    pub fn to_world(&self, position: Position) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (position.x as f32 + 0.5) * self.cell_size,
            self.origin.y + (position.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Cell containing a world point. May lie outside any particular grid.
    pub fn to_grid(&self, point: WorldPoint) -> Position {
        Position::new(
            ((point.x - self.origin.x) / self.cell_size).floor() as i32,
            ((point.y - self.origin.y) / self.cell_size).floor() as i32,
        )
    }
}

impl Default for GridTransform {
    fn default() -> Self {
        Self::new(WorldPoint::default(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_cell_centres() {
        let transform = GridTransform::new(WorldPoint::new(-10.0, 4.0), 32.0);
        let cell = Position::new(3, 7);
        let world = transform.to_world(cell);
        assert_eq!(world, WorldPoint::new(-10.0 + 3.5 * 32.0, 4.0 + 7.5 * 32.0));
        assert_eq!(transform.to_grid(world), cell);
    }

    #[test]
    fn points_left_of_origin_map_to_negative_cells() {
        let transform = GridTransform::new(WorldPoint::default(), 16.0);
        assert_eq!(
            transform.to_grid(WorldPoint::new(-0.5, 15.9)),
            Position::new(-1, 0)
        );
    }
}
