//! Spatial model of the battlefield.
//!
//! The grid owns terrain, spawn zones and the occupancy table. Cells store
//! the occupant's [`EntityId`] only; combatant records live in the arena.
//! Occupancy changes go through [`Grid::claim`], [`Grid::release`] and
//! [`Grid::relocate`], each of which validates fully before mutating.

mod path;
mod transform;

pub use transform::{GridTransform, WorldPoint};

use crate::state::{EntityId, Position, Team};

// ============================================================================
// Cells
// ============================================================================

/// Canonical terrain classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Floor,
    Wall,
    Water,
    Void,
}

impl TerrainKind {
    pub fn is_walkable(self) -> bool {
        matches!(self, TerrainKind::Floor)
    }

    fn from_glyph(glyph: char) -> Option<(Self, Option<Team>)> {
        let parsed = match glyph {
            '.' => (TerrainKind::Floor, None),
            'P' => (TerrainKind::Floor, Some(Team::Player)),
            'E' => (TerrainKind::Floor, Some(Team::Enemy)),
            '#' => (TerrainKind::Wall, None),
            '~' => (TerrainKind::Water, None),
            ' ' | '_' => (TerrainKind::Void, None),
            _ => return None,
        };
        Some(parsed)
    }
}

/// One cell of the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub terrain: TerrainKind,
    pub occupant: Option<EntityId>,
    /// Special zone: side allowed to start on this cell.
    pub spawn_zone: Option<Team>,
}

impl Cell {
    pub fn is_walkable(&self) -> bool {
        self.terrain.is_walkable()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn is_special_zone(&self) -> bool {
        self.spawn_zone.is_some()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised by occupancy mutations and layout parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    #[error("position {0} is out of bounds")]
    OutOfBounds(Position),

    #[error("position {0} is not walkable")]
    NotWalkable(Position),

    #[error("position {position} is already occupied by {occupant}")]
    Occupied { position: Position, occupant: EntityId },

    #[error("{entity} does not occupy {position}")]
    NotOccupant { entity: EntityId, position: Position },

    #[error("unknown layout glyph {glyph:?} at {position}")]
    UnknownGlyph { glyph: char, position: Position },

    #[error("layout rows have inconsistent widths")]
    RaggedLayout,
}

// ============================================================================
// Grid
// ============================================================================

/// Battlefield grid stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid where every cell is empty floor.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    /// Parses an ASCII layout, one string per row (top row first).
    ///
    /// Glyphs: `.` floor, `P` player spawn zone, `E` enemy spawn zone,
    /// `#` wall, `~` water, space or `_` void.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let height = rows.len() as u32;
        let width = rows
            .first()
            .map(|row| row.as_ref().chars().count() as u32)
            .unwrap_or(0);

        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() as u32 != width {
                return Err(GridError::RaggedLayout);
            }
            for (x, glyph) in row.chars().enumerate() {
                let position = Position::new(x as i32, y as i32);
                let (terrain, zone) = TerrainKind::from_glyph(glyph)
                    .ok_or(GridError::UnknownGlyph { glyph, position })?;
                let cell = grid.cell_mut(position).ok_or(GridError::OutOfBounds(position))?;
                cell.terrain = terrain;
                cell.spawn_zone = zone;
            }
        }
        Ok(grid)
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| (position.y as usize) * (self.width as usize) + position.x as usize)
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index(position).map(|index| &self.cells[index])
    }

    fn cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        self.index(position).map(|index| &mut self.cells[index])
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    pub fn set_terrain(&mut self, position: Position, terrain: TerrainKind) -> Result<(), GridError> {
        let cell = self.cell_mut(position).ok_or(GridError::OutOfBounds(position))?;
        cell.terrain = terrain;
        Ok(())
    }

    pub fn set_spawn_zone(&mut self, position: Position, zone: Option<Team>) -> Result<(), GridError> {
        let cell = self.cell_mut(position).ok_or(GridError::OutOfBounds(position))?;
        cell.spawn_zone = zone;
        Ok(())
    }

    /// Terrain allows standing here, ignoring occupancy.
    pub fn is_passable(&self, position: Position) -> bool {
        self.cell(position).is_some_and(Cell::is_walkable)
    }

    /// Terrain allows standing here and nobody does.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.cell(position)
            .is_some_and(|cell| cell.is_walkable() && !cell.is_occupied())
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.occupant(position).is_some()
    }

    pub fn occupant(&self, position: Position) -> Option<EntityId> {
        self.cell(position).and_then(|cell| cell.occupant)
    }

    /// Free spawn cells reserved for `team`, in row-major order.
    pub fn spawn_zones(&self, team: Team) -> Vec<Position> {
        self.positions()
            .filter(|&position| {
                self.cell(position)
                    .is_some_and(|cell| cell.spawn_zone == Some(team) && cell.is_walkable())
            })
            .collect()
    }

    /// Checks that `entity` could claim `position` without mutating anything.
    pub fn can_claim(&self, position: Position, entity: EntityId) -> Result<(), GridError> {
        let cell = self.cell(position).ok_or(GridError::OutOfBounds(position))?;
        if !cell.is_walkable() {
            return Err(GridError::NotWalkable(position));
        }
        match cell.occupant {
            Some(occupant) if occupant != entity => Err(GridError::Occupied { position, occupant }),
            _ => Ok(()),
        }
    }

    /// Marks `position` as held by `entity`.
    pub fn claim(&mut self, position: Position, entity: EntityId) -> Result<(), GridError> {
        self.can_claim(position, entity)?;
        if let Some(cell) = self.cell_mut(position) {
            cell.occupant = Some(entity);
        }
        Ok(())
    }

    /// Frees `position`, which must be held by `entity`.
    pub fn release(&mut self, position: Position, entity: EntityId) -> Result<(), GridError> {
        let cell = self.cell_mut(position).ok_or(GridError::OutOfBounds(position))?;
        if cell.occupant != Some(entity) {
            return Err(GridError::NotOccupant { entity, position });
        }
        cell.occupant = None;
        Ok(())
    }

    /// Atomically frees `from` and claims `to` for `entity`.
    ///
    /// Both ends are validated before either cell changes.
    pub fn relocate(&mut self, entity: EntityId, from: Position, to: Position) -> Result<(), GridError> {
        if self.occupant(from) != Some(entity) {
            return Err(GridError::NotOccupant {
                entity,
                position: from,
            });
        }
        if from == to {
            return Ok(());
        }
        self.can_claim(to, entity)?;
        self.release(from, entity)?;
        self.claim(to, entity)
    }

    /// Cell under a world point, or `None` when the point is off this grid.
    pub fn cell_at(&self, transform: &GridTransform, point: WorldPoint) -> Option<Position> {
        let position = transform.to_grid(point);
        self.contains(position).then_some(position)
    }

    /// All occupied cells with their occupant, row-major.
    pub fn occupancy(&self) -> impl Iterator<Item = (Position, EntityId)> + '_ {
        self.positions()
            .filter_map(|position| self.occupant(position).map(|id| (position, id)))
    }
}
