//! # Tile Map Rasterizer
//!
//! Converts the generated room and door rectangles into a 2D occupancy grid
//! for navigation or rendering.
//!
//! Room outlines are drawn as walls first, then every door is carved back to
//! floor — order matters, doors win all conflicts, so a door always opens a
//! passage through the wall it sits on.

use crate::{Dungeon, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Occupancy of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    /// Passable.
    Floor,
    /// Impassable.
    Wall,
}

/// A dungeon-sized occupancy grid, indexed `[y][x]`.
///
/// Produced once per generation and read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    width: i32,
    height: i32,
    cells: Vec<Tile>,
}

impl TileMap {
    /// Creates an all-floor grid of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![Tile::Floor; (width.max(0) * height.max(0)) as usize],
        }
    }

    /// Rasterizes a generated dungeon into an occupancy grid.
    pub fn rasterize(dungeon: &Dungeon) -> Self {
        let mut map = Self::new(dungeon.bounds.width, dungeon.bounds.height);

        for id in dungeon.room_ids() {
            map.fill_outline(dungeon.rect_of(id), Tile::Wall);
        }

        for id in dungeon.door_ids() {
            let area = dungeon.rect_of(id);
            map.fill_outline(area, Tile::Floor);
            map.fill(area, Tile::Floor);
        }

        map
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// The tile at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<Tile> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some(self.cells[(y * self.width + x) as usize])
    }

    /// True when `(x, y)` is a wall. Out-of-bounds cells count as walls.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        !matches!(self.get(x, y), Some(Tile::Floor))
    }

    fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return;
        }
        self.cells[(y * self.width + x) as usize] = tile;
    }

    /// Writes `tile` to every cell on the rectangle's border, clipped to the
    /// grid.
    pub fn fill_outline(&mut self, rect: Rect, tile: Tile) {
        for x in rect.x_min()..rect.x_max() {
            self.set(x, rect.y_min(), tile);
            self.set(x, rect.y_max() - 1, tile);
        }
        for y in rect.y_min()..rect.y_max() {
            self.set(rect.x_min(), y, tile);
            self.set(rect.x_max() - 1, y, tile);
        }
    }

    /// Writes `tile` to every cell of the rectangle, border and interior,
    /// clipped to the grid.
    pub fn fill(&mut self, rect: Rect, tile: Tile) {
        for y in rect.y_min()..rect.y_max() {
            for x in rect.x_min()..rect.x_max() {
                self.set(x, y, tile);
            }
        }
    }

    /// Renders the grid as text, `#` for walls and `0` for floor. With
    /// `flip`, rows print bottom-up so y grows upward on screen.
    pub fn render(&self, flip: bool) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        let rows: Vec<i32> = if flip {
            (0..self.height).rev().collect()
        } else {
            (0..self.height).collect()
        };
        for y in rows {
            for x in 0..self.width {
                out.push(if self.is_wall(x, y) { '#' } else { '0' });
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for TileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

impl Dungeon {
    /// Rasterizes this dungeon into an occupancy grid.
    pub fn tile_map(&self) -> TileMap {
        TileMap::rasterize(self)
    }
}
