//! # Delve
//!
//! A procedural dungeon generation and grid pathfinding library.
//!
//! ## Architecture Overview
//!
//! The crate is a strict pipeline of three independent stages:
//!
//! - **Generation**: recursive rectangle partitioning splits the dungeon
//!   into rooms, a connectivity graph is built over their overlaps, rooms
//!   are culled without breaking connectivity, cycles are optionally
//!   collapsed into a spanning tree, and doors are carved where rooms meet.
//! - **Rasterization**: the room and door rectangles become a 2D occupancy
//!   grid of walls and floors.
//! - **Pathfinding**: a navigation graph over the grid's passable cells
//!   answers point-to-point queries with BFS, Dijkstra, or A*.
//!
//! Generation is deterministic: a fixed seed and configuration always
//! produce bit-identical rooms, doors, and graphs.
//!
//! ```
//! use delve::{generate_dungeon, GenerationConfig, NavGraph, PathAlgorithm};
//!
//! let config = GenerationConfig::for_testing(42);
//! let dungeon = generate_dungeon(&config)?;
//! let map = dungeon.tile_map();
//!
//! let nav = NavGraph::build(&map);
//! let rooms = dungeon.room_ids();
//! let path = nav.find_path(
//!     dungeon.rect_of(rooms[0]).center().center(),
//!     dungeon.rect_of(rooms[rooms.len() - 1]).center().center(),
//!     PathAlgorithm::AStar,
//! );
//! assert!(!path.is_empty());
//! # Ok::<(), delve::DelveError>(())
//! ```

pub mod generation;
pub mod geometry;
pub mod graph;
pub mod pathfinding;
pub mod tilemap;

pub use generation::*;
pub use geometry::*;
pub use graph::*;
pub use pathfinding::*;
pub use tilemap::*;

/// Core error type for the delve library.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration rejected before generation started
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generation produced a structurally invalid dungeon
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library configuration constants.
pub mod config {
    /// Default dungeon width in cells
    pub const DEFAULT_DUNGEON_WIDTH: i32 = 1000;

    /// Default dungeon height in cells
    pub const DEFAULT_DUNGEON_HEIGHT: i32 = 1000;

    /// Default minimum room dimension in cells
    pub const DEFAULT_ROOM_MIN: i32 = 100;

    /// Default door opening length in cells
    pub const DEFAULT_DOOR_SIZE: i32 = 6;

    /// Default share of rooms the removal phase targets, in percent
    pub const DEFAULT_REMOVAL_PERCENTAGE: f64 = 10.0;
}
