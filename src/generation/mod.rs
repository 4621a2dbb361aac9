//! # Generation Module
//!
//! Procedural dungeon generation: configuration, room storage, and the
//! generated-dungeon output type.
//!
//! The pipeline itself lives in [`dungeon`]; this module holds everything the
//! pipeline consumes and produces. Rooms are stored in an arena and addressed
//! by stable [`RoomId`] handles, so the graphs key on a cheap `Copy` value
//! instead of hashing mutable room structs.

pub mod dungeon;

pub use dungeon::*;

use crate::{DelveError, DelveResult, Graph, Rect, TraversalOrder};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Which rooms the removal phase targets first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalPolicy {
    /// Remove the smallest rooms first.
    Smallest,
    /// Remove the biggest rooms first.
    Biggest,
    /// Remove rooms in random order.
    Random,
}

/// Configuration for dungeon generation.
///
/// All knobs are checked by [`GenerationConfig::validate`] before a pipeline
/// run; generation never starts from an invalid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation.
    pub seed: u64,
    /// Dungeon width in cells.
    pub dungeon_width: i32,
    /// Dungeon height in cells.
    pub dungeon_height: i32,
    /// Minimum room width a split may produce.
    pub room_min_width: i32,
    /// Minimum room height a split may produce.
    pub room_min_height: i32,
    /// Overlap reserved between sibling rooms along a cut, in cells.
    pub wall_buffer: i32,
    /// Length of a door opening, in cells.
    pub door_size: i32,
    /// Whether to run the room-removal phase.
    pub remove_rooms: bool,
    /// Target percentage of rooms to remove (0 to 100).
    pub removal_percentage: f64,
    /// Selection policy for the room-removal phase.
    pub removal_policy: RemovalPolicy,
    /// Whether to collapse the room graph into a spanning tree.
    pub remove_cycles: bool,
    /// Traversal order used when collapsing cycles.
    pub traversal_order: TraversalOrder,
    /// Whether doors may widen to the full shared wall span.
    pub wide_doors: bool,
    /// Probability (0 to 1) of widening an eligible door.
    pub wide_door_chance: f64,
}

impl GenerationConfig {
    /// Creates the default configuration with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            dungeon_width: 1000,
            dungeon_height: 1000,
            room_min_width: 100,
            room_min_height: 100,
            wall_buffer: 1,
            door_size: 6,
            remove_rooms: true,
            removal_percentage: 10.0,
            removal_policy: RemovalPolicy::Smallest,
            remove_cycles: true,
            traversal_order: TraversalOrder::DepthFirst,
            wide_doors: false,
            wide_door_chance: 0.2,
        }
    }

    /// Creates a configuration for testing with a small, quick dungeon.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            dungeon_width: 100,
            dungeon_height: 100,
            room_min_width: 20,
            room_min_height: 20,
            wall_buffer: 1,
            door_size: 4,
            remove_rooms: true,
            removal_percentage: 10.0,
            removal_policy: RemovalPolicy::Smallest,
            remove_cycles: true,
            traversal_order: TraversalOrder::DepthFirst,
            wide_doors: false,
            wide_door_chance: 0.2,
        }
    }

    /// Rejects configurations the pipeline cannot generate from.
    ///
    /// Checked once before the first phase runs; mid-pipeline code may assume
    /// a valid configuration.
    pub fn validate(&self) -> DelveResult<()> {
        if self.dungeon_width < 1 || self.dungeon_height < 1 {
            return Err(DelveError::InvalidConfig(format!(
                "dungeon must be at least 1x1, got {}x{}",
                self.dungeon_width, self.dungeon_height
            )));
        }
        if self.room_min_width < 1 || self.room_min_height < 1 {
            return Err(DelveError::InvalidConfig(format!(
                "minimum room size must be at least 1x1, got {}x{}",
                self.room_min_width, self.room_min_height
            )));
        }
        if self.room_min_width >= self.dungeon_width
            || self.room_min_height >= self.dungeon_height
        {
            return Err(DelveError::InvalidConfig(format!(
                "minimum room size {}x{} does not fit dungeon {}x{}",
                self.room_min_width,
                self.room_min_height,
                self.dungeon_width,
                self.dungeon_height
            )));
        }
        if self.wall_buffer < 1 {
            return Err(DelveError::InvalidConfig(format!(
                "wall buffer must be at least 1, got {}",
                self.wall_buffer
            )));
        }
        if self.door_size < 1 {
            return Err(DelveError::InvalidConfig(format!(
                "door size must be at least 1, got {}",
                self.door_size
            )));
        }
        let narrowest = self.room_min_width.min(self.room_min_height);
        if 2 * self.wall_buffer + self.door_size > narrowest {
            return Err(DelveError::InvalidConfig(format!(
                "a door of size {} with wall buffer {} cannot fit rooms of minimum dimension {}",
                self.door_size, self.wall_buffer, narrowest
            )));
        }
        if !(0.0..=100.0).contains(&self.removal_percentage) {
            return Err(DelveError::InvalidConfig(format!(
                "removal percentage must be within 0..=100, got {}",
                self.removal_percentage
            )));
        }
        if !(0.0..=1.0).contains(&self.wide_door_chance) {
            return Err(DelveError::InvalidConfig(format!(
                "wide door chance must be within 0..=1, got {}",
                self.wide_door_chance
            )));
        }
        Ok(())
    }

    /// The dungeon bounds rectangle `[0, width) x [0, height)`.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.dungeon_width, self.dungeon_height)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Stable handle to a room or door record in a [`RoomArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// The arena slot this handle addresses.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A room or door rectangle.
///
/// Doors reuse the room representation with `is_door` set, so both can live
/// as nodes of the same graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// The rectangle this room covers, in dungeon coordinates.
    pub area: Rect,
    /// Cached `width * height`, used by the removal policies.
    pub size: i32,
    /// Distinguishes door records from room records.
    pub is_door: bool,
}

/// Owning storage for every room and door a generation run creates.
///
/// Records are never deleted; the graphs decide which handles are alive.
/// Identity is the handle, so two records with identical rectangles stay
/// distinct nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomArena {
    rooms: Vec<Room>,
}

impl RoomArena {
    pub fn new() -> Self {
        Self { rooms: Vec::new() }
    }

    /// Allocates a room record and returns its handle.
    pub fn alloc_room(&mut self, area: Rect) -> RoomId {
        self.alloc(area, false)
    }

    /// Allocates a door record and returns its handle.
    pub fn alloc_door(&mut self, area: Rect) -> RoomId {
        self.alloc(area, true)
    }

    fn alloc(&mut self, area: Rect, is_door: bool) -> RoomId {
        let id = RoomId(self.rooms.len() as u32);
        self.rooms.push(Room {
            area,
            size: area.area(),
            is_door,
        });
        id
    }

    /// Looks up a record. Handles are only ever minted by this arena, so a
    /// lookup with a foreign handle is a caller bug.
    pub fn get(&self, id: RoomId) -> &Room {
        &self.rooms[id.index()]
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// A fully generated dungeon.
///
/// Consumers get read access only after generation completes; nothing here
/// mutates. The room graph connects rooms through mediating door nodes (after
/// door placement no room links directly to another room), and the door graph
/// links each door to the two rooms it serves.
#[derive(Debug, Clone)]
pub struct Dungeon {
    /// The dungeon bounds `[0, width) x [0, height)`.
    pub bounds: Rect,
    /// Storage for every room and door record.
    pub arena: RoomArena,
    /// Connectivity over rooms, mediated by door nodes.
    pub rooms: Graph<RoomId>,
    /// Doors, each linked to the two rooms it connects.
    pub doors: Graph<RoomId>,
    /// Rooms culled by the removal phase, in removal order.
    pub removed_rooms: Vec<RoomId>,
    /// The seed this dungeon was generated from.
    pub seed: u64,
}

impl Dungeon {
    /// Live room handles (doors excluded) in insertion order.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms
            .nodes()
            .iter()
            .copied()
            .filter(|&id| !self.arena.get(id).is_door)
            .collect()
    }

    /// Door handles in placement order.
    pub fn door_ids(&self) -> Vec<RoomId> {
        self.doors
            .nodes()
            .iter()
            .copied()
            .filter(|&id| self.arena.get(id).is_door)
            .collect()
    }

    /// The rectangle of a room or door.
    pub fn rect_of(&self, id: RoomId) -> Rect {
        self.arena.get(id).area
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content from a configuration and a seeded random number
    /// generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Validates that generated content meets structural requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Generator type name for logging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions shared by generators and their tests.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates the seeded random number generator for a config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Validates the structural invariants of a generated dungeon: at least
    /// one room, every rectangle inside the bounds, and no direct room-room
    /// edge once doors exist.
    pub fn validate_dungeon(dungeon: &Dungeon) -> DelveResult<()> {
        let room_ids = dungeon.room_ids();
        if room_ids.is_empty() {
            return Err(DelveError::GenerationFailed(
                "dungeon has no rooms".to_string(),
            ));
        }

        for &id in dungeon.rooms.nodes() {
            let area = dungeon.rect_of(id);
            if area.width <= 0 || area.height <= 0 {
                return Err(DelveError::GenerationFailed(format!(
                    "degenerate rectangle {:?} for {:?}",
                    area, id
                )));
            }
            if area.x_min() < dungeon.bounds.x_min()
                || area.y_min() < dungeon.bounds.y_min()
                || area.x_max() > dungeon.bounds.x_max()
                || area.y_max() > dungeon.bounds.y_max()
            {
                return Err(DelveError::GenerationFailed(format!(
                    "rectangle {:?} for {:?} escapes the dungeon bounds",
                    area, id
                )));
            }
        }

        if !dungeon.door_ids().is_empty() {
            for &room in &room_ids {
                for &neighbor in dungeon.rooms.neighbors(room) {
                    if !dungeon.arena.get(neighbor).is_door {
                        return Err(DelveError::GenerationFailed(format!(
                            "unmediated room-room edge {:?} - {:?}",
                            room, neighbor
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
