//! # Dungeon Generation
//!
//! Binary-space-partition dungeon layout generation.
//!
//! The generator runs five strictly ordered phases over a shared room graph:
//!
//! 1. **Splitting** — recursively cut the dungeon rectangle into rooms, each
//!    cut leaving a `wall_buffer`-wide overlap between the two children.
//! 2. **Connection finding** — link every pair of rooms whose overlap is
//!    large enough to hold a door.
//! 3. **Room removal** — cull rooms by size policy while the remaining rooms
//!    stay fully connected.
//! 4. **Cycle removal** — collapse the graph into a spanning tree so exactly
//!    one simple path exists between any two rooms.
//! 5. **Door placement** — replace each room-room edge with a door node
//!    carved out of the pair's shared overlap.
//!
//! Each phase completes before the next starts; the whole pipeline is a
//! single synchronous call, deterministic for a fixed seed and configuration.

use crate::generation::{
    utils, Dungeon, GenerationConfig, Generator, RemovalPolicy, RoomArena, RoomId,
};
use crate::{DelveResult, Graph, Rect};
use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng};
use std::collections::{HashSet, VecDeque};

/// Dungeon generator using recursive rectangle partitioning.
///
/// All tuning lives in [`GenerationConfig`]; the generator itself is
/// stateless and reusable across runs.
///
/// # Examples
///
/// ```
/// use delve::{generate_dungeon, GenerationConfig};
///
/// let config = GenerationConfig::for_testing(42);
/// let dungeon = generate_dungeon(&config).unwrap();
/// assert!(!dungeon.room_ids().is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BspDungeonGenerator;

impl BspDungeonGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator<Dungeon> for BspDungeonGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Dungeon> {
        config.validate()?;

        info!(
            "generating {}x{} dungeon with seed {}",
            config.dungeon_width, config.dungeon_height, config.seed
        );

        let mut pipeline = Pipeline::new(config, rng);

        pipeline.split_rooms();
        debug!("splitting settled at {} rooms", pipeline.rooms.node_count());

        pipeline.find_connections();

        if config.remove_rooms {
            pipeline.remove_rooms();
            debug!("removed {} rooms", pipeline.removed.len());
        }

        if config.remove_cycles {
            pipeline.remove_cycles();
        }

        pipeline.place_doors();
        debug!("placed {} doors", pipeline.doors.node_count());

        let dungeon = pipeline.finish();
        utils::validate_dungeon(&dungeon)?;

        info!(
            "generated {} rooms and {} doors",
            dungeon.room_ids().len(),
            dungeon.door_ids().len()
        );

        Ok(dungeon)
    }

    fn validate(&self, dungeon: &Dungeon, _config: &GenerationConfig) -> DelveResult<()> {
        utils::validate_dungeon(dungeon)
    }

    fn generator_type(&self) -> &'static str {
        "BspDungeonGenerator"
    }
}

/// Generates a dungeon from a configuration, seeding the generator from
/// `config.seed`. This is the library's single entry point for consumers
/// that do not manage their own RNG.
pub fn generate_dungeon(config: &GenerationConfig) -> DelveResult<Dungeon> {
    let mut rng = utils::create_rng(config);
    BspDungeonGenerator::new().generate(config, &mut rng)
}

/// Working state of one generation run. The pipeline exclusively owns the
/// arena and both graphs until [`Pipeline::finish`] hands them to the
/// read-only [`Dungeon`].
struct Pipeline<'a, 'r> {
    config: &'a GenerationConfig,
    rng: &'r mut StdRng,
    arena: RoomArena,
    rooms: Graph<RoomId>,
    doors: Graph<RoomId>,
    removed: Vec<RoomId>,
}

impl<'a, 'r> Pipeline<'a, 'r> {
    fn new(config: &'a GenerationConfig, rng: &'r mut StdRng) -> Self {
        let mut arena = RoomArena::new();
        let mut rooms = Graph::new();
        let root = arena.alloc_room(config.bounds());
        rooms.add_node(root);

        Self {
            config,
            rng,
            arena,
            rooms,
            doors: Graph::new(),
            removed: Vec::new(),
        }
    }

    /// Phase 1: repeatedly pass over the rooms, splitting each along a
    /// randomly chosen axis, until a full pass changes nothing.
    ///
    /// A room too small along the chosen axis falls back to the other axis;
    /// too small along both, it is left alone for the pass.
    fn split_rooms(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            let unfinished: Vec<RoomId> = self.rooms.nodes().to_vec();

            for &id in unfinished.iter().rev() {
                let area = self.arena.get(id).area;
                if self.rng.gen_bool(0.5) {
                    if area.height / 2 > self.config.room_min_height {
                        self.split_horizontally(id);
                        changed = true;
                    } else if area.width / 2 > self.config.room_min_width {
                        self.split_vertically(id);
                        changed = true;
                    }
                } else if area.width / 2 > self.config.room_min_width {
                    self.split_vertically(id);
                    changed = true;
                } else if area.height / 2 > self.config.room_min_height {
                    self.split_horizontally(id);
                    changed = true;
                }
            }
        }
    }

    /// Splits a room along a horizontal cut (reducing height). The top child
    /// is extended downward by `wall_buffer` so the children overlap.
    fn split_horizontally(&mut self, id: RoomId) {
        let room = self.arena.get(id).area;
        let buffer = self.config.wall_buffer;

        let cut = self
            .rng
            .gen_range(self.config.room_min_height..=room.height - self.config.room_min_height);

        let top = Rect::new(room.x, room.y + cut - buffer, room.width, room.height - cut + buffer);
        let bottom = Rect::new(room.x, room.y, room.width, cut);

        let top_id = self.arena.alloc_room(top);
        let bottom_id = self.arena.alloc_room(bottom);
        self.rooms.add_node(top_id);
        self.rooms.add_node(bottom_id);
        self.rooms.remove_node(id);
    }

    /// Splits a room along a vertical cut (reducing width). The right child
    /// is extended leftward by `wall_buffer` so the children overlap.
    fn split_vertically(&mut self, id: RoomId) {
        let room = self.arena.get(id).area;
        let buffer = self.config.wall_buffer;

        let cut = self
            .rng
            .gen_range(self.config.room_min_width..=room.width - self.config.room_min_width);

        let left = Rect::new(room.x, room.y, cut, room.height);
        let right = Rect::new(room.x + cut - buffer, room.y, room.width - cut + buffer, room.height);

        let left_id = self.arena.alloc_room(left);
        let right_id = self.arena.alloc_room(right);
        self.rooms.add_node(left_id);
        self.rooms.add_node(right_id);
        self.rooms.remove_node(id);
    }

    /// Phase 2: connect every pair of rooms whose rectangles overlap by
    /// enough to hold a door plus its wall buffer on both sides. O(n²) over
    /// the settled room list.
    fn find_connections(&mut self) {
        let list: Vec<RoomId> = self.rooms.nodes().to_vec();
        let needed = 2 * self.config.wall_buffer + self.config.door_size;

        for i in 0..list.len() {
            for k in (i + 1)..list.len() {
                let a = self.arena.get(list[i]).area;
                let b = self.arena.get(list[k]).area;
                if let Some(overlap) = a.intersection(&b) {
                    if overlap.width >= needed || overlap.height >= needed {
                        self.rooms.add_edge(list[i], list[k]);
                    }
                }
            }
        }
    }

    /// Phase 3: cull rooms by the configured size policy while the survivors
    /// stay fully connected.
    ///
    /// Each candidate is speculatively removed and the remainder flood-filled;
    /// a candidate whose removal splits the dungeon is restored and the whole
    /// phase stops there. Falling short of the target percentage is expected,
    /// not an error.
    fn remove_rooms(&mut self) {
        let start_count = self.rooms.node_count() as f64;
        let mut percentage_removed = 0.0;

        let mut candidates: Vec<RoomId> = self.rooms.nodes().to_vec();
        match self.config.removal_policy {
            RemovalPolicy::Smallest => {
                candidates.sort_by_key(|&id| self.arena.get(id).size);
            }
            RemovalPolicy::Biggest => {
                candidates.sort_by_key(|&id| std::cmp::Reverse(self.arena.get(id).size));
            }
            RemovalPolicy::Random => {}
        }

        while percentage_removed < self.config.removal_percentage {
            if candidates.is_empty() {
                break;
            }
            let idx = match self.config.removal_policy {
                RemovalPolicy::Random => self.rng.gen_range(0..candidates.len()),
                _ => 0,
            };
            let candidate = candidates[idx];

            let saved_neighbors: Vec<RoomId> = self.rooms.neighbors(candidate).to_vec();
            self.rooms.remove_node(candidate);
            candidates.remove(idx);

            if self.all_rooms_connected(&candidates) {
                self.removed.push(candidate);
                percentage_removed =
                    (1.0 - self.rooms.node_count() as f64 / start_count) * 100.0;
            } else {
                self.rooms.add_node(candidate);
                for &neighbor in saved_neighbors.iter().rev() {
                    self.rooms.add_edge(candidate, neighbor);
                }
                debug!(
                    "removal stopped at {:.1}% to preserve connectivity",
                    percentage_removed
                );
                break;
            }
        }
    }

    /// Flood fill from the first listed room; true iff every listed room is
    /// reached. An empty list counts as disconnected.
    fn all_rooms_connected(&self, list: &[RoomId]) -> bool {
        let Some(&first) = list.first() else {
            return false;
        };

        let mut discovered = HashSet::new();
        let mut queue = VecDeque::from([first]);
        discovered.insert(first);

        while let Some(room) = queue.pop_front() {
            for &neighbor in self.rooms.neighbors(room) {
                if discovered.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        list.iter().all(|room| discovered.contains(room))
    }

    /// Phase 4: collapse the room graph into a spanning tree rooted at the
    /// first room in insertion order, leaving exactly one simple path between
    /// any two rooms. The graph must be connected entering this phase.
    fn remove_cycles(&mut self) {
        let Some(&root) = self.rooms.nodes().first() else {
            return;
        };
        debug_assert!(self.all_rooms_connected(&self.rooms.nodes().to_vec()));
        self.rooms.spanning_tree(root, self.config.traversal_order);
    }

    /// Phase 5: replace every room-room edge with a mediating door node.
    ///
    /// The door rectangle runs along the longer axis of the pair's overlap at
    /// a random offset; with wide doors enabled and differing room
    /// dimensions, it occasionally spans the whole valid opening. The door
    /// joins both graphs, linked to both rooms, and the direct room-room edge
    /// is removed.
    fn place_doors(&mut self) {
        let room_list: Vec<RoomId> = self.rooms.nodes().to_vec();

        for &room in &room_list {
            loop {
                let next = self
                    .rooms
                    .neighbors(room)
                    .iter()
                    .rev()
                    .copied()
                    .find(|&n| !self.arena.get(n).is_door);
                let Some(neighbor) = next else {
                    break;
                };
                self.place_door_between(room, neighbor);
            }
        }
    }

    fn place_door_between(&mut self, room: RoomId, neighbor: RoomId) {
        let a = self.arena.get(room).area;
        let b = self.arena.get(neighbor).area;
        let buffer = self.config.wall_buffer;
        let door_size = self.config.door_size;

        // Phase 2's gate makes a degenerate overlap impossible, but a bogus
        // edge must not wedge the placement loop.
        let Some(overlap) = a.intersection(&b) else {
            warn!("connected rooms {:?} and {:?} no longer overlap", room, neighbor);
            self.rooms.remove_edge(room, neighbor);
            return;
        };

        let door_area = if overlap.width > overlap.height {
            let lo = overlap.x_min() + buffer;
            let hi = overlap.x_max() - buffer - door_size;
            if lo > hi {
                warn!("overlap {:?} is too narrow for a door", overlap);
                self.rooms.remove_edge(room, neighbor);
                return;
            }
            let pos = self.rng.gen_range(lo..=hi);
            if self.config.wide_doors
                && a.width != b.width
                && self.rng.gen_bool(self.config.wide_door_chance)
            {
                Rect::new(lo, overlap.y, overlap.width - 2 * buffer, overlap.height)
            } else {
                Rect::new(pos, overlap.y, door_size, overlap.height)
            }
        } else {
            let lo = overlap.y_min() + buffer;
            let hi = overlap.y_max() - buffer - door_size;
            if lo > hi {
                warn!("overlap {:?} is too short for a door", overlap);
                self.rooms.remove_edge(room, neighbor);
                return;
            }
            let pos = self.rng.gen_range(lo..=hi);
            if self.config.wide_doors
                && a.height != b.height
                && self.rng.gen_bool(self.config.wide_door_chance)
            {
                Rect::new(overlap.x, lo, overlap.width, overlap.height - 2 * buffer)
            } else {
                Rect::new(overlap.x, pos, overlap.width, door_size)
            }
        };

        let door = self.arena.alloc_door(door_area);

        // The door graph keys doors only; the room endpoints are recorded as
        // half-edges on the door's side.
        self.doors.add_node(door);
        self.doors.add_edge(door, room);
        self.doors.add_edge(door, neighbor);

        self.rooms.add_node(door);
        self.rooms.add_edge(room, door);
        self.rooms.add_edge(neighbor, door);
        self.rooms.remove_edge(room, neighbor);
    }

    fn finish(self) -> Dungeon {
        Dungeon {
            bounds: self.config.bounds(),
            arena: self.arena,
            rooms: self.rooms,
            doors: self.doors,
            removed_rooms: self.removed,
            seed: self.config.seed,
        }
    }
}
