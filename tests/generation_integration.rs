//! Integration tests for the dungeon generation pipeline: structural
//! invariants of the generated graphs and determinism across seeds.

use delve::{
    generate_dungeon, DelveError, Dungeon, GenerationConfig, Rect, RemovalPolicy, RoomId,
    TraversalOrder,
};
use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};

/// Flood fill over the room graph (rooms and doors alike) from the first
/// live room; returns the number of reached nodes.
fn reachable_nodes(dungeon: &Dungeon) -> usize {
    let Some(&first) = dungeon.rooms.nodes().first() else {
        return 0;
    };
    let mut seen: HashSet<RoomId> = HashSet::new();
    let mut queue = VecDeque::from([first]);
    seen.insert(first);
    while let Some(node) = queue.pop_front() {
        for &neighbor in dungeon.rooms.neighbors(node) {
            if seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    seen.len()
}

fn room_rects(dungeon: &Dungeon) -> Vec<Rect> {
    dungeon
        .room_ids()
        .iter()
        .map(|&id| dungeon.rect_of(id))
        .collect()
}

#[test]
fn test_example_scenario_seed_42() {
    // 100x100 dungeon, 20x20 minimum rooms, wall buffer 1, door size 4.
    let config = GenerationConfig::for_testing(42);
    let dungeon = generate_dungeon(&config).unwrap();

    let rooms = dungeon.room_ids();
    assert!(rooms.len() >= 4, "only {} rooms", rooms.len());

    for &id in &rooms {
        let area = dungeon.rect_of(id);
        // Settled rooms can no longer be split along either axis.
        assert!(area.width <= 2 * config.room_min_width + 1);
        assert!(area.height <= 2 * config.room_min_height + 1);
        assert!(area.width > 0 && area.height > 0);
        // The whole region was one connected rectangle before splitting, so
        // no room can end up isolated.
        assert!(
            !dungeon.rooms.neighbors(id).is_empty(),
            "room {:?} is isolated",
            id
        );
    }
}

#[test]
fn test_all_rects_stay_inside_bounds() {
    let config = GenerationConfig::for_testing(7);
    let dungeon = generate_dungeon(&config).unwrap();

    for &id in dungeon.rooms.nodes() {
        let area = dungeon.rect_of(id);
        assert!(area.x_min() >= 0 && area.y_min() >= 0);
        assert!(area.x_max() <= dungeon.bounds.x_max());
        assert!(area.y_max() <= dungeon.bounds.y_max());
    }
}

#[test]
fn test_connectivity_survives_room_removal() {
    for policy in [
        RemovalPolicy::Smallest,
        RemovalPolicy::Biggest,
        RemovalPolicy::Random,
    ] {
        let mut config = GenerationConfig::for_testing(11);
        config.removal_percentage = 30.0;
        config.removal_policy = policy;
        config.remove_cycles = false;

        let dungeon = generate_dungeon(&config).unwrap();
        assert_eq!(
            reachable_nodes(&dungeon),
            dungeon.rooms.node_count(),
            "{:?} removal split the dungeon",
            policy
        );
    }
}

#[test]
fn test_cycle_removal_keeps_tree_shape_through_door_placement() {
    for order in [TraversalOrder::DepthFirst, TraversalOrder::BreadthFirst] {
        let mut config = GenerationConfig::for_testing(42);
        config.traversal_order = order;

        let dungeon = generate_dungeon(&config).unwrap();

        // Splitting a tree edge in two by a door node keeps the graph a
        // tree: edges == nodes - 1 and everything reachable from the root.
        let nodes = dungeon.rooms.node_count();
        assert_eq!(dungeon.rooms.edge_count(), nodes - 1, "{:?}", order);
        assert_eq!(reachable_nodes(&dungeon), nodes, "{:?}", order);
    }
}

#[test]
fn test_every_connection_is_door_mediated() {
    let config = GenerationConfig::for_testing(99);
    let dungeon = generate_dungeon(&config).unwrap();

    assert!(!dungeon.door_ids().is_empty());
    for room in dungeon.room_ids() {
        for &neighbor in dungeon.rooms.neighbors(room) {
            assert!(
                dungeon.arena.get(neighbor).is_door,
                "direct room-room edge {:?} - {:?}",
                room,
                neighbor
            );
        }
    }
}

#[test]
fn test_doors_link_exactly_two_live_rooms() {
    let config = GenerationConfig::for_testing(5);
    let dungeon = generate_dungeon(&config).unwrap();

    let live: HashSet<RoomId> = dungeon.room_ids().into_iter().collect();
    for door in dungeon.door_ids() {
        let linked = dungeon.doors.neighbors(door);
        assert_eq!(linked.len(), 2);
        for room in linked {
            assert!(live.contains(room), "door {:?} links a dead room", door);
        }
    }
}

#[test]
fn test_removed_rooms_are_recorded_and_gone() {
    let mut config = GenerationConfig::for_testing(13);
    config.removal_percentage = 25.0;
    let dungeon = generate_dungeon(&config).unwrap();

    for &removed in &dungeon.removed_rooms {
        assert!(!dungeon.rooms.contains(removed));
        let area = dungeon.rect_of(removed);
        assert!(area.width > 0 && area.height > 0);
    }
}

#[test]
fn test_keeping_cycles_can_retain_extra_edges() {
    let mut config = GenerationConfig::for_testing(42);
    config.remove_cycles = false;
    config.remove_rooms = false;
    let cyclic = generate_dungeon(&config).unwrap();

    config.remove_cycles = true;
    let tree = generate_dungeon(&config).unwrap();

    assert!(cyclic.rooms.edge_count() >= tree.rooms.edge_count());
}

#[test]
fn test_invalid_configs_are_rejected_up_front() {
    let mut config = GenerationConfig::for_testing(1);
    config.room_min_height = config.dungeon_height;
    assert!(matches!(
        generate_dungeon(&config),
        Err(DelveError::InvalidConfig(_))
    ));

    let mut config = GenerationConfig::for_testing(1);
    config.door_size = 0;
    assert!(generate_dungeon(&config).is_err());

    let mut config = GenerationConfig::for_testing(1);
    config.removal_percentage = -1.0;
    assert!(generate_dungeon(&config).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_generation_is_deterministic(seed in 0u64..10_000) {
        let config = GenerationConfig::for_testing(seed);
        let a = generate_dungeon(&config).unwrap();
        let b = generate_dungeon(&config).unwrap();

        prop_assert_eq!(room_rects(&a), room_rects(&b));

        let doors_a: Vec<Rect> = a.door_ids().iter().map(|&id| a.rect_of(id)).collect();
        let doors_b: Vec<Rect> = b.door_ids().iter().map(|&id| b.rect_of(id)).collect();
        prop_assert_eq!(doors_a, doors_b);
    }

    #[test]
    fn prop_generated_dungeons_are_connected(seed in 0u64..10_000) {
        let config = GenerationConfig::for_testing(seed);
        let dungeon = generate_dungeon(&config).unwrap();
        prop_assert_eq!(reachable_nodes(&dungeon), dungeon.rooms.node_count());
    }
}
