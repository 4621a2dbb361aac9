//! Integration tests for pathfinding over rasterized dungeons, including the
//! full generate -> rasterize -> navigate flow.

use delve::{
    generate_dungeon, GenerationConfig, GridCell, NavGraph, PathAlgorithm, Rect, Tile, TileMap,
};

fn path_cost(path: &[GridCell]) -> f64 {
    path.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}

#[test]
fn test_generated_dungeon_is_navigable() {
    let config = GenerationConfig::for_testing(42);
    let dungeon = generate_dungeon(&config).unwrap();
    let map = dungeon.tile_map();
    let nav = NavGraph::build(&map);

    let rooms = dungeon.room_ids();
    let from = dungeon.rect_of(rooms[0]).center().center();
    let to = dungeon.rect_of(rooms[rooms.len() - 1]).center().center();

    for algorithm in PathAlgorithm::ALL {
        let path = nav.find_path(from, to, algorithm);
        assert!(!path.is_empty(), "{:?} found no route", algorithm);

        // Every step is between adjacent cells and stays on the floor.
        for pair in path.windows(2) {
            assert!((pair[0].x - pair[1].x).abs() <= 1);
            assert!((pair[0].y - pair[1].y).abs() <= 1);
        }
        for cell in &path {
            assert!(!map.is_wall(cell.x, cell.y));
        }
    }
}

#[test]
fn test_dijkstra_and_astar_agree_on_cost() {
    let config = GenerationConfig::for_testing(7);
    let dungeon = generate_dungeon(&config).unwrap();
    let nav = NavGraph::build(&dungeon.tile_map());

    let rooms = dungeon.room_ids();
    let from = dungeon.rect_of(rooms[0]).center().center();
    let to = dungeon.rect_of(rooms[rooms.len() - 1]).center().center();

    let dijkstra = nav.find_path(from, to, PathAlgorithm::Dijkstra);
    let astar = nav.find_path(from, to, PathAlgorithm::AStar);

    assert!(!dijkstra.is_empty());
    assert!(!astar.is_empty());
    // Both are optimal under the same edge weights; the routes may differ
    // but the cost cannot.
    assert!((path_cost(&dijkstra) - path_cost(&astar)).abs() < 1e-6);
}

#[test]
fn test_algorithms_agree_on_corridor_length() {
    // A one-cell-wide corridor leaves a single route.
    let mut map = TileMap::new(10, 3);
    map.fill(Rect::new(0, 0, 10, 1), Tile::Wall);
    map.fill(Rect::new(0, 2, 10, 1), Tile::Wall);
    let nav = NavGraph::build(&map);

    let from = GridCell::new(0, 1).center();
    let to = GridCell::new(9, 1).center();

    for algorithm in PathAlgorithm::ALL {
        let path = nav.find_path(from, to, algorithm);
        assert_eq!(path.len(), 10, "{:?}", algorithm);
    }
}

#[test]
fn test_disconnected_regions_yield_empty_paths() {
    let mut map = TileMap::new(9, 5);
    map.fill(Rect::new(4, 0, 1, 5), Tile::Wall);
    let nav = NavGraph::build(&map);

    let from = GridCell::new(1, 2).center();
    let to = GridCell::new(7, 2).center();

    for algorithm in PathAlgorithm::ALL {
        assert!(
            nav.find_path(from, to, algorithm).is_empty(),
            "{:?} crossed a solid wall",
            algorithm
        );
    }
}

#[test]
fn test_paths_route_around_walls() {
    // An L-shaped wall forces a detour; BFS hop count must exceed the
    // straight-line hop count.
    let mut map = TileMap::new(7, 7);
    map.fill(Rect::new(3, 0, 1, 6), Tile::Wall);
    let nav = NavGraph::build(&map);

    let from = GridCell::new(1, 1).center();
    let to = GridCell::new(5, 1).center();

    let path = nav.find_path(from, to, PathAlgorithm::Bfs);
    assert!(!path.is_empty());
    assert!(path.len() > 5);
    assert!(path.iter().any(|cell| cell.y == 6), "path never detoured");
}

#[test]
fn test_corner_cutting_never_happens_on_generated_maps() {
    let config = GenerationConfig::for_testing(123);
    let dungeon = generate_dungeon(&config).unwrap();
    let map = dungeon.tile_map();
    let nav = NavGraph::build(&map);

    let rooms = dungeon.room_ids();
    let from = dungeon.rect_of(rooms[0]).center().center();
    let to = dungeon.rect_of(rooms[rooms.len() - 1]).center().center();

    let path = nav.find_path(from, to, PathAlgorithm::AStar);
    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        if dx != 0 && dy != 0 {
            // Diagonal step: both orthogonal corner cells must be open.
            assert!(!map.is_wall(a.x + dx, a.y));
            assert!(!map.is_wall(a.x, a.y + dy));
        }
    }
}
