//! # Delve CLI
//!
//! Generates a dungeon, prints its statistics, and optionally renders the
//! tile map or demonstrates pathfinding across it.

use clap::Parser;
use delve::{
    generate_dungeon, DelveError, DelveResult, GenerationConfig, NavGraph, PathAlgorithm,
    RemovalPolicy, TraversalOrder,
};
use log::info;
use std::path::PathBuf;

/// Command line arguments for the delve dungeon generator.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Procedural dungeon generation and grid pathfinding")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Load the generation configuration from a JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dungeon width in cells
    #[arg(long)]
    width: Option<i32>,

    /// Dungeon height in cells
    #[arg(long)]
    height: Option<i32>,

    /// Minimum room width in cells
    #[arg(long)]
    room_min_width: Option<i32>,

    /// Minimum room height in cells
    #[arg(long)]
    room_min_height: Option<i32>,

    /// Overlap reserved between sibling rooms, in cells
    #[arg(long)]
    wall_buffer: Option<i32>,

    /// Door opening length in cells
    #[arg(long)]
    door_size: Option<i32>,

    /// Skip the room-removal phase
    #[arg(long)]
    keep_all_rooms: bool,

    /// Target percentage of rooms to remove (0 to 100)
    #[arg(long)]
    removal_percentage: Option<f64>,

    /// Room-removal policy: smallest, biggest, or random
    #[arg(long)]
    removal_policy: Option<String>,

    /// Keep cycling paths instead of collapsing to a spanning tree
    #[arg(long)]
    keep_cycles: bool,

    /// Spanning-tree traversal order: dfs or bfs
    #[arg(long)]
    traversal: Option<String>,

    /// Allow doors to widen to the full shared wall span
    #[arg(long)]
    wide_doors: bool,

    /// Print the rasterized tile map (y axis up)
    #[arg(long)]
    print_map: bool,

    /// Run a pathfinding demo between the first and last rooms:
    /// bfs, dijkstra, or astar
    #[arg(long)]
    path_demo: Option<String>,
}

fn main() -> DelveResult<()> {
    env_logger::init();

    let args = Args::parse();
    let config = build_config(&args)?;

    info!("delve v{} generating with seed {}", delve::VERSION, config.seed);

    let dungeon = generate_dungeon(&config)?;
    let rooms = dungeon.room_ids();
    let doors = dungeon.door_ids();

    println!(
        "generated {} rooms, {} doors ({} rooms removed) in a {}x{} dungeon, seed {}",
        rooms.len(),
        doors.len(),
        dungeon.removed_rooms.len(),
        dungeon.bounds.width,
        dungeon.bounds.height,
        dungeon.seed
    );

    if args.print_map || args.path_demo.is_some() {
        let map = dungeon.tile_map();

        if args.print_map {
            print!("{}", map.render(true));
        }

        if let Some(name) = &args.path_demo {
            let algorithm = parse_algorithm(name)?;
            let nav = NavGraph::build(&map);

            let from = dungeon.rect_of(rooms[0]).center().center();
            let to = dungeon.rect_of(rooms[rooms.len() - 1]).center().center();
            let path = nav.find_path(from, to, algorithm);

            if path.is_empty() {
                println!("no path between the first and last rooms");
            } else {
                let cost: f64 = path
                    .windows(2)
                    .map(|pair| pair[0].distance(pair[1]))
                    .sum();
                println!(
                    "{:?} path: {} cells, cost {:.2}",
                    algorithm,
                    path.len(),
                    cost
                );
            }
        }
    }

    Ok(())
}

/// Builds the generation configuration from a JSON file and/or flag
/// overrides. Flags win over the file; the file wins over defaults.
fn build_config(args: &Args) -> DelveResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text)?
        }
        None => GenerationConfig::new(args.seed.unwrap_or(12345)),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.dungeon_width = width;
    }
    if let Some(height) = args.height {
        config.dungeon_height = height;
    }
    if let Some(w) = args.room_min_width {
        config.room_min_width = w;
    }
    if let Some(h) = args.room_min_height {
        config.room_min_height = h;
    }
    if let Some(buffer) = args.wall_buffer {
        config.wall_buffer = buffer;
    }
    if let Some(size) = args.door_size {
        config.door_size = size;
    }
    if args.keep_all_rooms {
        config.remove_rooms = false;
    }
    if let Some(percentage) = args.removal_percentage {
        config.removal_percentage = percentage;
    }
    if let Some(policy) = &args.removal_policy {
        config.removal_policy = match policy.to_lowercase().as_str() {
            "smallest" => RemovalPolicy::Smallest,
            "biggest" => RemovalPolicy::Biggest,
            "random" => RemovalPolicy::Random,
            other => {
                return Err(DelveError::InvalidConfig(format!(
                    "unknown removal policy '{}'",
                    other
                )))
            }
        };
    }
    if args.keep_cycles {
        config.remove_cycles = false;
    }
    if let Some(order) = &args.traversal {
        config.traversal_order = match order.to_lowercase().as_str() {
            "dfs" | "depthfirst" => TraversalOrder::DepthFirst,
            "bfs" | "breadthfirst" => TraversalOrder::BreadthFirst,
            other => {
                return Err(DelveError::InvalidConfig(format!(
                    "unknown traversal order '{}'",
                    other
                )))
            }
        };
    }
    if args.wide_doors {
        config.wide_doors = true;
    }

    Ok(config)
}

fn parse_algorithm(name: &str) -> DelveResult<PathAlgorithm> {
    match name.to_lowercase().as_str() {
        "bfs" => Ok(PathAlgorithm::Bfs),
        "dijkstra" => Ok(PathAlgorithm::Dijkstra),
        "astar" | "a*" => Ok(PathAlgorithm::AStar),
        other => Err(DelveError::InvalidConfig(format!(
            "unknown pathfinding algorithm '{}'",
            other
        ))),
    }
}
