//! # grid_search
//!
//! Grid-based spatial search over a caller-supplied notion of "blocked". Implements
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) with 4- or 8-way movement
//! (orthogonal steps cost 1, diagonal steps cost √2) and two
//! [flood fills](https://en.wikipedia.org/wiki/Flood_fill): a queue-based expansion and a
//! horizontal scanline fill.
//!
//! Searches never look at a map directly. They ask a [Flags] predicate whether a location is
//! blocked, so the same code runs over tile maps, bitmaps or procedurally blocked space. A
//! ready-made bounded predicate is provided by [PathingGrid].
//!
//! ```
//! use grid_search::{from_fn, Candidate, Node, PathAlgorithm, Pathfinder};
//!
//! let in_bounds = |n: &Node| n.x >= 0 && n.y >= 0 && n.x < 5 && n.y < 5;
//! let pathfinder = Pathfinder::with_flags(
//!     PathAlgorithm::Astar4,
//!     from_fn(move |c: &Candidate| !in_bounds(&c.node)),
//! );
//! let path = pathfinder
//!     .find_path(&Node::new(0, 0), &Node::new(4, 4))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(path.len(), 9);
//! assert_eq!(path.cost(), 8.0);
//! ```
pub mod astar;
pub mod connectivity;
pub mod error;
pub mod flags;
pub mod floodfill;
pub mod loc;
pub mod pathfinder;
pub mod pathing_grid;

pub use connectivity::{path_cost, Connectivity, DIAGONAL, STRAIGHT};
pub use error::SearchError;
pub use flags::{from_fn, FillResult, Flags, Visited};
pub use floodfill::{FillAlgorithm, FloodFiller};
pub use loc::{Locatable, Locatable3D, Node, Node3D, PLocatable, PLocatable3D};
pub use pathfinder::{Candidate, Path, PathAlgorithm, PathStep, Pathfinder};
pub use pathing_grid::PathingGrid;

const N_SMALLVEC_SIZE: usize = 8;

/// Lowercases an algorithm name and strips separators so "8-way AStar" and "ASTAR_8" can be
/// matched against a fixed list.
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
