use core::fmt;

use itertools::Itertools;
use smallvec::SmallVec;

use crate::loc::{is_diagonal, Locatable, Node};
use crate::N_SMALLVEC_SIZE;

/// Cost of a horizontal or vertical step.
pub const STRAIGHT: f64 = 1.0;
/// Cost of a diagonal step.
pub const DIAGONAL: f64 = std::f64::consts::SQRT_2;

/// N, E, S, W with north at `y - 1`.
const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
/// The cardinals followed by NE, SE, SW, NW.
const MOORE: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Which cells count as adjacent during a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Connectivity {
    /// Von Neumann neighbourhood.
    Four,
    /// Moore neighbourhood.
    Eight,
}

impl Connectivity {
    pub fn allows_diagonal(self) -> bool {
        self == Connectivity::Eight
    }

    /// Cardinal neighbours first, then (for [Connectivity::Eight]) the diagonals.
    pub fn neighbourhood(self, node: &Node) -> SmallVec<[Node; N_SMALLVEC_SIZE]> {
        let offsets: &[(i32, i32)] = match self {
            Connectivity::Four => &CARDINALS,
            Connectivity::Eight => &MOORE,
        };
        offsets
            .iter()
            .map(|&(dx, dy)| node.offset(dx, dy))
            .collect()
    }

    /// Whether `b` is one step away from `a`.
    pub fn adjacent(self, a: &Node, b: &Node) -> bool {
        let (dx, dy) = deltas(a, b);
        match self {
            Connectivity::Four => dx + dy == 1,
            Connectivity::Eight => dx.max(dy) == 1,
        }
    }

    /// The admissible heuristic matching this connectivity's move costs.
    pub fn heuristic<A, B>(self, from: &A, to: &B) -> f64
    where
        A: Locatable + ?Sized,
        B: Locatable + ?Sized,
    {
        match self {
            Connectivity::Four => manhattan(from, to),
            Connectivity::Eight => diagonal(from, to),
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Connectivity::Four => write!(f, "4-way"),
            Connectivity::Eight => write!(f, "8-way"),
        }
    }
}

/// [STRAIGHT] for a step along an axis, [DIAGONAL] otherwise.
pub fn move_cost<A, B>(a: &A, b: &B) -> f64
where
    A: Locatable + ?Sized,
    B: Locatable + ?Sized,
{
    if is_diagonal(a, b) {
        DIAGONAL
    } else {
        STRAIGHT
    }
}

/// Total move cost of walking the path step by step.
pub fn path_cost(path: &[Node]) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| move_cost(a, b))
        .sum()
}

/// Absolute per-axis distance, widened so any two `i32` locations fit.
fn deltas<A, B>(a: &A, b: &B) -> (i64, i64)
where
    A: Locatable + ?Sized,
    B: Locatable + ?Sized,
{
    (
        (i64::from(a.x()) - i64::from(b.x())).abs(),
        (i64::from(a.y()) - i64::from(b.y())).abs(),
    )
}

/// Manhattan distance between two locations.
pub fn manhattan<A, B>(start: &A, dest: &B) -> f64
where
    A: Locatable + ?Sized,
    B: Locatable + ?Sized,
{
    let (dx, dy) = deltas(start, dest);
    (dx + dy) as f64
}

/// Octile distance: as many diagonal steps as possible, then straight.
pub fn diagonal<A, B>(start: &A, dest: &B) -> f64
where
    A: Locatable + ?Sized,
    B: Locatable + ?Sized,
{
    let (dx, dy) = deltas(start, dest);
    let diag = dx.min(dy);
    diag as f64 * DIAGONAL + (dx + dy - 2 * diag) as f64
}

/// Straight-line distance between two locations.
pub fn euclidean<A, B>(start: &A, dest: &B) -> f64
where
    A: Locatable + ?Sized,
    B: Locatable + ?Sized,
{
    let (dx, dy) = deltas(start, dest);
    (dx as f64).hypot(dy as f64)
}
