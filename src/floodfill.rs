//! Connected-region discovery from a start cell.
//!
//! Neither fill keeps its own visited set. The predicate is the only thing that stops a cell
//! from being processed twice, so it must report every cell already handed to the
//! [FillResult] as blocked. Wrapping the predicate in [Visited](crate::flags::Visited) and
//! feeding discoveries through [Visited::recorder](crate::flags::Visited::recorder) does
//! exactly that. A predicate that never reports visited cells as blocked makes a fill run
//! forever.
use core::fmt;
use std::collections::VecDeque;
use std::str::FromStr;
use std::time::Instant;

use log::debug;

use crate::connectivity::Connectivity;
use crate::error::SearchError;
use crate::flags::{FillResult, Flags, Visited};
use crate::loc::{Locatable, Node};
use crate::normalize_name;

/// Flood fill algorithms offered by [FloodFiller].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FillAlgorithm {
    /// Cell-by-cell expansion through a FIFO, 4-neighbourhood.
    Queue4,
    /// Cell-by-cell expansion through a FIFO, 8-neighbourhood.
    Queue8,
    /// Horizontal scanline fill, 4-neighbourhood.
    Linear4,
    /// Horizontal scanline fill, 8-neighbourhood.
    Linear8,
}

impl FillAlgorithm {
    pub fn connectivity(self) -> Connectivity {
        match self {
            FillAlgorithm::Queue4 | FillAlgorithm::Linear4 => Connectivity::Four,
            FillAlgorithm::Queue8 | FillAlgorithm::Linear8 => Connectivity::Eight,
        }
    }

    pub fn is_scanline(self) -> bool {
        matches!(self, FillAlgorithm::Linear4 | FillAlgorithm::Linear8)
    }

    pub fn description(self) -> &'static str {
        match self {
            FillAlgorithm::Queue4 => "4-way queue",
            FillAlgorithm::Queue8 => "8-way queue",
            FillAlgorithm::Linear4 => "4-way linear",
            FillAlgorithm::Linear8 => "8-way linear",
        }
    }
}

impl fmt::Display for FillAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for FillAlgorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "queue4" | "4wayqueue" => Ok(FillAlgorithm::Queue4),
            "queue8" | "8wayqueue" => Ok(FillAlgorithm::Queue8),
            "linear4" | "4waylinear" => Ok(FillAlgorithm::Linear4),
            "linear8" | "8waylinear" => Ok(FillAlgorithm::Linear8),
            _ => Err(SearchError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// Flood fill against a caller-supplied collision predicate.
///
/// Calls are not serialized: fills sharing a predicate or sink across threads need those to
/// be thread-safe themselves.
#[derive(Clone, Debug)]
pub struct FloodFiller<F> {
    algorithm: FillAlgorithm,
    flags: Option<F>,
}

impl<F> FloodFiller<F> {
    /// A filler with no predicate bound yet; fills fail until [set_flags](Self::set_flags).
    pub fn new(algorithm: FillAlgorithm) -> FloodFiller<F> {
        FloodFiller {
            algorithm,
            flags: None,
        }
    }

    pub fn with_flags(algorithm: FillAlgorithm, flags: F) -> FloodFiller<F> {
        FloodFiller {
            algorithm,
            flags: Some(flags),
        }
    }

    pub fn set_flags(&mut self, flags: F) {
        self.flags = Some(flags);
    }

    pub fn flags(&self) -> Option<&F> {
        self.flags.as_ref()
    }

    pub fn algorithm(&self) -> FillAlgorithm {
        self.algorithm
    }
}

impl<F: Flags<Node>> FloodFiller<F> {
    /// Streams every open cell connected to `start` to `sink`. A blocked start reports nothing.
    pub fn fill<L, S>(&self, start: &L, sink: &mut S) -> Result<(), SearchError>
    where
        L: Locatable + ?Sized,
        S: FillResult + ?Sized,
    {
        let flags = self.flags.as_ref().ok_or(SearchError::MissingFlags)?;
        let start = Node::from_loc(start);
        let connectivity = self.algorithm.connectivity();
        let timer = Instant::now();
        let mut counted = Counted { sink, found: 0 };
        let seeds = if self.algorithm.is_scanline() {
            linear_fill(flags, start, connectivity, &mut counted)
        } else {
            queue_fill(flags, start, connectivity, &mut counted)
        };
        debug!(
            "{}: found {} cells from {} ({} seeds) in {:?}",
            self.algorithm,
            counted.found,
            start,
            seeds,
            timer.elapsed()
        );
        Ok(())
    }

    /// Gathers the region around `start` in discovery order. Unlike [fill](Self::fill) this
    /// wraps the predicate in a [Visited] of its own, so a stateless predicate is fine here.
    pub fn collect<L>(&self, start: &L) -> Result<Vec<Node>, SearchError>
    where
        L: Locatable + ?Sized,
    {
        let flags = self.flags.as_ref().ok_or(SearchError::MissingFlags)?;
        let visited = Visited::new(flags);
        let filler = FloodFiller::with_flags(self.algorithm, &visited);
        let mut found = Vec::new();
        let mut sink = |node: Node| found.push(node);
        filler.fill(start, &mut visited.recorder(&mut sink))?;
        Ok(found)
    }
}

struct Counted<'a, S: ?Sized> {
    sink: &'a mut S,
    found: usize,
}

impl<S: FillResult + ?Sized> FillResult for Counted<'_, S> {
    fn location_found(&mut self, loc: Node) {
        self.found += 1;
        self.sink.location_found(loc);
    }
}

/// Breadth-first expansion: report a cell, then queue each open neighbour. Returns the number of
/// entries taken from the queue.
pub fn queue_fill<F, S>(
    flags: &F,
    start: Node,
    connectivity: Connectivity,
    sink: &mut S,
) -> usize
where
    F: Flags<Node> + ?Sized,
    S: FillResult + ?Sized,
{
    let mut queue = VecDeque::new();
    let mut seeds = 0;
    queue.push_back(start);
    while let Some(curr) = queue.pop_front() {
        seeds += 1;
        if flags.blocked(&curr) {
            continue;
        }
        sink.location_found(curr);
        for neighbour in connectivity.neighbourhood(&curr) {
            if !flags.blocked(&neighbour) {
                queue.push_back(neighbour);
            }
        }
    }
    seeds
}

/// Tracks whether the open stretch of an adjacent row next to the current run already has a
/// seed in the work queue.
struct RunEdge {
    dy: i32,
    seeded: bool,
}

impl RunEdge {
    fn new(dy: i32) -> RunEdge {
        RunEdge { dy, seeded: false }
    }

    /// Looks at the cell above or below `cell`, a member of the run.
    fn scan<F>(&mut self, flags: &F, cell: Node, queue: &mut VecDeque<Node>)
    where
        F: Flags<Node> + ?Sized,
    {
        let adjacent = cell.offset(0, self.dy);
        if flags.blocked(&adjacent) {
            self.seeded = false;
        } else if !self.seeded {
            queue.push_back(adjacent);
            self.seeded = true;
        }
    }

    /// Looks diagonally past an end of the run; `beyond` is the blocked cell bounding it.
    fn scan_corner<F>(&mut self, flags: &F, beyond: Node, queue: &mut VecDeque<Node>)
    where
        F: Flags<Node> + ?Sized,
    {
        let corner = beyond.offset(0, self.dy);
        if !self.seeded && !flags.blocked(&corner) {
            queue.push_back(corner);
            self.seeded = true;
        }
    }
}

/// Scanline fill: for each seed, walk west to the start of its horizontal run, then report the
/// run eastwards while seeding the rows above and below once per open stretch. Returns the number
/// of seeds taken from the work queue, the start included.
pub fn linear_fill<F, S>(
    flags: &F,
    start: Node,
    connectivity: Connectivity,
    sink: &mut S,
) -> usize
where
    F: Flags<Node> + ?Sized,
    S: FillResult + ?Sized,
{
    let eight = connectivity.allows_diagonal();
    let mut queue = VecDeque::new();
    let mut seeds = 0;
    queue.push_back(start);
    while let Some(seed) = queue.pop_front() {
        seeds += 1;
        if flags.blocked(&seed) {
            continue;
        }
        let mut active = seed;
        while !flags.blocked(&active.offset(-1, 0)) {
            active = active.offset(-1, 0);
        }

        let mut north = RunEdge::new(-1);
        let mut south = RunEdge::new(1);
        if eight {
            let west = active.offset(-1, 0);
            north.scan_corner(flags, west, &mut queue);
            south.scan_corner(flags, west, &mut queue);
        }
        while !flags.blocked(&active) {
            sink.location_found(active);
            north.scan(flags, active, &mut queue);
            south.scan(flags, active, &mut queue);
            active = active.offset(1, 0);
        }
        if eight {
            north.scan_corner(flags, active, &mut queue);
            south.scan_corner(flags, active, &mut queue);
        }
    }
    seeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::from_fn;
    use fxhash::FxHashSet;

    const ALGORITHMS: [FillAlgorithm; 4] = [
        FillAlgorithm::Queue4,
        FillAlgorithm::Queue8,
        FillAlgorithm::Linear4,
        FillAlgorithm::Linear8,
    ];

    /// Open cells of an ascii map, `.` is open, anything else is blocked.
    fn open_cells(rows: &[&str]) -> FxHashSet<Node> {
        let mut open = FxHashSet::default();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '.' {
                    open.insert(Node::new(x as i32, y as i32));
                }
            }
        }
        open
    }

    /// Fills with a fresh visited-tracking predicate and returns the cells in report order.
    fn run(algorithm: FillAlgorithm, rows: &[&str], start: Node) -> Vec<Node> {
        let open = open_cells(rows);
        let visited = Visited::new(from_fn(move |n: &Node| !open.contains(n)));
        let filler = FloodFiller::with_flags(algorithm, &visited);
        let mut found = Vec::new();
        let mut sink = |n: Node| found.push(n);
        filler.fill(&start, &mut visited.recorder(&mut sink)).unwrap();
        found
    }

    fn as_set(found: &[Node]) -> FxHashSet<Node> {
        found.iter().copied().collect()
    }

    #[test]
    fn blocker_splits_row() {
        for algorithm in ALGORITHMS {
            let found = run(algorithm, &["..#.."], Node::new(0, 0));
            assert_eq!(as_set(&found), as_set(&[Node::new(0, 0), Node::new(1, 0)]));
        }
    }

    #[test]
    fn blocked_start_reports_nothing() {
        for algorithm in ALGORITHMS {
            assert!(run(algorithm, &["#.."], Node::new(0, 0)).is_empty());
            assert!(run(algorithm, &["..."], Node::new(7, 7)).is_empty());
        }
    }

    #[test]
    fn diagonal_gap() {
        let rows = [".#", "#."];
        for algorithm in ALGORITHMS {
            let found = run(algorithm, &rows, Node::new(0, 0));
            let expected = match algorithm.connectivity() {
                Connectivity::Four => vec![Node::new(0, 0)],
                Connectivity::Eight => vec![Node::new(0, 0), Node::new(1, 1)],
            };
            assert_eq!(as_set(&found), as_set(&expected));
        }
    }

    #[test]
    fn every_cell_reported_once() {
        let rows = [
            "..#......",
            ".##.####.",
            "....#..#.",
            "###.#.##.",
            "....#....",
            ".#.###.#.",
        ];
        let open = open_cells(&rows);
        for algorithm in ALGORITHMS {
            let found = run(algorithm, &rows, Node::new(0, 0));
            assert_eq!(found.len(), as_set(&found).len(), "{algorithm} duplicated cells");
            assert!(found.iter().all(|n| open.contains(n)));
        }
        for (queue, linear) in [
            (FillAlgorithm::Queue4, FillAlgorithm::Linear4),
            (FillAlgorithm::Queue8, FillAlgorithm::Linear8),
        ] {
            assert_eq!(
                as_set(&run(queue, &rows, Node::new(0, 0))),
                as_set(&run(linear, &rows, Node::new(0, 0)))
            );
        }
    }

    /// The scanline fill reports the seed's whole run, west end first, before anything else.
    #[test]
    fn scanline_starts_with_seed_run() {
        let found = run(FillAlgorithm::Linear4, &["...", "...", "..."], Node::new(1, 1));
        assert_eq!(&found[..3], &[Node::new(0, 1), Node::new(1, 1), Node::new(2, 1)]);
        assert_eq!(found.len(), 9);
    }

    /// Two open stretches above one run get one seed each.
    #[test]
    fn scanline_seeds_each_stretch() {
        let rows = [".#.", "..."];
        let found = run(FillAlgorithm::Linear4, &rows, Node::new(0, 1));
        assert_eq!(as_set(&found), open_cells(&rows));
    }

    /// Runs the scanline fill directly and returns (cells reported, seeds taken).
    fn scanline_seeds(connectivity: Connectivity, rows: &[&str], start: Node) -> (usize, usize) {
        let open = open_cells(rows);
        let visited = Visited::new(from_fn(move |n: &Node| !open.contains(n)));
        let mut found = 0;
        let mut sink = |_: Node| found += 1;
        let seeds = linear_fill(&visited, start, connectivity, &mut visited.recorder(&mut sink));
        (found, seeds)
    }

    #[test]
    fn one_seed_per_adjacent_stretch() {
        // The start plus one seed for each of the two cells above the bottom run
        assert_eq!(scanline_seeds(Connectivity::Four, &[".#.", "..."], Node::new(0, 1)), (5, 3));
        // A fully open row above is seeded once, not once per cell
        assert_eq!(scanline_seeds(Connectivity::Four, &["...", "..."], Node::new(0, 1)), (6, 2));
        assert_eq!(
            scanline_seeds(Connectivity::Four, &["....", "....", "...."], Node::new(0, 1)),
            (12, 3)
        );
        // The diagonal corner seed covers the open row above, the cell straight above is skipped
        assert_eq!(scanline_seeds(Connectivity::Eight, &["...", "#.#"], Node::new(1, 1)), (4, 2));
    }

    #[test]
    fn queue_fill_is_breadth_first() {
        let found = run(FillAlgorithm::Queue4, &["....."], Node::new(2, 0));
        assert_eq!(found[0], Node::new(2, 0));
        assert_eq!(
            as_set(&found[1..3]),
            as_set(&[Node::new(1, 0), Node::new(3, 0)])
        );
    }

    #[test]
    fn missing_flags_fail_fast() {
        let filler: FloodFiller<Visited<crate::flags::FromFn<fn(&Node) -> bool>>> =
            FloodFiller::new(FillAlgorithm::Linear8);
        assert_eq!(
            filler.collect(&Node::new(0, 0)),
            Err(SearchError::MissingFlags)
        );
    }

    #[test]
    fn collect_with_stateless_predicate() {
        let rows = ["...", ".#.", "..#", "#.."];
        let open = open_cells(&rows);
        let region = open.clone();
        let flags = from_fn(move |n: &Node| !open.contains(n));
        for algorithm in ALGORITHMS {
            let filler = FloodFiller::with_flags(algorithm, &flags);
            let found = filler.collect(&Node::new(0, 0)).unwrap();
            assert_eq!(found.len(), region.len());
            assert_eq!(as_set(&found), region);
        }
    }

    #[test]
    fn algorithm_names() {
        for algorithm in ALGORITHMS {
            assert_eq!(algorithm.to_string().parse(), Ok(algorithm));
        }
        assert_eq!("LINEAR_8".parse(), Ok(FillAlgorithm::Linear8));
        assert!("spiral".parse::<FillAlgorithm>().is_err());
    }
}
