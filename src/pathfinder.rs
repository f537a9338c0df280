use core::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use log::{debug, trace};
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::astar::SearchContext;
use crate::connectivity::{move_cost, Connectivity, DIAGONAL, STRAIGHT};
use crate::error::SearchError;
use crate::flags::Flags;
use crate::loc::{is_diagonal, Locatable, Node, PLocatable};
use crate::{normalize_name, N_SMALLVEC_SIZE};

/// Totally ordered move cost used inside the open set.
pub type Cost = OrderedFloat<f64>;
pub type DefaultSearchContext = SearchContext<Node, Cost>;

/// A move under consideration: the predicate sees both the cell being entered and the cell it
/// is entered from, so it can reject moves by direction (e.g. cutting corners).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub node: Node,
    pub parent: Node,
}

impl Candidate {
    pub fn new(node: Node, parent: Node) -> Candidate {
        Candidate { node, parent }
    }

    pub fn is_diagonal(&self) -> bool {
        is_diagonal(&self.node, &self.parent)
    }
}

impl Locatable for Candidate {
    fn x(&self) -> i32 {
        self.node.x
    }
    fn y(&self) -> i32 {
        self.node.y
    }
}

impl PLocatable for Candidate {
    fn parent(&self) -> Option<Node> {
        Some(self.parent)
    }
}

/// A path from a start to a destination, both inclusive, with its total move cost.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    nodes: Vec<Node>,
    cost: f64,
}

impl Path {
    pub fn new(nodes: Vec<Node>, cost: f64) -> Path {
        Path { nodes, cost }
    }
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    /// Sum of [STRAIGHT] and [DIAGONAL] step costs.
    pub fn cost(&self) -> f64 {
        self.cost
    }
    pub fn start(&self) -> Option<Node> {
        self.nodes.first().copied()
    }
    pub fn destination(&self) -> Option<Node> {
        self.nodes.last().copied()
    }
    /// The path as a chain of [PLocatable]s, each pointing back at the previous step.
    pub fn steps(&self) -> impl Iterator<Item = PathStep<'_>> {
        (0..self.nodes.len()).map(move |index| PathStep {
            path: &self.nodes,
            index,
        })
    }
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

impl IntoIterator for Path {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// One element of a [Path], see [Path::steps].
#[derive(Clone, Copy, Debug)]
pub struct PathStep<'a> {
    path: &'a [Node],
    index: usize,
}

impl PathStep<'_> {
    pub fn node(&self) -> Node {
        self.path[self.index]
    }
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Locatable for PathStep<'_> {
    fn x(&self) -> i32 {
        self.node().x
    }
    fn y(&self) -> i32 {
        self.node().y
    }
}

impl PLocatable for PathStep<'_> {
    fn parent(&self) -> Option<Node> {
        self.index.checked_sub(1).map(|i| self.path[i])
    }
}

/// Pathfinding algorithms offered by [Pathfinder].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathAlgorithm {
    /// A* over the 4-neighbourhood with the Manhattan heuristic.
    Astar4,
    /// A* over the 8-neighbourhood with the octile heuristic.
    Astar8,
}

impl PathAlgorithm {
    pub fn connectivity(self) -> Connectivity {
        match self {
            PathAlgorithm::Astar4 => Connectivity::Four,
            PathAlgorithm::Astar8 => Connectivity::Eight,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PathAlgorithm::Astar4 => "4-way AStar",
            PathAlgorithm::Astar8 => "8-way AStar",
        }
    }
}

impl fmt::Display for PathAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for PathAlgorithm {
    type Err = SearchError;

    /// Accepts the description ("4-way AStar") or the short name ("astar4", "ASTAR_8").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "astar4" | "4wayastar" => Ok(PathAlgorithm::Astar4),
            "astar8" | "8wayastar" => Ok(PathAlgorithm::Astar8),
            _ => Err(SearchError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// Raster pathfinding against a caller-supplied collision predicate.
///
/// Concurrent calls on one instance are serialized: each search holds the instance's search
/// context for its whole duration.
pub struct Pathfinder<F> {
    algorithm: PathAlgorithm,
    flags: Option<F>,
    /// Scales the heuristic. Values above 1.0 give weighted A*, which usually expands fewer
    /// nodes but no longer guarantees a shortest path.
    pub heuristic_factor: f64,
    context: Mutex<DefaultSearchContext>,
}

impl<F> Pathfinder<F> {
    /// A pathfinder with no predicate bound yet; searches fail until [set_flags](Self::set_flags).
    pub fn new(algorithm: PathAlgorithm) -> Pathfinder<F> {
        Pathfinder {
            algorithm,
            flags: None,
            heuristic_factor: 1.0,
            context: Mutex::new(SearchContext::new()),
        }
    }

    pub fn with_flags(algorithm: PathAlgorithm, flags: F) -> Pathfinder<F> {
        let mut pathfinder = Pathfinder::new(algorithm);
        pathfinder.set_flags(flags);
        pathfinder
    }

    pub fn set_flags(&mut self, flags: F) {
        self.flags = Some(flags);
    }

    pub fn flags(&self) -> Option<&F> {
        self.flags.as_ref()
    }

    pub fn algorithm(&self) -> PathAlgorithm {
        self.algorithm
    }
}

impl<F: Flags<Candidate>> Pathfinder<F> {
    /// Finds a least-cost path from `start` to `destination`.
    ///
    /// Only cells entered during the search are checked against the predicate; `start` is
    /// assumed open and `start == destination` yields the single-node path with cost 0.
    /// Returns `Ok(None)` if the destination cannot be reached.
    pub fn find_path<S, D>(&self, start: &S, destination: &D) -> Result<Option<Path>, SearchError>
    where
        S: Locatable + ?Sized,
        D: Locatable + ?Sized,
    {
        let goal = Node::from_loc(destination);
        let connectivity = self.algorithm.connectivity();
        self.search(
            Node::from_loc(start),
            |node| connectivity.heuristic(node, &goal),
            |node| *node == goal,
        )
        .map(|found| found.map(|(_, path)| path))
    }

    /// Like [find_path](Self::find_path), but settles for any cell adjacent to `goal`. Useful
    /// when the goal itself is blocked.
    pub fn find_path_approximate<S, D>(
        &self,
        start: &S,
        goal: &D,
    ) -> Result<Option<Path>, SearchError>
    where
        S: Locatable + ?Sized,
        D: Locatable + ?Sized,
    {
        let goal = Node::from_loc(goal);
        let connectivity = self.algorithm.connectivity();
        // Any neighbour of the goal is at most one step closer than the goal itself
        let last_step = if connectivity.allows_diagonal() {
            DIAGONAL
        } else {
            STRAIGHT
        };
        self.search(
            Node::from_loc(start),
            |node| (connectivity.heuristic(node, &goal) - last_step).max(0.0),
            |node| *node == goal || connectivity.adjacent(node, &goal),
        )
        .map(|found| found.map(|(_, path)| path))
    }

    /// Finds a least-cost path to whichever goal is cheapest to reach, returning that goal too.
    pub fn find_path_multiple_goals<S>(
        &self,
        start: &S,
        goals: &[Node],
    ) -> Result<Option<(Node, Path)>, SearchError>
    where
        S: Locatable + ?Sized,
    {
        if self.flags.is_none() {
            return Err(SearchError::MissingFlags);
        }
        if goals.is_empty() {
            return Ok(None);
        }
        let connectivity = self.algorithm.connectivity();
        self.search(
            Node::from_loc(start),
            |node| {
                goals
                    .iter()
                    .map(|goal| connectivity.heuristic(node, goal))
                    .fold(f64::INFINITY, f64::min)
            },
            |node| goals.contains(node),
        )
    }

    fn search<FH, FS>(
        &self,
        start: Node,
        heuristic: FH,
        success: FS,
    ) -> Result<Option<(Node, Path)>, SearchError>
    where
        FH: Fn(&Node) -> f64,
        FS: FnMut(&Node) -> bool,
    {
        let flags = self.flags.as_ref().ok_or(SearchError::MissingFlags)?;
        let connectivity = self.algorithm.connectivity();
        let factor = self.heuristic_factor;
        let timer = Instant::now();

        let mut ct = self.context.lock().unwrap_or_else(PoisonError::into_inner);
        let result = ct.astar(
            &start,
            |node| {
                trace!("expanding {}", node);
                connectivity
                    .neighbourhood(node)
                    .into_iter()
                    .filter(|n| !flags.blocked(&Candidate::new(*n, *node)))
                    .map(|n| (n, OrderedFloat(move_cost(node, &n))))
                    .collect::<SmallVec<[_; N_SMALLVEC_SIZE]>>()
            },
            |node| OrderedFloat(heuristic(node) * factor),
            success,
        );
        match &result {
            Some((nodes, cost)) => debug!(
                "{}: path of {} nodes (cost {:.3}) from {} after expanding {} nodes in {:?}",
                self.algorithm,
                nodes.len(),
                cost.into_inner(),
                start,
                ct.expanded(),
                timer.elapsed()
            ),
            None => debug!(
                "{}: no path from {} after expanding {} nodes in {:?}",
                self.algorithm,
                start,
                ct.expanded(),
                timer.elapsed()
            ),
        }
        Ok(result.and_then(|(nodes, cost)| {
            let reached = *nodes.last()?;
            Some((reached, Path::new(nodes, cost.into_inner())))
        }))
    }
}

impl<F> fmt::Debug for Pathfinder<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Pathfinder")
            .field("algorithm", &self.algorithm)
            .field("flags_bound", &self.flags.is_some())
            .field("heuristic_factor", &self.heuristic_factor)
            .finish()
    }
}
