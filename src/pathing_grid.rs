use core::fmt;

use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;
use log::info;
use petgraph::unionfind::UnionFind;

use crate::connectivity::Connectivity;
use crate::flags::Flags;
use crate::loc::Node;
use crate::pathfinder::Candidate;

/// A bounded occupancy grid usable as collision flags for both [Pathfinder](crate::Pathfinder)
/// and [FloodFiller](crate::FloodFiller). Cells hold [true] when blocked; everything outside
/// the grid is blocked.
///
/// Also maintains connected components in a [UnionFind] so reachability can be checked without
/// searching.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    pub grid: BoolGrid,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
    /// Adjacency used when generating components.
    pub connectivity: Connectivity,
    /// When false, a diagonal move is blocked if either cell it squeezes between is blocked.
    pub allow_corner_cutting: bool,
}

impl Default for PathingGrid {
    fn default() -> PathingGrid {
        PathingGrid {
            grid: BoolGrid::default(),
            components: UnionFind::new(0),
            components_dirty: false,
            connectivity: Connectivity::Eight,
            allow_corner_cutting: true,
        }
    }
}

impl PathingGrid {
    pub fn in_bounds(&self, node: &Node) -> bool {
        self.grid.point_in_bounds(Point::from(*node))
    }

    pub fn is_open(&self, node: &Node) -> bool {
        self.in_bounds(node) && !self.grid.get_point(Point::from(*node))
    }

    /// Whether a single step from `start` onto `pos` is allowed.
    pub fn can_move_to(&self, pos: Node, start: Node) -> bool {
        if self.allow_corner_cutting || pos.x == start.x || pos.y == start.y {
            self.is_open(&pos)
        } else {
            debug_assert!((start.x - pos.x).abs() <= 1 && (start.y - pos.y).abs() <= 1);
            self.is_open(&pos)
                && self.is_open(&Node::new(start.x, pos.y))
                && self.is_open(&Node::new(pos.x, start.y))
        }
    }

    fn ix(&self, node: &Node) -> usize {
        self.grid.get_ix_point(&Point::from(*node))
    }

    /// Retrieves the component id a given [Node] belongs to, or [None] outside the grid.
    pub fn get_component(&self, node: &Node) -> Option<usize> {
        self.in_bounds(node).then(|| self.components.find(self.ix(node)))
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Node, goal: &Node) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Node, goal: &Node) -> bool {
        if self.in_bounds(start) && self.in_bounds(goal) {
            !self.components.equiv(self.ix(start), self.ix(goal))
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up grid neighbours to the same components.
    pub fn generate_components(&mut self) {
        let w = self.grid.width();
        let h = self.grid.height();
        self.components = UnionFind::new(w * h);
        self.components_dirty = false;
        // Moves are symmetric, so linking towards the east and south covers every pair
        let forward: &[(i32, i32)] = match self.connectivity {
            Connectivity::Four => &[(1, 0), (0, 1)],
            Connectivity::Eight => &[(1, 0), (0, 1), (1, 1), (1, -1)],
        };
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let node = Node::new(x, y);
                if !self.is_open(&node) {
                    continue;
                }
                let node_ix = self.ix(&node);
                for &(dx, dy) in forward {
                    let neighbour = node.offset(dx, dy);
                    if self.can_move_to(neighbour, node) {
                        let neighbour_ix = self.ix(&neighbour);
                        self.components.union(node_ix, neighbour_ix);
                    }
                }
            }
        }
    }
}

impl Flags<Node> for PathingGrid {
    fn blocked(&self, loc: &Node) -> bool {
        !self.is_open(loc)
    }
}

impl Flags<Candidate> for PathingGrid {
    fn blocked(&self, loc: &Candidate) -> bool {
        !self.can_move_to(loc.node, loc.parent)
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid:")?;
        for y in 0..self.grid.height() {
            let values = (0..self.grid.width())
                .map(|x| self.grid.get(x, y) as i32)
                .collect::<Vec<i32>>();
            writeln!(f, "{:?}", values)?;
        }
        Ok(())
    }
}

impl Grid<bool> for PathingGrid {
    fn new(width: usize, height: usize, default_value: bool) -> Self {
        PathingGrid {
            grid: BoolGrid::new(width, height, default_value),
            components: UnionFind::new(width * height),
            components_dirty: false,
            connectivity: Connectivity::Eight,
            allow_corner_cutting: true,
        }
    }
    fn get(&self, x: usize, y: usize) -> bool {
        self.grid.get(x, y)
    }
    /// Updates a position on the grid. Joins newly connected components and flags the components
    /// as dirty if components are (potentially) broken apart into multiple.
    fn set(&mut self, x: usize, y: usize, blocked: bool) {
        let was_blocked = self.grid.get(x, y);
        self.grid.set(x, y, blocked);
        if blocked {
            if !was_blocked {
                self.components_dirty = true;
            }
            return;
        }
        if was_blocked && !self.allow_corner_cutting && self.connectivity.allows_diagonal() {
            // An opened corner can join two diagonal neighbours that are not adjacent to it
            self.components_dirty = true;
        }
        let node = Node::new(x as i32, y as i32);
        let node_ix = self.ix(&node);
        for neighbour in self.connectivity.neighbourhood(&node) {
            if self.can_move_to(neighbour, node) {
                let neighbour_ix = self.ix(&neighbour);
                self.components.union(node_ix, neighbour_ix);
            }
        }
    }
    fn width(&self) -> usize {
        self.grid.width()
    }
    fn height(&self) -> usize {
        self.grid.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests whether points are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // Corresponds to the following 3x2 grid:
        //  ___
        // | # |
        // | # |
        //  ___
        let mut path_graph = PathingGrid::new(3, 2, false);
        path_graph.grid.set(1, 0, true);
        path_graph.grid.set(1, 1, true);
        let p1 = Node::new(0, 0);
        let p2 = Node::new(1, 1);
        let p3 = Node::new(0, 1);
        let p4 = Node::new(2, 0);
        path_graph.generate_components();
        assert!(path_graph.unreachable(&p1, &p2));
        assert!(path_graph.reachable(&p1, &p3));
        assert!(path_graph.unreachable(&p1, &p4));
        assert_ne!(path_graph.get_component(&p1), path_graph.get_component(&p4));
        assert!(path_graph.get_component(&p1).is_some());
        assert_eq!(path_graph.get_component(&Node::new(-1, 0)), None);
        assert_eq!(path_graph.get_component(&Node::new(3, 0)), None);
        assert_eq!(path_graph.get_component(&Node::new(0, 2)), None);
    }

    /// Asserts that the two corners are connected on a 4-grid.
    #[test]
    fn reachable_without_diagonals() {
        // |S  |
        // | # |
        // |  G|
        //  ___
        let mut pathing_grid = PathingGrid::new(3, 3, false);
        pathing_grid.connectivity = Connectivity::Four;
        pathing_grid.set(1, 1, true);
        pathing_grid.generate_components();
        assert!(pathing_grid.reachable(&Node::new(0, 0), &Node::new(2, 2)));
        assert!(pathing_grid.unreachable(&Node::new(0, 0), &Node::new(-1, 0)));
    }

    // Tests whether allowing diagonals has the expected effect on diagonal reachability in a minimal setting.
    #[test]
    fn test_diagonal_switch_reachable() {
        //  ___
        // | #|
        // |# |
        //  __
        let mut four = PathingGrid::new(2, 2, true);
        four.connectivity = Connectivity::Four;
        let mut eight = PathingGrid::new(2, 2, true);
        let mut no_corners = PathingGrid::new(2, 2, true);
        no_corners.allow_corner_cutting = false;
        for pathing_grid in [&mut four, &mut eight, &mut no_corners] {
            pathing_grid.set(0, 0, false);
            pathing_grid.set(1, 1, false);
            pathing_grid.generate_components();
        }
        let start = Node::new(0, 0);
        let end = Node::new(1, 1);
        assert!(four.unreachable(&start, &end));
        assert!(eight.reachable(&start, &end));
        assert!(no_corners.unreachable(&start, &end));
    }

    #[test]
    fn blocking_marks_components_dirty() {
        let mut pathing_grid = PathingGrid::new(3, 1, false);
        pathing_grid.generate_components();
        let (a, b) = (Node::new(0, 0), Node::new(2, 0));
        assert!(pathing_grid.reachable(&a, &b));
        pathing_grid.set(1, 0, true);
        assert!(pathing_grid.components_dirty);
        pathing_grid.update();
        assert!(pathing_grid.unreachable(&a, &b));
        pathing_grid.set(1, 0, false);
        assert!(!pathing_grid.components_dirty);
        assert!(pathing_grid.reachable(&a, &b));
    }

    #[test]
    fn flags_respect_bounds_and_corners() {
        let mut pathing_grid = PathingGrid::new(2, 2, false);
        pathing_grid.set(1, 0, true);
        assert!(Flags::<Node>::blocked(&pathing_grid, &Node::new(1, 0)));
        assert!(Flags::<Node>::blocked(&pathing_grid, &Node::new(2, 0)));
        assert!(!Flags::<Node>::blocked(&pathing_grid, &Node::new(1, 1)));
        let diagonal = Candidate::new(Node::new(1, 1), Node::new(0, 0));
        assert!(!pathing_grid.blocked(&diagonal));
        pathing_grid.allow_corner_cutting = false;
        assert!(pathing_grid.blocked(&diagonal));
        assert!(!pathing_grid.blocked(&Candidate::new(Node::new(0, 1), Node::new(0, 0))));
    }

    #[test]
    fn display_rows() {
        let mut pathing_grid = PathingGrid::new(2, 2, false);
        pathing_grid.set(0, 1, true);
        assert_eq!(format!("{pathing_grid}"), "Grid:\n[0, 0]\n[1, 0]\n");
    }
}
