use grid_search::{Node, PathAlgorithm, Pathfinder, PathingGrid};
use grid_util::grid::Grid;

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have an 8-neighborhood. With corner cutting disabled the path cannot squeeze past the
// obstacle diagonally and has to go around it.

fn main() {
    let mut pathing_grid = PathingGrid::new(3, 3, false);
    pathing_grid.set(1, 1, true);
    println!("{}", pathing_grid);
    let start = Node::new(0, 0);
    let end = Node::new(2, 2);
    for allow_corner_cutting in [true, false] {
        pathing_grid.allow_corner_cutting = allow_corner_cutting;
        let pathfinder = Pathfinder::with_flags(PathAlgorithm::Astar8, &pathing_grid);
        let path = pathfinder.find_path(&start, &end).unwrap().unwrap();
        println!(
            "Path (corner cutting: {}, cost {:.3}):",
            allow_corner_cutting,
            path.cost()
        );
        for p in &path {
            println!("{}", p);
        }
    }
}
