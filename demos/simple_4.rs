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
// Nodes have a 4-neighborhood

fn main() {
    let mut pathing_grid = PathingGrid::new(3, 3, false);
    pathing_grid.set(1, 1, true);
    println!("{}", pathing_grid);
    let pathfinder = Pathfinder::with_flags(PathAlgorithm::Astar4, &pathing_grid);
    let start = Node::new(0, 0);
    let end = Node::new(2, 2);
    let path = pathfinder.find_path(&start, &end).unwrap().unwrap();
    println!("Path ({}, cost {}):", pathfinder.algorithm(), path.cost());
    for p in path {
        println!("{}", p);
    }
}
