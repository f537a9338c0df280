use grid_search::{Node, PathAlgorithm, Pathfinder, PathingGrid};
use grid_util::grid::Grid;

// In this example a path is found to one of two goals on a 3x3 grid with shape
//  ___
// |S G|
// | # |
// |  G|
//  ___
// where
// - \# marks an obstacle
// - S marks the start
// - G marks a goal
// The found path moves to the closest goal, which is the top one.

fn main() {
    let mut pathing_grid = PathingGrid::new(3, 3, false);
    pathing_grid.set(1, 1, true);
    println!("{}", pathing_grid);
    let pathfinder = Pathfinder::with_flags(PathAlgorithm::Astar8, &pathing_grid);
    let start = Node::new(0, 0);
    let goals = [Node::new(2, 0), Node::new(2, 2)];
    let (selected_goal, path) = pathfinder
        .find_path_multiple_goals(&start, &goals)
        .unwrap()
        .unwrap();
    println!("Selected goal: {}\n", selected_goal);
    println!("Path:");
    for p in path {
        println!("{}", p);
    }
}
