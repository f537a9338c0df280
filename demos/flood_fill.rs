use grid_search::{FillAlgorithm, FloodFiller, Node, PathingGrid, Visited};
use grid_util::grid::Grid;

// Fills the left room of a 7x4 grid with shape
//  _______
// |S  #   |
// |   #   |
// |   #   |
// |   #   |
//  _______
// once with each fill algorithm and prints the cells in the order they were discovered.

fn main() {
    let mut pathing_grid = PathingGrid::new(7, 4, false);
    for y in 0..4 {
        pathing_grid.set(3, y, true);
    }
    println!("{}", pathing_grid);
    let start = Node::new(0, 0);
    for algorithm in [FillAlgorithm::Queue4, FillAlgorithm::Linear4] {
        let visited = Visited::new(&pathing_grid);
        let filler = FloodFiller::with_flags(algorithm, &visited);
        let mut order = Vec::new();
        let mut sink = |node: Node| order.push(node);
        filler
            .fill(&start, &mut visited.recorder(&mut sink))
            .unwrap();
        println!("{} found {} cells:", algorithm, order.len());
        for node in &order {
            print!("{} ", node);
        }
        println!("\n");
    }
}
