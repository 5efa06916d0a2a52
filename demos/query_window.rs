//! Basic build-then-query walk-through
use hilbert_pack::prelude::*;

fn main() -> Result<(), IndexError> {
    // Four boxes, count declared up front
    let mut tree = HilbertRTree::<f64>::new(4)?;
    tree.add(10.0, 10.0, 15.0, 15.0)?; // Box 0
    tree.add(20.0, 20.0, 25.0, 25.0)?; // Box 1
    tree.add(30.0, 10.0, 35.0, 15.0)?; // Box 2
    tree.add(12.0, 12.0, 22.0, 22.0)?; // Box 3
    tree.finish()?;

    let (min_x, min_y, max_x, max_y) = tree.extent();
    println!("Indexed 4 boxes, extent ({min_x}, {min_y}) - ({max_x}, {max_y})");

    let results = tree.search(14.0, 14.0, 21.0, 21.0)?;
    println!("Boxes intersecting (14, 14)-(21, 21): {results:?}");

    let evens = tree.search_filtered(0.0, 0.0, 50.0, 50.0, |i| i % 2 == 0)?;
    println!("Even-indexed boxes in the full window: {evens:?}");

    let at_point = tree.search_point(13.0, 13.0)?;
    println!("Boxes containing (13, 13): {at_point:?}");

    Ok(())
}
