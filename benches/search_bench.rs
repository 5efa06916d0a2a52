//! Benchmark for packed-tree build and `search` performance
//!
//! Builds an index over 1M randomly distributed bounding boxes in a 100x100
//! coordinate space, then times range queries at several coverage tiers
//! (100%, 50%, 10%, 1%, 0.01% of the extent).

use hilbert_pack::HilbertRTree;
use rand::Rng;
use rand::SeedableRng;
use std::time::Instant;

/// Generate a random bounding box with size up to `max_size`
/// Coordinate space: 100x100
fn add_random_box<R: Rng>(rng: &mut R, boxes: &mut Vec<f64>, max_size: f64) {
    let min_x = rng.random_range(0.0..(100.0 - max_size));
    let min_y = rng.random_range(0.0..(100.0 - max_size));
    let box_width = rng.random_range(0.0..max_size);
    let box_height = rng.random_range(0.0..max_size);

    boxes.push(min_x);
    boxes.push(min_y);
    boxes.push(min_x + box_width);
    boxes.push(min_y + box_height);
}

/// Run every query box in `boxes` through the tree and report wall time
fn bench_search(tree: &HilbertRTree<f64>, boxes: &[f64], num_tests: usize, percentage_str: &str) {
    let mut results = Vec::new();
    let start = Instant::now();

    for chunk in boxes.chunks(4) {
        if chunk.len() == 4 {
            tree.search_into(chunk[0], chunk[1], chunk[2], chunk[3], &mut results)
                .expect("index is finished");
        }
    }

    let elapsed = start.elapsed();
    println!(
        "{} searches {}%: {}ms",
        num_tests,
        percentage_str,
        elapsed.as_millis()
    );
}

fn main() {
    println!("Packed Hilbert R-tree Benchmark");
    println!("===============================\n");

    let num_items = 1_000_000;
    let num_tests = 1_000;

    // Fixed seed for reproducibility
    let seed = 95756739_u64;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let mut coords = Vec::new();
    for _ in 0..num_items {
        add_random_box(&mut rng, &mut coords, 1.0);
    }

    // Query boxes sized to cover ~100/50/10/1/0.01 % of the space
    let mut boxes_full = Vec::new();
    let mut boxes_50 = Vec::new();
    let mut boxes_10 = Vec::new();
    let mut boxes_1 = Vec::new();
    let mut boxes_001 = Vec::new();

    for _ in 0..num_tests {
        boxes_full.push(0.0);
        boxes_full.push(0.0);
        boxes_full.push(100.0);
        boxes_full.push(100.0);

        add_random_box(&mut rng, &mut boxes_50, (0.5_f64).sqrt() * 100.0);
        add_random_box(&mut rng, &mut boxes_10, (0.1_f64).sqrt() * 100.0);
        add_random_box(&mut rng, &mut boxes_1, 10.0);
        add_random_box(&mut rng, &mut boxes_001, 1.0);
    }

    println!("Building index with {} items...", num_items);
    let start = Instant::now();
    let mut tree = HilbertRTree::<f64>::new(num_items).expect("positive item count");

    for chunk in coords.chunks(4) {
        if chunk.len() == 4 {
            tree.add(chunk[0], chunk[1], chunk[2], chunk[3])
                .expect("within declared capacity");
        }
    }

    tree.finish().expect("all items added");
    let build_time = start.elapsed();

    println!("Index built in {:.2}ms\n", build_time.as_secs_f64() * 1000.0);

    println!("Running query benchmarks:");
    println!("-----------------------");
    bench_search(&tree, &boxes_full, num_tests, "100");
    bench_search(&tree, &boxes_50, num_tests, "50");
    bench_search(&tree, &boxes_10, num_tests, "10");
    bench_search(&tree, &boxes_1, num_tests, "1");
    bench_search(&tree, &boxes_001, num_tests, "0.01");
    println!();
}

/*
cargo bench --bench search_bench
*/
