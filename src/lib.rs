//! # hilbert-pack - Static Packed Hilbert R-tree
//!
//! A spatial index for two-dimensional axis-aligned bounding boxes (AABBs),
//! packed into a single contiguous numeric buffer.
//!
//! ## Features
//!
//! - **Hilbert Curve Ordering**: Leaves are sorted along a space-filling
//!   curve for spatial locality
//! - **Flat Packed Layout**: No per-node allocations; the entire index is
//!   one typed array that can be transferred or persisted without pointer
//!   fix-up
//! - **Fixed-Count Bulk Build**: The item count is declared up front, the
//!   tree is built bottom-up in one pass
//! - **Configurable Element Width**: `f64` records by default, `f32` for
//!   half the memory
//!
//! ## Quick Start
//!
//! ```rust
//! use hilbert_pack::prelude::*;
//!
//! // Declare the item count up front
//! let mut tree = HilbertRTree::<f64>::new(4).unwrap();
//!
//! // Add the bounding boxes (min_x, min_y, max_x, max_y)
//! tree.add(0.0, 0.0, 2.0, 2.0).unwrap();    // Box 0: large box
//! tree.add(1.0, 1.0, 3.0, 3.0).unwrap();    // Box 1: overlapping box
//! tree.add(5.0, 5.0, 6.0, 6.0).unwrap();    // Box 2: distant box
//! tree.add(1.5, 1.5, 2.5, 2.5).unwrap();    // Box 3: small box inside others
//!
//! // Build the index (required before querying)
//! tree.finish().unwrap();
//!
//! // Query for boxes intersecting a region
//! let mut results = tree.search(1.2, 1.2, 2.8, 2.8).unwrap();
//! results.sort_unstable();
//! assert_eq!(results, vec![0, 1, 3]);
//! ```
//!
//! ## How It Works
//!
//! Boxes are streamed into the front of the buffer as five-slot records.
//! `finish` maps every box center onto a 65536 x 65536 grid, computes its
//! distance along an order-16 Hilbert curve, co-sorts records and curve
//! distances, then packs parent records bottom-up so that each internal
//! record's box is the union of up to `node_size` children. Queries walk the
//! buffer from the root record at the end, pruning whole subtrees whose
//! boxes miss the query rectangle.
//!
//! The buffer is the index: [`HilbertRTree::buffer`] exposes it,
//! [`HilbertRTree::from_buffer`] and [`HilbertRTree::from_le_bytes`] restore
//! a queryable tree from it given the same item count and node size.

pub mod element;
pub mod error;
mod hilbert;
pub mod hilbert_rtree;
pub mod prelude;

pub use element::IndexElement;
pub use error::{IndexError, Result};
pub use hilbert_rtree::HilbertRTree;
