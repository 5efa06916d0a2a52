//! Static packed Hilbert R-tree over a flat numeric buffer.
//!
//! The whole index is one contiguous `Vec<T>` of five-slot records
//! `(ref, min_x, min_y, max_x, max_y)`. Leaf records occupy the front of the
//! buffer; parent records are appended bottom-up by `finish`, ending with the
//! root as the last record. A leaf's `ref` slot holds its insertion index, an
//! internal record's `ref` slot holds the slot offset of its first child, so
//! the buffer contains no pointers and can be transferred or persisted as-is.
//!
//! The item count is fixed at construction. The lifecycle is one-way:
//! exactly `num_items` calls to [`add`](HilbertRTree::add), one call to
//! [`finish`](HilbertRTree::finish), then any number of
//! [`search`](HilbertRTree::search) calls. Phase transitions are enforced by
//! the write cursor alone.

use crate::element::IndexElement;
use crate::error::{IndexError, Result};
use crate::hilbert::hilbert_xy_to_index;

/// Slots per record: reference plus four box coordinates.
const RECORD_SLOTS: usize = 5;

const DEFAULT_NODE_SIZE: usize = 16;

/// Side length of the Hilbert grid minus one.
const HILBERT_MAX: f64 = 65535.0;

/// Running extrema over all added boxes.
#[derive(Clone, Copy, Debug)]
struct Bounds<T: IndexElement> {
    min_x: T,
    min_y: T,
    max_x: T,
    max_y: T,
}

impl<T: IndexElement> Bounds<T> {
    fn empty() -> Self {
        Bounds {
            min_x: T::infinity(),
            min_y: T::infinity(),
            max_x: T::neg_infinity(),
            max_y: T::neg_infinity(),
        }
    }

    fn extend(&mut self, min_x: T, min_y: T, max_x: T, max_y: T) {
        self.min_x = self.min_x.min(min_x);
        self.min_y = self.min_y.min(min_y);
        self.max_x = self.max_x.max(max_x);
        self.max_y = self.max_y.max(max_y);
    }
}

/// Static Hilbert R-tree for axis-aligned bounding boxes.
///
/// Generic over the buffer element type; `f64` is the default and `f32`
/// halves the memory footprint (see [`IndexElement`] for the reference-range
/// tradeoff).
///
/// # Example
/// ```
/// use hilbert_pack::HilbertRTree;
///
/// let mut tree = HilbertRTree::<f64>::new(3).unwrap();
/// tree.add(0.0, 0.0, 2.0, 2.0).unwrap();
/// tree.add(1.0, 1.0, 3.0, 3.0).unwrap();
/// tree.add(5.0, 5.0, 6.0, 6.0).unwrap();
/// tree.finish().unwrap();
///
/// let mut found = tree.search(1.5, 1.5, 2.5, 2.5).unwrap();
/// found.sort_unstable();
/// assert_eq!(found, vec![0, 1]);
/// ```
#[derive(Clone, Debug)]
pub struct HilbertRTree<T: IndexElement = f64> {
    /// Flat record buffer: leaves, then parent levels, root last.
    data: Vec<T>,
    /// Cumulative record count through each level, in slot units.
    level_bounds: Vec<usize>,
    /// Maximum children per internal record.
    node_size: usize,
    /// Number of leaf items.
    num_items: usize,
    /// Write cursor in slot units.
    pos: usize,
    /// Extrema over all added boxes.
    bounds: Bounds<T>,
}

/// Total node count and per-level cumulative slot bounds for a tree of
/// `num_items` leaves packed `node_size` wide.
fn compute_level_bounds(num_items: usize, node_size: usize) -> (usize, Vec<usize>) {
    let mut n = num_items;
    let mut num_nodes = n;
    let mut level_bounds = vec![n * RECORD_SLOTS];
    loop {
        n = n.div_ceil(node_size);
        num_nodes += n;
        level_bounds.push(num_nodes * RECORD_SLOTS);
        if n == 1 {
            break;
        }
    }
    (num_nodes, level_bounds)
}

/// First level bound strictly above `slot`. Level tables are a handful of
/// entries, a linear scan beats binary search here.
fn upper_bound(slot: usize, level_bounds: &[usize]) -> usize {
    for &bound in level_bounds {
        if bound > slot {
            return bound;
        }
    }
    level_bounds.last().copied().unwrap_or(0)
}

/// In-place Hoare quicksort of the leaf records by Hilbert value, midpoint
/// pivot. Each swap carries the five-slot record along with its key. Ties
/// between equal keys end up in an unspecified relative order.
fn sort_records<T: IndexElement>(values: &mut [u32], data: &mut [T], left: usize, right: usize) {
    if left >= right {
        return;
    }

    let pivot = values[(left + right) >> 1];
    let mut i = left as isize - 1;
    let mut j = right as isize + 1;

    loop {
        loop {
            i += 1;
            if values[i as usize] >= pivot {
                break;
            }
        }
        loop {
            j -= 1;
            if values[j as usize] <= pivot {
                break;
            }
        }
        if i >= j {
            break;
        }
        swap_records(values, data, i as usize, j as usize);
    }

    let j = j as usize;
    sort_records(values, data, left, j);
    sort_records(values, data, j + 1, right);
}

fn swap_records<T: IndexElement>(values: &mut [u32], data: &mut [T], a: usize, b: usize) {
    values.swap(a, b);
    let pa = a * RECORD_SLOTS;
    let pb = b * RECORD_SLOTS;
    for k in 0..RECORD_SLOTS {
        data.swap(pa + k, pb + k);
    }
}

impl<T: IndexElement> HilbertRTree<T> {
    /// Creates an index for exactly `num_items` boxes with the default node
    /// size of 16.
    ///
    /// # Errors
    /// [`IndexError::NoItems`] when `num_items` is zero.
    pub fn new(num_items: usize) -> Result<Self> {
        Self::with_node_size(num_items, DEFAULT_NODE_SIZE)
    }

    /// Creates an index for exactly `num_items` boxes packed `node_size`
    /// children per node. Node sizes below 2 are clamped to 2.
    ///
    /// The full buffer of `5 * total_nodes` elements is allocated up front
    /// and zeroed; no further allocation happens while adding.
    ///
    /// # Errors
    /// [`IndexError::NoItems`] when `num_items` is zero.
    pub fn with_node_size(num_items: usize, node_size: usize) -> Result<Self> {
        if num_items == 0 {
            return Err(IndexError::NoItems);
        }
        let node_size = node_size.max(2);
        let (total_nodes, level_bounds) = compute_level_bounds(num_items, node_size);
        Ok(HilbertRTree {
            data: vec![T::zero(); total_nodes * RECORD_SLOTS],
            level_bounds,
            node_size,
            num_items,
            pos: 0,
            bounds: Bounds::empty(),
        })
    }

    /// Wraps a buffer produced by [`buffer`](Self::buffer) on a finished
    /// index that was built with identical `num_items` and `node_size`.
    ///
    /// The extrema are recovered from the root record and the index is
    /// immediately queryable. The buffer content itself is trusted; only its
    /// length is validated.
    ///
    /// # Errors
    /// [`IndexError::NoItems`] for a zero item count,
    /// [`IndexError::BufferMismatch`] when the buffer length does not match
    /// the tree shape implied by the parameters.
    pub fn from_buffer(data: Vec<T>, num_items: usize, node_size: usize) -> Result<Self> {
        if num_items == 0 {
            return Err(IndexError::NoItems);
        }
        let node_size = node_size.max(2);
        let (total_nodes, level_bounds) = compute_level_bounds(num_items, node_size);
        let expected = total_nodes * RECORD_SLOTS;
        if data.len() != expected {
            return Err(IndexError::BufferMismatch {
                expected,
                actual: data.len(),
            });
        }

        let root = expected - RECORD_SLOTS;
        let bounds = Bounds {
            min_x: data[root + 1],
            min_y: data[root + 2],
            max_x: data[root + 3],
            max_y: data[root + 4],
        };
        Ok(HilbertRTree {
            data,
            level_bounds,
            node_size,
            num_items,
            pos: expected,
            bounds,
        })
    }

    /// Restores an index from the little-endian byte image produced by
    /// [`to_le_bytes`](Self::to_le_bytes).
    ///
    /// # Errors
    /// [`IndexError::InvalidByteLength`] when the byte count is not a
    /// multiple of the element width, plus everything
    /// [`from_buffer`](Self::from_buffer) can return.
    ///
    /// # Example
    /// ```
    /// use hilbert_pack::HilbertRTree;
    ///
    /// let mut tree = HilbertRTree::<f64>::new(2).unwrap();
    /// tree.add(0.0, 0.0, 1.0, 1.0).unwrap();
    /// tree.add(2.0, 2.0, 3.0, 3.0).unwrap();
    /// tree.finish().unwrap();
    ///
    /// let bytes = tree.to_le_bytes();
    /// let restored = HilbertRTree::<f64>::from_le_bytes(&bytes, 2, 16).unwrap();
    /// assert_eq!(
    ///     restored.search(0.5, 0.5, 0.6, 0.6).unwrap(),
    ///     tree.search(0.5, 0.5, 0.6, 0.6).unwrap(),
    /// );
    /// ```
    pub fn from_le_bytes(bytes: &[u8], num_items: usize, node_size: usize) -> Result<Self> {
        if bytes.len() % T::BYTES != 0 {
            return Err(IndexError::InvalidByteLength {
                len: bytes.len(),
                elem: T::BYTES,
            });
        }
        let data = bytes.chunks_exact(T::BYTES).map(T::read_le).collect();
        Self::from_buffer(data, num_items, node_size)
    }

    /// Adds one bounding box and returns its insertion index.
    ///
    /// Boxes may be degenerate (`min == max`) or inverted (`min > max`);
    /// both are stored as given. NaN coordinates are not rejected and make
    /// query results undefined.
    ///
    /// # Errors
    /// [`IndexError::IndexFull`] once `num_items` boxes have been added or
    /// after [`finish`](Self::finish).
    pub fn add(&mut self, min_x: T, min_y: T, max_x: T, max_y: T) -> Result<usize> {
        let index = self.pos / RECORD_SLOTS;
        if index >= self.num_items {
            return Err(IndexError::IndexFull {
                num_items: self.num_items,
            });
        }

        self.data[self.pos] = T::from_index(index);
        self.data[self.pos + 1] = min_x;
        self.data[self.pos + 2] = min_y;
        self.data[self.pos + 3] = max_x;
        self.data[self.pos + 4] = max_y;
        self.pos += RECORD_SLOTS;

        self.bounds.extend(min_x, min_y, max_x, max_y);
        Ok(index)
    }

    /// Sorts the leaves along the Hilbert curve and packs parent records
    /// bottom-up. Irreversible; required before any query.
    ///
    /// Leaf centers are mapped onto a 65536 x 65536 grid spanning the
    /// accumulated extrema. A zero-width or zero-height extent collapses the
    /// affected axis onto grid coordinate 0. The mapping runs in `f64`
    /// regardless of the element type.
    ///
    /// # Errors
    /// [`IndexError::ItemCountMismatch`] unless exactly `num_items` boxes
    /// were added; this also rejects a second `finish`.
    pub fn finish(&mut self) -> Result<()> {
        if self.pos != self.num_items * RECORD_SLOTS {
            return Err(IndexError::ItemCountMismatch {
                expected: self.num_items,
                got: self.pos / RECORD_SLOTS,
            });
        }

        let min_x = self.bounds.min_x.as_f64();
        let min_y = self.bounds.min_y.as_f64();
        let width = self.bounds.max_x.as_f64() - min_x;
        let height = self.bounds.max_y.as_f64() - min_y;

        // Map leaf centers onto the Hilbert grid.
        let mut hilbert_values = vec![0u32; self.num_items];
        for (i, value) in hilbert_values.iter_mut().enumerate() {
            let p = i * RECORD_SLOTS;
            let cx = (self.data[p + 1].as_f64() + self.data[p + 3].as_f64()) / 2.0;
            let cy = (self.data[p + 2].as_f64() + self.data[p + 4].as_f64()) / 2.0;
            let hx = if width > 0.0 {
                (HILBERT_MAX * (cx - min_x) / width).floor() as u32
            } else {
                0
            };
            let hy = if height > 0.0 {
                (HILBERT_MAX * (cy - min_y) / height).floor() as u32
            } else {
                0
            };
            *value = hilbert_xy_to_index(hx, hy);
        }

        sort_records(&mut hilbert_values, &mut self.data, 0, self.num_items - 1);

        // Pack parent records level by level; the root lands in the last
        // record and the cursor at the buffer end.
        let mut child = 0;
        for level in 0..self.level_bounds.len() - 1 {
            let level_end = self.level_bounds[level];
            while child < level_end {
                let first_child = child;
                let mut node = Bounds::empty();
                for _ in 0..self.node_size {
                    if child >= level_end {
                        break;
                    }
                    node.extend(
                        self.data[child + 1],
                        self.data[child + 2],
                        self.data[child + 3],
                        self.data[child + 4],
                    );
                    child += RECORD_SLOTS;
                }
                self.data[self.pos] = T::from_index(first_child);
                self.data[self.pos + 1] = node.min_x;
                self.data[self.pos + 2] = node.min_y;
                self.data[self.pos + 3] = node.max_x;
                self.data[self.pos + 4] = node.max_y;
                self.pos += RECORD_SLOTS;
            }
        }
        Ok(())
    }

    /// Returns the insertion indices of all boxes overlapping the query
    /// rectangle. Overlap is inclusive on all four edges, so boxes that
    /// merely touch count.
    ///
    /// Results come back in the deterministic depth-first order of the
    /// traversal; sort them if you need index order.
    ///
    /// # Errors
    /// [`IndexError::NotFinished`] before [`finish`](Self::finish).
    pub fn search(&self, min_x: T, min_y: T, max_x: T, max_y: T) -> Result<Vec<usize>> {
        let mut results = Vec::new();
        self.traverse(min_x, min_y, max_x, max_y, |_| true, &mut results)?;
        Ok(results)
    }

    /// Like [`search`](Self::search), but consults `filter` once per
    /// candidate leaf and keeps only the indices it accepts.
    ///
    /// # Example
    /// ```
    /// use hilbert_pack::HilbertRTree;
    ///
    /// let mut tree = HilbertRTree::<f64>::new(4).unwrap();
    /// for i in 0..4 {
    ///     let c = i as f64;
    ///     tree.add(c, c, c + 1.0, c + 1.0).unwrap();
    /// }
    /// tree.finish().unwrap();
    ///
    /// let mut even = tree
    ///     .search_filtered(0.0, 0.0, 10.0, 10.0, |i| i % 2 == 0)
    ///     .unwrap();
    /// even.sort_unstable();
    /// assert_eq!(even, vec![0, 2]);
    /// ```
    pub fn search_filtered<F>(
        &self,
        min_x: T,
        min_y: T,
        max_x: T,
        max_y: T,
        filter: F,
    ) -> Result<Vec<usize>>
    where
        F: Fn(usize) -> bool,
    {
        let mut results = Vec::new();
        self.traverse(min_x, min_y, max_x, max_y, filter, &mut results)?;
        Ok(results)
    }

    /// Like [`search`](Self::search), writing into a caller-supplied vector
    /// so repeated queries can reuse one allocation. The vector is cleared
    /// first.
    pub fn search_into(
        &self,
        min_x: T,
        min_y: T,
        max_x: T,
        max_y: T,
        results: &mut Vec<usize>,
    ) -> Result<()> {
        self.traverse(min_x, min_y, max_x, max_y, |_| true, results)
    }

    /// Returns the insertion indices of all boxes containing the point,
    /// edges included.
    pub fn search_point(&self, x: T, y: T) -> Result<Vec<usize>> {
        self.search(x, y, x, y)
    }

    /// Depth-first traversal from the root with an explicit work list, so
    /// stack depth stays bounded and the visit order is deterministic.
    fn traverse<F>(
        &self,
        min_x: T,
        min_y: T,
        max_x: T,
        max_y: T,
        filter: F,
        results: &mut Vec<usize>,
    ) -> Result<()>
    where
        F: Fn(usize) -> bool,
    {
        if self.pos != self.data.len() {
            return Err(IndexError::NotFinished);
        }
        results.clear();

        let leaf_slots = self.num_items * RECORD_SLOTS;
        let mut queue: Vec<(usize, usize)> = Vec::new();
        // Root is the last record, on the topmost level.
        let mut node_index = self.data.len() - RECORD_SLOTS;
        let mut level = self.level_bounds.len() - 1;

        loop {
            let end = (node_index + self.node_size * RECORD_SLOTS)
                .min(upper_bound(node_index, &self.level_bounds));

            for pos in (node_index..end).step_by(RECORD_SLOTS) {
                if max_x < self.data[pos + 1]
                    || max_y < self.data[pos + 2]
                    || min_x > self.data[pos + 3]
                    || min_y > self.data[pos + 4]
                {
                    continue;
                }

                let index = self.data[pos].to_index();
                if node_index < leaf_slots {
                    if filter(index) {
                        results.push(index);
                    }
                } else {
                    queue.push((index, level - 1));
                }
            }

            match queue.pop() {
                Some((next_node, next_level)) => {
                    node_index = next_node;
                    level = next_level;
                }
                None => break,
            }
        }
        Ok(())
    }

    /// Number of leaf items the index was constructed for.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Maximum children per internal record.
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Cumulative record count through each tree level, in slot units.
    pub fn level_bounds(&self) -> &[usize] {
        &self.level_bounds
    }

    /// The raw record buffer. After [`finish`](Self::finish) this is the
    /// complete transferable index; the last record is the root.
    pub fn buffer(&self) -> &[T] {
        &self.data
    }

    /// Little-endian byte image of the buffer, suitable for
    /// [`from_le_bytes`](Self::from_le_bytes).
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * T::BYTES);
        for &value in &self.data {
            value.write_le(&mut out);
        }
        out
    }

    /// Global extrema `(min_x, min_y, max_x, max_y)` over all added boxes.
    /// After [`finish`](Self::finish) this equals the root record's box.
    pub fn extent(&self) -> (T, T, T, T) {
        (
            self.bounds.min_x,
            self.bounds.min_y,
            self.bounds.max_x,
            self.bounds.max_y,
        )
    }
}
