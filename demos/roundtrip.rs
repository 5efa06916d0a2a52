//! Persist a finished index as raw bytes and restore it
//!
//! The buffer is the index: no header, no framing. Restoring needs the same
//! item count, node size, and element type the index was built with.
use hilbert_pack::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut tree = HilbertRTree::<f64>::new(3)?;
    tree.add(10.0, 10.0, 15.0, 15.0)?; // Box 0
    tree.add(20.0, 20.0, 25.0, 25.0)?; // Box 1
    tree.add(30.0, 10.0, 35.0, 15.0)?; // Box 2
    tree.finish()?;

    let path = std::env::temp_dir().join("hilbert_pack_demo.bin");
    std::fs::write(&path, tree.to_le_bytes())?;
    println!("Saved index to {}", path.display());

    let bytes = std::fs::read(&path)?;
    let restored = HilbertRTree::<f64>::from_le_bytes(&bytes, 3, 16)?;
    println!("Restored index from {} bytes", bytes.len());

    let original = tree.search(14.0, 14.0, 26.0, 26.0)?;
    let recovered = restored.search(14.0, 14.0, 26.0, 26.0)?;
    assert_eq!(original, recovered);
    println!("Query results match: {recovered:?}");

    Ok(())
}
