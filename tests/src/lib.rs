//! # Ginsu Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs        # Shared geometries and tracing setup
//! └── integration/
//!     ├── roundtrip.rs   # Slice then merge gives the input back
//!     ├── properties.rs  # Property tests over random polygons and knives
//!     ├── parallel.rs    # Divide-and-conquer boolean operations
//!     └── file_grid.rs   # Store-backed grids on disk
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ginsu-tests
//! RUST_LOG=ginsu=debug cargo test -p ginsu-tests integration::parallel
//!
//! # Benchmarks
//! cargo bench -p ginsu-tests
//! ```

pub mod fixtures;
pub mod integration;
