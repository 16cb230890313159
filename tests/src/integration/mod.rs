//! # Integration Tests
//!
//! End-to-end slicing, merging and parallel operations through the public
//! `ginsu` API.

pub mod file_grid;
pub mod parallel;
pub mod properties;
pub mod roundtrip;
