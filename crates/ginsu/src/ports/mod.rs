//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - slicing and merging API
//! - Driven Ports (outbound) - cell storage

pub mod inbound;
pub mod outbound;

pub use inbound::{GridMerger, GridSlicer};
pub use outbound::GridStore;
