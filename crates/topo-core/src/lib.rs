//! Core types for the topo invariant engine.
//!
//! This crate provides the foundational types used by `topo-analyze`:
//! - [`BinaryImage`], the validated material/pore grid every analysis starts from
//! - [`Bounds`], pixel bounding boxes
//! - Error types

pub mod binary;
pub mod errors;

pub use binary::*;
pub use errors::*;
