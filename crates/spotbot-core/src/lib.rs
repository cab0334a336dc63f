#![deny(missing_docs)]
//! Spot Bot core library.
//!
//! Platform-free logic for the pet tax photo store and the puzzle-result watch.

/// Settings and tunable constants.
pub mod config;
/// Puzzle-result message watch.
pub mod puzzle;
/// Filesystem photo store.
pub mod store;
/// Pet tax upload and retrieval service.
pub mod tax;
/// Category table and tax group selection.
pub mod taxonomy;
/// Upload validation and filename normalization.
pub mod upload;
/// Utility functions.
pub mod utils;

#[cfg(test)]
pub mod testing;
