//! The live overlay: a mutable copy of the frame that photos are inserted into and that exports
//! are rendered from.

/// Marker binding, photo layer and logo handling.
pub mod binder;
/// Photo decoding, clip paths and image nodes.
pub mod insert;
pub mod scene;
