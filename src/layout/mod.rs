//! Layout strategies over resolved case graphs.
//!
//! Two full-graph strategies (tidy tree, swim lanes) plus a radial overlay
//! for collections that composes with either. All strategies share the node
//! sizing rules here so a node's box is identical whichever layout placed it.

pub mod collections;
pub mod lanes;
pub mod tree;

pub use collections::{CollectionInput, CollectionOptions, layout_collections};
pub use lanes::{LaneOptions, layout_lanes};
pub use tree::{TreeLayoutConfig, layout_tree};

/// Height of a primary node box.
pub const NODE_HEIGHT: f64 = 26.0;
/// Height of a context satellite box.
pub const CONTEXT_HEIGHT: f64 = 22.0;
/// Height of a defeater satellite box.
pub const DEFEATER_HEIGHT: f64 = 18.0;

/// Width of a primary or context box, sized to its label and clamped.
pub fn label_width(label: &str) -> f64 {
    (7.2 * label.chars().count() as f64 + 12.0).clamp(44.0, 180.0)
}

/// Width of a defeater box. Narrower clamp than ordinary nodes.
pub fn defeater_width(label: &str) -> f64 {
    (7.2 * label.chars().count() as f64 + 10.0).clamp(36.0, 120.0)
}
