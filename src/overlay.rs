//! Highlight overlays: named visual classes applied to sets of node ids.
//!
//! The manager holds the desired classes; `reapply_all` projects them onto a
//! concrete scene, producing the frame a surface paints. Application is a
//! filter: ids with no rendered element are ignored, never an error. The
//! frame is recomputed from scratch each time, so reapplication is idempotent
//! and decorations never accumulate.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::scene::Scene;

/// The class whose members additionally carry an "undeveloped" diamond.
pub const UNDEV_CLASS: &str = "undev";

const DIAMOND_HALF: f64 = 5.0;
const DIAMOND_GAP: f64 = 2.0;

/// A small diamond drawn under an undeveloped element's box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diamond {
    pub node: String,
    /// Center of the diamond.
    pub x: f64,
    pub y: f64,
    /// Half-diagonal.
    pub half: f64,
}

/// Everything a surface needs to paint the current overlays.
#[derive(Debug, Default, Serialize)]
pub struct OverlayFrame {
    /// Class name to the ids it decorates, scene-matched and in class
    /// insertion order.
    pub classes: IndexMap<String, Vec<String>>,
    pub diamonds: Vec<Diamond>,
}

/// Desired overlay state, independent of any scene.
#[derive(Debug, Default)]
pub struct OverlayManager {
    classes: IndexMap<String, IndexSet<String>>,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the id set of a visual class.
    pub fn set_overlay(&mut self, class: &str, ids: impl IntoIterator<Item = String>) {
        let set: IndexSet<String> = ids.into_iter().map(|id| id.trim().to_owned()).collect();
        self.classes.insert(class.to_owned(), set);
    }

    /// Forget one class.
    pub fn clear_overlay(&mut self, class: &str) {
        self.classes.shift_remove(class);
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.classes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.classes.values().all(IndexSet::is_empty)
    }

    /// Project the desired classes onto a scene. Main nodes and both
    /// satellite families participate; ids not on canvas drop out. Members
    /// of [`UNDEV_CLASS`] get a diamond recomputed below their box.
    pub fn reapply_all(&self, scene: &Scene) -> OverlayFrame {
        let mut frame = OverlayFrame::default();
        for (class, ids) in &self.classes {
            let matched: Vec<String> = ids
                .iter()
                .filter(|id| scene.contains(id))
                .cloned()
                .collect();
            if matched.is_empty() {
                continue;
            }
            if class == UNDEV_CLASS {
                for id in &matched {
                    if let Some(d) = diamond_for(scene, id) {
                        frame.diamonds.push(d);
                    }
                }
            }
            frame.classes.insert(class.clone(), matched);
        }
        frame
    }
}

fn diamond_for(scene: &Scene, id: &str) -> Option<Diamond> {
    let (x, y, h) = scene
        .nodes
        .iter()
        .find(|n| n.id == id)
        .map(|n| (n.x, n.y, n.height))
        .or_else(|| {
            scene
                .context_nodes
                .iter()
                .chain(&scene.defeater_nodes)
                .find(|n| n.id == id)
                .map(|n| (n.x, n.y, n.height))
        })?;
    Some(Diamond {
        node: id.to_owned(),
        x,
        y: y + h / 2.0 + DIAMOND_HALF + DIAMOND_GAP,
        half: DIAMOND_HALF,
    })
}
