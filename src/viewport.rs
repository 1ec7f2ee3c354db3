//! View transform: pan/zoom state applied on top of a laid-out scene.

use serde::Serialize;

use crate::scene::{Rect, Scene};

const FIT_PAD: f64 = 40.0;
const MIN_SCALE: f64 = 0.25;
const MAX_SCALE: f64 = 2.5;

/// A uniform scale plus translation, applied scale-then-translate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// The camera over a scene.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    transform: Transform,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            transform: Transform::default(),
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Zoom so the scene's bounding box fills the canvas with a margin,
    /// clamped to a sane scale range and centered on the leftover space.
    /// Degenerate geometry (empty scene, zero-extent box) leaves the
    /// transform untouched.
    pub fn fit(&mut self, scene: &Scene) -> Transform {
        let Some(bbox) = scene.bounding_box() else {
            return self.transform;
        };
        if bbox.width <= 0.0 || bbox.height <= 0.0 {
            return self.transform;
        }
        self.transform = fit_transform(&bbox, self.width, self.height);
        self.transform
    }

    /// Back to the identity view.
    pub fn reset(&mut self) -> Transform {
        self.transform = Transform::default();
        self.transform
    }
}

fn fit_transform(bbox: &Rect, width: f64, height: f64) -> Transform {
    let sx = (width - FIT_PAD * 2.0) / bbox.width;
    let sy = (height - FIT_PAD * 2.0) / bbox.height;
    let scale = sx.min(sy).clamp(MIN_SCALE, MAX_SCALE);
    Transform {
        translate_x: FIT_PAD - bbox.x * scale + (width - (bbox.width * scale + FIT_PAD * 2.0)) / 2.0,
        translate_y: FIT_PAD - bbox.y * scale + (height - (bbox.height * scale + FIT_PAD * 2.0)) / 2.0,
        scale,
    }
}
