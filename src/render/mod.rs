//! Rendering surfaces and their registry.
//!
//! The layout layer produces pure scenes; a [`Surface`] turns a scene plus
//! the current overlay frame and view transform into pixels (or markup). The
//! registry maps mount names to surfaces so a controller can be built against
//! a name without knowing the concrete backend.

pub mod svg;

pub use svg::SvgSurface;

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::ViewError;
use crate::overlay::OverlayFrame;
use crate::scene::Scene;
use crate::viewport::Transform;

/// A retained-mode paint target. Every call repaints the surface wholesale;
/// surfaces keep no scene state of their own.
pub trait Surface {
    fn render(&mut self, scene: &Scene, overlays: &OverlayFrame, view: Transform);

    /// Drop everything painted. Called when the owning controller is
    /// destroyed.
    fn clear(&mut self);
}

/// Named mount points and the surfaces behind them.
#[derive(Default)]
pub struct SurfaceRegistry {
    surfaces: IndexMap<String, Rc<RefCell<dyn Surface>>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a surface under a mount name, replacing any previous one.
    pub fn register(&mut self, mount: &str, surface: impl Surface + 'static) {
        self.surfaces
            .insert(mount.to_owned(), Rc::new(RefCell::new(surface)));
    }

    /// Look up a mount. Failing here is the `NoMountTarget` condition: it is
    /// checked before any layout work happens.
    pub fn acquire(&self, mount: &str) -> Result<Rc<RefCell<dyn Surface>>, ViewError> {
        self.surfaces
            .get(mount)
            .cloned()
            .ok_or_else(|| ViewError::MountNotFound {
                mount: mount.to_owned(),
            })
    }

    pub fn mounts(&self) -> impl Iterator<Item = &str> {
        self.surfaces.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for SurfaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceRegistry")
            .field("mounts", &self.surfaces.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        renders: usize,
    }

    impl Surface for Probe {
        fn render(&mut self, _: &Scene, _: &OverlayFrame, _: Transform) {
            self.renders += 1;
        }
        fn clear(&mut self) {}
    }

    #[test]
    fn acquire_finds_registered_mounts() {
        let mut registry = SurfaceRegistry::new();
        registry.register("graph", Probe::default());
        let surface = registry.acquire("graph").unwrap();
        surface
            .borrow_mut()
            .render(&Scene::default(), &OverlayFrame::default(), Transform::default());
    }

    #[test]
    fn missing_mount_is_an_error() {
        let registry = SurfaceRegistry::new();
        let Err(err) = registry.acquire("nope") else {
            panic!("acquire should fail on an unknown mount");
        };
        assert!(matches!(err, ViewError::MountNotFound { mount } if mount == "nope"));
    }

    #[test]
    fn registering_twice_replaces() {
        let mut registry = SurfaceRegistry::new();
        registry.register("graph", Probe::default());
        registry.register("graph", Probe::default());
        assert_eq!(registry.mounts().count(), 1);
    }
}
