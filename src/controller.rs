//! The interaction controller: one built view over one surface.
//!
//! `build_tree`/`build_lanes` resolve the graph, run a layout and paint the
//! surface named in the options. The returned controller owns the scene and
//! the overlay state for its lifetime; `destroy` consumes it and releases the
//! surface and event subscriptions, so no stale handle can repaint.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ScopeResult;
use crate::events::{EventBus, GraphEvent};
use crate::graph::{self, RelationAliases, kind};
use crate::layout::{
    CollectionInput, CollectionOptions, LaneOptions, TreeLayoutConfig, layout_collections,
    layout_lanes, layout_tree,
};
use crate::render::{Surface, SurfaceRegistry};
use crate::rows::Row;
use crate::scene::{CollectionOverlay, Scene};
use crate::overlay::OverlayManager;
use crate::viewport::{Transform, Viewport};

/// A label mapper shared between layouts and overlays.
pub type LabelFn = Rc<dyn Fn(&str) -> String>;

fn default_label() -> LabelFn {
    Rc::new(|id: &str| kind::shorten(id))
}

/// Options for a tree build.
#[derive(Clone)]
pub struct BuildOptions {
    /// Registry mount the view paints to.
    pub mount: String,
    pub width: f64,
    pub height: f64,
    pub aliases: RelationAliases,
    /// Maps node ids to display labels; defaults to IRI shortening.
    pub label: LabelFn,
    pub tree: TreeLayoutConfig,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            mount: "graph".to_owned(),
            width: 960.0,
            height: 520.0,
            aliases: RelationAliases::default(),
            label: default_label(),
            tree: TreeLayoutConfig::default(),
        }
    }
}

/// Options for a swim-lane build.
#[derive(Clone)]
pub struct LaneBuildOptions {
    pub mount: String,
    pub width: f64,
    pub height: f64,
    pub aliases: RelationAliases,
    pub label: LabelFn,
    pub lane_labels: Vec<String>,
    pub lane_count: Option<usize>,
    pub assign_layer: Option<Rc<dyn Fn(&str, usize) -> usize>>,
    pub allow_empty_lanes: bool,
}

impl Default for LaneBuildOptions {
    fn default() -> Self {
        Self {
            mount: "graph".to_owned(),
            width: 960.0,
            height: 520.0,
            aliases: RelationAliases::default(),
            label: default_label(),
            lane_labels: Vec::new(),
            lane_count: None,
            assign_layer: None,
            allow_empty_lanes: true,
        }
    }
}

/// A live view: scene, overlays and camera over one surface.
pub struct Controller {
    scene: Scene,
    overlays: OverlayManager,
    viewport: Viewport,
    label: LabelFn,
    surface: Rc<RefCell<dyn Surface>>,
    bus: Rc<EventBus>,
}

impl Controller {
    /// Build a tidy-tree view from query rows.
    ///
    /// The mount is resolved before any layout work; a missing mount fails
    /// the build and leaves whatever was previously rendered untouched.
    pub fn build_tree(
        rows: &[Row],
        opts: &BuildOptions,
        registry: &SurfaceRegistry,
        bus: Rc<EventBus>,
    ) -> ScopeResult<Self> {
        let surface = registry.acquire(&opts.mount)?;
        let graph = graph::build_graph(rows, &opts.aliases);
        let tree = graph::resolve_spanning_tree(&graph);
        let scene = layout_tree(&graph, &tree, opts.label.as_ref(), &opts.tree);
        tracing::info!(
            mount = %opts.mount,
            nodes = scene.nodes.len(),
            "built tree view"
        );
        let mut ctl = Self {
            scene,
            overlays: OverlayManager::new(),
            viewport: Viewport::new(opts.width, opts.height),
            label: Rc::clone(&opts.label),
            surface,
            bus,
        };
        ctl.fit();
        Ok(ctl)
    }

    /// Build a swim-lane view from query rows.
    pub fn build_lanes(
        rows: &[Row],
        opts: &LaneBuildOptions,
        registry: &SurfaceRegistry,
        bus: Rc<EventBus>,
    ) -> ScopeResult<Self> {
        let surface = registry.acquire(&opts.mount)?;
        let graph = graph::build_graph(rows, &opts.aliases);
        let tree = graph::resolve_spanning_tree(&graph);
        let assign = opts.assign_layer.as_deref();
        let lane_opts = LaneOptions {
            width: opts.width,
            height: opts.height,
            assign_layer: assign,
            lane_count: opts.lane_count,
            lane_labels: &opts.lane_labels,
            allow_empty_lanes: opts.allow_empty_lanes,
        };
        let scene = layout_lanes(&graph, &tree, opts.label.as_ref(), &lane_opts);
        tracing::info!(
            mount = %opts.mount,
            lanes = scene.lanes.len(),
            nodes = scene.nodes.len(),
            "built lane view"
        );
        let mut ctl = Self {
            scene,
            overlays: OverlayManager::new(),
            viewport: Viewport::new(opts.width, opts.height),
            label: Rc::clone(&opts.label),
            surface,
            bus,
        };
        ctl.fit();
        Ok(ctl)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn repaint(&self) {
        let frame = self.overlays.reapply_all(&self.scene);
        self.surface
            .borrow_mut()
            .render(&self.scene, &frame, self.viewport.transform());
    }

    /// Zoom to the scene's bounding box. No-op on degenerate geometry.
    pub fn fit(&mut self) -> Transform {
        let t = self.viewport.fit(&self.scene);
        self.repaint();
        t
    }

    /// Back to the identity view.
    pub fn reset(&mut self) -> Transform {
        let t = self.viewport.reset();
        self.repaint();
        t
    }

    /// Apply a visual class to the given ids. Ids without a rendered element
    /// are ignored; positions and prior highlights in other classes persist.
    pub fn highlight_by_ids<I, S>(&mut self, ids: I, class: &str)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overlays.set_overlay(class, ids.into_iter().map(Into::into));
        self.repaint();
    }

    /// Remove every highlight class and decoration.
    pub fn clear_all(&mut self) {
        self.overlays.clear();
        self.repaint();
    }

    /// Replace the collection overlay with one built from `memberships`.
    /// Groups without an on-canvas anchor are skipped.
    pub fn add_collections(&mut self, memberships: &[CollectionInput], opts: &CollectionOptions) {
        self.scene.collections =
            layout_collections(&self.scene, memberships, self.label.as_ref(), opts);
        self.repaint();
    }

    /// Drop the collection overlay.
    pub fn clear_collections(&mut self) {
        self.scene.collections = CollectionOverlay::default();
        self.repaint();
    }

    /// Deliver a click on the element with this id.
    ///
    /// Context and defeater satellites produce a semantic event, published on
    /// the bus and returned; clicks elsewhere do nothing. The controller does
    /// not interpret the event.
    pub fn click(&self, id: &str) -> Option<GraphEvent> {
        let event = if let Some(ctx) = self.scene.context_nodes.iter().find(|n| n.id == id) {
            GraphEvent::ContextClick {
                id: ctx.id.clone(),
                label: ctx.label.clone(),
            }
        } else if let Some(dft) = self.scene.defeater_nodes.iter().find(|n| n.id == id) {
            GraphEvent::DefeaterClick {
                id: dft.id.clone(),
                label: dft.label.clone(),
            }
        } else {
            return None;
        };
        self.bus.emit(&event);
        Some(event)
    }

    /// Tear the view down: clears the surface. Consuming `self` guarantees
    /// nothing repaints afterwards. Bus subscriptions are left alone; they
    /// belong to whoever made them, and the controller registers none.
    pub fn destroy(self) {
        self.surface.borrow_mut().clear();
    }
}
