//! The renderable scene: positioned, typed nodes and edges.
//!
//! A layout strategy consumes a case graph and produces exactly one `Scene`.
//! The scene is pure data with no rendering-surface coupling; renderers (the
//! SVG adapter, tests, exports) consume it read-only. Positions are never
//! persisted across layout passes.

use indexmap::IndexMap;
use serde::Serialize;

use crate::graph::NodeKind;

/// A point in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Grow to include a point.
    fn include(&mut self, p: Point) {
        let x1 = self.x.min(p.x);
        let y1 = self.y.min(p.y);
        let x2 = (self.x + self.width).max(p.x);
        let y2 = (self.y + self.height).max(p.y);
        *self = Rect {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        };
    }

    fn around(p: Point) -> Self {
        Rect {
            x: p.x,
            y: p.y,
            width: 0.0,
            height: 0.0,
        }
    }
}

/// A primary (hierarchy) node with its computed box.
#[derive(Debug, Clone, Serialize)]
pub struct SceneNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A lateral satellite (context or defeater) attached to a primary node.
#[derive(Debug, Clone, Serialize)]
pub struct SatelliteNode {
    pub id: String,
    pub label: String,
    /// The primary node this satellite attaches to.
    pub host: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// What an edge means, deciding its style and arrowhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    /// Primary hierarchy edge (drove the layout).
    Tree,
    /// Non-primary hierarchy edge (rendered only).
    Extra,
    /// Context attachment.
    Context,
    /// Challenge/defeat edge.
    Defeat,
    /// Collection spoke.
    Collection,
}

/// An edge with endpoints already adjusted to box boundaries.
#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub source: Point,
    pub target: Point,
    pub kind: LinkKind,
}

/// A swim-lane background band.
#[derive(Debug, Clone, Serialize)]
pub struct LaneBand {
    pub index: usize,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A collection hub dot.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionHub {
    pub context: String,
    pub collection: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// A collection item box on a ring around its hub.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionItem {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The radial collection overlay. Rebuilt wholesale on every
/// `add_collections` call; cleared by `clear_collections`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionOverlay {
    pub hubs: Vec<CollectionHub>,
    pub items: Vec<CollectionItem>,
    pub spokes: Vec<Link>,
}

impl CollectionOverlay {
    pub fn is_empty(&self) -> bool {
        self.hubs.is_empty() && self.items.is_empty() && self.spokes.is_empty()
    }
}

/// One rendered graph: everything a renderer needs, nothing it doesn't.
#[derive(Debug, Default, Serialize)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub context_nodes: Vec<SatelliteNode>,
    pub defeater_nodes: Vec<SatelliteNode>,
    pub tree_links: Vec<Link>,
    pub extra_links: Vec<Link>,
    pub context_links: Vec<Link>,
    pub defeater_links: Vec<Link>,
    pub lanes: Vec<LaneBand>,
    pub collections: CollectionOverlay,
    /// Anchor positions for collection overlays: primary nodes and context
    /// satellites (a collection may hang off either).
    pub positions: IndexMap<String, Point>,
}

impl Scene {
    /// Anchor position for an id, if it is on canvas.
    pub fn position_of(&self, id: &str) -> Option<Point> {
        self.positions.get(id.trim()).copied()
    }

    /// Whether an id names a rendered element (primary node or satellite).
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
            || self.context_nodes.iter().any(|n| n.id == id)
            || self.defeater_nodes.iter().any(|n| n.id == id)
    }

    /// Bounding box of all rendered geometry. `None` when nothing is drawn.
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut bbox: Option<Rect> = None;
        let mut push = |p: Point| match &mut bbox {
            Some(r) => r.include(p),
            None => bbox = Some(Rect::around(p)),
        };

        let boxes = self
            .nodes
            .iter()
            .map(|n| (n.x, n.y, n.width, n.height))
            .chain(
                self.context_nodes
                    .iter()
                    .chain(self.defeater_nodes.iter())
                    .map(|n| (n.x, n.y, n.width, n.height)),
            )
            .chain(
                self.collections
                    .items
                    .iter()
                    .map(|i| (i.x, i.y, i.width, i.height)),
            );
        for (x, y, w, h) in boxes {
            push(Point::new(x - w / 2.0, y - h / 2.0));
            push(Point::new(x + w / 2.0, y + h / 2.0));
        }
        for lane in &self.lanes {
            push(Point::new(lane.x, lane.y));
            push(Point::new(lane.x + lane.width, lane.y + lane.height));
        }
        for hub in &self.collections.hubs {
            push(Point::new(hub.x - hub.radius, hub.y - hub.radius));
            push(Point::new(hub.x + hub.radius, hub.y + hub.radius));
        }
        for link in self
            .tree_links
            .iter()
            .chain(&self.extra_links)
            .chain(&self.context_links)
            .chain(&self.defeater_links)
            .chain(&self.collections.spokes)
        {
            push(link.source);
            push(link.target);
        }
        bbox
    }
}
