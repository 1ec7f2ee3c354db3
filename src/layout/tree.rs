//! Tidy-tree layout over the resolved spanning forest.
//!
//! Classic Reingold-Tilford placement: subtrees are laid out independently,
//! then packed left-to-right by contour comparison, with each parent centered
//! over its children. A synthetic super-root joins multiple roots so a forest
//! lays out as one tree; the super-root itself is never rendered.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::graph::{CaseGraph, SpanningTree, kind};
use crate::layout::{
    CONTEXT_HEIGHT, DEFEATER_HEIGHT, NODE_HEIGHT, defeater_width, label_width,
};
use crate::scene::{Link, LinkKind, Point, SatelliteNode, Scene, SceneNode};

/// Tunable geometry for the tree strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeLayoutConfig {
    /// Minimum horizontal distance between sibling subtree contours.
    pub dx: f64,
    /// Vertical distance between tree levels.
    pub dy: f64,
    /// Horizontal offset from a node to its first context satellite.
    pub ctx_offset_x: f64,
    /// Extra offset per additional context satellite.
    pub ctx_stagger: f64,
    /// Horizontal offset from a node to its first defeater satellite.
    pub def_offset_x: f64,
    /// Extra offset per additional defeater satellite.
    pub def_stagger: f64,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            dx: 200.0,
            dy: 80.0,
            ctx_offset_x: 80.0,
            ctx_stagger: 50.0,
            def_offset_x: 80.0,
            def_stagger: 50.0,
        }
    }
}

/// A laid-out subtree in coordinates relative to its own root.
struct Subtree {
    /// `(id, depth, x)` rows, root first.
    nodes: Vec<(String, usize, f64)>,
    /// Leftmost x per depth.
    left: Vec<f64>,
    /// Rightmost x per depth.
    right: Vec<f64>,
}

impl Subtree {
    fn leaf(id: &str) -> Self {
        Self {
            nodes: vec![(id.to_owned(), 0, 0.0)],
            left: vec![0.0],
            right: vec![0.0],
        }
    }

    fn shift(&mut self, delta: f64) {
        for (_, _, x) in &mut self.nodes {
            *x += delta;
        }
        for x in self.left.iter_mut().chain(self.right.iter_mut()) {
            *x += delta;
        }
    }

    /// Merge a right sibling into this accumulated block, pushed as far left
    /// as contours allow while keeping at least `dx` of clearance.
    fn absorb(&mut self, mut next: Subtree, dx: f64) {
        let mut delta = f64::NEG_INFINITY;
        for depth in 0..self.right.len().min(next.left.len()) {
            delta = delta.max(self.right[depth] - next.left[depth] + dx);
        }
        if delta == f64::NEG_INFINITY {
            delta = 0.0;
        }
        next.shift(delta);
        for depth in 0..next.left.len() {
            if depth < self.left.len() {
                self.left[depth] = self.left[depth].min(next.left[depth]);
                self.right[depth] = self.right[depth].max(next.right[depth]);
            } else {
                self.left.push(next.left[depth]);
                self.right.push(next.right[depth]);
            }
        }
        self.nodes.append(&mut next.nodes);
    }
}

/// Lay out the subtree rooted at `id`. The spanning forest is acyclic, so
/// recursion terminates.
fn layout_subtree(id: &str, tree: &SpanningTree, dx: f64) -> Subtree {
    let kids = match tree.layout_children.get(id) {
        Some(kids) if !kids.is_empty() => kids,
        _ => return Subtree::leaf(id),
    };

    let mut block: Option<Subtree> = None;
    let mut first_child_x = 0.0;
    let mut last_child_x = 0.0;
    for child in kids {
        let sub = layout_subtree(child, tree, dx);
        let acc = match &mut block {
            Some(acc) => {
                acc.absorb(sub, dx);
                acc
            }
            None => block.insert(sub),
        };
        let child_x = acc
            .nodes
            .iter()
            .rev()
            .find(|(n, depth, _)| depth == &0 && n == child)
            .map(|(_, _, x)| *x)
            .unwrap_or(0.0);
        if acc.nodes.iter().filter(|(_, d, _)| *d == 0).count() == 1 {
            first_child_x = child_x;
        }
        last_child_x = child_x;
    }

    let mut block = match block {
        Some(b) => b,
        None => return Subtree::leaf(id),
    };
    let root_x = (first_child_x + last_child_x) / 2.0;
    for row in &mut block.nodes {
        row.1 += 1;
    }
    block.nodes.insert(0, (id.to_owned(), 0, root_x));
    block.left.insert(0, root_x);
    block.right.insert(0, root_x);
    block
}

/// Absolute positions for every node reachable from the spanning forest's
/// roots. Roots sit at depth 1 under a discarded synthetic super-root.
fn positions(tree: &SpanningTree, cfg: &TreeLayoutConfig) -> IndexMap<String, Point> {
    let mut forest: Option<Subtree> = None;
    for root in &tree.roots {
        let sub = layout_subtree(root, tree, cfg.dx);
        match &mut forest {
            Some(acc) => acc.absorb(sub, cfg.dx),
            None => forest = Some(sub),
        }
    }

    let mut out = IndexMap::new();
    if let Some(forest) = forest {
        for (id, depth, x) in forest.nodes {
            out.insert(id, Point::new(x, (depth as f64 + 1.0) * cfg.dy));
        }
    }
    out
}

/// Build a tree scene from a resolved graph.
///
/// `label` maps a node id to its display label; widths are sized to labels.
pub fn layout_tree(
    graph: &CaseGraph,
    tree: &SpanningTree,
    label: &dyn Fn(&str) -> String,
    cfg: &TreeLayoutConfig,
) -> Scene {
    let placed = positions(tree, cfg);
    let mut scene = Scene::default();

    for (id, point) in &placed {
        let text = label(id);
        let node_kind = kind::classify(graph.node_types.get(id).map(String::as_str), id);
        let width = label_width(&text);
        scene.positions.insert(id.clone(), *point);
        scene.nodes.push(SceneNode {
            id: id.clone(),
            label: text,
            kind: node_kind,
            x: point.x,
            y: point.y,
            width,
            height: NODE_HEIGHT,
        });
    }

    // Context satellites fan out to the right, defeaters to the left.
    for (host, ctxs) in &graph.contexts {
        let Some(anchor) = placed.get(host).copied() else {
            continue;
        };
        let host_width = scene
            .nodes
            .iter()
            .find(|n| &n.id == host)
            .map(|n| n.width)
            .unwrap_or(44.0);
        for (i, ctx) in ctxs.iter().enumerate() {
            let text = label(ctx);
            let width = label_width(&text);
            let x = anchor.x + cfg.ctx_offset_x + i as f64 * cfg.ctx_stagger;
            // a primary position for the same id wins as the anchor
            scene.positions.entry(ctx.clone()).or_insert(Point::new(x, anchor.y));
            scene.context_links.push(Link {
                source: Point::new(anchor.x + host_width / 2.0, anchor.y),
                target: Point::new(x - width / 2.0, anchor.y),
                kind: LinkKind::Context,
            });
            scene.context_nodes.push(SatelliteNode {
                id: ctx.clone(),
                label: text,
                host: host.clone(),
                x,
                y: anchor.y,
                width,
                height: CONTEXT_HEIGHT,
            });
        }
    }
    for (host, defeaters) in &graph.defeats {
        let Some(anchor) = placed.get(host).copied() else {
            continue;
        };
        let host_width = scene
            .nodes
            .iter()
            .find(|n| &n.id == host)
            .map(|n| n.width)
            .unwrap_or(44.0);
        for (i, dft) in defeaters.iter().enumerate() {
            let text = label(dft);
            let width = defeater_width(&text);
            let x = anchor.x - cfg.def_offset_x - i as f64 * cfg.def_stagger;
            scene.positions.entry(dft.clone()).or_insert(Point::new(x, anchor.y));
            scene.defeater_links.push(Link {
                source: Point::new(x + width / 2.0, anchor.y),
                target: Point::new(anchor.x - host_width / 2.0, anchor.y),
                kind: LinkKind::Defeat,
            });
            scene.defeater_nodes.push(SatelliteNode {
                id: dft.clone(),
                label: text,
                host: host.clone(),
                x,
                y: anchor.y,
                width,
                height: DEFEATER_HEIGHT,
            });
        }
    }

    let half = NODE_HEIGHT / 2.0;
    for (parent, kids) in &tree.layout_children {
        let Some(p) = placed.get(parent) else { continue };
        for child in kids {
            let Some(c) = placed.get(child) else { continue };
            scene.tree_links.push(Link {
                source: Point::new(p.x, p.y + half),
                target: Point::new(c.x, c.y - half),
                kind: LinkKind::Tree,
            });
        }
    }
    for (parent, child) in &tree.extra_edges {
        let (Some(p), Some(c)) = (placed.get(parent), placed.get(child)) else {
            continue;
        };
        scene.extra_links.push(Link {
            source: Point::new(p.x, p.y + half),
            target: Point::new(c.x, c.y - half),
            kind: LinkKind::Extra,
        });
    }

    tracing::debug!(
        nodes = scene.nodes.len(),
        contexts = scene.context_nodes.len(),
        defeaters = scene.defeater_nodes.len(),
        "tree layout complete"
    );
    scene
}
