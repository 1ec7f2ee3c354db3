//! SVG markup surface.
//!
//! Emits a self-contained `<svg>` document per repaint. Element classes
//! mirror the stylesheet contract: `gsn-node <kind>` groups, `gsn-link`
//! paths with a relation class, `gsn-lane` bands, `collection-hub` dots and
//! `undev-diamond` decorations, with overlay class names appended to matched
//! nodes. Styling itself stays in CSS; the surface only emits structure.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use crate::graph::NodeKind;
use crate::overlay::OverlayFrame;
use crate::render::Surface;
use crate::scene::{Link, Scene};
use crate::viewport::Transform;

/// A surface that renders scenes to an SVG string.
///
/// Clones share the output buffer, so an embedder can keep one clone for
/// reading while the registry owns another for painting.
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    painted: Rc<RefCell<String>>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The markup from the most recent repaint. Empty before the first
    /// render and after `clear`.
    pub fn svg(&self) -> String {
        self.painted.borrow().clone()
    }
}

impl Surface for SvgSurface {
    fn render(&mut self, scene: &Scene, overlays: &OverlayFrame, view: Transform) {
        *self.painted.borrow_mut() = paint(scene, overlays, view);
    }

    fn clear(&mut self) {
        self.painted.borrow_mut().clear();
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Overlay classes carried by one element, space-prefixed for direct
/// concatenation into a class attribute.
fn overlay_classes(overlays: &OverlayFrame, id: &str) -> String {
    let mut extra = String::new();
    for (class, ids) in &overlays.classes {
        if ids.iter().any(|i| i == id) {
            extra.push(' ');
            extra.push_str(class);
        }
    }
    extra
}

fn path(out: &mut String, link: &Link, class: &str, arrow: bool) {
    let marker = if arrow {
        r#" marker-end="url(#gsn-arrow)""#
    } else {
        ""
    };
    let _ = writeln!(
        out,
        r#"<path class="gsn-link {class}" d="M{:.1},{:.1} L{:.1},{:.1}"{marker}/>"#,
        link.source.x, link.source.y, link.target.x, link.target.y
    );
}

/// GSN notation shape for a primary node, centered on the origin.
fn node_shape(out: &mut String, kind: NodeKind, width: f64, height: f64) {
    let hw = width / 2.0;
    let hh = height / 2.0;
    match kind {
        NodeKind::Goal => {
            let _ = writeln!(
                out,
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="2"/>"#,
                -hw, -hh, width, height
            );
        }
        NodeKind::Strategy => {
            // parallelogram, top edge shifted right
            let s = hh.min(8.0);
            let _ = writeln!(
                out,
                r#"<polygon points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1} {:.1},{:.1}"/>"#,
                -hw + s, -hh, hw, -hh, hw - s, hh, -hw, hh
            );
        }
        NodeKind::Solution => {
            let _ = writeln!(out, r#"<circle r="{:.1}"/>"#, hw.max(hh));
        }
        NodeKind::Context => {
            let _ = writeln!(
                out,
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="{:.1}"/>"#,
                -hw, -hh, width, height, hh
            );
        }
        NodeKind::Assumption | NodeKind::Justification => {
            let _ = writeln!(out, r#"<ellipse rx="{:.1}" ry="{:.1}"/>"#, hw, hh + 2.0);
            let tag = if kind == NodeKind::Assumption { "A" } else { "J" };
            let _ = writeln!(
                out,
                r#"<text class="gsn-tag" x="{:.1}" y="{:.1}">{tag}</text>"#,
                hw - 2.0,
                hh + 6.0
            );
        }
    }
}

fn paint(scene: &Scene, overlays: &OverlayFrame, view: Transform) -> String {
    let mut out = String::new();
    let _ = writeln!(out, r#"<svg xmlns="http://www.w3.org/2000/svg" class="gsn-svg">"#);
    let _ = writeln!(
        out,
        r#"<defs><marker id="gsn-arrow" viewBox="0 0 10 10" refX="9" refY="5" markerWidth="7" markerHeight="7" orient="auto"><path d="M 0 0 L 10 5 L 0 10 z"/></marker></defs>"#
    );
    let _ = writeln!(
        out,
        r#"<g class="gsn-viewport" transform="translate({:.2},{:.2}) scale({:.3})">"#,
        view.translate_x, view.translate_y, view.scale
    );

    for lane in &scene.lanes {
        let _ = writeln!(
            out,
            r#"<g class="gsn-lane"><rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/><text x="{:.1}" y="{:.1}">{}</text></g>"#,
            lane.x,
            lane.y,
            lane.width,
            lane.height,
            lane.x + lane.width / 2.0,
            lane.y + 16.0,
            escape(&lane.label)
        );
    }

    for link in &scene.tree_links {
        path(&mut out, link, "tree", true);
    }
    for link in &scene.extra_links {
        path(&mut out, link, "extra", true);
    }
    for link in &scene.context_links {
        path(&mut out, link, "ctx", false);
    }
    for link in &scene.defeater_links {
        path(&mut out, link, "def", false);
    }

    for node in &scene.nodes {
        let _ = writeln!(
            out,
            r#"<g class="gsn-node {}{}" transform="translate({:.1},{:.1})">"#,
            node.kind.as_str(),
            overlay_classes(overlays, &node.id),
            node.x,
            node.y,
        );
        node_shape(&mut out, node.kind, node.width, node.height);
        let _ = writeln!(
            out,
            r#"<text text-anchor="middle" dy="0.35em">{}</text></g>"#,
            escape(&node.label)
        );
    }
    for (family, nodes) in [("ctx", &scene.context_nodes), ("def", &scene.defeater_nodes)] {
        for node in nodes {
            let _ = writeln!(
                out,
                r#"<g class="gsn-node {}{}" transform="translate({:.1},{:.1})"><rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="8"/><text text-anchor="middle" dy="0.35em">{}</text></g>"#,
                family,
                overlay_classes(overlays, &node.id),
                node.x,
                node.y,
                -node.width / 2.0,
                -node.height / 2.0,
                node.width,
                node.height,
                escape(&node.label)
            );
        }
    }

    for link in &scene.collections.spokes {
        path(&mut out, link, "collection", false);
    }
    for hub in &scene.collections.hubs {
        let _ = writeln!(
            out,
            r#"<g class="collection-hub" transform="translate({:.1},{:.1})"><circle r="{:.1}" class="collection-dot"/></g>"#,
            hub.x, hub.y, hub.radius
        );
    }
    for item in &scene.collections.items {
        let _ = writeln!(
            out,
            r#"<g class="gsn-node collection item" transform="translate({:.1},{:.1})"><rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="6"/><text text-anchor="middle" dy="0.35em">{}</text></g>"#,
            item.x,
            item.y,
            -item.width / 2.0,
            -item.height / 2.0,
            item.width,
            item.height,
            escape(&item.label)
        );
    }

    for d in &overlays.diamonds {
        let _ = writeln!(
            out,
            r#"<path class="undev-diamond" d="M {:.1} {:.1} L {:.1} {:.1} L {:.1} {:.1} L {:.1} {:.1} Z"/>"#,
            d.x,
            d.y - d.half,
            d.x + d.half,
            d.y,
            d.x,
            d.y + d.half,
            d.x - d.half,
            d.y
        );
    }

    out.push_str("</g>\n</svg>\n");
    out
}
