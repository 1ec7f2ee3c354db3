//! Radial collection overlay.
//!
//! Collections hang off an already-positioned anchor (usually a context
//! satellite): a small hub dot sits south-east of the anchor and the
//! collection's items fan out around the hub on concentric rings. The overlay
//! composes with either full-graph layout and is rebuilt wholesale on every
//! call.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::layout::label_width;
use crate::rows::{Row, field};
use crate::scene::{
    CollectionHub, CollectionItem, CollectionOverlay, Link, LinkKind, Point, Scene,
};

const ITEM_HEIGHT: f64 = 20.0;

/// One `(context, collection, item)` membership row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInput {
    pub context: String,
    pub collection: String,
    pub item: String,
}

impl CollectionInput {
    /// Read a membership from a `?ctx ?clt ?item` query row. Rows missing
    /// any binding yield `None`.
    pub fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            context: field(row, "ctx")?.to_owned(),
            collection: field(row, "clt")?.to_owned(),
            item: field(row, "item")?.to_owned(),
        })
    }
}

/// Tunable geometry for the collection overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionOptions {
    /// Hub distance to the right of the anchor.
    pub dx_hub: f64,
    /// Hub distance below the anchor.
    pub dy_hub: f64,
    /// Vertical spacing between multiple hubs on the same anchor.
    pub dy_stride: f64,
    /// Hub dot radius.
    pub hub_radius: f64,
    /// Hub-to-item spoke length, also the first ring radius.
    pub arm_len: f64,
    /// Items per ring before the next concentric ring opens.
    pub max_per_row: usize,
    /// Distance between concentric rings.
    pub ring_gap: f64,
    /// Angle of the first item on each ring, in radians.
    pub start_angle: f64,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            dx_hub: 90.0,
            dy_hub: 40.0,
            dy_stride: 30.0,
            hub_radius: 5.0,
            arm_len: 50.0,
            max_per_row: 6,
            ring_gap: 16.0,
            start_angle: std::f64::consts::FRAC_PI_2,
        }
    }
}

/// Lay out collection hubs and items against an existing scene.
///
/// Memberships are grouped by `(context, collection)` with items deduplicated
/// in first-seen order. Groups whose anchor has no position are skipped.
pub fn layout_collections(
    scene: &Scene,
    memberships: &[CollectionInput],
    label: &dyn Fn(&str) -> String,
    opts: &CollectionOptions,
) -> CollectionOverlay {
    let mut groups: IndexMap<(String, String), IndexSet<String>> = IndexMap::new();
    for m in memberships {
        groups
            .entry((m.context.clone(), m.collection.clone()))
            .or_default()
            .insert(m.item.clone());
    }

    let mut overlay = CollectionOverlay::default();
    let mut hubs_per_ctx: IndexMap<String, usize> = IndexMap::new();
    let per_ring = opts.max_per_row.max(1);

    for ((ctx, clt), items) in &groups {
        let Some(host) = scene.position_of(ctx) else {
            tracing::debug!(context = %ctx, collection = %clt, "anchor not on canvas, skipping");
            continue;
        };
        let stacked = hubs_per_ctx.entry(ctx.clone()).or_insert(0);
        let hub = Point::new(
            host.x + opts.dx_hub,
            host.y + opts.dy_hub + *stacked as f64 * opts.dy_stride,
        );
        *stacked += 1;

        overlay.spokes.push(Link {
            source: host,
            target: hub,
            kind: LinkKind::Collection,
        });
        overlay.hubs.push(CollectionHub {
            context: ctx.clone(),
            collection: clt.clone(),
            x: hub.x,
            y: hub.y,
            radius: opts.hub_radius,
        });

        for (i, item) in items.iter().enumerate() {
            let ring = i / per_ring;
            let pos = i % per_ring;
            let angle =
                opts.start_angle + (2.0 * std::f64::consts::PI / per_ring as f64) * pos as f64;
            let radius = opts.arm_len + ring as f64 * opts.ring_gap;
            let at = Point::new(
                hub.x + angle.cos() * radius,
                hub.y + angle.sin() * radius,
            );
            overlay.spokes.push(Link {
                source: hub,
                target: at,
                kind: LinkKind::Collection,
            });
            let text = label(item);
            overlay.items.push(CollectionItem {
                id: item.clone(),
                label: text.clone(),
                x: at.x,
                y: at.y,
                width: label_width(&text).clamp(42.0, 180.0),
                height: ITEM_HEIGHT,
            });
        }
    }
    overlay
}
