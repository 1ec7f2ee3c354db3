//! Swim-lane layout: nodes bucketed into vertical lanes by hierarchy depth.
//!
//! Depth comes from a BFS over hierarchy edges starting at the roots; the
//! first assignment wins, so a node reachable at several depths lands in the
//! shallowest lane. Callers can override bucketing per node or force a fixed
//! lane count.

use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::graph::{CaseGraph, SpanningTree, kind};
use crate::layout::{NODE_HEIGHT, label_width};
use crate::scene::{LaneBand, Link, LinkKind, Point, Scene, SceneNode};

const PAD_TOP: f64 = 28.0;
const PAD_RIGHT: f64 = 40.0;
const PAD_BOTTOM: f64 = 28.0;
const PAD_LEFT: f64 = 40.0;
const MIN_LANE_WIDTH: f64 = 160.0;
const MIN_LANE_HEIGHT: f64 = 60.0;

/// Options for the swim-lane strategy.
pub struct LaneOptions<'a> {
    /// Canvas width and height the lanes are fitted into.
    pub width: f64,
    pub height: f64,
    /// Override a node's lane: `(id, bfs_depth) -> lane index`. The result is
    /// clamped to the final lane range.
    pub assign_layer: Option<&'a dyn Fn(&str, usize) -> usize>,
    /// Force exactly this many lanes, truncating or padding the depth
    /// buckets.
    pub lane_count: Option<usize>,
    /// Custom lane captions; lanes beyond the slice fall back to `Layer N`.
    pub lane_labels: &'a [String],
    /// When false, lanes that hold no nodes and have no custom caption are
    /// dropped before geometry is computed.
    pub allow_empty_lanes: bool,
}

impl Default for LaneOptions<'_> {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 520.0,
            assign_layer: None,
            lane_count: None,
            lane_labels: &[],
            allow_empty_lanes: true,
        }
    }
}

/// BFS depth per node, roots at depth 0, first assignment wins.
fn bfs_depths(graph: &CaseGraph, tree: &SpanningTree) -> IndexMap<String, usize> {
    let mut depth: IndexMap<String, usize> = IndexMap::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    for root in &tree.roots {
        if !depth.contains_key(root) {
            depth.insert(root.clone(), 0);
            queue.push_back(root.clone());
        }
    }
    while let Some(id) = queue.pop_front() {
        let d = depth[&id];
        if let Some(kids) = graph.children.get(&id) {
            for child in kids {
                if !depth.contains_key(child) {
                    depth.insert(child.clone(), d + 1);
                    queue.push_back(child.clone());
                }
            }
        }
    }
    depth
}

/// Build a swim-lane scene from a resolved graph.
pub fn layout_lanes(
    graph: &CaseGraph,
    tree: &SpanningTree,
    label: &dyn Fn(&str) -> String,
    opts: &LaneOptions<'_>,
) -> Scene {
    let depths = bfs_depths(graph, tree);
    let natural_lanes = depths.values().map(|d| d + 1).max().unwrap_or(0);
    let lane_total = opts.lane_count.unwrap_or(natural_lanes);

    // Bucket nodes, honoring the per-node override. Out-of-range lanes clamp
    // to the last lane rather than vanishing.
    let mut buckets: Vec<Vec<String>> = vec![Vec::new(); lane_total];
    if lane_total > 0 {
        for (id, bfs_depth) in &depths {
            let lane = match opts.assign_layer {
                Some(assign) => assign(id, *bfs_depth),
                None => *bfs_depth,
            };
            buckets[lane.min(lane_total - 1)].push(id.clone());
        }
    }

    let caption = |i: usize| -> Option<&str> {
        opts.lane_labels.get(i).map(String::as_str).filter(|s| !s.is_empty())
    };

    // Empty unlabeled lanes are dropped before any geometry exists, so the
    // surviving lanes share the freed width.
    let kept: Vec<usize> = (0..lane_total)
        .filter(|&i| opts.allow_empty_lanes || !buckets[i].is_empty() || caption(i).is_some())
        .collect();

    let mut scene = Scene::default();
    if kept.is_empty() {
        return scene;
    }

    let lane_w = MIN_LANE_WIDTH.max((opts.width - PAD_LEFT - PAD_RIGHT) / kept.len() as f64);
    let lane_h = MIN_LANE_HEIGHT.max(opts.height - PAD_TOP - PAD_BOTTOM);

    for (slot, &lane) in kept.iter().enumerate() {
        let x = PAD_LEFT + slot as f64 * lane_w;
        scene.lanes.push(LaneBand {
            index: lane,
            label: caption(lane)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("Layer {}", lane + 1)),
            x,
            y: PAD_TOP,
            width: lane_w,
            height: lane_h,
        });
        let count = buckets[lane].len();
        for (idx, id) in buckets[lane].iter().enumerate() {
            let text = label(id);
            let node_kind =
                kind::classify(graph.node_types.get(id).map(String::as_str), id);
            let point = Point::new(
                x + lane_w / 2.0,
                PAD_TOP + (idx as f64 + 1.0) * lane_h / (count as f64 + 1.0),
            );
            scene.positions.insert(id.clone(), point);
            scene.nodes.push(SceneNode {
                id: id.clone(),
                label: text.clone(),
                kind: node_kind,
                x: point.x,
                y: point.y,
                width: label_width(&text),
                height: NODE_HEIGHT,
            });
        }
    }

    // Every hierarchy edge between two positioned nodes is drawn; lanes do
    // not restrict adjacency.
    let half = NODE_HEIGHT / 2.0;
    for (parent, kids) in &graph.children {
        let Some(p) = scene.positions.get(parent).copied() else {
            continue;
        };
        for child in kids {
            let Some(c) = scene.positions.get(child).copied() else {
                continue;
            };
            scene.tree_links.push(Link {
                source: Point::new(p.x, p.y + half),
                target: Point::new(c.x, c.y - half),
                kind: LinkKind::Tree,
            });
        }
    }

    tracing::debug!(
        lanes = scene.lanes.len(),
        nodes = scene.nodes.len(),
        "lane layout complete"
    );
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{RelationAliases, build_graph, resolve_spanning_tree};
    use crate::rows::Row;

    fn spo(s: &str, p: &str, o: &str) -> Row {
        let mut row = Row::new();
        row.insert("s".into(), s.into());
        row.insert("p".into(), p.into());
        row.insert("o".into(), o.into());
        row
    }

    fn chain() -> Vec<Row> {
        vec![
            spo("G1", "supported by", "S1"),
            spo("S1", "supported by", "G2"),
        ]
    }

    fn scene_for(rows: &[Row], opts: &LaneOptions<'_>) -> Scene {
        let graph = build_graph(rows, &RelationAliases::default());
        let tree = resolve_spanning_tree(&graph);
        layout_lanes(&graph, &tree, &|id| id.to_owned(), opts)
    }

    #[test]
    fn depth_buckets_become_lanes() {
        let scene = scene_for(&chain(), &LaneOptions::default());
        assert_eq!(scene.lanes.len(), 3);
        let g1 = scene.position_of("G1").unwrap();
        let s1 = scene.position_of("S1").unwrap();
        let g2 = scene.position_of("G2").unwrap();
        assert!(g1.x < s1.x && s1.x < g2.x);
        // One node per lane centers vertically in the band.
        assert_eq!(g1.y, 28.0 + (520.0 - 56.0) / 2.0);
    }

    #[test]
    fn shallowest_depth_wins() {
        let rows = vec![
            spo("G1", "supported by", "S1"),
            spo("G1", "supported by", "G2"),
            spo("S1", "supported by", "G2"),
        ];
        let scene = scene_for(&rows, &LaneOptions::default());
        let s1 = scene.position_of("S1").unwrap();
        let g2 = scene.position_of("G2").unwrap();
        assert_eq!(g2.x, s1.x);
    }

    #[test]
    fn assign_layer_overrides_and_clamps() {
        let assign = |id: &str, depth: usize| if id == "G2" { 99 } else { depth };
        let opts = LaneOptions {
            assign_layer: Some(&assign),
            ..LaneOptions::default()
        };
        let scene = scene_for(&chain(), &opts);
        // G2 lands in the last lane even though 99 is out of range.
        let g2 = scene.position_of("G2").unwrap();
        let last = scene.lanes.last().unwrap();
        assert_eq!(g2.x, last.x + last.width / 2.0);
    }

    #[test]
    fn forced_lane_count_pads_with_empty_lanes() {
        let opts = LaneOptions {
            lane_count: Some(5),
            ..LaneOptions::default()
        };
        let scene = scene_for(&chain(), &opts);
        assert_eq!(scene.lanes.len(), 5);
    }

    #[test]
    fn empty_unlabeled_lanes_can_be_dropped() {
        let labels = vec![String::new(), String::new(), String::new(), "Review".into()];
        let opts = LaneOptions {
            lane_count: Some(5),
            lane_labels: &labels,
            allow_empty_lanes: false,
            ..LaneOptions::default()
        };
        let scene = scene_for(&chain(), &opts);
        // Three populated lanes survive plus the captioned empty one.
        assert_eq!(scene.lanes.len(), 4);
        assert_eq!(scene.lanes.last().unwrap().label, "Review");
        assert_eq!(scene.lanes.last().unwrap().index, 3);
    }

    #[test]
    fn custom_captions_replace_defaults() {
        let labels = vec!["Claims".to_owned()];
        let opts = LaneOptions {
            lane_labels: &labels,
            ..LaneOptions::default()
        };
        let scene = scene_for(&chain(), &opts);
        assert_eq!(scene.lanes[0].label, "Claims");
        // default captions are 1-based
        assert_eq!(scene.lanes[1].label, "Layer 2");
        assert_eq!(scene.lanes[2].label, "Layer 3");
    }

    #[test]
    fn lane_width_respects_minimum() {
        let opts = LaneOptions {
            width: 300.0,
            ..LaneOptions::default()
        };
        let scene = scene_for(&chain(), &opts);
        for lane in &scene.lanes {
            assert_eq!(lane.width, 160.0);
        }
    }

    #[test]
    fn all_hierarchy_edges_are_drawn() {
        let rows = vec![
            spo("G1", "supported by", "S1"),
            spo("S1", "supported by", "G2"),
            spo("G1", "supported by", "G2"),
        ];
        let scene = scene_for(&rows, &LaneOptions::default());
        assert_eq!(scene.tree_links.len(), 3);
    }
}
