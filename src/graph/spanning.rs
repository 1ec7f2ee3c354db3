//! Spanning-tree resolution under multi-parent ambiguity.
//!
//! Tree layout needs a strict forest, but hierarchy data may give a node
//! several parents (and may even contain cycles). One primary parent is
//! chosen per node; the walk from the roots marks visited nodes so cyclic
//! input terminates, and every non-primary edge is preserved for display.

use indexmap::{IndexMap, IndexSet};

use super::CaseGraph;

/// The layout forest derived from a [`CaseGraph`].
#[derive(Debug, Default)]
pub struct SpanningTree {
    /// Nodes never seen as the object of a hierarchy row, in encounter order.
    /// Never empty when hierarchy rows exist: fully cyclic input falls back
    /// to the first hierarchy row's subject.
    pub roots: Vec<String>,
    /// The single parent chosen per child: the first parent encountered in
    /// row order.
    pub primary_parent: IndexMap<String, String>,
    /// Parent to children reachable through primary edges only. Acyclic by
    /// construction.
    pub layout_children: IndexMap<String, IndexSet<String>>,
    /// Every `(parent, child)` hierarchy edge that is not the child's primary
    /// edge: rendered, never position-driving.
    pub extra_edges: Vec<(String, String)>,
}

/// Resolve the layout forest for a case graph.
pub fn resolve_spanning_tree(graph: &CaseGraph) -> SpanningTree {
    let mut roots: Vec<String> = graph
        .nodes
        .iter()
        .filter(|n| !graph.parents.contains_key(*n))
        .cloned()
        .collect();
    if roots.is_empty() {
        if let Some(first) = &graph.first_hierarchy_subject {
            roots.push(first.clone());
        }
    }

    let mut primary_parent: IndexMap<String, String> = IndexMap::new();
    for (child, parents) in &graph.parents {
        if let Some(parent) = parents.first() {
            primary_parent.insert(child.clone(), parent.clone());
        }
    }

    // Depth-first walk from each root; the visited set terminates cycles,
    // whose back edges simply never enter layout_children.
    let mut layout_children: IndexMap<String, IndexSet<String>> = IndexMap::new();
    let mut dropped_cycle_edges: Vec<(String, String)> = Vec::new();
    let mut visited: IndexSet<&str> = IndexSet::new();
    let mut stack: Vec<&str> = roots.iter().rev().map(String::as_str).collect();
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(kids) = graph.children.get(id) else {
            continue;
        };
        let is_primary =
            |child: &String| primary_parent.get(child).map(String::as_str) == Some(id);
        for child in kids.iter().filter(|c| is_primary(*c)) {
            // A visited child here is an ancestor: this primary edge closes a
            // cycle and must not enter the forest. Keep it as an extra edge.
            if visited.contains(child.as_str()) {
                dropped_cycle_edges.push((id.to_owned(), child.clone()));
                continue;
            }
            layout_children
                .entry(id.to_owned())
                .or_default()
                .insert(child.clone());
        }
        // reversed pushes keep the walk in row order
        for child in kids.iter().rev().filter(|c| is_primary(*c)) {
            stack.push(child);
        }
    }

    let mut extra_edges = dropped_cycle_edges;
    for (child, parents) in &graph.parents {
        for parent in parents {
            if primary_parent.get(child).map(String::as_str) != Some(parent.as_str()) {
                extra_edges.push((parent.clone(), child.clone()));
            }
        }
    }

    SpanningTree {
        roots,
        primary_parent,
        layout_children,
        extra_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationAliases;
    use crate::graph::build::{build_graph, spo};

    const SUP: &str = "supported by";

    fn resolve(rows: Vec<crate::rows::Row>) -> (CaseGraph, SpanningTree) {
        let g = build_graph(&rows, &RelationAliases::default());
        let t = resolve_spanning_tree(&g);
        (g, t)
    }

    #[test]
    fn chain_yields_single_root_and_strict_tree() {
        let (_, t) = resolve(vec![spo("G1", SUP, "S1"), spo("S1", SUP, "Sn1")]);
        assert_eq!(t.roots, ["G1"]);
        assert_eq!(t.primary_parent["S1"], "G1");
        assert_eq!(t.primary_parent["Sn1"], "S1");
        assert!(t.layout_children["G1"].contains("S1"));
        assert!(t.layout_children["S1"].contains("Sn1"));
        assert!(t.extra_edges.is_empty());
    }

    #[test]
    fn first_parent_in_row_order_is_primary() {
        let (_, t) = resolve(vec![
            spo("G1", SUP, "S1"),
            spo("S1", SUP, "Sn1"),
            spo("G1", SUP, "Sn1"),
        ]);
        assert_eq!(t.primary_parent["Sn1"], "S1");
        assert_eq!(t.extra_edges, vec![("G1".to_owned(), "Sn1".to_owned())]);
        // the extra edge does not appear in the layout forest
        assert!(!t.layout_children["G1"].contains("Sn1"));
    }

    #[test]
    fn children_keep_row_order() {
        let (_, t) = resolve(vec![
            spo("G1", SUP, "S2"),
            spo("G1", SUP, "S1"),
            spo("G1", SUP, "S3"),
        ]);
        let kids: Vec<_> = t.layout_children["G1"].iter().collect();
        assert_eq!(kids, ["S2", "S1", "S3"]);
    }

    #[test]
    fn multiple_roots_form_a_forest() {
        let (_, t) = resolve(vec![spo("G1", SUP, "S1"), spo("G2", SUP, "S2")]);
        assert_eq!(t.roots, ["G1", "G2"]);
        assert!(t.layout_children["G1"].contains("S1"));
        assert!(t.layout_children["G2"].contains("S2"));
    }

    #[test]
    fn cyclic_input_gets_fallback_root_and_terminates() {
        let (_, t) = resolve(vec![
            spo("A", SUP, "B"),
            spo("B", SUP, "C"),
            spo("C", SUP, "A"),
        ]);
        // every node has a parent, so the first hierarchy subject stands in
        assert_eq!(t.roots, ["A"]);
        // the forest is acyclic: A's primary parent is C, so the cycle edge
        // C->A never enters layout_children
        assert!(t.layout_children["A"].contains("B"));
        assert!(t.layout_children["B"].contains("C"));
        assert!(!t.layout_children.contains_key("C"));
        // the dropped cycle edge survives as an extra (display-only) edge
        assert_eq!(t.extra_edges, vec![("C".to_owned(), "A".to_owned())]);
    }

    #[test]
    fn layout_forest_is_acyclic_for_any_input() {
        let (_, t) = resolve(vec![
            spo("A", SUP, "B"),
            spo("B", SUP, "A"),
            spo("A", SUP, "C"),
        ]);
        // walk the forest counting steps; termination within the node budget
        // proves acyclicity
        let mut steps = 0usize;
        let mut stack: Vec<&str> = t.roots.iter().map(String::as_str).collect();
        while let Some(id) = stack.pop() {
            steps += 1;
            assert!(steps <= 8, "layout forest contains a cycle");
            if let Some(kids) = t.layout_children.get(id) {
                stack.extend(kids.iter().map(String::as_str));
            }
        }
    }

    #[test]
    fn determinism_across_rebuilds() {
        let rows = vec![
            spo("G1", SUP, "S1"),
            spo("G1", SUP, "S2"),
            spo("S1", SUP, "Sn1"),
            spo("S2", SUP, "Sn1"),
        ];
        let (_, a) = resolve(rows.clone());
        let (_, b) = resolve(rows);
        assert_eq!(a.roots, b.roots);
        assert_eq!(a.primary_parent, b.primary_parent);
        assert_eq!(a.extra_edges, b.extra_edges);
    }
}
