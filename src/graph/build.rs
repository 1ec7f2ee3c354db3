//! Single-pass adjacency extraction from normalized query rows.

use indexmap::{IndexMap, IndexSet};

use crate::rows::{Row, field};

use super::{RelationAliases, RelationClass};

/// Adjacency and type maps extracted from one query result.
///
/// All maps and sets preserve insertion (row-encounter) order: the
/// spanning-tree resolver's primary-parent tie-break and the lane layout's
/// bucketing both depend on it.
#[derive(Debug, Default)]
pub struct CaseGraph {
    /// Hierarchy edges, parent to children.
    pub children: IndexMap<String, IndexSet<String>>,
    /// Hierarchy edges, child to parents.
    pub parents: IndexMap<String, IndexSet<String>>,
    /// Context attachments, host to context nodes.
    pub contexts: IndexMap<String, IndexSet<String>>,
    /// Challenge edges keyed by the challenged node: target to challengers.
    pub defeats: IndexMap<String, IndexSet<String>>,
    /// Every node id seen in a hierarchy row (subjects and objects).
    pub nodes: IndexSet<String>,
    /// Explicit ontology type IRIs, last writer wins.
    pub node_types: IndexMap<String, String>,
    /// Subject of the first hierarchy row, the fallback root for fully
    /// cyclic input.
    pub first_hierarchy_subject: Option<String>,
}

impl CaseGraph {
    /// Explicit type IRI recorded for a node, if any.
    pub fn type_of(&self, id: &str) -> Option<&str> {
        self.node_types.get(id).map(String::as_str)
    }
}

fn add(map: &mut IndexMap<String, IndexSet<String>>, key: &str, value: &str) {
    map.entry(key.to_owned())
        .or_default()
        .insert(value.to_owned());
}

/// Build a [`CaseGraph`] from normalized rows.
///
/// Rows missing any of `s`/`p`/`o` are skipped silently; heterogeneous query
/// results routinely mix structural and non-structural rows. Type annotations
/// (`typeS`/`typeO`, legacy `type` for the subject) are recorded even when the
/// row's predicate is structurally unclassified.
pub fn build_graph(rows: &[Row], aliases: &RelationAliases) -> CaseGraph {
    let mut graph = CaseGraph::default();

    for row in rows {
        let (Some(s), Some(p), Some(o)) = (field(row, "s"), field(row, "p"), field(row, "o"))
        else {
            continue;
        };

        if let Some(t) = field(row, "typeS").or_else(|| field(row, "type")) {
            graph.node_types.insert(s.to_owned(), t.to_owned());
        }
        if let Some(t) = field(row, "typeO") {
            graph.node_types.insert(o.to_owned(), t.to_owned());
        }

        match aliases.classify(p) {
            RelationClass::Hierarchy => {
                // Only hierarchy rows define the tree's node set.
                graph.nodes.insert(s.to_owned());
                graph.nodes.insert(o.to_owned());
                add(&mut graph.children, s, o);
                add(&mut graph.parents, o, s);
                if graph.first_hierarchy_subject.is_none() {
                    graph.first_hierarchy_subject = Some(s.to_owned());
                }
            }
            RelationClass::Context => add(&mut graph.contexts, s, o),
            RelationClass::Challenge => add(&mut graph.defeats, o, s),
            RelationClass::Other => {}
        }
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        hierarchy_edges = graph.children.values().map(IndexSet::len).sum::<usize>(),
        contexts = graph.contexts.values().map(IndexSet::len).sum::<usize>(),
        defeats = graph.defeats.values().map(IndexSet::len).sum::<usize>(),
        "built case graph"
    );
    graph
}

#[cfg(test)]
pub(crate) fn spo(s: &str, p: &str, o: &str) -> Row {
    let mut row = Row::new();
    row.insert("s".into(), s.into());
    row.insert("p".into(), p.into());
    row.insert("o".into(), o.into());
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUP: &str = "supported by";
    const CTX: &str = "in context of";
    const CHAL: &str = "challenges";

    #[test]
    fn hierarchy_rows_define_nodes_and_adjacency() {
        let rows = vec![spo("G1", SUP, "S1"), spo("S1", SUP, "Sn1")];
        let g = build_graph(&rows, &RelationAliases::default());

        assert_eq!(g.nodes.iter().collect::<Vec<_>>(), ["G1", "S1", "Sn1"]);
        assert!(g.children["G1"].contains("S1"));
        assert!(g.parents["Sn1"].contains("S1"));
        assert_eq!(g.first_hierarchy_subject.as_deref(), Some("G1"));
    }

    #[test]
    fn context_and_challenge_rows_do_not_add_tree_nodes() {
        let rows = vec![spo("G1", CTX, "C1"), spo("D1", CHAL, "G1")];
        let g = build_graph(&rows, &RelationAliases::default());

        assert!(g.nodes.is_empty());
        assert!(g.contexts["G1"].contains("C1"));
        // defeats is keyed by the challenged node.
        assert!(g.defeats["G1"].contains("D1"));
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let mut partial = Row::new();
        partial.insert("s".into(), "G1".into());
        partial.insert("p".into(), SUP.into());
        let rows = vec![partial, spo("G1", SUP, "S1")];
        let g = build_graph(&rows, &RelationAliases::default());
        assert_eq!(g.nodes.len(), 2);
    }

    #[test]
    fn type_annotations_survive_unclassified_predicates() {
        let mut row = spo("G1", "rdfs:seeAlso", "X1");
        row.insert("typeS".into(), "https://w3id.org/OntoGSN/ontology#Goal".into());
        row.insert("typeO".into(), "https://w3id.org/OntoGSN/ontology#Context".into());
        let g = build_graph(&[row], &RelationAliases::default());

        assert!(g.nodes.is_empty());
        assert_eq!(
            g.type_of("G1"),
            Some("https://w3id.org/OntoGSN/ontology#Goal")
        );
        assert_eq!(
            g.type_of("X1"),
            Some("https://w3id.org/OntoGSN/ontology#Context")
        );
    }

    #[test]
    fn conflicting_types_last_writer_wins() {
        let mut a = spo("G1", SUP, "S1");
        a.insert("typeS".into(), "t#Goal".into());
        let mut b = spo("G1", SUP, "S2");
        b.insert("typeS".into(), "t#Strategy".into());
        let g = build_graph(&[a, b], &RelationAliases::default());
        assert_eq!(g.type_of("G1"), Some("t#Strategy"));
    }

    #[test]
    fn legacy_type_field_applies_to_subject() {
        let mut row = spo("G1", SUP, "S1");
        row.insert("type".into(), "t#Goal".into());
        let g = build_graph(&[row], &RelationAliases::default());
        assert_eq!(g.type_of("G1"), Some("t#Goal"));
    }
}
