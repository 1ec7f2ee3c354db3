//! Node-kind classification and IRI shortening.

use serde::{Deserialize, Serialize};

/// The GSN element kind of a node, deciding its rendered shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Goal,
    Strategy,
    Solution,
    Context,
    Assumption,
    Justification,
}

impl NodeKind {
    /// CSS-style class name used by renderers.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Goal => "goal",
            NodeKind::Strategy => "strategy",
            NodeKind::Solution => "solution",
            NodeKind::Context => "context",
            NodeKind::Assumption => "assumption",
            NodeKind::Justification => "justification",
        }
    }
}

fn kind_from_type_iri(type_iri: &str) -> Option<NodeKind> {
    let suffix = |name: &str| {
        type_iri.ends_with(&format!("#{name}")) || type_iri.ends_with(&format!("/{name}"))
    };
    if suffix("Goal") {
        Some(NodeKind::Goal)
    } else if suffix("Strategy") {
        Some(NodeKind::Strategy)
    } else if suffix("Solution") {
        Some(NodeKind::Solution)
    } else if suffix("Context") {
        Some(NodeKind::Context)
    } else if suffix("Assumption") {
        Some(NodeKind::Assumption)
    } else if suffix("Justification") {
        Some(NodeKind::Justification)
    } else {
        None
    }
}

/// Classify a node from its explicit ontology type, falling back to the
/// label-prefix heuristic (`SN` solution, `S` strategy, `C` context,
/// `A` assumption, `J` justification, default goal).
pub fn classify(type_iri: Option<&str>, label: &str) -> NodeKind {
    if let Some(kind) = type_iri.and_then(kind_from_type_iri) {
        return kind;
    }

    let upper: String = label.chars().take(2).collect::<String>().to_uppercase();
    if upper.starts_with("SN") {
        return NodeKind::Solution;
    }
    match upper.chars().next() {
        Some('S') => NodeKind::Strategy,
        Some('C') => NodeKind::Context,
        Some('A') => NodeKind::Assumption,
        Some('J') => NodeKind::Justification,
        _ => NodeKind::Goal,
    }
}

/// Shorten an IRI to its fragment, or its last path segment, for display.
/// Non-IRI strings pass through unchanged unless they contain `#` or `/`.
pub fn shorten(iri_or_label: &str) -> String {
    let s = iri_or_label.trim_end_matches('/');
    if let Some(i) = s.rfind('#') {
        if i + 1 < s.len() {
            return s[i + 1..].to_owned();
        }
    }
    if let Some(i) = s.rfind('/') {
        if i + 1 < s.len() {
            return s[i + 1..].to_owned();
        }
    }
    iri_or_label.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_type_wins_over_prefix() {
        // label says strategy, type says goal
        let kind = classify(Some("https://w3id.org/OntoGSN/ontology#Goal"), "S1");
        assert_eq!(kind, NodeKind::Goal);
    }

    #[test]
    fn type_iri_accepts_slash_and_hash_forms() {
        assert_eq!(
            classify(Some("https://onto.example/Solution"), "G1"),
            NodeKind::Solution
        );
        assert_eq!(
            classify(Some("https://onto.example#Justification"), "G1"),
            NodeKind::Justification
        );
    }

    #[test]
    fn prefix_heuristic_covers_all_kinds() {
        assert_eq!(classify(None, "Sn4"), NodeKind::Solution);
        assert_eq!(classify(None, "S2"), NodeKind::Strategy);
        assert_eq!(classify(None, "C1"), NodeKind::Context);
        assert_eq!(classify(None, "A1"), NodeKind::Assumption);
        assert_eq!(classify(None, "J3"), NodeKind::Justification);
        assert_eq!(classify(None, "G1"), NodeKind::Goal);
        assert_eq!(classify(None, ""), NodeKind::Goal);
    }

    #[test]
    fn prefix_heuristic_is_case_insensitive() {
        assert_eq!(classify(None, "sn1"), NodeKind::Solution);
        assert_eq!(classify(None, "c3"), NodeKind::Context);
    }

    #[test]
    fn unknown_type_iri_falls_back_to_label() {
        assert_eq!(classify(Some("https://x.example#Widget"), "C1"), NodeKind::Context);
    }

    #[test]
    fn shorten_prefers_fragment() {
        assert_eq!(shorten("https://w3id.org/OntoGSN/ontology#G1"), "G1");
        assert_eq!(shorten("https://example.org/case/S1"), "S1");
        assert_eq!(shorten("plain-label"), "plain-label");
    }
}
