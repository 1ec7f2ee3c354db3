//! Graph construction: relation classification, adjacency extraction, and
//! spanning-tree resolution.
//!
//! Raw query rows carry (subject, predicate, object) strings. The builder
//! classifies each predicate into one of three relation classes and
//! accumulates insertion-ordered adjacency maps; the spanning-tree resolver
//! then picks one primary parent per node so a strict tree can drive layout,
//! keeping every other parent edge as a display-only extra edge.

pub mod build;
pub mod kind;
pub mod spanning;

pub use build::{CaseGraph, build_graph};
pub use kind::{NodeKind, classify, shorten};
pub use spanning::{SpanningTree, resolve_spanning_tree};

/// How a row's predicate relates two nodes structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationClass {
    /// Parent-child ("supported by"): drives tree and lane layout.
    Hierarchy,
    /// Contextual attachment ("in context of"): lateral satellite.
    Context,
    /// Rebuttal ("challenges"): opposite-side lateral satellite.
    Challenge,
    /// Anything else: structurally ignored (may still carry type info).
    Other,
}

/// Recognized predicate spellings for each relation class.
///
/// Ontology prefixes vary by deployment, so these lists are configuration,
/// not constants; callers may replace or extend them. Matching is exact
/// (case-sensitive) after trimming.
#[derive(Debug, Clone)]
pub struct RelationAliases {
    pub hierarchy: Vec<String>,
    pub context: Vec<String>,
    pub challenge: Vec<String>,
}

impl Default for RelationAliases {
    fn default() -> Self {
        let strs = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
        Self {
            hierarchy: strs(&[
                "supported by",
                "gsn:supportedBy",
                "https://w3id.org/OntoGSN/ontology#supportedBy",
                "http://w3id.org/gsn#supportedBy",
            ]),
            context: strs(&[
                "in context of",
                "gsn:inContextOf",
                "https://w3id.org/OntoGSN/ontology#inContextOf",
                "http://w3id.org/gsn#inContextOf",
            ]),
            challenge: strs(&[
                "challenges",
                "gsn:challenges",
                "https://w3id.org/OntoGSN/ontology#challenges",
                "http://w3id.org/gsn#challenges",
            ]),
        }
    }
}

impl RelationAliases {
    /// Classify a predicate string (trimmed, exact match).
    pub fn classify(&self, predicate: &str) -> RelationClass {
        let p = predicate.trim();
        if self.hierarchy.iter().any(|a| a == p) {
            RelationClass::Hierarchy
        } else if self.context.iter().any(|a| a == p) {
            RelationClass::Context
        } else if self.challenge.iter().any(|a| a == p) {
            RelationClass::Challenge
        } else {
            RelationClass::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_aliases_cover_all_spellings() {
        let aliases = RelationAliases::default();
        assert_eq!(aliases.classify("supported by"), RelationClass::Hierarchy);
        assert_eq!(
            aliases.classify(" https://w3id.org/OntoGSN/ontology#supportedBy "),
            RelationClass::Hierarchy
        );
        assert_eq!(aliases.classify("gsn:inContextOf"), RelationClass::Context);
        assert_eq!(
            aliases.classify("http://w3id.org/gsn#challenges"),
            RelationClass::Challenge
        );
        assert_eq!(aliases.classify("rdf:type"), RelationClass::Other);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let aliases = RelationAliases::default();
        assert_eq!(aliases.classify("Supported By"), RelationClass::Other);
    }

    #[test]
    fn custom_aliases_replace_defaults() {
        let aliases = RelationAliases {
            hierarchy: vec!["erfüllt durch".into()],
            ..Default::default()
        };
        assert_eq!(aliases.classify("erfüllt durch"), RelationClass::Hierarchy);
        assert_eq!(aliases.classify("supported by"), RelationClass::Other);
    }
}
