//! Row normalization: RDF terms to plain string-keyed records.
//!
//! Query results arrive as variable bindings over RDF terms. Downstream code
//! (graph construction, overlays, collections) only ever deals in display
//! strings, so every term is encoded exactly once, here: IRIs verbatim, blank
//! nodes with a `_:` prefix, literals with language/datatype suffixes.

use indexmap::IndexMap;
use oxigraph::model::Term;
use oxigraph::sparql::QuerySolution;

/// A normalized result row: variable name to display string.
pub type Row = IndexMap<String, String>;

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Encode a single RDF term as its display string.
///
/// IRIs render verbatim, blank nodes as `_:id`, literals as the bare value
/// unless they carry a language tag (`"v"@lang`) or a non-string datatype
/// (`"v"^^datatypeIri`). Total over well-formed terms.
pub fn term_display(term: &Term) -> String {
    match term {
        Term::NamedNode(n) => n.as_str().to_owned(),
        Term::BlankNode(b) => format!("_:{}", b.as_str()),
        Term::Literal(l) => {
            if let Some(lang) = l.language() {
                format!("\"{}\"@{lang}", l.value())
            } else if l.datatype().as_str() != XSD_STRING {
                format!("\"{}\"^^{}", l.value(), l.datatype().as_str())
            } else {
                l.value().to_owned()
            }
        }
        other => other.to_string(),
    }
}

/// Convert one query solution into a [`Row`].
pub fn solution_to_row(solution: &QuerySolution) -> Row {
    let mut row = Row::new();
    for (var, term) in solution.iter() {
        row.insert(var.as_str().to_owned(), term_display(term));
    }
    row
}

/// Fetch a trimmed field from a row, treating empty strings as absent.
pub fn field<'a>(row: &'a Row, key: &str) -> Option<&'a str> {
    row.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}
