//! The SPARQL triple-store collaborator, backed by oxigraph.
//!
//! Loads Turtle ontologies and executes SPARQL queries/updates. The graph and
//! layout layers never touch this module; they consume the normalized rows it
//! produces.

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::StoreError;
use crate::rows::{Row, solution_to_row};

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// An in-memory SPARQL-capable RDF store holding the assurance case.
pub struct CaseStore {
    store: Store,
}

impl CaseStore {
    /// Create a new empty in-memory store.
    pub fn in_memory() -> StoreResult<Self> {
        let store = Store::new().map_err(|e| StoreError::Sparql {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self { store })
    }

    /// Load a Turtle document into the default graph.
    ///
    /// `base_iri` resolves relative IRIs; ontology files that declare absolute
    /// prefixes load fine without one.
    pub fn load_turtle(&self, data: &str, base_iri: Option<&str>) -> StoreResult<()> {
        let mut parser = RdfParser::from_format(RdfFormat::Turtle);
        if let Some(base) = base_iri {
            parser = parser.with_base_iri(base).map_err(|e| StoreError::Turtle {
                message: format!("invalid base IRI {base}: {e}"),
            })?;
        }
        let mut loaded = 0usize;
        for quad in parser.for_reader(data.as_bytes()) {
            let quad = quad.map_err(|e| StoreError::Turtle {
                message: e.to_string(),
            })?;
            self.store.insert(&quad).map_err(|e| StoreError::Sparql {
                message: format!("insert failed: {e}"),
            })?;
            loaded += 1;
        }
        tracing::debug!(triples = loaded, "loaded turtle document");
        Ok(())
    }

    /// Execute a SPARQL SELECT (or ASK) query, returning normalized rows.
    ///
    /// ASK results are folded into a single `{result: true|false}` row so the
    /// session's shape dispatch can treat every query uniformly.
    pub fn select(&self, sparql: &str) -> StoreResult<Vec<Row>> {
        let results = self.store.query(sparql).map_err(|e| StoreError::Sparql {
            message: format!("SPARQL query failed: {e}"),
        })?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| StoreError::Sparql {
                        message: format!("solution error: {e}"),
                    })?;
                    rows.push(solution_to_row(&solution));
                }
                Ok(rows)
            }
            QueryResults::Boolean(b) => {
                let mut row = Row::new();
                row.insert("result".to_owned(), b.to_string());
                Ok(vec![row])
            }
            QueryResults::Graph(_) => Err(StoreError::UnexpectedShape {
                message: "CONSTRUCT/DESCRIBE queries not supported via select".into(),
            }),
        }
    }

    /// Execute a SPARQL UPDATE (INSERT/DELETE/...).
    pub fn update(&self, sparql: &str) -> StoreResult<()> {
        self.store.update(sparql).map_err(|e| StoreError::Update {
            message: format!("SPARQL update failed: {e}"),
        })
    }

    /// Number of triples currently in the store.
    pub fn len(&self) -> usize {
        self.store.len().unwrap_or(0)
    }

    /// Whether the store holds no triples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for CaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseStore").field("len", &self.len()).finish()
    }
}

/// The first significant SPARQL keyword, skipping comments and PREFIX/BASE.
fn first_keyword(query: &str) -> Option<String> {
    for line in query.lines() {
        let t = line.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        let word = t.split_whitespace().next()?.to_ascii_uppercase();
        if word == "PREFIX" || word == "BASE" {
            continue;
        }
        return Some(word);
    }
    None
}

/// Whether the query text is a SPARQL UPDATE rather than a read query.
pub fn is_update_query(query: &str) -> bool {
    matches!(
        first_keyword(query).as_deref(),
        Some("INSERT" | "DELETE" | "LOAD" | "CREATE" | "DROP" | "CLEAR" | "COPY" | "MOVE" | "ADD")
    )
}
