//! Rich diagnostic error types for gsn-scope.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text. Structural problems in query
//! results (malformed rows, unknown highlight ids, collection anchors off
//! canvas) are absorbed locally by skip-and-continue and never surface here;
//! only store failures and environment-setup failures propagate.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for gsn-scope.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum ScopeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Session(#[from] SessionError),
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("SPARQL query error: {message}")]
    #[diagnostic(
        code(gsn::store::sparql),
        help(
            "The SPARQL query failed. Check the query syntax and ensure \
             the ontology was loaded before querying."
        )
    )]
    Sparql { message: String },

    #[error("SPARQL update error: {message}")]
    #[diagnostic(
        code(gsn::store::update),
        help("The SPARQL update failed. Check the update syntax (INSERT/DELETE/...).")
    )]
    Update { message: String },

    #[error("Turtle parse error: {message}")]
    #[diagnostic(
        code(gsn::store::turtle),
        help(
            "The ontology file did not parse as Turtle. Check that the file is \
             actual Turtle (a leading '<!' usually means an HTML error page was \
             fetched instead), and that relative IRIs have a base."
        )
    )]
    Turtle { message: String },

    #[error("unexpected result shape: {message}")]
    #[diagnostic(
        code(gsn::store::shape),
        help(
            "CONSTRUCT/DESCRIBE results cannot be consumed as variable bindings. \
             Use a SELECT or ASK query."
        )
    )]
    UnexpectedShape { message: String },
}

// ---------------------------------------------------------------------------
// View errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ViewError {
    #[error("mount target not found: {mount:?}")]
    #[diagnostic(
        code(gsn::view::mount_not_found),
        help(
            "No surface is registered under this name. Register one with \
             `SurfaceRegistry::register` before building a view. The previous \
             rendered state, if any, is left untouched."
        )
    )]
    MountNotFound { mount: String },
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SessionError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    View(#[from] ViewError),

    #[error("no propagation query configured for {event}")]
    #[diagnostic(
        code(gsn::session::no_propagation_query),
        help(
            "Clicking a context or defeater satellite triggers a graph-traversal \
             query, but none was supplied. Set `PropagationQueries` on the session."
        )
    )]
    NoPropagationQuery { event: String },
}

/// Convenience alias for functions returning gsn-scope results.
pub type ScopeResult<T> = std::result::Result<T, ScopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_converts_to_scope_error() {
        let err = StoreError::Sparql {
            message: "bad query".into(),
        };
        let scope: ScopeError = err.into();
        assert!(matches!(scope, ScopeError::Store(StoreError::Sparql { .. })));
    }

    #[test]
    fn view_error_carries_mount_name() {
        let err = ViewError::MountNotFound {
            mount: "#graph".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("#graph"));
    }

    #[test]
    fn session_error_wraps_view_error() {
        let view = ViewError::MountNotFound {
            mount: "right-pane".into(),
        };
        let session: SessionError = view.into();
        assert!(matches!(
            session,
            SessionError::View(ViewError::MountNotFound { .. })
        ));
    }
}
