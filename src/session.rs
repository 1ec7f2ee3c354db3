//! The exploration session: store, views and overlays behind one handle.
//!
//! A session owns the triple store and the surface registry, runs queries and
//! dispatches on the shape of their result rows: update text executes as an
//! update, `?s ?p ?o` rows rebuild the graph view, bare `?s` rows become a
//! highlight class, and `?ctx ?clt ?item` rows feed the collection overlay.
//! Clicks on satellites trigger configurable propagation queries whose hits
//! are highlighted back onto the view.

use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::controller::{BuildOptions, Controller};
use crate::error::{ScopeResult, SessionError};
use crate::events::{EventBus, GraphEvent};
use crate::layout::{CollectionInput, CollectionOptions};
use crate::render::SurfaceRegistry;
use crate::rows::{Row, field};
use crate::store::{CaseStore, is_update_query};

/// Default class for highlight results that name no class themselves.
pub const DEFAULT_OVERLAY_CLASS: &str = "overlay";
/// Class applied to context-propagation hits.
pub const CONTEXT_PROPAGATION_CLASS: &str = "in-context";
/// Class applied to defeater-propagation hits.
pub const DEFEATER_PROPAGATION_CLASS: &str = "def-prop";

/// SPARQL templates run when a satellite is clicked. The clicked IRI is
/// substituted for `{{CTX_IRI}}` / `{{DFT_IRI}}` before execution.
#[derive(Debug, Clone, Default)]
pub struct PropagationQueries {
    pub context: Option<String>,
    pub defeater: Option<String>,
}

/// What a `run` call did, decided by the result-row shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum RunOutcome {
    /// The text was a SPARQL update and was executed.
    Updated,
    /// `?s ?p ?o` rows: the graph view was rebuilt.
    Rendered { triples: usize },
    /// Bare `?s` rows: a highlight class was set.
    Highlighted { class: String, count: usize },
    /// `?ctx ?clt ?item` rows: the collection overlay was rebuilt.
    CollectionsAdded { count: usize },
    /// The query succeeded but returned nothing.
    NoResults,
    /// The result needs a live view, but none has been built yet.
    NoView,
    /// Rows matched none of the recognized shapes.
    UnsupportedShape,
}

/// Replace `{{placeholder}}` in a query template with an IRI reference.
/// Both the already-wrapped `<{{X}}>` spelling and the bare `{{X}}` one are
/// handled, so templates can use either.
pub fn substitute(template: &str, placeholder: &str, iri: &str) -> String {
    let wrapped = format!("<{{{{{placeholder}}}}}>");
    let bare = format!("{{{{{placeholder}}}}}");
    let reference = format!("<{iri}>");
    template
        .replace(&wrapped, &reference)
        .replace(&bare, &reference)
}

/// One live exploration over one store.
pub struct Session {
    store: CaseStore,
    registry: SurfaceRegistry,
    bus: Rc<EventBus>,
    build: BuildOptions,
    propagation: PropagationQueries,
    collections: CollectionOptions,
    /// Highlight classes that survive view rebuilds.
    overlays: IndexMap<String, IndexSet<String>>,
    controller: Option<Controller>,
}

impl Session {
    pub fn new(
        store: CaseStore,
        registry: SurfaceRegistry,
        build: BuildOptions,
        bus: Rc<EventBus>,
    ) -> Self {
        Self {
            store,
            registry,
            bus,
            build,
            propagation: PropagationQueries::default(),
            collections: CollectionOptions::default(),
            overlays: IndexMap::new(),
            controller: None,
        }
    }

    pub fn set_propagation(&mut self, queries: PropagationQueries) {
        self.propagation = queries;
    }

    pub fn set_collection_options(&mut self, opts: CollectionOptions) {
        self.collections = opts;
    }

    pub fn store(&self) -> &CaseStore {
        &self.store
    }

    pub fn controller(&self) -> Option<&Controller> {
        self.controller.as_ref()
    }

    /// Execute query text and apply its result by shape.
    ///
    /// `overlay_class` names the highlight class used when the result is a
    /// bare `?s` list; graph and collection shapes ignore it.
    pub fn run(&mut self, query: &str, overlay_class: Option<&str>) -> ScopeResult<RunOutcome> {
        if is_update_query(query) {
            self.store.update(query)?;
            tracing::info!("sparql update executed");
            return Ok(RunOutcome::Updated);
        }

        let rows = self.store.select(query)?;
        let Some(first) = rows.first() else {
            return Ok(RunOutcome::NoResults);
        };

        // Shape dispatch goes by bound variable names, most specific first.
        let has = |k: &str| first.contains_key(k);
        if has("ctx") && has("clt") && has("item") {
            return Ok(self.apply_collections(&rows));
        }
        if has("s") && has("p") && has("o") {
            return self.render_graph(&rows);
        }
        if has("s") && !has("p") && !has("o") {
            let class = overlay_class.unwrap_or(DEFAULT_OVERLAY_CLASS);
            return Ok(self.apply_highlight(&rows, class));
        }
        tracing::warn!("query returned an unsupported row shape");
        Ok(RunOutcome::UnsupportedShape)
    }

    /// Run a query template scoped to one argument module: `{{MODULE_IRI}}`
    /// is substituted before execution, then the result dispatches as in
    /// [`Session::run`].
    pub fn run_module(&mut self, template: &str, module_iri: &str) -> ScopeResult<RunOutcome> {
        self.run(&substitute(template, "MODULE_IRI", module_iri), None)
    }

    /// Deliver a click on a rendered element. Satellite clicks run the
    /// matching propagation query and highlight its hits; anything else is
    /// `Ok(None)`.
    pub fn click(&mut self, id: &str) -> ScopeResult<Option<RunOutcome>> {
        let Some(ctl) = &self.controller else {
            return Ok(None);
        };
        let Some(event) = ctl.click(id) else {
            return Ok(None);
        };
        self.propagate(&event).map(Some)
    }

    fn propagate(&mut self, event: &GraphEvent) -> ScopeResult<RunOutcome> {
        let (template, placeholder, hit_var, class) = match event {
            GraphEvent::ContextClick { .. } => (
                self.propagation.context.as_deref(),
                "CTX_IRI",
                "nodeIRI",
                CONTEXT_PROPAGATION_CLASS,
            ),
            GraphEvent::DefeaterClick { .. } => (
                self.propagation.defeater.as_deref(),
                "DFT_IRI",
                "hitIRI",
                DEFEATER_PROPAGATION_CLASS,
            ),
        };
        let template = template.ok_or_else(|| SessionError::NoPropagationQuery {
            event: event.name().to_owned(),
        })?;

        let query = substitute(template, placeholder, event.id());
        let rows = self.store.select(&query).map_err(SessionError::from)?;
        let ids: IndexSet<String> = rows
            .iter()
            .filter_map(|r| field(r, hit_var))
            .map(str::to_owned)
            .collect();
        let count = ids.len();
        tracing::debug!(event = event.name(), hits = count, "propagation");

        // Propagation replaces the highlight state rather than layering onto
        // stale classes.
        self.overlays.clear();
        self.overlays.insert(class.to_owned(), ids);
        self.reapply_overlays();
        Ok(RunOutcome::Highlighted {
            class: class.to_owned(),
            count,
        })
    }

    /// Hide one highlight class; the `collection` class also drops the
    /// collection overlay.
    pub fn hide_overlay(&mut self, class: &str) {
        self.overlays.insert(class.to_owned(), IndexSet::new());
        self.reapply_overlays();
        if class == "collection" {
            if let Some(ctl) = &mut self.controller {
                ctl.clear_collections();
            }
        }
    }

    fn apply_collections(&mut self, rows: &[Row]) -> RunOutcome {
        let Some(ctl) = &mut self.controller else {
            tracing::warn!("collections need a rendered graph first");
            return RunOutcome::NoView;
        };
        let memberships: Vec<CollectionInput> =
            rows.iter().filter_map(CollectionInput::from_row).collect();
        let count = memberships.len();
        ctl.add_collections(&memberships, &self.collections);
        ctl.fit();
        RunOutcome::CollectionsAdded { count }
    }

    fn render_graph(&mut self, rows: &[Row]) -> ScopeResult<RunOutcome> {
        if let Some(old) = self.controller.take() {
            old.destroy();
        }
        let ctl =
            Controller::build_tree(rows, &self.build, &self.registry, Rc::clone(&self.bus))?;
        self.controller = Some(ctl);
        self.reapply_overlays();
        Ok(RunOutcome::Rendered {
            triples: rows.len(),
        })
    }

    fn apply_highlight(&mut self, rows: &[Row], class: &str) -> RunOutcome {
        if self.controller.is_none() {
            tracing::warn!(class, "nothing to highlight yet");
            return RunOutcome::NoView;
        }
        let ids: IndexSet<String> = rows
            .iter()
            .filter_map(|r| field(r, "s"))
            .map(str::to_owned)
            .collect();
        let count = ids.len();
        self.overlays.insert(class.to_owned(), ids);
        self.reapply_overlays();
        RunOutcome::Highlighted {
            class: class.to_owned(),
            count,
        }
    }

    /// Clear the view's highlights, then apply every non-empty session class.
    fn reapply_overlays(&mut self) {
        let Some(ctl) = &mut self.controller else {
            return;
        };
        ctl.clear_all();
        for (class, ids) in &self.overlays {
            if !ids.is_empty() {
                ctl.highlight_by_ids(ids.iter().cloned(), class);
            }
        }
    }
}
