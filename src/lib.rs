//! # gsn-scope
//!
//! An explorer for GSN-style assurance-case knowledge graphs stored in an
//! embedded RDF triple store.
//!
//! ## Architecture
//!
//! - **Store** (`store`): SPARQL query/update over `oxigraph`, Turtle loading
//! - **Rows** (`rows`): RDF term to display-string normalization
//! - **Graph** (`graph`): relation classification, adjacency extraction,
//!   spanning-tree resolution under multi-parent ambiguity
//! - **Layout** (`layout`): tidy-tree and swim-lane strategies, radial
//!   collection overlays
//! - **Scene** (`scene`): the pure, renderer-agnostic node/edge model
//! - **Controller** (`controller`): viewport transforms, highlight protocol,
//!   semantic click events
//! - **Session** (`session`): query-shape dispatch and click-driven
//!   highlight propagation
//!
//! ## Library usage
//!
//! ```no_run
//! use gsn_scope::controller::{BuildOptions, Controller};
//! use gsn_scope::events::EventBus;
//! use gsn_scope::render::{SurfaceRegistry, SvgSurface};
//! use gsn_scope::store::CaseStore;
//! use std::rc::Rc;
//!
//! let store = CaseStore::in_memory().unwrap();
//! store.load_turtle(include_str!("../demos/example_ac.ttl"), None).unwrap();
//! let rows = store.select("SELECT ?s ?p ?o WHERE { ?s ?p ?o }").unwrap();
//!
//! let mut registry = SurfaceRegistry::new();
//! registry.register("graph", SvgSurface::new());
//! let bus = Rc::new(EventBus::new());
//! let mut ctl = Controller::build_tree(&rows, &BuildOptions::default(), &registry, bus).unwrap();
//! ctl.fit();
//! ```

pub mod controller;
pub mod error;
pub mod events;
pub mod graph;
pub mod layout;
pub mod overlay;
pub mod render;
pub mod rows;
pub mod scene;
pub mod session;
pub mod store;
pub mod viewport;
