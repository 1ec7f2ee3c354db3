//! End-to-end tests for the gsn-scope pipeline.
//!
//! These load a real assurance case into the store, run SPARQL against it,
//! and drive the session through render, highlight, collection and
//! click-propagation flows, validating that store, graph resolution, layout
//! and rendering all work together.

use std::rc::Rc;

use gsn_scope::controller::{BuildOptions, Controller, LaneBuildOptions};
use gsn_scope::events::EventBus;
use gsn_scope::graph::NodeKind;
use gsn_scope::render::{SurfaceRegistry, SvgSurface};
use gsn_scope::session::{PropagationQueries, RunOutcome, Session};
use gsn_scope::store::CaseStore;

const EXAMPLE_AC: &str = include_str!("../demos/example_ac.ttl");

const VISUALIZE: &str = r#"
PREFIX gsn: <https://w3id.org/OntoGSN/ontology#>
SELECT ?s ?p ?o ?typeS ?typeO WHERE {
  ?s ?p ?o .
  FILTER(?p IN (gsn:supportedBy, gsn:inContextOf, gsn:challenges))
  OPTIONAL { ?s a ?typeS }
  OPTIONAL { ?o a ?typeO }
}
ORDER BY ?s ?p ?o
"#;

fn loaded_store() -> CaseStore {
    let store = CaseStore::in_memory().unwrap();
    store.load_turtle(EXAMPLE_AC, None).unwrap();
    store
}

fn registry_with_surface() -> (SurfaceRegistry, SvgSurface) {
    let mut registry = SurfaceRegistry::new();
    let surface = SvgSurface::new();
    registry.register("graph", surface.clone());
    (registry, surface)
}

#[test]
fn turtle_from_disk_renders_a_tree() {
    // Same path the CLI takes: bytes from a file, not a baked-in string.
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("case.ttl");
    std::fs::write(&path, EXAMPLE_AC).unwrap();

    let store = CaseStore::in_memory().unwrap();
    let turtle = std::fs::read_to_string(&path).unwrap();
    store.load_turtle(&turtle, None).unwrap();

    let rows = store.select(VISUALIZE).unwrap();
    let (registry, surface) = registry_with_surface();
    let ctl = Controller::build_tree(
        &rows,
        &BuildOptions::default(),
        &registry,
        Rc::new(EventBus::new()),
    )
    .unwrap();

    let scene = ctl.scene();
    // G1, S1, G2, G3, Sn1, Sn2 form the hierarchy.
    assert_eq!(scene.nodes.len(), 6);
    // C1, A1, J1 are contexts; D1 is a defeater.
    assert_eq!(scene.context_nodes.len(), 3);
    assert_eq!(scene.defeater_nodes.len(), 1);
    assert!(surface.svg().contains("gsn-viewport"));
}

#[test]
fn declared_types_beat_prefix_heuristics() {
    let store = loaded_store();
    let rows = store.select(VISUALIZE).unwrap();
    let (registry, _) = registry_with_surface();
    let ctl = Controller::build_tree(
        &rows,
        &BuildOptions::default(),
        &registry,
        Rc::new(EventBus::new()),
    )
    .unwrap();

    let kind_of = |short: &str| {
        ctl.scene()
            .nodes
            .iter()
            .find(|n| n.id.ends_with(short))
            .map(|n| n.kind)
            .unwrap()
    };
    assert_eq!(kind_of("#G1"), NodeKind::Goal);
    assert_eq!(kind_of("#S1"), NodeKind::Strategy);
    assert_eq!(kind_of("#Sn1"), NodeKind::Solution);
}

#[test]
fn lanes_bucket_the_case_by_depth() {
    let store = loaded_store();
    let rows = store.select(VISUALIZE).unwrap();
    let (registry, _) = registry_with_surface();
    let opts = LaneBuildOptions {
        lane_labels: vec!["Claims".into(), "Arguments".into(), "Subclaims".into()],
        ..LaneBuildOptions::default()
    };
    let ctl =
        Controller::build_lanes(&rows, &opts, &registry, Rc::new(EventBus::new())).unwrap();

    let scene = ctl.scene();
    // G1 / S1 / (G2, G3) / (Sn1, Sn2): four depth lanes.
    assert_eq!(scene.lanes.len(), 4);
    assert_eq!(scene.lanes[0].label, "Claims");
    assert_eq!(scene.lanes[3].label, "Layer 4");
    assert_eq!(scene.nodes.len(), 6);
}

#[test]
fn session_flow_render_highlight_collections() {
    let (registry, surface) = registry_with_surface();
    let mut session = Session::new(
        loaded_store(),
        registry,
        BuildOptions::default(),
        Rc::new(EventBus::new()),
    );

    let outcome = session.run(VISUALIZE, None).unwrap();
    assert!(matches!(outcome, RunOutcome::Rendered { triples } if triples >= 9));

    // Highlight every goal.
    let outcome = session
        .run(
            "PREFIX gsn: <https://w3id.org/OntoGSN/ontology#> \
             SELECT ?s WHERE { ?s a gsn:Goal } ORDER BY ?s",
            Some("vld"),
        )
        .unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Highlighted {
            class: "vld".into(),
            count: 3
        }
    );
    assert!(surface.svg().contains("goal vld"));

    // The evidence collection hangs off the C1 context satellite.
    let outcome = session
        .run(
            "PREFIX gsn: <https://w3id.org/OntoGSN/ontology#> \
             SELECT ?ctx ?clt ?item WHERE { \
               ?ctx gsn:refersTo ?clt . ?clt gsn:contains ?item \
             } ORDER BY ?item",
            None,
        )
        .unwrap();
    assert_eq!(outcome, RunOutcome::CollectionsAdded { count: 3 });
    let scene = session.controller().unwrap().scene();
    assert_eq!(scene.collections.hubs.len(), 1);
    assert_eq!(scene.collections.items.len(), 3);
}

#[test]
fn defeater_click_propagates_down_the_supported_subtree() {
    let (registry, surface) = registry_with_surface();
    let mut session = Session::new(
        loaded_store(),
        registry,
        BuildOptions::default(),
        Rc::new(EventBus::new()),
    );
    session.run(VISUALIZE, None).unwrap();
    session.set_propagation(PropagationQueries {
        context: None,
        defeater: Some(
            "PREFIX gsn: <https://w3id.org/OntoGSN/ontology#> \
             SELECT ?hitIRI WHERE { \
               ?dft gsn:challenges ?challenged . \
               ?challenged gsn:supportedBy* ?hitIRI . \
               FILTER(?dft = {{DFT_IRI}}) \
             }"
                .to_owned(),
        ),
    });

    let outcome = session
        .click("https://w3id.org/OntoGSN/cases/robust-llm#D1")
        .unwrap()
        .unwrap();
    // S1 and everything it transitively supports: S1, G2, G3, Sn1, Sn2.
    assert_eq!(
        outcome,
        RunOutcome::Highlighted {
            class: "def-prop".into(),
            count: 5
        }
    );
    assert!(surface.svg().contains("def-prop"));
}

#[test]
fn insert_then_rerender_picks_up_new_nodes() {
    let (registry, _) = registry_with_surface();
    let mut session = Session::new(
        loaded_store(),
        registry,
        BuildOptions::default(),
        Rc::new(EventBus::new()),
    );
    session.run(VISUALIZE, None).unwrap();
    let before = session.controller().unwrap().scene().nodes.len();

    let outcome = session
        .run(
            "PREFIX gsn: <https://w3id.org/OntoGSN/ontology#>\n\
             PREFIX case: <https://w3id.org/OntoGSN/cases/robust-llm#>\n\
             INSERT DATA { case:G2 gsn:supportedBy case:Sn3 . \
                           case:Sn3 a gsn:Solution }",
            None,
        )
        .unwrap();
    assert_eq!(outcome, RunOutcome::Updated);

    session.run(VISUALIZE, None).unwrap();
    let after = session.controller().unwrap().scene().nodes.len();
    assert_eq!(after, before + 1);
}
