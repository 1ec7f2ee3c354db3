//! gsn-scope CLI: assurance-case graph explorer.

use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use gsn_scope::controller::{BuildOptions, Controller, LaneBuildOptions};
use gsn_scope::events::EventBus;
use gsn_scope::layout::TreeLayoutConfig;
use gsn_scope::render::{SurfaceRegistry, SvgSurface};
use gsn_scope::store::{CaseStore, is_update_query};

/// Layout tuning loaded from a TOML file via `--tuning`.
#[derive(Default, serde::Deserialize)]
#[serde(default)]
struct Tuning {
    tree: TreeLayoutConfig,
}

/// Used when no query is supplied: every GSN relation, with node types for
/// shape classification.
const DEFAULT_VISUALIZE: &str = r#"
PREFIX gsn: <https://w3id.org/OntoGSN/ontology#>
SELECT ?s ?p ?o ?typeS ?typeO WHERE {
  ?s ?p ?o .
  FILTER(?p IN (gsn:supportedBy, gsn:inContextOf, gsn:challenges))
  OPTIONAL { ?s a ?typeS }
  OPTIONAL { ?o a ?typeO }
}
ORDER BY ?s ?p ?o
"#;

#[derive(Parser)]
#[command(name = "gsn-scope", version, about = "Assurance-case graph explorer")]
struct Cli {
    /// Turtle file(s) to load into the store. Repeatable.
    #[arg(long, global = true)]
    ontology: Vec<PathBuf>,

    /// Base IRI for resolving relative IRIs in the Turtle input.
    #[arg(long, global = true)]
    base: Option<String>,

    /// TOML file overriding layout geometry (node spacing, satellite
    /// offsets).
    #[arg(long, global = true)]
    tuning: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the assurance case as a tidy tree.
    Render {
        /// SPARQL file selecting ?s ?p ?o rows; defaults to all GSN relations.
        #[arg(long)]
        query: Option<PathBuf>,

        /// Write SVG here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Emit the positioned scene as JSON instead of SVG.
        #[arg(long)]
        json: bool,

        #[arg(long, default_value = "960")]
        width: f64,

        #[arg(long, default_value = "520")]
        height: f64,
    },

    /// Render the assurance case as swim lanes bucketed by depth.
    Lanes {
        #[arg(long)]
        query: Option<PathBuf>,

        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long)]
        json: bool,

        #[arg(long, default_value = "960")]
        width: f64,

        #[arg(long, default_value = "520")]
        height: f64,

        /// Force this many lanes (truncate or pad the depth buckets).
        #[arg(long)]
        lane_count: Option<usize>,

        /// Comma-separated lane captions, left to right.
        #[arg(long)]
        lane_labels: Option<String>,

        /// Drop lanes that are empty and uncaptioned.
        #[arg(long)]
        drop_empty_lanes: bool,
    },

    /// Run a SPARQL query or update and print the result.
    Query {
        /// Path to a SPARQL file.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Inline SPARQL text.
        #[arg(long)]
        text: Option<String>,
    },

    /// Show store statistics.
    Info,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = load_store(&cli.ontology, cli.base.as_deref())?;
    let tuning = match &cli.tuning {
        Some(path) => {
            let text = std::fs::read_to_string(path).into_diagnostic()?;
            toml::from_str::<Tuning>(&text).into_diagnostic()?
        }
        None => Tuning::default(),
    };

    match cli.command {
        Commands::Render {
            query,
            out,
            json,
            width,
            height,
        } => {
            let rows = store.select(&read_query(query.as_deref())?).into_diagnostic()?;
            let mut registry = SurfaceRegistry::new();
            let surface = SvgSurface::new();
            registry.register("graph", surface.clone());

            let opts = BuildOptions {
                width,
                height,
                tree: tuning.tree,
                ..BuildOptions::default()
            };
            let ctl = Controller::build_tree(&rows, &opts, &registry, Rc::new(EventBus::new()))
                .into_diagnostic()?;

            let output = if json {
                serde_json::to_string_pretty(ctl.scene()).into_diagnostic()?
            } else {
                surface.svg()
            };
            write_output(out.as_deref(), &output)?;
        }

        Commands::Lanes {
            query,
            out,
            json,
            width,
            height,
            lane_count,
            lane_labels,
            drop_empty_lanes,
        } => {
            let rows = store.select(&read_query(query.as_deref())?).into_diagnostic()?;
            let mut registry = SurfaceRegistry::new();
            let surface = SvgSurface::new();
            registry.register("graph", surface.clone());

            let opts = LaneBuildOptions {
                width,
                height,
                lane_count,
                lane_labels: lane_labels
                    .map(|s| s.split(',').map(|l| l.trim().to_owned()).collect())
                    .unwrap_or_default(),
                allow_empty_lanes: !drop_empty_lanes,
                ..LaneBuildOptions::default()
            };
            let ctl = Controller::build_lanes(&rows, &opts, &registry, Rc::new(EventBus::new()))
                .into_diagnostic()?;

            let output = if json {
                serde_json::to_string_pretty(ctl.scene()).into_diagnostic()?
            } else {
                surface.svg()
            };
            write_output(out.as_deref(), &output)?;
        }

        Commands::Query { file, text } => {
            let sparql = match (file, text) {
                (Some(path), _) => std::fs::read_to_string(path).into_diagnostic()?,
                (None, Some(text)) => text,
                (None, None) => miette::bail!("pass --file or --text"),
            };
            if is_update_query(&sparql) {
                store.update(&sparql).into_diagnostic()?;
                println!("Update executed. Store now holds {} triples.", store.len());
            } else {
                let rows = store.select(&sparql).into_diagnostic()?;
                println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
            }
        }

        Commands::Info => {
            println!("Triples: {}", store.len());
            println!("Ontologies loaded: {}", cli.ontology.len());
        }
    }

    Ok(())
}

fn load_store(ontologies: &[PathBuf], base: Option<&str>) -> Result<CaseStore> {
    let store = CaseStore::in_memory().into_diagnostic()?;
    for path in ontologies {
        let turtle = std::fs::read_to_string(path).into_diagnostic()?;
        store.load_turtle(&turtle, base).into_diagnostic()?;
        tracing::info!(file = %path.display(), triples = store.len(), "loaded ontology");
    }
    Ok(store)
}

fn read_query(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).into_diagnostic(),
        None => Ok(DEFAULT_VISUALIZE.to_owned()),
    }
}

fn write_output(out: Option<&std::path::Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, content).into_diagnostic()?;
            println!("Wrote {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
