//! `edamannot` command line interface
use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use edamannot::config::Config;
use edamannot::graph::{self, AnnotationGraph, GraphBuilder, GraphOptions, OutputFormat, Palette};
use edamannot::metrics::{tool_score, MetricKind, MutualInformation};
use edamannot::sparql::templates;
use edamannot::table::Tables;
use edamannot::utils::Combinations;
use edamannot::{AnnotationKind, Closure, ConceptId, EdamConcept, Ontology, ToolId};

#[derive(Parser)]
#[command(name = "edamannot")]
#[command(version, about = "Annotation metrics and graphs of bio.tools software based on EDAM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase the log level (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// TOML configuration file
    #[arg(long, global = true, env = "EDAMANNOT_CONFIG")]
    config: Option<PathBuf>,

    /// SPARQL endpoint with bio.tools and EDAM
    #[arg(long, global = true, env = "EDAMANNOT_ENDPOINT")]
    endpoint: Option<String>,

    /// Directory of the materialized tables
    #[arg(long, global = true, env = "EDAMANNOT_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// bio.tools Bioschemas dump, used instead of the endpoint
    #[arg(long, global = true, env = "EDAMANNOT_BIOSCHEMAS", requires = "edam")]
    bioschemas: Option<PathBuf>,

    /// EDAM ontology file, used instead of the endpoint
    #[arg(long, global = true, env = "EDAMANNOT_EDAM", requires = "bioschemas")]
    edam: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate all tables and save them into the cache directory
    Init {
        /// Also save the tables of undeclared topics and obsolete operations
        #[arg(long)]
        diagnostics: bool,
    },

    /// Show the annotations of one or more tools
    Describe {
        /// bio.tools names, URIs or labels
        #[arg(required = true)]
        tools: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = DescribeFormat::Text)]
        format: DescribeFormat,

        /// Include all ancestors of the annotations
        #[arg(short, long)]
        transitive: bool,
    },

    /// List the topics of a tool
    Topics {
        tool: String,

        /// Include all ancestors of the topics
        #[arg(short, long)]
        transitive: bool,
    },

    /// List the operations of a tool
    Operations {
        tool: String,

        /// Include all ancestors of the operations
        #[arg(short, long)]
        transitive: bool,
    },

    /// Build the annotation graph of a tool
    GraphTool {
        tool: String,

        /// Include deprecated annotations and their alternatives
        #[arg(short = 'd', long)]
        show_deprecated: bool,

        #[command(flatten)]
        graph: GraphArgs,
    },

    /// Build the common annotation graph of several tools
    CommonGraph {
        #[arg(required = true)]
        tools: Vec<String>,

        /// Highlight the annotations that all tools share
        #[arg(short = 'i', long)]
        highlight_intersection: bool,

        #[command(flatten)]
        graph: GraphArgs,
    },

    /// Sum up the concept metrics of the annotations of tools
    Score {
        #[arg(required = true)]
        tools: Vec<String>,

        /// Use all ancestors of the annotations
        #[arg(short, long)]
        transitive: bool,

        /// Concept metric to sum up: count, ic or entropy
        #[arg(short, long, default_value = "ic")]
        metric: MetricKind,
    },

    /// Mutual information between every pair of tools
    MutualInformation {
        #[arg(required = true, num_args = 2..)]
        tools: Vec<String>,
    },
}

/// Options shared by all graph commands
#[derive(Args)]
struct GraphArgs {
    /// Include topics
    #[arg(short = 't', long)]
    show_topics: bool,

    /// Include operations
    #[arg(short = 'o', long)]
    show_operations: bool,

    /// Output format: svg, png, pdf, dot, csv or mermaid
    #[arg(short, long, default_value = "svg")]
    format: OutputFormat,

    /// Output filename without extension. Prints the graph if omitted
    #[arg(short = 'O', long)]
    output: Option<PathBuf>,

    /// Fill the concepts according to a metric: count, ic or entropy
    #[arg(long)]
    color_by: Option<MetricKind>,

    /// Target color of the fill gradient
    #[arg(long, default_value = "red")]
    color: Palette,

    /// Color by the metrics of transitive annotations instead of direct ones
    #[arg(short = 'T', long)]
    transitive: bool,
}

impl GraphArgs {
    fn options(&self) -> GraphOptions {
        // no selection means everything
        let all = !self.show_topics && !self.show_operations;
        GraphOptions {
            topics: self.show_topics || all,
            operations: self.show_operations || all,
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DescribeFormat {
    /// Annotations with labels and deprecation details
    Text,
    /// Every annotation with its ancestors
    Hierarchy,
    /// The queries that return the annotations from an endpoint
    Sparql,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(cache_dir) = &cli.cache_dir {
        config.cache_dir = cache_dir.clone();
    }
    if let (Some(bioschemas), Some(edam)) = (&cli.bioschemas, &cli.edam) {
        config.bioschemas_file = Some(bioschemas.clone());
        config.edam_file = Some(edam.clone());
    }
    Ok(config)
}

/// Uses the cached tables if they exist
fn tables(config: &Config, ontology: &Ontology) -> Result<Tables> {
    let store = config.table_store();
    if store.is_complete() {
        return Ok(store.load_tables()?);
    }
    warn!(
        "No tables in {}, calculating them. Run `edamannot init` to cache them",
        store.dir().display()
    );
    Ok(Tables::compute(ontology)?)
}

/// Finds the tool by bio.tools name, URI or label
///
/// Unknown tools are kept, their annotations are empty.
fn resolve(ontology: &Ontology, name: &str) -> ToolId {
    let id = ToolId::from_name(name);
    if ontology.tool(&id).is_some() {
        return id;
    }
    if let Some(tool) = ontology.tool_by_label(name) {
        return tool.id().clone();
    }
    warn!("Unknown tool {}", name);
    id
}

fn print_concepts(concepts: &[EdamConcept], indent: &str) {
    for concept in concepts {
        println!("{indent}{}\t{}", concept.id(), concept.label());
    }
}

fn describe_text(ontology: &Ontology, tool: &ToolId, closure: Closure) {
    println!("{}\t{}", tool, ontology.tool_label(tool).unwrap_or_default());
    for kind in AnnotationKind::ALL {
        println!("  {kind}s:");
        print_concepts(&ontology.annotations(tool, kind, closure), "    ");

        let deprecated = ontology.deprecated_annotations(tool, kind);
        if !deprecated.is_empty() {
            println!("  Deprecated {kind}s:");
        }
        for concept in deprecated {
            let alternatives: Vec<&str> = concept.alternative_ids().iter().map(ConceptId::short).collect();
            println!(
                "    {}\t{}\tconsider: {}",
                concept.id(),
                concept.label(),
                alternatives.join(", ")
            );
        }

        for concept in ontology.undeclared_annotations(tool, kind) {
            println!("    {concept}\t(not an EDAM concept)");
        }
    }
}

fn describe_hierarchy(ontology: &Ontology, tool: &ToolId) {
    println!("{}", tool.short());
    for kind in AnnotationKind::ALL {
        for concept in ontology.annotations(tool, kind, Closure::Direct) {
            println!("  {}\t{}", concept.id().short(), concept.label());
            let mut ancestors: Vec<(usize, EdamConcept)> = concept
                .all_parents()
                .filter_map(|ancestor| Some((concept.distance_to_ancestor(&ancestor)?, ancestor)))
                .collect();
            ancestors.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id().cmp(b.1.id())));
            for (distance, ancestor) in ancestors {
                println!(
                    "  {}{}\t{}",
                    "  ".repeat(distance),
                    ancestor.id().short(),
                    ancestor.label()
                );
            }
        }
    }
}

fn describe_sparql(tool: &ToolId) {
    for kind in AnnotationKind::ALL {
        for closure in [Closure::Direct, Closure::Transitive] {
            println!("# {} {kind}s ({closure:?})", tool.short());
            println!("{}\n", templates::tool_annotations(tool, kind, closure));
        }
        println!("# {} deprecated {kind}s", tool.short());
        println!("{}\n", templates::tool_deprecated_annotations(tool, kind));
    }
}

fn list_annotations(ontology: &Ontology, tool: &str, kind: AnnotationKind, transitive: bool) {
    let tool = resolve(ontology, tool);
    for concept in ontology.annotations(&tool, kind, Closure::from_flag(transitive)) {
        println!("{}\t{}", concept.id().as_str(), concept.label());
    }
}

fn color(
    builder: &mut GraphBuilder,
    config: &Config,
    ontology: &Ontology,
    args: &GraphArgs,
) -> Result<()> {
    let Some(metric) = args.color_by else {
        return Ok(());
    };
    let tables = tables(config, ontology)?;
    builder.color_by_metric(
        &tables,
        metric,
        Closure::from_flag(args.transitive),
        &args.color.to_string(),
    );
    Ok(())
}

fn output(graph: &AnnotationGraph, args: &GraphArgs) -> Result<()> {
    match &args.output {
        Some(output) => {
            let path = graph::save(graph, output, args.format)?;
            println!("Graph saved as {}", path.display());
        }
        None if args.format.needs_renderer() => print!("{}", graph::to_dot(graph)),
        None => {
            let content = graph::render(graph, args.format)?;
            print!("{}", String::from_utf8_lossy(&content));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let ontology = config
        .load_ontology()
        .context("unable to load bio.tools and EDAM")?;
    info!(
        "Loaded {} concepts and {} tools (EDAM {})",
        ontology.len(),
        ontology.n_tools(),
        ontology.edam_version().unwrap_or("unknown")
    );

    match &cli.command {
        Commands::Init { diagnostics } => {
            let store = config.table_store();
            let tables = store.init(&ontology)?;
            if *diagnostics {
                store.init_diagnostics(&ontology)?;
            }
            println!(
                "Saved the tables of {} tools into {}",
                tables.tools().len(),
                store.dir().display()
            );
        }
        Commands::Describe {
            tools,
            format,
            transitive,
        } => {
            for name in tools {
                let tool = resolve(&ontology, name);
                match format {
                    DescribeFormat::Text => {
                        describe_text(&ontology, &tool, Closure::from_flag(*transitive))
                    }
                    DescribeFormat::Hierarchy => describe_hierarchy(&ontology, &tool),
                    DescribeFormat::Sparql => describe_sparql(&tool),
                }
            }
        }
        Commands::Topics { tool, transitive } => {
            list_annotations(&ontology, tool, AnnotationKind::Topic, *transitive)
        }
        Commands::Operations { tool, transitive } => {
            list_annotations(&ontology, tool, AnnotationKind::Operation, *transitive)
        }
        Commands::GraphTool {
            tool,
            show_deprecated,
            graph,
        } => {
            let options = GraphOptions {
                deprecated: *show_deprecated,
                highlight_direct: true,
                ..graph.options()
            };
            let mut builder = GraphBuilder::new(&ontology, options);
            if !builder.add_tool(&resolve(&ontology, tool)) {
                bail!("unknown tool {tool}");
            }
            color(&mut builder, &config, &ontology, graph)?;
            output(&builder.build(), graph)?;
        }
        Commands::CommonGraph {
            tools,
            highlight_intersection,
            graph,
        } => {
            let options = GraphOptions {
                highlight_intersection: *highlight_intersection,
                ..graph.options()
            };
            let ids: Vec<ToolId> = tools.iter().map(|name| resolve(&ontology, name)).collect();
            let mut builder = GraphBuilder::new(&ontology, options);
            if builder.add_tools(&ids) == 0 {
                bail!("none of the tools is known");
            }
            color(&mut builder, &config, &ontology, graph)?;
            output(&builder.build(), graph)?;
        }
        Commands::Score {
            tools,
            transitive,
            metric,
        } => {
            let closure = Closure::from_flag(*transitive);
            let tables = tables(&config, &ontology)?;
            let scores: HashMap<AnnotationKind, HashMap<ConceptId, f64>> = AnnotationKind::ALL
                .into_iter()
                .map(|kind| (kind, tables.concept_metrics(kind, closure).scores(*metric)))
                .collect();
            for name in tools {
                let tool = resolve(&ontology, name);
                let score = tool_score(
                    &tool,
                    tables.metric_annotations(AnnotationKind::Topic, closure),
                    tables.metric_annotations(AnnotationKind::Operation, closure),
                    &scores[&AnnotationKind::Topic],
                    &scores[&AnnotationKind::Operation],
                );
                println!("{}\t{metric}\t{score}", tool.short());
            }
        }
        Commands::MutualInformation { tools } => {
            let tables = tables(&config, &ontology)?;
            let mut mi = MutualInformation::new(
                tables.annotations(AnnotationKind::Topic, Closure::Transitive),
                tables.annotations(AnnotationKind::Operation, Closure::Transitive),
            )?;
            let ids: Vec<ToolId> = tools.iter().map(|name| resolve(&ontology, name)).collect();
            for (tool1, tool2) in Combinations::new(&ids) {
                println!(
                    "{}\t{}\t{}",
                    tool1.short(),
                    tool2.short(),
                    mi.between(tool1, tool2)
                );
            }
        }
    }
    Ok(())
}
