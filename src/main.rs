use anyhow::Context;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use geoseek::config::load_config;
use geoseek::pipeline::SearchPipeline;
use geoseek::server::run_http_server;

/// GeoSeek: semantic search gateway for geospatial catalogues
#[derive(Parser)]
#[command(name = "geoseek")]
#[command(
    about = "Bridges search requests to an embedding-inference endpoint and a KNN index, returning GeoJSON feature collections."
)]
#[command(version)]
struct Cli {
    /// Path to a configuration file (environment variables override it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP search gateway
    Serve,
    /// Run a single search through the pipeline and print the JSON response
    Query {
        /// Search method: SemanticSearch or KeywordSearch
        #[arg(short, long)]
        method: String,
        /// Free-text query
        #[arg(short, long)]
        q: Option<String>,
        /// Bounding box as west,south,east,north
        #[arg(long)]
        bbox: Option<String>,
        /// Spatial relation: intersects, disjoint, contains, within
        #[arg(long)]
        relation: Option<String>,
        /// Start of the publication-date window (YYYY, YYYY-MM, or YYYY-MM-DD)
        #[arg(long)]
        begin: Option<String>,
        /// End of the publication-date window
        #[arg(long)]
        end: Option<String>,
        /// Organisation filter (comma-separated for multi-selection)
        #[arg(long)]
        org: Option<String>,
        /// Record type filter
        #[arg(long = "type")]
        record_type: Option<String>,
        /// Theme (topic category) filter
        #[arg(long)]
        theme: Option<String>,
        /// Restrict to foundational records
        #[arg(long)]
        foundational: Option<bool>,
        /// Source system filter
        #[arg(long)]
        source_system: Option<String>,
        /// Earth-observation collection filter
        #[arg(long)]
        eo_collection: Option<String>,
        /// Earth-observation polarization filter
        #[arg(long)]
        polarization: Option<String>,
        /// Earth-observation orbit direction filter
        #[arg(long)]
        orbit_direction: Option<String>,
        /// Response language: en or fr
        #[arg(long)]
        lang: Option<String>,
        /// Sort field: relevancy, date, popularity, title
        #[arg(long)]
        sort: Option<String>,
        /// Sort order: asc or desc
        #[arg(long)]
        order: Option<String>,
        /// Page size
        #[arg(long)]
        size: Option<usize>,
        /// Pagination offset
        #[arg(long)]
        from: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Serve => {
            run_http_server(config).await.context("running server")?;
        }
        Commands::Query {
            method,
            q,
            bbox,
            relation,
            begin,
            end,
            org,
            record_type,
            theme,
            foundational,
            source_system,
            eo_collection,
            polarization,
            orbit_direction,
            lang,
            sort,
            order,
            size,
            from,
        } => {
            let mut params = HashMap::new();
            params.insert("method".to_string(), method);
            let optional = [
                ("q", q),
                ("bbox", bbox),
                ("relation", relation),
                ("begin", begin),
                ("end", end),
                ("org", org),
                ("type", record_type),
                ("theme", theme),
                ("foundational", foundational.map(|flag| flag.to_string())),
                ("source_system", source_system),
                ("eo_collection", eo_collection),
                ("polarization", polarization),
                ("orbit_direction", orbit_direction),
                ("lang", lang),
                ("sort", sort),
                ("order", order),
                ("size", size.map(|n| n.to_string())),
                ("from", from.map(|n| n.to_string())),
            ];
            for (key, value) in optional {
                if let Some(value) = value {
                    params.insert(key.to_string(), value);
                }
            }

            let pipeline = SearchPipeline::from_config(&config).context("building pipeline")?;
            let response = pipeline
                .execute_params(&params)
                .await
                .context("executing search")?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
