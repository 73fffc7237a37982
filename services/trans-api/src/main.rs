//! Coordinate Transformation API Server
//!
//! REST service for transforming multidimensional coordinates between
//! coordinate reference systems, delegating the geodesy to PROJ.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use catalog::CrsCatalog;
use pipeline::TransformEngine;
use proj_engine::ProjEngine;
use trans_api::router::router;
use trans_api::state::AppState;

/// Coordinate Transformation API Server
#[derive(Parser, Debug)]
#[command(name = "trans-api")]
#[command(about = "REST service for coordinate transformations between reference systems")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "TRANS_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "TRANS_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// CRS catalog file; the built-in catalog is used when unset
    #[arg(long, env = "TRANS_CRS_CATALOG")]
    catalog: Option<PathBuf>,

    /// Extra PROJ resource directory, searched before the default paths
    /// (init files for the locally defined systems live here)
    #[arg(long, env = "TRANS_PROJ_DATA")]
    proj_data: Option<PathBuf>,
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .expect("Failed to create Tokio runtime");

    runtime.block_on(async move {
        run_server(args).await;
    });
}

async fn run_server(args: Args) {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting coordinate transformation API server");

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    // Load the CRS catalog
    let catalog = match load_catalog(&args) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            tracing::error!("Failed to load CRS catalog: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize the transformation engine
    let engine: Arc<dyn TransformEngine> = match &args.proj_data {
        Some(path) => Arc::new(ProjEngine::with_search_paths(vec![path.clone()])),
        None => Arc::new(ProjEngine::new()),
    };

    info!(
        proj_version = %engine.version(),
        crs_count = catalog.len(),
        "Transformation engine initialized"
    );

    let state = Arc::new(AppState::new(catalog, engine));
    let app = router(state, prometheus_handle);

    // Parse listen address
    let addr: SocketAddr = match args.listen.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Invalid listen address '{}': {}", args.listen, e);
            std::process::exit(1);
        }
    };
    info!(address = %addr, "Listening");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}

fn load_catalog(args: &Args) -> Result<CrsCatalog, catalog::CatalogError> {
    match &args.catalog {
        Some(path) => CrsCatalog::load_from_file(path),
        None => CrsCatalog::builtin(),
    }
}
