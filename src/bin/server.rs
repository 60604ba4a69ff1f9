use std::{
    fs::OpenOptions,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use tally_rs::{
    AppState, build_router,
    config::{SupabaseConfig, load_env},
    graceful_shutdown,
    store::{SqliteStore, SupabaseStore},
};

/// The JSON API server for Tally.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The address to listen on.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 7879)]
    port: u16,

    /// File path to a SQLite database to use instead of Supabase.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Directory holding an SSL certificate `cert.pem` and key `key.pem`.
    ///
    /// Serves plain HTTP if not given.
    #[arg(long)]
    cert_path: Option<PathBuf>,

    /// Directory of a built web client to serve outside of `/api`.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// The canonical timezone used for default transaction dates.
    #[arg(long, env = "TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,
}

#[tokio::main]
async fn main() {
    load_env();
    setup_logging();

    let args = Args::parse();
    let addr = SocketAddr::from((args.host, args.port));

    let state = match &args.db_path {
        Some(db_path) => {
            tracing::info!("Using the SQLite store at {}", db_path.display());
            let store = SqliteStore::open(db_path).expect("Could not open the database.");
            AppState::new(store, &args.timezone)
        }
        None => {
            let config = SupabaseConfig::from_env().expect("Supabase is not configured.");
            tracing::info!("Using the Supabase project at {}", config.url);
            AppState::new(
                SupabaseStore::new(&config.url, &config.anon_key),
                &args.timezone,
            )
        }
    }
    .expect("Could not create the app state.");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state, args.static_dir.as_deref()));

    match &args.cert_path {
        Some(cert_path) => {
            let tls_config = RustlsConfig::from_pem_file(
                cert_path.join("cert.pem"),
                cert_path.join("key.pem"),
            )
            .await
            .expect("Could not open TLS certificates.");

            tracing::info!("HTTPS server listening on {}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(router.into_make_service())
                .await
                .expect("Server failed.");
        }
        None => {
            tracing::info!("HTTP server listening on {}", addr);
            axum_server::bind(addr)
                .handle(handle)
                .serve(router.into_make_service())
                .await
                .expect("Server failed.");
        }
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty().with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged by the handlers, so `TraceLayer` does not need to log 5xx responses.
        .on_failure(());

    router.layer(tracing_layer)
}
