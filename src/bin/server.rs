use std::{net::SocketAddr, path::PathBuf, process::ExitCode};

use axum::middleware;
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::Parser;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use badget_console::{
    AppState, Backend, PaginationConfig, RestClient, SqliteClient, add_tracing_layer,
    build_router, graceful_shutdown, init_tracing, logging_middleware,
};

/// The web console for managing badgets and category listings.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The port to serve the console from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// The base URL of the hosted data service, e.g. `https://xyz.supabase.co`.
    #[arg(long, env = "DATA_SERVICE_URL", requires = "data_key")]
    data_url: Option<String>,

    /// The API key for the hosted data service.
    #[arg(long, env = "DATA_SERVICE_KEY", hide_env_values = true)]
    data_key: Option<String>,

    /// File path to the SQLite database used when no data service is configured.
    #[arg(long, env = "DB_PATH", default_value = "badget.db")]
    db_path: String,

    /// Directory holding the SSL certificate `cert.pem` and key `key.pem`.
    /// The console is served over plain HTTP if not given.
    #[arg(long)]
    cert_path: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    let data_client = match (&args.data_url, &args.data_key) {
        (Some(url), Some(key)) => {
            tracing::info!("Using the data service at {url}");
            RestClient::new(url, key).map(Backend::Rest)
        }
        _ => {
            tracing::info!("Using the SQLite database at {}", args.db_path);
            SqliteClient::open(&args.db_path).map(Backend::Sqlite)
        }
    };

    let data_client = match data_client {
        Ok(data_client) => data_client,
        Err(error) => {
            tracing::error!("Could not set up the data client: {error}");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(data_client, PaginationConfig::default());

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let result = match args.cert_path {
        Some(cert_path) => {
            let tls_config = match RustlsConfig::from_pem_file(
                PathBuf::from(&cert_path).join("cert.pem"),
                PathBuf::from(&cert_path).join("key.pem"),
            )
            .await
            {
                Ok(tls_config) => tls_config,
                Err(error) => {
                    tracing::error!("Could not open TLS certificates in {cert_path}: {error}");
                    return ExitCode::FAILURE;
                }
            };

            tracing::info!("HTTPS server listening on {addr}");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(router.into_make_service())
                .await
        }
        None => {
            tracing::info!("HTTP server listening on {addr}");
            axum_server::bind(addr)
                .handle(handle)
                .serve(router.into_make_service())
                .await
        }
    };

    if let Err(error) = result {
        tracing::error!("Server stopped with an error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
