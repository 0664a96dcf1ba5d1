use std::{net::SocketAddr, process::ExitCode};

use axum::middleware;
use axum_server::Handle;
use clap::Parser;

use badget_console::{
    SmsProvider, SmsState, VonageConfig, add_tracing_layer, build_sms_router, graceful_shutdown,
    init_tracing, logging_middleware,
};

/// Relays text messages from the console to the Vonage SMS API.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The port to serve the relay from.
    #[arg(short, long, env = "PORT", default_value_t = 3002)]
    port: u16,

    /// The Vonage API key.
    #[arg(long, env = "VONAGE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// The Vonage API secret.
    #[arg(long, env = "VONAGE_API_SECRET", hide_env_values = true)]
    api_secret: String,

    /// The sender name for messages that do not name one.
    #[arg(long, env = "VONAGE_SENDER", default_value = "Badget")]
    sender: String,

    /// The Vonage SMS endpoint.
    #[arg(long, env = "VONAGE_SMS_URL", default_value = VonageConfig::DEFAULT_URL)]
    provider_url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    let provider = match SmsProvider::new(VonageConfig {
        api_key: args.api_key,
        api_secret: args.api_secret,
        sender: args.sender,
        url: args.provider_url,
    }) {
        Ok(provider) => provider,
        Err(error) => {
            tracing::error!("Could not set up the SMS provider: {error}");
            return ExitCode::FAILURE;
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_sms_router(SmsState { provider })
        .layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    tracing::info!("SMS relay listening on {addr}");
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("SMS relay stopped with an error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
