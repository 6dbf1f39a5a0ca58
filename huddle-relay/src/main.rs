use anyhow::Result;
use axum::{Router, routing::get};
use clap::Parser;
use huddle_core::IceServerConfig;
use huddle_relay::{RelayService, ws_handler};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "huddle-relay", about = "Signaling relay for huddle calls")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:3001")]
    listen: SocketAddr,

    /// STUN server urls; defaults to public STUN when none given.
    #[arg(long = "stun")]
    stun: Vec<String>,

    /// TURN server url, with credentials.
    #[arg(long = "turn")]
    turn: Option<String>,

    #[arg(long, requires = "turn")]
    turn_username: Option<String>,

    #[arg(long, requires = "turn")]
    turn_credential: Option<String>,
}

fn ice_servers(args: &Args) -> Vec<IceServerConfig> {
    let mut servers: Vec<IceServerConfig> = if args.stun.is_empty() {
        IceServerConfig::default_servers()
    } else {
        args.stun.iter().map(|url| IceServerConfig::stun(url)).collect()
    };

    if let (Some(url), Some(username), Some(credential)) =
        (&args.turn, &args.turn_username, &args.turn_credential)
    {
        servers.push(IceServerConfig::turn(url, username, credential));
    }

    servers
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let service = RelayService::new(ice_servers(&args));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(service);

    info!("Signaling relay listening on http://{}", args.listen);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
