//! Spotify MCP Server
//!
//! Serves the Spotify tools over stdio or streamable HTTP. Run
//! `spotify-mcp login` once to authorize and cache a token.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spotify_mcp::{RspotifyClient, SpotifyApi, SpotifyHandler, SpotifyServer};
use spotify_mcp_common::{
    Config, McpServerBuilder, SpotifySession, TransportArgs, tracing::init_tracing,
};

#[derive(Parser, Debug)]
#[command(name = "spotify-mcp")]
#[command(about = "MCP server for searching and controlling Spotify playback")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    transport: TransportArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authorize with Spotify in the browser and cache the token
    Login,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = Config::from_env()?;

    if let Some(Command::Login) = args.command {
        let session = SpotifySession::login(&config).await?;
        let me = RspotifyClient::new(session)
            .current_user()
            .await
            .context("token cached but profile lookup failed")?;
        eprintln!(
            "Logged in as {}. Token cached at {}",
            me.display_name.as_deref().unwrap_or(&me.id),
            config.token_cache_path.display()
        );
        return Ok(());
    }

    tracing::info!("spotify-mcp server starting...");

    let session = SpotifySession::connect(&config).await?;
    let handler = SpotifyHandler::new(Arc::new(RspotifyClient::new(session)));
    let transport = args.transport.into_transport();

    McpServerBuilder::new(SpotifyServer::new(handler))
        .with_transport(transport)
        .run()
        .await?;

    Ok(())
}
