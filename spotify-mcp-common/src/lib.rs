//! Spotify MCP Common Library
//!
//! Shared utilities for configuration, Spotify session bootstrap, error
//! handling, tracing and transport selection used by the Spotify MCP server.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod tracing;
pub mod transport;


pub use auth::SpotifySession;
pub use config::Config;
pub use error::{AuthError, ConfigError, Error, Result};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
