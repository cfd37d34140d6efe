//! CLI module for Keygate
//!
//! Provides subcommands:
//! - `serve`: run the HTTP server
//! - `keygen`: print a freshly generated key token
//! - `session-token`: mint a session token for local testing

pub mod keygen;
pub mod serve;
pub mod session_token;

use clap::{Parser, Subcommand};

/// Keygate - API key issuance and validation service
#[derive(Parser)]
#[command(name = "keygate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Print one freshly generated key token
    Keygen,

    /// Mint a session token signed with the configured secret
    SessionToken(session_token::SessionTokenArgs),
}
