//! CLI module for Mount Registry
//!
//! - `serve`: run the management API
//! - `token`: issue a bearer token for an operator or tenant

pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};

/// Mount Registry - management plane for storage mounts
#[derive(Parser)]
#[command(name = "mount-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the management API server
    Serve,

    /// Print a signed bearer token
    Token(token::TokenArgs),
}
