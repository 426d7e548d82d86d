//! CLI module for the credit scoring API
//!
//! - `serve`: run the HTTP API
//! - `inspect`: load and validate the artifacts, then print a summary

pub mod inspect;
pub mod serve;

use clap::{Parser, Subcommand};

/// Credit scoring API - loan decisions and SHAP explanations
#[derive(Parser)]
#[command(name = "credit-scoring-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve,

    /// Validate the configured artifacts without serving
    Inspect(inspect::InspectArgs),
}
