use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `imgrelay` - image proxy URL rewriting for support-ticket content.
#[derive(Parser, Debug)]
#[command(name = "imgrelay")]
#[command(version = "0.1.0")]
#[command(about = "Rewrite external image URLs in ticket messages through a proxy.", long_about = None)]
pub struct Cli {
    /// Override the configured message database path
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite all stored ticket messages to use proxied image URLs
    Migrate,

    /// Restore original image URLs in all stored ticket messages
    Revert,

    /// Transform one text (from --text or stdin) and print the result
    Proxify {
        /// Text to transform; reads stdin when omitted
        #[arg(long)]
        text: Option<String>,

        /// Apply the reverse transform (restore original URLs)
        #[arg(long)]
        revert: bool,
    },

    /// Evaluate a hostname against the configured allow-list
    CheckHost {
        /// Hostname to test, e.g. `i.imgur.com`
        host: String,
    },
}
