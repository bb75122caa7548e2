use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod utils;

use commands::find::FindArgs;
use commands::serve::ServeArgs;

/// user-search - search a user directory over HTTP
#[derive(Parser)]
#[command(name = "user-search")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the search server
    Serve(ServeArgs),
    /// Run one search against a server
    Find(FindArgs),
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args).await,
        Commands::Find(args) => commands::find::execute(args).await,
    };

    // Handle result
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            // Show context if available
            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            std::process::exit(1);
        }
    }
}
