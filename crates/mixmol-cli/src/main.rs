//! mixmol CLI - lay out cocktail recipes as molecule diagrams

mod cli;
mod colorizer;

use clap::Parser;

fn main() {
    // Logging is set up inside run() from the flags and environment
    let cli_args = cli::Cli::parse();

    let mut app = cli::MixmolApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
