// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, set up logging, build the clients and
//   hand them to the UI loop.
// - Returns `anyhow::Result` so configuration and terminal errors end the
//   program with a message and a non-zero status.

use anyhow::Context;
use clap::Parser;
use mars_photos_cli::{api::ApiClient, cli::Cli, ui::main_menu, viewer::SystemViewer};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v; logs go to stderr, menus to stdout.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let config = cli.config().context("Invalid catalog configuration")?;
    log::debug!("using {config:?}");

    let api = ApiClient::new(&config)?;
    let viewer = SystemViewer::new(&config)?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(api, viewer)?;
    Ok(())
}
