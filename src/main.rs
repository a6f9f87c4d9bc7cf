//! Binary entry point: read configuration, start logging, point the dashboard
//! at the REST API and run the Ratatui event loop until the user exits.
use anyhow::Context;
use clap::Parser;
use school_records_admin::{init_logging, run_app, App, Args, RestClient};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_path()?)?;
    let client = RestClient::new(args.base_url.clone(), args.timeout())
        .context("failed to build HTTP client")?;
    info!(base_url = %client.base_url(), page = %args.page, "starting dashboard");

    let mut app = App::new(Box::new(client), args.page);
    run_app(&mut app)
}
