use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bump_progress::config::Config;
use bump_progress::output;
use bump_progress::report::provider::ReportProvider;
use bump_progress::source::github::GithubReleaseSource;
use bump_progress::tiles::manifest::ManifestTileSource;

#[derive(Parser)]
#[command(name = "bump-progress")]
#[command(version, about = "Reports Go toolchain bump progress across releases and tiles")]
struct Cli {
    /// Path to the releases configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the bump progress report for a target Go version
    Report {
        /// Target Go toolchain version, e.g. "1.21.5"
        #[arg(long)]
        target: String,

        /// Emit the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Report { target, json } => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(run_report(cli.config, target, json)),
    }
}

async fn run_report(config_path: PathBuf, target: String, json: bool) -> anyhow::Result<()> {
    let config = Config::load(&config_path)?;
    let tiles = ManifestTileSource::new(&config.tile_metadata_url);
    let provider = ReportProvider::new(GithubReleaseSource::default(), tiles, config);

    let snapshot = provider.get(&target).await;

    if json {
        println!("{}", output::render_json(&snapshot)?);
    } else {
        print!("{}", output::render_table(&snapshot));
    }
    Ok(())
}
