//! booruget entry point
use {
    anyhow::{Context, Result},
    booruget::{
        bucket::RatioBuckets,
        cli::Cli,
        client::{BooruClient, fetch_all_posts},
        config::RunConfig,
        download,
    },
    clap::Parser,
    std::process,
    tracing::{Level, error, info},
    tracing_subscriber::FmtSubscriber,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        process::exit(1);
    }
}

/// install the global fmt subscriber; `--verbose` raises the level to debug
fn setup_logging(verbose: bool) {
    let max_level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// drive the fetch, bucket, and download phases
async fn run(cli: Cli) -> Result<()> {
    let config = RunConfig::from_cli(cli)?;
    info!(
        tags = config.search_tags.join(" "),
        "starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let client = BooruClient::new(&config).context("failed to build http client")?;
    let records = fetch_all_posts(&client)
        .await
        .context("metadata fetch failed")?;

    let bucket = RatioBuckets::build(records, &config).select()?;
    info!(
        count = bucket.records.len(),
        ratio = bucket.ratio,
        width = bucket.target_width,
        height = bucket.target_height,
        "selected ratio bucket"
    );

    let report = download::download_bucket(&client, &config, &bucket)
        .await
        .context("download phase failed")?;
    if report.succeeded == 0 && report.failed > 0 {
        anyhow::bail!("every download failed ({} items)", report.failed);
    }

    Ok(())
}
