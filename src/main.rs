// shelfwalk: collect product listings across a category tree
//
// Launches Chrome, walks every category of the configured listing site, and
// writes the deduplicated records to CSV and/or JSON.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use shelfwalk::logging::{DEFAULT_LOG_DIR, init_logging};
use shelfwalk::{
    BrowserSession, CollectionSession, HarvestConfig, ListingMode, LogProgress, OutputFormat,
    RecordSink, SessionReport, sink_for_config,
};

#[derive(Parser, Debug)]
#[command(name = "shelfwalk", version, about)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listing site entry URL
    #[arg(long)]
    base_url: Option<String>,

    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output file name without extension
    #[arg(long)]
    output_stem: Option<String>,

    #[arg(long, value_enum)]
    mode: Option<ListingMode>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Gzip the JSON output
    #[arg(long)]
    compress: bool,

    #[arg(long)]
    max_pages: Option<u32>,

    #[arg(long)]
    max_scrolls: Option<u32>,

    #[arg(long)]
    max_stagnant_rounds: Option<u32>,

    #[arg(long)]
    scroll_settle_ms: Option<u64>,

    #[arg(long)]
    page_settle_ms: Option<u64>,

    #[arg(long)]
    navigation_timeout_ms: Option<u64>,

    /// Category levels to descend (1 = top-level only)
    #[arg(long)]
    max_depth: Option<u8>,

    #[arg(long)]
    min_price: Option<f64>,

    #[arg(long)]
    max_price: Option<f64>,

    #[arg(long)]
    min_stars: Option<u32>,

    /// Keep a product once per category instead of once per run
    #[arg(long)]
    per_category_duplicates: bool,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    #[arg(short, long)]
    verbose: bool,

    /// Directory for the per-run log file
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// Log to the console only
    #[arg(long)]
    no_log_file: bool,
}

fn build_config(cli: &Cli) -> Result<HarvestConfig> {
    let base = match &cli.config {
        Some(path) => HarvestConfig::from_json_file(path)?,
        None => HarvestConfig::default(),
    };

    let mut filter = *base.filter();
    if cli.min_price.is_some() {
        filter.min_price = cli.min_price;
    }
    if cli.max_price.is_some() {
        filter.max_price = cli.max_price;
    }
    if cli.min_stars.is_some() {
        filter.min_stars = cli.min_stars;
    }

    let headless = base.headless() && !cli.headed;
    let compress = base.compress_output() || cli.compress;
    let cross_category_dedup = base.cross_category_dedup() && !cli.per_category_duplicates;
    let recovery_after = base.recovery_after_stagnant_rounds();

    let mut builder = base
        .into_builder()
        .filter(filter)
        .headless(headless)
        .compress_output(compress)
        .cross_category_dedup(cross_category_dedup);

    if let Some(url) = &cli.base_url {
        builder = builder.with_base_url(url.as_str());
    }
    if let Some(dir) = &cli.output_dir {
        builder = builder.with_output_dir(dir.clone());
    }
    if let Some(stem) = &cli.output_stem {
        builder = builder.output_stem(stem.as_str());
    }
    if let Some(mode) = cli.mode {
        builder = builder.listing_mode(mode);
    }
    if let Some(format) = cli.format {
        builder = builder.output_format(format);
    }
    if let Some(n) = cli.max_pages {
        builder = builder.max_pages(n);
    }
    if let Some(n) = cli.max_scrolls {
        builder = builder.max_scrolls(n);
    }
    if let Some(n) = cli.max_stagnant_rounds {
        builder = builder
            .max_stagnant_rounds(n)
            .recovery_after_stagnant_rounds(recovery_after.min(n));
    }
    if let Some(ms) = cli.scroll_settle_ms {
        builder = builder.scroll_settle_ms(ms);
    }
    if let Some(ms) = cli.page_settle_ms {
        builder = builder.page_settle_ms(ms);
    }
    if let Some(ms) = cli.navigation_timeout_ms {
        builder = builder.navigation_timeout_ms(ms);
    }
    if let Some(depth) = cli.max_depth {
        builder = builder.max_category_depth(depth);
    }

    builder.build()
}

async fn collect(
    browser: &BrowserSession,
    config: &HarvestConfig,
    sink: &impl RecordSink,
) -> Result<SessionReport> {
    let driver = browser.open_driver(config).await?;
    let report = CollectionSession::new(&driver, sink, config)
        .with_progress(&LogProgress)
        .run()
        .await?;
    Ok(report)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(
        cli.verbose,
        (!cli.no_log_file).then_some(cli.log_dir.as_path()),
    )?;

    let config = build_config(&cli)?;
    info!(
        "Collecting {} in {:?} mode into {}",
        config.base_url(),
        config.listing_mode(),
        config.output_dir().display()
    );

    let sink = sink_for_config(&config);
    let browser = BrowserSession::launch(config.headless()).await?;
    let outcome = collect(&browser, &config, &sink).await;
    browser.shutdown().await;

    let report = outcome?;
    if !report.skipped.is_empty() {
        warn!("{} categories were skipped", report.skipped.len());
    }
    if report.records.is_empty() {
        warn!("No products collected");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
