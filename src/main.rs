mod config;
mod export;
mod fetcher;
mod processor;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use config::RunConfig;

#[derive(Parser)]
#[command(name = "fda_scraper", about = "openFDA drug label fetcher and filter")]
struct Cli {
    /// Pages to fetch, 100 labels per page
    #[arg(short = 'n', long, default_value_t = config::DEFAULT_RUN_PAGES)]
    pages: usize,
    /// Output directory for the CSV/JSON dataset
    #[arg(short, long, default_value = "data/processed")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let config = RunConfig {
        pages: cli.pages,
        out_dir: cli.out_dir,
        ..RunConfig::default()
    };

    run(config).await?;

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

async fn run(config: RunConfig) -> anyhow::Result<()> {
    println!("openFDA Drug Label Database");
    println!("===========================\n");
    println!(
        "Fetching {} pages (~{} labels)...",
        config.pages,
        config.pages * fetcher::PAGE_SIZE
    );

    let client = fetcher::LabelClient::new(config.request_timeout, config.page_delay)?;
    let raw_labels = client.fetch_all(config.pages).await;
    println!("Fetched {} raw labels.\n", raw_labels.len());

    println!("Processing {} labels...", raw_labels.len());
    let (drugs, skipped) = processor::process_all(&raw_labels);
    println!(
        "Kept {} drugs, skipped {} (insufficient data).\n",
        drugs.len(),
        skipped
    );

    let paths = export::write_outputs(&config.out_dir, &drugs)?;
    println!(
        "Saved {} drugs to {} and {}",
        drugs.len(),
        paths.csv.display(),
        paths.json.display()
    );

    // Sample of what made it through
    if !drugs.is_empty() {
        println!("\n{:>3} | {:<28} | {:<50}", "#", "Brand", "Purpose");
        println!("{}", "-".repeat(87));
        for (i, drug) in drugs.iter().take(10).enumerate() {
            let purpose = if drug.purpose.is_empty() {
                "-".to_string()
            } else {
                truncate(&drug.purpose, 50)
            };
            println!(
                "{:>3} | {:<28} | {:<50}",
                i + 1,
                truncate(&drug.brand_name, 28),
                purpose
            );
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
