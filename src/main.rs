mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::args::Args;
use cli::progress::{DownloadBars, spinner};
use cli::prompts;
use radio_dl::utils::ensure_directory;
use radio_dl::{Config, DownloadScheduler, HttpFetcher};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    cli::logging::init_logging(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(output) = &args.output {
        config.download.output_dir = output.clone();
    }
    if let Some(parallel) = args.parallel {
        config.download.parallel_downloads = parallel;
    }
    if let Some(index) = args.index {
        config.download.start_index = index;
    }

    config.validate()?;
    ensure_directory(config.output_dir())?;
    Ok(config)
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    let kind = prompts::select_station(args.station.as_deref())?;
    let station = kind.build(&config)?;

    let pb = spinner("Fetching programs...");
    let programs = station.load_programs().await;
    pb.finish_and_clear();
    prompts::print_numbered("These programs are available:", programs?);

    let program = prompts::select_program(args.program.as_deref())?;

    let pb = spinner("Fetching broadcasts...");
    let report_progress = {
        let pb = pb.clone();
        move |completed: u64, total: u64| {
            pb.set_message(format!("Fetching broadcasts... {}/{}", completed, total))
        }
    };
    let broadcasts = station
        .load_broadcasts(&program, Some(&report_progress))
        .await;
    pb.finish_and_clear();
    let broadcasts = broadcasts?;

    if broadcasts.is_empty() {
        println!("No broadcasts found for {}.", program);
        return Ok(());
    }
    prompts::print_numbered(
        "These broadcasts are available:",
        broadcasts.iter().map(|b| &b.name),
    );

    let indices = prompts::select_broadcasts(args.broadcasts.as_deref(), broadcasts.len())?;
    if !args.yes && !prompts::confirm_download(&indices)? {
        println!("The operation has been cancelled.");
        return Ok(());
    }

    let selected: Vec<_> = indices.iter().map(|&i| broadcasts[i].clone()).collect();
    let fetcher = HttpFetcher::new(config.fetch.clone())?;
    let scheduler = DownloadScheduler::new(&fetcher, config.download.file_collision)?
        .with_observer(Arc::new(DownloadBars::default()));

    println!();
    let report = scheduler
        .download_many(
            &selected,
            config.output_dir(),
            config.download.parallel_downloads,
            config.download.start_index,
        )
        .await?;

    let failed = report.failed().count();
    if failed > 0 {
        anyhow::bail!("{} of {} downloads failed", failed, report.outcomes.len());
    }

    println!("Done!");
    Ok(())
}
