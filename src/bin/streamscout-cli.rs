use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use streamscout::{
    config::Config,
    error::AppError,
    models::{SearchEvent, SearchRequest, ShowType},
    reference::ReferenceData,
    services::{Progress, SearchService},
};
use tokio::task::JoinHandle;

/// Find the first country where a title streams by subscription
#[derive(Debug, Parser)]
#[command(name = "streamscout-cli", version)]
struct Args {
    /// Movie or series title
    title: String,

    /// Platform id to check (repeatable); defaults to the first catalog entry
    #[arg(short, long = "platform")]
    platforms: Vec<String>,

    /// movie or series
    #[arg(long, default_value_t = ShowType::Movie)]
    show_type: ShowType,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    streamscout::init_tracing("warn");
    let args = Args::parse();

    let config = Config::from_env()?;
    let reference = Arc::new(ReferenceData::load(
        &config.platforms_path,
        &config.countries_path,
    )?);

    let platforms = if args.platforms.is_empty() {
        reference
            .default_platform()
            .map(|platform| vec![platform.id.clone()])
            .unwrap_or_default()
    } else {
        args.platforms
    };
    let request = SearchRequest::new(args.title, platforms, args.show_type);

    let service = Arc::new(SearchService::from_config(&config, reference.clone())?);

    let canceller = service.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    let (progress, mut events) = Progress::channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let SearchEvent::CountryTested {
                country,
                country_name,
            } = event
            {
                println!("checking {} ({})", country, country_name);
            }
        }
    });

    let run = service.search(&request, &progress).await;
    drop(progress);
    wait_for_printer(printer).await;

    match run.outcome {
        Ok(result) => {
            let platform = reference
                .platform(&result.platform)
                .map(|platform| format!("{} {}", platform.icon, platform.name))
                .unwrap_or_else(|| result.platform.clone());
            println!(
                "Found '{}' on {} in {} ({})",
                request.title.trim(),
                platform.trim(),
                result.country_name,
                result.country.to_uppercase()
            );
            for show in &result.matched_records {
                if let Some(title) = show.title() {
                    println!("  - {}", title);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ (AppError::NotFound(_) | AppError::NoAvailability(_))) => {
            eprintln!("{}", err);
            Ok(ExitCode::from(1))
        }
        Err(err) => {
            eprintln!("{}", err);
            Ok(ExitCode::from(2))
        }
    }
}

/// Waits for the progress printer to drain. Returns `false` if it died.
async fn wait_for_printer(printer: JoinHandle<()>) -> bool {
    match printer.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Progress printer failed");
            false
        }
    }
}
