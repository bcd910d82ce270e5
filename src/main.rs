use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bangla_pdf_client::{
    logger, Config, DocumentController, LopdfDecoder, TranslateOutcome, UploadOutcome,
};
use clap::Parser;
use tokio::task::JoinHandle;
use tracing::warn;

/// Extract and translate a PDF page to Bangla through the backend
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// PDF file to upload
    pdf: PathBuf,

    /// Page to open (e.g. "3")
    #[arg(short, long)]
    page: Option<String>,

    /// Number of text columns on the page
    #[arg(short, long)]
    columns: Option<u32>,

    /// Translate the extracted text
    #[arg(short, long)]
    translate: bool,

    /// TOML config file (defaults to environment variables)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env(),
    };
    config.validate()?;

    // Initialize logging
    logger::init(config.verbose_logging);
    logger::log_startup(&config);

    let (controller, mut notifications) =
        DocumentController::with_http(&config, Arc::new(LopdfDecoder))
            .context("failed to build backend client")?;

    let printer = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            println!("🔔 {}", notification);
        }
    });

    if let Err(e) = controller.health().await {
        warn!("⚠️ Backend health check failed: {}", e);
    }

    let result = run(&controller, &args).await;

    // Dropping the controller closes the notification channel
    drop(controller);
    flush_then(printer, result).await
}

/// Wait until every queued notification is printed, then report `result`
async fn flush_then<T>(printer: JoinHandle<()>, result: Result<T>) -> Result<T> {
    printer.await?;
    result
}

async fn run(controller: &DocumentController, args: &Args) -> Result<()> {
    if let UploadOutcome::Superseded = controller.upload_file(&args.pdf).await? {
        return Ok(());
    }

    if let Some(page) = &args.page {
        controller.go_to_input(page).await?;
    }

    if let Some(columns) = args.columns {
        if controller.set_columns(columns)? {
            controller.extract().await?;
        }
    }

    let snapshot = controller.snapshot();
    println!(
        "\nPage {} / {} ({} columns)",
        snapshot.current_page, snapshot.page_count, snapshot.column_count
    );
    match &snapshot.extraction {
        Some(entry) => {
            for (idx, column) in entry.columns.iter().enumerate() {
                println!("\n--- Column {} ---\n{}", idx + 1, column);
            }
        }
        None => println!("(no extracted text)"),
    }

    if args.translate {
        match controller.translate().await? {
            TranslateOutcome::Resolved(text) => println!("\n--- বাংলা ---\n{}", text),
            TranslateOutcome::Disabled => println!("\nNothing to translate on this page"),
            TranslateOutcome::Discarded => {}
        }
    }

    Ok(())
}
