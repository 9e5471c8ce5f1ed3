//! StudyNotes command-line client.
//!
//! # Responsibility
//! - Smoke-probe the core crate when run without a command.
//! - List notes, PDFs and events from the backend configured in the
//!   environment (`STUDYNOTES_*`).

use clap::{Parser, Subcommand};
use log::info;
use std::process::ExitCode;
use std::sync::Arc;
use studynotes_core::{init_from_config, ClientConfig, HttpBackend, PdfPipeline, Session};

#[derive(Parser)]
#[command(name = "studynotes")]
#[command(version, about = "StudyNotes client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List notes, optionally filtered by a search term
    Notes {
        /// Case-insensitive term matched against title and body text
        term: Option<String>,
    },
    /// List uploaded PDFs and their pipeline progress
    Pdfs,
    /// List scheduled events
    Events,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("studynotes_core ping={}", studynotes_core::ping());
        println!("studynotes_core version={}", studynotes_core::core_version());
        return ExitCode::SUCCESS;
    };

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<(), String> {
    let config = ClientConfig::from_env().map_err(|err| err.to_string())?;
    init_from_config(&config).map_err(|err| err.to_string())?;
    let backend = HttpBackend::new(&config).map_err(|err| err.to_string())?;
    let session = Session::new(Arc::new(backend));
    info!("event=cli_run module=cli status=start base_url={}", config.base_url);

    match command {
        Commands::Notes { term } => {
            if !session.notes().list().await {
                return Err(failure(session.notes().error()));
            }
            for note in session.notes().search(term.as_deref()) {
                let preview = note.preview().unwrap_or_default();
                println!("{}\t{}\t{}", note.id, note.title, preview);
            }
        }
        Commands::Pdfs => {
            if !session.pdfs().list().await {
                return Err(failure(session.pdfs().error()));
            }
            for pdf in session.pdfs().pdfs() {
                let stage = PdfPipeline::new(pdf.clone()).stage();
                println!("{}\t{}\t{stage:?}", pdf.id, pdf.filename);
            }
        }
        Commands::Events => {
            if !session.events().list().await {
                return Err(failure(session.events().error()));
            }
            for event in session.events().events() {
                println!(
                    "{}\t{}\t{}\t{}",
                    event.id,
                    event.title,
                    event.start_time.to_rfc3339(),
                    event.end_time.to_rfc3339()
                );
            }
        }
    }
    Ok(())
}

fn failure(error: Option<String>) -> String {
    error.unwrap_or_else(|| "list response was superseded; retry".to_string())
}
