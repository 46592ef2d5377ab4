//! CLI for the docket binary.
//!
//! Parsing uses clap; colored terminal output goes through
//! [`output::Output`]. Interactive subcommands print a short diagnostic on
//! error and keep their loop running rather than exiting.

pub mod output;

use crate::db::VectorStore;
use crate::rag::ingest::DEFAULT_EXTENSIONS;
use crate::rag::{IngestPipeline, ResponseGenerator, Retriever};
use crate::types::Result;
use clap::{Parser, Subcommand};
use output::Output;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Docket - retrieval-augmented policy assistant
#[derive(Parser, Debug)]
#[command(
    name = "docket",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Docket - retrieval-augmented policy assistant",
    long_about = "A retrieval-augmented company-policy assistant backed by a hosted\n\
                  Pinecone index and a local Ollama model.",
    after_help = "EXAMPLES:\n    \
                  docket ingest                 # Load documents from the data directory\n    \
                  docket query                  # Interactive raw search\n    \
                  docket ask                    # Interactive question answering\n    \
                  docket serve                  # Start the HTTP server"
)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute (defaults to serve)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve,

    /// Ingest all .txt/.md documents from a directory
    Ingest {
        /// Directory to ingest (defaults to the configured data directory)
        path: Option<PathBuf>,
    },

    /// Interactive query mode printing raw search results
    Query,

    /// Interactive question answering (retrieve, then generate)
    Ask,

    /// Show index statistics
    Stats,

    /// Delete ALL stored vectors (asks for confirmation)
    Clear,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn output(&self) -> Output {
        if self.no_color {
            Output::no_color()
        } else {
            Output::new()
        }
    }
}

/// Ingest a directory, reporting per-file outcomes.
pub async fn run_ingest(pipeline: &IngestPipeline, dir: &PathBuf, out: &Output) -> Result<()> {
    out.info(&format!("Ingesting documents from {}", dir.display()));

    let report = pipeline.ingest_directory(dir, DEFAULT_EXTENSIONS).await?;

    for file in &report.succeeded {
        out.success(&format!("{} ({} chunks)", file.source, file.chunks));
    }
    for failure in &report.failed {
        out.error(&format!("{}: {}", failure.path.display(), failure.error));
    }

    out.info(&format!(
        "Ingested {} file(s), {} failed",
        report.succeeded.len(),
        report.failed.len()
    ));
    Ok(())
}

/// Interactive query loop: print raw search results for each line.
pub async fn run_query(retriever: &Retriever, out: &Output) -> Result<()> {
    out.info("Interactive query mode. Type 'quit' or 'exit' to stop.");

    while let Some(query) = prompt_line("Enter your query: ")? {
        match retriever.retrieve(&query, 3).await {
            Ok(results) if results.is_empty() => out.warning("No results found."),
            Ok(results) => {
                for (i, result) in results.iter().enumerate() {
                    out.search_result(i + 1, result);
                }
                println!();
            }
            Err(e) => out.error(&e.to_string()),
        }
    }
    Ok(())
}

/// Interactive ask loop: full retrieve-then-generate per question.
pub async fn run_ask(
    retriever: &Retriever,
    generator: &ResponseGenerator,
    out: &Output,
) -> Result<()> {
    out.info("Question answering mode. Type 'quit' or 'exit' to stop.");

    while let Some(query) = prompt_line("Ask a question: ")? {
        out.info("Retrieving context...");
        let context = match retriever.retrieve_as_context(&query, 3).await {
            Ok(context) => context,
            Err(e) => {
                out.error(&e.to_string());
                continue;
            }
        };

        out.info("Generating answer...");
        match generator.generate(&query, &context, &[]).await {
            Ok(answer) => println!("\n{}\n", answer),
            Err(e) => out.error(&e.to_string()),
        }
    }
    Ok(())
}

/// Print vector count and namespaces.
pub async fn run_stats(store: &Arc<dyn VectorStore>, out: &Output) -> Result<()> {
    let stats = store.stats().await?;

    out.info("Index statistics");
    println!("  Total vectors: {}", stats.total_vectors);
    let namespaces = if stats.namespaces.is_empty() {
        vec!["default".to_string()]
    } else {
        stats.namespaces.clone()
    };
    println!("  Namespaces: {}", namespaces.join(", "));
    if let Some(dimension) = stats.dimension {
        println!("  Dimension: {}", dimension);
    }
    Ok(())
}

/// Delete all vectors after an explicit typed confirmation.
pub async fn run_clear(store: &Arc<dyn VectorStore>, out: &Output) -> Result<()> {
    out.warning("This will delete ALL documents.");
    let confirm = prompt_raw("Type 'yes' to confirm: ")?;

    if confirm.trim().to_lowercase() == "yes" {
        store.delete_all().await?;
        out.success("All documents deleted.");
    } else {
        out.info("Cancelled.");
    }
    Ok(())
}

/// Read one trimmed line, returning None on EOF or a quit word, skipping
/// empty input.
fn prompt_line(prompt: &str) -> Result<Option<String>> {
    loop {
        let line = prompt_raw(prompt)?;
        if line.is_empty() {
            // EOF
            return Ok(None);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if matches!(trimmed.to_lowercase().as_str(), "quit" | "exit" | "q") {
            println!("Goodbye!");
            return Ok(None);
        }
        return Ok(Some(trimmed.to_string()));
    }
}

fn prompt_raw(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
