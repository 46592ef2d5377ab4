use docket::api::create_router;
use docket::cli::{self, Cli, Commands};
use docket::db::{PineconeStore, VectorStore};
use docket::llm::{LLMClient, OllamaClient};
use docket::rag::{IngestPipeline, ResponseGenerator, Retriever};
use docket::types::Result;
use docket::{AppState, Config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse_args();
    let out = cli.output();

    if let Err(e) = run(cli).await {
        out.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let out = cli.output();
    let config = Arc::new(Config::from_env()?);

    // One store handle per process, shared read-only.
    let store: Arc<dyn VectorStore> = Arc::new(PineconeStore::connect(&config.pinecone).await?);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, store, &out).await,
        Commands::Ingest { path } => {
            let dir = path.unwrap_or_else(|| PathBuf::from(&config.ingest.data_dir));
            let pipeline = IngestPipeline::new(store, config.ingest.chunking.clone())?;
            cli::run_ingest(&pipeline, &dir, &out).await
        }
        Commands::Query => cli::run_query(&Retriever::new(store), &out).await,
        Commands::Ask => {
            let retriever = Retriever::new(store);
            let generator = ResponseGenerator::new(ollama_client(&config));
            cli::run_ask(&retriever, &generator, &out).await
        }
        Commands::Stats => cli::run_stats(&store, &out).await,
        Commands::Clear => cli::run_clear(&store, &out).await,
    }
}

async fn serve(
    config: Arc<Config>,
    store: Arc<dyn VectorStore>,
    out: &docket::cli::output::Output,
) -> Result<()> {
    out.banner();

    let state = AppState::new(config.clone(), store, ollama_client(&config));
    let router = create_router(state)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;

    tracing::info!(
        addr = %addr,
        cors_origin = %config.server.cors_origin,
        "server listening"
    );
    out.success(&format!("Listening on http://{}", addr));

    axum::serve(listener, router).await?;
    Ok(())
}

fn ollama_client(config: &Config) -> Arc<dyn LLMClient> {
    Arc::new(OllamaClient::new(
        &config.ollama.url,
        config.ollama.model.clone(),
        config.ollama.request_timeout,
    ))
}
