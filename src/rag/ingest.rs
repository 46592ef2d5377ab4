//! Document ingestion pipeline.
//!
//! Reads files or directories, chunks them, and hands the chunks to the
//! vector store for embedding and storage. Directory ingestion is a batch
//! operation: one bad file is recorded in the report, never aborts the
//! rest of the batch.

use crate::db::{UpsertReceipt, VectorStore};
use crate::rag::chunker::{ChunkConfig, TextChunker};
use crate::types::{AppError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extensions ingested by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Acknowledgment for one ingested source.
#[derive(Debug)]
pub struct IngestReport {
    pub source: String,
    pub chunks: usize,
    pub receipt: UpsertReceipt,
}

/// Per-file outcome of a directory ingestion.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: AppError,
}

/// Outcome of a directory ingestion batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<IngestReport>,
    pub failed: Vec<FileFailure>,
}

pub struct IngestPipeline {
    store: Arc<dyn VectorStore>,
    chunker: TextChunker,
}

impl IngestPipeline {
    pub fn new(store: Arc<dyn VectorStore>, config: ChunkConfig) -> Result<Self> {
        Ok(Self {
            store,
            chunker: TextChunker::new(config)?,
        })
    }

    /// Chunk raw text and upsert it under `source_name`.
    pub async fn ingest_text(&self, text: &str, source_name: &str) -> Result<IngestReport> {
        let chunks = self.chunker.chunk(text, source_name);
        let receipt = self.store.upsert(&chunks).await?;

        tracing::info!(
            source = %source_name,
            chunks = chunks.len(),
            upserted = receipt.upserted,
            "ingested source"
        );

        Ok(IngestReport {
            source: source_name.to_string(),
            chunks: chunks.len(),
            receipt,
        })
    }

    /// Ingest a single UTF-8 text file.
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestReport> {
        if !path.is_file() {
            return Err(AppError::NotFound(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|_| {
            AppError::Decode(format!("File is not valid UTF-8: {}", path.display()))
        })?;

        self.ingest_text(&text, &path.display().to_string()).await
    }

    /// Ingest every matching top-level file of a directory, in file-name
    /// order. Failures are collected per file.
    pub async fn ingest_directory(&self, dir: &Path, extensions: &[&str]) -> Result<BatchReport> {
        if !dir.is_dir() {
            return Err(AppError::NotFound(format!(
                "Directory not found: {}",
                dir.display()
            )));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && matches_extension(path, extensions))
            .collect();
        paths.sort();

        let mut report = BatchReport::default();
        for path in paths {
            match self.ingest_file(&path).await {
                Ok(file_report) => report.succeeded.push(file_report),
                Err(error) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %error,
                        "skipping file after ingest failure"
                    );
                    report.failed.push(FileFailure { path, error });
                }
            }
        }

        Ok(report)
    }
}

fn matches_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}
