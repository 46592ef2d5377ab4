//! Retrieval Augmented Generation pipeline.
//!
//! One-way data flow: raw text moves through the chunker and ingestion
//! pipeline into the vector store; at query time the retriever formats
//! ranked chunks into a context string the generator hands to the LLM.

pub mod chunker;
pub mod generator;
pub mod ingest;
pub mod retriever;

pub use chunker::{ChunkConfig, TextChunker};
pub use generator::ResponseGenerator;
pub use ingest::{BatchReport, IngestPipeline, IngestReport};
pub use retriever::Retriever;
