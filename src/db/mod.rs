//! Vector store clients.

pub mod pinecone;
pub mod traits;

pub use pinecone::PineconeStore;
pub use traits::{IndexStats, ScoredMatch, UpsertReceipt, VectorStore};
