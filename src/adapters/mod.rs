// Adapters layer: concrete implementations of the domain ports (blocking,
// strategies, semantic search over HTTP, datasets and local storage).

pub mod blocking;
pub mod dataset;
pub mod semantic_http;
pub mod storage;
pub mod strategies;
