//! Lecture catalog loading: the HTTP sources and the request-deduplicating cache in
//! front of them.

mod cache;
mod client;

pub use cache::{CacheStats, Catalog, FetchCache};
pub use client::{CatalogSource, HttpCatalogSource, SourceId};

#[cfg(test)]
pub(crate) use cache::tests::CountingSource;
