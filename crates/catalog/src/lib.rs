//! Similarity search over the static hotel room dataset.
//!
//! Rooms are loaded from a CSV file, embedded into a deterministic
//! pseudo-vector space, and ranked by cosine similarity. The
//! embeddings are a toy stand-in for a real model, which keeps the
//! search fully offline and reproducible, and they are cached in a
//! JSON sidecar keyed by the dataset's fingerprint.

pub mod dataset;
pub mod vectors;

pub use dataset::{parse_dataset, DatasetError};
pub use vectors::{CatalogError, HotelCatalog, HotelVector, SearchCriteria};
