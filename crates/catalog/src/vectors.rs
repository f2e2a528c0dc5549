//! Pseudo-embedding vector store.
//!
//! Each room gets a deterministic 384-dimensional vector derived from
//! a 32-bit hash of its text representation. Queries are embedded the
//! same way and ranked by cosine similarity. The scheme is a toy, but
//! it is stable across runs and platforms, which is what the cache
//! format relies on.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use roomscout_core::config::CatalogConfig;
use roomscout_core::RoomListing;

use crate::dataset::{parse_dataset, DatasetError};

const EMBEDDING_DIM: usize = 384;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// A room plus its embedding and the text the embedding was derived
/// from.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelVector {
    #[serde(flatten)]
    pub listing: RoomListing,
    pub embedding: Vec<f64>,
    pub text_representation: String,
}

/// Sidecar cache. `csv_hash` is the blake3 fingerprint of the raw
/// dataset bytes; a mismatch invalidates the whole file.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddingFile {
    csv_hash: String,
    vectors: Vec<HotelVector>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchCriteria {
    pub location: Option<String>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub amenities: Vec<String>,
    pub room_type: Option<String>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// True when the listing satisfies every supplied criterion.
    /// String criteria are case-insensitive substring checks and the
    /// amenities list matches if any entry does.
    pub fn matches(&self, listing: &RoomListing) -> bool {
        if let Some(location) = &self.location {
            if !contains_ignore_case(&listing.location, location) {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if listing.price > max_price {
                return false;
            }
        }
        if let Some(min_rating) = self.min_rating {
            if listing.rating < min_rating {
                return false;
            }
        }
        if !self.amenities.is_empty() {
            let any_match = self.amenities.iter().any(|wanted| {
                listing.amenities.iter().any(|have| contains_ignore_case(have, wanted))
            });
            if !any_match {
                return false;
            }
        }
        if let Some(room_type) = &self.room_type {
            if !contains_ignore_case(&listing.room_type, room_type) {
                return false;
            }
        }

        true
    }
}

pub struct HotelCatalog {
    vectors: Vec<HotelVector>,
}

impl HotelCatalog {
    /// Loads the dataset, reusing the embeddings sidecar when its
    /// fingerprint still matches the CSV. A stale or unreadable
    /// sidecar is regenerated in place; failure to write it back is
    /// not fatal because the vectors are already in memory.
    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let raw = fs::read(&config.dataset_path)
            .map_err(|source| CatalogError::Io { path: config.dataset_path.clone(), source })?;
        let fingerprint = blake3::hash(&raw).to_hex().to_string();

        let embeddings_path = &config.embeddings_path;
        if let Some(vectors) = load_cached(embeddings_path, &fingerprint) {
            info!(
                event_name = "catalog.loaded",
                vectors = vectors.len(),
                source = "cache",
                "hotel catalog ready"
            );
            return Ok(Self { vectors });
        }

        let text = String::from_utf8_lossy(&raw);
        let listings = parse_dataset(&text)?;
        let catalog = Self::from_listings(listings);

        let file = EmbeddingFile { csv_hash: fingerprint, vectors: catalog.vectors.clone() };
        match serde_json::to_string_pretty(&file) {
            Ok(json) => {
                if let Err(error) = fs::write(embeddings_path, json) {
                    warn!(path = %embeddings_path.display(), error = %error, "could not persist embeddings cache");
                }
            }
            Err(error) => {
                warn!(error = %error, "could not serialize embeddings cache");
            }
        }

        info!(
            event_name = "catalog.loaded",
            vectors = catalog.vectors.len(),
            source = "dataset",
            "hotel catalog ready"
        );
        Ok(catalog)
    }

    /// Embeds every listing in order.
    pub fn from_listings(listings: Vec<RoomListing>) -> Self {
        let vectors = listings
            .into_iter()
            .map(|listing| {
                let text_representation = text_representation(&listing);
                let embedding = embed(&text_representation);
                HotelVector { listing, embedding, text_representation }
            })
            .collect();
        Self { vectors }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Ranks every room against the query embedding and returns the
    /// top `limit` by cosine similarity.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&HotelVector> {
        let query_embedding = embed(&query.to_lowercase());

        let mut scored: Vec<(&HotelVector, f64)> = self
            .vectors
            .iter()
            .map(|vector| (vector, cosine_similarity(&query_embedding, &vector.embedding)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        scored.into_iter().take(limit).map(|(vector, _)| vector).collect()
    }

    /// Attribute filtering, no ranking. See [`SearchCriteria::matches`]
    /// for the per-criterion semantics.
    pub fn search_by_criteria(&self, criteria: &SearchCriteria) -> Vec<&HotelVector> {
        self.vectors.iter().filter(|vector| criteria.matches(&vector.listing)).collect()
    }
}

fn load_cached(path: &Path, fingerprint: &str) -> Option<Vec<HotelVector>> {
    let raw = fs::read_to_string(path).ok()?;
    let file: EmbeddingFile = match serde_json::from_str(&raw) {
        Ok(file) => file,
        Err(error) => {
            warn!(path = %path.display(), error = %error, "embeddings cache unreadable, regenerating");
            return None;
        }
    };
    if file.csv_hash != fingerprint {
        info!(path = %path.display(), "dataset changed, regenerating embeddings");
        return None;
    }
    Some(file.vectors)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn text_representation(listing: &RoomListing) -> String {
    format!(
        "{} {} {} {} {} {} {} stars {} {}",
        listing.hotel_name,
        listing.room_type,
        listing.description,
        listing.amenities.join(" "),
        listing.location,
        listing.provider,
        listing.rating,
        listing.price,
        listing.currency
    )
    .to_lowercase()
}

/// Spreads the decimal digits of a 32-bit text hash across the first
/// dimensions, each normalized into [0, 1). The remaining dimensions
/// stay zero.
fn embed(text: &str) -> Vec<f64> {
    let mut embedding = vec![0.0; EMBEDDING_DIM];
    let hash = simple_hash(text);
    for (slot, byte) in embedding.iter_mut().zip(hash.bytes()) {
        *slot = f64::from(byte % 100) / 100.0;
    }
    embedding
}

/// 32-bit string hash (`h = h * 31 + unit` over UTF-16 code units,
/// with wrapping arithmetic), rendered as its decimal string.
fn simple_hash(text: &str) -> String {
    let mut hash: i32 = 0;
    for unit in text.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit));
    }
    hash.to_string()
}

/// Zero-magnitude vectors score 0 instead of dividing by zero.
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let magnitude_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let magnitude_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }
    dot / (magnitude_a * magnitude_b)
}
