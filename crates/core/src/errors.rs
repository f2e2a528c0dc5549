use thiserror::Error;

/// Failures from the provider fan-out stage.
///
/// All of these are recoverable at the turn level: the workflow
/// controller converts them into error text on the returned state and
/// never propagates them to its caller.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AggregationError {
    #[error("no search query available")]
    MissingQuery,
    #[error("failed to search hotel providers")]
    ProvidersFailed,
}

/// Failures from the recommendation selection stage.
///
/// `NoResults` and `NoListings` are distinct reported conditions: the
/// first means aggregation handed over an empty result set, the second
/// that providers responded but none carried a single listing.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no search results to analyze")]
    NoResults,
    #[error("no hotel rooms found")]
    NoListings,
}

impl AggregationError {
    /// The text shown in the conversation transcript. No internal
    /// identifiers or stack traces ever cross this boundary.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingQuery => "No search query available",
            Self::ProvidersFailed => "Failed to search hotel providers",
        }
    }

    pub fn analysis(&self) -> &'static str {
        match self {
            Self::MissingQuery => "Search failed - missing query",
            Self::ProvidersFailed => "Hotel search failed",
        }
    }
}

impl SelectionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoResults => "No search results to analyze",
            Self::NoListings => "No hotel rooms found",
        }
    }

    pub fn analysis(&self) -> &'static str {
        match self {
            Self::NoResults => "Analysis failed - no results",
            Self::NoListings => "No available rooms found",
        }
    }
}
