//! Domain model, workflow state machine, and configuration for the
//! roomscout hotel-search assistant.
//!
//! The conversational workflow is a strict four-stage pipeline:
//!
//! 1. **Intent extraction** - natural language → `SearchRequest`
//! 2. **Provider aggregation** - concurrent fan-out to booking providers
//! 3. **Recommendation selection** - cheapest listing + prose analysis
//! 4. **Turn completion** - a `WorkflowState` handed back to the caller
//!
//! This crate owns the data that flows between those stages and the
//! explicit stage machine that sequences them. The stages themselves
//! live in `roomscout-agent` and `roomscout-providers`; errors are data
//! once they cross a stage boundary, so nothing here panics or leaks a
//! raw fault into a conversation transcript.

pub mod config;
pub mod domain;
pub mod errors;
pub mod workflow;

pub use domain::conversation::{ConversationTurn, Role};
pub use domain::listing::{ProviderResults, RoomListing};
pub use domain::search::SearchRequest;
pub use errors::{AggregationError, SelectionError};
pub use workflow::stage::{Stage, StageEvent, StageTransitionError};
pub use workflow::state::WorkflowState;
