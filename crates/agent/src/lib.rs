//! The conversational brain of roomscout.
//!
//! This crate turns free-form user text into structured searches and
//! search results into a recommendation, sequenced by a small explicit
//! state machine:
//!
//! 1. **Intent extraction** (`extract`) - NL → `SearchRequest`, or a
//!    clarification question that pauses the turn
//! 2. **Provider aggregation** - delegated to `roomscout-providers`
//! 3. **Recommendation** (`recommend`) - deterministic cheapest pick
//!    plus LLM-generated prose
//! 4. **Sequencing** (`workflow`) - `run_turn`, which never fails:
//!    every fault becomes error text on the returned `WorkflowState`
//!
//! The LLM is strictly a translator and copywriter. It never picks the
//! winning listing; that decision is a deterministic price reduction.

pub mod extract;
pub mod llm;
pub mod recommend;
pub mod workflow;

pub use llm::{build_client, LlmClient, LlmError};
pub use workflow::HotelSearchWorkflow;
