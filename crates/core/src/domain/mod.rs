pub mod conversation;
pub mod listing;
pub mod search;
