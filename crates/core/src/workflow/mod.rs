pub mod stage;
pub mod state;
