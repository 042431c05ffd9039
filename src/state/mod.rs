pub mod diff;
pub mod state_model;
