pub mod amount;
pub mod capability;
pub mod charge;
pub mod errors;
pub mod orchestrator;
pub mod provider;
pub mod reporter;
