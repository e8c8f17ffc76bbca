//! Server crate for the ShopGenie recommendation workflow.
//!
//! This crate contains the configuration layer and the orchestrator that
//! wires real service clients into the recommendation pipeline.

pub mod config;
pub mod orchestrator;

pub use config::{Config, ConfigError};
pub use orchestrator::{run_workflow, ShopOrchestrator};
