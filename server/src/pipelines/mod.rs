// covenant_server/src/pipelines/mod.rs

//! Defines and registers the submission workflows.

use crate::errors::AppError;
use covenant::WorkflowRegistry;

pub mod common_steps;
pub mod contexts;

pub mod order_pipeline;
pub mod registration_pipeline;

/// Registers every workflow with `registry`. Called once while building the app state.
pub fn register_all_pipelines(registry: &WorkflowRegistry<AppError>) {
  tracing::info!("Registering workflows...");

  registration_pipeline::register_registration_pipeline(registry);
  order_pipeline::register_order_pipeline(registry);

  tracing::info!("All application workflows registered.");
}
