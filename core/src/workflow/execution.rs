// covenant/src/workflow/execution.rs

use super::context_data::ContextData;
use super::control::{StepControl, WorkflowOutcome};
use super::definition::Workflow;
use crate::error::CovenantError;
use tracing::{event, instrument, Instrument, Level};

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<CovenantError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx_data`.
  ///
  /// A required step that fails ends the run with its error. A best-effort step
  /// that fails is logged and the run moves on to the next step.
  #[instrument(
    name = "Workflow::run",
    skip_all,
    fields(workflow = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<WorkflowOutcome, Err> {
    for (step_idx, step) in self.steps.iter().enumerate() {
      let handlers = match self.handlers.get(&step.name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ if step.best_effort => {
          event!(Level::DEBUG, step = %step.name, "Best-effort step has no handlers, skipping.");
          continue;
        }
        _ => {
          event!(Level::ERROR, step = %step.name, "Required step has no handlers.");
          return Err(Err::from(CovenantError::HandlerMissing {
            step_name: step.name.clone(),
          }));
        }
      };

      let step_span = tracing::info_span!(
        "workflow_step",
        step_name = %step.name,
        step_index = step_idx,
        best_effort = step.best_effort
      );

      for handler in handlers {
        match handler(ctx_data.clone()).instrument(step_span.clone()).await {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Halt) => {
            event!(Level::INFO, step = %step.name, "Workflow halted by step.");
            return Ok(WorkflowOutcome::Halted);
          }
          Err(e) if step.best_effort => {
            event!(Level::WARN, step = %step.name, error = %e, "Best-effort step failed; continuing.");
            break;
          }
          Err(e) => {
            event!(Level::ERROR, step = %step.name, error = %e, "Step failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Workflow completed.");
    Ok(WorkflowOutcome::Completed)
  }
}
