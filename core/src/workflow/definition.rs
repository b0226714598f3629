// covenant/src/workflow/definition.rs

use super::context_data::ContextData;
use super::control::StepControl;
use crate::error::CovenantError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// A boxed async step handler. It receives a clone of the shared context and
/// must release any lock guard before awaiting.
pub type Handler<TData, Err> =
  Box<dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Step {
  pub name: String,
  /// Failures are logged and absorbed; a missing handler is skipped.
  pub best_effort: bool,
}

/// A named, ordered list of steps and the handlers attached to them.
pub struct Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<CovenantError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<Step>,
  pub(crate) handlers: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<CovenantError> + Send + Sync + 'static,
{
  /// `steps` are `(name, best_effort)` pairs in execution order.
  pub fn new(name: &str, steps: &[(&str, bool)]) -> Self {
    Self {
      name: name.to_string(),
      steps: steps
        .iter()
        .map(|(step_name, best_effort)| Step {
          name: (*step_name).to_string(),
          best_effort: *best_effort,
        })
        .collect(),
      handlers: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Attaches a handler to `step_name`. Handlers of one step run in
  /// registration order.
  ///
  /// # Panics
  /// If the step was not declared. That is a wiring mistake, not a runtime condition.
  pub fn on<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "Workflow '{}' setup error: step '{}' is not declared.",
        self.name, step_name
      );
    }
    let handler: Handler<TData, Err> = Box::new(move |ctx_data| {
      let fut = handler_fn(ctx_data);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self.handlers.entry(step_name.to_string()).or_default().push(handler);
  }
}
