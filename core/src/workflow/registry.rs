// covenant/src/workflow/registry.rs

//! Workflows keyed by the type of context they run over, so a caller only
//! needs to build the context to dispatch the right flow.

use super::context_data::ContextData;
use super::control::WorkflowOutcome;
use super::definition::Workflow;
use crate::error::CovenantError;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

type Erased = Arc<dyn Any + Send + Sync>;

pub struct WorkflowRegistry<Err>
where
  Err: std::error::Error + From<CovenantError> + Send + Sync + 'static,
{
  // Each value is an `Arc<Workflow<TData, Err>>` stored under `TypeId::of::<TData>()`.
  workflows: RwLock<HashMap<TypeId, Erased>>,
  _err: std::marker::PhantomData<fn() -> Err>,
}

impl<Err> WorkflowRegistry<Err>
where
  Err: std::error::Error + From<CovenantError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      workflows: RwLock::new(HashMap::new()),
      _err: std::marker::PhantomData,
    }
  }

  /// Registers `workflow` for its context type, replacing any earlier one.
  pub fn register<TData>(&self, workflow: Workflow<TData, Err>)
  where
    TData: 'static + Send + Sync,
  {
    event!(
      Level::DEBUG,
      workflow = %workflow.name(),
      context_type = %std::any::type_name::<TData>(),
      "Registering workflow."
    );
    let erased: Erased = Arc::new(workflow);
    self.workflows.write().insert(TypeId::of::<TData>(), erased);
  }

  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.workflows.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the workflow registered for `TData`.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<WorkflowOutcome, Err>
  where
    TData: 'static + Send + Sync,
  {
    let erased = self.workflows.read().get(&TypeId::of::<TData>()).cloned();
    let workflow = erased
      .and_then(|w| w.downcast::<Workflow<TData, Err>>().ok())
      .ok_or_else(|| {
        let type_name = std::any::type_name::<TData>();
        event!(Level::ERROR, context_type = %type_name, "No workflow registered.");
        Err::from(CovenantError::WorkflowNotRegistered {
          type_name: type_name.to_string(),
        })
      })?;
    workflow.run(ctx_data).await
  }
}

impl<Err> Default for WorkflowRegistry<Err>
where
  Err: std::error::Error + From<CovenantError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
