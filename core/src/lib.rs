// covenant/src/lib.rs

//! Covenant: the domain core of the membership-registration and shop backend.
//!
//! - [`identifier`] issues registration codes (`RC-XXXX-XXXX`) and order
//!   numbers (`ORD-XXXXXX`); [`resolver`] turns them back into records.
//! - [`store`] defines one repository trait per entity and an in-memory backend.
//! - [`workflow`] runs submission flows as ordered steps, some of them best-effort.

pub mod error;
pub mod identifier;
pub mod models;
pub mod resolver;
pub mod store;
pub mod workflow;

pub use crate::error::{CovenantError, CovenantResult};
pub use crate::identifier::{
  issue_order_number, issue_registration_code, normalize_code, IdentifierSource, RandomIdentifiers,
};
pub use crate::resolver::{resolve_order, resolve_registration};
pub use crate::store::{ItemStore, MemoryStore, OrderStore, PaymentMethodStore, RegistrationStore, Stores};
pub use crate::workflow::{ContextData, StepControl, Workflow, WorkflowOutcome, WorkflowRegistry};
