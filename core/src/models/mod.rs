// covenant/src/models/mod.rs

//! Records persisted by the stores, plus the request-side shapes used to create them.

pub mod item;
pub mod order;
pub mod payment_method;
pub mod registration;

pub use item::{Item, ItemSummary, NewItem};
pub use order::{NewOrder, Order, OrderDetails, OrderStatus, RegistrantSummary};
pub use payment_method::{NewPaymentMethod, PaymentMethod, PaymentMethodPatch, PublicPaymentMethod};
pub use registration::{NewRegistration, Registration, RegistrationStatus};
