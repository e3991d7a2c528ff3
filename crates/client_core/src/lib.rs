//! Client-side logic of the order-entry modal: form state, catalog lookups,
//! order submission and deletion against the `/product` backend.

pub mod controller;
pub mod error;
pub mod form;
pub mod service;

pub use controller::{
    DeleteOutcome, FormEvent, FormSnapshot, LookupOutcome, ModalState, OrderFormController,
    SubmitOutcome,
};
pub use error::{InvalidField, OrderError, UserAction, ValidationError};
pub use form::{compute_total, FormState};
pub use service::{HttpProductService, ProductService};
