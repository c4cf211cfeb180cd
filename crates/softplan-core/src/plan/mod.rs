//! Plan management: form drafts, validation, and the service layer.

pub mod draft;
pub mod service;

pub use draft::{ExpiryPolicy, PlanDraft, TimeOption, ValidationErrors, validate};
pub use service::{DeleteRequest, PlanError, PlanService, display_date};
