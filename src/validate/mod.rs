//! Decision validation
//!
//! Gatekeeper between proposals and the execution gateway

mod types;
mod validator;

pub use types::{OrderSpec, RejectReason, ValidationResult};
pub use validator::DecisionValidator;
