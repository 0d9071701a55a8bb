//! Padron core types and utilities

pub mod error;
pub mod types;
pub mod validation;

pub use error::ApiError;
pub use types::{
    Establishment, EstablishmentCreate, EstablishmentPatch, LocationNode, LoginRequest, Paginated,
};
pub use validation::{Validate, ValidationError};
