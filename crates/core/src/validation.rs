//! Client-side form validation
//!
//! Schema checks that gate network calls: a payload that fails here is
//! rejected before any request is dispatched.

use crate::types::{EstablishmentCreate, EstablishmentPatch, LoginRequest};

/// A single field violation with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// One or more schema violations for a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.messages().join("; "))]
pub struct ValidationError {
    pub violations: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldError>) -> Self {
        Self { violations }
    }

    /// The user-facing messages, in field order.
    pub fn messages(&self) -> Vec<&str> {
        self.violations
            .iter()
            .map(|violation| violation.message.as_str())
            .collect()
    }
}

/// Trait for payloads validated before dispatch
pub trait Validate {
    /// Returns Ok(()) if valid, or the violations found
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let violation = validators::not_empty(
            &self.username,
            "username",
            "El nombre de usuario es obligatorio",
        )
        .or_else(|| {
            validators::not_empty(&self.password, "password", "La contraseña es obligatoria")
        });

        match violation {
            Some(violation) => Err(ValidationError::new(vec![violation])),
            None => Ok(()),
        }
    }
}

impl Validate for EstablishmentCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        // First violation wins, like the login form.
        let violation = validators::not_empty(&self.name, "name", "El nombre es obligatorio")
            .or_else(|| {
                validators::not_empty(&self.address, "address", "La dirección es obligatoria")
            })
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|email| validators::email(email, "email"))
            })
            .or_else(|| {
                validators::not_empty(&self.location, "location", "La ubicación es obligatoria")
            });

        match violation {
            Some(violation) => Err(ValidationError::new(vec![violation])),
            None => Ok(()),
        }
    }
}

impl Validate for EstablishmentPatch {
    /// Lax partial validation: only fields present in the patch are
    /// checked, and every violation is collected.
    fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if let Some(name) = self.name.as_deref() {
            violations.extend(validators::not_empty(name, "name", "El nombre es obligatorio"));
        }
        if let Some(address) = self.address.as_deref() {
            violations.extend(validators::not_empty(
                address,
                "address",
                "La dirección es obligatoria",
            ));
        }
        if let Some(email) = self.email.as_deref() {
            violations.extend(validators::email(email, "email"));
        }
        if let Some(location) = self.location.as_deref() {
            violations.extend(validators::not_empty(
                location,
                "location",
                "La ubicación es obligatoria",
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

/// Common validation helpers
pub mod validators {
    use super::FieldError;

    /// Check that a string is not empty or whitespace
    pub fn not_empty(value: &str, field: &str, message: &str) -> Option<FieldError> {
        if value.trim().is_empty() {
            Some(FieldError::new(field, message))
        } else {
            None
        }
    }

    /// Basic email format check
    pub fn email(value: &str, field: &str) -> Option<FieldError> {
        if !value.contains('@') || value.split('@').count() != 2 {
            Some(FieldError::new(field, "Formato inválido"))
        } else {
            None
        }
    }
}
