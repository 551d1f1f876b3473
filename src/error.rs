use thiserror::Error;

/// Why the form was rejected before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Error: Por favor, ingrese todos los valores.")]
    MissingValue { field: &'static str },
    #[error("Error: Los valores ingresados deben ser numéricos.")]
    NotNumeric { field: &'static str, raw: String },
}

impl ValidationError {
    /// Name of the offending form field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingValue { field } | ValidationError::NotNumeric { field, .. } => *field,
        }
    }
}

/// Everything that can stop a simulation run.
///
/// `Display` yields the bare detail text; the orchestrator wraps it into the
/// user-facing status line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Non-2xx reply carrying the service's own message.
    #[error("{message}")]
    Service { status: u16, message: String },
    /// Network failure or a body that was not the expected JSON.
    #[error("{0}")]
    Transport(String),
}

impl SimulationError {
    pub fn transport<E: core::fmt::Display>(e: E) -> Self {
        SimulationError::Transport(e.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SimulationError::Validation(_))
    }
}
