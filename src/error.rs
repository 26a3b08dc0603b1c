//! Error types for ReguEase.

use crate::wizard::Step;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while driving the onboarding wizard.
///
/// None of these are fatal: the wizard stays in a consistent, resumable
/// state and the message is surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// User input does not satisfy a step guard.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The backend collaborator rejected an operation.
    #[error("Backend operation {operation} failed: {reason}")]
    Backend { operation: String, reason: String },

    /// The intent is not accepted in the current step.
    #[error("Cannot {action} while in step {step}")]
    WrongStep { action: String, step: Step },

    /// A submission is still pending; intents are handled one at a time.
    #[error("Cannot {action} while a submission is in progress")]
    Busy { action: String },
}

impl WizardError {
    /// The short message stored in `WizardState::error` for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(reason) => reason.clone(),
            Self::Backend { reason, .. } => reason.clone(),
            Self::WrongStep { .. } | Self::Busy { .. } => self.to_string(),
        }
    }
}
