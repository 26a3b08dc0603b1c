//! Backend collaborator — the seam behind which document upload and
//! registration filing live.
//!
//! `SimulatedBackend` stands in for the real service: it waits a fixed
//! latency and then resolves. A network client can implement `TaskBackend`
//! without the controller changing.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Datelike;
use rand::Rng;
use serde_json::{Value, json};

use crate::config::DEFAULT_SIMULATED_LATENCY;
use crate::error::WizardError;

/// Operations the wizard asks the backend to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    UploadDocuments,
    SubmitSpice,
    Other(String),
}

impl Operation {
    pub fn as_str(&self) -> &str {
        match self {
            Self::UploadDocuments => "upload-documents",
            Self::SubmitSpice => "submit-spice",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Async collaborator invoked by the controller on backend-bound steps.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Perform `operation` with `payload`. Failures carry a user-facing
    /// reason in `WizardError::Backend`.
    async fn invoke(&self, operation: &Operation, payload: Value) -> Result<Value, WizardError>;
}

/// Documents the simulated registry insists on.
const SIMULATED_MIN_DOCUMENTS: usize = 2;

/// Fixed-latency stand-in for the registration backend.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    latency: Duration,
}

impl SimulatedBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// A backend that resolves immediately, for tests.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    fn submit_spice(payload: &Value) -> Result<Value, WizardError> {
        let file_count = payload
            .get("files")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);
        if file_count < SIMULATED_MIN_DOCUMENTS {
            return Err(WizardError::Backend {
                operation: Operation::SubmitSpice.to_string(),
                reason: "PAN & Aadhaar required".to_string(),
            });
        }
        Ok(json!({
            "success": true,
            "registration_id": synthetic_registration_id(),
            "status": "Submitted",
        }))
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_LATENCY)
    }
}

#[async_trait]
impl TaskBackend for SimulatedBackend {
    async fn invoke(&self, operation: &Operation, payload: Value) -> Result<Value, WizardError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match operation {
            Operation::SubmitSpice => Self::submit_spice(&payload),
            Operation::UploadDocuments | Operation::Other(_) => Ok(json!({ "success": true })),
        }
    }
}

/// Corporate identity number shaped like `U72900DL2026PTC123456`.
fn synthetic_registration_id() -> String {
    let year = chrono::Utc::now().year();
    let serial: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("U72900DL{year}PTC{serial:06}")
}
