//! Onboarding wizard — questionnaire, roadmap, document upload, and
//! registration filing.
//!
//! The controller owns one session's `WizardState` and walks it through the
//! fixed step sequence, consulting the step guards and the backend
//! collaborator on the way. Rendering lives outside this module; the REST
//! routes are the seam it is driven through.

pub mod backend;
pub mod controller;
pub mod model;
pub mod roadmap;
pub mod routes;
pub mod step;
pub mod validation;

pub use backend::{Operation, SimulatedBackend, TaskBackend};
pub use controller::{AdvanceOutcome, WizardController, WizardView};
pub use model::{
    AnswersUpdate, EntityType, QuizAnswers, RegistrationReceipt, RoadmapItem, RoadmapStatus,
    UploadedFile, WizardState,
};
pub use roadmap::RoadmapSummary;
pub use routes::{WizardRouteState, wizard_routes};
pub use step::Step;
