//! Wizard data models — questionnaire answers, roadmap items, uploads, and
//! the aggregate wizard state.

use serde::{Deserialize, Serialize};

use super::step::Step;

/// Sectors offered by the questionnaire.
pub const SECTORS: [&str; 7] = [
    "EdTech",
    "FinTech",
    "E-Commerce",
    "HealthTech",
    "SaaS",
    "Gig Economy",
    "Other",
];

/// Location shown before the user picks one.
pub const DEFAULT_LOCATION: &str = "Delhi";

/// Team size assumed before the user answers.
pub const DEFAULT_EMPLOYEES: u32 = 2;

/// Legal form of the company being incorporated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntityType {
    #[default]
    #[serde(rename = "Private Limited")]
    PrivateLimited,
    #[serde(rename = "LLP")]
    Llp,
    #[serde(rename = "OPC")]
    Opc,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrivateLimited => write!(f, "Private Limited"),
            Self::Llp => write!(f, "LLP"),
            Self::Opc => write!(f, "OPC"),
        }
    }
}

/// Questionnaire answers. `sector` starts empty and is invalid until chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswers {
    pub sector: String,
    pub location: String,
    pub entity: EntityType,
    /// Expected team size in the first year, always at least 1.
    pub employees: u32,
}

impl Default for QuizAnswers {
    fn default() -> Self {
        Self {
            sector: String::new(),
            location: DEFAULT_LOCATION.to_string(),
            entity: EntityType::default(),
            employees: DEFAULT_EMPLOYEES,
        }
    }
}

impl QuizAnswers {
    /// Merge a partial update. Employee counts below 1 are clamped to 1.
    pub fn apply(&mut self, update: AnswersUpdate) {
        if let Some(sector) = update.sector {
            self.sector = sector.trim().to_string();
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(entity) = update.entity {
            self.entity = entity;
        }
        if let Some(employees) = update.employees {
            self.employees = employees.max(1);
        }
    }
}

/// A partial update to `QuizAnswers`; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswersUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<u32>,
}

/// Status of a roadmap task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoadmapStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
    /// Not applicable to this company; still listed.
    Skipped,
}

/// One regulatory or administrative task on the roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapItem {
    pub title: String,
    pub status: RoadmapStatus,
    pub estimated_days: u32,
}

/// A document handed over by the presentation layer. The bytes themselves
/// belong to the file-storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }
}

/// Confirmation returned by a successful registration filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationReceipt {
    pub registration_id: String,
    pub status: String,
}

/// Subscription offered on the compliance screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanOffer {
    pub name: &'static str,
    pub monthly_price_inr: u32,
    pub features: &'static [&'static str],
}

/// The plan recommended once incorporation is filed.
pub const RECOMMENDED_PLAN: PlanOffer = PlanOffer {
    name: "Pro",
    monthly_price_inr: 499,
    features: &["Unlimited filings", "Priority support", "Fraud shield"],
};

/// Everything the presentation layer needs to render the current step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WizardState {
    pub step: Step,
    pub answers: QuizAnswers,
    /// Empty until the wizard first enters the roadmap step.
    pub roadmap: Vec<RoadmapItem>,
    pub files: Vec<UploadedFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True only while a backend call is pending.
    pub busy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<RegistrationReceipt>,
}
