//! Roadmap generation — maps questionnaire answers to the ordered list of
//! registration tasks.

use serde::Serialize;

use super::model::{QuizAnswers, RoadmapItem, RoadmapStatus};

/// Sector for which Startup India recognition is currently blocked.
const BLOCKED_DPIIT_SECTOR: &str = "FinTech";

/// Team size from which PF / ESIC registration applies.
const PF_ESIC_MIN_EMPLOYEES: u32 = 10;

pub const NAME_APPROVAL: &str = "Name Approval (RUN / PART-I)";
pub const DIRECTOR_DIN_DSC: &str = "Director DIN & DSC";
pub const SPICE_SUBMISSION: &str = "SPICe+ Form Submission";
pub const DPIIT_RECOGNITION: &str = "DPIIT / Startup India Recognition";
pub const GST_REGISTRATION: &str = "GST Registration";
pub const PF_ESIC: &str = "PF / ESIC (if ≥10 employees)";
pub const SHOPS_ESTABLISHMENT: &str = "Shops & Establishment (state)";

/// Build the roadmap for a set of answers. Pure and deterministic.
pub fn generate(answers: &QuizAnswers) -> Vec<RoadmapItem> {
    let dpiit = if answers.sector == BLOCKED_DPIIT_SECTOR {
        RoadmapStatus::Blocked
    } else {
        RoadmapStatus::Pending
    };
    let pf_esic = if answers.employees >= PF_ESIC_MIN_EMPLOYEES {
        RoadmapStatus::Pending
    } else {
        RoadmapStatus::Skipped
    };

    [
        (NAME_APPROVAL, RoadmapStatus::Pending, 2),
        (DIRECTOR_DIN_DSC, RoadmapStatus::Pending, 3),
        (SPICE_SUBMISSION, RoadmapStatus::Pending, 7),
        (DPIIT_RECOGNITION, dpiit, 10),
        (GST_REGISTRATION, RoadmapStatus::Pending, 3),
        (PF_ESIC, pf_esic, 5),
        (SHOPS_ESTABLISHMENT, RoadmapStatus::Pending, 7),
    ]
    .into_iter()
    .map(|(title, status, estimated_days)| RoadmapItem {
        title: title.to_string(),
        status,
        estimated_days,
    })
    .collect()
}

/// Duration totals for a roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RoadmapSummary {
    /// Sum over every item, skipped ones included.
    pub total_days: u32,
    /// Sum over items that are not skipped.
    pub active_days: u32,
    pub blocked_items: usize,
}

impl RoadmapSummary {
    pub fn of(items: &[RoadmapItem]) -> Self {
        items.iter().fold(Self::default(), |mut acc, item| {
            acc.total_days += item.estimated_days;
            match item.status {
                RoadmapStatus::Skipped => {}
                RoadmapStatus::Blocked => {
                    acc.active_days += item.estimated_days;
                    acc.blocked_items += 1;
                }
                _ => acc.active_days += item.estimated_days,
            }
            acc
        })
    }
}
