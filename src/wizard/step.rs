//! Wizard step state machine — tracks which stage the user is in.

use serde::{Deserialize, Serialize};

/// The stages of the onboarding wizard.
///
/// Progresses linearly: Welcome → Quiz → Roadmap → Documents →
/// Incorporation → Compliance → Done. Only `reset` leaves `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Welcome,
    Quiz,
    Roadmap,
    Documents,
    Incorporation,
    Compliance,
    Done,
}

impl Step {
    /// All steps in display order.
    pub const ALL: [Step; 7] = [
        Step::Welcome,
        Step::Quiz,
        Step::Roadmap,
        Step::Documents,
        Step::Incorporation,
        Step::Compliance,
        Step::Done,
    ];

    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Step) -> bool {
        use Step::*;
        matches!(
            (self, target),
            (Welcome, Quiz)
                | (Quiz, Roadmap)
                | (Roadmap, Documents)
                | (Documents, Incorporation)
                | (Incorporation, Compliance)
                | (Compliance, Done)
                | (Done, Welcome)
        )
    }

    /// Whether this step is terminal (only `reset` leaves it).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The step `advance` moves to, if any.
    pub fn next(&self) -> Option<Step> {
        use Step::*;
        match self {
            Welcome => Some(Quiz),
            Quiz => Some(Roadmap),
            Roadmap => Some(Documents),
            Documents => Some(Incorporation),
            Incorporation => Some(Compliance),
            Compliance => Some(Done),
            Done => None,
        }
    }

    /// Progress bar percentage. `None` on the welcome and done screens,
    /// which show no progress bar.
    pub fn progress_percent(&self) -> Option<u8> {
        use Step::*;
        match self {
            Welcome | Done => None,
            Quiz => Some(20),
            Roadmap => Some(40),
            Documents => Some(60),
            Incorporation => Some(80),
            Compliance => Some(100),
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::Quiz => "quiz",
            Self::Roadmap => "roadmap",
            Self::Documents => "documents",
            Self::Incorporation => "incorporation",
            Self::Compliance => "compliance",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}
