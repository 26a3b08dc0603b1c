//! ReguEase — guided company-incorporation onboarding.

pub mod config;
pub mod error;
pub mod wizard;
