//! Step guards. Each takes only the slice of state it needs and returns the
//! user-facing reason when advancing is not allowed.

use crate::error::WizardError;

pub const SECTOR_REQUIRED: &str = "Please select a sector";
pub const DOCUMENTS_REQUIRED: &str = "PAN & Aadhaar required";

/// Guard for `quiz → roadmap`.
pub fn check_sector(sector: &str) -> Result<(), WizardError> {
    if sector.trim().is_empty() {
        return Err(WizardError::Validation(SECTOR_REQUIRED.to_string()));
    }
    Ok(())
}

/// Guard for `documents → incorporation`. This is the single authoritative
/// document-count check.
pub fn check_documents(file_count: usize, min_documents: usize) -> Result<(), WizardError> {
    if file_count < min_documents.max(1) {
        return Err(WizardError::Validation(DOCUMENTS_REQUIRED.to_string()));
    }
    Ok(())
}
