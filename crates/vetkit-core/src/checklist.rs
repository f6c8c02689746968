//! The fixed catalog of required document categories.
//!
//! Submissions are audited against this list: the catalog is embedded
//! verbatim in the classification instruction, and it seeds the
//! missing-documents set of every new [`crate::AuditReport`]. Matching is
//! exact string equality, so the entries here must never drift from the
//! strings the model is told to classify against.

/// Required document categories for a vendor submission, in checklist order.
pub const REQUIRED_DOCUMENTS: [&str; 14] = [
    "1- Fees application receipt copy.",
    "2- Nama water services vendor registeration certificates & Product Agency certificates or authorization letter from Factory for local distributor ratified from Oman embassy.",
    "3- Certificate of incorporation of the firm (Factory & Foundry).",
    "4- Manufacturing Process flow chart of product and list of out sourced process / operation if applicable including Outsourcing name & address.",
    "5-Valid copies certificates of (ISO 9001, ISO 45001 & ISO 14001).",
    "6- Factory Layout chart.",
    "7-Factory Organizational structure, Hierarchy levels, Ownership details.",
    "8- Product Compliance Statement with reference to Nama water services specifications (with supports documents accordingly).",
    "9- Product Technical datasheets.",
    "10- Omanisation details from Ministry of Labour.",
    "11- Product Independent Test certificates.",
    "12- Attestation of Sanitary Conformity (hygiene test including mechanical assessment for a full product certificate at 50 degrees Celsiusfull to used in drinking water)",
    "13- Provide products Chemicals Composition of materials.",
    "14- Reference list of products used in Oman or any GCC projects with contact no. or emails of end user or clients.",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_fourteen_unique_entries() {
        assert_eq!(REQUIRED_DOCUMENTS.len(), 14);
        let unique: HashSet<&str> = REQUIRED_DOCUMENTS.iter().copied().collect();
        assert_eq!(unique.len(), REQUIRED_DOCUMENTS.len());
    }

    #[test]
    fn catalog_entries_are_nonempty() {
        for entry in REQUIRED_DOCUMENTS {
            assert!(!entry.trim().is_empty());
        }
    }
}
