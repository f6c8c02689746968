//! The per-run audit report and its batch fold rules.
//!
//! An [`AuditReport`] is created empty at the start of a run, mutated once
//! per classified batch in arrival order, and handed to the presentation
//! layer read-only when the run completes. It is the only mutable state in
//! a run and is owned by a single sequential control flow, so no locking
//! is involved.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::checklist::REQUIRED_DOCUMENTS;
use crate::response::ClassifierResult;

/// Minimum days an ISO certificate must remain valid to pass the audit.
///
/// The boundary is inclusive on the pass side: exactly 180 days remaining
/// is a pass, 179 is a fail.
pub const ISO_MIN_DAYS_REMAINING: i64 = 180;

/// Pass/fail verdict for one ISO certificate under the 180-day rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum ComplianceStatus {
    /// Certificate is valid for at least [`ISO_MIN_DAYS_REMAINING`] more days
    Pass,
    /// Certificate is expired, expiring soon, or its expiry is unknown
    #[default]
    Fail,
}

impl ComplianceStatus {
    /// Derive the verdict from the number of days remaining before expiry.
    #[inline]
    #[must_use = "returns the derived pass/fail verdict"]
    pub const fn for_days_remaining(days: i64) -> Self {
        if days >= ISO_MIN_DAYS_REMAINING {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

// Models phrase the verdict loosely ("Pass", "PASS", "Pass/Fail"); anything
// that does not clearly claim a pass is a fail.
impl From<String> for ComplianceStatus {
    fn from(s: String) -> Self {
        if s.to_lowercase().contains("pass") {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "Pass"),
            Self::Fail => write!(f, "Fail"),
        }
    }
}

/// One ISO certificate reported by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsoFinding {
    /// Standard name, e.g. "ISO 9001"
    pub standard: String,
    /// Expiry date as reported, "YYYY-MM-DD" or a free-text "Unknown"
    pub expiry_date: String,
    /// Days between the audit date and the expiry date
    pub days_remaining: i64,
    /// Verdict under the 180-day rule
    pub compliance_status: ComplianceStatus,
    /// Model confidence in this finding, 0.0 to 1.0
    pub confidence_score: f64,
}

impl IsoFinding {
    /// Re-derive the verdict from `days_remaining`.
    ///
    /// The model is asked to apply the 180-day rule itself, but the rule is
    /// enforced locally so the verdict cannot drift with prompt wording.
    #[must_use = "returns the finding with a locally derived verdict"]
    pub fn with_derived_status(mut self) -> Self {
        self.compliance_status = ComplianceStatus::for_days_remaining(self.days_remaining);
        self
    }
}

/// One uploaded document the classifier matched to a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundDocument {
    /// Source filename as echoed by the model
    pub filename: String,
    /// Declared category; removal from the missing set requires an exact
    /// match against a catalog entry
    #[serde(rename = "Type", alias = "type")]
    pub doc_type: String,
    /// Free-text validity note, e.g. "Valid"
    #[serde(rename = "Status", alias = "status")]
    pub status: String,
}

/// Whether a WRAS approval was detected anywhere in the submission.
///
/// At most one found instance is retained per run: a batch claiming
/// `found: true` replaces the previous value outright (last true claim
/// wins, fields are never merged).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrasFinding {
    /// True if a WRAS approval was detected in this batch
    pub found: bool,
    /// Approval identifier, "N/A" when not found
    pub wras_id: String,
    /// Source document carrying the approval, "N/A" when not found
    pub manufacturer_pdf: String,
}

impl Default for WrasFinding {
    fn default() -> Self {
        Self {
            found: false,
            wras_id: "N/A".to_string(),
            manufacturer_pdf: "N/A".to_string(),
        }
    }
}

/// Aggregate result of one audit run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// All ISO findings across batches, in arrival order
    pub iso_findings: Vec<IsoFinding>,
    /// All found-document records across batches, in arrival order
    pub found_documents: Vec<FoundDocument>,
    /// The retained WRAS singleton
    pub wras: WrasFinding,
    /// Catalog entries no found record has claimed yet, in catalog order
    pub missing_documents: Vec<String>,
    /// Number of well-formed batch results folded in
    pub batches_processed: usize,
    /// Wall-clock duration of the run in seconds
    #[serde(default)]
    pub elapsed_secs: f64,
}

impl AuditReport {
    /// Create an empty report with the full catalog still missing.
    #[must_use = "creates the report the run will fold batches into"]
    pub fn new() -> Self {
        Self {
            missing_documents: REQUIRED_DOCUMENTS.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    /// Fold one batch's classification result into the report.
    ///
    /// [`ClassifierResult::Empty`] contributes nothing. For a well-formed
    /// report: ISO findings and found documents are appended (verdicts
    /// re-derived, no de-duplication), the WRAS singleton is replaced when
    /// the batch claims `found: true`, and each found record's declared
    /// category removes its exact match from the missing set.
    pub fn fold(&mut self, result: ClassifierResult) {
        let batch = match result {
            ClassifierResult::Empty => return,
            ClassifierResult::Report(batch) => batch,
        };

        self.iso_findings.extend(
            batch
                .iso_analysis
                .into_iter()
                .map(IsoFinding::with_derived_status),
        );

        for doc in batch.found_documents {
            if let Some(pos) = self
                .missing_documents
                .iter()
                .position(|entry| *entry == doc.doc_type)
            {
                self.missing_documents.remove(pos);
            }
            self.found_documents.push(doc);
        }

        if batch.wras_analysis.found {
            self.wras = batch.wras_analysis;
        }

        self.batches_processed += 1;
    }

    /// Record the wall-clock duration of the run.
    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed_secs = elapsed.as_secs_f64();
    }
}
