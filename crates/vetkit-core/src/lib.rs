//! # vetkit-core
//!
//! Data model and aggregation logic for vendor submission compliance audits.
//!
//! This crate holds everything that does not touch the network or the
//! filesystem:
//!
//! - [`checklist`] - The fixed catalog of required document categories
//! - [`batch`] - Partitioning extracted texts into bounded-size batches
//! - [`response`] - Normalizing raw model responses into [`ClassifierResult`]
//! - [`report`] - The per-run [`AuditReport`] and its batch fold rules
//! - [`vendor`] - Compliance table rows for the vendor-table flow
//!
//! ## Aggregation overview
//!
//! A run produces one [`AuditReport`]. Each classified batch is folded in
//! arrival order:
//!
//! 1. ISO findings and found-document records are appended as-is
//! 2. The WRAS singleton is replaced whenever a batch claims `found: true`
//!    (last true claim wins)
//! 3. A catalog entry leaves the missing set the first time any found
//!    record declares exactly that category
//!
//! Batches whose response could not be normalized contribute nothing; the
//! run never aborts because of one bad batch.

pub mod batch;
pub mod checklist;
pub mod report;
pub mod response;
pub mod vendor;

pub use batch::{batches, DEFAULT_BATCH_SIZE};
pub use checklist::REQUIRED_DOCUMENTS;
pub use report::{
    AuditReport, ComplianceStatus, FoundDocument, IsoFinding, WrasFinding, ISO_MIN_DAYS_REMAINING,
};
pub use response::{extract_json, BatchReport, ClassifierResult};
pub use vendor::{parse_vendor_table, VendorRow, VendorTableError};
