//! # vetkit-pipeline
//!
//! Orchestration of one audit run:
//!
//! ```text
//! files ──► extracted texts ──► batches ──► per-batch results ──► report
//!        (parallel, ordered)   (chunked)   (sequential calls)    (folded)
//! ```
//!
//! [`run_audit`] is the single entry point: it owns the run-scoped
//! [`AuditReport`] from creation to return, so callers decide what (if
//! anything) to retain - there is no ambient session state. Classification
//! is sequential by design: batch *i+1* never starts before batch *i*'s
//! result has been folded in.
//!
//! The classifier sits behind the [`BatchClassifier`] seam so the folding
//! loop is testable without a network.

use chrono::{NaiveDate, Utc};
use std::future::Future;
use std::time::Instant;
use tracing::{info, warn};

use vetkit_core::{batches, AuditReport, ClassifierResult, VendorRow, DEFAULT_BATCH_SIZE};
use vetkit_llm::GeminiClient;
use vetkit_ocr::{extract_text, DocumentBlob, ExtractionRunner};

/// Knobs for one audit run. Defaults match the production policy; tests
/// and callers with special context limits can override.
#[derive(Debug, Clone, Copy)]
pub struct AuditOptions {
    /// Documents per classification request
    pub batch_size: usize,
    /// OCR worker override; `None` means host parallelism
    pub workers: Option<usize>,
    /// Audit date override; `None` means today (UTC)
    pub audit_date: Option<NaiveDate>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            workers: None,
            audit_date: None,
        }
    }
}

/// Classification seam: one batch of extracted texts in, one normalized
/// result out. Implementations absorb their own failures - the pipeline
/// never sees an error, only an empty result.
pub trait BatchClassifier {
    /// Classify one batch of extracted document texts.
    fn classify(
        &self,
        batch: &[String],
        audit_date: NaiveDate,
    ) -> impl Future<Output = ClassifierResult> + Send;
}

impl BatchClassifier for GeminiClient {
    fn classify(
        &self,
        batch: &[String],
        audit_date: NaiveDate,
    ) -> impl Future<Output = ClassifierResult> + Send {
        self.classify_batch(batch, audit_date)
    }
}

/// Run a full checklist audit over a set of uploaded files.
///
/// Extraction fans out over a bounded worker pool and preserves file
/// order; classification and folding then run sequentially, one batch
/// after another. Every failure mode degrades (error-as-text extraction,
/// empty batch results) rather than aborting, so this always returns a
/// report.
pub async fn run_audit<C: BatchClassifier>(
    files: &[DocumentBlob],
    classifier: &C,
    options: &AuditOptions,
) -> AuditReport {
    let start = Instant::now();

    let runner = match options.workers {
        Some(workers) => ExtractionRunner::new().with_workers(workers),
        None => ExtractionRunner::new(),
    };
    let texts = runner.run(files, extract_text);

    let mut report = classify_texts(&texts, classifier, options).await;
    report.set_elapsed(start.elapsed());

    info!(
        "audit complete: {} batches, {} found, {} missing, {:.2}s",
        report.batches_processed,
        report.found_documents.len(),
        report.missing_documents.len(),
        report.elapsed_secs
    );
    report
}

/// Classify already-extracted texts and fold the results into a report.
///
/// Split out of [`run_audit`] so aggregation order and resilience are
/// testable without OCR or a live model.
pub async fn classify_texts<C: BatchClassifier>(
    texts: &[String],
    classifier: &C,
    options: &AuditOptions,
) -> AuditReport {
    let audit_date = options
        .audit_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let mut report = AuditReport::new();
    for (index, batch) in batches(texts, options.batch_size).enumerate() {
        info!("classifying batch {} ({} documents)", index + 1, batch.len());
        let result = classifier.classify(batch, audit_date).await;
        if result.is_empty() {
            warn!("batch {} contributed nothing", index + 1);
        }
        report.fold(result);
    }
    report
}

/// Extract the vendor compliance table from a single PDF.
///
/// Thin passthrough kept here so both flows share one entry-point crate.
///
/// # Errors
///
/// Propagates remote-call and parse failures for the caller to surface;
/// the caller continues with an empty table.
pub async fn extract_vendor_table(
    client: &GeminiClient,
    pdf_bytes: &[u8],
) -> anyhow::Result<Vec<VendorRow>> {
    client.extract_vendor_table(pdf_bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use vetkit_core::{BatchReport, FoundDocument, WrasFinding, REQUIRED_DOCUMENTS};

    /// Replays canned results in order and records the batches it saw.
    struct ScriptedClassifier {
        results: Mutex<VecDeque<ClassifierResult>>,
        seen: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedClassifier {
        fn new(results: Vec<ClassifierResult>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl BatchClassifier for ScriptedClassifier {
        fn classify(
            &self,
            batch: &[String],
            _audit_date: NaiveDate,
        ) -> impl Future<Output = ClassifierResult> + Send {
            self.seen.lock().unwrap().push(batch.to_vec());
            let result = self
                .results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(ClassifierResult::Empty);
            std::future::ready(result)
        }
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("FILE_NAME: doc{i}.pdf\n...")).collect()
    }

    fn wras_result(found: bool, id: &str) -> ClassifierResult {
        ClassifierResult::Report(BatchReport {
            wras_analysis: WrasFinding {
                found,
                wras_id: id.to_string(),
                manufacturer_pdf: "approval.pdf".to_string(),
            },
            ..BatchReport::default()
        })
    }

    #[tokio::test]
    async fn batches_are_classified_in_order_with_default_size() {
        let classifier = ScriptedClassifier::new(vec![]);
        let input = texts(23);

        classify_texts(&input, &classifier, &AuditOptions::default()).await;

        let seen = classifier.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].len(), 10);
        assert_eq!(seen[2].len(), 3);
        assert_eq!(seen[0][0], input[0]);
        assert_eq!(seen[2][2], input[22]);
    }

    #[tokio::test]
    async fn empty_batches_do_not_abort_the_run() {
        let found = ClassifierResult::Report(BatchReport {
            found_documents: vec![FoundDocument {
                filename: "layout.pdf".to_string(),
                doc_type: REQUIRED_DOCUMENTS[5].to_string(),
                status: "Valid".to_string(),
            }],
            ..BatchReport::default()
        });
        let classifier =
            ScriptedClassifier::new(vec![ClassifierResult::Empty, found, ClassifierResult::Empty]);

        let options = AuditOptions {
            batch_size: 1,
            ..AuditOptions::default()
        };
        let report = classify_texts(&texts(3), &classifier, &options).await;

        assert_eq!(report.batches_processed, 1);
        assert_eq!(report.found_documents.len(), 1);
        assert_eq!(
            report.missing_documents.len(),
            REQUIRED_DOCUMENTS.len() - 1
        );
    }

    #[tokio::test]
    async fn wras_folding_is_last_true_wins_across_batches() {
        let classifier = ScriptedClassifier::new(vec![
            wras_result(false, "ignored"),
            wras_result(true, "A"),
            wras_result(false, "ignored"),
            wras_result(true, "B"),
        ]);

        let options = AuditOptions {
            batch_size: 1,
            ..AuditOptions::default()
        };
        let report = classify_texts(&texts(4), &classifier, &options).await;

        assert_eq!(report.wras.wras_id, "B");
    }

    #[tokio::test]
    async fn no_texts_means_no_classifier_calls() {
        let classifier = ScriptedClassifier::new(vec![]);
        let report = classify_texts(&[], &classifier, &AuditOptions::default()).await;

        assert!(classifier.seen.lock().unwrap().is_empty());
        assert_eq!(report.batches_processed, 0);
        assert_eq!(report.missing_documents.len(), REQUIRED_DOCUMENTS.len());
    }
}
