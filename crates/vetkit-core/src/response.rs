//! Normalizing raw model responses into classifier results.
//!
//! The remote model is asked for a JSON object, but responses arrive as
//! plain text that may be wrapped in markdown code fences, may be an array
//! wrapping the object, or may not parse at all. Normalization is an
//! explicit step with a closed outcome: either a well-formed
//! [`BatchReport`] or [`ClassifierResult::Empty`]. A batch that normalizes
//! to `Empty` simply contributes nothing to the run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::report::{FoundDocument, IsoFinding, WrasFinding};

/// The structured payload of one classified batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchReport {
    /// ISO certificates detected in this batch
    pub iso_analysis: Vec<IsoFinding>,
    /// Documents matched to checklist categories in this batch
    pub found_documents: Vec<FoundDocument>,
    /// WRAS detection claim for this batch
    pub wras_analysis: WrasFinding,
}

/// Outcome of normalizing one model response.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierResult {
    /// The response was missing, malformed, or not an object
    Empty,
    /// The response parsed into a well-formed batch report
    Report(BatchReport),
}

impl ClassifierResult {
    /// Normalize a raw response body into a classifier result.
    ///
    /// Code fences are stripped first. An array-shaped response is coerced
    /// to its first element. Anything that still fails to parse as a
    /// [`BatchReport`] object becomes [`Self::Empty`]; normalization never
    /// errors.
    #[must_use = "normalization result decides the batch's contribution"]
    pub fn from_response_text(text: &str) -> Self {
        let json = extract_json(text);

        let value: Value = match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(_) => return Self::Empty,
        };

        let object = match value {
            Value::Object(_) => value,
            Value::Array(mut items) => {
                if items.is_empty() {
                    return Self::Empty;
                }
                let first = items.remove(0);
                if first.is_object() {
                    first
                } else {
                    return Self::Empty;
                }
            }
            _ => return Self::Empty,
        };

        match serde_json::from_value::<BatchReport>(object) {
            Ok(report) => Self::Report(report),
            Err(_) => Self::Empty,
        }
    }

    /// True if this result carries no batch report.
    #[inline]
    #[must_use = "returns whether the result is empty"]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Extract JSON from a response body, handling markdown code fences.
///
/// Falls back to the outermost `{...}` object or `[...]` array when the
/// body carries prose around the JSON.
#[must_use = "returns the candidate JSON text"]
pub fn extract_json(text: &str) -> String {
    let text = text.trim();

    // Handle ```json ... ``` wrapper
    if text.starts_with("```") {
        if let Some(start) = text.find('\n') {
            let after_first_line = &text[start + 1..];
            if let Some(end) = after_first_line.rfind("```") {
                return after_first_line[..end].trim().to_string();
            }
        }
    }

    let object_span = text
        .find('{')
        .and_then(|s| text.rfind('}').map(|e| (s, e)));
    let array_span = text
        .find('[')
        .and_then(|s| text.rfind(']').map(|e| (s, e)));

    // Prefer whichever delimiter opens first
    let span = match (object_span, array_span) {
        (Some(obj), Some(arr)) => Some(if arr.0 < obj.0 { arr } else { obj }),
        (obj, arr) => obj.or(arr),
    };

    match span {
        Some((start, end)) if end > start => text[start..=end].to_string(),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_code_fence() {
        let body = "```json\n{\"iso_analysis\": []}\n```";
        assert_eq!(extract_json(body), "{\"iso_analysis\": []}");
    }

    #[test]
    fn strips_bare_code_fence() {
        let body = "```\n[1, 2]\n```";
        assert_eq!(extract_json(body), "[1, 2]");
    }

    #[test]
    fn extracts_object_embedded_in_prose() {
        let body = "Here is the report: {\"found_documents\": []} hope it helps";
        assert_eq!(extract_json(body), "{\"found_documents\": []}");
    }

    #[test]
    fn well_formed_object_becomes_report() {
        let body = r#"{
            "iso_analysis": [{"standard": "ISO 9001", "expiry_date": "2027-06-01",
                              "days_remaining": 300, "compliance_status": "Pass",
                              "confidence_score": 0.95}],
            "found_documents": [{"filename": "a.pdf", "Type": "6- Factory Layout chart.", "Status": "Valid"}],
            "wras_analysis": {"found": true, "wras_id": "W-123", "manufacturer_pdf": "a.pdf"}
        }"#;

        let result = ClassifierResult::from_response_text(body);
        let ClassifierResult::Report(report) = result else {
            panic!("expected a report");
        };
        assert_eq!(report.iso_analysis.len(), 1);
        assert_eq!(report.found_documents[0].doc_type, "6- Factory Layout chart.");
        assert!(report.wras_analysis.found);
    }

    #[test]
    fn array_wrapped_object_is_coerced_to_first_element() {
        let body = r#"[{"found_documents": [{"filename": "x.pdf", "Type": "t", "Status": "Valid"}]},
                       {"found_documents": []}]"#;

        let ClassifierResult::Report(report) = ClassifierResult::from_response_text(body) else {
            panic!("expected a report");
        };
        assert_eq!(report.found_documents.len(), 1);
    }

    #[test]
    fn missing_fields_default_instead_of_failing() {
        let ClassifierResult::Report(report) = ClassifierResult::from_response_text("{}") else {
            panic!("expected a report");
        };
        assert!(report.iso_analysis.is_empty());
        assert!(report.found_documents.is_empty());
        assert!(!report.wras_analysis.found);
        assert_eq!(report.wras_analysis.wras_id, "N/A");
    }

    #[test]
    fn garbage_normalizes_to_empty() {
        assert!(ClassifierResult::from_response_text("not json at all").is_empty());
        assert!(ClassifierResult::from_response_text("").is_empty());
        assert!(ClassifierResult::from_response_text("42").is_empty());
        assert!(ClassifierResult::from_response_text("[]").is_empty());
        assert!(ClassifierResult::from_response_text("[1, 2, 3]").is_empty());
    }
}
