//! Compliance table rows for the vendor-table extraction flow.
//!
//! The multimodal model returns a JSON array of rows describing how the
//! vendor responded to each applicable standard or specification section.
//! Unlike the checklist audit, a malformed response here is an error the
//! caller surfaces to the operator; the run itself still completes with an
//! empty table.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::response::extract_json;

/// One row of the extracted vendor compliance table.
///
/// Field names serialize with the exact headers the CSV export promises:
/// `Standard_Section`, `Status`, `Remark`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorRow {
    /// Standard or specification section, e.g. "BS EN 558-1"
    #[serde(rename = "Standard_Section")]
    pub standard_section: String,
    /// Vendor-declared status, "Comply" or "Not Comply"
    #[serde(rename = "Status")]
    pub status: String,
    /// Deviation note or qualifying remark
    #[serde(rename = "Remark")]
    pub remark: String,
}

impl VendorRow {
    /// True when the status declares compliance.
    #[must_use = "returns whether the row declares compliance"]
    pub fn is_comply(&self) -> bool {
        self.status.contains("Comply") && !self.status.contains("Not")
    }
}

/// Failure to turn a model response into table rows.
#[derive(Debug, Error)]
pub enum VendorTableError {
    /// The response body was not valid JSON
    #[error("model response was not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The response parsed, but not as a JSON array of rows
    #[error("model response was not a JSON array of table rows")]
    NotAnArray,
}

/// Parse a raw model response into vendor table rows.
///
/// Code fences are stripped before parsing. The response must be a JSON
/// array; each element deserializes leniently (missing fields default to
/// empty strings).
///
/// # Errors
///
/// Returns an error if the body is not valid JSON or is not an array.
pub fn parse_vendor_table(text: &str) -> Result<Vec<VendorRow>, VendorTableError> {
    let json = extract_json(text);
    let value: Value = serde_json::from_str(&json)?;

    if !value.is_array() {
        return Err(VendorTableError::NotAnArray);
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_array() {
        let body = r#"```json
        [{"Standard_Section": "BS EN 558-1", "Status": "Comply", "Remark": "Face-to-face dimensions"},
         {"Standard_Section": "BS EN ISO 1461", "Status": "Not Comply", "Remark": "Vendor excludes galvanization"}]
        ```"#;

        let rows = parse_vendor_table(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_comply());
        assert!(!rows[1].is_comply());
    }

    #[test]
    fn empty_array_is_not_an_error() {
        assert!(parse_vendor_table("[]").unwrap().is_empty());
    }

    #[test]
    fn object_response_is_rejected() {
        assert!(matches!(
            parse_vendor_table(r#"{"Status": "Comply"}"#),
            Err(VendorTableError::NotAnArray)
        ));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            parse_vendor_table("the vendor complies with everything"),
            Err(VendorTableError::InvalidJson(_))
        ));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let rows = parse_vendor_table(r#"[{"Standard_Section": "Climatic Data"}]"#).unwrap();
        assert_eq!(rows[0].standard_section, "Climatic Data");
        assert_eq!(rows[0].status, "");
        assert!(!rows[0].is_comply());
    }

    #[test]
    fn csv_headers_match_contract() {
        let row = VendorRow {
            standard_section: "ISO 9001".to_string(),
            status: "Comply".to_string(),
            remark: "QMS certificate sighted".to_string(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("Standard_Section").is_some());
        assert!(json.get("Status").is_some());
        assert!(json.get("Remark").is_some());
    }
}
