//! Instruction text for both classification flows.

use chrono::NaiveDate;
use vetkit_core::{ISO_MIN_DAYS_REMAINING, REQUIRED_DOCUMENTS};

/// Marker inserted between documents when a batch is concatenated into a
/// single request payload.
pub const DOCUMENT_SEPARATOR: &str = "\n\n=== NEXT DOCUMENT ===\n";

/// Build the checklist-audit instruction for a given audit date.
///
/// The instruction embeds the date, the full catalog verbatim and the
/// 180-day ISO validity rule, mandates translation of non-English content,
/// and pins the exact JSON shape the normalizer expects.
#[must_use = "returns the instruction sent with each audit batch"]
pub fn checklist_audit_prompt(audit_date: NaiveDate) -> String {
    let today = audit_date.format("%Y-%m-%d");
    // The catalog must appear verbatim: missing-set removal is an exact
    // string match against what the model echoes back.
    let catalog = serde_json::to_string(&REQUIRED_DOCUMENTS.as_slice())
        .unwrap_or_else(|_| String::from("[]"));

    format!(
        r#"Today is {today}. You are a vendor submission document analyzer.
Extract data from the documents below and translate it if it is not in English.
Classify each document using this list and no other categories: {catalog}

Compliance Rule: ISO certificates must be valid for at least {ISO_MIN_DAYS_REMAINING} days from {today}.

Return ONLY a JSON object with this EXACT structure:
{{
    "iso_analysis": [
        {{
            "standard": "ISO 9001",
            "expiry_date": "YYYY-MM-DD",
            "days_remaining": 0,
            "compliance_status": "Pass/Fail",
            "confidence_score": 0.9
        }}
    ],
    "found_documents": [
        {{"filename": "name.pdf", "Type": "Category from list", "Status": "Valid"}}
    ],
    "wras_analysis": {{
        "found": false,
        "wras_id": "N/A",
        "manufacturer_pdf": "N/A"
    }}
}}"#
    )
}

/// Instruction for the vendor compliance-table flow.
///
/// Sent together with one whole PDF so the model keeps full visual context
/// per page; a handwritten tick next to a section counts as "Comply" even
/// without matching text.
pub const VENDOR_TABLE_PROMPT: &str = r#"You are a Technical QA Engineer reviewing a scanned Vendor Specification Document.

**YOUR TASK:**
Look at the document image/PDF and extract a comprehensive Compliance Table.

**INPUT DATA:**
The document contains a list of "APPLICABLE STANDARDS" (BS EN, ISO, etc.) and specific sections (Climatic Data, Design Considerations, Materials).
Next to each item, the vendor has written a response (e.g., "Comply", "Noncomply", "Not related") or used a **handwritten tick/check mark**.

**RULES FOR EXTRACTION:**
1. **Identify every Standard** (e.g., BS EN 558-1, ISO 9001) and **Key Section** (Climatic Data, Scope, etc.).
2. **Determine Status:**
   - If text says "Comply", "Included", or has a positive context -> **"Comply"**.
   - If text says "Noncomply", "Not related", "Excluded" -> **"Not Comply"**.
   - **CRITICAL:** If you see a **handwritten tick or check mark** next to a section (especially Climatic Data/Design Considerations) -> Mark as **"Comply"**.
3. **Generate Remark:**
   - If "Not Comply", explain the deviation (e.g., "Vendor excludes galvanization standard").
   - If "Comply" but with a note (e.g., "Comply (Ductile Iron used)"), include that note.

**OUTPUT FORMAT (JSON ARRAY):**
[
    {"Standard_Section": "BS EN 558-1", "Status": "Comply", "Remark": "Face-to-face dimensions for valves"},
    {"Standard_Section": "BS EN ISO 1461", "Status": "Not Comply", "Remark": "Vendor states 'Not related', deviating from galvanization requirement"}
]"#;
