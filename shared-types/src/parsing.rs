use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Per-field confidence below which a value must be verified by a human.
///
/// The review badge colors on the client and the flagging logic here must
/// agree, so this is the only place the cutoff is defined.
pub const REVIEW_THRESHOLD: f32 = 0.70;

/// One extractable business-card attribute with its model-reported
/// confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactField {
    pub value: Option<String>,
    pub confidence: f32,
    pub needs_review: bool,
}

impl ContactField {
    /// Build a field from an extracted value and raw confidence.
    ///
    /// Empty or whitespace-only values are treated as absent. Confidence is
    /// clamped to [0, 1]; a confidence reported for an absent value is
    /// normalized to 0.0. `needs_review` is computed from the threshold.
    pub fn new(value: Option<String>, confidence: f32) -> Self {
        let value = value.filter(|v| !v.trim().is_empty());
        let confidence = if value.is_some() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            needs_review: value.is_some() && confidence < REVIEW_THRESHOLD,
            value,
            confidence,
        }
    }

    /// A field confirmed by a human, e.g. typed into the manual entry or
    /// review form. Absent values stay absent.
    pub fn verified(value: Option<String>) -> Self {
        let value = value.filter(|v| !v.trim().is_empty());
        let confidence = if value.is_some() { 1.0 } else { 0.0 };

        Self {
            value,
            confidence,
            needs_review: false,
        }
    }

    /// An absent field explicitly flagged for manual entry. Used when
    /// extraction failed outright and the whole form must be filled by hand.
    pub fn unverified() -> Self {
        Self {
            value: None,
            confidence: 0.0,
            needs_review: true,
        }
    }
}

/// The fixed set of attributes extracted from one business card.
///
/// Produced once per OCR submission and not mutated afterwards; corrections
/// go through a fresh instance built from the review form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ParsedContactData {
    pub first_name: ContactField,
    pub last_name: ContactField,
    pub email: ContactField,
    pub phone: ContactField,
    pub company: ContactField,
    pub title: ContactField,
    pub industry: ContactField,
    pub address: ContactField,
}

impl ParsedContactData {
    pub fn fields(&self) -> [&ContactField; 8] {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.company,
            &self.title,
            &self.industry,
            &self.address,
        ]
    }

    /// All fields absent and flagged, for routing to fully manual entry.
    pub fn unverified() -> Self {
        Self {
            first_name: ContactField::unverified(),
            last_name: ContactField::unverified(),
            email: ContactField::unverified(),
            phone: ContactField::unverified(),
            company: ContactField::unverified(),
            title: ContactField::unverified(),
            industry: ContactField::unverified(),
            address: ContactField::unverified(),
        }
    }

    /// Recompute every field's `needs_review` flag against
    /// [`REVIEW_THRESHOLD`]. Pure; the input is consumed and returned with
    /// only the flags changed.
    pub fn apply_review_threshold(mut self) -> Self {
        for field in [
            &mut self.first_name,
            &mut self.last_name,
            &mut self.email,
            &mut self.phone,
            &mut self.company,
            &mut self.title,
            &mut self.industry,
            &mut self.address,
        ] {
            field.needs_review =
                field.value.is_some() && field.confidence < REVIEW_THRESHOLD;
        }
        self
    }

    /// Arithmetic mean of the confidences of all non-null fields, or 0.0
    /// when every field is null.
    pub fn overall_confidence(&self) -> f32 {
        let present: Vec<f32> = self
            .fields()
            .iter()
            .filter(|f| f.value.is_some())
            .map(|f| f.confidence)
            .collect();

        if present.is_empty() {
            0.0
        } else {
            present.iter().sum::<f32>() / present.len() as f32
        }
    }

    /// A contact needs review iff at least one non-null field sits below the
    /// threshold. Always recomputed from the fields, never cached.
    pub fn needs_review(&self) -> bool {
        self.fields()
            .iter()
            .any(|f| f.value.is_some() && f.confidence < REVIEW_THRESHOLD)
    }

    /// Whether the attributes a contact record minimally needs are present:
    /// a first and last name, or an email address.
    pub fn has_required_fields(&self) -> bool {
        (self.first_name.value.is_some() && self.last_name.value.is_some())
            || self.email.value.is_some()
    }
}

/// The unit of work returned by the field extractor for one OCR text.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AIParsingResponse {
    pub parsed_data: ParsedContactData,
    pub raw_text: String,
    pub overall_confidence: f32,
    pub processing_notes: Option<String>,
}

impl AIParsingResponse {
    pub fn new(parsed_data: ParsedContactData, raw_text: String) -> Self {
        let parsed_data = parsed_data.apply_review_threshold();
        Self {
            overall_confidence: parsed_data.overall_confidence(),
            parsed_data,
            raw_text,
            processing_notes: None,
        }
    }

    /// Zero-confidence stand-in for an extraction that failed. Keeps batch
    /// output aligned with batch input instead of aborting siblings.
    pub fn fallback(raw_text: String, note: String) -> Self {
        Self {
            parsed_data: ParsedContactData::unverified(),
            raw_text,
            overall_confidence: 0.0,
            processing_notes: Some(note),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(value: &str, confidence: f32) -> ContactField {
        ContactField::new(Some(value.to_string()), confidence)
    }

    fn name_and_email() -> ParsedContactData {
        ParsedContactData {
            first_name: field("Ada", 0.95),
            last_name: field("Lovelace", 0.93),
            email: field("ada@analytical.example", 0.98),
            phone: ContactField::new(None, 0.0),
            company: ContactField::new(None, 0.0),
            title: ContactField::new(None, 0.0),
            industry: ContactField::new(None, 0.0),
            address: ContactField::new(None, 0.0),
        }
    }

    #[test]
    fn test_confidence_clamped_to_unit_interval() {
        assert_eq!(field("x", 1.7).confidence, 1.0);
        assert_eq!(field("x", -0.3).confidence, 0.0);
    }

    #[test]
    fn test_absent_value_has_zero_confidence() {
        let f = ContactField::new(None, 0.9);
        assert_eq!(f.confidence, 0.0);
        assert!(!f.needs_review);

        let blank = ContactField::new(Some("   ".to_string()), 0.9);
        assert_eq!(blank.value, None);
        assert_eq!(blank.confidence, 0.0);
    }

    #[test]
    fn test_needs_review_iff_below_threshold() {
        assert!(field("x", 0.69).needs_review);
        assert!(!field("x", 0.70).needs_review);
        assert!(!field("x", 0.95).needs_review);
    }

    #[test]
    fn test_overall_confidence_mean_of_present_fields() {
        let parsed = name_and_email();
        let overall = parsed.overall_confidence();
        assert!((overall - 0.9533).abs() < 0.001, "got {}", overall);
        assert!(!parsed.needs_review());
    }

    #[test]
    fn test_overall_confidence_zero_when_all_null() {
        assert_eq!(ParsedContactData::unverified().overall_confidence(), 0.0);
    }

    #[test]
    fn test_low_confidence_phone_flags_contact() {
        let mut parsed = name_and_email();
        parsed.phone = field("555-0100", 0.45);

        assert!(parsed.phone.needs_review);
        assert!(!parsed.first_name.needs_review);
        assert!(parsed.needs_review());
    }

    #[test]
    fn test_apply_review_threshold_recomputes_flags() {
        let mut parsed = name_and_email();
        parsed.company = ContactField {
            value: Some("Initech".to_string()),
            confidence: 0.4,
            needs_review: false,
        };

        let parsed = parsed.apply_review_threshold();
        assert!(parsed.company.needs_review);
        assert!(!parsed.email.needs_review);
    }

    #[test]
    fn test_required_fields() {
        assert!(name_and_email().has_required_fields());

        let mut no_email = name_and_email();
        no_email.email = ContactField::new(None, 0.0);
        assert!(no_email.has_required_fields());

        no_email.last_name = ContactField::new(None, 0.0);
        assert!(!no_email.has_required_fields());
    }

    #[test]
    fn test_fallback_response() {
        let resp =
            AIParsingResponse::fallback("raw".to_string(), "boom".to_string());
        assert_eq!(resp.overall_confidence, 0.0);
        assert_eq!(resp.processing_notes.as_deref(), Some("boom"));
        assert!(resp.parsed_data.fields().iter().all(|f| f.needs_review));
    }

    #[test]
    fn test_parsed_data_serialization_round_trip() {
        let parsed = name_and_email();
        let json = serde_json::to_string(&parsed).unwrap();
        let back: ParsedContactData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parsed);
    }
}
