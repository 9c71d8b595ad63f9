use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shared_types::{ContactField, ParsedContactData};

/// One attribute as it comes back from the model: raw value plus the model's
/// own certainty. Normalization (clamping, empty-string handling, review
/// flags) happens when this is converted into a [`ContactField`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExtractedField {
    pub value: Option<String>,
    pub confidence: f32,
}

impl ExtractedField {
    fn into_contact_field(self) -> ContactField {
        ContactField::new(self.value, self.confidence)
    }
}

/// Wire shape the model must return. Deserialization is strict: unknown keys
/// and missing attributes are errors, and an error here counts as a failed
/// attempt exactly like a transport failure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExtractedCard {
    pub first_name: ExtractedField,
    pub last_name: ExtractedField,
    pub email: ExtractedField,
    pub phone: ExtractedField,
    pub company: ExtractedField,
    pub title: ExtractedField,
    pub industry: ExtractedField,
    pub address: ExtractedField,
    pub notes: Option<String>,
}

impl ExtractedCard {
    pub fn into_parsed(self) -> ParsedContactData {
        ParsedContactData {
            first_name: self.first_name.into_contact_field(),
            last_name: self.last_name.into_contact_field(),
            email: self.email.into_contact_field(),
            phone: self.phone.into_contact_field(),
            company: self.company.into_contact_field(),
            title: self.title.into_contact_field(),
            industry: self.industry.into_contact_field(),
            address: self.address.into_contact_field(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_deserialization_rejects_unknown_keys() {
        let payload = r#"{
            "first_name": {"value": "Jo", "confidence": 0.9},
            "surprise": true
        }"#;
        assert!(serde_json::from_str::<ExtractedCard>(payload).is_err());
    }

    #[test]
    fn test_strict_deserialization_rejects_missing_attributes() {
        let payload = r#"{
            "first_name": {"value": "Jo", "confidence": 0.9}
        }"#;
        assert!(serde_json::from_str::<ExtractedCard>(payload).is_err());
    }

    #[test]
    fn test_into_parsed_normalizes_fields() {
        let card = ExtractedCard {
            first_name: ExtractedField {
                value: Some("Jo".to_string()),
                confidence: 1.4,
            },
            last_name: ExtractedField {
                value: Some("".to_string()),
                confidence: 0.8,
            },
            email: ExtractedField {
                value: None,
                confidence: 0.6,
            },
            phone: ExtractedField {
                value: Some("555-0100".to_string()),
                confidence: 0.45,
            },
            company: ExtractedField { value: None, confidence: 0.0 },
            title: ExtractedField { value: None, confidence: 0.0 },
            industry: ExtractedField { value: None, confidence: 0.0 },
            address: ExtractedField { value: None, confidence: 0.0 },
            notes: None,
        };

        let parsed = card.into_parsed();
        assert_eq!(parsed.first_name.confidence, 1.0);
        assert_eq!(parsed.last_name.value, None);
        assert_eq!(parsed.email.confidence, 0.0);
        assert!(parsed.phone.needs_review);
    }
}
