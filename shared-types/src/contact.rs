use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::parsing::{AIParsingResponse, ParsedContactData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ContactSource {
    Ocr,
    Manual,
}

impl ContactSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactSource::Ocr => "ocr",
            ContactSource::Manual => "manual",
        }
    }
}

impl std::str::FromStr for ContactSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ocr" => Ok(ContactSource::Ocr),
            "manual" => Ok(ContactSource::Manual),
            other => Err(format!("unknown contact source: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contact {
    pub id: i64,
    pub event_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub industry: Option<String>,
    pub address: Option<String>,
    pub source: ContactSource,
    pub image_url: Option<String>,
    pub raw_ocr_text: Option<String>,
    pub field_confidence_scores: ParsedContactData,
    pub overall_confidence: f32,
    pub needs_review: bool,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CreateContactRequest {
    pub event_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub industry: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
}

/// Review-form save. The form submits the full field set; every value it
/// carries counts as human-verified.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct UpdateContactRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub industry: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ContactsResponse {
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct OcrParseRequest {
    pub event_id: i64,
    pub ocr_text: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct OcrParseResponse {
    /// Absent when extraction failed outright and nothing was persisted.
    pub contact: Option<Contact>,
    pub parsed_data: ParsedContactData,
    pub overall_confidence: f32,
    pub low_confidence: bool,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct OcrBatchParseRequest {
    pub event_id: i64,
    pub ocr_texts: Vec<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct OcrBatchItem {
    pub parsed: AIParsingResponse,
    pub contact: Option<Contact>,
}

/// One entry per submitted text, in submission order.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct OcrBatchParseResponse {
    pub results: Vec<OcrBatchItem>,
}
