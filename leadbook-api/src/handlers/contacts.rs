use actix_web::{web, HttpResponse, Result as ActixResult};
use regex::Regex;
use serde::Deserialize;
use shared_types::{
    ContactField, ContactSource, ContactsResponse, CreateContactRequest, OcrBatchItem,
    OcrBatchParseRequest, OcrBatchParseResponse, OcrParseRequest, OcrParseResponse,
    ParsedContactData, UpdateContactRequest,
};
use std::sync::Arc;

use crate::database::contacts as contacts_db;
use crate::database::contacts::NewContact;
use crate::database::events as events_db;
use crate::database::Database;
use leadbook_agents::card_extractor::CardExtractorAgent;
use leadbook_agents::parse_batch;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[derive(Debug)]
enum ContactError {
    Validation(String),
    NotFound,
    Internal(String),
}

impl std::fmt::Display for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactError::Validation(msg) => write!(f, "{}", msg),
            ContactError::NotFound => write!(f, "Contact not found"),
            ContactError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl actix_web::error::ResponseError for ContactError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ContactError::Validation(msg) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": msg }))
            }
            ContactError::NotFound => {
                HttpResponse::NotFound().json(serde_json::json!({ "error": "Contact not found" }))
            }
            ContactError::Internal(msg) => {
                HttpResponse::InternalServerError().json(serde_json::json!({ "error": msg }))
            }
        }
    }
}

fn is_valid_email(value: &str) -> bool {
    Regex::new(EMAIL_PATTERN)
        .expect("email pattern is valid")
        .is_match(value)
}

/// Human-entered attribute values carry full confidence; the threshold logic
/// then has nothing left to flag.
fn verified_parsed(
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    title: Option<String>,
    industry: Option<String>,
    address: Option<String>,
) -> ParsedContactData {
    ParsedContactData {
        first_name: ContactField::verified(first_name),
        last_name: ContactField::verified(last_name),
        email: ContactField::verified(email),
        phone: ContactField::verified(phone),
        company: ContactField::verified(company),
        title: ContactField::verified(title),
        industry: ContactField::verified(industry),
        address: ContactField::verified(address),
    }
}

fn validate_email_field(parsed: &ParsedContactData) -> Result<(), ContactError> {
    if let Some(email) = &parsed.email.value {
        if !is_valid_email(email) {
            return Err(ContactError::Validation(format!(
                "Not a valid email address: {}",
                email
            )));
        }
    }
    Ok(())
}

async fn ensure_event_exists(db: &Database, event_id: i64) -> Result<(), ContactError> {
    events_db::get_event(db.async_connection.clone(), event_id)
        .await
        .map(|_| ())
        .map_err(|_| ContactError::Validation(format!("Event {} does not exist", event_id)))
}

#[derive(Debug, Deserialize)]
pub struct ListContactsQuery {
    pub event_id: Option<i64>,
    pub needs_review: Option<bool>,
}

pub async fn list_contacts(
    db: web::Data<Arc<Database>>,
    query: web::Query<ListContactsQuery>,
) -> ActixResult<HttpResponse> {
    let contacts = contacts_db::list_contacts(
        db.async_connection.clone(),
        query.event_id,
        query.needs_review,
        200,
    )
    .await
    .map_err(|e| ContactError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(ContactsResponse { contacts }))
}

pub async fn get_contact(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let contact_id = path.into_inner();

    let contact = contacts_db::get_contact(db.async_connection.clone(), contact_id)
        .await
        .map_err(|_| ContactError::NotFound)?;

    Ok(HttpResponse::Ok().json(contact))
}

pub async fn create_contact(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateContactRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();

    ensure_event_exists(&db, req.event_id).await?;

    let parsed = verified_parsed(
        req.first_name,
        req.last_name,
        req.email,
        req.phone,
        req.company,
        req.title,
        req.industry,
        req.address,
    );

    if !parsed.has_required_fields() {
        return Err(ContactError::Validation(
            "A contact needs a first and last name, or an email address".to_string(),
        )
        .into());
    }
    validate_email_field(&parsed)?;

    let id = contacts_db::insert_contact(
        db.async_connection.clone(),
        NewContact {
            event_id: req.event_id,
            parsed,
            source: ContactSource::Manual,
            image_url: req.image_url,
            raw_ocr_text: None,
        },
    )
    .await
    .map_err(|e| ContactError::Internal(e.to_string()))?;

    let contact = contacts_db::get_contact(db.async_connection.clone(), id)
        .await
        .map_err(|e| ContactError::Internal(e.to_string()))?;

    Ok(HttpResponse::Created().json(contact))
}

/// Review-form save. Submitted values are human-verified; the contact leaves
/// the review queue once the required fields are present and never re-enters
/// it automatically.
pub async fn update_contact(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<UpdateContactRequest>,
) -> ActixResult<HttpResponse> {
    let contact_id = path.into_inner();
    let req = request.into_inner();

    let existing = contacts_db::get_contact(db.async_connection.clone(), contact_id)
        .await
        .map_err(|_| ContactError::NotFound)?;

    let parsed = verified_parsed(
        req.first_name,
        req.last_name,
        req.email,
        req.phone,
        req.company,
        req.title,
        req.industry,
        req.address,
    );
    validate_email_field(&parsed)?;

    let needs_review = !parsed.has_required_fields();
    let reviewed_at = if needs_review {
        existing.reviewed_at
    } else {
        existing
            .reviewed_at
            .or_else(|| Some(chrono::Utc::now().timestamp()))
    };

    contacts_db::update_contact_fields(
        db.async_connection.clone(),
        contact_id,
        &parsed,
        needs_review,
        reviewed_at,
    )
    .await
    .map_err(|e| ContactError::Internal(e.to_string()))?;

    let contact = contacts_db::get_contact(db.async_connection.clone(), contact_id)
        .await
        .map_err(|e| ContactError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(contact))
}

pub async fn delete_contact(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let contact_id = path.into_inner();

    contacts_db::delete_contact(db.async_connection.clone(), contact_id)
        .await
        .map_err(|_| ContactError::NotFound)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

pub async fn review_queue(db: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let contacts = contacts_db::list_review_queue(db.async_connection.clone(), 200)
        .await
        .map_err(|e| ContactError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(ContactsResponse { contacts }))
}

/// Whether an extraction produced anything worth persisting. An all-null
/// parse (including the fallback) yields no contact row.
fn has_extracted_fields(parsed: &ParsedContactData) -> bool {
    parsed.fields().iter().any(|f| f.value.is_some())
}

async fn persist_extraction(
    db: &Database,
    event_id: i64,
    parsed: &ParsedContactData,
    image_url: Option<String>,
    raw_text: &str,
) -> Result<shared_types::Contact, ContactError> {
    let id = contacts_db::insert_contact(
        db.async_connection.clone(),
        NewContact {
            event_id,
            parsed: parsed.clone(),
            source: ContactSource::Ocr,
            image_url,
            raw_ocr_text: Some(raw_text.to_string()),
        },
    )
    .await
    .map_err(|e| ContactError::Internal(e.to_string()))?;

    contacts_db::get_contact(db.async_connection.clone(), id)
        .await
        .map_err(|e| ContactError::Internal(e.to_string()))
}

pub async fn parse_ocr(
    db: web::Data<Arc<Database>>,
    agent: web::Data<Arc<CardExtractorAgent>>,
    request: web::Json<OcrParseRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();

    if req.ocr_text.trim().is_empty() {
        return Err(ContactError::Validation("ocr_text cannot be empty".to_string()).into());
    }
    ensure_event_exists(&db, req.event_id).await?;

    match agent.parse(&req.ocr_text).await {
        Ok(parsed) => {
            if !has_extracted_fields(&parsed.parsed_data) {
                return Ok(HttpResponse::Ok().json(OcrParseResponse {
                    contact: None,
                    parsed_data: parsed.parsed_data,
                    overall_confidence: parsed.overall_confidence,
                    low_confidence: true,
                    message: Some(
                        "No fields could be extracted from this card; please enter the contact manually".to_string(),
                    ),
                }));
            }

            let contact =
                persist_extraction(&db, req.event_id, &parsed.parsed_data, req.image_url, &req.ocr_text)
                    .await?;

            let low_confidence = contact.needs_review;
            let message = if low_confidence {
                Some(
                    "Some fields are below the confidence threshold and were queued for review"
                        .to_string(),
                )
            } else {
                None
            };

            Ok(HttpResponse::Ok().json(OcrParseResponse {
                contact: Some(contact),
                parsed_data: parsed.parsed_data,
                overall_confidence: parsed.overall_confidence,
                low_confidence,
                message,
            }))
        }
        Err(e) => {
            tracing::error!("card extraction failed: {}", e);

            // Total failure: nothing is persisted, the client gets a fully
            // flagged empty form for manual entry.
            Ok(HttpResponse::Ok().json(OcrParseResponse {
                contact: None,
                parsed_data: ParsedContactData::unverified(),
                overall_confidence: 0.0,
                low_confidence: true,
                message: Some(format!(
                    "Extraction failed ({}); please enter the contact manually",
                    e
                )),
            }))
        }
    }
}

pub async fn parse_ocr_batch(
    db: web::Data<Arc<Database>>,
    agent: web::Data<Arc<CardExtractorAgent>>,
    request: web::Json<OcrBatchParseRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();

    ensure_event_exists(&db, req.event_id).await?;

    let parses = parse_batch(agent.get_ref(), &req.ocr_texts).await;

    let mut results = Vec::with_capacity(parses.len());
    for parsed in parses {
        let contact = if has_extracted_fields(&parsed.parsed_data) {
            Some(
                persist_extraction(
                    &db,
                    req.event_id,
                    &parsed.parsed_data,
                    None,
                    &parsed.raw_text,
                )
                .await?,
            )
        } else {
            None
        };

        results.push(OcrBatchItem { parsed, contact });
    }

    Ok(HttpResponse::Ok().json(OcrBatchParseResponse { results }))
}
