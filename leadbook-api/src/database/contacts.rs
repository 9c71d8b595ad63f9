use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::Row;
use shared_types::{Contact, ContactSource, ParsedContactData};
use std::str::FromStr;

const CONTACT_COLUMNS: &str =
    "id, event_id, first_name, last_name, email, phone, company, title, industry, address,
     source, image_url, raw_ocr_text, field_confidence_scores, overall_confidence,
     needs_review, reviewed_at, created_at, updated_at";

pub struct NewContact {
    pub event_id: i64,
    pub parsed: ParsedContactData,
    pub source: ContactSource,
    pub image_url: Option<String>,
    pub raw_ocr_text: Option<String>,
}

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    let source_str: String = row.get(10)?;
    let scores_json: String = row.get(13)?;

    Ok(Contact {
        id: row.get(0)?,
        event_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        company: row.get(6)?,
        title: row.get(7)?,
        industry: row.get(8)?,
        address: row.get(9)?,
        source: ContactSource::from_str(&source_str).unwrap_or(ContactSource::Manual),
        image_url: row.get(11)?,
        raw_ocr_text: row.get(12)?,
        field_confidence_scores: serde_json::from_str(&scores_json)
            .unwrap_or_else(|_| ParsedContactData::unverified()),
        overall_confidence: row.get(14)?,
        needs_review: row.get(15)?,
        reviewed_at: row.get(16)?,
        created_at: row.get(17)?,
        updated_at: row.get(18)?,
    })
}

pub async fn insert_contact(conn: AsyncDbConnection, new: NewContact) -> Result<i64> {
    let conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let parsed = &new.parsed;
    let scores_json = serde_json::to_string(parsed)?;
    let needs_review = parsed.needs_review();
    // reviewed_at is only ever written by a review-form save
    let reviewed_at: Option<i64> = None;

    let id: i64 = conn.query_row(
        "INSERT INTO contacts
         (event_id, first_name, last_name, email, phone, company, title, industry, address,
          source, image_url, raw_ocr_text, field_confidence_scores, overall_confidence,
          needs_review, reviewed_at, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
        rusqlite::params![
            new.event_id,
            parsed.first_name.value.as_ref(),
            parsed.last_name.value.as_ref(),
            parsed.email.value.as_ref(),
            parsed.phone.value.as_ref(),
            parsed.company.value.as_ref(),
            parsed.title.value.as_ref(),
            parsed.industry.value.as_ref(),
            parsed.address.value.as_ref(),
            new.source.as_str(),
            new.image_url.as_ref(),
            new.raw_ocr_text.as_ref(),
            &scores_json,
            parsed.overall_confidence(),
            needs_review,
            reviewed_at,
            now,
            now
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn get_contact(conn: AsyncDbConnection, id: i64) -> Result<Contact> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?"
    ))?;

    stmt.query_row([id], contact_from_row)
        .map_err(|e| anyhow::anyhow!("Failed to get contact: {}", e))
}

pub async fn list_contacts(
    conn: AsyncDbConnection,
    event_id: Option<i64>,
    needs_review: Option<bool>,
    limit: usize,
) -> Result<Vec<Contact>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts
         WHERE (?1 IS NULL OR event_id = ?1)
           AND (?2 IS NULL OR needs_review = ?2)
         ORDER BY created_at DESC
         LIMIT ?3"
    ))?;

    let contacts = stmt
        .query_map(
            rusqlite::params![event_id, needs_review, limit],
            contact_from_row,
        )?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(contacts)
}

/// Contacts awaiting manual verification, oldest first so the queue drains
/// in capture order.
pub async fn list_review_queue(conn: AsyncDbConnection, limit: usize) -> Result<Vec<Contact>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts
         WHERE needs_review = true
         ORDER BY created_at ASC
         LIMIT ?"
    ))?;

    let contacts = stmt
        .query_map([limit], contact_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(contacts)
}

/// Overwrite a contact's attributes with reviewed values. The scalar columns,
/// the denormalized scores blob and the review flag always move together.
pub async fn update_contact_fields(
    conn: AsyncDbConnection,
    id: i64,
    parsed: &ParsedContactData,
    needs_review: bool,
    reviewed_at: Option<i64>,
) -> Result<()> {
    let conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let scores_json = serde_json::to_string(parsed)?;

    let updated = conn.execute(
        "UPDATE contacts
         SET first_name = ?, last_name = ?, email = ?, phone = ?, company = ?,
             title = ?, industry = ?, address = ?, field_confidence_scores = ?,
             overall_confidence = ?, needs_review = ?, reviewed_at = ?, updated_at = ?
         WHERE id = ?",
        rusqlite::params![
            parsed.first_name.value.as_ref(),
            parsed.last_name.value.as_ref(),
            parsed.email.value.as_ref(),
            parsed.phone.value.as_ref(),
            parsed.company.value.as_ref(),
            parsed.title.value.as_ref(),
            parsed.industry.value.as_ref(),
            parsed.address.value.as_ref(),
            &scores_json,
            parsed.overall_confidence(),
            needs_review,
            reviewed_at,
            now,
            id
        ],
    )?;

    if updated == 0 {
        return Err(anyhow::anyhow!("Contact {} not found", id));
    }

    Ok(())
}

pub async fn delete_contact(conn: AsyncDbConnection, id: i64) -> Result<()> {
    let conn = conn.lock().await;

    conn.execute(
        "DELETE FROM campaign_group_members WHERE contact_id = ?",
        [id],
    )?;
    let deleted = conn.execute("DELETE FROM contacts WHERE id = ?", [id])?;

    if deleted == 0 {
        return Err(anyhow::anyhow!("Contact {} not found", id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{events, Database};
    use shared_types::{ContactField, CreateEventRequest};

    fn test_db() -> (tempfile::TempDir, std::sync::Arc<Database>) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("test.sqlite3")).unwrap();
        (dir, std::sync::Arc::new(db))
    }

    async fn seed_event(db: &Database) -> i64 {
        events::insert_event(
            db.async_connection.clone(),
            &CreateEventRequest {
                name: "Spring Expo".to_string(),
                description: None,
                location: Some("Hall 4".to_string()),
                starts_at: 1_750_000_000,
                ends_at: None,
            },
        )
        .await
        .unwrap()
    }

    fn parsed(first: &str, phone_confidence: f32) -> ParsedContactData {
        ParsedContactData {
            first_name: ContactField::new(Some(first.to_string()), 0.95),
            last_name: ContactField::new(Some("Tester".to_string()), 0.92),
            email: ContactField::new(Some(format!("{first}@example.com")), 0.98),
            phone: ContactField::new(Some("555-0100".to_string()), phone_confidence),
            company: ContactField::new(None, 0.0),
            title: ContactField::new(None, 0.0),
            industry: ContactField::new(None, 0.0),
            address: ContactField::new(None, 0.0),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let (_dir, db) = test_db();
        let event_id = seed_event(&db).await;

        let id = insert_contact(
            db.async_connection.clone(),
            NewContact {
                event_id,
                parsed: parsed("ada", 0.9),
                source: ContactSource::Ocr,
                image_url: None,
                raw_ocr_text: Some("ADA TESTER".to_string()),
            },
        )
        .await
        .unwrap();

        let contact = get_contact(db.async_connection.clone(), id).await.unwrap();
        assert_eq!(contact.first_name.as_deref(), Some("ada"));
        assert_eq!(contact.email.as_deref(), Some("ada@example.com"));
        assert_eq!(contact.source, ContactSource::Ocr);
        assert!(!contact.needs_review);
        assert!(contact.reviewed_at.is_none());
        assert_eq!(
            contact.field_confidence_scores.phone.value.as_deref(),
            Some("555-0100")
        );
    }

    #[tokio::test]
    async fn test_low_confidence_contact_lands_in_review_queue() {
        let (_dir, db) = test_db();
        let event_id = seed_event(&db).await;

        let id = insert_contact(
            db.async_connection.clone(),
            NewContact {
                event_id,
                parsed: parsed("grace", 0.45),
                source: ContactSource::Ocr,
                image_url: None,
                raw_ocr_text: None,
            },
        )
        .await
        .unwrap();

        let contact = get_contact(db.async_connection.clone(), id).await.unwrap();
        assert!(contact.needs_review);
        assert!(contact.reviewed_at.is_none());

        let queue = list_review_queue(db.async_connection.clone(), 10)
            .await
            .unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, id);
    }

    #[tokio::test]
    async fn test_review_save_clears_queue() {
        let (_dir, db) = test_db();
        let event_id = seed_event(&db).await;

        let id = insert_contact(
            db.async_connection.clone(),
            NewContact {
                event_id,
                parsed: parsed("linus", 0.3),
                source: ContactSource::Ocr,
                image_url: None,
                raw_ocr_text: None,
            },
        )
        .await
        .unwrap();

        let corrected = ParsedContactData {
            first_name: ContactField::verified(Some("Linus".to_string())),
            last_name: ContactField::verified(Some("Tester".to_string())),
            email: ContactField::verified(Some("linus@example.com".to_string())),
            phone: ContactField::verified(Some("555-0199".to_string())),
            company: ContactField::verified(None),
            title: ContactField::verified(None),
            industry: ContactField::verified(None),
            address: ContactField::verified(None),
        };

        update_contact_fields(db.async_connection.clone(), id, &corrected, false, Some(42))
            .await
            .unwrap();

        let contact = get_contact(db.async_connection.clone(), id).await.unwrap();
        assert!(!contact.needs_review);
        assert_eq!(contact.reviewed_at, Some(42));
        assert_eq!(contact.first_name.as_deref(), Some("Linus"));
        assert_eq!(contact.field_confidence_scores.phone.confidence, 1.0);

        let queue = list_review_queue(db.async_connection.clone(), 10)
            .await
            .unwrap();
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (_dir, db) = test_db();
        let event_a = seed_event(&db).await;
        let event_b = seed_event(&db).await;

        for (event_id, first, conf) in
            [(event_a, "a1", 0.9), (event_a, "a2", 0.4), (event_b, "b1", 0.9)]
        {
            insert_contact(
                db.async_connection.clone(),
                NewContact {
                    event_id,
                    parsed: parsed(first, conf),
                    source: ContactSource::Ocr,
                    image_url: None,
                    raw_ocr_text: None,
                },
            )
            .await
            .unwrap();
        }

        let all = list_contacts(db.async_connection.clone(), None, None, 10)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let event_a_only = list_contacts(db.async_connection.clone(), Some(event_a), None, 10)
            .await
            .unwrap();
        assert_eq!(event_a_only.len(), 2);

        let flagged = list_contacts(db.async_connection.clone(), Some(event_a), Some(true), 10)
            .await
            .unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].first_name.as_deref(), Some("a2"));
    }

    #[tokio::test]
    async fn test_delete_contact() {
        let (_dir, db) = test_db();
        let event_id = seed_event(&db).await;

        let id = insert_contact(
            db.async_connection.clone(),
            NewContact {
                event_id,
                parsed: parsed("gone", 0.9),
                source: ContactSource::Manual,
                image_url: None,
                raw_ocr_text: None,
            },
        )
        .await
        .unwrap();

        delete_contact(db.async_connection.clone(), id).await.unwrap();
        assert!(get_contact(db.async_connection.clone(), id).await.is_err());
        assert!(delete_contact(db.async_connection.clone(), id).await.is_err());
    }
}
