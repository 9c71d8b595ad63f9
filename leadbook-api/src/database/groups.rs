use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::Row;
use shared_types::{
    CampaignGroup, Contact, ContactSource, CreateGroupRequest, GroupMember,
    ParsedContactData, UpdateGroupRequest,
};
use std::str::FromStr;

fn group_from_row(row: &Row<'_>) -> rusqlite::Result<CampaignGroup> {
    Ok(CampaignGroup {
        id: row.get(0)?,
        event_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub async fn insert_group(conn: AsyncDbConnection, request: &CreateGroupRequest) -> Result<i64> {
    let conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let id: i64 = conn.query_row(
        "INSERT INTO campaign_groups (event_id, name, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING id",
        rusqlite::params![
            request.event_id,
            &request.name,
            request.description.as_ref(),
            now,
            now
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn get_group(conn: AsyncDbConnection, id: i64) -> Result<CampaignGroup> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT id, event_id, name, description, created_at, updated_at
         FROM campaign_groups
         WHERE id = ?",
    )?;

    stmt.query_row([id], group_from_row)
        .map_err(|e| anyhow::anyhow!("Failed to get group: {}", e))
}

pub async fn list_groups(
    conn: AsyncDbConnection,
    event_id: Option<i64>,
    limit: usize,
) -> Result<Vec<CampaignGroup>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT id, event_id, name, description, created_at, updated_at
         FROM campaign_groups
         WHERE (?1 IS NULL OR event_id = ?1)
         ORDER BY created_at DESC
         LIMIT ?2",
    )?;

    let groups = stmt
        .query_map(rusqlite::params![event_id, limit], group_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(groups)
}

pub async fn update_group(
    conn: AsyncDbConnection,
    id: i64,
    request: &UpdateGroupRequest,
) -> Result<()> {
    let conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let updated = conn.execute(
        "UPDATE campaign_groups
         SET name = COALESCE(?, name),
             description = COALESCE(?, description),
             updated_at = ?
         WHERE id = ?",
        rusqlite::params![request.name.as_ref(), request.description.as_ref(), now, id],
    )?;

    if updated == 0 {
        return Err(anyhow::anyhow!("Group {} not found", id));
    }

    Ok(())
}

pub async fn delete_group(conn: AsyncDbConnection, id: i64) -> Result<()> {
    let conn = conn.lock().await;

    conn.execute(
        "DELETE FROM campaign_group_members WHERE group_id = ?",
        [id],
    )?;
    let deleted = conn.execute("DELETE FROM campaign_groups WHERE id = ?", [id])?;

    if deleted == 0 {
        return Err(anyhow::anyhow!("Group {} not found", id));
    }

    Ok(())
}

/// Append a contact to a group at the end of the current ordering.
pub async fn add_member(conn: AsyncDbConnection, group_id: i64, contact_id: i64) -> Result<()> {
    let conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let next_position: i64 = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM campaign_group_members WHERE group_id = ?",
        [group_id],
        |row| row.get(0),
    )?;

    conn.execute(
        "INSERT INTO campaign_group_members (group_id, contact_id, position, created_at)
         VALUES (?, ?, ?, ?)",
        rusqlite::params![group_id, contact_id, next_position, now],
    )?;

    Ok(())
}

pub async fn remove_member(conn: AsyncDbConnection, group_id: i64, contact_id: i64) -> Result<()> {
    let conn = conn.lock().await;

    let deleted = conn.execute(
        "DELETE FROM campaign_group_members WHERE group_id = ? AND contact_id = ?",
        rusqlite::params![group_id, contact_id],
    )?;

    if deleted == 0 {
        return Err(anyhow::anyhow!(
            "Contact {} is not a member of group {}",
            contact_id,
            group_id
        ));
    }

    Ok(())
}

pub async fn member_contact_ids(conn: AsyncDbConnection, group_id: i64) -> Result<Vec<i64>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT contact_id FROM campaign_group_members WHERE group_id = ? ORDER BY position ASC",
    )?;

    let ids = stmt
        .query_map([group_id], |row| row.get::<_, i64>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ids)
}

/// Replace the group's ordering with the given contact id sequence. The
/// caller is responsible for having verified the sequence is a permutation
/// of the current membership.
pub async fn reorder_members(
    conn: AsyncDbConnection,
    group_id: i64,
    contact_ids: &[i64],
) -> Result<()> {
    let mut conn = conn.lock().await;

    let tx = conn.transaction()?;
    for (position, contact_id) in contact_ids.iter().enumerate() {
        tx.execute(
            "UPDATE campaign_group_members SET position = ? WHERE group_id = ? AND contact_id = ?",
            rusqlite::params![position as i64, group_id, contact_id],
        )?;
    }
    tx.commit()?;

    Ok(())
}

pub async fn list_members(conn: AsyncDbConnection, group_id: i64) -> Result<Vec<GroupMember>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT c.id, c.event_id, c.first_name, c.last_name, c.email, c.phone, c.company,
                c.title, c.industry, c.address, c.source, c.image_url, c.raw_ocr_text,
                c.field_confidence_scores, c.overall_confidence, c.needs_review, c.reviewed_at,
                c.created_at, c.updated_at, m.position
         FROM campaign_group_members m
         JOIN contacts c ON c.id = m.contact_id
         WHERE m.group_id = ?
         ORDER BY m.position ASC",
    )?;

    let member_rows = stmt
        .query_map([group_id], |row| {
            let source_str: String = row.get(10)?;
            let scores_json: String = row.get(13)?;

            let contact = Contact {
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
            };

            Ok(GroupMember {
                position: row.get(19)?,
                contact,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(member_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::contacts::{insert_contact, NewContact};
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
                name: "Expo".to_string(),
                description: None,
                location: None,
                starts_at: 1_750_000_000,
                ends_at: None,
            },
        )
        .await
        .unwrap()
    }

    async fn seed_contact(db: &Database, event_id: i64, first: &str) -> i64 {
        let parsed = ParsedContactData {
            first_name: ContactField::verified(Some(first.to_string())),
            last_name: ContactField::verified(Some("Member".to_string())),
            email: ContactField::verified(None),
            phone: ContactField::verified(None),
            company: ContactField::verified(None),
            title: ContactField::verified(None),
            industry: ContactField::verified(None),
            address: ContactField::verified(None),
        };

        insert_contact(
            db.async_connection.clone(),
            NewContact {
                event_id,
                parsed,
                source: ContactSource::Manual,
                image_url: None,
                raw_ocr_text: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_membership_keeps_insertion_order() {
        let (_dir, db) = test_db();
        let event_id = seed_event(&db).await;

        let group_id = insert_group(
            db.async_connection.clone(),
            &CreateGroupRequest {
                event_id,
                name: "Hot leads".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

        let c1 = seed_contact(&db, event_id, "one").await;
        let c2 = seed_contact(&db, event_id, "two").await;
        let c3 = seed_contact(&db, event_id, "three").await;

        for id in [c1, c2, c3] {
            add_member(db.async_connection.clone(), group_id, id)
                .await
                .unwrap();
        }

        let members = list_members(db.async_connection.clone(), group_id)
            .await
            .unwrap();
        let ids: Vec<i64> = members.iter().map(|m| m.contact.id).collect();
        assert_eq!(ids, vec![c1, c2, c3]);
        assert_eq!(members[0].position, 0);
        assert_eq!(members[2].position, 2);
    }

    #[tokio::test]
    async fn test_duplicate_member_rejected() {
        let (_dir, db) = test_db();
        let event_id = seed_event(&db).await;

        let group_id = insert_group(
            db.async_connection.clone(),
            &CreateGroupRequest {
                event_id,
                name: "Leads".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

        let contact_id = seed_contact(&db, event_id, "solo").await;

        add_member(db.async_connection.clone(), group_id, contact_id)
            .await
            .unwrap();
        assert!(add_member(db.async_connection.clone(), group_id, contact_id)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_reorder_members() {
        let (_dir, db) = test_db();
        let event_id = seed_event(&db).await;

        let group_id = insert_group(
            db.async_connection.clone(),
            &CreateGroupRequest {
                event_id,
                name: "Leads".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

        let c1 = seed_contact(&db, event_id, "one").await;
        let c2 = seed_contact(&db, event_id, "two").await;
        for id in [c1, c2] {
            add_member(db.async_connection.clone(), group_id, id)
                .await
                .unwrap();
        }

        reorder_members(db.async_connection.clone(), group_id, &[c2, c1])
            .await
            .unwrap();

        let ids = member_contact_ids(db.async_connection.clone(), group_id)
            .await
            .unwrap();
        assert_eq!(ids, vec![c2, c1]);
    }
}
