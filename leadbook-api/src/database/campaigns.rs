use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::Row;
use shared_types::Campaign;

fn campaign_from_row(row: &Row<'_>) -> rusqlite::Result<Campaign> {
    Ok(Campaign {
        id: row.get(0)?,
        group_id: row.get(1)?,
        subject: row.get(2)?,
        body: row.get(3)?,
        tone: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub async fn insert_campaign(
    conn: AsyncDbConnection,
    group_id: i64,
    subject: &str,
    body: &str,
    tone: Option<&str>,
) -> Result<i64> {
    let conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let id: i64 = conn.query_row(
        "INSERT INTO campaigns (group_id, subject, body, tone, created_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING id",
        rusqlite::params![group_id, subject, body, tone, now],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn get_campaign(conn: AsyncDbConnection, id: i64) -> Result<Campaign> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT id, group_id, subject, body, tone, created_at
         FROM campaigns
         WHERE id = ?",
    )?;

    stmt.query_row([id], campaign_from_row)
        .map_err(|e| anyhow::anyhow!("Failed to get campaign: {}", e))
}

pub async fn list_campaigns(
    conn: AsyncDbConnection,
    group_id: Option<i64>,
    limit: usize,
) -> Result<Vec<Campaign>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT id, group_id, subject, body, tone, created_at
         FROM campaigns
         WHERE (?1 IS NULL OR group_id = ?1)
         ORDER BY created_at DESC
         LIMIT ?2",
    )?;

    let campaigns = stmt
        .query_map(rusqlite::params![group_id, limit], campaign_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(campaigns)
}
