use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::Row;
use shared_types::{CreateEventRequest, Event, UpdateEventRequest};

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        starts_at: row.get(4)?,
        ends_at: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub async fn insert_event(conn: AsyncDbConnection, request: &CreateEventRequest) -> Result<i64> {
    let conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let id: i64 = conn.query_row(
        "INSERT INTO events (name, description, location, starts_at, ends_at, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
        rusqlite::params![
            &request.name,
            request.description.as_ref(),
            request.location.as_ref(),
            request.starts_at,
            request.ends_at,
            now,
            now
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn get_event(conn: AsyncDbConnection, id: i64) -> Result<Event> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT id, name, description, location, starts_at, ends_at, created_at, updated_at
         FROM events
         WHERE id = ?",
    )?;

    stmt.query_row([id], event_from_row)
        .map_err(|e| anyhow::anyhow!("Failed to get event: {}", e))
}

pub async fn list_events(conn: AsyncDbConnection, limit: usize) -> Result<Vec<Event>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT id, name, description, location, starts_at, ends_at, created_at, updated_at
         FROM events
         ORDER BY starts_at DESC
         LIMIT ?",
    )?;

    let events = stmt
        .query_map([limit], event_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(events)
}

pub async fn update_event(
    conn: AsyncDbConnection,
    id: i64,
    request: &UpdateEventRequest,
) -> Result<()> {
    let conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let updated = conn.execute(
        "UPDATE events
         SET name = COALESCE(?, name),
             description = COALESCE(?, description),
             location = COALESCE(?, location),
             starts_at = COALESCE(?, starts_at),
             ends_at = COALESCE(?, ends_at),
             updated_at = ?
         WHERE id = ?",
        rusqlite::params![
            request.name.as_ref(),
            request.description.as_ref(),
            request.location.as_ref(),
            request.starts_at,
            request.ends_at,
            now,
            id
        ],
    )?;

    if updated == 0 {
        return Err(anyhow::anyhow!("Event {} not found", id));
    }

    Ok(())
}

pub async fn delete_event(conn: AsyncDbConnection, id: i64) -> Result<()> {
    let conn = conn.lock().await;

    let deleted = conn.execute("DELETE FROM events WHERE id = ?", [id])?;

    if deleted == 0 {
        return Err(anyhow::anyhow!("Event {} not found", id));
    }

    Ok(())
}
