use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Create events table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR NOT NULL,
            description VARCHAR,
            location VARCHAR,
            starts_at BIGINT NOT NULL,
            ends_at BIGINT,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create contacts table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id INTEGER NOT NULL,
            first_name VARCHAR,
            last_name VARCHAR,
            email VARCHAR,
            phone VARCHAR,
            company VARCHAR,
            title VARCHAR,
            industry VARCHAR,
            address VARCHAR,
            source VARCHAR NOT NULL CHECK (source IN ('ocr', 'manual')),
            image_url VARCHAR,
            raw_ocr_text VARCHAR,
            field_confidence_scores VARCHAR NOT NULL,
            overall_confidence REAL NOT NULL DEFAULT 0,
            needs_review BOOLEAN NOT NULL DEFAULT false,
            reviewed_at BIGINT,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (event_id) REFERENCES events (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contacts_event
            ON contacts(event_id, created_at)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contacts_needs_review
            ON contacts(needs_review, created_at)",
        [],
    )?;

    // Create campaign_groups table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS campaign_groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id INTEGER NOT NULL,
            name VARCHAR NOT NULL,
            description VARCHAR,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (event_id) REFERENCES events (id)
        )",
        [],
    )?;

    // Create campaign_group_members table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS campaign_group_members (
            group_id INTEGER NOT NULL,
            contact_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            created_at BIGINT NOT NULL,
            PRIMARY KEY (group_id, contact_id),
            FOREIGN KEY (group_id) REFERENCES campaign_groups (id),
            FOREIGN KEY (contact_id) REFERENCES contacts (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_group_members_position
            ON campaign_group_members(group_id, position)",
        [],
    )?;

    // Create campaigns table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS campaigns (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id INTEGER NOT NULL,
            subject VARCHAR NOT NULL,
            body VARCHAR NOT NULL,
            tone VARCHAR,
            created_at BIGINT NOT NULL,
            FOREIGN KEY (group_id) REFERENCES campaign_groups (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_campaigns_group
            ON campaigns(group_id, created_at)",
        [],
    )?;

    Ok(())
}
