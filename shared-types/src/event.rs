use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: i64, // Unix timestamp
    pub ends_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: i64,
    pub ends_at: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}
