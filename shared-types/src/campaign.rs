use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A generated email draft for a campaign group. Drafts are never sent from
/// here; delivery happens outside this service.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Campaign {
    pub id: i64,
    pub group_id: i64,
    pub subject: String,
    pub body: String,
    pub tone: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct GenerateCampaignRequest {
    pub group_id: i64,
    pub tone: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct CampaignsResponse {
    pub campaigns: Vec<Campaign>,
}
