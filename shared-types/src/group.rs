use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::contact::Contact;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CampaignGroup {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CreateGroupRequest {
    pub event_id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct GroupsResponse {
    pub groups: Vec<CampaignGroup>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct GroupMember {
    pub position: i64,
    pub contact: Contact,
}

/// Members in display order (lowest position first).
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct GroupMembersResponse {
    pub members: Vec<GroupMember>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct AddGroupMemberRequest {
    pub contact_id: i64,
}

/// Full replacement ordering; every current member must be listed exactly
/// once.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct ReorderGroupMembersRequest {
    pub contact_ids: Vec<i64>,
}
