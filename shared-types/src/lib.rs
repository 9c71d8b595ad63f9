use serde::{Deserialize, Serialize};

pub mod campaign;
pub mod contact;
pub mod event;
pub mod group;
pub mod parsing;
pub mod settings;

pub use campaign::{Campaign, CampaignsResponse, GenerateCampaignRequest};
pub use contact::{
    Contact, ContactSource, ContactsResponse, CreateContactRequest,
    OcrBatchItem, OcrBatchParseRequest, OcrBatchParseResponse,
    OcrParseRequest, OcrParseResponse, UpdateContactRequest,
};
pub use event::{CreateEventRequest, Event, EventsResponse, UpdateEventRequest};
pub use group::{
    AddGroupMemberRequest, CampaignGroup, CreateGroupRequest, GroupMember,
    GroupMembersResponse, GroupsResponse, ReorderGroupMembersRequest,
    UpdateGroupRequest,
};
pub use parsing::{
    AIParsingResponse, ContactField, ParsedContactData, REVIEW_THRESHOLD,
};
pub use settings::{ApiKeyConfig, SettingsResponse, UpdateApiKeysRequest};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
