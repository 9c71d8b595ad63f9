use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Event types
    types.push(clean_type(Event::export_to_string()?));
    types.push(clean_type(CreateEventRequest::export_to_string()?));
    types.push(clean_type(UpdateEventRequest::export_to_string()?));
    types.push(clean_type(EventsResponse::export_to_string()?));

    // Contact types
    types.push(clean_type(ContactSource::export_to_string()?));
    types.push(clean_type(Contact::export_to_string()?));
    types.push(clean_type(CreateContactRequest::export_to_string()?));
    types.push(clean_type(UpdateContactRequest::export_to_string()?));
    types.push(clean_type(ContactsResponse::export_to_string()?));

    // Parsing types
    types.push(clean_type(ContactField::export_to_string()?));
    types.push(clean_type(ParsedContactData::export_to_string()?));
    types.push(clean_type(AIParsingResponse::export_to_string()?));
    types.push(clean_type(OcrParseRequest::export_to_string()?));
    types.push(clean_type(OcrParseResponse::export_to_string()?));
    types.push(clean_type(OcrBatchParseRequest::export_to_string()?));
    types.push(clean_type(OcrBatchItem::export_to_string()?));
    types.push(clean_type(OcrBatchParseResponse::export_to_string()?));

    // Campaign group types
    types.push(clean_type(CampaignGroup::export_to_string()?));
    types.push(clean_type(CreateGroupRequest::export_to_string()?));
    types.push(clean_type(UpdateGroupRequest::export_to_string()?));
    types.push(clean_type(GroupsResponse::export_to_string()?));
    types.push(clean_type(GroupMember::export_to_string()?));
    types.push(clean_type(GroupMembersResponse::export_to_string()?));
    types.push(clean_type(AddGroupMemberRequest::export_to_string()?));
    types.push(clean_type(ReorderGroupMembersRequest::export_to_string()?));

    // Campaign types
    types.push(clean_type(Campaign::export_to_string()?));
    types.push(clean_type(GenerateCampaignRequest::export_to_string()?));
    types.push(clean_type(CampaignsResponse::export_to_string()?));

    // Settings types
    types.push(clean_type(ApiKeyConfig::export_to_string()?));
    types.push(clean_type(SettingsResponse::export_to_string()?));
    types.push(clean_type(UpdateApiKeysRequest::export_to_string()?));

    let output_dir = Path::new("../gui/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let lines: Vec<&str> = type_def.lines().collect();

    // All definitions land in one file, so cross-type import lines are noise
    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .cloned()
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
