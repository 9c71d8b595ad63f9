use actix_web::{web, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use shared_types::{CampaignsResponse, GenerateCampaignRequest};
use std::sync::Arc;

use crate::database::campaigns as campaigns_db;
use crate::database::events as events_db;
use crate::database::groups as groups_db;
use crate::database::Database;
use leadbook_agents::campaign_writer::{CampaignBrief, CampaignWriterAgent};

pub async fn generate_campaign(
    db: web::Data<Arc<Database>>,
    writer: web::Data<Arc<CampaignWriterAgent>>,
    request: web::Json<GenerateCampaignRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();

    let group = groups_db::get_group(db.async_connection.clone(), req.group_id)
        .await
        .map_err(|e| actix_web::error::ErrorNotFound(e.to_string()))?;

    let event = events_db::get_event(db.async_connection.clone(), group.event_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let members = groups_db::list_members(db.async_connection.clone(), group.id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    if members.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Group has no members to write to"
        })));
    }

    let contacts: Vec<_> = members.into_iter().map(|m| m.contact).collect();

    let brief = CampaignBrief {
        event_name: &event.name,
        group_name: &group.name,
        contacts: &contacts,
        tone: req.tone.as_deref(),
        instructions: req.instructions.as_deref(),
    };

    let copy = match writer.write(&brief).await {
        Ok(copy) => copy,
        Err(e) => {
            tracing::error!("campaign copy generation failed: {}", e);
            return Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Copy generation failed",
                "details": e.to_string()
            })));
        }
    };

    let id = campaigns_db::insert_campaign(
        db.async_connection.clone(),
        group.id,
        &copy.subject,
        &copy.body,
        req.tone.as_deref(),
    )
    .await
    .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let campaign = campaigns_db::get_campaign(db.async_connection.clone(), id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Created().json(campaign))
}

#[derive(Debug, Deserialize)]
pub struct ListCampaignsQuery {
    pub group_id: Option<i64>,
}

pub async fn list_campaigns(
    db: web::Data<Arc<Database>>,
    query: web::Query<ListCampaignsQuery>,
) -> ActixResult<HttpResponse> {
    let campaigns = campaigns_db::list_campaigns(db.async_connection.clone(), query.group_id, 100)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(CampaignsResponse { campaigns }))
}

pub async fn get_campaign(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let campaign_id = path.into_inner();

    let campaign = campaigns_db::get_campaign(db.async_connection.clone(), campaign_id)
        .await
        .map_err(|e| actix_web::error::ErrorNotFound(e.to_string()))?;

    Ok(HttpResponse::Ok().json(campaign))
}
