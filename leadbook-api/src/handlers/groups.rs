use actix_web::{web, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use shared_types::{
    AddGroupMemberRequest, CreateGroupRequest, GroupMembersResponse, GroupsResponse,
    ReorderGroupMembersRequest, UpdateGroupRequest,
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::database::contacts as contacts_db;
use crate::database::events as events_db;
use crate::database::groups as groups_db;
use crate::database::Database;

pub async fn create_group(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateGroupRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();

    if req.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Group name cannot be empty"
        })));
    }

    events_db::get_event(db.async_connection.clone(), req.event_id)
        .await
        .map_err(|_| {
            actix_web::error::ErrorBadRequest(format!("Event {} does not exist", req.event_id))
        })?;

    let id = groups_db::insert_group(db.async_connection.clone(), &req)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let group = groups_db::get_group(db.async_connection.clone(), id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Created().json(group))
}

#[derive(Debug, Deserialize)]
pub struct ListGroupsQuery {
    pub event_id: Option<i64>,
}

pub async fn list_groups(
    db: web::Data<Arc<Database>>,
    query: web::Query<ListGroupsQuery>,
) -> ActixResult<HttpResponse> {
    let groups = groups_db::list_groups(db.async_connection.clone(), query.event_id, 100)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(GroupsResponse { groups }))
}

pub async fn get_group(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let group_id = path.into_inner();

    let group = groups_db::get_group(db.async_connection.clone(), group_id)
        .await
        .map_err(|e| actix_web::error::ErrorNotFound(e.to_string()))?;

    Ok(HttpResponse::Ok().json(group))
}

pub async fn update_group(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<UpdateGroupRequest>,
) -> ActixResult<HttpResponse> {
    let group_id = path.into_inner();

    groups_db::update_group(db.async_connection.clone(), group_id, &request)
        .await
        .map_err(|e| actix_web::error::ErrorNotFound(e.to_string()))?;

    let group = groups_db::get_group(db.async_connection.clone(), group_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(group))
}

pub async fn delete_group(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let group_id = path.into_inner();

    groups_db::delete_group(db.async_connection.clone(), group_id)
        .await
        .map_err(|e| actix_web::error::ErrorNotFound(e.to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

pub async fn add_member(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<AddGroupMemberRequest>,
) -> ActixResult<HttpResponse> {
    let group_id = path.into_inner();

    groups_db::get_group(db.async_connection.clone(), group_id)
        .await
        .map_err(|e| actix_web::error::ErrorNotFound(e.to_string()))?;

    contacts_db::get_contact(db.async_connection.clone(), request.contact_id)
        .await
        .map_err(|_| {
            actix_web::error::ErrorBadRequest(format!(
                "Contact {} does not exist",
                request.contact_id
            ))
        })?;

    groups_db::add_member(db.async_connection.clone(), group_id, request.contact_id)
        .await
        .map_err(|_| {
            actix_web::error::ErrorBadRequest(format!(
                "Contact {} is already a member of group {}",
                request.contact_id, group_id
            ))
        })?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "success": true })))
}

pub async fn remove_member(
    db: web::Data<Arc<Database>>,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (group_id, contact_id) = path.into_inner();

    groups_db::remove_member(db.async_connection.clone(), group_id, contact_id)
        .await
        .map_err(|e| actix_web::error::ErrorNotFound(e.to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

pub async fn list_members(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let group_id = path.into_inner();

    groups_db::get_group(db.async_connection.clone(), group_id)
        .await
        .map_err(|e| actix_web::error::ErrorNotFound(e.to_string()))?;

    let members = groups_db::list_members(db.async_connection.clone(), group_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(GroupMembersResponse { members }))
}

/// Persist a new member ordering. The request must list every current
/// member exactly once.
pub async fn reorder_members(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<ReorderGroupMembersRequest>,
) -> ActixResult<HttpResponse> {
    let group_id = path.into_inner();

    let current = groups_db::member_contact_ids(db.async_connection.clone(), group_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let current_set: HashSet<i64> = current.iter().copied().collect();
    let requested_set: HashSet<i64> = request.contact_ids.iter().copied().collect();

    if requested_set.len() != request.contact_ids.len() || current_set != requested_set {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Ordering must list every current member exactly once"
        })));
    }

    groups_db::reorder_members(db.async_connection.clone(), group_id, &request.contact_ids)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let members = groups_db::list_members(db.async_connection.clone(), group_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(GroupMembersResponse { members }))
}
