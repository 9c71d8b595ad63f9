use actix_web::{web, HttpResponse, Result as ActixResult};
use shared_types::{CreateEventRequest, EventsResponse, UpdateEventRequest};
use std::sync::Arc;

use crate::database::events as events_db;
use crate::database::Database;

pub async fn create_event(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateEventRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();

    if req.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Event name cannot be empty"
        })));
    }

    let id = events_db::insert_event(db.async_connection.clone(), &req)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let event = events_db::get_event(db.async_connection.clone(), id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Created().json(event))
}

pub async fn list_events(db: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let events = events_db::list_events(db.async_connection.clone(), 100)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(EventsResponse { events }))
}

pub async fn get_event(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let event_id = path.into_inner();

    let event = events_db::get_event(db.async_connection.clone(), event_id)
        .await
        .map_err(|e| actix_web::error::ErrorNotFound(e.to_string()))?;

    Ok(HttpResponse::Ok().json(event))
}

pub async fn update_event(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<UpdateEventRequest>,
) -> ActixResult<HttpResponse> {
    let event_id = path.into_inner();

    events_db::update_event(db.async_connection.clone(), event_id, &request)
        .await
        .map_err(|e| actix_web::error::ErrorNotFound(e.to_string()))?;

    let event = events_db::get_event(db.async_connection.clone(), event_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(event))
}

pub async fn delete_event(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let event_id = path.into_inner();

    events_db::delete_event(db.async_connection.clone(), event_id)
        .await
        .map_err(|e| actix_web::error::ErrorNotFound(e.to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
