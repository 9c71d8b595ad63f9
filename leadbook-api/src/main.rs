use actix_cors::Cors;
use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

use leadbook_agents::campaign_writer::CampaignWriterAgent;
use leadbook_agents::card_extractor::CardExtractorAgent;
use leadbook_agents::llm::{ChatClient, OpenAiChatClient};
use leadbook_agents::retry::RetryPolicy;
use leadbook_api::{config, database, handlers};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "leadbook API"
    }))
}

#[get("/health")]
async fn health(db: web::Data<Arc<database::Database>>) -> impl Responder {
    // Test database connection
    match db.connection.lock() {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(_) => HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        })),
    }
}

#[get("/settings")]
async fn get_settings(data: web::Data<handlers::settings::SettingsAppState>) -> impl Responder {
    handlers::settings::get_settings(data).await
}

#[post("/settings/api-keys")]
async fn update_api_keys(
    data: web::Data<handlers::settings::SettingsAppState>,
    request: web::Json<shared_types::UpdateApiKeysRequest>,
) -> impl Responder {
    handlers::settings::update_api_keys(data, request).await
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("leadbook-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Initialize database
    let db = database::initialize_database().expect("Failed to initialize database");

    tracing::info!(
        "Database initialized at: {:?}",
        database::get_db_path().expect("db path resolved during initialization")
    );

    // Load config
    let (config, config_path) = config::ApiConfig::load().expect("Failed to load config");
    tracing::info!("Config loaded from {:?}", config_path);

    let config_arc = Arc::new(std::sync::RwLock::new(config.clone()));
    let settings_state = handlers::settings::SettingsAppState {
        config: config_arc.clone(),
    };

    // Get server config or use defaults
    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 8080)
    };

    tracing::info!("Server will listen on {}:{}", host, port);

    // One LLM client for the whole process; handlers get it injected and
    // never construct their own.
    let api_key = config.openai_api_key().unwrap_or("").to_string();
    if api_key.is_empty() {
        tracing::warn!(
            "openai_api_key is not configured; card extraction and campaign generation will fail until it is set in {:?}",
            config_path
        );
    }
    let llm_client: Arc<dyn ChatClient> = Arc::new(
        OpenAiChatClient::new(&api_key).expect("Failed to initialize OpenAI client"),
    );

    let model = config.parsing_model();
    let extractor = Arc::new(CardExtractorAgent::new(
        llm_client.clone(),
        model.clone(),
        RetryPolicy::default(),
    ));
    let writer = Arc::new(CampaignWriterAgent::new(
        llm_client,
        model,
        RetryPolicy::default(),
    ));

    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if let Some(cors_config) = &config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(settings_state.clone()))
            .app_data(web::Data::new(extractor.clone()))
            .app_data(web::Data::new(writer.clone()))
            .service(hello)
            .service(health)
            .service(get_settings)
            .service(update_api_keys)
            .route("/api/events", web::post().to(handlers::events::create_event))
            .route("/api/events", web::get().to(handlers::events::list_events))
            .route("/api/events/{id}", web::get().to(handlers::events::get_event))
            .route("/api/events/{id}", web::put().to(handlers::events::update_event))
            .route("/api/events/{id}", web::delete().to(handlers::events::delete_event))
            .route("/api/contacts", web::post().to(handlers::contacts::create_contact))
            .route("/api/contacts", web::get().to(handlers::contacts::list_contacts))
            .route("/api/contacts/review-queue", web::get().to(handlers::contacts::review_queue))
            .route("/api/contacts/ocr", web::post().to(handlers::contacts::parse_ocr))
            .route("/api/contacts/ocr/batch", web::post().to(handlers::contacts::parse_ocr_batch))
            .route("/api/contacts/{id}", web::get().to(handlers::contacts::get_contact))
            .route("/api/contacts/{id}", web::patch().to(handlers::contacts::update_contact))
            .route("/api/contacts/{id}", web::delete().to(handlers::contacts::delete_contact))
            .route("/api/groups", web::post().to(handlers::groups::create_group))
            .route("/api/groups", web::get().to(handlers::groups::list_groups))
            .route("/api/groups/{id}", web::get().to(handlers::groups::get_group))
            .route("/api/groups/{id}", web::put().to(handlers::groups::update_group))
            .route("/api/groups/{id}", web::delete().to(handlers::groups::delete_group))
            .route("/api/groups/{id}/members", web::get().to(handlers::groups::list_members))
            .route("/api/groups/{id}/members", web::post().to(handlers::groups::add_member))
            .route("/api/groups/{id}/members/order", web::put().to(handlers::groups::reorder_members))
            .route(
                "/api/groups/{group_id}/members/{contact_id}",
                web::delete().to(handlers::groups::remove_member),
            )
            .route("/api/campaigns/generate", web::post().to(handlers::campaigns::generate_campaign))
            .route("/api/campaigns", web::get().to(handlers::campaigns::list_campaigns))
            .route("/api/campaigns/{id}", web::get().to(handlers::campaigns::get_campaign))
    })
    .bind((host.as_str(), port))?
    .run();

    tracing::info!("Starting server on {}:{}", host, port);

    server.await
}
