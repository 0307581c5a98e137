use std::io;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

use crate::handlers;
use crate::state::AppState;

/// JSON body limit for modification and save requests
const JSON_LIMIT: usize = 1024 * 1024;

pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_LIMIT))
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(handlers::health::handler))
                .route("/strategies", web::get().to(handlers::strategies::list))
                .route("/sessions", web::post().to(handlers::sessions::create))
                .route("/sessions/{session_id}", web::get().to(handlers::sessions::get))
                .route(
                    "/sessions/{session_id}/modifications",
                    web::post().to(handlers::sessions::modify),
                )
                .route(
                    "/sessions/{session_id}/collection",
                    web::post().to(handlers::sessions::save_collection),
                )
                .route("/collections", web::get().to(handlers::collections::list))
                .route("/collections/{id}", web::get().to(handlers::collections::get))
                .route(
                    "/collections/{id}",
                    web::put().to(handlers::collections::update),
                )
                .route(
                    "/collections/{id}",
                    web::delete().to(handlers::collections::delete),
                )
                .route(
                    "/collections/{id}/open",
                    web::post().to(handlers::collections::open),
                ),
        );
}

pub async fn run_server(state: AppState, bind: &str, port: u16) -> io::Result<()> {
    let state = web::Data::new(state);
    log::info!("Listening on http://{}:{}", bind, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(api_config)
    })
    .bind((bind, port))?
    .run()
    .await
}
