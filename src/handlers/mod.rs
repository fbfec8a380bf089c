pub mod audit_handlers;
pub mod auth_handlers;
pub mod message_handlers;
pub mod suggestion_handlers;
pub mod user_handlers;

use actix_web::web;

/// Configure the /api/v1 routes. Fixed paths are registered before `{id}`
/// captures to avoid routing conflicts.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/suggestions")
            .route("", web::get().to(suggestion_handlers::list))
            .route("", web::post().to(suggestion_handlers::create))
            .route("/stats", web::get().to(suggestion_handlers::stats))
            .route("/{id}", web::get().to(suggestion_handlers::read))
            .route("/{id}", web::put().to(suggestion_handlers::update))
            .route("/{id}", web::delete().to(suggestion_handlers::delete))
            .route("/{id}/submit", web::post().to(suggestion_handlers::submit))
            .route("/{id}/analyze", web::post().to(suggestion_handlers::analyze))
            .route("/{id}/accept", web::post().to(suggestion_handlers::accept))
            .route("/{id}/refuse", web::post().to(suggestion_handlers::refuse))
            .route("/{id}/realize", web::post().to(suggestion_handlers::realize))
            .route("/{id}/reset", web::post().to(suggestion_handlers::reset))
            .route("/{id}/messages", web::get().to(suggestion_handlers::thread))
            .route("/{id}/history", web::get().to(suggestion_handlers::history)),
    );
    cfg.service(
        web::scope("/messages")
            .route("", web::get().to(message_handlers::inbox))
            .route("/unread_count", web::get().to(message_handlers::unread_count))
            .route("/{id}/read", web::post().to(message_handlers::mark_read)),
    );
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(user_handlers::list))
            .route("", web::post().to(user_handlers::create)),
    );
    cfg.service(web::scope("/audit").route("", web::get().to(audit_handlers::list)));
}
