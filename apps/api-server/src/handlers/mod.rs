//! HTTP handlers and route configuration.

mod health;
mod posts;
mod users;

use actix_web::{error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create_post))
                    .route("", web::get().to(posts::list_posts))
                    .route("/{post_id}", web::get().to(posts::get_post))
                    .route("/{post_id}", web::put().to(posts::update_post))
                    .route("/{post_id}", web::delete().to(posts::delete_post)),
            )
            .service(
                web::scope("/users")
                    .route("", web::post().to(users::register))
                    .route("/{user_id}", web::get().to(users::fetch))
                    .route("/{user_id}/posts", web::get().to(posts::list_author_posts)),
            ),
    );
}

// Unreadable bodies get the uniform envelope instead of actix's plain-text error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req| {
        tracing::debug!(error = %err, "Rejected request body");
        AppError::missing_fields(format!("Invalid request body: {err}")).into()
    })
}
