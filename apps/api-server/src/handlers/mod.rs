//! HTTP handlers and route configuration.

mod health;
mod post;
mod user;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::welcome)).service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/user")
                    .route("/register", web::post().to(user::register))
                    .route("/login", web::post().to(user::login)),
            )
            .service(
                web::scope("/post")
                    .route("", web::post().to(post::create))
                    .route("", web::get().to(post::list))
                    // Registered before `/{id}` so "author" is not read as an id.
                    .route("/author/{id}", web::get().to(post::by_author))
                    .route("/{id}", web::get().to(post::get))
                    .route("/{id}", web::put().to(post::update))
                    .route("/{id}", web::delete().to(post::delete)),
            ),
    );
}
