pub mod auth;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod session;

use actix_web::{error, web, HttpRequest};
use utoipa::OpenApi;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        checkout::public_config,
        checkout::checkout_session,
        checkout::checkout_completed,
        products::list_products,
        products::get_product,
        orders::create_order,
        orders::confirm_order,
        auth::login,
        auth::logout,
        auth::me,
        auth::change_password,
        products::admin_list_products,
        products::create_product,
        products::update_product,
        products::delete_product,
        orders::list_orders,
        orders::update_order_status,
    ),
    tags(
        (name = "catalog", description = "Public product catalog"),
        (name = "checkout", description = "Hosted checkout handoff and completion"),
        (name = "orders", description = "Order creation and payment confirmation"),
        (name = "admin", description = "Session-protected administration"),
    )
)]
pub struct ApiDoc;

/// Malformed JSON bodies are client errors, reported like any other validation failure.
fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::from(DomainError::Validation(format!("Invalid request body: {}", err))).into()
}

/// Register every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(
            web::scope("/api")
                .route("/config", web::get().to(checkout::public_config))
                .route("/products", web::get().to(products::list_products))
                .route("/products/{id}", web::get().to(products::get_product))
                .route("/checkout/session", web::post().to(checkout::checkout_session))
                .route(
                    "/checkout/completed",
                    web::post().to(checkout::checkout_completed),
                )
                .route("/orders", web::post().to(orders::create_order))
                .route("/orders/confirm", web::post().to(orders::confirm_order))
                .route("/login", web::post().to(auth::login))
                .route("/logout", web::post().to(auth::logout))
                .route("/me", web::get().to(auth::me))
                .service(
                    web::scope("/admin")
                        .route("/password", web::put().to(auth::change_password))
                        .route("/products", web::get().to(products::admin_list_products))
                        .route("/products", web::post().to(products::create_product))
                        .route("/products/{id}", web::put().to(products::update_product))
                        .route("/products/{id}", web::delete().to(products::delete_product))
                        .route("/orders", web::get().to(orders::list_orders))
                        .route("/orders/{id}", web::put().to(orders::update_order_status)),
                ),
        );
}
