use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::payment_reconciler::CheckoutCompleted;
use crate::domain::order::CartLine;
use crate::domain::payment::CheckoutSession;
use crate::errors::AppError;
use crate::handlers::orders::{CartLineRequest, CreateOrderRequest, CreateOrderResponse};
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicConfigResponse {
    /// Client-side token for the hosted checkout, `null` when payments are off.
    pub paddle_client_token: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutSessionRequest {
    pub customer_email: Option<String>,
    pub items: Option<Vec<CartLineRequest>>,
    /// Pending order this checkout pays for, echoed back as custom data.
    pub order_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutItemResponse {
    pub price_id: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutCustomer {
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutCustomData {
    pub order_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutSessionResponse {
    pub items: Vec<CheckoutItemResponse>,
    pub customer: CheckoutCustomer,
    pub custom_data: CheckoutCustomData,
}

impl From<CheckoutSession> for CheckoutSessionResponse {
    fn from(s: CheckoutSession) -> Self {
        CheckoutSessionResponse {
            items: s
                .items
                .into_iter()
                .map(|i| CheckoutItemResponse {
                    price_id: i.price_reference,
                    quantity: i.quantity,
                })
                .collect(),
            customer: CheckoutCustomer {
                email: s.customer_email,
            },
            custom_data: CheckoutCustomData {
                order_id: s.order_id,
            },
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutCompletedRequest {
    pub transaction_id: Option<String>,
    #[serde(flatten)]
    pub order: CreateOrderRequest,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/config
#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = 200, description = "Public checkout configuration", body = PublicConfigResponse),
    ),
    tag = "checkout"
)]
pub async fn public_config(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(CacheControl(vec![
            CacheDirective::NoStore,
            CacheDirective::NoCache,
            CacheDirective::MustRevalidate,
        ]))
        .json(PublicConfigResponse {
            paddle_client_token: state.paddle_client_token.clone(),
        })
}

/// POST /api/checkout/session
///
/// Returns the price references and quantities to open the hosted checkout.
#[utoipa::path(
    post,
    path = "/api/checkout/session",
    request_body = CheckoutSessionRequest,
    responses(
        (status = 200, description = "Checkout data", body = CheckoutSessionResponse),
        (status = 400, description = "Missing email or empty cart"),
        (status = 404, description = "Unknown product in cart"),
        (status = 422, description = "A product has no Paddle price ID"),
    ),
    tag = "checkout"
)]
pub async fn checkout_session(
    state: web::Data<AppState>,
    body: web::Json<CheckoutSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let email = body.customer_email.unwrap_or_default();
    let lines: Vec<CartLine> = body
        .items
        .unwrap_or_default()
        .into_iter()
        .map(CartLine::from)
        .collect();
    let handoff = state.handoff.clone();

    let session = web::block(move || handoff.prepare(&email, &lines, body.order_id)).await??;

    Ok(HttpResponse::Ok().json(CheckoutSessionResponse::from(session)))
}

/// POST /api/checkout/completed
///
/// Records the order for a checkout the browser reports as completed. The
/// order is only marked paid once the processor confirms the transaction,
/// unless no verification key is configured.
#[utoipa::path(
    post,
    path = "/api/checkout/completed",
    request_body = CheckoutCompletedRequest,
    responses(
        (status = 200, description = "Order recorded; status tells whether it is paid", body = CreateOrderResponse),
        (status = 400, description = "Missing transaction, customer data or items"),
    ),
    tag = "checkout"
)]
pub async fn checkout_completed(
    state: web::Data<AppState>,
    body: web::Json<CheckoutCompletedRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let event = CheckoutCompleted {
        transaction_id: body.transaction_id.unwrap_or_default(),
        draft: body.order.into_draft(),
    };

    let order = state.reconciler.complete_checkout(event).await?;

    Ok(HttpResponse::Ok().json(CreateOrderResponse::from(&order)))
}
