use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::errors::DomainError;
use crate::domain::order::{CartLine, Order, OrderDraft, OrderLine};
use crate::errors::AppError;
use crate::handlers::session::AdminSession;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// A cart line as sent by the storefront. Price, name or status fields in
/// the payload are ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartLineRequest {
    pub product_id: i32,
    /// Defaults to 1.
    pub qty: Option<i32>,
    pub variant: Option<String>,
}

impl From<CartLineRequest> for CartLine {
    fn from(l: CartLineRequest) -> Self {
        CartLine {
            product_id: l.product_id,
            quantity: l.qty,
            variant: l.variant,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub items: Option<Vec<CartLineRequest>>,
}

impl CreateOrderRequest {
    pub fn into_draft(self) -> OrderDraft {
        OrderDraft {
            customer_name: self.customer_name.unwrap_or_default(),
            customer_email: self.customer_email.unwrap_or_default(),
            lines: self
                .items
                .unwrap_or_default()
                .into_iter()
                .map(CartLine::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: i32,
    pub initials: String,
    /// Decimal string, e.g. "99.98"
    pub total: String,
    pub status: String,
}

impl From<&Order> for CreateOrderResponse {
    fn from(o: &Order) -> Self {
        CreateOrderResponse {
            success: true,
            order_id: o.id,
            initials: o.customer_initials.clone(),
            total: o.total.to_string(),
            status: o.status.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmOrderRequest {
    pub order_id: Option<i32>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmOrderResponse {
    pub success: bool,
    pub order_id: i32,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub product_id: i32,
    pub name: String,
    pub price: String,
    pub variant: Option<String>,
    pub qty: i32,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(l: OrderLine) -> Self {
        OrderLineResponse {
            product_id: l.product_id,
            name: l.name,
            price: l.price.to_string(),
            variant: l.variant,
            qty: l.quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_initials: String,
    pub items: Vec<OrderLineResponse>,
    pub total: String,
    pub payment_provider: Option<String>,
    pub payment_id: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        OrderResponse {
            id: o.id,
            customer_name: o.customer_name,
            customer_email: o.customer_email,
            customer_initials: o.customer_initials,
            items: o.items.into_iter().map(OrderLineResponse::from).collect(),
            total: o.total.to_string(),
            payment_provider: o.payment_provider,
            payment_id: o.payment_id,
            status: o.status.to_string(),
            created_at: o.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: Option<String>,
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 50, maximum 200.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Creates a pending order. Lines are priced from the catalog; unknown
/// products are skipped.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created", body = CreateOrderResponse),
        (status = 400, description = "Missing customer data or no valid items"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = body.into_inner().into_draft();
    let orders = state.orders.clone();

    let order = web::block(move || orders.create_order(draft)).await??;

    Ok(HttpResponse::Ok().json(CreateOrderResponse::from(&order)))
}

/// POST /api/orders/confirm
///
/// Marks a pending order paid after the processor confirms the transaction.
/// Repeating the call for a paid order is a no-op.
#[utoipa::path(
    post,
    path = "/api/orders/confirm",
    request_body = ConfirmOrderRequest,
    responses(
        (status = 200, description = "Order is paid", body = ConfirmOrderResponse),
        (status = 400, description = "Missing order_id or transaction_id"),
        (status = 402, description = "Transaction not completed or does not match"),
        (status = 404, description = "Order not found"),
        (status = 503, description = "Verification credential missing or processor unreachable"),
    ),
    tag = "orders"
)]
pub async fn confirm_order(
    state: web::Data<AppState>,
    body: web::Json<ConfirmOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let (Some(order_id), Some(transaction_id)) = (body.order_id, body.transaction_id) else {
        return Err(DomainError::validation("order_id and transaction_id are required").into());
    };

    let order = state.reconciler.confirm(order_id, &transaction_id).await?;

    Ok(HttpResponse::Ok().json(ConfirmOrderResponse {
        success: true,
        order_id: order.id,
        status: order.status.to_string(),
    }))
}

/// GET /api/admin/orders
///
/// Paginated list of orders, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 50, max 200)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 401, description = "Not signed in"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "admin"
)]
pub async fn list_orders(
    _session: AdminSession,
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 200);
    let orders = state.orders.clone();

    let result = web::block(move || orders.list_orders(page, limit)).await??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// PUT /api/admin/orders/{id}
#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Missing or unsupported status"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Order not found"),
    ),
    tag = "admin"
)]
pub async fn update_order_status(
    session: AdminSession,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = body
        .into_inner()
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| DomainError::validation("status required"))?;
    let orders = state.orders.clone();

    web::block(move || orders.update_status(order_id, &status)).await??;
    log::info!("Admin '{}' updated order {}", session.username, order_id);

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
