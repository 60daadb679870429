use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::errors::DomainError;
use crate::domain::product::{split_lines, NewProduct, Product, ProductPatch};
use crate::errors::AppError;
use crate::handlers::session::AdminSession;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Prices arrive as JSON numbers from the admin form, or as decimal strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(serde_json::Number),
    Text(String),
}

impl PriceInput {
    fn parse(&self) -> Result<BigDecimal, DomainError> {
        let raw = match self {
            PriceInput::Number(n) => n.to_string(),
            PriceInput::Text(s) => s.trim().to_string(),
        };
        BigDecimal::from_str(&raw)
            .map(|p| p.round(2))
            .map_err(|_| DomainError::Validation(format!("Invalid price '{}'", raw)))
    }
}

/// List fields accept a JSON array or newline separated text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    Items(Vec<String>),
    Text(String),
}

impl ListInput {
    fn into_vec(self) -> Vec<String> {
        match self {
            ListInput::Items(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            ListInput::Text(text) => split_lines(&text),
        }
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name_ar: String,
    pub name_en: String,
    pub emoji: String,
    pub category: String,
    pub price: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub paddle_price_id: Option<String>,
    pub preview_links: Option<String>,
    pub images: Vec<String>,
    pub variants: Vec<String>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name_ar: p.name_ar,
            name_en: p.name_en,
            emoji: p.emoji,
            category: p.category,
            price: p.price.to_string(),
            description: p.description,
            image_url: p.image_url,
            sort_order: p.sort_order,
            paddle_price_id: p.payment_price_reference,
            preview_links: p.preview_links,
            images: p.images,
            variants: p.variants,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name_ar: Option<String>,
    pub name_en: Option<String>,
    pub emoji: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<PriceInput>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: Option<i32>,
    pub paddle_price_id: Option<String>,
    pub preview_links: Option<String>,
    #[schema(value_type = Option<Vec<String>>)]
    pub images: Option<ListInput>,
    #[schema(value_type = Option<Vec<String>>)]
    pub variants: Option<ListInput>,
}

impl CreateProductRequest {
    fn into_new_product(self) -> Result<NewProduct, DomainError> {
        let price = match &self.price {
            Some(p) => p.parse()?,
            None => BigDecimal::from(0),
        };
        Ok(NewProduct {
            name_ar: self.name_ar.unwrap_or_default(),
            name_en: self.name_en.unwrap_or_default(),
            emoji: self.emoji.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            price,
            description: self.description,
            image_url: blank_to_none(self.image_url),
            sort_order: self.sort_order.unwrap_or(0),
            payment_price_reference: self.paddle_price_id,
            preview_links: blank_to_none(self.preview_links),
            images: self.images.map(ListInput::into_vec).unwrap_or_default(),
            variants: self.variants.map(ListInput::into_vec).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name_ar: Option<String>,
    pub name_en: Option<String>,
    pub emoji: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<PriceInput>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    /// Write-once: ignored when blank, rejected when it differs from a stored value.
    pub paddle_price_id: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub preview_links: Option<Option<String>>,
    #[schema(value_type = Option<Vec<String>>)]
    pub images: Option<ListInput>,
    #[schema(value_type = Option<Vec<String>>)]
    pub variants: Option<ListInput>,
}

impl UpdateProductRequest {
    fn into_patch(self) -> Result<ProductPatch, DomainError> {
        Ok(ProductPatch {
            name_ar: self.name_ar,
            name_en: self.name_en,
            emoji: self.emoji,
            category: self.category,
            price: self.price.as_ref().map(PriceInput::parse).transpose()?,
            description: self.description,
            sort_order: self.sort_order,
            payment_price_reference: self.paddle_price_id,
            image_url: self.image_url.map(blank_to_none),
            preview_links: self.preview_links.map(blank_to_none),
            images: self.images.map(ListInput::into_vec),
            variants: self.variants.map(ListInput::into_vec),
        })
    }
}

// ── Public handlers ──────────────────────────────────────────────────────────

/// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Catalog ordered by sort order", body = [ProductResponse]),
    ),
    tag = "catalog"
)]
pub async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();

    let products = web::block(move || catalog.list()).await??;

    Ok(HttpResponse::Ok().json(
        products
            .into_iter()
            .map(ProductResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = state.catalog.clone();

    let product = web::block(move || catalog.get(id)).await??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

// ── Admin handlers ───────────────────────────────────────────────────────────

/// GET /api/admin/products
#[utoipa::path(
    get,
    path = "/api/admin/products",
    responses(
        (status = 200, description = "Catalog ordered by sort order", body = [ProductResponse]),
        (status = 401, description = "Not signed in"),
    ),
    tag = "admin"
)]
pub async fn admin_list_products(
    _session: AdminSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    list_products(state).await
}

/// POST /api/admin/products
#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created"),
        (status = 400, description = "Missing names or invalid price / Paddle price ID"),
        (status = 401, description = "Not signed in"),
    ),
    tag = "admin"
)]
pub async fn create_product(
    _session: AdminSession,
    state: web::Data<AppState>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = body.into_inner().into_new_product()?;
    let catalog = state.catalog.clone();

    let id = web::block(move || catalog.create(product)).await??;

    Ok(HttpResponse::Ok().json(json!({ "id": id, "success": true })))
}

/// PUT /api/admin/products/{id}
#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id"),
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated"),
        (status = 400, description = "Invalid field or locked Paddle price ID"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Product not found"),
    ),
    tag = "admin"
)]
pub async fn update_product(
    _session: AdminSession,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch = body.into_inner().into_patch()?;
    let catalog = state.catalog.clone();

    web::block(move || catalog.update(id, patch)).await??;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// DELETE /api/admin/products/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "Product deleted (or did not exist)"),
        (status = 401, description = "Not signed in"),
    ),
    tag = "admin"
)]
pub async fn delete_product(
    _session: AdminSession,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = state.catalog.clone();

    web::block(move || catalog.delete(id)).await??;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_accepts_numbers_and_strings() {
        let n: PriceInput = serde_json::from_str("49.99").unwrap();
        assert_eq!(n.parse().unwrap(), BigDecimal::from_str("49.99").unwrap());
        let s: PriceInput = serde_json::from_str("\" 12.5 \"").unwrap();
        assert_eq!(s.parse().unwrap(), BigDecimal::from_str("12.50").unwrap());
        let bad: PriceInput = serde_json::from_str("\"cheap\"").unwrap();
        assert!(bad.parse().is_err());
    }

    #[test]
    fn list_input_accepts_array_or_text() {
        let items: ListInput = serde_json::from_str(r#"["a", " ", "b "]"#).unwrap();
        assert_eq!(items.into_vec(), vec!["a", "b"]);
        let text: ListInput = serde_json::from_str(r#""a\r\n\nb""#).unwrap();
        assert_eq!(text.into_vec(), vec!["a", "b"]);
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let req: UpdateProductRequest =
            serde_json::from_str(r#"{ "image_url": null, "sort_order": 4 }"#).unwrap();
        let patch = req.into_patch().unwrap();
        assert_eq!(patch.image_url, Some(None));
        assert_eq!(patch.preview_links, None);
        assert_eq!(patch.sort_order, Some(4));
    }
}
