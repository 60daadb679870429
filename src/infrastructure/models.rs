use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderLine};
use crate::domain::ports::AdminAccount;
use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::schema::{admin, orders, products};

// ── Products ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i32,
    pub name_ar: String,
    pub name_en: String,
    pub emoji: String,
    pub category: String,
    pub price: BigDecimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub payment_price_reference: Option<String>,
    pub preview_links: Option<String>,
    pub images: Value,
    pub variants: Value,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub name_ar: String,
    pub name_en: String,
    pub emoji: String,
    pub category: String,
    pub price: BigDecimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub payment_price_reference: Option<String>,
    pub preview_links: Option<String>,
    pub images: Value,
    pub variants: Value,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductChangeset {
    pub name_ar: Option<String>,
    pub name_en: Option<String>,
    pub emoji: Option<String>,
    pub category: Option<String>,
    pub price: Option<BigDecimal>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub payment_price_reference: Option<String>,
    pub image_url: Option<Option<String>>,
    pub preview_links: Option<Option<String>>,
    pub images: Option<Value>,
    pub variants: Option<Value>,
}

impl ProductChangeset {
    pub fn is_empty(&self) -> bool {
        self.name_ar.is_none()
            && self.name_en.is_none()
            && self.emoji.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.sort_order.is_none()
            && self.payment_price_reference.is_none()
            && self.image_url.is_none()
            && self.preview_links.is_none()
            && self.images.is_none()
            && self.variants.is_none()
    }
}

/// Decode a JSONB list column. Anything that is not an array of strings
/// reads as an empty list, matching rows written by older tooling.
pub fn decode_list(value: Value) -> Vec<String> {
    serde_json::from_value::<Vec<String>>(value).unwrap_or_default()
}

pub fn encode_list(items: Vec<String>) -> Value {
    Value::from(items)
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name_ar: row.name_ar,
            name_en: row.name_en,
            emoji: row.emoji,
            category: row.category,
            price: row.price,
            description: row.description,
            image_url: row.image_url,
            sort_order: row.sort_order,
            payment_price_reference: row.payment_price_reference,
            preview_links: row.preview_links,
            images: decode_list(row.images),
            variants: decode_list(row.variants),
        }
    }
}

impl From<NewProduct> for NewProductRow {
    fn from(p: NewProduct) -> Self {
        NewProductRow {
            name_ar: p.name_ar,
            name_en: p.name_en,
            emoji: p.emoji,
            category: p.category,
            price: p.price,
            description: p.description,
            image_url: p.image_url,
            sort_order: p.sort_order,
            payment_price_reference: p.payment_price_reference,
            preview_links: p.preview_links,
            images: encode_list(p.images),
            variants: encode_list(p.variants),
        }
    }
}

impl From<ProductPatch> for ProductChangeset {
    fn from(p: ProductPatch) -> Self {
        ProductChangeset {
            name_ar: p.name_ar,
            name_en: p.name_en,
            emoji: p.emoji,
            category: p.category,
            price: p.price,
            description: p.description,
            sort_order: p.sort_order,
            payment_price_reference: p.payment_price_reference,
            image_url: p.image_url,
            preview_links: p.preview_links,
            images: p.images.map(encode_list),
            variants: p.variants.map(encode_list),
        }
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_initials: String,
    pub items: Value,
    pub total: BigDecimal,
    pub payment_provider: Option<String>,
    pub payment_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_initials: String,
    pub items: Value,
    pub total: BigDecimal,
    pub status: String,
    pub checkout_transaction_id: Option<String>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<OrderLine> = serde_json::from_value(row.items).map_err(|e| {
            DomainError::Internal(format!("order {} has unreadable items: {}", row.id, e))
        })?;
        let status = row.status.parse().map_err(|_| {
            DomainError::Internal(format!(
                "order {} has unknown status '{}'",
                row.id, row.status
            ))
        })?;
        Ok(Order {
            id: row.id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_initials: row.customer_initials,
            items,
            total: row.total,
            payment_provider: row.payment_provider,
            payment_id: row.payment_id,
            status,
            created_at: row.created_at,
        })
    }
}

// ── Admin ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = admin)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AdminRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = admin)]
pub struct NewAdminRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

impl From<AdminRow> for AdminAccount {
    fn from(row: AdminRow) -> Self {
        AdminAccount {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}
