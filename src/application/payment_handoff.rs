use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::{CartLine, MAX_LINE_QUANTITY};
use crate::domain::payment::{CheckoutItem, CheckoutSession};
use crate::domain::ports::ProductCatalog;

/// Packages a cart for the processor's hosted checkout. Nothing is persisted.
#[derive(Clone)]
pub struct PaymentHandoff {
    catalog: Arc<dyn ProductCatalog>,
}

impl PaymentHandoff {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }

    pub fn prepare(
        &self,
        customer_email: &str,
        lines: &[CartLine],
        order_id: Option<i32>,
    ) -> Result<CheckoutSession, DomainError> {
        let customer_email = customer_email.trim();
        if customer_email.is_empty() {
            return Err(DomainError::validation("customer_email is required"));
        }
        if lines.is_empty() {
            return Err(DomainError::validation("items[] must not be empty"));
        }

        let ids: Vec<i32> = lines.iter().map(|l| l.product_id).collect();
        let products = self.catalog.get_products_by_ids(&ids)?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let quantity = line.quantity.unwrap_or(1);
            if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
                return Err(DomainError::Validation(format!(
                    "Quantity for product {} must be between 1 and {}",
                    line.product_id, MAX_LINE_QUANTITY
                )));
            }
            let product = products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or(DomainError::NotFound("Product"))?;
            let price_reference = product
                .payment_price_reference
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .ok_or_else(|| {
                    DomainError::Configuration(format!(
                        "Product {} has no Paddle price ID; checkout is disabled for this cart",
                        product.id
                    ))
                })?;
            items.push(CheckoutItem {
                price_reference: price_reference.to_string(),
                quantity,
            });
        }

        Ok(CheckoutSession {
            items,
            customer_email: customer_email.to_string(),
            order_id,
        })
    }
}
