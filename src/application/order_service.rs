use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::{build_order, ListResult, NewOrder, Order, OrderDraft, OrderStatus};
use crate::domain::payment::{VerifiedPayment, PAYMENT_PROVIDER};
use crate::domain::ports::{OrderRepository, ProductCatalog};

#[derive(Clone)]
pub struct OrderService {
    catalog: Arc<dyn ProductCatalog>,
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(catalog: Arc<dyn ProductCatalog>, repo: Arc<dyn OrderRepository>) -> Self {
        Self { catalog, repo }
    }

    fn price(&self, draft: OrderDraft) -> Result<NewOrder, DomainError> {
        let mut ids: Vec<i32> = draft.lines.iter().map(|l| l.product_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let products = if ids.is_empty() {
            Vec::new()
        } else {
            self.catalog.get_products_by_ids(&ids)?
        };
        build_order(draft, &products)
    }

    /// Price the draft against the catalog and record it as a pending order.
    pub fn create_order(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        let order = self.repo.insert(self.price(draft)?)?;
        log::info!(
            "Created order {} with {} item(s), total {}",
            order.id,
            order.items.len(),
            order.total
        );
        Ok(order)
    }

    /// Like `create_order`, but at most one order is ever recorded per
    /// checkout transaction. The flag is `false` when the order already existed.
    pub fn create_checkout_order(
        &self,
        draft: OrderDraft,
        checkout_id: &str,
    ) -> Result<(Order, bool), DomainError> {
        let (order, created) = self.repo.insert_for_checkout(self.price(draft)?, checkout_id)?;
        if created {
            log::info!(
                "Created order {} for checkout {}, total {}",
                order.id,
                checkout_id,
                order.total
            );
        }
        Ok((order, created))
    }

    pub fn get_order(&self, id: i32) -> Result<Option<Order>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn find_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, DomainError> {
        self.repo.find_by_payment_id(payment_id)
    }

    pub fn list_orders(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        self.repo.list(page, limit)
    }

    /// Apply a processor-verified payment to an existing order.
    pub fn mark_paid(&self, order_id: i32, payment: &VerifiedPayment) -> Result<Order, DomainError> {
        self.apply_payment(order_id, payment.transaction_id())
    }

    /// Apply a payment reported only by the shopper's browser. Callers must
    /// only use this when no verification credential is configured.
    pub(crate) fn mark_paid_unverified(
        &self,
        order_id: i32,
        transaction_id: &str,
    ) -> Result<Order, DomainError> {
        self.apply_payment(order_id, transaction_id)
    }

    fn apply_payment(&self, order_id: i32, transaction_id: &str) -> Result<Order, DomainError> {
        let mut order = self
            .repo
            .find_by_id(order_id)?
            .ok_or(DomainError::NotFound("Order"))?;

        if order.status == OrderStatus::Pending {
            if self
                .repo
                .set_order_paid(order_id, PAYMENT_PROVIDER, transaction_id)?
            {
                log::info!(
                    "Order {} marked paid by transaction {}",
                    order_id,
                    transaction_id
                );
                order.status = OrderStatus::Paid;
                order.payment_provider = Some(PAYMENT_PROVIDER.to_string());
                order.payment_id = Some(transaction_id.to_string());
                return Ok(order);
            }
            // Another request changed the row between the read and the update.
            order = self
                .repo
                .find_by_id(order_id)?
                .ok_or(DomainError::NotFound("Order"))?;
        }

        if order.status.is_settled() {
            log::debug!("Order {} already {}, nothing to apply", order_id, order.status);
            return Ok(order);
        }
        Err(DomainError::Validation(format!(
            "Order {} is {} and cannot be marked paid",
            order_id, order.status
        )))
    }

    /// Operator status change. Any non-pending status is accepted.
    pub fn update_status(&self, order_id: i32, status: &str) -> Result<(), DomainError> {
        let status: OrderStatus = status.trim().parse()?;
        if status == OrderStatus::Pending {
            return Err(DomainError::validation(
                "status must be one of paid, confirmed, completed, cancelled",
            ));
        }
        if !self.repo.set_order_status(order_id, status)? {
            return Err(DomainError::NotFound("Order"));
        }
        log::info!("Order {} status set to {}", order_id, status);
        Ok(())
    }
}
