use std::sync::Arc;

use super::order_service::OrderService;
use super::run_blocking;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderDraft, OrderStatus};
use crate::domain::payment::{normalize_transaction_id, VerifiedPayment};
use crate::domain::ports::PaymentGateway;

/// Completion event delivered by the shopper's browser after hosted checkout.
#[derive(Debug, Clone)]
pub struct CheckoutCompleted {
    pub transaction_id: String,
    pub draft: OrderDraft,
}

/// Turns payment claims into ledger state.
///
/// With a gateway configured every claim is checked against the processor
/// before an order is marked paid. Without one, only browser-reported
/// completions can be recorded and explicit confirmation is unavailable.
#[derive(Clone)]
pub struct PaymentReconciler {
    orders: OrderService,
    gateway: Option<Arc<dyn PaymentGateway>>,
}

impl PaymentReconciler {
    pub fn new(orders: OrderService, gateway: Option<Arc<dyn PaymentGateway>>) -> Self {
        Self { orders, gateway }
    }

    pub fn can_verify(&self) -> bool {
        self.gateway.is_some()
    }

    /// Fetch the transaction from the processor and check it completed.
    pub async fn verify(&self, transaction_id: &str) -> Result<VerifiedPayment, DomainError> {
        let gateway = self.gateway.as_ref().ok_or_else(|| {
            DomainError::ServiceUnavailable(
                "PADDLE_API_KEY is required to confirm paid orders securely".to_string(),
            )
        })?;
        let transaction = gateway.fetch_transaction(transaction_id).await?;
        VerifiedPayment::check(transaction_id, transaction).map_err(|e| {
            log::warn!("Transaction {} failed verification", transaction_id);
            e
        })
    }

    /// Confirm an existing pending order with a processor-verified transaction.
    pub async fn confirm(&self, order_id: i32, transaction_id: &str) -> Result<Order, DomainError> {
        let transaction_id = normalize_transaction_id(transaction_id)?;
        let payment = self.verify(&transaction_id).await?;

        let orders = self.orders.clone();
        run_blocking(move || orders.mark_paid(order_id, &payment)).await
    }

    /// Record an order for a checkout the browser reports as completed.
    ///
    /// Every report of the same transaction resolves to one order. While that
    /// order is pending each report retries payment: trusted outright without
    /// a gateway, otherwise only once the processor confirms the transaction.
    /// An unverified order stays pending and can be confirmed later.
    pub async fn complete_checkout(&self, event: CheckoutCompleted) -> Result<Order, DomainError> {
        let transaction_id = normalize_transaction_id(&event.transaction_id)?;

        let orders = self.orders.clone();
        let draft = event.draft;
        let lookup_id = transaction_id.clone();
        let (order, created) = run_blocking(move || {
            if let Some(existing) = orders.find_by_payment_id(&lookup_id)? {
                return Ok((existing, false));
            }
            orders.create_checkout_order(draft, &lookup_id)
        })
        .await?;
        if !created {
            log::info!(
                "Transaction {} already recorded on order {}",
                transaction_id,
                order.id
            );
        }
        if order.status != OrderStatus::Pending {
            return Ok(order);
        }

        if !self.can_verify() {
            log::warn!(
                "No payment verification credential; trusting client-reported transaction {} for order {}",
                transaction_id,
                order.id
            );
            let orders = self.orders.clone();
            let order_id = order.id;
            return run_blocking(move || orders.mark_paid_unverified(order_id, &transaction_id))
                .await;
        }

        match self.verify(&transaction_id).await {
            Ok(payment) => {
                let orders = self.orders.clone();
                let order_id = order.id;
                run_blocking(move || orders.mark_paid(order_id, &payment)).await
            }
            Err(e) => {
                log::warn!(
                    "Order {} left pending, transaction {} not verified: {}",
                    order.id,
                    transaction_id,
                    e
                );
                Ok(order)
            }
        }
    }
}
