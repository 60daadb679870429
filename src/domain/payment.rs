use super::errors::DomainError;

pub const PAYMENT_PROVIDER: &str = "paddle";
pub const COMPLETED_STATUS: &str = "completed";

/// Transaction record as reported by the payment processor's server API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorTransaction {
    pub id: String,
    pub status: String,
}

/// Proof that a transaction was checked against the processor and completed.
///
/// Only [`VerifiedPayment::check`] can build one, so the ledger cannot be
/// marked paid from unchecked input through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPayment {
    transaction_id: String,
}

impl VerifiedPayment {
    pub fn check(
        requested_id: &str,
        transaction: ProcessorTransaction,
    ) -> Result<Self, DomainError> {
        if transaction.id != requested_id || transaction.status != COMPLETED_STATUS {
            return Err(DomainError::Verification(
                "Transaction is not completed or could not be validated".to_string(),
            ));
        }
        Ok(Self {
            transaction_id: transaction.id,
        })
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutItem {
    pub price_reference: String,
    pub quantity: i32,
}

/// Data the hosted checkout needs to open a session for a cart.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub items: Vec<CheckoutItem>,
    pub customer_email: String,
    pub order_id: Option<i32>,
}

pub fn normalize_transaction_id(raw: &str) -> Result<String, DomainError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(DomainError::validation("transaction_id is required"));
    }
    Ok(id.to_string())
}
