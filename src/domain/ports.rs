use async_trait::async_trait;

use super::errors::DomainError;
use super::order::{ListResult, NewOrder, Order, OrderStatus};
use super::payment::ProcessorTransaction;
use super::product::{NewProduct, Product, ProductPatch};

pub trait ProductCatalog: Send + Sync + 'static {
    fn get_products_by_ids(&self, ids: &[i32]) -> Result<Vec<Product>, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError>;
    /// All products ordered by `sort_order`, then `id`.
    fn list(&self) -> Result<Vec<Product>, DomainError>;
    fn insert(&self, product: NewProduct) -> Result<i32, DomainError>;
    /// Returns `false` when no product has this id.
    fn update(&self, id: i32, patch: ProductPatch) -> Result<bool, DomainError>;
    fn delete(&self, id: i32) -> Result<(), DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Writes the order as `pending` and returns the stored row.
    fn insert(&self, order: NewOrder) -> Result<Order, DomainError>;
    /// Writes a pending order bound to a checkout transaction. When an order
    /// is already bound to it, returns that order with `false` instead.
    fn insert_for_checkout(
        &self,
        order: NewOrder,
        checkout_id: &str,
    ) -> Result<(Order, bool), DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError>;
    fn find_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, DomainError>;
    /// Moves a `pending` order to `paid`. Returns `false` when the order was
    /// not pending (or does not exist) and nothing was written.
    fn set_order_paid(&self, id: i32, provider: &str, payment_id: &str)
        -> Result<bool, DomainError>;
    /// Returns `false` when no order has this id.
    fn set_order_status(&self, id: i32, status: OrderStatus) -> Result<bool, DomainError>;
    /// Newest first.
    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError>;
}

#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

pub trait AdminRepository: Send + Sync + 'static {
    fn find_by_username(&self, username: &str) -> Result<Option<AdminAccount>, DomainError>;
    fn count(&self) -> Result<i64, DomainError>;
    /// Creates the account or replaces its password hash.
    fn upsert_password(&self, username: &str, password_hash: &str) -> Result<(), DomainError>;
}

/// Server side view of the payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    async fn fetch_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<ProcessorTransaction, DomainError>;
}
