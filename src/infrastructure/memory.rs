//! In-memory ports for unit and handler tests.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;

use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, NewOrder, Order, OrderStatus};
use crate::domain::payment::ProcessorTransaction;
use crate::domain::ports::{
    AdminAccount, AdminRepository, OrderRepository, PaymentGateway, ProductCatalog,
};
use crate::domain::product::{NewProduct, Product, ProductPatch};

#[derive(Default)]
pub struct InMemoryCatalog {
    products: Mutex<Vec<Product>>,
}

impl InMemoryCatalog {
    /// Catalog of `(id, price)` products, each with price reference `pri_<id>`.
    pub fn with_prices(prices: &[(i32, &str)]) -> Self {
        let products = prices
            .iter()
            .map(|(id, price)| Product {
                id: *id,
                name_ar: format!("منتج {}", id),
                name_en: format!("Product {}", id),
                emoji: "*".to_string(),
                category: "general".to_string(),
                price: BigDecimal::from_str(price).expect("valid decimal"),
                description: None,
                image_url: None,
                sort_order: *id,
                payment_price_reference: Some(format!("pri_{}", id)),
                preview_links: None,
                images: vec![],
                variants: vec![],
            })
            .collect();
        Self {
            products: Mutex::new(products),
        }
    }

    pub fn clear_price_reference(&self, id: i32) {
        let mut products = self.products.lock().unwrap();
        if let Some(p) = products.iter_mut().find(|p| p.id == id) {
            p.payment_price_reference = None;
        }
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn get_products_by_ids(&self, ids: &[i32]) -> Result<Vec<Product>, DomainError> {
        let products = self.products.lock().unwrap();
        Ok(products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let products = self.products.lock().unwrap();
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Product>, DomainError> {
        let mut products = self.products.lock().unwrap().clone();
        products.sort_by_key(|p| (p.sort_order, p.id));
        Ok(products)
    }

    fn insert(&self, p: NewProduct) -> Result<i32, DomainError> {
        let mut products = self.products.lock().unwrap();
        let id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        products.push(Product {
            id,
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
            images: p.images,
            variants: p.variants,
        });
        Ok(id)
    }

    fn update(&self, id: i32, patch: ProductPatch) -> Result<bool, DomainError> {
        let mut products = self.products.lock().unwrap();
        let Some(p) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };
        if let Some(v) = patch.name_ar {
            p.name_ar = v;
        }
        if let Some(v) = patch.name_en {
            p.name_en = v;
        }
        if let Some(v) = patch.emoji {
            p.emoji = v;
        }
        if let Some(v) = patch.category {
            p.category = v;
        }
        if let Some(v) = patch.price {
            p.price = v;
        }
        if let Some(v) = patch.description {
            p.description = Some(v);
        }
        if let Some(v) = patch.sort_order {
            p.sort_order = v;
        }
        if let Some(v) = patch.payment_price_reference {
            p.payment_price_reference = Some(v);
        }
        if let Some(v) = patch.image_url {
            p.image_url = v;
        }
        if let Some(v) = patch.preview_links {
            p.preview_links = v;
        }
        if let Some(v) = patch.images {
            p.images = v;
        }
        if let Some(v) = patch.variants {
            p.variants = v;
        }
        Ok(true)
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.products.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryOrders {
    orders: Mutex<Vec<Order>>,
    /// `(checkout transaction, order id)`, guarded by the `orders` lock.
    checkouts: Mutex<Vec<(String, i32)>>,
}

impl InMemoryOrders {
    pub fn len(&self) -> usize {
        self.orders.lock().unwrap().len()
    }
}

fn push_pending(orders: &mut Vec<Order>, order: NewOrder) -> Order {
    let stored = Order {
        id: orders.len() as i32 + 1,
        customer_name: order.customer_name,
        customer_email: order.customer_email,
        customer_initials: order.customer_initials,
        items: order.items,
        total: order.total,
        payment_provider: None,
        payment_id: None,
        status: OrderStatus::Pending,
        created_at: Utc::now(),
    };
    orders.push(stored.clone());
    stored
}

impl OrderRepository for InMemoryOrders {
    fn insert(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        Ok(push_pending(&mut orders, order))
    }

    fn insert_for_checkout(
        &self,
        order: NewOrder,
        checkout_id: &str,
    ) -> Result<(Order, bool), DomainError> {
        let mut orders = self.orders.lock().unwrap();
        let mut checkouts = self.checkouts.lock().unwrap();
        if let Some((_, id)) = checkouts.iter().find(|(c, _)| c == checkout_id) {
            let existing = orders
                .iter()
                .find(|o| o.id == *id)
                .cloned()
                .ok_or(DomainError::NotFound("Order"))?;
            return Ok((existing, false));
        }
        let stored = push_pending(&mut orders, order);
        checkouts.push((checkout_id.to_string(), stored.id));
        Ok((stored, true))
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    fn find_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, DomainError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders
            .iter()
            .find(|o| o.payment_id.as_deref() == Some(payment_id))
            .cloned())
    }

    fn set_order_paid(
        &self,
        id: i32,
        provider: &str,
        payment_id: &str,
    ) -> Result<bool, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        match orders
            .iter_mut()
            .find(|o| o.id == id && o.status == OrderStatus::Pending)
        {
            Some(order) => {
                order.status = OrderStatus::Paid;
                order.payment_provider = Some(provider.to_string());
                order.payment_id = Some(payment_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn set_order_status(&self, id: i32, status: OrderStatus) -> Result<bool, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let orders = self.orders.lock().unwrap();
        let items = orders
            .iter()
            .rev()
            .skip(usize::try_from((page - 1).saturating_mul(limit)).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(ListResult {
            items,
            total: orders.len() as i64,
        })
    }
}

#[derive(Default)]
pub struct InMemoryAdmins {
    accounts: Mutex<Vec<AdminAccount>>,
}

impl AdminRepository for InMemoryAdmins {
    fn find_by_username(&self, username: &str) -> Result<Option<AdminAccount>, DomainError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.username == username).cloned())
    }

    fn count(&self) -> Result<i64, DomainError> {
        Ok(self.accounts.lock().unwrap().len() as i64)
    }

    fn upsert_password(&self, username: &str, password_hash: &str) -> Result<(), DomainError> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.iter_mut().find(|a| a.username == username) {
            Some(account) => account.password_hash = password_hash.to_string(),
            None => {
                let id = accounts.len() as i32 + 1;
                accounts.push(AdminAccount {
                    id,
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
enum StubReply {
    Transaction(ProcessorTransaction),
    Unreachable,
}

/// Payment gateway double that answers every lookup the same way.
#[derive(Clone)]
pub struct StubGateway {
    reply: StubReply,
    calls: Arc<AtomicUsize>,
}

impl StubGateway {
    pub fn reporting(id: &str, status: &str) -> Self {
        Self {
            reply: StubReply::Transaction(ProcessorTransaction {
                id: id.to_string(),
                status: status.to_string(),
            }),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn completed(id: &str) -> Self {
        Self::reporting(id, "completed")
    }

    pub fn unreachable() -> Self {
        Self {
            reply: StubReply::Unreachable,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn fetch_transaction(
        &self,
        _transaction_id: &str,
    ) -> Result<ProcessorTransaction, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            StubReply::Transaction(tx) => Ok(tx.clone()),
            StubReply::Unreachable => Err(DomainError::ServiceUnavailable(
                "Paddle verification error: connection refused".to_string(),
            )),
        }
    }
}
