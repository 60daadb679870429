use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, NewOrder, Order, OrderStatus};
use crate::domain::ports::OrderRepository;
use crate::schema::orders;

use super::models::{NewOrderRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn new_order_row(order: NewOrder, checkout_id: Option<&str>) -> Result<NewOrderRow, DomainError> {
    let items = serde_json::to_value(&order.items)
        .map_err(|e| DomainError::Internal(format!("cannot encode order items: {}", e)))?;

    Ok(NewOrderRow {
        customer_name: order.customer_name,
        customer_email: order.customer_email,
        customer_initials: order.customer_initials,
        items,
        total: order.total,
        status: OrderStatus::Pending.as_str().to_string(),
        checkout_transaction_id: checkout_id.map(str::to_string),
    })
}

impl OrderRepository for DieselOrderRepository {
    fn insert(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(orders::table)
            .values(&new_order_row(order, None)?)
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)?;

        Order::try_from(row)
    }

    fn insert_for_checkout(
        &self,
        order: NewOrder,
        checkout_id: &str,
    ) -> Result<(Order, bool), DomainError> {
        let mut conn = self.pool.get()?;

        // A concurrent insert for the same checkout waits on the unique index,
        // so the loser always finds the winner's row afterwards.
        let inserted = diesel::insert_into(orders::table)
            .values(&new_order_row(order, Some(checkout_id))?)
            .on_conflict(orders::checkout_transaction_id)
            .do_nothing()
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .optional()?;
        if let Some(row) = inserted {
            return Ok((Order::try_from(row)?, true));
        }

        let existing = orders::table
            .filter(orders::checkout_transaction_id.eq(checkout_id))
            .select(OrderRow::as_select())
            .first(&mut conn)?;
        Ok((Order::try_from(existing)?, false))
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Order::try_from)
            .transpose()
    }

    fn find_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        orders::table
            .filter(orders::payment_id.eq(payment_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Order::try_from)
            .transpose()
    }

    fn set_order_paid(
        &self,
        id: i32,
        provider: &str,
        payment_id: &str,
    ) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        // The status guard makes concurrent confirmations apply at most once.
        let updated = diesel::update(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::status.eq(OrderStatus::Pending.as_str())),
        )
        .set((
            orders::status.eq(OrderStatus::Paid.as_str()),
            orders::payment_provider.eq(provider),
            orders::payment_id.eq(payment_id),
        ))
        .execute(&mut conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                DomainError::Validation(format!(
                    "Transaction {} is already recorded on another order",
                    payment_id
                ))
            }
            other => other.into(),
        })?;

        Ok(updated > 0)
    }

    fn set_order_status(&self, id: i32, status: OrderStatus) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(orders::table.filter(orders::id.eq(id)))
            .set(orders::status.eq(status.as_str()))
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1).saturating_mul(limit);
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows = orders::table
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.desc()))
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: rows
                    .into_iter()
                    .map(Order::try_from)
                    .collect::<Result<_, _>>()?,
                total,
            })
        })
    }
}
