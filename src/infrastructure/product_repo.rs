use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductCatalog;
use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::schema::products;

use super::models::{NewProductRow, ProductChangeset, ProductRow};

pub struct DieselProductCatalog {
    pool: DbPool,
}

impl DieselProductCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductCatalog for DieselProductCatalog {
    fn get_products_by_ids(&self, ids: &[i32]) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .filter(products::id.eq_any(ids))
            .select(ProductRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .filter(products::id.eq(id))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Product::from))
    }

    fn list(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .select(ProductRow::as_select())
            .order((products::sort_order.asc(), products::id.asc()))
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn insert(&self, product: NewProduct) -> Result<i32, DomainError> {
        let mut conn = self.pool.get()?;

        let id = diesel::insert_into(products::table)
            .values(NewProductRow::from(product))
            .returning(products::id)
            .get_result(&mut conn)?;

        Ok(id)
    }

    fn update(&self, id: i32, patch: ProductPatch) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let changes = ProductChangeset::from(patch);

        // Diesel rejects an UPDATE without columns; an empty patch only
        // has to report whether the row exists.
        if changes.is_empty() {
            let count: i64 = products::table
                .filter(products::id.eq(id))
                .count()
                .get_result(&mut conn)?;
            return Ok(count > 0);
        }

        let updated = diesel::update(products::table.filter(products::id.eq(id)))
            .set(&changes)
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::delete(products::table.filter(products::id.eq(id))).execute(&mut conn)?;

        Ok(())
    }
}
