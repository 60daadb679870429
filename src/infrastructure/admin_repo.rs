use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::{AdminAccount, AdminRepository};
use crate::schema::admin;

use super::models::{AdminRow, NewAdminRow};

pub struct DieselAdminRepository {
    pool: DbPool,
}

impl DieselAdminRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl AdminRepository for DieselAdminRepository {
    fn find_by_username(&self, username: &str) -> Result<Option<AdminAccount>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = admin::table
            .filter(admin::username.eq(username))
            .select(AdminRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(AdminAccount::from))
    }

    fn count(&self) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(admin::table.count().get_result(&mut conn)?)
    }

    fn upsert_password(&self, username: &str, password_hash: &str) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(admin::table)
            .values(&NewAdminRow {
                username,
                password_hash,
            })
            .on_conflict(admin::username)
            .do_update()
            .set(admin::password_hash.eq(password_hash))
            .execute(&mut conn)?;

        Ok(())
    }
}
