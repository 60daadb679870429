pub mod admin_repo;
pub mod models;
pub mod order_repo;
pub mod paddle;
pub mod product_repo;

#[cfg(test)]
pub mod memory;
#[cfg(test)]
pub mod test_db;
