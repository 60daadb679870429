use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::ports::ProductCatalog;
use crate::domain::product::{
    cap_variants, normalize_price_reference, resolve_price_reference, validate_price, NewProduct,
    Product, ProductPatch,
};

#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn ProductCatalog>,
}

fn non_blank(value: &str, field: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }

    pub fn list(&self) -> Result<Vec<Product>, DomainError> {
        self.catalog.list()
    }

    pub fn get(&self, id: i32) -> Result<Product, DomainError> {
        self.catalog
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("Product"))
    }

    pub fn create(&self, mut product: NewProduct) -> Result<i32, DomainError> {
        let required = [
            &product.name_ar,
            &product.name_en,
            &product.emoji,
            &product.category,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(DomainError::validation(
                "name_ar, name_en, emoji, category required",
            ));
        }
        validate_price(&product.price)?;
        product.payment_price_reference =
            normalize_price_reference(product.payment_price_reference.as_deref())?;
        product.variants = cap_variants(product.variants);

        let id = self.catalog.insert(product)?;
        log::info!("Created product {}", id);
        Ok(id)
    }

    /// Partial update. The stored Paddle price ID can be set once and never
    /// replaced by a different value.
    pub fn update(&self, id: i32, mut patch: ProductPatch) -> Result<(), DomainError> {
        let current = self
            .catalog
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("Product"))?;

        patch.payment_price_reference = resolve_price_reference(
            current.payment_price_reference.as_deref(),
            patch.payment_price_reference.as_deref(),
        )?;
        if let Some(price) = &patch.price {
            validate_price(price)?;
        }
        patch.name_ar = patch.name_ar.map(|v| non_blank(&v, "name_ar")).transpose()?;
        patch.name_en = patch.name_en.map(|v| non_blank(&v, "name_en")).transpose()?;
        patch.emoji = patch.emoji.map(|v| non_blank(&v, "emoji")).transpose()?;
        patch.category = patch
            .category
            .map(|v| non_blank(&v, "category"))
            .transpose()?;
        patch.variants = patch.variants.map(cap_variants);

        if !self.catalog.update(id, patch)? {
            return Err(DomainError::NotFound("Product"));
        }
        log::info!("Updated product {}", id);
        Ok(())
    }

    pub fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.catalog.delete(id)?;
        log::info!("Deleted product {}", id);
        Ok(())
    }
}
